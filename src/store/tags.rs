use std::collections::BTreeMap;

use super::{Store, StoreError};
use crate::storage::CustomTag;
use crate::tags::{self, TagInfo};

#[derive(Debug, Clone, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Store {
    /// Create a custom tag and return its key
    pub async fn create_custom_tag(&self, name: &str, color: &str) -> Result<String, StoreError> {
        let name = name.trim();
        let key = tags::derive_key(name);
        if name.is_empty() || key.is_empty() {
            return Err(StoreError::Required("Tag name"));
        }

        let tag = CustomTag {
            name: name.to_string(),
            color: color.to_string(),
        };
        self.try_commit(|doc| {
            if tags::is_default_tag(&key) || doc.custom_tags.contains_key(&key) {
                return Err(StoreError::TagExists);
            }
            doc.custom_tags.insert(key.clone(), tag);
            Ok(Some(()))
        })
        .await?;

        log::debug!("Created tag {}", key);
        Ok(key)
    }

    /// Rename or recolor a custom tag; its key stays the same
    pub async fn update_custom_tag(&self, key: &str, update: TagUpdate) -> Result<(), StoreError> {
        if tags::is_default_tag(key) {
            return Err(StoreError::DefaultTag);
        }

        self.try_commit(|doc| {
            let tag = doc
                .custom_tags
                .get_mut(key)
                .ok_or_else(|| StoreError::TagNotFound(key.to_string()))?;
            if let Some(name) = update.name {
                tag.name = name;
            }
            if let Some(color) = update.color {
                tag.color = color;
            }
            Ok(Some(()))
        })
        .await?;
        Ok(())
    }

    /// Remove a custom tag from the table and from every bookmark
    pub async fn delete_custom_tag(&self, key: &str) -> Result<(), StoreError> {
        if tags::is_default_tag(key) {
            return Err(StoreError::DefaultTag);
        }

        self.try_commit(|doc| {
            if doc.custom_tags.remove(key).is_none() {
                return Err(StoreError::TagNotFound(key.to_string()));
            }
            for bookmark in doc.bookmarks.iter_mut() {
                bookmark.tags.retain(|t| t != key);
            }
            Ok(Some(()))
        })
        .await?;

        self.update_view(|view| {
            if view.active_tag.as_deref() == Some(key) {
                view.active_tag = None;
            }
        });
        Ok(())
    }

    pub fn get_all_tags(&self) -> BTreeMap<String, TagInfo> {
        tags::merged_tags(&self.snapshot().custom_tags)
    }
}
