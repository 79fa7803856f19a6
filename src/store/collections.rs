use super::{Store, StoreError};
use crate::storage::{new_id, Collection, COLLECTION_ALL};

#[derive(Debug, Clone, Default)]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Store {
    pub async fn add_collection(&self, name: &str, icon: &str) -> Result<Collection, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Required("Collection name"));
        }

        let collection = Collection {
            id: new_id(),
            name: name.to_string(),
            icon: if icon.is_empty() { "folder".to_string() } else { icon.to_string() },
            is_custom: true,
        };

        self.commit(|doc| {
            doc.collections.push(collection.clone());
            Some(())
        })
        .await;
        Ok(collection)
    }

    pub async fn update_collection(
        &self,
        collection_id: &str,
        update: CollectionUpdate,
    ) -> Result<bool, StoreError> {
        if Collection::is_builtin_id(collection_id) {
            return Err(StoreError::BuiltinCollection);
        }

        let updated = self
            .commit(|doc| {
                let collection = doc.collections.iter_mut().find(|c| c.id == collection_id)?;
                if let Some(name) = update.name {
                    collection.name = name;
                }
                if let Some(icon) = update.icon {
                    collection.icon = icon;
                }
                Some(())
            })
            .await;
        Ok(updated.is_some())
    }

    /// Delete a custom collection. Its bookmarks and folders become
    /// uncategorized; nothing else is removed.
    pub async fn delete_collection(&self, collection_id: &str) -> Result<bool, StoreError> {
        if Collection::is_builtin_id(collection_id) {
            return Err(StoreError::BuiltinCollection);
        }

        let deleted = self
            .commit(|doc| {
                let index = doc.collections.iter().position(|c| c.id == collection_id)?;
                doc.collections.remove(index);
                for bookmark in doc.bookmarks.iter_mut() {
                    if bookmark.collection_id.as_deref() == Some(collection_id) {
                        bookmark.collection_id = None;
                    }
                }
                for folder in doc.bookmark_folders.iter_mut() {
                    if folder.collection_id.as_deref() == Some(collection_id) {
                        folder.collection_id = None;
                    }
                }
                Some(())
            })
            .await
            .is_some();

        if deleted {
            self.update_view(|view| {
                if view.active_collection == collection_id {
                    view.active_collection = COLLECTION_ALL.to_string();
                    view.active_bookmark_folder = None;
                }
            });
        }
        Ok(deleted)
    }
}
