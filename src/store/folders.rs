use chrono::Utc;

use super::{Store, StoreError};
use crate::storage::{new_id, Bookmark, BookmarkFolder, Collection};

const FOLDER_COLORS: &[&str] = &[
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#64748b",
];

/// Partial folder edit
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Store {
    /// Group existing bookmarks into a new folder. Needs at least two of the
    /// given ids to exist; each member leaves any folder it was in.
    pub async fn create_folder(
        &self,
        bookmark_ids: &[String],
        name: &str,
    ) -> Result<BookmarkFolder, StoreError> {
        let name = match name.trim() {
            "" => "New Folder".to_string(),
            trimmed => trimmed.to_string(),
        };

        let created = self
            .try_commit(|doc| {
                let members: Vec<usize> = doc
                    .bookmarks
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| bookmark_ids.contains(&b.id))
                    .map(|(i, _)| i)
                    .collect();
                if members.len() < 2 {
                    return Err(StoreError::FolderTooSmall);
                }

                let folder = BookmarkFolder {
                    id: new_id(),
                    name,
                    color: FOLDER_COLORS[doc.bookmark_folders.len() % FOLDER_COLORS.len()].to_string(),
                    collection_id: doc.bookmarks[members[0]].collection_id.clone(),
                    order: doc.bookmark_folders.len() as i64,
                    created_at: Utc::now(),
                };

                for index in members {
                    doc.bookmarks[index].folder_id = Some(folder.id.clone());
                }
                doc.bookmark_folders.push(folder.clone());
                Ok(Some(folder))
            })
            .await?;

        created.ok_or(StoreError::FolderTooSmall)
    }

    pub async fn update_folder(&self, folder_id: &str, update: FolderUpdate) -> bool {
        self.commit(|doc| {
            let folder = doc.bookmark_folders.iter_mut().find(|f| f.id == folder_id)?;
            if let Some(name) = update.name {
                folder.name = name;
            }
            if let Some(color) = update.color {
                folder.color = color;
            }
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn add_bookmark_to_folder(&self, bookmark_id: &str, folder_id: &str) -> bool {
        self.commit(|doc| {
            doc.bookmark_folders.iter().find(|f| f.id == folder_id)?;
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            bookmark.folder_id = Some(folder_id.to_string());
            Some(())
        })
        .await
        .is_some()
    }

    /// Send a bookmark back to the root level
    pub async fn remove_bookmark_from_folder(&self, bookmark_id: &str) -> bool {
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            bookmark.folder_id.take()?;
            Some(())
        })
        .await
        .is_some()
    }

    /// Delete a folder; its bookmarks move to the root level
    pub async fn delete_folder(&self, folder_id: &str) -> bool {
        let deleted = self
            .commit(|doc| {
                let index = doc.bookmark_folders.iter().position(|f| f.id == folder_id)?;
                doc.bookmark_folders.remove(index);
                for bookmark in doc.bookmarks.iter_mut() {
                    if bookmark.folder_id.as_deref() == Some(folder_id) {
                        bookmark.folder_id = None;
                    }
                }
                Some(())
            })
            .await
            .is_some();

        if deleted {
            self.update_view(|view| {
                if view.active_bookmark_folder.as_deref() == Some(folder_id) {
                    view.active_bookmark_folder = None;
                }
            });
        }
        deleted
    }

    /// Folders shown for the active collection, in display order
    pub fn get_folders(&self) -> Vec<BookmarkFolder> {
        let doc = self.snapshot();
        let active = self.view().active_collection;

        let mut folders: Vec<BookmarkFolder> = doc
            .bookmark_folders
            .iter()
            .filter(|f| {
                Collection::is_builtin_id(&active) || f.collection_id.as_deref() == Some(active.as_str())
            })
            .cloned()
            .collect();
        folders.sort_by_key(|f| f.order);
        folders
    }

    /// Non-archived members of a folder: explicit order first, then newest
    pub fn get_bookmarks_in_folder(&self, folder_id: &str) -> Vec<Bookmark> {
        let doc = self.snapshot();
        let mut members: Vec<Bookmark> = doc
            .bookmarks
            .iter()
            .filter(|b| b.folder_id.as_deref() == Some(folder_id) && !b.is_archived)
            .cloned()
            .collect();
        members.sort_by(|a, b| match (a.order, b.order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        members
    }
}
