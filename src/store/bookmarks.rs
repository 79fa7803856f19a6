use super::{Store, StoreError};
use crate::storage::{Bookmark, Collection};

/// Input of `add_bookmark`
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub url: String,
    /// Falls back to the URL's host when empty
    pub title: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
    /// Defaults to the active collection when that is a custom one
    pub collection_id: Option<String>,
}

/// Partial bookmark edit; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favicon: Option<Option<String>>,
    pub image: Option<Option<String>>,
}

pub(crate) fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}

impl Store {
    pub async fn add_bookmark(&self, input: NewBookmark) -> Result<Bookmark, StoreError> {
        let url = input.url.trim().to_string();
        if url.is_empty() {
            return Err(StoreError::Required("URL"));
        }

        let title = input
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| host_of(&url).map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| url.clone());

        let active_collection = self.view().active_collection;
        let collection_id = input.collection_id.or_else(|| {
            (!Collection::is_builtin_id(&active_collection)).then_some(active_collection)
        });

        let mut bookmark = Bookmark::new(title, url);
        bookmark.description = input.description;
        bookmark.tags = input.tags;
        bookmark.favicon = input.favicon;
        bookmark.image = input.image;
        bookmark.collection_id = collection_id;

        let created = self
            .commit(move |doc| {
                // Once the user has ordered bookmarks by hand, new ones go on top
                if let Some(min) = doc.bookmarks.iter().filter_map(|b| b.order).min() {
                    bookmark.order = Some(min - 1);
                }
                doc.bookmarks.push(bookmark.clone());
                Some(bookmark)
            })
            .await;

        created.ok_or(StoreError::Required("URL"))
    }

    pub async fn update_bookmark(&self, bookmark_id: &str, update: BookmarkUpdate) -> bool {
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            if let Some(title) = update.title {
                bookmark.title = title;
            }
            if let Some(url) = update.url {
                bookmark.url = url;
            }
            if let Some(description) = update.description {
                bookmark.description = description;
            }
            if let Some(tags) = update.tags {
                bookmark.tags = tags;
            }
            if let Some(favicon) = update.favicon {
                bookmark.favicon = favicon;
            }
            if let Some(image) = update.image {
                bookmark.image = image;
            }
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_bookmark(&self, bookmark_id: &str) -> bool {
        self.commit(|doc| {
            let index = doc.bookmarks.iter().position(|b| b.id == bookmark_id)?;
            doc.bookmarks.remove(index);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn toggle_favorite(&self, bookmark_id: &str) -> bool {
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            bookmark.is_favorite = !bookmark.is_favorite;
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn toggle_archive(&self, bookmark_id: &str) -> bool {
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            bookmark.is_archived = !bookmark.is_archived;
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn toggle_bookmark_tag(&self, bookmark_id: &str, tag: &str) -> bool {
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            if let Some(index) = bookmark.tags.iter().position(|t| t == tag) {
                bookmark.tags.remove(index);
            } else {
                bookmark.tags.push(tag.to_string());
            }
            Some(())
        })
        .await
        .is_some()
    }

    /// Assign a bookmark to a custom collection. Built-in ids (and `None`)
    /// mean "no collection": favorites and archive are flags, not places.
    pub async fn move_bookmark_to_collection(
        &self,
        bookmark_id: &str,
        collection_id: Option<&str>,
    ) -> bool {
        let collection_id = collection_id
            .filter(|id| !Collection::is_builtin_id(id))
            .map(str::to_string);
        self.commit(|doc| {
            let bookmark = doc.bookmark_mut(bookmark_id)?;
            bookmark.collection_id = collection_id;
            Some(())
        })
        .await
        .is_some()
    }

    /// Give the listed bookmarks an explicit order (their index in `ids`)
    pub async fn reorder_bookmarks(&self, ids: &[String]) -> bool {
        self.commit(|doc| {
            let mut touched = false;
            for (index, id) in ids.iter().enumerate() {
                if let Some(bookmark) = doc.bookmark_mut(id) {
                    bookmark.order = Some(index as i64);
                    touched = true;
                }
            }
            touched.then_some(())
        })
        .await
        .is_some()
    }
}
