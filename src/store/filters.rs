//! Read-side projections. Pure functions of a document snapshot and the view
//! state, recomputed on every call.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::bookmarks::host_of;
use super::{SortBy, Store, ViewState};
use crate::storage::{Bookmark, Document, Note, COLLECTION_ALL, COLLECTION_ARCHIVE, COLLECTION_FAVORITES};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStats {
    /// Non-archived bookmarks
    pub total: usize,
    pub favorites: usize,
    pub archived: usize,
    pub folders: usize,
    pub by_collection: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
}

/// Bookmarks visible under the given view state, sorted
pub fn filter_bookmarks(doc: &Document, view: &ViewState) -> Vec<Bookmark> {
    let collection = view.active_collection.as_str();

    let mut result: Vec<Bookmark> = doc
        .bookmarks
        .iter()
        .filter(|b| match collection {
            COLLECTION_FAVORITES => b.is_favorite && !b.is_archived,
            COLLECTION_ARCHIVE => b.is_archived,
            _ => {
                let in_folder = match view.active_bookmark_folder.as_deref() {
                    Some(folder) => b.folder_id.as_deref() == Some(folder),
                    None => b.folder_id.is_none(),
                };
                let in_collection = collection == COLLECTION_ALL
                    || b.collection_id.as_deref() == Some(collection);
                in_folder && in_collection && !b.is_archived
            }
        })
        .filter(|b| match view.active_tag.as_deref() {
            Some(tag) => b.tags.iter().any(|t| t == tag),
            None => true,
        })
        .filter(|b| matches_search(b, &view.search_query))
        .cloned()
        .collect();

    sort_bookmarks(&mut result, view.sort_by);
    result
}

fn matches_search(bookmark: &Bookmark, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    bookmark.title.to_lowercase().contains(&query)
        || bookmark.description.to_lowercase().contains(&query)
        || bookmark.url.to_lowercase().contains(&query)
}

fn sort_bookmarks(bookmarks: &mut [Bookmark], sort_by: SortBy) {
    match sort_by {
        SortBy::Title => bookmarks.sort_by(|a, b| a.title.cmp(&b.title)),
        SortBy::Domain => {
            // Unparseable URLs sort by their raw text
            bookmarks.sort_by_cached_key(|b| host_of(&b.url).unwrap_or_else(|| b.url.to_lowercase()))
        }
        SortBy::Date => {
            if bookmarks.iter().any(|b| b.order.is_some()) {
                bookmarks.sort_by(|a, b| match (a.order, b.order) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => b.created_at.cmp(&a.created_at),
                });
            } else {
                bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
    }
}

/// Notes matching `query` in title or content; pinned first, then most
/// recently edited
pub fn filter_notes(doc: &Document, query: &str) -> Vec<Note> {
    let query = query.to_lowercase();
    let mut notes: Vec<Note> = doc
        .notes
        .iter()
        .filter(|n| {
            query.is_empty()
                || n.title.to_lowercase().contains(&query)
                || n.content.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    notes
}

pub fn bookmark_stats(doc: &Document) -> BookmarkStats {
    let mut stats = BookmarkStats {
        folders: doc.bookmark_folders.len(),
        ..Default::default()
    };

    for bookmark in &doc.bookmarks {
        if bookmark.is_archived {
            stats.archived += 1;
            continue;
        }
        stats.total += 1;
        if bookmark.is_favorite {
            stats.favorites += 1;
        }
        if let Some(collection) = &bookmark.collection_id {
            *stats.by_collection.entry(collection.clone()).or_default() += 1;
        }
        for tag in &bookmark.tags {
            *stats.by_tag.entry(tag.clone()).or_default() += 1;
        }
    }

    stats
}

impl Store {
    pub fn get_filtered_bookmarks(&self) -> Vec<Bookmark> {
        filter_bookmarks(&self.snapshot(), &self.view())
    }

    pub fn get_bookmark_stats(&self) -> BookmarkStats {
        bookmark_stats(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn bookmark(id: &str, title: &str, url: &str, age_minutes: i64) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            ..Bookmark::new(title.to_string(), url.to_string())
        }
    }

    fn ids(bookmarks: &[Bookmark]) -> Vec<&str> {
        bookmarks.iter().map(|b| b.id.as_str()).collect()
    }

    fn sample() -> Document {
        let mut fav = bookmark("fav", "Favorite", "https://fav.example", 1);
        fav.is_favorite = true;
        fav.folder_id = Some("F1".to_string());
        fav.collection_id = Some("work".to_string());

        let mut archived = bookmark("old", "Archived", "https://old.example", 2);
        archived.is_archived = true;
        archived.is_favorite = true;

        let mut work = bookmark("work", "Work Docs", "https://docs.work.example", 3);
        work.collection_id = Some("work".to_string());
        work.tags = vec!["docs".to_string()];

        let mut root = bookmark("root", "Rust Book", "https://doc.rust-lang.org/book", 4);
        root.description = "The Rust programming language".to_string();

        Document {
            bookmarks: vec![fav, archived, work, root],
            ..Default::default()
        }
    }

    fn view(collection: &str) -> ViewState {
        ViewState {
            active_collection: collection.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_favorites_ignore_folder_and_collection() {
        let doc = sample();
        let mut state = view(COLLECTION_FAVORITES);
        state.active_bookmark_folder = Some("other-folder".to_string());

        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["fav"]);
    }

    #[test]
    fn test_archive_view() {
        let doc = sample();
        assert_eq!(ids(&filter_bookmarks(&doc, &view(COLLECTION_ARCHIVE))), vec!["old"]);
    }

    #[test]
    fn test_all_shows_root_level_only() {
        let doc = sample();
        assert_eq!(ids(&filter_bookmarks(&doc, &view(COLLECTION_ALL))), vec!["work", "root"]);

        let mut state = view(COLLECTION_ALL);
        state.active_bookmark_folder = Some("F1".to_string());
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["fav"]);
    }

    #[test]
    fn test_custom_collection() {
        let doc = sample();
        assert_eq!(ids(&filter_bookmarks(&doc, &view("work"))), vec!["work"]);
        assert!(filter_bookmarks(&doc, &view("dangling")).is_empty());
    }

    #[test]
    fn test_tag_and_search() {
        let doc = sample();

        let mut state = view(COLLECTION_ALL);
        state.active_tag = Some("docs".to_string());
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["work"]);

        let mut state = view(COLLECTION_ALL);
        state.search_query = "PROGRAMMING".to_string();
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["root"]);

        state.search_query = "work.example".to_string();
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["work"]);
    }

    #[test]
    fn test_sorts() {
        let mut doc = sample();
        doc.bookmarks.push(bookmark("bad", "Broken", "not a url", 0));

        let mut state = view(COLLECTION_ALL);
        state.sort_by = SortBy::Title;
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["bad", "root", "work"]);

        state.sort_by = SortBy::Domain;
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["root", "work", "bad"]);

        state.sort_by = SortBy::Date;
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["bad", "work", "root"]);

        doc.bookmarks[3].order = Some(0);
        assert_eq!(ids(&filter_bookmarks(&doc, &state)), vec!["root", "bad", "work"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let doc = sample();
        let state = view(COLLECTION_ALL);
        assert_eq!(filter_bookmarks(&doc, &state), filter_bookmarks(&doc, &state));
    }

    #[test]
    fn test_stats() {
        let mut doc = sample();
        doc.bookmark_folders.push(crate::storage::BookmarkFolder {
            id: "F1".to_string(),
            name: "Folder".to_string(),
            color: String::new(),
            collection_id: None,
            order: 0,
            created_at: Utc::now(),
        });

        let stats = bookmark_stats(&doc);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.archived, 1);
        assert_eq!(stats.folders, 1);
        assert_eq!(stats.by_collection["work"], 2);
        assert_eq!(stats.by_tag["docs"], 1);
    }
}
