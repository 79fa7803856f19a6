use serde::{Deserialize, Serialize};

use super::Store;
use crate::storage::COLLECTION_ALL;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Title,
    Domain,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "title" => Ok(SortBy::Title),
            "domain" => Ok(SortBy::Domain),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// UI selection state. Lives only in memory: never persisted, never synced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub active_collection: String,
    pub active_tag: Option<String>,
    pub search_query: String,
    pub sort_by: SortBy,
    pub active_bookmark_folder: Option<String>,
    pub notes_search_query: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_collection: COLLECTION_ALL.to_string(),
            active_tag: None,
            search_query: String::new(),
            sort_by: SortBy::Date,
            active_bookmark_folder: None,
            notes_search_query: String::new(),
        }
    }
}

impl Store {
    /// Switching collection leaves any open folder
    pub fn set_active_collection(&self, collection_id: &str) {
        self.update_view(|view| {
            view.active_collection = collection_id.to_string();
            view.active_bookmark_folder = None;
        });
    }

    pub fn set_active_tag(&self, tag: Option<&str>) {
        self.update_view(|view| view.active_tag = tag.map(str::to_string));
    }

    pub fn set_search_query(&self, query: &str) {
        self.update_view(|view| view.search_query = query.to_string());
    }

    pub fn set_sort_by(&self, sort_by: SortBy) {
        self.update_view(|view| view.sort_by = sort_by);
    }

    pub fn set_active_bookmark_folder(&self, folder_id: Option<&str>) {
        self.update_view(|view| view.active_bookmark_folder = folder_id.map(str::to_string));
    }

    pub fn set_notes_search_query(&self, query: &str) {
        self.update_view(|view| view.notes_search_query = query.to_string());
    }
}
