use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Ids of the collections every document carries
pub const COLLECTION_ALL: &str = "all";
pub const COLLECTION_FAVORITES: &str = "favorites";
pub const COLLECTION_ARCHIVE: &str = "archive";

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Values of the wrong shape decode as `None` instead of failing the document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| serde_json::from_value(v).ok()))
}

/// Missing, null or unreadable timestamps read as now.
/// Accepts RFC 3339 strings and epoch milliseconds.
fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(parse_timestamp).unwrap_or_else(Utc::now))
}

fn parse_timestamp(value: Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        other => serde_json::from_value(other).ok(),
    }
}

fn theme_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let theme: Option<String> = lenient(deserializer)?;
    Ok(theme.filter(|t| !t.trim().is_empty()).unwrap_or_else(default_theme))
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItem {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: String) -> Self {
        Self {
            id: new_id(),
            text,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "nullable")]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_column_id: Option<String>,
}

impl Card {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            description: String::new(),
            labels: Vec::new(),
            priority: None,
            checklist: Vec::new(),
            created_at: Utc::now(),
            archived_at: None,
            original_column_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub columns: Vec<Column>,
    #[serde(default, deserialize_with = "nullable")]
    pub archived_cards: Vec<Card>,
}

impl Board {
    /// A fresh board with the three default columns
    pub fn new(name: String) -> Self {
        Self {
            id: new_id(),
            name,
            columns: ["To Do", "In Progress", "Done"]
                .into_iter()
                .map(|title| Column::new(title.to_string()))
                .collect(),
            archived_cards: Vec::new(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Find a live (non-archived) card anywhere on the board
    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.cards.iter_mut())
            .find(|card| card.id == card_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_archived: bool,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(title: String, url: String) -> Self {
        Self {
            id: new_id(),
            title,
            url,
            description: String::new(),
            favicon: None,
            image: None,
            tags: Vec::new(),
            collection_id: None,
            folder_id: None,
            order: None,
            is_favorite: false,
            is_archived: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkFolder {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub color: String,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub order: i64,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub icon: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_custom: bool,
}

impl Collection {
    pub fn is_builtin_id(id: &str) -> bool {
        matches!(id, COLLECTION_ALL | COLLECTION_FAVORITES | COLLECTION_ARCHIVE)
    }

    pub fn builtins() -> Vec<Collection> {
        [
            (COLLECTION_ALL, "All Bookmarks", "bookmark"),
            (COLLECTION_FAVORITES, "Favorites", "star"),
            (COLLECTION_ARCHIVE, "Archive", "archive"),
        ]
        .into_iter()
        .map(|(id, name, icon)| Collection {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            is_custom: false,
        })
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomTag {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_pinned: bool,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title,
            content,
            is_pinned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Top-level navigation; kept per device and never taken from a remote copy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Boards,
    Bookmarks,
    Notes,
}

fn default_theme() -> String {
    "dark".to_string()
}

/// The whole persisted and synced state, exchanged as one unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "nullable")]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub active_board: Option<String>,
    #[serde(default = "default_theme", deserialize_with = "theme_or_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default, deserialize_with = "nullable")]
    pub bookmark_folders: Vec<BookmarkFolder>,
    #[serde(default, deserialize_with = "nullable")]
    pub collections: Vec<Collection>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_tags: BTreeMap<String, CustomTag>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Vec<Note>,
    #[serde(default, deserialize_with = "nullable")]
    pub active_view: ActiveView,
    #[serde(default, deserialize_with = "lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub sync_enabled: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            boards: Vec::new(),
            active_board: None,
            theme: default_theme(),
            bookmarks: Vec::new(),
            bookmark_folders: Vec::new(),
            collections: Collection::builtins(),
            custom_tags: BTreeMap::new(),
            notes: Vec::new(),
            active_view: ActiveView::Boards,
            last_modified: None,
            sync_enabled: false,
        }
    }
}

impl Document {
    /// Decode a stored or remote document, filling every default once
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut document: Document = serde_json::from_str(json)?;
        document.normalize();
        Ok(document)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Re-insert any built-in collection an older or foreign document lacks
    pub fn normalize(&mut self) {
        let builtins = Collection::builtins();
        let custom: Vec<Collection> = self
            .collections
            .drain(..)
            .filter(|c| !Collection::is_builtin_id(&c.id))
            .collect();
        self.collections = builtins;
        self.collections.extend(custom);
    }

    pub fn touch(&mut self) {
        self.last_modified = Some(Utc::now());
    }

    /// First-run content
    pub fn default_document() -> Self {
        let welcome = Card {
            id: "card-1".to_string(),
            title: "Welcome!".to_string(),
            description: "This is your first card. Drag it to another column or create new cards to get started.".to_string(),
            ..Card::new(String::new())
        };

        let columns = vec![
            Column {
                id: "col-backlog".to_string(),
                title: "Backlog".to_string(),
                cards: vec![welcome],
            },
            Column {
                id: "col-todo".to_string(),
                title: "To Do".to_string(),
                cards: Vec::new(),
            },
            Column {
                id: "col-progress".to_string(),
                title: "In Progress".to_string(),
                cards: Vec::new(),
            },
            Column {
                id: "col-done".to_string(),
                title: "Done".to_string(),
                cards: Vec::new(),
            },
        ];

        Self {
            boards: vec![Board {
                id: "default-board".to_string(),
                name: "My First Project".to_string(),
                columns,
                archived_cards: Vec::new(),
            }],
            active_board: Some("default-board".to_string()),
            ..Default::default()
        }
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    pub fn board_mut(&mut self, board_id: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == board_id)
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.active_board.as_deref().and_then(|id| self.board(id))
    }

    pub fn active_board_mut(&mut self) -> Option<&mut Board> {
        let id = self.active_board.clone()?;
        self.board_mut(&id)
    }

    pub fn bookmark_mut(&mut self, bookmark_id: &str) -> Option<&mut Bookmark> {
        self.bookmarks.iter_mut().find(|b| b.id == bookmark_id)
    }

    pub fn note_mut(&mut self, note_id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == note_id)
    }
}
