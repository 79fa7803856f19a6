//! Bookmark tags and card labels
//!
//! Default tags are compiled in and immutable; custom tags live in the
//! document. The lookup table the UI reads is derived from both on demand.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::storage::CustomTag;

/// (key, name, color)
pub const DEFAULT_TAGS: &[(&str, &str, &str)] = &[
    ("react", "React", "#61dafb"),
    ("javascript", "JavaScript", "#f7df1e"),
    ("typescript", "TypeScript", "#3178c6"),
    ("css", "CSS", "#264de4"),
    ("design", "Design", "#ec4899"),
    ("tutorial", "Tutorial", "#10b981"),
    ("tool", "Tool", "#8b5cf6"),
    ("article", "Article", "#f97316"),
    ("video", "Video", "#ef4444"),
    ("docs", "Docs", "#64748b"),
];

/// Labels available on kanban cards (key, name, color)
pub const DEFAULT_CARD_LABELS: &[(&str, &str, &str)] = &[
    ("bug", "Bug", "#ef4444"),
    ("feature", "Feature", "#3b82f6"),
    ("enhancement", "Enhancement", "#8b5cf6"),
    ("documentation", "Documentation", "#64748b"),
    ("urgent", "Urgent", "#f97316"),
    ("design", "Design", "#ec4899"),
];

/// One entry of the merged tag table
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagInfo {
    pub name: String,
    pub color: String,
    pub is_default: bool,
}

pub fn is_default_tag(key: &str) -> bool {
    DEFAULT_TAGS.iter().any(|(k, _, _)| *k == key)
}

/// Derive the storage key of a tag from its display name.
///
/// Trims, lowercases, turns each run of inner whitespace into a single `-`
/// and drops anything outside `[a-z0-9-]`.
pub fn derive_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                key.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            key.push(c);
        }
    }

    key
}

/// Default tags merged with the document's custom tags.
/// A custom entry never shadows a default key.
pub fn merged_tags(custom: &BTreeMap<String, CustomTag>) -> BTreeMap<String, TagInfo> {
    let mut table: BTreeMap<String, TagInfo> = custom
        .iter()
        .map(|(key, tag)| {
            (
                key.clone(),
                TagInfo {
                    name: tag.name.clone(),
                    color: tag.color.clone(),
                    is_default: false,
                },
            )
        })
        .collect();

    for (key, name, color) in DEFAULT_TAGS {
        table.insert(
            key.to_string(),
            TagInfo {
                name: name.to_string(),
                color: color.to_string(),
                is_default: true,
            },
        );
    }

    table
}
