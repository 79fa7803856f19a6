use chrono::Utc;

use super::{filter_notes, Store};
use crate::storage::Note;

#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Store {
    pub async fn add_note(&self, title: &str, content: &str) -> Note {
        let note = Note::new(title.to_string(), content.to_string());
        self.commit(|doc| {
            doc.notes.push(note.clone());
            Some(())
        })
        .await;
        note
    }

    pub async fn update_note(&self, note_id: &str, update: NoteUpdate) -> bool {
        self.commit(|doc| {
            let note = doc.note_mut(note_id)?;
            if let Some(title) = update.title {
                note.title = title;
            }
            if let Some(content) = update.content {
                note.content = content;
            }
            note.updated_at = Utc::now();
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_note(&self, note_id: &str) -> bool {
        self.commit(|doc| {
            let index = doc.notes.iter().position(|n| n.id == note_id)?;
            doc.notes.remove(index);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn toggle_note_pin(&self, note_id: &str) -> bool {
        self.commit(|doc| {
            let note = doc.note_mut(note_id)?;
            note.is_pinned = !note.is_pinned;
            Some(())
        })
        .await
        .is_some()
    }

    pub fn get_filtered_notes(&self) -> Vec<Note> {
        filter_notes(&self.snapshot(), &self.view().notes_search_query)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::Document;
    use crate::testing::MemoryStore;

    fn test_store() -> Store {
        Store::with_document(Arc::new(MemoryStore::default()), Document::default())
    }

    #[tokio::test]
    async fn test_update_note_bumps_updated_at() {
        let store = test_store();
        let note = store.add_note("Groceries", "milk").await;

        let update = NoteUpdate {
            content: Some("milk, eggs".to_string()),
            ..Default::default()
        };
        assert!(store.update_note(&note.id, update).await);

        let saved = &store.snapshot().notes[0];
        assert_eq!(saved.title, "Groceries");
        assert_eq!(saved.content, "milk, eggs");
        assert!(saved.updated_at >= note.updated_at);
        assert_eq!(saved.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_pinned_notes_come_first() {
        let store = test_store();
        let first = store.add_note("First", "").await;
        store.add_note("Second", "").await;

        assert!(store.toggle_note_pin(&first.id).await);

        let titles: Vec<String> = store.get_filtered_notes().into_iter().map(|n| n.title).collect();
        assert_eq!(titles[0], "First");

        store.set_notes_search_query("SEC");
        let titles: Vec<String> = store.get_filtered_notes().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Second"]);
    }

    #[tokio::test]
    async fn test_delete_note() {
        let store = test_store();
        let note = store.add_note("Temp", "").await;

        assert!(store.delete_note(&note.id).await);
        assert!(!store.delete_note(&note.id).await);
        assert!(store.snapshot().notes.is_empty());
    }
}
