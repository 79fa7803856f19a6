//! Kanban boards, columns, cards and checklists.
//! Column and card operations act on the active board.

use chrono::Utc;

use super::{Store, StoreError};
use crate::storage::{Board, Card, ChecklistItem, Column, Priority};

/// Partial card edit; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<Vec<String>>,
    /// `Some(None)` clears the priority
    pub priority: Option<Option<Priority>>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

impl Store {
    pub fn active_board(&self) -> Option<Board> {
        self.snapshot().active_board().cloned()
    }

    // ===== Boards =====

    /// Create a board with the default columns and make it active
    pub async fn create_board(&self, name: &str) -> Result<Board, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Required("Board name"));
        }

        let board = Board::new(name.to_string());
        let created = board.clone();
        self.commit(move |doc| {
            doc.active_board = Some(board.id.clone());
            doc.boards.push(board);
            Some(())
        })
        .await;

        log::info!("Created board '{}' ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn rename_board(&self, board_id: &str, name: &str) -> bool {
        let name = name.trim().to_string();
        self.commit(|doc| {
            let board = doc.board_mut(board_id)?;
            board.name = name;
            Some(())
        })
        .await
        .is_some()
    }

    /// Remove a board. If it was active, the first remaining board (or none)
    /// takes over. Keeping at least one board is left to the caller.
    pub async fn delete_board(&self, board_id: &str) -> bool {
        self.commit(|doc| {
            let index = doc.boards.iter().position(|b| b.id == board_id)?;
            doc.boards.remove(index);
            if doc.active_board.as_deref() == Some(board_id) {
                doc.active_board = doc.boards.first().map(|b| b.id.clone());
            }
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn set_active_board(&self, board_id: &str) -> bool {
        self.commit(|doc| {
            doc.board(board_id)?;
            doc.active_board = Some(board_id.to_string());
            Some(())
        })
        .await
        .is_some()
    }

    // ===== Columns =====

    pub async fn add_column(&self, title: &str) -> Option<Column> {
        let column = Column::new(title.trim().to_string());
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            board.columns.push(column.clone());
            Some(column)
        })
        .await
    }

    pub async fn rename_column(&self, column_id: &str, title: &str) -> bool {
        let title = title.trim().to_string();
        self.commit(|doc| {
            let column = doc.active_board_mut()?.column_mut(column_id)?;
            column.title = title;
            Some(())
        })
        .await
        .is_some()
    }

    /// Delete a column with its cards. Archived cards that came from it stay
    /// archived and restore into the first column.
    pub async fn delete_column(&self, column_id: &str) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let index = board.columns.iter().position(|c| c.id == column_id)?;
            board.columns.remove(index);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn move_column(&self, column_id: &str, to_index: usize) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let from = board.columns.iter().position(|c| c.id == column_id)?;
            let column = board.columns.remove(from);
            let to = to_index.min(board.columns.len());
            board.columns.insert(to, column);
            Some(())
        })
        .await
        .is_some()
    }

    // ===== Cards =====

    /// Append a new card to a column
    pub async fn add_card(&self, column_id: &str, title: &str) -> Result<Option<Card>, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Required("Card title"));
        }

        let card = Card::new(title.to_string());
        Ok(self
            .commit(|doc| {
                let column = doc.active_board_mut()?.column_mut(column_id)?;
                column.cards.push(card.clone());
                Some(card)
            })
            .await)
    }

    pub async fn update_card(&self, card_id: &str, update: CardUpdate) -> bool {
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            if let Some(title) = update.title {
                card.title = title;
            }
            if let Some(description) = update.description {
                card.description = description;
            }
            if let Some(labels) = update.labels {
                card.labels = labels;
            }
            if let Some(priority) = update.priority {
                card.priority = priority;
            }
            if let Some(checklist) = update.checklist {
                card.checklist = checklist;
            }
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_card(&self, card_id: &str) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let column = board
                .columns
                .iter_mut()
                .find(|c| c.cards.iter().any(|card| card.id == card_id))?;
            column.cards.retain(|card| card.id != card_id);
            Some(())
        })
        .await
        .is_some()
    }

    /// Move a card between (or within) columns. Without an index the card is
    /// appended to the destination.
    pub async fn move_card(
        &self,
        from_column_id: &str,
        to_column_id: &str,
        card_id: &str,
        to_index: Option<usize>,
    ) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let from = board.columns.iter().position(|c| c.id == from_column_id)?;
            let to = board.columns.iter().position(|c| c.id == to_column_id)?;
            let index = board.columns[from]
                .cards
                .iter()
                .position(|card| card.id == card_id)?;

            let card = board.columns[from].cards.remove(index);
            let dest = &mut board.columns[to].cards;
            let at = to_index.map_or(dest.len(), |i| i.min(dest.len()));
            dest.insert(at, card);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn toggle_card_label(&self, card_id: &str, label: &str) -> bool {
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            if let Some(index) = card.labels.iter().position(|l| l == label) {
                card.labels.remove(index);
            } else {
                card.labels.push(label.to_string());
            }
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn set_card_priority(&self, card_id: &str, priority: Option<Priority>) -> bool {
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            card.priority = priority;
            Some(())
        })
        .await
        .is_some()
    }

    // ===== Checklists =====

    pub async fn add_checklist_item(&self, card_id: &str, text: &str) -> Option<ChecklistItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let item = ChecklistItem::new(text.to_string());
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            card.checklist.push(item.clone());
            Some(item)
        })
        .await
    }

    pub async fn toggle_checklist_item(&self, card_id: &str, item_id: &str) -> bool {
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            let item = card.checklist.iter_mut().find(|i| i.id == item_id)?;
            item.completed = !item.completed;
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn update_checklist_item(&self, card_id: &str, item_id: &str, text: &str) -> bool {
        let text = text.to_string();
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            let item = card.checklist.iter_mut().find(|i| i.id == item_id)?;
            item.text = text;
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_checklist_item(&self, card_id: &str, item_id: &str) -> bool {
        self.commit(|doc| {
            let card = doc.active_board_mut()?.card_mut(card_id)?;
            let index = card.checklist.iter().position(|i| i.id == item_id)?;
            card.checklist.remove(index);
            Some(())
        })
        .await
        .is_some()
    }

    // ===== Archive =====

    /// Move a card out of its column into the board's archive
    pub async fn archive_card(&self, column_id: &str, card_id: &str) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let column = board.column_mut(column_id)?;
            let index = column.cards.iter().position(|c| c.id == card_id)?;

            let mut card = column.cards.remove(index);
            card.archived_at = Some(Utc::now());
            card.original_column_id = Some(column_id.to_string());
            board.archived_cards.push(card);
            Some(())
        })
        .await
        .is_some()
    }

    /// Put an archived card back at the end of the column it came from, or
    /// the first column when that one is gone
    pub async fn restore_card(&self, card_id: &str) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let index = board.archived_cards.iter().position(|c| c.id == card_id)?;

            let target = board.archived_cards[index]
                .original_column_id
                .as_deref()
                .and_then(|id| board.columns.iter().position(|c| c.id == id))
                .or(if board.columns.is_empty() { None } else { Some(0) })?;

            let mut card = board.archived_cards.remove(index);
            card.archived_at = None;
            card.original_column_id = None;
            board.columns[target].cards.push(card);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_archived_card(&self, card_id: &str) -> bool {
        self.commit(|doc| {
            let board = doc.active_board_mut()?;
            let index = board.archived_cards.iter().position(|c| c.id == card_id)?;
            board.archived_cards.remove(index);
            Some(())
        })
        .await
        .is_some()
    }
}
