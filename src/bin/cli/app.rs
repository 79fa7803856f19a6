use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use carbon_lib::config::{self, AppConfig};
use carbon_lib::storage::{Board, Column, FileStorage};
use carbon_lib::store::Store;
use carbon_lib::sync::SyncEngine;
use carbon_lib::{build_cloud, build_data_store};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: Arc<Store>,
}

impl App {
    /// Load the config (explicit path or the default location) and the
    /// stored document
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => config::load_config(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => {
                let data_dir = FileStorage::default_data_dir()
                    .context("Failed to get data directory")?;
                config::load_config(&config::get_config_path(&data_dir))
                    .context("Failed to load config")?
            }
        };

        let data_store = build_data_store(&config).context("Failed to open data store")?;
        let store = Arc::new(Store::new(data_store));
        store.load().await;
        if let Some(error) = store.error() {
            bail!("{}", error);
        }

        Ok(Self { config, store })
    }

    /// Sync engine for one-shot syncs; the CLI never starts the scheduler
    pub fn sync_engine(&self) -> Result<SyncEngine> {
        let cloud = build_cloud(&self.config).context("Failed to set up cloud sync")?;
        Ok(SyncEngine::new(Arc::clone(&self.store), cloud))
    }

    /// Find a board by name (case-insensitive prefix match), or the active one
    pub fn find_board(&self, name: Option<&str>) -> Result<Board> {
        let doc = self.store.snapshot();

        let Some(name) = name else {
            return doc
                .active_board()
                .cloned()
                .context("No active board. Create one first.");
        };

        let name_lower = name.to_lowercase();
        if let Some(board) = doc.boards.iter().find(|b| b.name.to_lowercase() == name_lower) {
            return Ok(board.clone());
        }

        let matches: Vec<&Board> = doc
            .boards
            .iter()
            .filter(|b| b.name.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No board matching '{}'. Available boards:\n{}",
                name,
                doc.boards
                    .iter()
                    .map(|b| format!("  - {}", b.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous board name '{}'. Matches:\n{}",
                name,
                matches
                    .iter()
                    .map(|b| format!("  - {}", b.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a column of a board by title (case-insensitive prefix match)
    pub fn find_column<'a>(&self, board: &'a Board, title: &str) -> Result<&'a Column> {
        let title_lower = title.to_lowercase();

        if let Some(column) = board.columns.iter().find(|c| c.title.to_lowercase() == title_lower) {
            return Ok(column);
        }

        let matches: Vec<&Column> = board
            .columns
            .iter()
            .filter(|c| c.title.to_lowercase().starts_with(&title_lower))
            .collect();

        match matches.len() {
            0 => bail!("No column matching '{}' on board '{}'", title, board.name),
            1 => Ok(matches[0]),
            _ => bail!("Ambiguous column name '{}'", title),
        }
    }
}
