use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.store.get_bookmark_stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            let doc = app.store.snapshot();
            println!("Bookmarks:  {}", stats.total);
            println!("Favorites:  {}", stats.favorites);
            println!("Archived:   {}", stats.archived);
            println!("Folders:    {}", stats.folders);

            if !stats.by_collection.is_empty() {
                println!("\nBy collection:");
                for (id, count) in &stats.by_collection {
                    // Dangling ids count as their raw id
                    let name = doc
                        .collections
                        .iter()
                        .find(|c| &c.id == id)
                        .map(|c| c.name.as_str())
                        .unwrap_or(id.as_str());
                    println!("  {:<24} {}", name, count);
                }
            }

            let cards: usize = doc.boards.iter().flat_map(|b| &b.columns).map(|c| c.cards.len()).sum();
            println!("\nBoards: {}  Cards: {}  Notes: {}", doc.boards.len(), cards, doc.notes.len());
        }
    }

    Ok(())
}
