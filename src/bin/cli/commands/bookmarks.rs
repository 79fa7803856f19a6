use anyhow::Result;

use carbon_lib::store::{filter_bookmarks, SortBy, ViewState};

use crate::app::App;
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    collection: &str,
    tag: Option<&str>,
    search: Option<&str>,
    sort_by: SortBy,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let view = ViewState {
        active_collection: collection.to_string(),
        active_tag: tag.map(str::to_string),
        search_query: search.unwrap_or_default().to_string(),
        sort_by,
        ..Default::default()
    };
    let bookmarks = filter_bookmarks(&app.store.snapshot(), &view);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&bookmarks)?);
        }
        OutputFormat::Plain => {
            if bookmarks.is_empty() {
                println!("No bookmarks found.");
                return Ok(());
            }

            for bookmark in &bookmarks {
                let star = if bookmark.is_favorite { "\u{2605} " } else { "  " };
                println!("{}{}", star, paint(&truncate(&bookmark.title, 60), Color::BOLD, use_color));
                println!("    {}", paint(&bookmark.url, Color::BLUE, use_color));
                if !bookmark.tags.is_empty() {
                    let tags = bookmark.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ");
                    println!("    {}", paint(&tags, Color::CYAN, use_color));
                }
            }

            println!("\n{} bookmarks", bookmarks.len());
        }
    }

    Ok(())
}
