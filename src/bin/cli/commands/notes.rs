use anyhow::Result;

use carbon_lib::store::filter_notes;

use crate::app::App;
use crate::render::terminal::{first_line, paint, truncate, Color};
use crate::OutputFormat;

pub fn run(app: &App, search: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let notes = filter_notes(&app.store.snapshot(), search.unwrap_or_default());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        OutputFormat::Plain => {
            if notes.is_empty() {
                println!("No notes found.");
                return Ok(());
            }

            for note in &notes {
                let pin = if note.is_pinned { "\u{1f4cc} " } else { "  " };
                let title = if note.title.is_empty() { "Untitled" } else { note.title.as_str() };
                println!(
                    "{}{} {}",
                    pin,
                    paint(title, Color::BOLD, use_color),
                    paint(&note.updated_at.format("%Y-%m-%d %H:%M").to_string(), Color::GRAY, use_color),
                );
                let preview = first_line(&note.content);
                if !preview.is_empty() {
                    println!("    {}", truncate(preview, 70));
                }
            }
        }
    }

    Ok(())
}
