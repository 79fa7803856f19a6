use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let tags = app.store.get_all_tags();
    let counts = app.store.get_bookmark_stats().by_tag;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = tags
                .iter()
                .map(|(key, tag)| {
                    serde_json::json!({
                        "key": key,
                        "name": tag.name,
                        "color": tag.color,
                        "isDefault": tag.is_default,
                        "count": counts.get(key).copied().unwrap_or(0),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let max_key_len = tags.keys().map(|k| k.len()).max().unwrap_or(3).max(3);

            println!("{:<width$} Count", "Tag", width = max_key_len + 1);
            println!("{} {}", "\u{2500}".repeat(max_key_len + 1), "\u{2500}".repeat(6));

            for (key, tag) in &tags {
                let count = counts.get(key).copied().unwrap_or(0);
                let kind = if tag.is_default { "" } else { " (custom)" };
                println!(
                    "#{:<width$} {:>5}  {}{}",
                    key,
                    count,
                    paint(&tag.name, Color::DIM, use_color),
                    kind,
                    width = max_key_len
                );
            }

            println!("\n{} tags total", tags.len());
        }
    }

    Ok(())
}

pub async fn run_create(app: &App, name: &str, color: &str, format: &OutputFormat) -> Result<()> {
    let key = app.store.create_custom_tag(name, color).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "key": key, "name": name.trim(), "color": color }));
        }
        OutputFormat::Plain => {
            println!("Created tag #{}", key);
        }
    }

    Ok(())
}
