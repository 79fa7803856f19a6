use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, priority_badge, Color};
use crate::OutputFormat;

pub fn run(app: &App, board_name: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let board = app.find_board(board_name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        OutputFormat::Plain => {
            let doc = app.store.snapshot();
            for other in &doc.boards {
                let marker = if other.id == board.id { "* " } else { "  " };
                println!("{}{}", marker, other.name);
            }
            println!();

            for column in &board.columns {
                let header = format!("{} ({})", column.title, column.cards.len());
                println!("{}", paint(&header, Color::BOLD, use_color));

                if column.cards.is_empty() {
                    println!("    (empty)");
                }
                for card in &column.cards {
                    let mut line = format!("    - {}", card.title);
                    let badge = priority_badge(card.priority, use_color);
                    if !badge.is_empty() {
                        line.push(' ');
                        line.push_str(&badge);
                    }
                    if !card.labels.is_empty() {
                        let labels = card.labels.iter().map(|l| format!("#{}", l)).collect::<Vec<_>>().join(" ");
                        line.push(' ');
                        line.push_str(&paint(&labels, Color::CYAN, use_color));
                    }
                    if !card.checklist.is_empty() {
                        let done = card.checklist.iter().filter(|i| i.completed).count();
                        line.push_str(&format!(" [{}/{}]", done, card.checklist.len()));
                    }
                    println!("{}", line);
                }
                println!();
            }

            if !board.archived_cards.is_empty() {
                println!("{} archived card(s)", board.archived_cards.len());
            }
        }
    }

    Ok(())
}
