use anyhow::{Context, Result};

use carbon_lib::store::NewBookmark;

use crate::app::App;
use crate::OutputFormat;

pub async fn run_card(
    app: &App,
    board_name: Option<&str>,
    column_title: &str,
    title: &str,
    format: &OutputFormat,
) -> Result<()> {
    let board = app.find_board(board_name)?;
    let column = app.find_column(&board, column_title)?;

    // Cards always land on the active board
    if app.store.snapshot().active_board.as_deref() != Some(board.id.as_str()) {
        app.store.set_active_board(&board.id).await;
    }

    let card = app
        .store
        .add_card(&column.id, title)
        .await?
        .context("Column disappeared while adding the card")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Added \"{}\" to {} / {}", card.title, board.name, column.title),
    }
    Ok(())
}

pub async fn run_bookmark(
    app: &App,
    url: &str,
    title: Option<String>,
    tags: Vec<String>,
    collection: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let bookmark = app
        .store
        .add_bookmark(NewBookmark {
            url: url.to_string(),
            title,
            tags,
            collection_id: collection,
            ..Default::default()
        })
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bookmark)?),
        OutputFormat::Plain => println!("Saved \"{}\" ({})", bookmark.title, bookmark.url),
    }
    Ok(())
}

pub async fn run_note(app: &App, title: &str, content: &str, format: &OutputFormat) -> Result<()> {
    let note = app.store.add_note(title, content).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&note)?),
        OutputFormat::Plain => println!("Created note \"{}\"", note.title),
    }
    Ok(())
}
