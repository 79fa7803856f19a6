mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use carbon_lib::store::SortBy;

#[derive(Parser)]
#[command(name = "carbon-cli", about = "Carbon boards, bookmarks and notes CLI", version)]
struct Cli {
    /// Use a specific config file (default: config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show a board with its columns and cards
    Boards {
        /// Board name (default: active board)
        board: Option<String>,
    },

    /// List bookmarks
    Bookmarks {
        /// Collection id: all, favorites, archive or a custom one
        #[arg(long, default_value = "all")]
        collection: String,
        /// Only bookmarks with this tag key
        #[arg(long)]
        tag: Option<String>,
        /// Search title, description and URL
        #[arg(long)]
        search: Option<String>,
        /// Sort order: date, title or domain
        #[arg(long, default_value = "date")]
        sort: SortBy,
    },

    /// List notes, pinned first
    Notes {
        /// Search title and content
        #[arg(long)]
        search: Option<String>,
    },

    /// List default and custom tags
    Tags,

    /// Bookmark counts
    Stats,

    /// Print where the data is stored
    Path,

    /// Add a card to a column of a board
    AddCard {
        /// Column title (case-insensitive prefix match)
        column: String,
        /// Card title
        title: String,
        /// Board name (default: active board)
        #[arg(long)]
        board: Option<String>,
    },

    /// Save a bookmark
    AddBookmark {
        url: String,
        /// Title (defaults to the URL's host)
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tag keys
        #[arg(long)]
        tags: Option<String>,
        /// Custom collection id
        #[arg(long)]
        collection: Option<String>,
    },

    /// Create a note
    AddNote {
        title: String,
        /// Note text (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// Create a custom tag
    Tag {
        name: String,
        #[arg(long, default_value = "#6b7280")]
        color: String,
    },

    /// Run one full sync with the configured provider
    Sync,
}

/// Read content from stdin if piped, or resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    let read_stdin = || {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
        buf
    };

    match content.as_deref() {
        Some("-") => Some(read_stdin()),
        Some(_) => content,
        None if !std::io::stdin().is_terminal() => {
            let buf = read_stdin();
            if buf.is_empty() { None } else { Some(buf) }
        }
        None => None,
    }
}

/// Split a comma-separated list, dropping empty entries
fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref()).await?;

    match cli.command {
        Command::Boards { board } => {
            commands::boards::run(&app, board.as_deref(), &cli.format, use_color)?;
        }
        Command::Bookmarks { collection, tag, search, sort } => {
            commands::bookmarks::run(
                &app,
                &collection,
                tag.as_deref(),
                search.as_deref(),
                sort,
                &cli.format,
                use_color,
            )?;
        }
        Command::Notes { search } => {
            commands::notes::run(&app, search.as_deref(), &cli.format, use_color)?;
        }
        Command::Tags => {
            commands::tags::run(&app, &cli.format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Path => {
            println!("{}", app.store.data_location());
        }
        Command::AddCard { column, title, board } => {
            commands::add::run_card(&app, board.as_deref(), &column, &title, &cli.format).await?;
        }
        Command::AddBookmark { url, title, tags, collection } => {
            commands::add::run_bookmark(
                &app,
                &url,
                title,
                split_list(tags.as_deref()),
                collection,
                &cli.format,
            )
            .await?;
        }
        Command::AddNote { title, content } => {
            let content = resolve_content(content).unwrap_or_default();
            commands::add::run_note(&app, &title, &content, &cli.format).await?;
        }
        Command::Tag { name, color } => {
            commands::tags::run_create(&app, &name, &color, &cli.format).await?;
        }
        Command::Sync => {
            commands::sync::run(&app, &cli.format).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("docs, rust,,tool ")), vec!["docs", "rust", "tool"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_parse_add_bookmark() {
        let cli = Cli::try_parse_from([
            "carbon-cli",
            "--format",
            "json",
            "add-bookmark",
            "https://example.com",
            "--tags",
            "docs",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Command::AddBookmark { ref url, .. } if url == "https://example.com"));
    }
}
