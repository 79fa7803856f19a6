use anyhow::{bail, Result};

use carbon_lib::sync::{SyncMode, SyncOutcome};

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let engine = app.sync_engine()?;

    let outcome = if engine.check_account().await {
        engine.run(SyncMode::Full).await
    } else {
        SyncOutcome::Failed(
            app.store
                .sync_status()
                .error
                .unwrap_or_else(|| "Cloud account unavailable".to_string()),
        )
    };
    let status = app.store.sync_status();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Plain => match &outcome {
            SyncOutcome::Synced { updated_local: true } => println!("Synced: took newer data from the cloud"),
            SyncOutcome::Synced { updated_local: false } => println!("Synced"),
            SyncOutcome::Skipped => println!("Another sync is in progress"),
            SyncOutcome::Failed(_) => {}
        },
    }

    if let SyncOutcome::Failed(message) = outcome {
        bail!("Sync failed: {}", message);
    }
    Ok(())
}
