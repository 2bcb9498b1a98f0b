use std::process::ExitCode;

use clap::Parser;
use storage::JsonFileStore;

use crate::{cli::Cli, error::Result, settings::Settings};

mod cli;
mod commands;
mod error;
mod lookup;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "billkeeper={level},storage={level},notify={level},export={level}",
            level = settings.app.level
        ))
        .init();

    let dir = cli.data_dir.unwrap_or(settings.storage.dir);
    tracing::debug!("using store in {}", dir.display());
    let mut store = JsonFileStore::new(dir);

    let today = chrono::Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();
    commands::execute(
        cli.command,
        &mut store,
        settings.mail.as_ref(),
        today,
        &mut stdout,
    )
    .await
}
