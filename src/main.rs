//! Spendboard main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use spendboard_api::{start_server, AppState};
use spendboard_config::Config;
use spendboard_core::export_all;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "spendboard")]
#[command(author = "Spendboard Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Spending dashboard backend with paginated CSV export", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Sweep the spending feed once and write the CSV to a file
    Export {
        /// Output file; defaults to the configured export filename
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a default configuration file
    InitConfig,
}

fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::InitConfig) = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = Config::load_optional(&args.config).map_err(|e| {
        let details = e.to_details();
        for suggestion in &details.suggestions {
            eprintln!("hint: {}", suggestion);
        }
        anyhow::anyhow!(e)
    })?;
    let from_file = loaded.is_some();
    let config = loaded.unwrap_or_default();

    init_logging(&config.logging.level);
    if from_file {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    let state = AppState::from_config(config).context("failed to set up upstream sources")?;

    match args.command {
        Some(Command::Export { output }) => {
            let path = output.unwrap_or_else(|| PathBuf::from(&state.config.export.filename));
            let deadline = Duration::from_secs(state.config.export.deadline_secs);
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| state.config.export.filename.clone());

            let download = export_all(state.export_source.as_ref(), &filename, deadline)
                .await
                .with_context(|| format!("export from {} failed", state.export_source.name()))?;
            tokio::fs::write(&path, download.body.as_bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Wrote {} ({} bytes)", path.display(), download.body.len());
        }
        _ => start_server(state).await?,
    }

    Ok(())
}
