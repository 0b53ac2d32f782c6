//! Ekko CLI entry point.

use anyhow::Result;
use clap::Parser;
use ekko::cli::{commands, Cli, Commands};
use ekko::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick up the API key from a local .env, if present
    dotenvy::dotenv().ok();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ekko={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    match &cli.command {
        Commands::Ask {
            document,
            question,
            audio,
            speak,
            top_k,
            model,
        } => {
            commands::run_ask(
                document,
                question.as_deref(),
                audio.as_deref(),
                speak.as_deref(),
                *top_k,
                model.clone(),
                settings,
            )
            .await?;
        }

        Commands::Search {
            document,
            query,
            top_k,
        } => {
            commands::run_search(document, query, *top_k, settings).await?;
        }

        Commands::Chunks { document, size } => {
            commands::run_chunks(document, *size, &settings)?;
        }

        Commands::Chat { document, model } => {
            commands::run_chat(document, model.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
