use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use swaparoo_app::page_file::{document_from_text, render_swapped};
use swaparoo_app::{AppController, AppState};
use swaparoo_config::Config;
use swaparoo_core::{JsonFileStore, VocabularyStore};
use swaparoo_translator::DeepLProvider;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "swaparoo")]
#[command(about = "Vocabulary swapping background host")]
struct Args {
    /// Plain-text page to load into a tab; prints the swapped rendering and exits
    #[arg(long)]
    page: Option<PathBuf>,

    /// Hostname the page is served from
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Declared page language
    #[arg(long)]
    lang: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();
    tracing::info!(
        "Swaparoo {} -> {} via {}, state at {}",
        config.translator.source_lang,
        config.translator.target_lang,
        config.translator.provider,
        config.store.state_path.display()
    );

    let store = VocabularyStore::new(Arc::new(JsonFileStore::new(config.store.state_path.clone())));
    let translators = Arc::new(DeepLProvider::new(config.translator.api_url.clone()));
    let state = Arc::new(AppState::new(config, store, translators));

    let controller = AppController::new(state).await;
    let mut tasks = controller.spawn_tasks();

    if let Some(path) = args.page {
        let text = tokio::fs::read_to_string(&path).await?;
        let document = document_from_text(&args.host, args.lang.as_deref(), &text);

        let tab = controller.open_tab(1, document).await;
        let page = controller.close_tab(tab).await?;
        println!("{}", render_swapped(page.document()));

        controller.shutdown();
        while let Some(result) = tasks.join_next().await {
            result??;
        }
        return Ok(());
    }

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("request loop exited"),
                Ok(Err(e)) => tracing::error!("request loop failed: {e}"),
                Err(e) => tracing::error!("request loop panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;
    Ok(())
}
