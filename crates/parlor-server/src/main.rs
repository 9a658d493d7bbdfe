//! # parlor
//!
//! Parlor server binary — wires storage, completion, mail, and the turn
//! engine together and starts the HTTP server.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use parlor_engine::TurnEngine;
use parlor_llm::{CompletionClient, CompletionConfig, assemble_system_prompt};
use parlor_mailer::{DisabledTransport, MailTransport, MailgunClient, NotificationDispatcher};
use parlor_server::logging;
use parlor_server::routes::{AppState, router};
use parlor_server::settings::ParlorSettings;
use parlor_store::{ChatStore, open_pool};

/// Parlor chat widget backend.
#[derive(Parser, Debug)]
#[command(name = "parlor", about = "Parlor chat widget backend")]
struct Cli {
    /// Path to a JSON settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Directory of prompt fragments (overrides settings).
    #[arg(long)]
    prompts_dir: Option<PathBuf>,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_subscriber("info");

    let cli = Cli::parse();
    let mut settings = ParlorSettings::load(cli.settings.as_deref());
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(db_path) = cli.db_path {
        settings.store.db_path = db_path;
    }
    if let Some(prompts_dir) = cli.prompts_dir {
        settings.prompts.dir = prompts_dir;
    }

    ensure_parent_dir(&settings.store.db_path)?;
    let pool = open_pool(&settings.store.db_path, settings.store.pool_size)
        .context("failed to open database")?;
    let store = Arc::new(ChatStore::new(pool));
    info!(db_path = %settings.store.db_path.display(), "database ready");

    // Assembled once at startup; immutable afterwards.
    let system_prompt = assemble_system_prompt(&settings.prompts.dir);
    info!(prompt_len = system_prompt.len(), "system prompt assembled");

    let completion = Arc::new(CompletionClient::new(CompletionConfig {
        base_url: settings.llm.base_url.clone(),
        model: settings.llm.model.clone(),
        api_key: settings.llm.api_key.clone(),
        max_tokens: settings.llm.max_tokens,
        temperature: settings.llm.temperature,
    }));

    let transport: Arc<dyn MailTransport> = if settings.mail.is_complete() {
        info!(domain = %settings.mail.domain, "mailgun transport configured");
        Arc::new(MailgunClient::new(settings.mail.clone()))
    } else {
        warn!("mailer not configured, notifications disabled");
        Arc::new(DisabledTransport)
    };
    let dispatcher = Arc::new(NotificationDispatcher::new(
        transport,
        settings.mail.clone(),
    ));

    let engine = Arc::new(TurnEngine::new(
        store,
        completion,
        dispatcher,
        system_prompt,
        settings.llm.history_limit,
    ));

    let state = AppState {
        engine,
        start_time: Instant::now(),
    };
    let app = router(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "parlor server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
