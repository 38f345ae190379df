//! catedra server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid with
//! `CATEDRA_*` environment variables, opens the SQLite catalog store,
//! optionally bulk-loads a seed catalog, and serves the API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use catedra_api::{
  AppState, ServerConfig,
  exchange::{OAuthClient, OAuthConfig},
};
use catedra_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod seed;

#[derive(Parser)]
#[command(author, version, about = "catedra catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Bulk-load a JSON seed catalog before serving.
  #[arg(long)]
  seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration. Required fields missing from both the file and the
  // environment fail here, before anything touches the network or the disk.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CATEDRA"))
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store; the schema initialises idempotently.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  if let Some(path) = cli.seed {
    let loaded = seed::load(&store, &path)
      .await
      .with_context(|| format!("failed to load seed catalog from {path:?}"))?;
    tracing::info!(
      subjects = loaded.subjects,
      courses = loaded.courses,
      assignments = loaded.assignments,
      "seed catalog loaded"
    );
  }

  let oauth = OAuthClient::new(OAuthConfig {
    client_id:     server_cfg.oauth_client_id.clone(),
    client_secret: server_cfg.oauth_client_secret.clone(),
    token_url:     server_cfg.oauth_token_url.clone(),
  });

  // Build application state.
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg.clone()),
    oauth,
  };

  let app = catedra_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
