//! HTTP server assembly for Roster.
//!
//! Mounts the JSON API from `roster-api` under `/api`, adds a `/health`
//! probe and request tracing, and knows how to prepare a store from
//! [`ServerConfig`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Json, Router, routing::get};
use chrono::Utc;
use roster_core::{
  seed::{self, SeedConfig},
  store::HiringStore,
};
use roster_store_sqlite::SqliteStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Store path that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite file, or `:memory:`.
  pub store_path:    PathBuf,
  /// Clear the store and load a fresh fixture on every start.
  pub seed_on_start: bool,
  pub seed:          SeedConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".into(),
      port:          3000,
      store_path:    PathBuf::from("roster.db"),
      seed_on_start: true,
      seed:          SeedConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Open the configured store, creating parent directories as needed. A
/// leading `~` in the path is expanded.
pub async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
  if config.store_path == Path::new(IN_MEMORY) {
    return Ok(SqliteStore::open_in_memory().await?);
  }

  let path = expand_tilde(&config.store_path);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  tracing::info!(path = %path.display(), "opening store");
  Ok(SqliteStore::open(&path).await?)
}

/// Replace the store's contents with a freshly generated fixture.
pub async fn seed_store<S: HiringStore>(store: &S, config: &SeedConfig) -> Result<(), S::Error> {
  let data = seed::generate(config, &mut rand::thread_rng(), Utc::now());
  tracing::info!(
    jobs = data.jobs.len(),
    candidates = data.candidates.len(),
    events = data.timeline.len(),
    "seeding store"
  );
  store.load_fixture(data).await
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: `/api/*`, `/health`, and a tracing layer.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: HiringStore + 'static,
{
  Router::new()
    .nest("/api", roster_api::api_router(store))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> { Json(json!({ "status": "ok" })) }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or_default())
  }

  fn memory_config(seed: SeedConfig) -> ServerConfig {
    ServerConfig {
      store_path: PathBuf::from(IN_MEMORY),
      seed,
      ..ServerConfig::default()
    }
  }

  #[tokio::test]
  async fn health_and_api_are_mounted() {
    let store = open_store(&memory_config(SeedConfig::default())).await.unwrap();
    let app = app(Arc::new(store));

    let (status, body) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(app.clone(), "/api/jobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 0);

    let (status, _) = get(app, "/jobs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn seeding_uses_configured_sizes() {
    let config = memory_config(SeedConfig { jobs: 4, candidates: 30, assessments: 1 });
    let store = open_store(&config).await.unwrap();
    seed_store(&store, &config.seed).await.unwrap();

    let (_, stats) = get(app(Arc::new(store)), "/api/stats").await;
    assert_eq!(stats["totalJobs"], 4);
    assert_eq!(stats["totalCandidates"], 30);
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 8080\n[seed]\njobs = 5\n",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.seed_on_start);
    assert_eq!(cfg.seed.jobs, 5);
    assert_eq!(cfg.seed.candidates, 1000);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else {
      return;
    };
    assert_eq!(
      expand_tilde(Path::new("~/roster.db")),
      PathBuf::from(home).join("roster.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }
}
