//! Local HTTP server for the LAZY history store.
//!
//! Loads [`ServerConfig`], and wraps the [`lazy_api`] router with request
//! tracing. The binary in `main.rs` wires these to a [`lazy_store_sqlite`]
//! store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use lazy_core::store::RecordStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5233;
pub const DEFAULT_STORE_PATH: &str = "~/.lazy/lazy_history.db";

/// Prefix for environment overrides, e.g. `LAZY_PORT=6000`.
pub const ENV_PREFIX: &str = "LAZY";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered from built-in defaults, an optional TOML file, then `LAZY_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Load configuration from `path` (which may not exist) and the environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  build_config(config::File::from(path.to_path_buf()).required(false))
}

fn build_config<F>(file: F) -> Result<ServerConfig, config::ConfigError>
where
  F: config::Source + Send + Sync + 'static,
{
  config::Config::builder()
    .set_default("host", DEFAULT_HOST)?
    .set_default("port", i64::from(DEFAULT_PORT))?
    .set_default("store_path", DEFAULT_STORE_PATH)?
    .add_source(file)
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with per-request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RecordStore + Send + Sync + 'static,
{
  lazy_api::api_router(store).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use lazy_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  fn from_toml(toml: &str) -> ServerConfig {
    build_config(config::File::from_str(toml, config::FileFormat::Toml)).unwrap()
  }

  #[test]
  fn defaults_apply_without_file() {
    let cfg = load_config(Path::new("/nonexistent/lazy/config.toml")).unwrap();
    // Environment overrides may be set on the test host; only check shape.
    assert!(!cfg.host.is_empty());
    assert!(!cfg.store_path.as_os_str().is_empty());
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
      port = 6100
      store_path = "/tmp/lazy-test.db"
      "#,
    );
    assert_eq!(cfg.port, 6100);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/lazy-test.db"));
  }

  #[test]
  fn address_joins_host_and_port() {
    let cfg = ServerConfig {
      host:       "127.0.0.1".into(),
      port:       5233,
      store_path: PathBuf::from(":memory:"),
    };
    assert_eq!(cfg.address(), "127.0.0.1:5233");
  }

  #[test]
  fn expand_tilde_leaves_absolute_paths() {
    let p = Path::new("/var/lib/lazy.db");
    assert_eq!(expand_tilde(p), p);
  }

  #[test]
  fn expand_tilde_uses_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/.lazy/lazy_history.db"));
    assert_eq!(expanded, PathBuf::from(home).join(".lazy/lazy_history.db"));
  }

  #[tokio::test]
  async fn app_serves_store_routes() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.initialize().await.unwrap();

    let req = Request::builder()
      .uri("/work-stories")
      .body(Body::empty())
      .unwrap();
    let resp = app(Arc::new(store)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
