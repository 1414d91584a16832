use std::path::{Path, PathBuf};

use axum::Router;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("site root is not a directory: {path}")]
    MissingRoot { path: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerOptions {
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Port precedence: explicit flag, then the `PORT` environment value, then
/// the config file, then the default.
pub fn resolve_port(flag: Option<u16>, env: Option<&str>, config: Option<u16>) -> u16 {
    if let Some(port) = flag {
        return port;
    }
    if let Some(raw) = env.map(str::trim).filter(|s| !s.is_empty()) {
        match raw.parse::<u16>() {
            Ok(port) => return port,
            Err(_) => warn!(value = raw, "ignoring invalid PORT value"),
        }
    }
    config.unwrap_or(DEFAULT_PORT)
}

/// Static file routes for the site root. `/` is the entry page; everything
/// else maps onto files below the root.
pub fn router(root: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(root.join("index.html")))
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(options: ServerOptions) -> Result<(), ServeError> {
    if !options.root.is_dir() {
        return Err(ServeError::MissingRoot {
            path: options.root.display().to_string(),
        });
    }

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let display_host = if options.host == DEFAULT_HOST {
        "localhost"
    } else {
        options.host.as_str()
    };
    info!(
        root = %options.root.display(),
        "directory running at http://{}:{}", display_host, options.port
    );

    axum::serve(listener, router(&options.root))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| ServeError::Serve { source })?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>directory</h1>").unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data").join("source.json"), "[]").unwrap();
        dir
    }

    async fn get(root: &Path, uri: &str) -> (StatusCode, String) {
        let response = router(root)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn root_serves_entry_page() {
        let dir = site();
        let (status, body) = get(dir.path(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>directory</h1>");
    }

    #[tokio::test]
    async fn serves_data_document() {
        let dir = site();
        let (status, body) = get(dir.path(), "/data/source.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let dir = site();
        let (status, _) = get(dir.path(), "/api/organizations").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn port_precedence() {
        assert_eq!(resolve_port(Some(8080), Some("9000"), Some(7000)), 8080);
        assert_eq!(resolve_port(None, Some("9000"), Some(7000)), 9000);
        assert_eq!(resolve_port(None, Some("not-a-port"), Some(7000)), 7000);
        assert_eq!(resolve_port(None, Some(""), None), DEFAULT_PORT);
        assert_eq!(resolve_port(None, None, None), 3000);
    }

    #[tokio::test]
    async fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = serve(ServerOptions {
            root: dir.path().join("missing"),
            ..ServerOptions::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ServeError::MissingRoot { .. }));
    }
}
