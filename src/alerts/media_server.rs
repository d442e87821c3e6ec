use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

/// How long `stop` waits for in-flight transfers before aborting them
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Minimal HTTP server exposing a single static file
pub struct MediaServer {
    bind_addr: String,
    root: PathBuf,
    file_name: String,
    running: Option<Running>,
}

struct Running {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl MediaServer {
    pub fn new(
        bind_addr: impl Into<String>,
        root: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            root: root.into(),
            file_name: file_name.into(),
            running: None,
        }
    }

    /// Build the router serving the file at `/<file_name>`
    pub fn router(&self) -> Router {
        let path = format!("/{}", self.file_name);
        Router::new()
            .route_service(&path, ServeFile::new(self.root.join(&self.file_name)))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the listener and start accepting connections in the background
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(running) = &self.running {
            return Err(ServerError::AlreadyRunning(running.local_addr));
        }

        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.bind_addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: self.bind_addr.clone(),
            source,
        })?;

        let app = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Media server failed");
            }
        });

        tracing::info!(addr = %local_addr, root = %self.root.display(), "Media server listening");
        self.running = Some(Running {
            local_addr,
            shutdown_tx,
            handle,
        });
        Ok(local_addr)
    }

    /// Stop accepting connections; returns once the server task has ended
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown_tx.send(());
        let mut handle = running.handle;
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
            tracing::warn!(addr = %running.local_addr, "Media server did not drain in time, aborting");
            handle.abort();
        }
        tracing::info!(addr = %running.local_addr, "Media server stopped");
    }

    /// Address the listener is bound to, while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl Drop for MediaServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }
}

/// Media server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server already running on {0}")]
    AlreadyRunning(SocketAddr),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn htdocs() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alert.mp3"), b"ID3-not-really-audio").unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"hidden").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_router_serves_only_the_asset() {
        let dir = htdocs();
        let server = MediaServer::new("127.0.0.1:0", dir.path(), "alert.mp3");

        let response = server
            .router()
            .oneshot(Request::builder().uri("/alert.mp3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = server
            .router()
            .oneshot(Request::builder().uri("/secret.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_start_serve_stop() {
        let dir = htdocs();
        let mut server = MediaServer::new("127.0.0.1:0", dir.path(), "alert.mp3");

        let addr = server.start().await.unwrap();
        assert!(server.is_running());
        assert_eq!(server.local_addr(), Some(addr));

        let body = reqwest::get(format!("http://{}/alert.mp3", addr))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(&body[..], b"ID3-not-really-audio");

        server.stop().await;
        assert!(!server.is_running());
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let dir = htdocs();
        let mut server = MediaServer::new("127.0.0.1:0", dir.path(), "alert.mp3");

        server.start().await.unwrap();
        assert!(matches!(
            server.start().await,
            Err(ServerError::AlreadyRunning(_))
        ));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_stop_when_not_started() {
        let dir = htdocs();
        let mut server = MediaServer::new("127.0.0.1:0", dir.path(), "alert.mp3");
        server.stop().await;
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let dir = htdocs();
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let mut server = MediaServer::new(addr.to_string(), dir.path(), "alert.mp3");
        assert!(matches!(server.start().await, Err(ServerError::Bind { .. })));
    }
}
