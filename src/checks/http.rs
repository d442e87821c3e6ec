use std::time::Duration;

use async_trait::async_trait;

use super::{CheckKind, Probe, ProbeError};

/// Issues a GET to each URL and requires a 2xx answer
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        Ok(Self {
            http_client,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else if err.is_connect() {
            ProbeError::Connection(err.to_string())
        } else if err.is_builder() {
            ProbeError::InvalidUrl(err.to_string())
        } else {
            ProbeError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn kind(&self) -> CheckKind {
        CheckKind::Web
    }

    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(format!("{} returned status {}", url, status)));
        }

        tracing::debug!(url = %url, status = %status, "Web probe succeeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    async fn spawn_target() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_success_status_passes() {
        let base = spawn_target().await;
        let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();
        assert!(probe.probe(&format!("{}/ok", base)).await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_fails() {
        let base = spawn_target().await;
        let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();
        let err = probe.probe(&format!("{}/missing", base)).await.unwrap_err();
        assert_eq!(err.kind(), "HTTPError");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let base = spawn_target().await;
        let probe = HttpProbe::new(Duration::from_millis(200)).unwrap();
        let err = probe.probe(&format!("{}/slow", base)).await.unwrap_err();
        assert_eq!(err.kind(), "Timeout");
    }

    #[tokio::test]
    async fn test_refused_connection_fails() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();
        let err = probe.probe(&format!("http://{}/", addr)).await.unwrap_err();
        assert_eq!(err.kind(), "ConnectionError");
    }

    #[tokio::test]
    async fn test_unparseable_url_fails() {
        let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();
        let err = probe.probe("not a url").await.unwrap_err();
        assert_eq!(err.kind(), "InvalidUrl");
    }
}
