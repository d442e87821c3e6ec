//! Network speaker control

use std::time::Duration;

use async_trait::async_trait;
use rust_cast::channels::media::{Media, StreamType};
use rust_cast::channels::receiver::CastDeviceApp;
use rust_cast::CastDevice;

/// Receiver the platform connection is addressed to before an app is launched
const DEFAULT_DESTINATION_ID: &str = "receiver-0";

/// Upper bound on connecting to the speaker and issuing the load command
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can be told to play a media URL
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Issue a play command; does not wait for playback to finish
    async fn play_media(&self, url: &str, content_type: &str) -> Result<(), SpeakerError>;
}

/// Cast-protocol speaker at a fixed address
#[derive(Debug, Clone)]
pub struct CastSpeaker {
    host: String,
    port: u16,
    timeout: Duration,
}

impl CastSpeaker {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set how long the play command may take before it is abandoned
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Launch the default media receiver and load the URL into it
    fn load_blocking(host: String, port: u16, url: String, content_type: String) -> Result<(), SpeakerError> {
        let device = CastDevice::connect_without_host_verification(host.as_str(), port)
            .map_err(|e| SpeakerError::Connect(format!("{}:{}: {:?}", host, port, e)))?;

        device
            .connection
            .connect(DEFAULT_DESTINATION_ID)
            .map_err(|e| SpeakerError::Protocol(format!("{:?}", e)))?;
        device
            .heartbeat
            .ping()
            .map_err(|e| SpeakerError::Protocol(format!("{:?}", e)))?;

        let app = device
            .receiver
            .launch_app(&CastDeviceApp::DefaultMediaReceiver)
            .map_err(|e| SpeakerError::Protocol(format!("{:?}", e)))?;
        device
            .connection
            .connect(app.transport_id.as_str())
            .map_err(|e| SpeakerError::Protocol(format!("{:?}", e)))?;

        let media = Media {
            content_id: url,
            content_type,
            stream_type: StreamType::Buffered,
            duration: None,
            metadata: None,
        };
        device
            .media
            .load(app.transport_id.as_str(), app.session_id.as_str(), &media)
            .map_err(|e| SpeakerError::Protocol(format!("{:?}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl Speaker for CastSpeaker {
    async fn play_media(&self, url: &str, content_type: &str) -> Result<(), SpeakerError> {
        tracing::info!(speaker = %self.host, url = %url, "Sending play command");

        let host = self.host.clone();
        let port = self.port;
        let url = url.to_string();
        let content_type = content_type.to_string();

        // The blocking client has no connect timeout of its own; an abandoned
        // task finishes in the background once the socket gives up
        let task =
            tokio::task::spawn_blocking(move || Self::load_blocking(host, port, url, content_type));

        tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| SpeakerError::Timeout(self.timeout))?
            .map_err(|e| SpeakerError::Protocol(format!("cast task failed: {}", e)))?
    }
}

/// Speaker errors
#[derive(Debug, thiserror::Error)]
pub enum SpeakerError {
    #[error("Failed to connect to speaker {0}")]
    Connect(String),

    #[error("Speaker protocol error: {0}")]
    Protocol(String),

    #[error("Speaker did not accept the play command within {0:?}")]
    Timeout(Duration),
}
