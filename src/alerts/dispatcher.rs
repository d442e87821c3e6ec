use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use super::media_server::{MediaServer, ServerError};
use super::notifier::Notifier;
use super::speaker::{Speaker, SpeakerError};
use crate::config::Config;
use crate::device::{DeviceError, DeviceManager};

pub const AUDIO_MIME_TYPE: &str = "audio/mp3";

/// Where the alert audio comes from and how it is exposed
#[derive(Debug, Clone)]
pub struct AlertSettings {
    /// Interface whose address the speaker fetches the audio from
    pub interface: String,
    pub bind_addr: String,
    pub htdocs: PathBuf,
    pub audio_file: String,
}

impl From<&Config> for AlertSettings {
    fn from(config: &Config) -> Self {
        Self {
            interface: config.interface.clone(),
            bind_addr: config.media_bind_addr(),
            htdocs: config.htdocs.clone(),
            audio_file: config.audio_file.clone(),
        }
    }
}

/// Plays the alert sound on a network speaker
pub struct AlertDispatcher {
    device: Arc<dyn DeviceManager>,
    speaker: Arc<dyn Speaker>,
    settings: AlertSettings,
}

impl AlertDispatcher {
    pub fn new(
        device: Arc<dyn DeviceManager>,
        speaker: Arc<dyn Speaker>,
        settings: AlertSettings,
    ) -> Self {
        Self {
            device,
            speaker,
            settings,
        }
    }

    /// Serve the audio file, tell the speaker to play it, then tear the server down.
    ///
    /// The server is stopped whether or not the play command succeeded.
    pub async fn dispatch(&self, notifier: &Notifier) -> Result<(), AlertError> {
        let host = self
            .device
            .interface_address(&self.settings.interface)
            .await?;

        let mut server = MediaServer::new(
            self.settings.bind_addr.clone(),
            self.settings.htdocs.clone(),
            self.settings.audio_file.clone(),
        );
        let bound = server.start().await?;
        notifier.status(&format!("starting server on port {}", bound.port()));

        let url = media_url(host, bound, &self.settings.audio_file);
        let played = self.speaker.play_media(&url, AUDIO_MIME_TYPE).await;

        server.stop().await;
        notifier.status(&format!("stopping server on port {}", bound.port()));

        played?;
        Ok(())
    }
}

/// URL the speaker uses to fetch the audio from this device
pub fn media_url(host: Ipv4Addr, bound: SocketAddr, file_name: &str) -> String {
    format!("http://{}:{}/{}", host, bound.port(), file_name)
}

/// Alert path errors
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to discover local address: {0}")]
    Device(#[from] DeviceError),

    #[error("Failed to start media server: {0}")]
    Server(#[from] ServerError),

    #[error("Failed to play alert: {0}")]
    Speaker(#[from] SpeakerError),
}
