//! Status line reporting

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::{DeviceManager, Severity};

/// Writes status lines to the console and optionally mirrors them to the device log
pub struct Notifier {
    console: Mutex<Box<dyn Write + Send>>,
    sink: Option<Arc<dyn DeviceManager>>,
}

impl Notifier {
    /// Create a notifier printing to stdout with no external sink
    pub fn new() -> Self {
        Self::with_console(Box::new(std::io::stdout()))
    }

    /// Create a notifier printing to the given writer
    pub fn with_console(console: Box<dyn Write + Send>) -> Self {
        Self {
            console: Mutex::new(console),
            sink: None,
        }
    }

    /// Mirror reported lines to the device log
    pub fn with_sink(mut self, sink: Arc<dyn DeviceManager>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Print a line on the console only
    pub fn status(&self, message: &str) {
        let mut console = self.console.lock();
        if let Err(e) = writeln!(console, "{}", message).and_then(|_| console.flush()) {
            tracing::warn!(error = %e, "Failed to write status line");
        }
    }

    /// Print a line and mirror it unchanged to the sink
    pub async fn report(&self, message: &str) {
        self.report_split(message, message).await;
    }

    /// Print the detailed line, mirror the sanitized one to the sink
    pub async fn report_split(&self, console: &str, sink: &str) {
        self.status(console);

        if let Some(device) = &self.sink {
            if let Err(e) = device.emit_log(sink, Severity::Informational).await {
                tracing::warn!(error = %e, message = %sink, "Failed to send log message to device");
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeDevice, SharedBuffer};
    use super::*;

    #[tokio::test]
    async fn test_report_without_sink() {
        let console = SharedBuffer::default();
        let notifier = Notifier::with_console(Box::new(console.clone()));

        notifier.report("Network Error!").await;

        assert_eq!(console.lines(), vec!["Network Error!"]);
    }

    #[tokio::test]
    async fn test_report_mirrors_to_sink() {
        let console = SharedBuffer::default();
        let device = Arc::new(FakeDevice::default());
        let notifier =
            Notifier::with_console(Box::new(console.clone())).with_sink(device.clone());

        notifier
            .report_split("Web check ... failed: Timeout: slow", "Web check ... failed due to Timeout")
            .await;
        notifier.status("console only");

        assert_eq!(
            console.lines(),
            vec!["Web check ... failed: Timeout: slow", "console only"]
        );
        let logs = device.logs.lock().clone();
        assert_eq!(
            logs,
            vec![("Web check ... failed due to Timeout".to_string(), Severity::Informational)]
        );
    }

    #[tokio::test]
    async fn test_sink_failure_is_not_fatal() {
        let console = SharedBuffer::default();
        let device = Arc::new(FakeDevice {
            fail_logs: true,
            ..FakeDevice::default()
        });
        let notifier =
            Notifier::with_console(Box::new(console.clone())).with_sink(device.clone());

        notifier.report("Network Error!").await;

        assert_eq!(console.lines(), vec!["Network Error!"]);
        assert!(device.logs.lock().is_empty());
    }
}
