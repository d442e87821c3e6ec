use crate::alerts::{AlertDispatcher, AlertError, Notifier};
use crate::checks::CheckBatch;

pub const NETWORK_ERROR: &str = "Network Error!";

/// Switches taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Play the alert on the speaker when checks fail
    pub alert: bool,
    /// Mirror status lines to the device log
    pub syslog: bool,
}

/// Result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed { alerted: bool },
}

/// Run the check batch and, on failure, report it and optionally sound the alert
pub async fn run(
    batch: &CheckBatch,
    hosts: &[String],
    notifier: &Notifier,
    dispatcher: Option<&AlertDispatcher>,
) -> Result<Outcome, AlertError> {
    if batch.run(hosts, notifier).await {
        return Ok(Outcome::Passed);
    }

    notifier.report(NETWORK_ERROR).await;

    match dispatcher {
        Some(dispatcher) => {
            dispatcher.dispatch(notifier).await?;
            Ok(Outcome::Failed { alerted: true })
        }
        None => Ok(Outcome::Failed { alerted: false }),
    }
}
