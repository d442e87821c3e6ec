use super::{CheckKind, Probe};
use crate::alerts::Notifier;

/// Probe every URL in order, stopping at the first failure.
///
/// Returns `true` only if every URL passed. Each outcome is reported through
/// the notifier; failures mirror a sanitized line without error detail.
pub async fn run_check<P>(probe: &P, urls: &[String], notifier: &Notifier) -> bool
where
    P: Probe + ?Sized,
{
    let label = probe.kind().label();

    for url in urls {
        match probe.probe(url).await {
            Ok(()) => {
                notifier.status(&format!("{} check for url {} ... passed!", label, url));
            }
            Err(e) => {
                let console = format!(
                    "{} check for url {} ... failed: {}: {}",
                    label,
                    url,
                    e.kind(),
                    e
                );
                // DNS failures go to the device log without the error class
                let sink = match probe.kind() {
                    CheckKind::Dns => format!("{} check for url {} ... failed", label, url),
                    CheckKind::Web => format!(
                        "{} check for url {} ... failed due to {}",
                        label,
                        url,
                        e.kind()
                    ),
                };
                notifier.report_split(&console, &sink).await;
                return false;
            }
        }
    }

    notifier.report(probe.kind().summary()).await;
    true
}

/// Ordered set of checks that must all pass
pub struct CheckBatch {
    probes: Vec<Box<dyn Probe>>,
}

impl CheckBatch {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Append a check to the batch
    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Run the checks in order; later checks are skipped once one fails
    pub async fn run(&self, urls: &[String], notifier: &Notifier) -> bool {
        for probe in &self.probes {
            if !run_check(probe.as_ref(), urls, notifier).await {
                tracing::info!(check = probe.kind().label(), "Check failed");
                return false;
            }
        }
        true
    }
}

impl Default for CheckBatch {
    fn default() -> Self {
        Self::new()
    }
}
