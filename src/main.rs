//! conf-check
//!
//! Run with: conf-check [--chromecast] [--syslog]
//!
//! Configuration comes from CONF_CHECK_* environment variables (see
//! `Config::from_env`). RUST_LOG controls diagnostics on stderr
//! (default: conf_check=info,tower_http=info).

use std::sync::Arc;

use clap::Parser;
use conf_check::alerts::{AlertDispatcher, AlertSettings, CastSpeaker, Notifier};
use conf_check::checks::{CheckBatch, DnsProbe, HttpProbe};
use conf_check::device::{DeviceManager, HostCli};
use conf_check::{Config, Options, Outcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Perform network checks and play an alert on a Cast speaker if they fail
#[derive(Debug, Parser)]
struct Cli {
    /// Play music using Chromecast if the checks fail
    #[arg(long)]
    chromecast: bool,

    /// Send syslog informational messages
    #[arg(long)]
    syslog: bool,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Options {
            alert: cli.chromecast,
            syslog: cli.syslog,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging on stderr; stdout carries the status lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conf_check=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Flags from the command line, everything else from the environment
    let options = Options::from(&Cli::parse());
    let config = Config::from_env()?;

    tracing::debug!(
        hosts = ?config.hosts,
        timeout_secs = config.timeout_secs,
        alert = options.alert,
        syslog = options.syslog,
        "conf-check starting"
    );

    // Host device channel, shared by the log sink and the alert path
    let device: Arc<dyn DeviceManager> = Arc::new(HostCli::new(
        config.host_cli.clone(),
        config.syslog_facility.clone(),
        config.syslog_mnemonic.clone(),
    ));

    let mut notifier = Notifier::new();
    if options.syslog {
        notifier = notifier.with_sink(Arc::clone(&device));
    }

    // DNS first, then HTTP; more checks can be appended here
    let batch = CheckBatch::new()
        .with_probe(Box::new(DnsProbe::new(config.timeout())))
        .with_probe(Box::new(HttpProbe::new(config.timeout())?));

    // Only build the speaker client when the alert is enabled
    let dispatcher = options.alert.then(|| {
        AlertDispatcher::new(
            Arc::clone(&device),
            Arc::new(CastSpeaker::new(config.cast_addr.clone(), config.cast_port)),
            AlertSettings::from(&config),
        )
    });

    let outcome = conf_check::run(&batch, &config.hosts, &notifier, dispatcher.as_ref()).await?;
    tracing::debug!(?outcome, "conf-check finished");

    if let Outcome::Failed { alerted } = outcome {
        tracing::info!(alerted, "Checks failed");
    }

    Ok(())
}
