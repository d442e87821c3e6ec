//! conf-check: post-change network health checks
//!
//! Run after every configuration change on a network device. Verifies that a
//! fixed list of hosts resolves in DNS and answers over HTTP, and on failure
//! reports it (console and, optionally, the device log) and can play an
//! audible alert on a Cast speaker.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use conf_check::alerts::Notifier;
//! use conf_check::checks::{CheckBatch, DnsProbe, HttpProbe};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let timeout = Duration::from_secs(1);
//! let batch = CheckBatch::new()
//!     .with_probe(Box::new(DnsProbe::new(timeout)))
//!     .with_probe(Box::new(HttpProbe::new(timeout)?));
//!
//! let hosts = vec!["https://www.cisco.com".to_string()];
//! let passed = batch.run(&hosts, &Notifier::new()).await;
//! println!("passed: {}", passed);
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod app;
pub mod checks;
pub mod config;
pub mod device;

pub use app::{run, Options, Outcome};
pub use config::{Config, ConfigError};
