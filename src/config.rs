use std::path::PathBuf;
use std::time::Duration;

/// Probe targets checked after every configuration change
pub const DEFAULT_HOSTS: &[&str] = &["https://www.cisco.com", "https://www.google.com"];
pub const DEFAULT_CAST_ADDR: &str = "192.168.101.103";
pub const DEFAULT_CAST_PORT: u16 = 8009;
pub const DEFAULT_MEDIA_PORT: u16 = 45114;
pub const DEFAULT_AUDIO_FILE: &str = "Future_Gladiator.mp3";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URLs probed in order
    pub hosts: Vec<String>,
    /// Per-request timeout for every probe
    pub timeout_secs: u64,
    /// Cast speaker address
    pub cast_addr: String,
    pub cast_port: u16,
    /// Bind host of the local media server
    pub media_host: String,
    pub media_port: u16,
    /// Directory holding the alert audio file
    pub htdocs: PathBuf,
    pub audio_file: String,
    /// Interface whose address is advertised to the speaker
    pub interface: String,
    /// Program used to run commands on the host device
    pub host_cli: String,
    pub syslog_facility: String,
    pub syslog_mnemonic: String,
}

impl Config {
    /// Create a config from environment variables
    /// CONF_CHECK_HOSTS=https://a.example,https://b.example
    /// CONF_CHECK_TIMEOUT_SECS=1
    /// CONF_CHECK_CAST_ADDR=192.168.101.103
    /// CONF_CHECK_CAST_PORT=8009
    /// CONF_CHECK_MEDIA_HOST=0.0.0.0
    /// CONF_CHECK_MEDIA_PORT=45114
    /// CONF_CHECK_HTDOCS=/path/to/htdocs
    /// CONF_CHECK_AUDIO_FILE=Future_Gladiator.mp3
    /// CONF_CHECK_INTERFACE=gi2
    /// CONF_CHECK_HOST_CLI=dohost
    /// CONF_CHECK_SYSLOG_FACILITY=PYTHON
    /// CONF_CHECK_SYSLOG_MNEMONIC=CONF_CHECK
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let hosts = lookup("CONF_CHECK_HOSTS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.hosts);

        let config = Self {
            hosts,
            timeout_secs: parse_var(&lookup, "CONF_CHECK_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_secs),
            cast_addr: lookup("CONF_CHECK_CAST_ADDR").unwrap_or(defaults.cast_addr),
            cast_port: parse_var(&lookup, "CONF_CHECK_CAST_PORT")?.unwrap_or(defaults.cast_port),
            media_host: lookup("CONF_CHECK_MEDIA_HOST").unwrap_or(defaults.media_host),
            media_port: parse_var(&lookup, "CONF_CHECK_MEDIA_PORT")?
                .unwrap_or(defaults.media_port),
            htdocs: lookup("CONF_CHECK_HTDOCS")
                .map(PathBuf::from)
                .unwrap_or(defaults.htdocs),
            audio_file: lookup("CONF_CHECK_AUDIO_FILE").unwrap_or(defaults.audio_file),
            interface: lookup("CONF_CHECK_INTERFACE").unwrap_or(defaults.interface),
            host_cli: lookup("CONF_CHECK_HOST_CLI").unwrap_or(defaults.host_cli),
            syslog_facility: lookup("CONF_CHECK_SYSLOG_FACILITY")
                .unwrap_or(defaults.syslog_facility),
            syslog_mnemonic: lookup("CONF_CHECK_SYSLOG_MNEMONIC")
                .unwrap_or(defaults.syslog_mnemonic),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the checks cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Address the media server binds to
    pub fn media_bind_addr(&self) -> String {
        format!("{}:{}", self.media_host, self.media_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect(),
            timeout_secs: 1,
            cast_addr: DEFAULT_CAST_ADDR.to_string(),
            cast_port: DEFAULT_CAST_PORT,
            media_host: "0.0.0.0".to_string(),
            media_port: DEFAULT_MEDIA_PORT,
            htdocs: default_htdocs(),
            audio_file: DEFAULT_AUDIO_FILE.to_string(),
            interface: "gi2".to_string(),
            host_cli: "dohost".to_string(),
            syslog_facility: "PYTHON".to_string(),
            syslog_mnemonic: "CONF_CHECK".to_string(),
        }
    }
}

/// `htdocs` next to the running executable, or relative to the working directory
fn default_htdocs() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("htdocs")))
        .unwrap_or_else(|| PathBuf::from("htdocs"))
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Host list is empty")]
    NoHosts,

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}
