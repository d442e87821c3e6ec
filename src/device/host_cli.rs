use std::net::Ipv4Addr;

use async_trait::async_trait;
use tokio::process::Command;

use super::{parse_ipv4, DeviceError, DeviceManager, Severity};

/// Runs commands on the host device through its CLI bridge
/// (`dohost` inside the guest shell).
#[derive(Debug, Clone)]
pub struct HostCli {
    program: String,
    facility: String,
    mnemonic: String,
}

impl HostCli {
    pub fn new(
        program: impl Into<String>,
        facility: impl Into<String>,
        mnemonic: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            facility: facility.into(),
            mnemonic: mnemonic.into(),
        }
    }

    /// Execute a single CLI command and return its standard output
    pub async fn exec(&self, command: &str) -> Result<String, DeviceError> {
        tracing::debug!(program = %self.program, command = %command, "Running host command");

        let output = Command::new(&self.program)
            .arg(command)
            .output()
            .await
            .map_err(|source| DeviceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DeviceError::CommandFailed {
                command: command.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn log_command(&self, message: &str, severity: Severity) -> String {
        format!(
            "send log facility {} severity {} mnemonics {} {}",
            self.facility,
            severity.level(),
            self.mnemonic,
            message
        )
    }
}

#[async_trait]
impl DeviceManager for HostCli {
    async fn interface_address(&self, name: &str) -> Result<Ipv4Addr, DeviceError> {
        let output = self.exec(&format!("show ip int bri {}", name)).await?;
        parse_ipv4(&output).ok_or_else(|| DeviceError::NoAddress(name.to_string()))
    }

    async fn emit_log(&self, message: &str, severity: Severity) -> Result<(), DeviceError> {
        self.exec(&self.log_command(message, severity)).await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_log_command_format() {
        let cli = HostCli::new("dohost", "PYTHON", "CONF_CHECK");
        assert_eq!(
            cli.log_command("Network Error!", Severity::Informational),
            "send log facility PYTHON severity 6 mnemonics CONF_CHECK Network Error!"
        );
    }

    #[tokio::test]
    async fn test_interface_address_parsed_from_output() {
        let dir = tempfile::tempdir().unwrap();
        let program = write_script(
            dir.path(),
            r#"[ "$1" = "show ip int bri gi2" ] || exit 1
echo "Interface              IP-Address      OK? Method Status   Protocol"
echo "GigabitEthernet2       10.10.20.48     YES NVRAM  up       up"
"#,
        );
        let cli = HostCli::new(program, "PYTHON", "CONF_CHECK");

        let addr = cli.interface_address("gi2").await.unwrap();
        assert_eq!(addr, Ipv4Addr::new(10, 10, 20, 48));
    }

    #[tokio::test]
    async fn test_interface_without_address() {
        let dir = tempfile::tempdir().unwrap();
        let program = write_script(dir.path(), "echo 'GigabitEthernet3 unassigned YES unset down'");
        let cli = HostCli::new(program, "PYTHON", "CONF_CHECK");

        let err = cli.interface_address("gi3").await.unwrap_err();
        assert!(matches!(err, DeviceError::NoAddress(name) if name == "gi3"));
    }

    #[tokio::test]
    async fn test_emit_log_passes_full_command() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("record.txt");
        let program = write_script(
            dir.path(),
            &format!(r#"printf '%s' "$1" > {}"#, record.display()),
        );
        let cli = HostCli::new(program, "PYTHON", "CONF_CHECK");

        cli.emit_log("All dns checks passed successfully!", Severity::Informational)
            .await
            .unwrap();

        let sent = std::fs::read_to_string(&record).unwrap();
        assert_eq!(
            sent,
            "send log facility PYTHON severity 6 mnemonics CONF_CHECK All dns checks passed successfully!"
        );
    }

    #[tokio::test]
    async fn test_failing_command() {
        let dir = tempfile::tempdir().unwrap();
        let program = write_script(dir.path(), "echo 'denied' >&2; exit 3");
        let cli = HostCli::new(program, "PYTHON", "CONF_CHECK");

        let err = cli.emit_log("x", Severity::Informational).await.unwrap_err();
        match err {
            DeviceError::CommandFailed { stderr, .. } => assert_eq!(stderr, "denied"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let cli = HostCli::new("/nonexistent/dohost", "PYTHON", "CONF_CHECK");
        let err = cli.interface_address("gi2").await.unwrap_err();
        assert!(matches!(err, DeviceError::Spawn { .. }));
    }
}
