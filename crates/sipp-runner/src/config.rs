//! Configuration for a single SIPp invocation
//!
//! Every optional field maps to exactly one SIPp command-line flag; fields
//! left as `None` are not passed. The configuration can be kept in a TOML file:
//!
//! ```toml
//! binary_path = "sipp"
//! remote_host = "localhost"
//! service = "0312341234"
//! max_calls = 1
//! call_duration_ms = 500
//! message_file = "logs/sip_msg.log"
//! timeout_ms = 5000
//!
//! [scenario]
//! file = "tests/scenarios/uac-uas.xml"
//! ```

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Scenario SIPp should play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// One of SIPp's embedded scenarios (`-sn uac`)
    Builtin(String),
    /// A scenario XML file (`-sf path`)
    File(PathBuf),
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::Builtin("uac".to_string())
    }
}

/// SIPp invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SippConfig {
    /// SIPp executable
    pub binary_path: String,
    /// Host of the signaling server under test
    pub remote_host: String,
    /// Port of the signaling server under test, SIPp's default when unset
    pub remote_port: Option<u16>,
    /// Request-URI user part (`-s`)
    pub service: Option<String>,
    /// Injection file (`-inf`)
    pub inject_file: Option<PathBuf>,
    /// Calls per second (`-r`)
    pub call_rate: Option<f64>,
    /// Stop after this many calls (`-m`)
    pub max_calls: Option<u32>,
    /// Limit of simultaneous calls (`-l`)
    pub concurrent_calls: Option<u32>,
    /// Pause duration inside the scenario (`-d`, milliseconds)
    #[serde(rename = "call_duration_ms", with = "optional_millis")]
    pub call_duration: Option<Duration>,
    /// Local signaling address (`-i`)
    pub local_ip: Option<String>,
    /// Local signaling port (`-p`)
    pub local_port: Option<u16>,
    /// Local media address (`-mi`)
    pub media_ip: Option<String>,
    /// Local media port (`-mp`)
    pub media_port: Option<u16>,
    /// Message trace output (`-trace_msg -message_file`)
    pub message_file: Option<PathBuf>,
    /// Upper bound on the whole run; not passed to SIPp
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,
    // Must stay the last field: TOML tables follow plain keys
    pub scenario: Scenario,
}

impl Default for SippConfig {
    fn default() -> Self {
        Self {
            binary_path: "sipp".to_string(),
            remote_host: "localhost".to_string(),
            remote_port: None,
            service: None,
            inject_file: None,
            call_rate: None,
            max_calls: Some(1),
            concurrent_calls: None,
            call_duration: None,
            local_ip: None,
            local_port: None,
            media_ip: None,
            media_port: None,
            message_file: None,
            timeout: Duration::from_secs(30),
            scenario: Scenario::default(),
        }
    }
}

impl SippConfig {
    /// Configuration targeting `remote_host` with every other field defaulted
    pub fn new(remote_host: impl Into<String>) -> Self {
        Self {
            remote_host: remote_host.into(),
            ..Default::default()
        }
    }

    pub fn with_binary_path(mut self, path: impl Into<String>) -> Self {
        self.binary_path = path.into();
        self
    }

    pub fn with_scenario_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenario = Scenario::File(path.into());
        self
    }

    pub fn with_builtin_scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario = Scenario::Builtin(name.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_inject_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.inject_file = Some(path.into());
        self
    }

    pub fn with_call_rate(mut self, rate: f64) -> Self {
        self.call_rate = Some(rate);
        self
    }

    pub fn with_max_calls(mut self, calls: u32) -> Self {
        self.max_calls = Some(calls);
        self
    }

    pub fn with_concurrent_calls(mut self, calls: u32) -> Self {
        self.concurrent_calls = Some(calls);
        self
    }

    pub fn with_call_duration(mut self, duration: Duration) -> Self {
        self.call_duration = Some(duration);
        self
    }

    pub fn with_local_address(mut self, ip: impl Into<String>, port: u16) -> Self {
        self.local_ip = Some(ip.into());
        self.local_port = Some(port);
        self
    }

    pub fn with_media_address(mut self, ip: impl Into<String>, port: u16) -> Self {
        self.media_ip = Some(ip.into());
        self.media_port = Some(port);
        self
    }

    pub fn with_message_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.message_file = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the settings before they are turned into a command line
    pub fn validate(&self) -> Result<()> {
        fn invalid(reason: &str) -> Result<()> {
            Err(Error::InvalidConfig(reason.to_string()))
        }

        if self.binary_path.trim().is_empty() {
            return invalid("binary path is empty");
        }
        if self.remote_host.trim().is_empty() {
            return invalid("remote host is empty");
        }
        if self.remote_port == Some(0) {
            return invalid("remote port must not be 0");
        }
        match &self.scenario {
            Scenario::Builtin(name) if name.trim().is_empty() => {
                return invalid("builtin scenario name is empty")
            }
            Scenario::File(path) if path.as_os_str().is_empty() => {
                return invalid("scenario file path is empty")
            }
            _ => {}
        }
        if let Some(rate) = self.call_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return invalid("call rate must be a positive number");
            }
        }
        if self.max_calls == Some(0) {
            return invalid("max calls must be at least 1");
        }
        if self.concurrent_calls == Some(0) {
            return invalid("concurrent calls must be at least 1");
        }
        if self.timeout.as_millis() == 0 {
            return invalid("timeout must be at least 1 ms");
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: SippConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML configuration: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> AnyResult<()> {
        let path = path.as_ref();
        let content = toml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

/// Whole milliseconds
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Optional duration as whole milliseconds
mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SippConfig::default();
        assert_eq!(config.binary_path, "sipp");
        assert_eq!(config.remote_host, "localhost");
        assert_eq!(config.max_calls, Some(1));
        assert_eq!(config.scenario, Scenario::Builtin("uac".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            SippConfig::new(""),
            SippConfig::default().with_timeout(Duration::ZERO),
            SippConfig::default().with_call_rate(0.0),
            SippConfig::default().with_call_rate(f64::NAN),
            SippConfig::default().with_max_calls(0),
            SippConfig::default().with_concurrent_calls(0),
            SippConfig::default().with_scenario_file(""),
            SippConfig::default().with_builtin_scenario(" "),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_config_file_operations() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let path = temp_file.path().to_path_buf();

        let config = SippConfig::new("127.0.0.1")
            .with_scenario_file("tests/scenarios/uac-uas.xml")
            .with_service("0312341234")
            .with_call_duration(Duration::from_millis(500))
            .with_message_file("logs/sip_msg.log")
            .with_timeout(Duration::from_secs(5));
        config.save_to_file(&path).expect("Failed to save config");

        let loaded = SippConfig::load_from_file(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_sub_second_timeout_survives_save_and_load() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");

        for millis in [500, 1500] {
            let config = SippConfig::default().with_timeout(Duration::from_millis(millis));
            config.save_to_file(temp_file.path()).expect("Failed to save config");

            let loaded = SippConfig::load_from_file(temp_file.path()).expect("Failed to load config");
            assert_eq!(loaded.timeout, Duration::from_millis(millis));
            assert!(loaded.validate().is_ok());
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_sub_millisecond_timeout_rejected() {
        let config = SippConfig::default().with_timeout(Duration::from_micros(400));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SippConfig = toml::from_str(
            r#"
            remote_host = "10.0.0.5"
            remote_port = 5080
            call_duration_ms = 250
            timeout_ms = 2500

            [scenario]
            file = "uas.xml"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote_host, "10.0.0.5");
        assert_eq!(config.remote_port, Some(5080));
        assert_eq!(config.call_duration, Some(Duration::from_millis(250)));
        assert_eq!(config.scenario, Scenario::File(PathBuf::from("uas.xml")));
        assert_eq!(config.binary_path, "sipp");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }
}
