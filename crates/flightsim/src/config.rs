//! Configuration structs for the flight simulator.
//!
//! Loaded from YAML; every section and key is optional.

use flightsim_core::FlightError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "flightsim.yml";

/// Upper bound for the per-run name counts of the DNS simulators.
pub const MAX_COUNT: usize = 10_000;

/// Upper bound for the number of hosts sampled by the port scan.
pub const MAX_SCAN_HOSTS: usize = 1_000;

/// Longest label a DNS name may carry.
pub const MAX_LABEL_LEN: usize = 63;

/// Main configuration for the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingSettings,
    pub dns: DnsSettings,
    pub c2: C2Settings,
    pub dga: DgaSettings,
    pub scan: ScanSettings,
    pub tunnel: TunnelSettings,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, FlightError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlightError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content).map_err(|e| {
            FlightError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config
            .validate()
            .map_err(|e| FlightError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Rejects counts the simulators cannot generate targets for.
    pub fn validate(&self) -> Result<(), String> {
        check_range("c2.sample_size", self.c2.sample_size, 0, MAX_COUNT)?;
        check_range("dga.count", self.dga.count, 0, MAX_COUNT)?;
        check_range("scan.hosts", self.scan.hosts, 0, MAX_SCAN_HOSTS)?;
        check_range("tunnel.count", self.tunnel.count, 0, MAX_COUNT)?;
        check_range("tunnel.label_len", self.tunnel.label_len, 1, MAX_LABEL_LEN)?;
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Loads `path` if given (it must exist), else the default file if
    /// present, else built-in defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, FlightError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

fn check_range(key: &str, value: usize, min: usize, max: usize) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}, got {}", key, min, max, value));
    }
    Ok(())
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level used when `RUST_LOG` is not set: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Settings shared by the DNS-based simulators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsSettings {
    /// Resolver to query; defaults to a resolv.conf entry of the source's family
    pub nameserver: Option<SocketAddr>,
    /// How long to wait for a reply, in milliseconds
    pub timeout_ms: u64,
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            nameserver: None,
            timeout_ms: 2000,
        }
    }
}

impl DnsSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Command-and-control domain lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct C2Settings {
    /// Number of domains sampled per run
    pub sample_size: usize,
    /// File with one domain per line; the bundled list is used when unset
    pub domains_file: Option<PathBuf>,
}

impl Default for C2Settings {
    fn default() -> Self {
        Self {
            sample_size: 10,
            domains_file: None,
        }
    }
}

/// Domain-generation-algorithm lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DgaSettings {
    /// Number of names generated per run
    pub count: usize,
    /// Top-level domains names are drawn under
    pub tlds: Vec<String>,
}

impl Default for DgaSettings {
    fn default() -> Self {
        Self {
            count: 10,
            tlds: ["com", "net", "org", "info", "biz", "ru", "cn", "top", "xyz"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Port scan of private address space
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Number of RFC 1918 hosts sampled per run
    pub hosts: usize,
    /// TCP ports tried on every host
    pub ports: Vec<u16>,
    /// Connect timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            hosts: 10,
            ports: vec![
                21, 22, 23, 25, 80, 88, 111, 135, 139, 143, 389, 443, 445, 1433, 1521, 3306,
                3389, 5432, 5900, 6000, 8080, 8443,
            ],
            timeout_ms: 200,
        }
    }
}

impl ScanSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// DNS tunnel lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelSettings {
    /// Parent domain the encoded labels are placed under
    pub domain: String,
    /// Number of hostnames generated per run
    pub count: usize,
    /// Length of the encoded label
    pub label_len: usize,
}

impl Default for TunnelSettings {
    fn default() -> Self {
        Self {
            domain: "sandbox.alphasoc.xyz".to_string(),
            count: 40,
            label_len: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.c2.sample_size, 10);
        assert_eq!(config.dga.count, 10);
        assert_eq!(config.scan.hosts, 10);
        assert_eq!(config.tunnel.count, 40);
        assert_eq!(config.dns.timeout(), Duration::from_secs(2));
        assert!(config.dns.nameserver.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
dns:
  nameserver: "127.0.0.1:5353"
  timeout_ms: 500
scan:
  hosts: 2
  ports: [22, 80]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.dns.nameserver, Some("127.0.0.1:5353".parse().unwrap()));
        assert_eq!(config.dns.timeout(), Duration::from_millis(500));
        assert_eq!(config.scan.hosts, 2);
        assert_eq!(config.scan.ports, vec![22, 80]);
        assert_eq!(config.scan.timeout_ms, 200);
        assert_eq!(config.tunnel.domain, "sandbox.alphasoc.xyz");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.dga.count, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tunnel:\n  domain: tunnel.example.net\n  count: 3").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.tunnel.domain, "tunnel.example.net");
        assert_eq!(config.tunnel.count, 3);
        assert_eq!(config.tunnel.label_len, 30);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(Some(dir.path().join("absent.yml").as_path())).unwrap_err();
        assert!(matches!(err, FlightError::Config(_)));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_count_is_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan:\n  hosts: 2305843009213693951").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        match err {
            FlightError::Config(msg) => assert!(msg.contains("scan.hosts"), "{}", msg),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_named() {
        let mut config = Config::default();
        config.tunnel.count = MAX_COUNT + 1;
        assert!(config.validate().unwrap_err().contains("tunnel.count"));

        let mut config = Config::default();
        config.tunnel.label_len = 0;
        assert!(config.validate().unwrap_err().contains("tunnel.label_len"));

        let mut config = Config::default();
        config.c2.sample_size = usize::MAX;
        assert!(config.validate().unwrap_err().contains("c2.sample_size"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan: [not, a, map]").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
