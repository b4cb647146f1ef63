use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "reckon.toml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_body_size_kb: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_body_size_kb: default_max_body_size_kb() }
    }
}

impl LimitsConfig {
    pub fn max_body_size_bytes(&self) -> usize {
        self.max_body_size_kb.saturating_mul(1024)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_log_filter() }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ReckonConfig {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

impl ReckonConfig {
    /// Load configuration from `path`, or from `RECKON_CONFIG_PATH` /
    /// `reckon.toml` when no path is given. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<LoadedConfig> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => std::env::var("RECKON_CONFIG_PATH")
                .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
                .into(),
        };

        match fs::read_to_string(&config_path) {
            Ok(config_str) => {
                let config = Self::from_toml(&config_str)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?;
                Ok(LoadedConfig::new(config, ConfigSource::File(config_path)))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(LoadedConfig::new(Self::default(), ConfigSource::Defaults(config_path)))
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", config_path.display()))
            }
        }
    }

    pub fn from_toml(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Where the base configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file did not exist; built-in defaults were used.
    Defaults(PathBuf),
}

/// Configuration plus a record of how it was assembled.
///
/// Loading happens before the subscriber exists, so nothing is logged until
/// [`LoadedConfig::log_summary`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: ReckonConfig,
    pub source: ConfigSource,
    pub overrides: Vec<&'static str>,
}

impl LoadedConfig {
    pub fn new(config: ReckonConfig, source: ConfigSource) -> Self {
        Self { config, source, overrides: Vec::new() }
    }

    /// Apply overrides from the process environment.
    pub fn apply_profile(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("RECKON_HOST") {
            self.config.server.host = host;
            self.overrides.push("RECKON_HOST");
        }
        if let Some(port) = lookup("RECKON_PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.config.server.port = port;
            self.overrides.push("RECKON_PORT");
        }
        if let Some(limit) =
            lookup("RECKON_MAX_BODY_SIZE_KB").and_then(|v| v.parse::<usize>().ok())
        {
            self.config.limits.max_body_size_kb = limit;
            self.overrides.push("RECKON_MAX_BODY_SIZE_KB");
        }
        if let Some(format) = lookup("RECKON_LOG_FORMAT") {
            let format = match format.to_ascii_lowercase().as_str() {
                "json" => Some(LogFormat::Json),
                "pretty" => Some(LogFormat::Pretty),
                _ => None,
            };
            if let Some(format) = format {
                self.config.logging.format = format;
                self.overrides.push("RECKON_LOG_FORMAT");
            }
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.config.logging.filter = filter;
            self.overrides.push("RUST_LOG");
        }
        self
    }

    /// Apply command-line flags; these win over the environment.
    pub fn apply_cli(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.config.server.host = host;
            self.overrides.push("--host");
        }
        if let Some(port) = port {
            self.config.server.port = port;
            self.overrides.push("--port");
        }
        self
    }

    /// Report how the configuration was assembled.
    pub fn log_summary(&self) {
        match &self.source {
            ConfigSource::File(path) => {
                info!(path = %path.display(), "Loaded configuration file");
            }
            ConfigSource::Defaults(path) => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
            }
        }
        info!(
            host = %self.config.server.host,
            port = self.config.server.port,
            overrides = ?self.overrides,
            "Applied configuration overrides"
        );
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_body_size_kb() -> usize {
    64
}
fn default_log_filter() -> String {
    "reckon_api=debug,tower_http=debug,info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn defaults_are_sensible() {
        let config = ReckonConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.limits.max_body_size_bytes(), 64 * 1024);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = ReckonConfig::from_toml(
            r#"
[server]
port = 8080
[logging]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(ReckonConfig::from_toml("[server]\nport = \"not a port\"").is_err());
    }

    #[test]
    fn loads_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_body_size_kb = 8").unwrap();

        let loaded = ReckonConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.config.limits.max_body_size_kb, 8);
        assert_eq!(loaded.source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let loaded = ReckonConfig::load(Some(missing.as_path())).unwrap();
        assert_eq!(loaded.config, ReckonConfig::default());
        assert_eq!(loaded.source, ConfigSource::Defaults(missing));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_summary(loaded: &LoadedConfig) -> String {
        let logs = CapturedLogs::default();
        let subscriber =
            tracing_subscriber::fmt().with_writer(logs.clone()).with_ansi(false).finish();
        tracing::subscriber::with_default(subscriber, || loaded.log_summary());
        logs.contents()
    }

    #[test]
    fn summary_warns_about_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ReckonConfig::load(Some(dir.path().join("absent.toml").as_path()))
            .unwrap()
            .apply_cli(None, Some(0));

        let output = capture_summary(&loaded);
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("absent.toml' not found"), "{output}");
        assert!(output.contains("Applied configuration overrides"), "{output}");
        assert!(output.contains("--port"), "{output}");
    }

    #[test]
    fn summary_for_file_does_not_warn() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let loaded = ReckonConfig::load(Some(file.path())).unwrap();

        let output = capture_summary(&loaded);
        assert!(output.contains("Loaded configuration file"), "{output}");
        assert!(!output.contains("WARN"), "{output}");
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn defaults() -> LoadedConfig {
        let source = ConfigSource::Defaults(DEFAULT_CONFIG_PATH.into());
        LoadedConfig::new(ReckonConfig::default(), source)
    }

    #[test]
    fn environment_overrides_every_setting() {
        let loaded = defaults().apply_overrides(lookup_from(&[
            ("RECKON_HOST", "0.0.0.0"),
            ("RECKON_PORT", "9999"),
            ("RECKON_MAX_BODY_SIZE_KB", "128"),
            ("RECKON_LOG_FORMAT", "JSON"),
            ("RUST_LOG", "warn"),
        ]));

        assert_eq!(loaded.config.server.host, "0.0.0.0");
        assert_eq!(loaded.config.server.port, 9999);
        assert_eq!(loaded.config.limits.max_body_size_kb, 128);
        assert_eq!(loaded.config.logging.format, LogFormat::Json);
        assert_eq!(loaded.config.logging.filter, "warn");
        assert_eq!(
            loaded.overrides,
            vec![
                "RECKON_HOST",
                "RECKON_PORT",
                "RECKON_MAX_BODY_SIZE_KB",
                "RECKON_LOG_FORMAT",
                "RUST_LOG"
            ]
        );
    }

    #[test]
    fn unparseable_overrides_are_ignored() {
        let loaded = defaults().apply_overrides(lookup_from(&[
            ("RECKON_PORT", "not-a-port"),
            ("RECKON_MAX_BODY_SIZE_KB", "-1"),
            ("RECKON_LOG_FORMAT", "xml"),
        ]));

        assert_eq!(loaded.config, ReckonConfig::default());
        assert!(loaded.overrides.is_empty());
    }

    #[test]
    fn port_out_of_range_is_ignored() {
        let loaded = defaults().apply_overrides(lookup_from(&[("RECKON_PORT", "70000")]));
        assert_eq!(loaded.config.server.port, 3000);
    }

    #[test]
    fn cli_flags_win_over_environment() {
        let loaded = defaults()
            .apply_overrides(lookup_from(&[
                ("RECKON_HOST", "10.0.0.1"),
                ("RECKON_PORT", "9000"),
            ]))
            .apply_cli(Some("localhost".to_string()), Some(8080));

        assert_eq!(loaded.config.bind_address(), "localhost:8080");
    }

    #[test]
    fn cli_flags_absent_keep_environment() {
        let loaded = defaults()
            .apply_overrides(lookup_from(&[("RECKON_PORT", "9000")]))
            .apply_cli(None, None);

        assert_eq!(loaded.config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    #[serial]
    fn apply_profile_reads_process_environment() {
        // SAFETY: serialized with other environment-mutating tests; no other
        // thread reads these variables concurrently.
        unsafe {
            std::env::set_var("RECKON_HOST", "192.168.1.10");
            std::env::set_var("RECKON_PORT", "9999");
        }

        let loaded = defaults().apply_profile();

        // SAFETY: see above.
        unsafe {
            std::env::remove_var("RECKON_HOST");
            std::env::remove_var("RECKON_PORT");
        }

        assert_eq!(loaded.config.server.host, "192.168.1.10");
        assert_eq!(loaded.config.server.port, 9999);
    }
}
