use crate::env::{
    env_or, LOG_COLORIZE_ENV, LOG_LEVEL_ENV, LOG_OUTPUT_PATH_ENV, LOG_SERVICE_NAME_ENV,
    LOG_SERVICE_VERSION_ENV,
};
use crate::level::Level;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration consumed by [`LoggerFactory`](crate::factory::LoggerFactory).
///
/// **Fields**
/// - `service_name`, `version`: prefixed to the console caller column and
///   written as `service`/`version` in the file output.
/// - `log_level`: minimum level for every sink. Unrecognized values fall
///   back to `debug` rather than dropping logs.
/// - `output_path`: when set and non-empty, a JSON file sink is added next
///   to the console sink.
/// - `colorize`: ANSI colours for the console level column.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service_name: String,
    pub version: String,
    pub log_level: String,
    pub output_path: Option<PathBuf>,
    pub colorize: bool,
}

impl Config {
    pub fn new(service_name: impl Into<String>, version: impl Into<String>) -> Self {
        Config {
            service_name: service_name.into(),
            version: version.into(),
            ..Config::default()
        }
    }

    pub fn with_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Build a config from the `LOG_*` environment variables.
    pub fn from_env() -> Self {
        let output_path = env_or(LOG_OUTPUT_PATH_ENV, "");
        let colorize = env_or(LOG_COLORIZE_ENV, "false");
        Config {
            service_name: env_or(LOG_SERVICE_NAME_ENV, ""),
            version: env_or(LOG_SERVICE_VERSION_ENV, ""),
            log_level: env_or(LOG_LEVEL_ENV, "info"),
            output_path: (!output_path.is_empty()).then(|| PathBuf::from(output_path)),
            colorize: matches!(colorize.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        }
    }

    pub fn level(&self) -> Level {
        Level::parse_or_default(&self.log_level)
    }

    /// Output path, treating an empty path as absent.
    pub fn file_path(&self) -> Option<&Path> {
        self.output_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Fatal error raised while building a factory.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_path_counts_as_absent() {
        let cfg = Config::new("svc", "1").with_output_path("");
        assert!(cfg.file_path().is_none());
        let cfg = Config::new("svc", "1").with_output_path("/tmp/svc.log");
        assert_eq!(cfg.file_path(), Some(Path::new("/tmp/svc.log")));
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"service_name":"petname","log_level":"warn"}"#).unwrap();
        assert_eq!(cfg.service_name, "petname");
        assert_eq!(cfg.version, "");
        assert_eq!(cfg.level(), Level::Warning);
        assert!(cfg.file_path().is_none());
        assert!(!cfg.colorize);
    }

    #[test]
    fn reads_log_variables_from_environment() {
        use std::env;

        env::set_var(LOG_SERVICE_NAME_ENV, "petname");
        env::set_var(LOG_SERVICE_VERSION_ENV, "1.2.0");
        env::set_var(LOG_LEVEL_ENV, "warn");
        env::set_var(LOG_OUTPUT_PATH_ENV, "/var/log/petname.log");
        env::set_var(LOG_COLORIZE_ENV, "Yes");

        let cfg = Config::from_env();
        assert_eq!(cfg.service_name, "petname");
        assert_eq!(cfg.version, "1.2.0");
        assert_eq!(cfg.level(), Level::Warning);
        assert_eq!(cfg.file_path(), Some(Path::new("/var/log/petname.log")));
        assert!(cfg.colorize);

        env::set_var(LOG_OUTPUT_PATH_ENV, "");
        env::set_var(LOG_COLORIZE_ENV, "1");
        env::remove_var(LOG_LEVEL_ENV);
        let cfg = Config::from_env();
        assert!(cfg.output_path.is_none());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.level(), Level::Info);
        assert!(cfg.colorize);

        env::set_var(LOG_COLORIZE_ENV, "on");
        assert!(!Config::from_env().colorize);

        for key in [
            LOG_SERVICE_NAME_ENV,
            LOG_SERVICE_VERSION_ENV,
            LOG_OUTPUT_PATH_ENV,
            LOG_COLORIZE_ENV,
        ] {
            env::remove_var(key);
        }
        let cfg = Config::from_env();
        assert_eq!(cfg.service_name, "");
        assert!(!cfg.colorize);
    }

    #[test]
    fn unknown_level_defaults_to_debug() {
        assert_eq!(Config::new("a", "b").with_level("loud").level(), Level::Debug);
    }
}
