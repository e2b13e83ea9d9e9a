//! Environment variable names read by [`Config::from_env`](crate::config::Config::from_env).
//!
//! These are purely helpers; the factory itself never touches the
//! environment and only consumes an already-built `Config`.

/// Logical service name shown in the console caller column and the file `service` key.
pub const LOG_SERVICE_NAME_ENV: &str = "LOG_SERVICE_NAME";

/// Service version shown next to the service name.
pub const LOG_SERVICE_VERSION_ENV: &str = "LOG_SERVICE_VERSION";

/// Minimum level: `debug`, `info`, `warn`/`warning` or `error`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Optional path of the JSON log file. Empty or unset disables the file sink.
pub const LOG_OUTPUT_PATH_ENV: &str = "LOG_OUTPUT_PATH";

/// `true`/`1` enables ANSI colours on the console.
pub const LOG_COLORIZE_ENV: &str = "LOG_COLORIZE";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
