use std::fmt;
use std::str::FromStr;

/// Severity of a [`Record`](crate::record::Record).
///
/// Levels are totally ordered, `Debug < Info < Warning < Error`, and a sink
/// emits a record only when `record.level >= sink.min_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Most verbose level; used when a configured level cannot be parsed.
    pub const MOST_VERBOSE: Level = Level::Debug;

    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Upper-case name used by the console encoder.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Lower-case name used by the file encoder.
    pub const fn as_lowercase_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warn",
            Level::Error => "error",
        }
    }

    /// Parse a configured level, falling back to [`Level::MOST_VERBOSE`].
    ///
    /// An empty string also yields the fallback.
    pub fn parse_or_default(s: &str) -> Level {
        s.parse().unwrap_or(Level::MOST_VERBOSE)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Level::from_str`] for an unrecognized level name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("Info".parse::<Level>(), Ok(Level::Info));
        assert_eq!("WARN".parse::<Level>(), Ok(Level::Warning));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warning));
        assert_eq!(" error ".parse::<Level>(), Ok(Level::Error));
    }

    #[test]
    fn unknown_level_falls_back_to_most_verbose() {
        assert!("verbose".parse::<Level>().is_err());
        assert_eq!(Level::parse_or_default("verbose"), Level::Debug);
        assert_eq!(Level::parse_or_default(""), Level::Debug);
    }
}
