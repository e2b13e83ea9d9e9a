use crate::level::Level;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::panic::Location;

/// A single key/value pair attached to a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Field {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Field holding the `Display` form of `value`.
    pub fn display(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Field::new(key, value.to_string())
    }

    /// Field keyed `error` holding the error's description.
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Field::new("error", err.to_string())
    }
}

/// Resolved source location of the code that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    /// Last path component of `file`, e.g. `handler.rs`.
    pub fn file_name(&self) -> &'static str {
        let file = self.file;
        file.rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(file)
    }

    /// Parent directory plus file name, e.g. `src/handler.rs`.
    pub fn short_path(&self) -> &'static str {
        let file = self.file;
        let mut seps = file
            .char_indices()
            .rev()
            .filter(|(_, c)| *c == '/' || *c == '\\');
        match (seps.next(), seps.next()) {
            (Some(_), Some((idx, _))) => &file[idx + 1..],
            _ => file,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(loc: &'static Location<'static>) -> Self {
        Caller {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A leveled log record.
///
/// The timestamp is taken when the record is built. Records are never
/// mutated once handed to a sink; [`Record::with_caller`] returns an
/// enriched copy instead.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: Vec<Field>,
    /// Call site captured at the public logging entry point.
    pub origin: Option<&'static Location<'static>>,
    pub caller: Option<Caller>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>, fields: Vec<Field>) -> Self {
        Record {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
            origin: None,
            caller: None,
        }
    }

    pub fn with_origin(mut self, origin: &'static Location<'static>) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Copy of this record carrying `caller`.
    pub fn with_caller(&self, caller: Caller) -> Self {
        Record {
            caller: Some(caller),
            ..self.clone()
        }
    }

    /// Value of the first field named `key`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}
