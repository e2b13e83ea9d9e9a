use crate::level::Level;
use crate::record::Record;
use crate::sink::{LogSink, SinkError};
use chrono::SecondsFormat;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Newline-delimited JSON sink appending to a file.
///
/// The file is opened in append/create mode, so it persists across
/// restarts. Each line is a self-contained JSON object:
///
/// ```text
/// {"timestamp":"2026-10-19T08:15:02.117Z","level":"info","message":"Generate: start","caller":"src/server.rs:41","service":"petname","words":2}
/// ```
pub struct FileSink {
    min_level: Level,
    path: PathBuf,
    service: Option<String>,
    version: Option<String>,
    file: Mutex<Option<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating it if missing.
    pub fn open(min_level: Level, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().append(true).create(true).open(&path)?;
        Ok(FileSink {
            min_level,
            path,
            service: None,
            version: None,
            file: Mutex::new(Some(file)),
        })
    }

    /// Tag every line with the service name and version; empty values are omitted.
    pub fn with_service(mut self, service_name: &str, version: &str) -> Self {
        self.service = (!service_name.is_empty()).then(|| service_name.to_string());
        self.version = (!version.is_empty()).then(|| version.to_string());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>, SinkError> {
        let mut fields = Map::with_capacity(record.fields.len());
        for field in &record.fields {
            fields.insert(field.key.clone(), field.value.clone());
        }
        let line = FileLine {
            timestamp: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            level: record.level.as_lowercase_str(),
            message: &record.message,
            caller: record
                .caller
                .map(|c| format!("{}:{}", c.short_path(), c.line)),
            service: self.service.as_deref(),
            version: self.version.as_deref(),
            fields,
        };
        let mut buf = serde_json::to_vec(&line)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[derive(Serialize)]
struct FileLine<'a> {
    timestamp: String,
    level: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl LogSink for FileSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.encode(record)?;
        let mut guard = self.file.lock();
        let file = guard.as_mut().ok_or(SinkError::Closed)?;
        file.write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        if let Some(file) = self.file.lock().take() {
            file.sync_all()?;
        }
        Ok(())
    }
}
