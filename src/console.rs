use crate::level::Level;
use crate::record::Record;
use crate::sink::{LogSink, SinkError};
use nu_ansi_term::Color;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt::Write as _;
use std::io::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const CALLER_PREFIX_SEPARATOR: &str = " - ";

/// Human-readable, line-oriented sink. Writes to stderr by default.
///
/// One record per line:
///
/// ```text
/// 2026-10-19T08:15:02.117+00:00 INFO  Generate: start words=2 caller=petname 1.0.0 - server.rs:41
/// ```
pub struct ConsoleSink {
    min_level: Level,
    caller_prefix: Option<String>,
    colorize: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stderr(min_level: Level) -> Self {
        Self::new(min_level, io::stderr())
    }

    pub fn new(min_level: Level, writer: impl Write + Send + 'static) -> Self {
        ConsoleSink {
            min_level,
            caller_prefix: None,
            colorize: false,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Prefix the caller column with the service name and version.
    ///
    /// Either part may be empty; when both are, no prefix is written.
    pub fn with_service(mut self, service_name: &str, version: &str) -> Self {
        self.caller_prefix = match (service_name.is_empty(), version.is_empty()) {
            (true, true) => None,
            (true, false) => Some(version.to_string()),
            (false, true) => Some(service_name.to_string()),
            (false, false) => Some(format!("{service_name} {version}")),
        };
        self
    }

    /// Wrap the level name in ANSI colour codes.
    pub fn with_ansi(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    fn format(&self, record: &Record) -> String {
        let mut line = String::with_capacity(96 + record.message.len());
        let _ = write!(line, "{} ", record.timestamp.format(TIME_FORMAT));
        if self.colorize {
            let padded = format!("{:<5}", record.level.as_str());
            let _ = write!(line, "{} ", level_color(record.level).paint(padded));
        } else {
            let _ = write!(line, "{:<5} ", record.level.as_str());
        }
        line.push_str(&record.message);

        for field in &record.fields {
            line.push(' ');
            line.push_str(&field.key);
            line.push('=');
            push_value(&mut line, &field.value);
        }

        if let Some(caller) = record.caller {
            line.push_str(" caller=");
            if let Some(prefix) = &self.caller_prefix {
                line.push_str(prefix);
                line.push_str(CALLER_PREFIX_SEPARATOR);
            }
            let _ = write!(line, "{}:{}", caller.file_name(), caller.line);
        }

        line.push('\n');
        line
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::Purple,
        Level::Info => Color::Blue,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    }
}

/// Strings are written bare unless they would be ambiguous on the line.
fn push_value(line: &mut String, value: &Value) {
    match value {
        Value::String(s) if needs_quoting(s) => {
            let _ = write!(line, "{s:?}");
        }
        Value::String(s) => line.push_str(s),
        other => line.push_str(&other.to_string()),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}

impl LogSink for ConsoleSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.format(record);
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Caller, Field};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    fn record() -> Record {
        Record::new(
            Level::Warning,
            "Generate: slow request",
            vec![
                Field::new("words", 3),
                Field::new("separator", "-"),
                Field::new("reason", "took too long"),
            ],
        )
        .with_caller(Caller {
            file: "servers/petname/src/server.rs",
            line: 41,
        })
    }

    #[test]
    fn renders_fields_inline_with_caller_suffix() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Level::Debug, buf.clone()).with_service("petname", "1.0.0");
        sink.emit(&record()).unwrap();

        let out = buf.contents();
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains(" WARN  Generate: slow request"));
        assert!(out.contains(" words=3 separator=- reason=\"took too long\""));
        assert!(out.trim_end().ends_with("caller=petname 1.0.0 - server.rs:41"));
    }

    #[test]
    fn caller_prefix_uses_whatever_is_set() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Level::Debug, buf.clone()).with_service("", "2.1");
        sink.emit(&record()).unwrap();
        assert!(buf.contents().contains("caller=2.1 - server.rs:41"));

        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Level::Debug, buf.clone()).with_service("", "");
        sink.emit(&record()).unwrap();
        assert!(buf.contents().contains("caller=server.rs:41"));
    }

    #[test]
    fn omits_caller_when_unresolved() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Level::Debug, buf.clone());
        sink.emit(&Record::new(Level::Info, "plain", Vec::new())).unwrap();
        assert!(!buf.contents().contains("caller="));
    }

    #[test]
    fn colorized_level() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Level::Debug, buf.clone()).with_ansi(true);
        sink.emit(&Record::new(Level::Error, "boom", Vec::new())).unwrap();
        assert!(buf.contents().contains("\x1b[31mERROR\x1b[0m boom"));
    }

    #[test]
    fn threshold_is_inclusive() {
        let sink = ConsoleSink::new(Level::Warning, io::sink());
        assert!(!sink.enabled(Level::Debug));
        assert!(!sink.enabled(Level::Info));
        assert!(sink.enabled(Level::Warning));
        assert!(sink.enabled(Level::Error));
    }
}
