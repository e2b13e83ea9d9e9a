use crate::level::Level;
use crate::record::Record;

/// Error returned by a [`LogSink`] when a record could not be written.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("log record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("log sink is closed")]
    Closed,
}

/// Synchronous destination for [`Record`]s.
///
/// Implementations own one concrete output (console, file, memory) and
/// choose their own encoding. A sink is shared across threads by every
/// [`Logger`](crate::logger::Logger) minted from the same factory, so
/// writes must be internally serialized.
pub trait LogSink: Send + Sync {
    /// Whether a record at `level` would be emitted.
    fn enabled(&self, level: Level) -> bool;

    /// Write a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was written or deliberately dropped.
    /// - `Err(..)` if the backend failed. Callers never retry.
    fn emit(&self, record: &Record) -> Result<(), SinkError>;

    /// Flush any buffered output.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Flush and release owned resources. Calling it twice is harmless.
    fn close(&self) -> Result<(), SinkError> {
        self.flush()
    }
}

impl LogSink for Box<dyn LogSink> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        (**self).emit(record)
    }

    fn flush(&self) -> Result<(), SinkError> {
        (**self).flush()
    }

    fn close(&self) -> Result<(), SinkError> {
        (**self).close()
    }
}
