use crate::level::Level;
use crate::record::Record;
use crate::sink::{LogSink, SinkError};

/// A sink that is disabled for every level and drops all records.
///
/// [`fan_out`](crate::fanout::fan_out) returns it for an empty sink list,
/// and it is handy for measuring the cost of the facade without I/O.
#[derive(Clone, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn emit(&self, _record: &Record) -> Result<(), SinkError> {
        Ok(())
    }
}
