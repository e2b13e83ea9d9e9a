use crate::level::Level;
use crate::noop_sink::NoopSink;
use crate::record::Record;
use crate::sink::{LogSink, SinkError};

/// Broadcasts each record to every wrapped sink that admits its level.
///
/// Emission never short-circuits: all enabled sinks are attempted and the
/// first error, if any, is returned afterwards. A failing file sink
/// therefore does not silence the console.
pub struct MultiSink {
    sinks: Vec<Box<dyn LogSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        MultiSink { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each(
        &self,
        mut op: impl FnMut(&dyn LogSink) -> Result<(), SinkError>,
    ) -> Result<(), SinkError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = op(&**sink) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl LogSink for MultiSink {
    fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|s| s.enabled(level))
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        self.for_each(|sink| {
            if sink.enabled(record.level) {
                sink.emit(record)
            } else {
                Ok(())
            }
        })
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.for_each(|sink| sink.flush())
    }

    fn close(&self) -> Result<(), SinkError> {
        self.for_each(|sink| sink.close())
    }
}

/// Compose `sinks` into a single sink.
///
/// - no sinks: a [`NoopSink`] that disables every level;
/// - one sink: that sink itself, with no fan-out layer;
/// - otherwise: a [`MultiSink`].
pub fn fan_out(mut sinks: Vec<Box<dyn LogSink>>) -> Box<dyn LogSink> {
    match sinks.len() {
        0 => Box::new(NoopSink),
        1 => sinks.remove(0),
        _ => Box::new(MultiSink::new(sinks)),
    }
}
