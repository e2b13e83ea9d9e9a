use crate::level::Level;
use crate::record::{Caller, Field, Record};
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that feeds `tracing` events into a factory's
/// dispatch chain.
///
/// Lets libraries that log through `tracing` share the console and file
/// sinks of the [`LoggerFactory`](crate::factory::LoggerFactory). Events
/// below every sink's threshold are discarded before any field is visited.
pub struct DispatchLayer {
    chain: Arc<dyn LogSink>,
}

impl DispatchLayer {
    pub fn new(chain: Arc<dyn LogSink>) -> Self {
        DispatchLayer { chain }
    }
}

pub(crate) fn map_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warning,
        tracing::Level::ERROR => Level::Error,
    }
}

impl<S> Layer<S> for DispatchLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = map_level(meta.level());
        if !self.chain.enabled(level) {
            return;
        }

        let mut fields = Vec::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut record = Record::new(level, message.unwrap_or_default(), fields);
        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            record.caller = Some(Caller { file, line });
        }

        if let Err(e) = self.chain.emit(&record) {
            eprintln!("failed to emit tracing event: {e}");
        }
    }
}

/// Collects event fields in declaration order; `message` becomes the
/// record message.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Vec<Field>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::new(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(Field::new(field.name(), format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_sink::MemorySink;
    use serde_json::Value;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn run(min: Level, f: impl FnOnce()) -> MemorySink {
        let memory = MemorySink::new(min);
        let layer = DispatchLayer::new(Arc::new(memory.clone()));
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        memory
    }

    #[test]
    fn forwards_events_with_fields_and_location() {
        let line = line!() + 2;
        let memory = run(Level::Debug, || {
            tracing::warn!(peer = "10.0.0.7", attempt = 3_u64, ok = false, "retrying");
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, Level::Warning);
        assert_eq!(record.message, "retrying");
        assert_eq!(record.field("peer"), Some(&Value::from("10.0.0.7")));
        assert_eq!(record.field("attempt"), Some(&Value::from(3_u64)));
        assert_eq!(record.field("ok"), Some(&Value::from(false)));
        let caller = record.caller.unwrap();
        assert_eq!(caller.line, line);
        assert!(caller.file.ends_with("layer.rs"));
    }

    #[test]
    fn drops_events_below_threshold() {
        let memory = run(Level::Warning, || {
            tracing::trace!("t");
            tracing::debug!("d");
            tracing::info!("i");
            tracing::error!(code = 7_i64, "e");
        });
        assert_eq!(memory.messages(), vec!["e"]);
        assert_eq!(memory.records()[0].field("code"), Some(&Value::from(7)));
    }

    #[test]
    fn maps_levels() {
        assert_eq!(map_level(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(map_level(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(map_level(&tracing::Level::INFO), Level::Info);
        assert_eq!(map_level(&tracing::Level::WARN), Level::Warning);
        assert_eq!(map_level(&tracing::Level::ERROR), Level::Error);
    }
}
