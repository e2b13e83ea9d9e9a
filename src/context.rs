use crate::record::Field;
use serde_json::Value;
use std::sync::Arc;

/// Propagation context carried by a [`Logger`](crate::logger::Logger).
///
/// Holds caller-supplied identifiers (request id, peer, ...) that are
/// attached to every record the logger emits. The core never inspects it
/// for liveness or cancellation. Clones share the same storage.
#[derive(Clone, Debug)]
pub struct Context {
    values: Arc<[Field]>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            values: Arc::from(Vec::new()),
        }
    }
}

impl Context {
    /// Empty context.
    pub fn background() -> Self {
        Context::default()
    }

    /// Derive a context carrying one more identifier; `self` is unchanged.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut values = self.values.to_vec();
        values.push(Field::new(key, value));
        Context {
            values: values.into(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.iter().rev().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn values(&self) -> &[Field] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
