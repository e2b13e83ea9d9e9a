//! Caller identity: the enriching sink decorator and function-name capture.
//!
//! Source locations travel with each [`Record`] as its `origin`, captured by
//! `Location::caller()` at the public entry point. Every frame between
//! application code and that capture is `#[track_caller]`, so the location
//! always names the application's call site. A new wrapper layer that is
//! not `#[track_caller]` would silently shift the reported line; the
//! line-number tests in `logger.rs` guard against that.

use crate::level::Level;
use crate::record::{Caller, Record};
use crate::sink::{LogSink, SinkError};

/// Name used when the enclosing function cannot be determined.
pub const UNKNOWN_FUNCTION_NAME: &str = "unknown function name";

const HERE_MARKER: &str = "::__scopelog_here";
const CLOSURE_SEGMENT: &str = "::{{closure}}";

/// Wraps one sink and attaches the resolved [`Caller`] before delegating.
///
/// Records without an origin, or that already carry a caller, are
/// forwarded unmodified.
pub struct CallerSink<S> {
    inner: S,
}

impl<S: LogSink> CallerSink<S> {
    pub fn new(inner: S) -> Self {
        CallerSink { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LogSink> LogSink for CallerSink<S> {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        match (record.caller, record.origin) {
            (None, Some(origin)) => self.inner.emit(&record.with_caller(Caller::from(origin))),
            _ => self.inner.emit(record),
        }
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.inner.flush()
    }

    fn close(&self) -> Result<(), SinkError> {
        self.inner.close()
    }
}

/// Reduce the type name of a marker fn nested in a function body to the
/// bare name of that function.
///
/// `my_crate::server::Service::generate::__scopelog_here` becomes
/// `generate`; closure segments are skipped so a marker inside a closure
/// still names the enclosing function.
#[doc(hidden)]
pub fn short_function_name(marker_path: &'static str) -> &'static str {
    let mut path = marker_path.strip_suffix(HERE_MARKER).unwrap_or(marker_path);
    while let Some(stripped) = path.strip_suffix(CLOSURE_SEGMENT) {
        path = stripped;
    }
    match path.rsplit("::").next() {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_FUNCTION_NAME,
    }
}

/// Name of the enclosing function, without its module path.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __scopelog_here() {}
        $crate::caller::short_function_name(::core::any::type_name_of_val(&__scopelog_here))
    }};
}
