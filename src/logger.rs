use crate::context::Context;
use crate::level::Level;
use crate::record::{Field, Record};
use crate::sink::{LogSink, SinkError};
use std::any::Any;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe, Location};
use std::process;
use std::sync::Arc;
use std::thread;

pub const MSG_START: &str = "start";
pub const MSG_START_WITH_PARAMS: &str = "start with params";
pub const MSG_END: &str = "end";
pub const MSG_PANIC_WAS_CAUGHT: &str = "the panic was caught";

/// `error` value of a panic record emitted while unwinding past a handle.
pub const UNKNOWN_PANIC_PAYLOAD: &str = "unknown panic payload";

const FUNC_NAME_SEPARATOR: &str = ": ";

/// Kind of SQL statement reported by [`Logger::error_sql`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperation {
    Select,
    Insert,
    Update,
    Delete,
}

impl SqlOperation {
    /// `"insert into users completes with error"` and friends.
    pub fn error_message(&self, table: &str) -> String {
        match self {
            SqlOperation::Select => format!("select from {table} completes with error"),
            SqlOperation::Insert => format!("insert into {table} completes with error"),
            SqlOperation::Update => format!("update {table} completes with error"),
            SqlOperation::Delete => format!("delete from {table} completes with error"),
        }
    }
}

/// Per-operation logging handle.
///
/// Minted by [`LoggerFactory::get_logger`](crate::factory::LoggerFactory::get_logger)
/// (or the [`get_logger!`](crate::get_logger) macro) at the start of a unit
/// of work. Every message is prefixed with the function name captured at
/// mint time, so `info("cache miss", ..)` inside `generate` is emitted as
/// `generate: cache miss`.
///
/// A minted handle owns the unit of work's `"end"` record, which is
/// emitted exactly once: by [`end`](Logger::end), by
/// [`scope`](Logger::scope), or, if a panic unwinds past a handle that was
/// never finalized, by its `Drop` impl right after a
/// `"the panic was caught"` record. Handles are not `Clone`;
/// derive one with [`with_fields`](Logger::with_fields) instead.
pub struct Logger {
    chain: Arc<dyn LogSink>,
    function_name: Arc<str>,
    context: Context,
    fields: Arc<[Field]>,
    minted_at: &'static Location<'static>,
    pending_end: bool,
}

impl Logger {
    #[track_caller]
    pub(crate) fn new(chain: Arc<dyn LogSink>, function_name: &str, context: Context) -> Self {
        Logger {
            chain,
            function_name: Arc::from(function_name),
            context,
            fields: Arc::from(Vec::new()),
            minted_at: Location::caller(),
            pending_end: true,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// New handle whose records all carry `fields`. `self` is left as is.
    ///
    /// The derived handle shares the lifecycle of the one it came from: it
    /// never emits `"end"`, so ending it only retires it.
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut bound = self.fields.to_vec();
        bound.extend(fields);
        Logger {
            chain: Arc::clone(&self.chain),
            function_name: Arc::clone(&self.function_name),
            context: self.context.clone(),
            fields: bound.into(),
            minted_at: self.minted_at,
            pending_end: false,
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Debug, msg, fields);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Info, msg, fields);
    }

    #[track_caller]
    pub fn warning(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Warning, msg, fields);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Error, msg, fields);
    }

    /// Report that `operation` failed with `err`.
    ///
    /// Message: `"<operation> completes with error"`; field `error`.
    #[track_caller]
    pub fn error_in(
        &self,
        operation: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        let msg = format!("{operation} completes with error");
        self.log(
            Level::Error,
            &msg,
            fields.into_iter().chain([Field::error(err)]),
        );
    }

    /// Report a failed SQL statement against `table`.
    ///
    /// Fields `error` and `table` are appended to `fields`.
    #[track_caller]
    pub fn error_sql(
        &self,
        operation: SqlOperation,
        table: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        let msg = operation.error_message(table);
        self.log(
            Level::Error,
            &msg,
            fields
                .into_iter()
                .chain([Field::error(err), Field::new("table", table)]),
        );
    }

    #[track_caller]
    pub fn error_sql_select(
        &self,
        table: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.error_sql(SqlOperation::Select, table, err, fields);
    }

    #[track_caller]
    pub fn error_sql_insert(
        &self,
        table: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.error_sql(SqlOperation::Insert, table, err, fields);
    }

    #[track_caller]
    pub fn error_sql_update(
        &self,
        table: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.error_sql(SqlOperation::Update, table, err, fields);
    }

    #[track_caller]
    pub fn error_sql_delete(
        &self,
        table: &str,
        err: &(dyn Error + '_),
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.error_sql(SqlOperation::Delete, table, err, fields);
    }

    /// Emit an Error record, then panic with the prefixed message.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: impl IntoIterator<Item = Field>) -> ! {
        self.log(Level::Error, msg, fields);
        panic!("{}", self.prefixed(msg))
    }

    /// Emit an Error record, close the dispatch chain and exit with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: impl IntoIterator<Item = Field>) -> ! {
        self.log(Level::Error, msg, fields);
        if let Err(e) = self.chain.close() {
            eprintln!("failed to close log sinks: {e}");
        }
        process::exit(1)
    }

    /// Emit the closing `"end"` record and retire the handle.
    #[track_caller]
    pub fn end(mut self) {
        if mem::take(&mut self.pending_end) {
            self.log(Level::Info, MSG_END, []);
        }
    }

    /// Run `f` and finalize the handle on every exit path.
    ///
    /// If `f` panics, an Error record `"the panic was caught"` carrying the
    /// panic message and a stack trace is emitted, then the `"end"` record,
    /// and the original payload is re-raised with
    /// [`resume_unwind`](std::panic::resume_unwind). Otherwise only `"end"`
    /// is emitted and `f`'s value is returned.
    ///
    /// `f` only borrows the handle, so it cannot end it early.
    #[track_caller]
    pub fn scope<T>(mut self, f: impl FnOnce(&Logger) -> T) -> T {
        let origin = Location::caller();
        let owns_end = mem::take(&mut self.pending_end);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&self)));
        if let Err(payload) = &outcome {
            self.report_panic(panic_message(&**payload), origin);
        }
        if owns_end {
            self.report(Level::Info, MSG_END, Vec::new(), origin);
        }
        match outcome {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Emit a record and return the dispatch result instead of reporting it.
    #[track_caller]
    pub fn try_log(
        &self,
        level: Level,
        msg: &str,
        fields: impl IntoIterator<Item = Field>,
    ) -> Result<(), SinkError> {
        if !self.chain.enabled(level) {
            return Ok(());
        }
        self.dispatch(level, msg, fields, Location::caller())
    }

    #[track_caller]
    pub(crate) fn log(&self, level: Level, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.report(level, msg, fields, Location::caller());
    }

    fn report(
        &self,
        level: Level,
        msg: &str,
        fields: impl IntoIterator<Item = Field>,
        origin: &'static Location<'static>,
    ) {
        if !self.chain.enabled(level) {
            return;
        }
        if let Err(e) = self.dispatch(level, msg, fields, origin) {
            eprintln!("failed to emit log record: {e}");
        }
    }

    fn dispatch(
        &self,
        level: Level,
        msg: &str,
        fields: impl IntoIterator<Item = Field>,
        origin: &'static Location<'static>,
    ) -> Result<(), SinkError> {
        let mut all = Vec::with_capacity(self.context.values().len() + self.fields.len() + 2);
        all.extend_from_slice(self.context.values());
        all.extend_from_slice(&self.fields);
        all.extend(fields);
        let record = Record::new(level, self.prefixed(msg), all).with_origin(origin);
        self.chain.emit(&record)
    }

    fn report_panic(&self, message: String, origin: &'static Location<'static>) {
        if !self.chain.enabled(Level::Error) {
            return;
        }
        let fields = vec![
            Field::new("error", message),
            Field::new("stacktrace", Backtrace::force_capture().to_string()),
        ];
        self.report(Level::Error, MSG_PANIC_WAS_CAUGHT, fields, origin);
    }

    fn prefixed(&self, msg: &str) -> String {
        if self.function_name.is_empty() {
            msg.to_string()
        } else {
            format!("{}{FUNC_NAME_SEPARATOR}{msg}", self.function_name)
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("function_name", &self.function_name)
            .field("context", &self.context)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.pending_end && thread::panicking() {
            self.pending_end = false;
            self.report_panic(UNKNOWN_PANIC_PAYLOAD.to_string(), self.minted_at);
            self.report(Level::Info, MSG_END, Vec::new(), self.minted_at);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
