use crate::caller::CallerSink;
use crate::config::{Config, ConfigError};
use crate::console::ConsoleSink;
use crate::context::Context;
use crate::fanout::fan_out;
use crate::file::FileSink;
use crate::level::Level;
use crate::logger::{Logger, MSG_START, MSG_START_WITH_PARAMS};
use crate::record::Field;
use crate::sink::{LogSink, SinkError};
use std::sync::Arc;

/// Process-scoped construction point for [`Logger`] handles.
///
/// Builds the dispatch chain once (`sink -> CallerSink -> fan-out`) and
/// shares it with every handle it mints. There is no global instance:
/// create one at startup and pass it (or an `Arc` of it) to the code that
/// needs loggers.
pub struct LoggerFactory {
    chain: Arc<dyn LogSink>,
    config: Config,
}

impl LoggerFactory {
    /// Build the standard chain: a stderr console sink and, when
    /// `config.output_path` is set, a JSON file sink.
    ///
    /// **Returns**
    /// - `Err(ConfigError::OpenFile)` if the log file cannot be opened.
    ///
    /// An unrecognized `log_level` is not an error; it falls back to
    /// [`Level::MOST_VERBOSE`].
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let level = config.level();
        let mut sinks: Vec<Box<dyn LogSink>> = Vec::with_capacity(2);

        let console = ConsoleSink::stderr(level)
            .with_service(&config.service_name, &config.version)
            .with_ansi(config.colorize);
        sinks.push(Box::new(console));

        if let Some(path) = config.file_path() {
            let file = FileSink::open(level, path)
                .map_err(|source| ConfigError::OpenFile {
                    path: path.to_path_buf(),
                    source,
                })?
                .with_service(&config.service_name, &config.version);
            sinks.push(Box::new(file));
        }

        Ok(Self::from_sinks(config, sinks))
    }

    /// Build a factory over caller-provided sinks.
    ///
    /// Each sink is wrapped in a [`CallerSink`] and the result is composed
    /// with [`fan_out`].
    pub fn from_sinks(config: Config, sinks: Vec<Box<dyn LogSink>>) -> Self {
        let enriched = sinks
            .into_iter()
            .map(|sink| Box::new(CallerSink::new(sink)) as Box<dyn LogSink>)
            .collect();
        LoggerFactory {
            chain: Arc::from(fan_out(enriched)),
            config,
        }
    }

    /// Mint a handle for `function_name` and emit its `"start"` record.
    ///
    /// With initial `fields` the record reads `"start with params"` and
    /// carries them; later records from the handle do not. Prefer the
    /// [`get_logger!`](crate::get_logger) macro, which fills in the name of
    /// the enclosing function.
    #[track_caller]
    pub fn get_logger(
        &self,
        function_name: &str,
        context: Context,
        fields: impl IntoIterator<Item = Field>,
    ) -> Logger {
        let fields: Vec<Field> = fields.into_iter().collect();
        let msg = if fields.is_empty() {
            MSG_START
        } else {
            MSG_START_WITH_PARAMS
        };
        let logger = Logger::new(Arc::clone(&self.chain), function_name, context);
        logger.log(Level::Info, msg, fields);
        logger
    }

    /// The shared dispatch chain, e.g. for [`DispatchLayer`](crate::layer::DispatchLayer).
    pub fn dispatcher(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.chain)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flush every sink and release the log file.
    ///
    /// Safe to call more than once. Handles that outlive the call keep
    /// logging to the console; file emission then fails with
    /// [`SinkError::Closed`].
    pub fn close(&self) -> Result<(), SinkError> {
        self.chain.close()
    }
}

/// Mint a [`Logger`] named after the enclosing function.
///
/// ```ignore
/// let log = scopelog::get_logger!(factory, ctx.clone(), Field::new("words", req.words));
/// ```
#[macro_export]
macro_rules! get_logger {
    ($factory:expr, $ctx:expr $(,)?) => {
        $factory.get_logger(
            $crate::function_name!(),
            $ctx,
            ::std::iter::empty::<$crate::record::Field>(),
        )
    };
    ($factory:expr, $ctx:expr, $($field:expr),+ $(,)?) => {
        $factory.get_logger($crate::function_name!(), $ctx, [$($field),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_sink::MemorySink;
    use std::thread;

    #[test]
    fn console_only_without_output_path() {
        let config = Config::new("svc", "1.0.0").with_level("error");
        let factory = LoggerFactory::new(config).unwrap();
        let chain = factory.dispatcher();
        assert!(!chain.enabled(Level::Warning));
        assert!(chain.enabled(Level::Error));
        factory.close().unwrap();
    }

    #[test]
    fn unknown_level_enables_debug() {
        let config = Config::new("svc", "1.0.0").with_level("chatty");
        let factory = LoggerFactory::new(config).unwrap();
        assert!(factory.dispatcher().enabled(Level::Debug));
    }

    #[test]
    fn unopenable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::new("svc", "1").with_output_path(dir.path().join("no/such/dir.log"));
        let err = LoggerFactory::new(cfg).err().expect("open must fail");
        assert!(matches!(err, ConfigError::OpenFile { .. }));
        assert!(err.to_string().contains("failed to open log file"));
    }

    #[test]
    fn macro_captures_enclosing_function() {
        fn generate_many(factory: &LoggerFactory) -> Logger {
            crate::get_logger!(factory, Context::background(), Field::new("names", 3))
        }

        let memory = MemorySink::new(Level::Debug);
        let factory = LoggerFactory::from_sinks(
            Config::default(),
            vec![Box::new(memory.clone()) as Box<dyn LogSink>],
        );

        let logger = generate_many(&factory);
        assert_eq!(logger.function_name(), "generate_many");

        let plain = crate::get_logger!(factory, Context::background());
        assert_eq!(plain.function_name(), "macro_captures_enclosing_function");

        assert_eq!(
            memory.messages(),
            vec![
                "generate_many: start with params",
                "macro_captures_enclosing_function: start",
            ]
        );
    }

    #[test]
    fn concurrent_handles_lose_nothing() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let first = MemorySink::new(Level::Debug);
        let second = MemorySink::new(Level::Info);
        let factory = LoggerFactory::from_sinks(
            Config::default(),
            vec![
                Box::new(first.clone()) as Box<dyn LogSink>,
                Box::new(second.clone()),
            ],
        );

        thread::scope(|s| {
            for t in 0..THREADS {
                let factory = &factory;
                s.spawn(move || {
                    let logger = factory.get_logger("worker", Context::background(), []);
                    for i in 0..PER_THREAD {
                        logger.info("tick", [Field::new("thread", t), Field::new("i", i)]);
                    }
                });
            }
        });

        let ticks = |sink: &MemorySink| {
            sink.records()
                .iter()
                .filter(|r| r.message == "worker: tick")
                .count()
        };
        assert_eq!(ticks(&first), THREADS * PER_THREAD);
        assert_eq!(ticks(&second), THREADS * PER_THREAD);
        assert_eq!(first.len(), THREADS * (PER_THREAD + 1));
    }
}
