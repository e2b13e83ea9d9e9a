//! Structured logging facade.
//!
//! A [`LoggerFactory`] turns a [`Config`] into a dispatch chain of sinks
//! (console, plus a JSON file when configured), each wrapped so that records
//! carry their source location. Application code asks the factory for a
//! [`Logger`] per unit of work and logs through it:
//!
//! ```no_run
//! use scopelog::{get_logger, Config, Context, Field, LoggerFactory};
//!
//! fn generate(factory: &LoggerFactory, words: u32) -> String {
//!     let log = get_logger!(factory, Context::background(), Field::new("words", words));
//!     log.scope(|log| {
//!         log.debug("picking words", []);
//!         "brave-otter".to_string()
//!     })
//! }
//!
//! let factory = LoggerFactory::new(Config::new("petname", "1.0.0").with_level("debug"))?;
//! generate(&factory, 2);
//! factory.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod caller;
pub mod config;
pub mod console;
pub mod context;
pub mod env;
pub mod factory;
pub mod fanout;
pub mod file;
pub mod level;
pub mod logger;
pub mod memory_sink;
pub mod noop_sink;
pub mod record;
pub mod sink;

#[cfg(feature = "tracing-bridge")]
pub mod init;
#[cfg(feature = "tracing-bridge")]
pub mod layer;

pub use config::{Config, ConfigError};
pub use context::Context;
pub use factory::LoggerFactory;
pub use level::Level;
pub use logger::{Logger, SqlOperation};
pub use record::{Field, Record};
pub use sink::{LogSink, SinkError};
