use std::io;

use scopelog::{get_logger, Config, Context, Field, Logger, LoggerFactory};

/// Plays the role of an RPC handler: one logger per request, finalized by `scope`.
fn generate(factory: &LoggerFactory, ctx: Context, words: i64) -> Result<String, io::Error> {
    let log = get_logger!(factory, ctx, Field::new("words", words));
    log.scope(|log| {
        if words <= 0 {
            let err = io::Error::new(io::ErrorKind::InvalidInput, "words must be greater than 0");
            log.error_in("generate", &err, []);
            return Err(err);
        }
        let name = "brave-otter".to_string();
        log.info("generated", [Field::new("name", name.as_str())]);
        Ok(name)
    })
}

fn save(log: &Logger) {
    let err = io::Error::new(
        io::ErrorKind::Other,
        "duplicate key value violates unique constraint",
    );
    log.with_fields([Field::new("user_id", 42)])
        .error_sql_insert("users", &err, []);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env();
    if config.service_name.is_empty() {
        config = Config::new("example-service", "1.0.0").with_level("debug");
    }
    let factory = LoggerFactory::new(config)?;
    scopelog::init::init_tracing(&factory)?;

    let ctx = Context::background().with_value("request_id", "abc123");
    let _ = generate(&factory, ctx.clone(), 2);
    let _ = generate(&factory, ctx.clone(), 0);

    let log = get_logger!(factory, ctx);
    save(&log);
    tracing::warn!(component = "demo", "events from tracing reach the same sinks");
    log.end();

    factory.close()?;
    Ok(())
}
