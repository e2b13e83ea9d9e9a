use std::thread;
use std::time::Instant;

use scopelog::noop_sink::NoopSink;
use scopelog::{Config, Context, Field, LogSink, LoggerFactory};

fn main() {
    let threads = 4;
    let n: u64 = 100_000;

    // Disabled sink: measures the cost of the facade itself.
    let factory = LoggerFactory::from_sinks(
        Config::default(),
        vec![Box::new(NoopSink) as Box<dyn LogSink>],
    );

    let start = Instant::now();
    thread::scope(|s| {
        for t in 0..threads {
            let factory = &factory;
            s.spawn(move || {
                let log = factory.get_logger("load", Context::background(), []);
                for i in 0..n {
                    log.error(
                        "load test error",
                        [Field::new("thread", t), Field::new("iteration", i)],
                    );
                }
                log.end();
            });
        }
    });

    let total = n * threads as u64;
    let elapsed = start.elapsed();
    println!(
        "noop sink: {} calls in {:?} (~{:.0} calls/s)",
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64()
    );
}
