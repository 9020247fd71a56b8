//! blink — drives a counter process and prints its `out` bit each cycle.
//!
//! Usage: blink [config.json]

use std::path::PathBuf;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clock_kernel::{one, zero, State};
use clock_runtime::{Result, RuntimeConfig, Session};

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_config() -> Result<RuntimeConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RuntimeConfig::load(&path),
        None => Ok(RuntimeConfig::default()),
    }
}

fn run(config: &RuntimeConfig) -> Result<()> {
    let width = config.counter_width;
    let mut session = Session::from_config(config);
    let blink = session.add_process(
        "blink",
        State::new().with("counter", zero(width)).with("out", false),
        move |s| {
            let counter = s.vector("counter")?;
            Ok(State::new()
                .with("counter", counter.add(&one(width))?)
                .with("out", counter.get(width as isize - 1)?))
        },
    )?;

    for _ in 0..config.cycles {
        println!("{}", blink.bool("out")?);
        session.step()?;
    }

    tracing::info!(edges = session.edge(), hash = %session.hash(), "run complete");
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("blink: {}", e);
            std::process::exit(2);
        }
    };
    init_tracing(&config.log_filter);

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "run failed");
        eprintln!("blink: {}", e);
        std::process::exit(1);
    }
}
