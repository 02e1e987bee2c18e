use log::LevelFilter;
use std::io::{self, IsTerminal};

pub fn is_pipe() -> bool {
    !io::stdout().is_terminal()
}

pub fn print_info(msg: &str) {
    if !is_pipe() {
        println!("{}", msg);
    }
}

/// Maps the number of `-v` flags to a log level.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sets up `env_logger`. `RUST_LOG` takes precedence over `-v`.
pub fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(verbose));
    builder.parse_env(env_logger::Env::default());
    // A logger may already be installed, e.g. by a test harness.
    let _ = builder.try_init();
}
