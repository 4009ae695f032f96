pub mod alignment;
pub mod config;
pub mod evaluation;
pub mod features;
pub mod input;
pub mod learning;
pub mod report;
pub mod validate;
pub mod word;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Logs to stderr. Without `-v` the level comes from `RUST_LOG`, falling back to warnings.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
