//! Logging configuration.

use slog::Drain;

/// Initialize the root logger.
///
/// Everything goes to stderr so that the terminal output of the import can
/// be redirected independently. `verbosity` is the count of `-v` flags:
/// 0 logs info and up, 1 adds debug, anything more adds trace.
///
/// # Errors
///
/// Currently infallible; returns `anyhow::Result` so callers don't need to
/// change if initialization gains failure modes.
pub fn init(verbosity: u8) -> anyhow::Result<slog::Logger> {
    let level = match verbosity {
        0 => slog::Level::Info,
        1 => slog::Level::Debug,
        _ => slog::Level::Trace,
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(level).fuse();

    Ok(slog::Logger::root(drain, slog::o!()))
}
