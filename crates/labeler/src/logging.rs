// crates/labeler/src/logging.rs
//! Tracing subscriber setup for the binary.

use sentiment_pulse_core::{LogFormat, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Workspace crates at `info`, everything else (sqlx, reqwest, hyper) at `warn`.
pub const DEFAULT_FILTER: &str =
    "warn,sentiment_pulse=info,sentiment_pulse_core=info,sentiment_pulse_db=info";

const VERBOSE_FILTER: &str =
    "warn,sentiment_pulse=debug,sentiment_pulse_core=debug,sentiment_pulse_db=debug";

const LOG_FILE_PREFIX: &str = "sentiment-pulse.log";

/// Filter from `RUST_LOG`, falling back to the defaults above.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process or buffered file output is lost.
pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let console = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let (file, guard) = match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(console)
        .with(file)
        .try_init()?;
    Ok(guard)
}
