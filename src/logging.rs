use time::UtcOffset;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "thermostat.log";

/// Logs go to stdout, and also to a daily rolling file if a directory is configured.
/// `log` records from dependencies are forwarded into tracing.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingHandle, String> {
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or_else(|err| {
            eprintln!("Failed to get timezone: {}", err);
            UtcOffset::UTC
        }),
        time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second] +[offset_hour]"
        ),
    );

    let env_filter = read_filter(config.get_filter()).unwrap_or_else(|err| {
        eprintln!("{}, using environment variable or default", err);
        EnvFilter::builder()
            .with_default_directive(Level::INFO.into())
            .from_env_lossy()
    });

    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer.clone())
        .with_writer(stdout);

    let (file_layer, file_guard) = match config.get_directory() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (file, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| format!("failed to initialize logger: {}", err))?;
    tracing_log::LogTracer::init()
        .map_err(|err| format!("failed to forward log records: {}", err))?;

    Ok(LoggingHandle {
        _stdout_guard: stdout_guard,
        _file_guard: file_guard,
    })
}

/// Configured directives win, then `RUST_LOG`, then `info`.
fn read_filter(configured: Option<&str>) -> Result<EnvFilter, String> {
    let builder = EnvFilter::builder().with_default_directive(Level::INFO.into());
    match configured {
        Some(directives) => builder.parse(directives)
            .map_err(|err| format!("Failed to parse log filter '{}': {}", directives, err)),
        None => Ok(builder.from_env_lossy()),
    }
}

/// Logs are only flushed while this is alive; hold it until exit.
pub struct LoggingHandle {
    _stdout_guard: WorkerGuard,
    _file_guard: Option<WorkerGuard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_filter() {
        let filter = read_filter(Some("warn,switchbot_thermostat=debug")).unwrap();
        assert!(filter.to_string().contains("switchbot_thermostat=debug"));

        assert!(read_filter(Some("info,switchbot_thermostat=loud")).is_err());
    }
}
