use time::{macros::format_description, UtcOffset};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

/// Installs the global subscriber. Release builds write to `logs/<prefix>.<date>`;
/// the returned guard must be held for the lifetime of the process.
pub fn init_log(prefix: &str) -> Option<WorkerGuard> {
    let local_time = OffsetTime::new(
        UtcOffset::from_hms(8, 0, 0).unwrap_or(UtcOffset::UTC),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"),
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !cfg!(debug_assertions) {
        let file_appender = tracing_appender::rolling::daily("logs", prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_timer(local_time)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_timer(local_time)
            .with_env_filter(filter)
            .init();
        None
    }
}
