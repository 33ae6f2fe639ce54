use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::{
    config::LogConfig,
    error::{LogError, LogResult},
    object::LogClock,
};

/// Install a human-readable subscriber with optional ANSI colors.
pub fn install_text(cfg: &LogConfig) -> LogResult<()> {
    let layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LogClock::new(cfg.tz));

    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

/// Install a subscriber that writes one JSON object per event.
pub fn install_json(cfg: &LogConfig) -> LogResult<()> {
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(LogClock::new(cfg.tz));

    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

/// Install a subscriber that sends events to the systemd journal.
#[cfg(target_os = "linux")]
pub fn install_journald(cfg: &LogConfig) -> LogResult<()> {
    let layer = tracing_journald::layer().map_err(|e| LogError::Journald(e.to_string()))?;

    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

/// Journald is Linux-only; elsewhere this always fails.
#[cfg(not(target_os = "linux"))]
pub fn install_journald(_cfg: &LogConfig) -> LogResult<()> {
    Err(LogError::JournaldUnavailable)
}

/// Set `subscriber` as the global default. Fails if one is already set.
fn install<S>(subscriber: S) -> LogResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::object::LogFormat;

    #[test]
    fn second_install_is_rejected() {
        let cfg = LogConfig {
            format: LogFormat::Text,
            use_color: false,
            ..Default::default()
        };

        // Other tests may have installed a subscriber already; either way the
        // second call in this test must fail.
        let _ = install_text(&cfg);
        assert!(matches!(install_text(&cfg), Err(LogError::AlreadyInitialized)));
    }

    #[test]
    #[cfg(not(target_os = "linux"))]
    fn journald_is_unavailable_off_linux() {
        let cfg = LogConfig::default();
        assert!(matches!(
            install_journald(&cfg),
            Err(LogError::JournaldUnavailable)
        ));
    }
}
