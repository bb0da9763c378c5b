//! Target-scoped logging macros shared by the Receiv3 crates.

pub use tracing;
use tracing::level_filters::LevelFilter;
pub use tracing_subscriber;
use tracing_subscriber::EnvFilter;

/// A [`trace`] log with the target `"receiv3"`
///
/// [`trace`]: tracing::trace
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($tt:tt)*) => {
        $crate::tracing::trace!(target: $target, $($tt)*)
    };
    ($($tt:tt)*) => {
        $crate::tracing::trace!(target: "receiv3", $($tt)*)
    }
}

/// A [`debug`] log with the target `"receiv3"`
///
/// [`debug`]: tracing::debug
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($tt:tt)*) => {
        $crate::tracing::debug!(target: $target, $($tt)*)
    };
    ($($tt:tt)*) => {
        $crate::tracing::debug!(target: "receiv3", $($tt)*)
    }
}

/// An [`info`] log with the target `"receiv3"`
///
/// [`info`]: tracing::info
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($tt:tt)*) => {
        $crate::tracing::info!(target: $target, $($tt)*)
    };
    ($($tt:tt)*) => {
        $crate::tracing::info!(target: "receiv3", $($tt)*)
    }
}

/// A [`warn`] log with the target `"receiv3"`
///
/// [`warn`]: tracing::warn
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($tt:tt)*) => {
        $crate::tracing::warn!(target: $target, $($tt)*)
    };
    ($($tt:tt)*) => {
        $crate::tracing::warn!(target: "receiv3", $($tt)*)
    }
}

/// An [`error`] log with the target `"receiv3"`
///
/// [`error`]: tracing::error
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($tt:tt)*) => {
        $crate::tracing::error!(target: $target, $($tt)*)
    };
    ($($tt:tt)*) => {
        $crate::tracing::error!(target: "receiv3", $($tt)*)
    }
}

/// Environment variable holding filter directives, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "RECEIV3_LOG";

/// Transport internals that are noisy below `WARN`. User directives for the
/// same targets override these.
const QUIET_TARGETS: &[&str] = &[
    "hyper=warn",
    "hyper_util=warn",
    "reqwest=warn",
    "alloy_transport_http=warn",
    "alloy_pubsub=warn",
];

/// Sets up the logging for any crate, honoring `RECEIV3_LOG` or `RUST_LOG`
/// and defaulting to `INFO`.
pub fn setup_log() {
    setup_log_with_level(LevelFilter::INFO);
}

/// Sets up the logging with `level` as the default directive.
///
/// Directives from the environment still take precedence.
pub fn setup_log_with_level(level: LevelFilter) {
    use tracing_subscriber::util::SubscriberInitExt;

    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    let _ = tracing_subscriber::fmt::SubscriberBuilder::default()
        .without_time()
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
        .with_env_filter(log_filter(level, directives.as_deref()))
        .finish()
        .try_init();
}

/// Builds the filter from `level`, the quiet transport targets and the user
/// `directives`, in increasing precedence. Invalid directives are ignored.
#[must_use]
pub fn log_filter(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    let mut all = format!("{level},{}", QUIET_TARGETS.join(","));
    if let Some(directives) = directives.filter(|d| !d.trim().is_empty()) {
        all.push(',');
        all.push_str(directives);
    }
    EnvFilter::builder().parse_lossy(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: &EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn transport_targets_are_quiet_by_default() {
        let filter = rendered(&log_filter(LevelFilter::INFO, None));
        assert!(filter.contains("hyper=warn"), "{filter}");
        assert!(filter.contains("alloy_transport_http=warn"), "{filter}");
        assert!(filter.split(',').any(|d| d == "info"), "{filter}");
    }

    #[test]
    fn user_directives_take_precedence() {
        let filter = rendered(&log_filter(
            LevelFilter::INFO,
            Some("receiv3=trace,hyper=debug"),
        ));
        assert!(filter.contains("receiv3=trace"), "{filter}");
        assert!(filter.contains("hyper=debug"), "{filter}");
        assert!(!filter.contains("hyper=warn"), "{filter}");

        let filter = rendered(&log_filter(LevelFilter::INFO, Some("debug")));
        assert!(filter.split(',').any(|d| d == "debug"), "{filter}");
        assert!(!filter.split(',').any(|d| d == "info"), "{filter}");
    }

    #[test]
    fn invalid_directives_are_skipped() {
        let filter = rendered(&log_filter(LevelFilter::DEBUG, Some("receiv3=loud")));
        assert!(!filter.contains("loud"), "{filter}");
        assert!(filter.contains("reqwest=warn"), "{filter}");
    }
}
