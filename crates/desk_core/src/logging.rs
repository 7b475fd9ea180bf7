//! Logging setup.
//!
//! Library code only emits `tracing` events; the embedding application decides where they go.

use tracing_subscriber::EnvFilter;

use crate::error::{codes, AppError};

/// Install a stderr fmt subscriber. `RUST_LOG` overrides `level` when set.
pub fn init(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            AppError::new(codes::LOGGING_INIT_FAILED, "Failed to install log subscriber")
                .with_details(e.to_string())
        })?;

    tracing::info!(log_level = level, "Logging initialized");
    Ok(())
}

/// Initialize logging for tests (captured by the test harness). Safe to call repeatedly.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_reported() {
        let _ = init("debug");
        let err = init("debug").unwrap_err();
        assert_eq!(err.code, codes::LOGGING_INIT_FAILED);
    }
}
