use thiserror::Error;

use tickerfeed_core::{ConfigError, FetchError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Fetch(FetchError::Parameter(_)) => 2,
            Self::Fetch(FetchError::DailyCap { .. }) => 3,
            Self::Fetch(FetchError::Exhausted { .. }) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use tickerfeed_core::{AttemptError, ValidationError};

    use super::*;

    #[test]
    fn parameter_errors_exit_with_usage_code() {
        let error = CliError::from(FetchError::from(ValidationError::ZeroLimit));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn upstream_failures_exit_with_fetch_code() {
        let capped = CliError::from(FetchError::DailyCap {
            message: String::from("25 requests per day"),
        });
        let exhausted = CliError::from(FetchError::Exhausted {
            last_error: AttemptError::Status { status: 500 },
            daily_cap: None,
        });

        assert_eq!(capped.exit_code(), 3);
        assert_eq!(exhausted.exit_code(), 3);
    }
}
