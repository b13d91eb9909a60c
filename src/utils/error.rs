use thiserror::Error;

/// Reasons a piece of user text cannot become a color identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No color identity given")]
    EmptyIdentity,

    #[error("Too many colors in '{candidate}': {length} symbols, at most 5 allowed")]
    TooManyColors { candidate: String, length: usize },

    #[error("Invalid color code '{candidate}': use W, U, B, R, G or color names")]
    InvalidColorCode { candidate: String },
}

#[derive(Error, Debug)]
pub enum FinderError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Search failed: {message}")]
    SearchFailed { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        FinderError::SearchFailed {
            message: err.to_string(),
        }
    }
}

impl FinderError {
    pub fn search_failed(message: impl Into<String>) -> Self {
        FinderError::SearchFailed {
            message: message.into(),
        }
    }

    /// Short text suitable for showing directly to the user.
    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::Identity(IdentityError::EmptyIdentity) => {
                "Please enter a color identity, e.g. \"UB\" or \"blue black\".".to_string()
            }
            FinderError::Identity(IdentityError::TooManyColors { length, .. }) => {
                format!("A color identity has at most 5 colors, got {}.", length)
            }
            FinderError::Identity(IdentityError::InvalidColorCode { candidate }) => format!(
                "\"{}\" is not a color identity. Use W, U, B, R, G or white, blue, black, red, green.",
                candidate
            ),
            FinderError::SearchFailed { message } => {
                format!("Could not fetch commanders: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            FinderError::Identity(_) => 2,
            FinderError::SearchFailed { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_errors_keep_their_kind() {
        let err: FinderError = IdentityError::EmptyIdentity.into();
        assert!(matches!(
            err,
            FinderError::Identity(IdentityError::EmptyIdentity)
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn search_failures_carry_message() {
        let err = FinderError::search_failed("HTTP 500");
        assert_eq!(err.to_string(), "Search failed: HTTP 500");
        assert!(err.user_friendly_message().contains("HTTP 500"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn config_errors_exit_with_one() {
        let err = FinderError::InvalidConfigValueError {
            field: "api.endpoint".to_string(),
            value: "invalid-url".to_string(),
            reason: "Invalid URL format".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.user_friendly_message(),
            "Invalid value 'invalid-url' for api.endpoint: Invalid URL format"
        );
    }
}
