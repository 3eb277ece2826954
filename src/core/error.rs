use thiserror::Error;

/// Core error types for fileprog
///
/// Trackers never fail; errors come from the surfaces around them (loading
/// configuration and replay scripts, binding a slot to a runtime).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Replay script is structurally valid JSON but not a usable script
    #[error("Invalid script step {step}: {message}")]
    Script { step: usize, message: String },

    /// Configuration value out of range
    #[error("Invalid configuration for {field}: {message}")]
    Config { field: String, message: String },

    /// Async slot created outside of a tokio runtime
    #[error("No async runtime available: {0}")]
    Runtime(String),
}

impl Error {
    pub fn script(step: usize, message: impl Into<String>) -> Self {
        Self::Script {
            step,
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_names_step() {
        let err = Error::script(3, "wait_ms must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid script step 3: wait_ms must be positive"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::config("animation_complete_ms", "too large");
        assert!(err.to_string().contains("animation_complete_ms"));
    }
}
