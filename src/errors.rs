use thiserror::Error;

/// Errors surfaced by the stores, the gateway and the controller.
///
/// None of these is fatal: the controller turns each one into an inline
/// message on the screen that triggered it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("malformed data under key {key}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Message shown inline on the originating screen.
    pub fn inline_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid login".into(),
            AppError::DuplicateEmail => "email_exists".into(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Generation(_) => "Generation failed. Please try again.".into(),
            AppError::Corrupt { .. } | AppError::Storage(_) => {
                "Could not read or save local data".into()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_hide_transport_detail() {
        let err = AppError::generation("upstream returned 503");
        assert_eq!(err.inline_message(), "Generation failed. Please try again.");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn corrupt_error_names_key() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = AppError::Corrupt {
            key: "session-user".into(),
            source,
        };
        assert!(err.to_string().contains("session-user"));
    }
}
