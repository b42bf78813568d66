use thiserror::Error;

/// Errors that can arise when decoding payloads or scenario lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown scenario command: {0}")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected} fields, got {got}")]
    WrongArity {
        command: char,
        expected: usize,
        got: usize,
    },

    #[error("invalid field: {0}")]
    InvalidField(&'static str),
}
