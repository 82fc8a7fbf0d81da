use thiserror::Error;

use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum FlicktionaryError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid vocabulary list: {0}")]
    InvalidVocabulary(String),

    #[error("No Gemini API key configured")]
    MissingApiKey,

    #[error("Vocabulary generation failed: {0}")]
    Generation(String),

    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    #[error("Task cancelled")]
    Cancelled,

    #[error("FlicktionaryError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for FlicktionaryError {
    fn from(error: std::io::Error) -> Self {
        FlicktionaryError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FlicktionaryError {
    fn from(error: reqwest::Error) -> Self {
        FlicktionaryError::Reqwest(Box::new(error))
    }
}
