pub mod engine;

use thiserror::Error;

pub use engine::{
    Direction,
    IncompleteSession,
    ReviewSession,
    SessionResults,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot start a session with an empty word list")]
    EmptyWordList,

    #[error("Position {index} is outside the session queue (length {len})")]
    OutOfRange { index: usize, len: usize },

    #[error(
        "Please respond to all words with \"I already knew\" before finishing ({} remaining)",
        .remaining.len()
    )]
    Incomplete { remaining: Vec<String> },
}
