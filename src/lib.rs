pub mod app;
pub mod core;
pub mod media;
pub mod persistence;
pub mod player;
pub mod session;
pub mod settings;
pub mod subtitles;
pub mod vocabulary;

pub use crate::core::{
    FlicktionaryError,
    ResponseRecord,
    VocabularyItem,
};
pub use session::{
    Direction,
    ReviewSession,
    SessionError,
};
