pub mod errors;
pub mod filename_parser;
pub mod http;
pub mod models;
pub mod tasks;

pub use errors::FlicktionaryError;
pub use models::{
    ResponseRecord,
    UnknownWord,
    VocabularyItem,
};
