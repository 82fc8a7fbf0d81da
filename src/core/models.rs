use serde::{
    Deserialize,
    Serialize,
};

/// One entry of the vocabulary list, as produced by the generator or pasted by the user.
///
/// The session never edits these; it only reorders and repeats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub term: String,
    pub begin_timestamp: String, // HH:MM:SS,mmm
    pub end_timestamp: String,
    #[serde(default)]
    pub english_meaning: String,
    #[serde(default)]
    pub turkish_meaning: String,
    #[serde(default)]
    pub sample_sentence_in_english: String,
    #[serde(default)]
    pub sample_sentence_in_turkish: String,
}

impl VocabularyItem {
    pub fn new(term: &str, begin_timestamp: &str, end_timestamp: &str) -> Self {
        Self {
            term: term.to_string(),
            begin_timestamp: begin_timestamp.to_string(),
            end_timestamp: end_timestamp.to_string(),
            english_meaning: String::new(),
            turkish_meaning: String::new(),
            sample_sentence_in_english: String::new(),
            sample_sentence_in_turkish: String::new(),
        }
    }
}

/// Latest answer for a term plus whether it was ever answered "didn't know".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub word: VocabularyItem,
    pub known: bool,
    pub was_unknown: bool, // sticky once set
}

impl ResponseRecord {
    pub fn new(word: VocabularyItem, known: bool) -> Self {
        Self { word, known, was_unknown: !known }
    }

    pub fn update(&mut self, known: bool) {
        self.known = known;
        self.was_unknown |= !known;
    }
}

/// Entry written to the results file for every word the learner did not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownWord {
    pub term: String,
}

impl From<&ResponseRecord> for UnknownWord {
    fn from(record: &ResponseRecord) -> Self {
        Self { term: record.word.term.clone() }
    }
}
