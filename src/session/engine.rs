use std::collections::{
    HashMap,
    HashSet,
};

use thiserror::Error;
use tracing::{
    debug,
    info,
    warn,
};

use super::SessionError;
use crate::core::{
    ResponseRecord,
    UnknownWord,
    VocabularyItem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Word-by-word review over a vocabulary list.
///
/// Every "didn't know" answer appends the word to the end of the queue so it comes
/// back later in the same pass. The session can only be finished once every word of
/// the original list has "known" as its latest answer.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    words: Vec<VocabularyItem>,
    queue: Vec<usize>, // indices into `words`
    current: usize,
    responses: Vec<ResponseRecord>,
    response_index: HashMap<String, usize>,
}

/// Returned by [`ReviewSession::finish`] when some word is still unknown.
/// The session is handed back untouched so the review can go on.
#[derive(Error, Debug)]
#[error(
    "Please respond to all words with \"I already knew\" before finishing ({} remaining)",
    .remaining.len()
)]
pub struct IncompleteSession {
    pub session: ReviewSession,
    pub remaining: Vec<String>,
}

impl IncompleteSession {
    pub fn into_session(self) -> ReviewSession {
        self.session
    }
}

impl From<IncompleteSession> for SessionError {
    fn from(error: IncompleteSession) -> Self {
        SessionError::Incomplete { remaining: error.remaining }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResults {
    pub records: Vec<ResponseRecord>, // one per distinct term, in first-answer order
}

impl SessionResults {
    pub fn unknown_words(&self) -> Vec<UnknownWord> {
        self.records.iter().filter(|r| r.was_unknown).map(UnknownWord::from).collect()
    }
}

impl ReviewSession {
    /// Start a session. Repeated terms are collapsed onto their first occurrence.
    pub fn new(words: Vec<VocabularyItem>) -> Result<Self, SessionError> {
        if words.is_empty() {
            return Err(SessionError::EmptyWordList);
        }

        let mut seen = HashSet::new();
        let total = words.len();
        let words: Vec<VocabularyItem> =
            words.into_iter().filter(|w| seen.insert(w.term.clone())).collect();

        if words.len() < total {
            warn!(
                dropped = total - words.len(),
                "[Session] Duplicate terms in word list collapsed to their first occurrence"
            );
        }

        info!(words = words.len(), "[Session] Review session started");

        Ok(Self {
            queue: (0..words.len()).collect(),
            words,
            current: 0,
            responses: Vec::new(),
            response_index: HashMap::new(),
        })
    }

    pub fn current_item(&self) -> Result<&VocabularyItem, SessionError> {
        self.queue
            .get(self.current)
            .map(|&i| &self.words[i])
            .ok_or(SessionError::OutOfRange { index: self.current, len: self.queue.len() })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Length of the queue, repeats included.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn original_words(&self) -> &[VocabularyItem] {
        &self.words
    }

    pub fn queue(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.queue.iter().map(|&i| &self.words[i])
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.queue.len()
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    pub fn response_for(&self, term: &str) -> Option<&ResponseRecord> {
        self.response_index.get(term).map(|&i| &self.responses[i])
    }

    /// Latest answer for the word under the cursor, if any.
    pub fn current_response(&self) -> Option<bool> {
        let item = self.current_item().ok()?;
        self.response_for(&item.term).map(|r| r.known)
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_response().is_some()
    }

    pub fn record_response(&mut self, known: bool) -> Result<(), SessionError> {
        let word_index = *self
            .queue
            .get(self.current)
            .ok_or(SessionError::OutOfRange { index: self.current, len: self.queue.len() })?;
        let item = &self.words[word_index];

        let existing = self.response_index.get(&item.term).copied();
        match existing {
            Some(i) => self.responses[i].update(known),
            None => {
                self.response_index.insert(item.term.clone(), self.responses.len());
                self.responses.push(ResponseRecord::new(item.clone(), known));
            }
        }

        debug!(term = %item.term, known, position = self.current, "[Session] Recorded response");

        if !known {
            self.queue.push(word_index);
            self.current += 1;
        } else if !self.is_last() {
            self.current += 1;
        }

        Ok(())
    }

    pub fn can_navigate(&self, direction: Direction) -> bool {
        match direction {
            Direction::Previous => self.current > 0,
            Direction::Next => !self.is_last() && self.is_current_answered(),
        }
    }

    /// Move the cursor. Moving forward requires the current word to be answered.
    /// Returns whether the cursor moved.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if !self.can_navigate(direction) {
            return false;
        }

        match direction {
            Direction::Previous => self.current -= 1,
            Direction::Next => self.current += 1,
        }
        true
    }

    /// Terms from the original list whose latest answer is not "known".
    pub fn remaining_terms(&self) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| !self.response_for(&w.term).is_some_and(|r| r.known))
            .map(|w| w.term.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.words.iter().all(|w| self.response_for(&w.term).is_some_and(|r| r.known))
    }

    pub fn finish(self) -> Result<SessionResults, IncompleteSession> {
        let remaining = self.remaining_terms();
        if !remaining.is_empty() {
            return Err(IncompleteSession { session: self, remaining });
        }

        info!(records = self.responses.len(), "[Session] Review session finished");
        Ok(SessionResults { records: self.responses })
    }
}
