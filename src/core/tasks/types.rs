use std::{
    path::PathBuf,
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
    },
    thread::JoinHandle,
};

use crate::core::VocabularyItem;

#[derive(Debug, Clone)]
pub enum TaskResult {
    SubtitlesExtracted(Result<String, String>),
    AudioConverted(Result<PathBuf, String>),
    VideoConverted(Result<PathBuf, String>),
    VocabularyGenerated(Result<Vec<VocabularyItem>, String>),
    LoadingMessage(String),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::SubtitlesExtracted(_) => "subtitle_extraction",
            TaskResult::AudioConverted(_) => "audio_conversion",
            TaskResult::VideoConverted(_) => "video_conversion",
            TaskResult::VocabularyGenerated(_) => "vocabulary_generation",
            TaskResult::LoadingMessage(_) => "loading_message",
        }
    }
}

/// Long-running ffmpeg jobs that the user may abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancellableTask {
    AudioConversion,
    VideoConversion,
}

pub struct TaskHandle {
    cancel_token: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn spawn<F>(job: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let cancel_token = Arc::new(AtomicBool::new(false));
        let token = cancel_token.clone();
        let worker = std::thread::spawn(move || job(token));
        Self { cancel_token, worker }
    }

    pub fn cancel(&self) {
        self.cancel_token.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }
}
