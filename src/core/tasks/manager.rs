use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        mpsc,
        Arc,
    },
    thread,
    time::{
        Duration,
        Instant,
    },
};

use tokio::runtime::Runtime;
use tracing::info;

use super::{
    CancellableTask,
    TaskHandle,
    TaskResult,
};
use crate::{
    core::FlicktionaryError,
    media::Ffmpeg,
    vocabulary::GeminiClient,
};

/// Runs collaborator jobs (ffmpeg, vocabulary generation) off the caller's thread.
///
/// Results arrive on a channel and are collected with [`TaskManager::poll_results`]
/// or awaited with [`TaskManager::wait_for`].
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    cancellable: HashMap<CancellableTask, TaskHandle>,
}

impl TaskManager {
    pub fn new() -> Result<Self, FlicktionaryError> {
        let runtime = Arc::new(Runtime::new()?);
        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, cancellable: HashMap::new() })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Block until a task finishes, passing progress messages to `on_message`.
    pub fn wait_for(
        &mut self,
        timeout: Duration,
        mut on_message: impl FnMut(&str),
    ) -> Option<TaskResult> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.receiver.recv_timeout(remaining) {
                Ok(TaskResult::LoadingMessage(message)) => on_message(&message),
                Ok(result) => return Some(result),
                Err(_) => return None,
            }
        }
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    pub fn extract_subtitles(&self, ffmpeg: Ffmpeg, video: PathBuf) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let _ = sender
                .send(TaskResult::LoadingMessage("Extracting subtitles from video...".to_string()));

            let result = runtime
                .block_on(async { ffmpeg.extract_subtitles(&video).await })
                .map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::SubtitlesExtracted(result));
        });
    }

    pub fn generate_vocabulary(&self, client: GeminiClient, subtitles: String) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let _ = sender.send(TaskResult::LoadingMessage("Generating vocabulary...".to_string()));

            let result = runtime
                .block_on(async { client.generate(&subtitles).await })
                .map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::VocabularyGenerated(result));
        });
    }

    pub fn convert_audio(&mut self, ffmpeg: Ffmpeg, video: PathBuf) {
        let (sender, runtime) = self.task_context();
        self.cancel(CancellableTask::AudioConversion);

        let handle = TaskHandle::spawn(move |cancel| {
            let _ = sender.send(TaskResult::LoadingMessage("Converting audio...".to_string()));

            let result = runtime
                .block_on(async { ffmpeg.convert_to_mp3(&video, Some(cancel)).await })
                .map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::AudioConverted(result));
        });

        self.cancellable.insert(CancellableTask::AudioConversion, handle);
    }

    pub fn convert_video(&mut self, ffmpeg: Ffmpeg, input: PathBuf, output_name: String) {
        let (sender, runtime) = self.task_context();
        self.cancel(CancellableTask::VideoConversion);

        let handle = TaskHandle::spawn(move |cancel| {
            let _ = sender.send(TaskResult::LoadingMessage("Converting video...".to_string()));

            let result = runtime
                .block_on(async { ffmpeg.convert_video(&input, &output_name, Some(cancel)).await })
                .map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::VideoConverted(result));
        });

        self.cancellable.insert(CancellableTask::VideoConversion, handle);
    }

    /// Returns whether a running task was signalled.
    pub fn cancel(&mut self, task: CancellableTask) -> bool {
        match self.cancellable.remove(&task) {
            Some(handle) if !handle.is_finished() => {
                info!(?task, "[Tasks] Cancelling task");
                handle.cancel();
                true
            }
            _ => false,
        }
    }
}
