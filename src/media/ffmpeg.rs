use std::{
    ffi::OsString,
    path::{
        Path,
        PathBuf,
    },
    process::Stdio,
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
    },
    time::Duration,
};

use tokio::{
    io::AsyncReadExt,
    process::Command,
};
use tracing::{
    debug,
    info,
    warn,
};

use crate::{
    core::FlicktionaryError,
    settings::Settings,
};

const CANCEL_POLL_MS: u64 = 200;

/// Thin wrapper around the ffmpeg binary for the few conversions the app needs.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
    output_dir: PathBuf,
}

impl Ffmpeg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), output_dir: std::env::temp_dir() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ffmpeg_path.clone())
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn base_args() -> Vec<OsString> {
        ["-hide_banner", "-nostats", "-loglevel", "error", "-y"].iter().map(OsString::from).collect()
    }

    /// First subtitle stream of `video`, converted to SRT on stdout.
    pub fn subtitle_args(video: &Path) -> Vec<OsString> {
        let mut args = Self::base_args();
        args.extend(["-i".into(), video.as_os_str().to_owned()]);
        args.extend(["-map", "0:s:0", "-c:s", "srt", "-f", "srt", "-"].iter().map(OsString::from));
        args
    }

    pub fn mp3_args(video: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Self::base_args();
        args.extend(["-i".into(), video.as_os_str().to_owned()]);
        args.extend(["-vn", "-c:a", "libmp3lame", "-q:a", "2"].iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }

    pub fn video_args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Self::base_args();
        args.extend(["-i".into(), input.as_os_str().to_owned()]);
        args.extend(
            ["-c:v", "libx264", "-preset", "veryfast", "-c:a", "aac", "-movflags", "+faststart"]
                .iter()
                .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }

    pub fn timestamped_output(&self, prefix: &str, extension: &str) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        self.output_dir.join(format!("{}-{}.{}", prefix, millis, extension))
    }

    pub async fn extract_subtitles(&self, video: &Path) -> Result<String, FlicktionaryError> {
        info!(video = %video.display(), "[FFmpeg] Extracting subtitles");

        let output = Command::new(&self.binary)
            .args(Self::subtitle_args(video))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| FlicktionaryError::Ffmpeg(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            return Err(FlicktionaryError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let srt = String::from_utf8_lossy(&output.stdout).to_string();
        if srt.trim().is_empty() {
            return Err(FlicktionaryError::Ffmpeg("No subtitle content extracted".to_string()));
        }

        Ok(srt)
    }

    pub async fn convert_to_mp3(
        &self,
        video: &Path,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PathBuf, FlicktionaryError> {
        let output = self.timestamped_output("audio", "mp3");
        info!(video = %video.display(), output = %output.display(), "[FFmpeg] Converting audio");

        self.run_to_file(Self::mp3_args(video, &output), &output, cancel).await?;
        Ok(output)
    }

    pub async fn convert_video(
        &self,
        input: &Path,
        output_name: &str,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PathBuf, FlicktionaryError> {
        let mut output = self.output_dir.join(output_name);
        if output.extension().is_none() {
            output.set_extension("mp4");
        }
        info!(input = %input.display(), output = %output.display(), "[FFmpeg] Converting video");

        self.run_to_file(Self::video_args(input, &output), &output, cancel).await?;
        Ok(output)
    }

    async fn run_to_file(
        &self,
        args: Vec<OsString>,
        output: &Path,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<(), FlicktionaryError> {
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FlicktionaryError::Ffmpeg(format!("Failed to execute ffmpeg: {}", e)))?;

        // drain stderr so ffmpeg never blocks on a full pipe
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        let status = loop {
            if cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed)) {
                warn!(output = %output.display(), "[FFmpeg] Conversion cancelled");
                let _ = child.kill().await;
                let _ = tokio::fs::remove_file(output).await;
                return Err(FlicktionaryError::Cancelled);
            }

            match tokio::time::timeout(Duration::from_millis(CANCEL_POLL_MS), child.wait()).await {
                Ok(status) => break status?,
                Err(_) => continue,
            }
        };

        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            return Err(FlicktionaryError::Ffmpeg(stderr.trim().to_string()));
        }

        debug!(output = %output.display(), "[FFmpeg] Conversion finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_subtitle_args_map_first_subtitle_stream() {
        let args = strings(Ffmpeg::subtitle_args(Path::new("/videos/movie.mkv")));
        let joined = args.join(" ");

        assert!(joined.contains("-i /videos/movie.mkv"));
        assert!(joined.contains("-map 0:s:0"));
        assert!(joined.contains("-c:s srt"));
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    #[test]
    fn test_conversion_args_end_with_output() {
        let args = strings(Ffmpeg::mp3_args(Path::new("in.mp4"), Path::new("/tmp/out.mp3")));
        assert!(args.contains(&"-vn".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp3"));

        let args = strings(Ffmpeg::video_args(Path::new("in.mkv"), Path::new("/tmp/out.mp4")));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_timestamped_output() {
        let ffmpeg = Ffmpeg::new("ffmpeg").with_output_dir("/tmp/flick");
        let path = ffmpeg.timestamped_output("audio", "mp3");

        assert_eq!(path.parent(), Some(Path::new("/tmp/flick")));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("audio-"));
        assert!(name.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let ffmpeg = Ffmpeg::new("/nonexistent/ffmpeg-binary");
        let err = ffmpeg.extract_subtitles(Path::new("video.mp4")).await.unwrap_err();
        assert!(matches!(err, FlicktionaryError::Ffmpeg(_)));
    }
}
