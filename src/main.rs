use std::{
    fs,
    io,
    path::{
        Path,
        PathBuf,
    },
    process::ExitCode,
    time::Duration,
};

use clap::{
    Parser,
    Subcommand,
};
use flicktionary::{
    app::{
        ReviewApp,
        ReviewOutcome,
    },
    core::tasks::{
        TaskManager,
        TaskResult,
    },
    media::{
        Ffmpeg,
        UploadCache,
    },
    persistence::{
        default_export_name,
        export_results,
    },
    settings::Settings,
    subtitles::srt_to_vtt_with_offset,
    vocabulary::{
        parse_vocabulary,
        GeminiClient,
    },
    FlicktionaryError,
    ReviewSession,
    VocabularyItem,
};
use tracing::{
    error,
    info,
};
use tracing_subscriber::EnvFilter;

const TASK_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Parser)]
#[command(name = "flicktionary", version, about = "Study vocabulary with clips from the video it came from")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through a vocabulary list word by word
    Review {
        video: PathBuf,
        /// SRT file; extracted from the video when omitted
        #[arg(long)]
        subtitles: Option<PathBuf>,
        /// Vocabulary JSON file
        #[arg(long, conflicts_with = "generate")]
        vocabulary: Option<PathBuf>,
        /// Generate the vocabulary list with Gemini
        #[arg(long)]
        generate: bool,
        /// Caption offset in seconds
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,
        /// Where to write the results
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert an SRT file to WebVTT
    Convert {
        subtitles: PathBuf,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        offset: f64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract the first subtitle stream of a video as SRT
    Extract {
        video: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert the audio track of a video to mp3
    Audio { video: PathBuf },
    /// Re-encode a video into a browser-friendly mp4
    ConvertVideo {
        input: PathBuf,
        /// Output file name inside the temp directory
        #[arg(long)]
        name: Option<String>,
    },
    /// Store the Gemini API key
    SetApiKey { key: String },
    /// Forget the stored Gemini API key
    ClearApiKey,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FlicktionaryError> {
    let mut settings = Settings::load();

    match cli.command {
        Commands::Review { video, subtitles, vocabulary, generate, offset, output } => {
            if let Some(offset) = offset {
                settings.subtitle_offset_secs = offset;
            }
            review(&settings, &video, subtitles, vocabulary, generate, output)
        }
        Commands::Convert { subtitles, offset, output } => {
            let vtt = srt_to_vtt_with_offset(&fs::read_to_string(&subtitles)?, offset);
            let output = output.unwrap_or_else(|| subtitles.with_extension("vtt"));
            fs::write(&output, vtt)?;
            info!(path = %output.display(), "Wrote WebVTT");
            Ok(())
        }
        Commands::Extract { video, output } => {
            let mut tasks = TaskManager::new()?;
            let srt = extract_subtitles(&mut tasks, &settings, &video)?;
            let output = output.unwrap_or_else(|| video.with_extension("srt"));
            fs::write(&output, srt)?;
            info!(path = %output.display(), "Wrote subtitles");
            Ok(())
        }
        Commands::Audio { video } => {
            let path = staged_conversion(&video, |tasks, staged| {
                tasks.convert_audio(Ffmpeg::from_settings(&settings), staged)
            })?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::ConvertVideo { input, name } => {
            let name = name.unwrap_or_else(|| default_video_name(&input));
            let path = staged_conversion(&input, |tasks, staged| {
                tasks.convert_video(Ffmpeg::from_settings(&settings), staged, name)
            })?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::SetApiKey { key } => {
            settings.set_api_key(&key)?;
            settings.save()
        }
        Commands::ClearApiKey => {
            settings.clear_api_key();
            settings.save()
        }
    }
}

fn review(
    settings: &Settings,
    video: &Path,
    subtitles: Option<PathBuf>,
    vocabulary: Option<PathBuf>,
    generate: bool,
    output: Option<PathBuf>,
) -> Result<(), FlicktionaryError> {
    let mut tasks = TaskManager::new()?;

    let srt = match subtitles {
        Some(path) => fs::read_to_string(path)?,
        None => extract_subtitles(&mut tasks, settings, video)?,
    };

    let words = match (vocabulary, generate) {
        (Some(path), _) => parse_vocabulary(&fs::read_to_string(path)?)?,
        (None, true) => generate_vocabulary(&mut tasks, settings, &srt)?,
        (None, false) => {
            return Err(FlicktionaryError::Custom(
                "Provide --vocabulary <file> or --generate".to_string(),
            ))
        }
    };

    let session = ReviewSession::new(words)?;
    let mut app = ReviewApp::new(session, srt, settings);

    let stdin = io::stdin();
    match app.run(stdin.lock(), io::stdout())? {
        ReviewOutcome::Finished(results) => {
            let file_name = video.file_name().and_then(|n| n.to_str());
            let path = output.unwrap_or_else(|| PathBuf::from(default_export_name(file_name)));
            let unknown = export_results(&path, &results)?;
            println!("Results saved to: {} ({} words to study)", path.display(), unknown.len());
        }
        ReviewOutcome::Abandoned => println!("Session abandoned, nothing saved."),
    }

    Ok(())
}

fn wait(tasks: &mut TaskManager) -> Result<TaskResult, FlicktionaryError> {
    tasks
        .wait_for(TASK_TIMEOUT, |message| info!("{}", message))
        .ok_or_else(|| FlicktionaryError::Custom("Timed out waiting for background task".to_string()))
}

fn unexpected(result: TaskResult) -> FlicktionaryError {
    FlicktionaryError::Custom(format!("Unexpected task result: {}", result.task_type()))
}

/// Copy `input` into the upload cache, run one conversion on the copy and drop the copy.
fn staged_conversion(
    input: &Path,
    start: impl FnOnce(&mut TaskManager, PathBuf),
) -> Result<PathBuf, FlicktionaryError> {
    let mut uploads = UploadCache::in_temp_dir();
    let staged = uploads.store_file(input)?;

    let mut tasks = TaskManager::new()?;
    start(&mut tasks, staged);
    let result = wait(&mut tasks);
    uploads.clear();

    match result? {
        TaskResult::AudioConverted(result) | TaskResult::VideoConverted(result) => {
            result.map_err(FlicktionaryError::Ffmpeg)
        }
        other => Err(unexpected(other)),
    }
}

fn default_video_name(input: &Path) -> String {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    format!("{}-converted.mp4", stem)
}

fn extract_subtitles(
    tasks: &mut TaskManager,
    settings: &Settings,
    video: &Path,
) -> Result<String, FlicktionaryError> {
    tasks.extract_subtitles(Ffmpeg::from_settings(settings), video.to_path_buf());
    match wait(tasks)? {
        TaskResult::SubtitlesExtracted(result) => result.map_err(FlicktionaryError::Ffmpeg),
        other => Err(unexpected(other)),
    }
}

fn generate_vocabulary(
    tasks: &mut TaskManager,
    settings: &Settings,
    srt: &str,
) -> Result<Vec<VocabularyItem>, FlicktionaryError> {
    tasks.generate_vocabulary(GeminiClient::from_settings(settings)?, srt.to_string());
    match wait(tasks)? {
        TaskResult::VocabularyGenerated(result) => result.map_err(FlicktionaryError::Generation),
        other => Err(unexpected(other)),
    }
}
