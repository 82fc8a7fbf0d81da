use std::io::{
    BufRead,
    Write,
};

use tracing::{
    info,
    warn,
};

use super::ReviewCommand;
use crate::{
    core::FlicktionaryError,
    player::{
        captions_for_clip,
        AudioSync,
        ClipBounds,
        PlaybackAction,
    },
    session::{
        Direction,
        ReviewSession,
        SessionResults,
    },
    settings::Settings,
    subtitles::{
        format_timestamp,
        parse_cues,
        srt_to_vtt_with_offset,
        Cue,
    },
};

const HELP: &str = "[k] I already knew  [u] I didn't know  [p] previous  [n] next  [f] finish  [o <secs>] caption offset  [t <video> [audio]] playback position  [q] quit";

#[derive(Debug)]
pub enum ReviewOutcome {
    Finished(SessionResults),
    Abandoned,
}

/// Terminal front-end for a review session.
pub struct ReviewApp {
    session: Option<ReviewSession>,
    subtitles: String,
    captions: String, // WebVTT handed to a player
    cues: Vec<Cue>,
    shifted_cues: Vec<Cue>,
    offset: f64,
    pre_roll: f64,
    post_roll: f64,
    audio_sync: AudioSync,
}

impl ReviewApp {
    pub fn new(session: ReviewSession, subtitles: String, settings: &Settings) -> Self {
        let offset = settings.subtitle_offset_secs;
        let cues = parse_cues(&subtitles);
        Self {
            session: Some(session),
            captions: srt_to_vtt_with_offset(&subtitles, offset),
            shifted_cues: shift_cues(&cues, offset),
            cues,
            subtitles,
            offset,
            pre_roll: settings.pre_roll_secs,
            post_roll: settings.post_roll_secs,
            audio_sync: AudioSync::new(settings.audio_drift_tolerance_secs),
        }
    }

    pub fn captions(&self) -> &str {
        &self.captions
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.captions = srt_to_vtt_with_offset(&self.subtitles, offset);
        self.shifted_cues = shift_cues(&self.cues, offset);
        info!(offset, "[Review] Caption offset changed");
    }

    /// Drive the session from `input` until it is finished or abandoned.
    /// Running out of input abandons the session.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> Result<ReviewOutcome, FlicktionaryError> {
        writeln!(output, "{}", HELP)?;
        self.render(&mut output)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<ReviewCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(output, "{}", e)?;
                    continue;
                }
            };

            if let Some(outcome) = self.apply(command, &mut output)? {
                return Ok(outcome);
            }
        }

        warn!("[Review] Input closed, session abandoned");
        self.session = None;
        Ok(ReviewOutcome::Abandoned)
    }

    fn apply<W: Write>(
        &mut self,
        command: ReviewCommand,
        output: &mut W,
    ) -> Result<Option<ReviewOutcome>, FlicktionaryError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Some(ReviewOutcome::Abandoned));
        };

        match command {
            ReviewCommand::Known => session.record_response(true)?,
            ReviewCommand::Unknown => session.record_response(false)?,
            ReviewCommand::Previous => {
                if !session.navigate(Direction::Previous) {
                    writeln!(output, "Already at the first word.")?;
                }
            }
            ReviewCommand::Next => {
                if !session.navigate(Direction::Next) {
                    writeln!(output, "Answer this word before moving on.")?;
                }
            }
            ReviewCommand::Offset(offset) => self.set_offset(offset),
            ReviewCommand::Position { video, audio } => {
                self.report_position(video, audio, output)?;
                return Ok(None);
            }
            ReviewCommand::Help => {
                writeln!(output, "{}", HELP)?;
                return Ok(None);
            }
            ReviewCommand::Quit => {
                self.session = None;
                return Ok(Some(ReviewOutcome::Abandoned));
            }
            ReviewCommand::Finish => {
                let Some(session) = self.session.take() else {
                    return Ok(Some(ReviewOutcome::Abandoned));
                };
                match session.finish() {
                    Ok(results) => {
                        writeln!(output, "Session complete.")?;
                        return Ok(Some(ReviewOutcome::Finished(results)));
                    }
                    Err(incomplete) => {
                        writeln!(output, "{}", incomplete)?;
                        writeln!(output, "Still to confirm: {}", incomplete.remaining.join(", "))?;
                        self.session = Some(incomplete.into_session());
                        return Ok(None);
                    }
                }
            }
        }

        self.render(output)?;
        Ok(None)
    }

    /// React to a playback position: loop the clip and pull drifting external audio back.
    fn report_position<W: Write>(
        &self,
        video: f64,
        audio: Option<f64>,
        output: &mut W,
    ) -> Result<(), FlicktionaryError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let bounds = match ClipBounds::for_item(session.current_item()?, self.pre_roll, self.post_roll) {
            Ok(bounds) => bounds,
            Err(e) => {
                writeln!(output, "  Clip unavailable: {}", e)?;
                return Ok(());
            }
        };

        let position = match bounds.on_time_update(video) {
            PlaybackAction::PauseAndRewind(start) => {
                writeln!(output, "Clip ended, paused at {}", format_timestamp(start))?;
                start
            }
            PlaybackAction::Continue => video,
        };

        if let Some(target) = audio.and_then(|a| self.audio_sync.correction(position, a)) {
            writeln!(output, "External audio re-synced to {}", format_timestamp(target))?;
        }

        Ok(())
    }

    fn render<W: Write>(&self, output: &mut W) -> Result<(), FlicktionaryError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let word = session.current_item()?;

        writeln!(output)?;
        writeln!(output, "Word {} of {}", session.current_index() + 1, session.len())?;
        writeln!(output, "  {}", word.term)?;
        writeln!(output, "  English: {}", word.english_meaning)?;
        writeln!(output, "  Turkish: {}", word.turkish_meaning)?;
        writeln!(output, "  Sample:  {}", word.sample_sentence_in_english)?;
        writeln!(output, "           {}", word.sample_sentence_in_turkish)?;

        match ClipBounds::for_item(word, self.pre_roll, self.post_roll) {
            Ok(bounds) => {
                writeln!(
                    output,
                    "  Clip: {} - {}",
                    format_timestamp(bounds.start),
                    format_timestamp(bounds.end)
                )?;

                for cue in captions_for_clip(&self.shifted_cues, &bounds) {
                    writeln!(output, "    [{}] {}", format_timestamp(cue.start), cue.joined_text())?;
                }
            }
            Err(e) => writeln!(output, "  Clip unavailable: {}", e)?,
        }

        let answer = match session.current_response() {
            Some(true) => "I already knew",
            Some(false) => "I didn't know",
            None => "-",
        };
        writeln!(output, "  Answer: {}", answer)?;

        if session.is_last() {
            writeln!(output, "  Last word: [f] to finish")?;
        }

        Ok(())
    }
}

fn shift_cues(cues: &[Cue], offset: f64) -> Vec<Cue> {
    cues.iter().map(|c| c.shifted(offset)).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::core::VocabularyItem;

    const SRT: &str = "1\n00:00:09,000 --> 00:00:11,000\nThat was a close call.\n\n2\n00:01:00,000 --> 00:01:02,000\nFar away.\n";

    fn app(terms: &[&str]) -> ReviewApp {
        let words = terms
            .iter()
            .map(|t| VocabularyItem::new(t, "00:00:10,000", "00:00:11,000"))
            .collect();
        ReviewApp::new(ReviewSession::new(words).unwrap(), SRT.to_string(), &Settings::default())
    }

    fn run(app: &mut ReviewApp, input: &str) -> (ReviewOutcome, String) {
        let mut out = Vec::new();
        let outcome = app.run(Cursor::new(input.to_string()), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_full_review_finishes() {
        let mut app = app(&["close call", "far"]);
        let (outcome, out) = run(&mut app, "k\nu\nk\nf\n");

        let ReviewOutcome::Finished(results) = outcome else {
            panic!("expected finished session, got {:?}", outcome);
        };
        assert_eq!(results.records.len(), 2);
        assert_eq!(results.unknown_words()[0].term, "far");
        assert!(out.contains("Word 3 of 3"));
        assert!(out.contains("Session complete."));
    }

    #[test]
    fn test_renders_clip_and_captions() {
        let mut app = app(&["close call"]);
        let (_, out) = run(&mut app, "");

        assert!(out.contains("Word 1 of 1"));
        assert!(out.contains("Clip: 00:00:08.000 - 00:00:13.000"));
        assert!(out.contains("[00:00:09.000] That was a close call."));
        assert!(!out.contains("Far away."));
    }

    #[test]
    fn test_finish_early_keeps_session() {
        let mut app = app(&["a", "b"]);
        let (outcome, out) = run(&mut app, "k\nf\nk\nf\n");

        assert!(out.contains("before finishing (1 remaining)"));
        assert!(out.contains("Still to confirm: b"));
        assert!(matches!(outcome, ReviewOutcome::Finished(_)));
    }

    #[test]
    fn test_blocked_navigation_and_bad_input() {
        let mut app = app(&["a", "b"]);
        let (outcome, out) = run(&mut app, "n\nzzz\np\nq\n");

        assert!(out.contains("Answer this word before moving on."));
        assert!(out.contains("Unknown command: zzz"));
        assert!(out.contains("Already at the first word."));
        assert!(matches!(outcome, ReviewOutcome::Abandoned));
        assert!(app.session().is_none());
    }

    #[test]
    fn test_position_loops_clip_and_resyncs_audio() {
        let mut app = app(&["close call"]);
        let (_, out) = run(&mut app, "t 10 10.1\nt 10 11\nt 13.5 2\n");

        assert!(out.contains("External audio re-synced to 00:00:10.000"));
        assert_eq!(out.matches("External audio re-synced to").count(), 2);
        assert!(out.contains("External audio re-synced to 00:00:08.000"));
        assert!(out.contains("Clip ended, paused at 00:00:08.000"));
    }

    #[test]
    fn test_drift_tolerance_comes_from_settings() {
        let words = vec![VocabularyItem::new("a", "00:00:10,000", "00:00:11,000")];
        let settings = Settings { audio_drift_tolerance_secs: 2.0, ..Settings::default() };
        let mut app = ReviewApp::new(ReviewSession::new(words).unwrap(), SRT.to_string(), &settings);

        let (_, out) = run(&mut app, "t 10 11\nt 10 13\n");
        assert_eq!(out.matches("External audio re-synced to 00:00:10.000").count(), 1);
    }

    #[test]
    fn test_offset_regenerates_captions() {
        let mut app = app(&["a"]);
        assert!(app.captions().contains("00:00:09.000 --> 00:00:11.000"));

        let (_, out) = run(&mut app, "o -1\n");
        assert_eq!(app.offset(), -1.0);
        assert!(app.captions().starts_with("WEBVTT\n\n"));
        assert!(app.captions().contains("00:00:08.000 --> 00:00:10.000"));
        assert!(out.contains("[00:00:08.000] That was a close call."));
    }
}
