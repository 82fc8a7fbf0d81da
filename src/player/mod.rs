use crate::{
    core::{
        FlicktionaryError,
        VocabularyItem,
    },
    subtitles::{
        parse_timestamp,
        Cue,
    },
};

pub const DEFAULT_ROLL_SECS: f64 = 2.0;
pub const DEFAULT_DRIFT_TOLERANCE_SECS: f64 = 0.3;

/// What the player should do after a position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackAction {
    Continue,
    PauseAndRewind(f64),
}

/// The stretch of media played for one word: its subtitle range plus some padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBounds {
    pub start: f64,
    pub end: f64,
}

impl ClipBounds {
    pub fn from_timestamps(
        begin: &str,
        end: &str,
        pre_roll: f64,
        post_roll: f64,
    ) -> Result<Self, FlicktionaryError> {
        let begin = parse_timestamp(begin)?;
        let end = parse_timestamp(end)?;

        Ok(Self { start: (begin - pre_roll).max(0.0), end: (end + post_roll).max(0.0) })
    }

    pub fn for_item(
        item: &VocabularyItem,
        pre_roll: f64,
        post_roll: f64,
    ) -> Result<Self, FlicktionaryError> {
        Self::from_timestamps(&item.begin_timestamp, &item.end_timestamp, pre_roll, post_roll)
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Reaching the end of the clip pauses playback and rewinds to its start.
    pub fn on_time_update(&self, position: f64) -> PlaybackAction {
        if position >= self.end {
            PlaybackAction::PauseAndRewind(self.start)
        } else {
            PlaybackAction::Continue
        }
    }
}

/// Keeps a separately decoded audio track in step with the video.
#[derive(Debug, Clone, Copy)]
pub struct AudioSync {
    tolerance: f64,
}

impl Default for AudioSync {
    fn default() -> Self {
        Self::new(DEFAULT_DRIFT_TOLERANCE_SECS)
    }
}

impl AudioSync {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Position the audio should be reset to, if it drifted too far from the video.
    pub fn correction(&self, video_position: f64, audio_position: f64) -> Option<f64> {
        if (video_position - audio_position).abs() > self.tolerance {
            Some(video_position)
        } else {
            None
        }
    }
}

pub fn captions_for_clip<'a>(cues: &'a [Cue], bounds: &ClipBounds) -> Vec<&'a Cue> {
    cues.iter().filter(|cue| cue.overlaps(bounds.start, bounds.end)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_bounds_padding() {
        let bounds =
            ClipBounds::from_timestamps("00:00:10,000", "00:00:12,500", 2.0, 2.0).unwrap();
        assert_eq!(bounds, ClipBounds { start: 8.0, end: 14.5 });
        assert_eq!(bounds.duration(), 6.5);
    }

    #[test]
    fn test_clip_start_clamps_at_zero() {
        let bounds =
            ClipBounds::from_timestamps("00:00:01,000", "00:00:02,000", 2.0, 2.0).unwrap();
        assert_eq!(bounds.start, 0.0);
        assert_eq!(bounds.end, 4.0);
    }

    #[test]
    fn test_clip_bounds_reject_bad_timestamp() {
        let item = VocabularyItem::new("x", "soon", "00:00:02,000");
        assert!(matches!(
            ClipBounds::for_item(&item, 2.0, 2.0),
            Err(FlicktionaryError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_time_update_loops_clip() {
        let bounds = ClipBounds { start: 8.0, end: 14.0 };
        assert_eq!(bounds.on_time_update(10.0), PlaybackAction::Continue);
        assert_eq!(bounds.on_time_update(14.0), PlaybackAction::PauseAndRewind(8.0));
        assert_eq!(bounds.on_time_update(20.0), PlaybackAction::PauseAndRewind(8.0));
    }

    #[test]
    fn test_audio_drift_correction() {
        let sync = AudioSync::default();
        assert_eq!(sync.correction(10.0, 10.2), None);
        assert_eq!(sync.correction(10.0, 10.5), Some(10.0));
        assert_eq!(sync.correction(10.0, 9.0), Some(10.0));
    }

    #[test]
    fn test_captions_for_clip() {
        let cue = |start, end, text: &str| Cue {
            index: None,
            start,
            end,
            text: vec![text.to_string()],
        };
        let cues = vec![cue(1.0, 3.0, "before"), cue(9.0, 11.0, "inside"), cue(20.0, 22.0, "after")];

        let bounds = ClipBounds { start: 8.0, end: 14.0 };
        let captions = captions_for_clip(&cues, &bounds);
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].text, vec!["inside"]);
    }
}
