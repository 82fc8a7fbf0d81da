use std::{
    borrow::Cow,
    sync::OnceLock,
};

use regex::{
    Captures,
    Regex,
};

use super::timestamp::{
    format_timestamp,
    shift,
    to_seconds,
};

pub const VTT_HEADER: &str = "WEBVTT";

fn cue_timing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})((?:\s.*)?)$",
        )
        .expect("cue timing regex is valid")
    })
}

fn capture_seconds(captures: &Captures, first_group: usize) -> Option<f64> {
    let mut fields = [0.0; 4];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = captures.get(first_group + i)?.as_str().parse::<u32>().ok()? as f64;
    }

    let [hours, minutes, seconds, millis] = fields;
    Some(to_seconds(hours, minutes, seconds, millis))
}

/// Start and end of an SRT timing line (`00:00:01,500 --> 00:00:03,250`), in seconds.
///
/// Fields are read positionally, so `00:75:01,000` is 4501 seconds, the same value
/// [`parse_timestamp`](super::parse_timestamp) gives. Anything else is `None`.
pub fn parse_cue_timing(line: &str) -> Option<(f64, f64)> {
    let captures = cue_timing_regex().captures(line)?;
    Some((capture_seconds(&captures, 1)?, capture_seconds(&captures, 5)?))
}

fn convert_line(line: &str, offset: f64) -> Cow<'_, str> {
    let Some(captures) = cue_timing_regex().captures(line) else {
        return Cow::Borrowed(line);
    };

    let (Some(start), Some(end)) = (capture_seconds(&captures, 1), capture_seconds(&captures, 5))
    else {
        return Cow::Borrowed(line);
    };

    let settings = captures.get(9).map(|m| m.as_str()).unwrap_or("");

    Cow::Owned(format!(
        "{} --> {}{}",
        format_timestamp(shift(start, offset)),
        format_timestamp(shift(end, offset)),
        settings
    ))
}

/// Convert an SRT document to WebVTT, shifting every cue by `offset` seconds.
///
/// Lines that are not cue timings (indices, caption text, blank separators and
/// malformed timings) are copied through unchanged. Carriage returns are dropped.
pub fn srt_to_vtt_with_offset(document: &str, offset: f64) -> String {
    let cleaned = document.replace('\r', "");
    let body = cleaned
        .split('\n')
        .map(|line| convert_line(line, offset))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{}", VTT_HEADER, body)
}

pub fn srt_to_vtt(document: &str) -> String {
    srt_to_vtt_with_offset(document, 0.0)
}
