use crate::core::FlicktionaryError;

/// Convert an SRT timestamp to seconds.
///
/// `00:01:47,733` -> 107.733. A `.` is accepted in place of the `,` and the
/// millisecond part may be left off entirely.
pub fn parse_timestamp(timestamp: &str) -> Result<f64, FlicktionaryError> {
    let invalid = || FlicktionaryError::InvalidTimestamp(timestamp.to_string());

    let parts: Vec<&str> = timestamp.trim().split(|c| c == ':' || c == ',' || c == '.').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(invalid());
    }

    let field = |part: &str| -> Result<f64, FlicktionaryError> {
        part.parse::<u32>().map(f64::from).map_err(|_| invalid())
    };

    let hours = field(parts[0])?;
    let minutes = field(parts[1])?;
    let seconds = field(parts[2])?;
    let milliseconds = match parts.get(3) {
        Some(ms) => field(ms)?,
        None => 0.0,
    };

    Ok(to_seconds(hours, minutes, seconds, milliseconds))
}

pub(crate) fn to_seconds(hours: f64, minutes: f64, seconds: f64, milliseconds: f64) -> f64 {
    hours * 3600.0 + minutes * 60.0 + seconds + milliseconds / 1000.0
}

/// Apply a signed offset, never going below the start of the media.
pub fn shift(seconds: f64, offset: f64) -> f64 {
    (seconds + offset).max(0.0)
}

/// Render seconds as a WebVTT timestamp (`HH:MM:SS.mmm`), milliseconds rounded.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}
