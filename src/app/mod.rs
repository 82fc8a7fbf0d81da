pub mod review;

use std::str::FromStr;

pub use review::{
    ReviewApp,
    ReviewOutcome,
};

/// One line of input in the review loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewCommand {
    Known,
    Unknown,
    Previous,
    Next,
    Finish,
    Offset(f64),
    /// Playback position reported by the player, with the external audio position if one is attached.
    Position { video: f64, audio: Option<f64> },
    Help,
    Quit,
}

impl FromStr for ReviewCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("").to_lowercase();

        let parsed = match command.as_str() {
            "k" | "known" => ReviewCommand::Known,
            "u" | "unknown" => ReviewCommand::Unknown,
            "p" | "prev" | "previous" => ReviewCommand::Previous,
            "n" | "next" => ReviewCommand::Next,
            "f" | "finish" => ReviewCommand::Finish,
            "h" | "help" | "?" => ReviewCommand::Help,
            "q" | "quit" => ReviewCommand::Quit,
            "o" | "offset" => {
                let value = parts.next().ok_or("Usage: o <seconds>")?;
                ReviewCommand::Offset(parse_seconds(value, "offset")?)
            }
            "t" | "time" => {
                let value = parts.next().ok_or("Usage: t <video seconds> [audio seconds]")?;
                let video = parse_seconds(value, "position")?;
                let audio = parts.next().map(|a| parse_seconds(a, "position")).transpose()?;
                ReviewCommand::Position { video, audio }
            }
            "" => return Err("Empty command".to_string()),
            other => return Err(format!("Unknown command: {}", other)),
        };

        if parts.next().is_some() {
            return Err(format!("Unexpected input after '{}'", command));
        }

        Ok(parsed)
    }
}

fn parse_seconds(value: &str, what: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid {}: {}", what, value))
}
