use super::{
    timestamp::shift,
    transform::parse_cue_timing,
};

/// A single timed subtitle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub index: Option<u32>,
    pub start: f64,
    pub end: f64,
    pub text: Vec<String>,
}

impl Cue {
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start < end && self.end > start
    }

    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }

    /// Same cue moved by `offset` seconds, clamped like the document transform.
    pub fn shifted(&self, offset: f64) -> Cue {
        Cue { start: shift(self.start, offset), end: shift(self.end, offset), ..self.clone() }
    }
}

/// Parse an SRT document into cues. Blocks without a valid timing line are skipped.
///
/// Blocks are separated by blank lines, including lines holding only whitespace.
pub fn parse_cues(document: &str) -> Vec<Cue> {
    let cleaned = document.replace('\r', "");

    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in cleaned.lines() {
        if line.trim().is_empty() {
            cues.extend(parse_block(&block));
            block.clear();
        } else {
            block.push(line);
        }
    }
    cues.extend(parse_block(&block));

    cues
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    let timing_pos = lines.iter().position(|line| parse_cue_timing(line).is_some())?;
    let (start, end) = parse_cue_timing(lines[timing_pos])?;

    let index = timing_pos
        .checked_sub(1)
        .and_then(|i| lines.get(i))
        .and_then(|line| line.trim().parse::<u32>().ok());

    Some(Cue {
        index,
        start,
        end,
        text: lines[timing_pos + 1..].iter().map(|l| l.trim().to_string()).collect(),
    })
}
