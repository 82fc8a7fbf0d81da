pub mod cue;
pub mod timestamp;
pub mod transform;

pub use cue::{
    parse_cues,
    Cue,
};
pub use timestamp::{
    format_timestamp,
    parse_timestamp,
    shift,
};
pub use transform::{
    parse_cue_timing,
    srt_to_vtt,
    srt_to_vtt_with_offset,
    VTT_HEADER,
};
