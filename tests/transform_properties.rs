use flicktionary::subtitles::{
    parse_timestamp,
    srt_to_vtt,
    srt_to_vtt_with_offset,
};
use proptest::prelude::*;

fn srt_time(h: u32, m: u32, s: u32, ms: u32) -> String {
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

proptest! {
    #[test]
    fn text_lines_pass_through(lines in proptest::collection::vec("[a-zA-Z ,.!?<>/']{0,30}", 0..10)) {
        let document = lines.join("\n");
        prop_assert_eq!(srt_to_vtt(&document), format!("WEBVTT\n\n{}", document));
    }

    #[test]
    fn zero_offset_only_swaps_the_separator(
        h in 0u32..100, m in 0u32..60, s in 0u32..60, ms in 0u32..1000,
        h2 in 0u32..100, m2 in 0u32..60, s2 in 0u32..60, ms2 in 0u32..1000,
    ) {
        let start = srt_time(h, m, s, ms);
        let end = srt_time(h2, m2, s2, ms2);
        let line = format!("{} --> {}", start, end);

        let expected = format!("WEBVTT\n\n{} --> {}", start.replace(',', "."), end.replace(',', "."));
        prop_assert_eq!(srt_to_vtt_with_offset(&line, 0.0), expected);
    }

    #[test]
    fn large_negative_offset_clamps_to_zero(h in 0u32..10, m in 0u32..60, s in 0u32..60, ms in 0u32..1000) {
        let time = srt_time(h, m, s, ms);
        let seconds = parse_timestamp(&time).unwrap();
        let line = format!("{} --> {}", time, time);

        let vtt = srt_to_vtt_with_offset(&line, -(seconds + 1.0));
        prop_assert_eq!(vtt, "WEBVTT\n\n00:00:00.000 --> 00:00:00.000");
    }
}

#[test]
fn offset_examples() {
    assert_eq!(
        srt_to_vtt("00:00:01,500 --> 00:00:03,250"),
        "WEBVTT\n\n00:00:01.500 --> 00:00:03.250"
    );
    assert_eq!(
        srt_to_vtt_with_offset("00:00:01,000 --> 00:00:02,000", -10.0),
        "WEBVTT\n\n00:00:00.000 --> 00:00:00.000"
    );
}
