/// Render seconds as zero-padded `MM:SS`. Minutes are not capped, so
/// durations of 100 minutes or more produce a wider minutes field.
pub fn format_mmss(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Short `M:SS` label used for the custom duration button.
pub fn format_short(minutes: u32, seconds: u32) -> String {
    format!("{}:{:02}", minutes, seconds)
}

/// Parse a numeric field typed by the user; anything unparsable counts as 0
/// and the result is clamped to `max`.
pub fn parse_clamped(input: &str, max: u32) -> u32 {
    input.trim().parse::<u64>().map_or(0, |v| v.min(max as u64) as u32)
}
