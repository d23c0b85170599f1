use std::time::Duration;

/// `MM:SS` with both fields zero-padded; partial seconds are dropped
pub fn format_remaining(remaining: Duration) -> String {
    let total_secs = remaining.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn format_volume(level: f32) -> String {
    format!("Vol: {:.1}", level)
}
