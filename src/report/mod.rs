//! Rendering of `rbak log` output.

pub mod text;
pub mod json;

use crate::lineage::Group;

pub fn print(groups: &[Group], json_output: bool) {
    if json_output {
        println!("{}", json::render(groups));
    } else if !groups.is_empty() {
        println!("{}", text::render(groups));
    }
}

/// Local-time rendering of a Unix timestamp, `unknown` if out of range.
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}
