//! Plain-text log rendering.
//!
//! One line per snapshot, groups separated by a blank line:
//! `Snapshot 3 <= 1 :: fix typo (2026-10-18 09:12:44)`

use crate::lineage::Group;
use crate::store::Snapshot;

use super::format_timestamp;

pub const ROOT_PLACEHOLDER: &str = "ROOT";
pub const MESSAGE_PLACEHOLDER: &str = "(no message)";

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let parent = snapshot
        .parent
        .map(|p| p.to_string())
        .unwrap_or_else(|| ROOT_PLACEHOLDER.to_string());
    let message = snapshot.message.as_deref().unwrap_or(MESSAGE_PLACEHOLDER);

    format!(
        "Snapshot {} <= {} :: {} ({})",
        snapshot.number,
        parent,
        message,
        format_timestamp(snapshot.created)
    )
}

pub fn render_group(group: &Group) -> String {
    group
        .snapshots
        .iter()
        .map(render_snapshot)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Empty string for no groups.
pub fn render(groups: &[Group]) -> String {
    groups.iter().map(render_group).collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(number: i64, parent: Option<i64>, message: Option<&str>) -> Snapshot {
        Snapshot {
            number,
            created: 1_700_000_000,
            message: message.map(str::to_string),
            parent,
        }
    }

    #[test]
    fn root_and_missing_message_use_placeholders() {
        let line = render_snapshot(&snap(1, None, None));
        let expected = format!("Snapshot 1 <= ROOT :: (no message) ({})", format_timestamp(1_700_000_000));
        assert_eq!(line, expected);
    }

    #[test]
    fn parent_and_message_are_shown() {
        let line = render_snapshot(&snap(3, Some(1), Some("fix typo")));
        assert!(line.starts_with("Snapshot 3 <= 1 :: fix typo ("));
    }

    #[test]
    fn groups_are_separated_by_blank_line() {
        let groups = vec![
            Group {
                snapshots: vec![snap(3, Some(1), None), snap(1, None, None)],
                broken: None,
            },
            Group {
                snapshots: vec![snap(2, Some(1), None)],
                broken: None,
            },
        ];

        let output = render(&groups);
        let blocks: Vec<&str> = output.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().count(), 2);
        assert!(blocks[0].starts_with("Snapshot 3 <= 1"));
        assert!(blocks[0].lines().nth(1).unwrap().starts_with("Snapshot 1 <= ROOT"));
        assert!(blocks[1].starts_with("Snapshot 2 <= 1"));
    }

    #[test]
    fn no_groups_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
