//! JSON output for `rbak log --json`.
//!
//! An array of groups, each an array of snapshot objects in log order.

use serde::Serialize;

use crate::lineage::Group;
use crate::store::Snapshot;

use super::format_timestamp;

#[derive(Serialize)]
struct SnapshotView<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    created_at: String,
}

pub fn render(groups: &[Group]) -> String {
    let views: Vec<Vec<SnapshotView>> = groups
        .iter()
        .map(|group| {
            group
                .snapshots
                .iter()
                .map(|snapshot| SnapshotView {
                    snapshot,
                    created_at: format_timestamp(snapshot.created),
                })
                .collect()
        })
        .collect();

    serde_json::to_string_pretty(&views).unwrap_or_else(|_| String::from("[]"))
}
