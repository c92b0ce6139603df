//! Regional grouping of stale stations
//!
//! Folds the flat outdated-station list into per-region groups so each
//! responsible owner sees their own stations together. Grouping is a view:
//! the flat list keeps its full count, and stations whose area text matches
//! no region simply do not appear in any group.

use crate::app::models::{OutdatedEntry, RegionTable};
use tracing::debug;

/// Stale stations for one region, in the order they appeared in the
/// outdated list.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalGroup {
    pub region: String,
    pub owner: String,
    pub entries: Vec<OutdatedEntry>,
}

/// Group outdated stations by administrative region.
///
/// Each station is assigned to the first region whose province list has a
/// substring match in the station's area text. Groups come out in the
/// table's declared region order and empty groups are omitted entirely, so
/// an all-healthy region takes no space in the report.
pub fn group_by_region(outdated: &[OutdatedEntry], table: &RegionTable) -> Vec<RegionalGroup> {
    let mut groups: Vec<RegionalGroup> = table
        .iter()
        .map(|region| RegionalGroup {
            region: region.name.clone(),
            owner: region.owner.clone(),
            entries: Vec::new(),
        })
        .collect();

    let mut unmatched = 0usize;
    for entry in outdated {
        match table
            .iter()
            .position(|region| region.provinces.iter().any(|p| entry.area.contains(p.as_str())))
        {
            Some(idx) => groups[idx].entries.push(entry.clone()),
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        debug!(
            "{} outdated station(s) matched no region and are only in the flat list",
            unmatched
        );
    }

    groups.retain(|group| !group.entries.is_empty());
    groups
}
