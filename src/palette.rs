//! Node color assignment.

use crate::model::ProcessId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Default series palette of the chart engine, used for the "normal" color scheme.
pub const ENGINE_PALETTE: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

/// Colors for transformation stages that scenario metadata leaves undefined.
pub const STAGE_FALLBACK_PALETTE: [&str; 8] = [
    "#7dda60", "#eb5e34", "#8c76cf", "#5baa11", "#3281db", "#61b053", "#efc3ca", "#dfc57b",
];

/// Assign a normal color to every distinct process id, in sorted id order, so a process keeps
/// its color in every year.
pub fn normal_colors<'a, I>(ids: I) -> HashMap<ProcessId, String>
where
    I: IntoIterator<Item = &'a ProcessId>,
{
    let unique: BTreeSet<&ProcessId> = ids.into_iter().collect();
    unique
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), ENGINE_PALETTE[i % ENGINE_PALETTE.len()].to_string()))
        .collect()
}

/// Configured stage colors, completed with fallback colors for stages missing from the
/// configuration. Missing stages are filled in sorted order.
pub fn stage_colors<'a, I>(configured: &BTreeMap<String, String>, stages: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut colors = configured.clone();
    let missing: BTreeSet<&str> = stages
        .into_iter()
        .filter(|stage| !configured.contains_key(*stage))
        .collect();

    for (i, stage) in missing.into_iter().enumerate() {
        tracing::debug!("No color configured for stage '{}', using fallback", stage);
        colors.insert(
            stage.to_string(),
            STAGE_FALLBACK_PALETTE[i % STAGE_FALLBACK_PALETTE.len()].to_string(),
        );
    }
    colors
}
