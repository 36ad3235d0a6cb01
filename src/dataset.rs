use crate::model::{ScenarioMetadata, Year};
use crate::normalize::{
    DataIntegrityError, NormalizeError, Normalized, YearSnapshot, normalize, parse_payload,
};
use crate::palette;
use crate::relation::RelationIndex;
use std::collections::BTreeMap;

/// A year snapshot together with its cached relation index.
#[derive(Debug, Clone)]
pub struct YearData {
    pub snapshot: YearSnapshot,
    pub relations: RelationIndex,
}

/// Every year of one scenario, ready for rendering.
#[derive(Debug, Clone)]
pub struct Dataset {
    scenario: ScenarioMetadata,
    years: BTreeMap<Year, YearData>,
    stage_colors: BTreeMap<String, String>,
    issues: Vec<DataIntegrityError>,
}

impl Dataset {
    pub fn from_json(json: &str, scenario: ScenarioMetadata) -> Result<Self, NormalizeError> {
        let normalized = normalize(parse_payload(json)?)?;
        Ok(Self::new(normalized, scenario))
    }

    /// Assign colors and build relation indices for normalized snapshots.
    pub fn new(normalized: Normalized, scenario: ScenarioMetadata) -> Self {
        let Normalized {
            mut snapshots,
            issues,
        } = normalized;

        let normal_colors =
            palette::normal_colors(snapshots.values().flat_map(|s| s.processes().map(|p| &p.id)));
        let stage_colors = palette::stage_colors(
            &scenario.transformation_stage_name_to_color,
            snapshots
                .values()
                .flat_map(|s| s.processes())
                .filter_map(|p| p.transformation_stage.as_deref()),
        );

        for snapshot in snapshots.values_mut() {
            for process in snapshot.processes_mut() {
                process.colors.normal = normal_colors.get(&process.id).cloned();
                process.colors.stage = process
                    .transformation_stage
                    .as_ref()
                    .and_then(|stage| stage_colors.get(stage))
                    .cloned();
            }
        }

        let years: BTreeMap<Year, YearData> = snapshots
            .into_iter()
            .map(|(year, snapshot)| {
                let relations = RelationIndex::build(&snapshot);
                (
                    year,
                    YearData {
                        snapshot,
                        relations,
                    },
                )
            })
            .collect();

        tracing::info!(
            "Loaded scenario '{}' with {} years",
            scenario.scenario_name,
            years.len()
        );

        Self {
            scenario,
            years,
            stage_colors,
            issues,
        }
    }

    pub fn scenario(&self) -> &ScenarioMetadata {
        &self.scenario
    }

    /// Years in chronological order.
    pub fn years(&self) -> Vec<Year> {
        self.years.keys().copied().collect()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.years.keys().next().copied()
    }

    pub fn year_at(&self, index: usize) -> Option<Year> {
        self.years.keys().nth(index).copied()
    }

    pub fn index_of(&self, year: Year) -> Option<usize> {
        self.years.keys().position(|&y| y == year)
    }

    pub fn year_data(&self, year: Year) -> Option<&YearData> {
        self.years.get(&year)
    }

    pub fn snapshot(&self, year: Year) -> Option<&YearSnapshot> {
        self.years.get(&year).map(|d| &d.snapshot)
    }

    pub fn relations(&self, year: Year) -> Option<&RelationIndex> {
        self.years.get(&year).map(|d| &d.relations)
    }

    pub fn stage_colors(&self) -> &BTreeMap<String, String> {
        &self.stage_colors
    }

    /// Flows dropped during normalization.
    pub fn issues(&self) -> &[DataIntegrityError] {
        &self.issues
    }
}
