use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_SCENARIO_NAME: &str = "Scenario";
pub const DEFAULT_BASELINE_VALUE_NAME: &str = "Value";

/// Companion metadata shipped next to the year data. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioMetadata {
    pub scenario_name: String,
    pub baseline_value_name: String,
    pub baseline_unit_name: Option<String>,
    pub transformation_stage_name_to_color: BTreeMap<String, String>,
}

impl Default for ScenarioMetadata {
    fn default() -> Self {
        Self {
            scenario_name: DEFAULT_SCENARIO_NAME.to_string(),
            baseline_value_name: DEFAULT_BASELINE_VALUE_NAME.to_string(),
            baseline_unit_name: None,
            transformation_stage_name_to_color: BTreeMap::new(),
        }
    }
}

impl ScenarioMetadata {
    /// Parse metadata, falling back to defaults for missing or blank names.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut meta: ScenarioMetadata = serde_json::from_str(json)?;
        if meta.scenario_name.trim().is_empty() {
            tracing::warn!("Scenario metadata has no scenario name, using default");
            meta.scenario_name = DEFAULT_SCENARIO_NAME.to_string();
        }
        if meta.baseline_value_name.trim().is_empty() {
            tracing::warn!("Scenario metadata has no baseline value name, using default");
            meta.baseline_value_name = DEFAULT_BASELINE_VALUE_NAME.to_string();
        }
        Ok(meta)
    }
}
