use super::{FlowId, ProcessId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A directed, valued edge between two processes of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub id: FlowId,
    pub source: ProcessId,
    pub target: ProcessId,
    /// Value as declared by the model: an absolute amount or a share, see `is_unit_absolute_value`.
    pub value: f64,
    pub unit: String,
    pub is_unit_absolute_value: bool,
    /// Value after the model has been solved.
    pub evaluated_value: Option<f64>,
    pub indicators: BTreeMap<String, f64>,
    pub is_virtual: bool,
}

impl Flow {
    /// Amount carried by this flow, used for totals and the small node rule.
    pub fn magnitude(&self) -> f64 {
        self.evaluated_value.unwrap_or(self.value)
    }

    pub fn touches(&self, process_id: &ProcessId) -> bool {
        &self.source == process_id || &self.target == process_id
    }
}
