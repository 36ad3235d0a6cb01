use super::ProcessId;
use serde::Serialize;
use serde_json::Value;

/// A node of the flow network for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    pub id: ProcessId,
    pub label: Option<String>,
    pub transformation_stage: Option<String>,
    /// Counts as reported by the pipeline. Rendering uses the relation index instead.
    pub declared_inflows: usize,
    pub declared_outflows: usize,
    pub stock: Option<StockInfo>,
    pub is_virtual: bool,
    pub colors: ProcessColors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockInfo {
    pub lifetime: f64,
    pub distribution_type: Option<String>,
    pub distribution_params: Option<Value>,
}

/// Colors assigned once at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessColors {
    pub normal: Option<String>,
    pub stage: Option<String>,
}

impl Process {
    pub fn new(id: impl Into<ProcessId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            transformation_stage: None,
            declared_inflows: 0,
            declared_outflows: 0,
            stock: None,
            is_virtual: false,
            colors: ProcessColors::default(),
        }
    }

    pub fn is_stock(&self) -> bool {
        self.stock.is_some()
    }
}

impl StockInfo {
    /// Distribution parameters as `key=value` pairs, or the raw value when not a map.
    pub fn params_text(&self) -> Option<String> {
        match self.distribution_params.as_ref()? {
            Value::Null => None,
            Value::Object(map) => Some(
                map.iter()
                    .map(|(k, v)| format!("{}={}", k, scalar_text(v)))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => Some(scalar_text(other)),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
