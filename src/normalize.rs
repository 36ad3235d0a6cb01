//! Conversion of the pipeline's year → {nodes, edges} payload into indexed year snapshots.
//!
//! Node and edge keys arrive as integer-like strings. A node's `process_id` is its identity;
//! the numeric index is only a stable handle within that year.

use crate::model::{Flow, FlowId, Process, ProcessId, StockInfo, Year};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Fatal problems with the payload as a whole.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to parse year data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid year key '{0}'")]
    InvalidYear(String),
    #[error("Year data contains no years")]
    Empty,
}

/// A flow that references a process missing from its year. The flow is dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    #[error("Flow '{flow_id}' in year {year} references unknown source process '{process_id}'")]
    MissingSource {
        year: Year,
        flow_id: FlowId,
        process_id: ProcessId,
    },
    #[error("Flow '{flow_id}' in year {year} references unknown target process '{process_id}'")]
    MissingTarget {
        year: Year,
        flow_id: FlowId,
        process_id: ProcessId,
    },
}

impl DataIntegrityError {
    pub fn year(&self) -> Year {
        match self {
            Self::MissingSource { year, .. } | Self::MissingTarget { year, .. } => *year,
        }
    }

    pub fn flow_id(&self) -> &FlowId {
        match self {
            Self::MissingSource { flow_id, .. } | Self::MissingTarget { flow_id, .. } => flow_id,
        }
    }
}

pub type RawPayload = BTreeMap<String, RawYearData>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawYearData {
    #[serde(default)]
    pub node_index_to_data: BTreeMap<String, ProcessRecord>,
    #[serde(default)]
    pub edge_index_to_data: BTreeMap<String, FlowRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRecord {
    pub process_id: String,
    #[serde(default)]
    pub process_label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_inflows: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_outflows: usize,
    #[serde(default)]
    pub transformation_stage: Option<String>,
    #[serde(default)]
    pub is_stock: Option<bool>,
    #[serde(default)]
    pub stock_lifetime: Option<f64>,
    #[serde(default)]
    pub stock_distribution_type: Option<String>,
    #[serde(default)]
    pub stock_distribution_params: Option<Value>,
    #[serde(default)]
    pub is_virtual: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowRecord {
    pub flow_id: String,
    pub source_process_id: String,
    pub target_process_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    /// Absent or null means absolute.
    #[serde(default)]
    pub is_unit_absolute_value: Option<bool>,
    #[serde(default)]
    pub evaluated_value: Option<f64>,
    /// Indicators without a value are left out.
    #[serde(default, deserialize_with = "null_as_default")]
    pub indicators: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub is_virtual: Option<bool>,
}

/// Pipeline output writes `null` for unset scalars; read those like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// All processes and flows of a single year, indexed for lookup.
#[derive(Debug, Clone, Default)]
pub struct YearSnapshot {
    year: Year,
    processes: BTreeMap<usize, Process>,
    process_index: HashMap<ProcessId, usize>,
    flows: Vec<Flow>,
    flow_index: HashMap<FlowId, usize>,
}

impl YearSnapshot {
    pub fn year(&self) -> Year {
        self.year
    }

    /// Processes in ascending node index order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn process(&self, id: &str) -> Option<&Process> {
        self.process_index
            .get(id)
            .and_then(|index| self.processes.get(index))
    }

    pub fn process_at(&self, index: usize) -> Option<&Process> {
        self.processes.get(&index)
    }

    pub fn contains_process(&self, id: &str) -> bool {
        self.process_index.contains_key(id)
    }

    /// Flows in ascending edge index order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn flow(&self, id: &str) -> Option<&Flow> {
        self.flow_index.get(id).map(|&i| &self.flows[i])
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub(crate) fn processes_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.processes.values_mut()
    }
}

/// Output of normalization: one snapshot per year plus the flows that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub snapshots: BTreeMap<Year, YearSnapshot>,
    pub issues: Vec<DataIntegrityError>,
}

pub fn parse_payload(json: &str) -> Result<RawPayload, NormalizeError> {
    Ok(serde_json::from_str(json)?)
}

/// Normalize every year of the payload. Years are independent and processed in parallel.
pub fn normalize(raw: RawPayload) -> Result<Normalized, NormalizeError> {
    if raw.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let years: Vec<(Year, RawYearData)> = raw
        .into_iter()
        .map(|(key, data)| {
            key.parse::<Year>()
                .map(|year| (year, data))
                .map_err(|_| NormalizeError::InvalidYear(key))
        })
        .collect::<Result<_, _>>()?;

    let results: Vec<(YearSnapshot, Vec<DataIntegrityError>)> = years
        .into_par_iter()
        .map(|(year, data)| normalize_year(year, data))
        .collect();

    let mut normalized = Normalized::default();
    for (snapshot, issues) in results {
        for issue in &issues {
            tracing::warn!("{}; flow skipped", issue);
        }
        normalized.issues.extend(issues);
        normalized.snapshots.insert(snapshot.year, snapshot);
    }

    Ok(normalized)
}

pub fn normalize_year(year: Year, data: RawYearData) -> (YearSnapshot, Vec<DataIntegrityError>) {
    let mut snapshot = YearSnapshot {
        year,
        ..Default::default()
    };
    let mut issues = Vec::new();

    for (key, record) in data.node_index_to_data {
        let Some(index) = parse_index(&key) else {
            tracing::warn!("Year {}: node key '{}' is not an integer, skipped", year, key);
            continue;
        };
        let process = process_from_record(record);
        if let Some(existing) = snapshot.processes.get(&index) {
            tracing::warn!(
                "Year {}: node key '{}' repeats index {} of process '{}', '{}' skipped",
                year,
                key,
                index,
                existing.id,
                process.id
            );
            continue;
        }
        if snapshot.process_index.contains_key(&process.id) {
            tracing::warn!(
                "Year {}: duplicate process '{}' at node {}, skipped",
                year,
                process.id,
                index
            );
            continue;
        }
        snapshot.process_index.insert(process.id.clone(), index);
        snapshot.processes.insert(index, process);
    }

    let mut edges: Vec<(usize, FlowRecord)> = data
        .edge_index_to_data
        .into_iter()
        .filter_map(|(key, record)| match parse_index(&key) {
            Some(index) => Some((index, record)),
            None => {
                tracing::warn!("Year {}: edge key '{}' is not an integer, skipped", year, key);
                None
            }
        })
        .collect();
    edges.sort_by_key(|(index, _)| *index);

    for (_, record) in edges {
        let flow = flow_from_record(record);

        if !snapshot.process_index.contains_key(&flow.source) {
            issues.push(DataIntegrityError::MissingSource {
                year,
                flow_id: flow.id,
                process_id: flow.source,
            });
            continue;
        }
        if !snapshot.process_index.contains_key(&flow.target) {
            issues.push(DataIntegrityError::MissingTarget {
                year,
                flow_id: flow.id,
                process_id: flow.target,
            });
            continue;
        }
        if snapshot.flow_index.contains_key(&flow.id) {
            tracing::debug!("Year {}: duplicate flow '{}' ignored", year, flow.id);
            continue;
        }

        snapshot.flow_index.insert(flow.id.clone(), snapshot.flows.len());
        snapshot.flows.push(flow);
    }

    (snapshot, issues)
}

fn parse_index(key: &str) -> Option<usize> {
    key.trim().parse().ok()
}

fn process_from_record(record: ProcessRecord) -> Process {
    let lifetime = record.stock_lifetime.unwrap_or(0.0);
    let is_stock = record.is_stock.unwrap_or(lifetime > 0.0);
    let stock = is_stock.then(|| StockInfo {
        lifetime,
        distribution_type: record.stock_distribution_type,
        distribution_params: record.stock_distribution_params,
    });

    let mut process = Process::new(record.process_id);
    process.label = record.process_label.filter(|l| !l.trim().is_empty());
    process.transformation_stage = record.transformation_stage.filter(|s| !s.is_empty());
    process.declared_inflows = record.num_inflows;
    process.declared_outflows = record.num_outflows;
    process.stock = stock;
    process.is_virtual = record.is_virtual.unwrap_or(false);
    process
}

fn flow_from_record(record: FlowRecord) -> Flow {
    Flow {
        id: FlowId::new(record.flow_id),
        source: ProcessId::new(record.source_process_id),
        target: ProcessId::new(record.target_process_id),
        value: record.value,
        unit: record.unit,
        is_unit_absolute_value: record.is_unit_absolute_value.unwrap_or(true),
        evaluated_value: record.evaluated_value,
        indicators: record
            .indicators
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect(),
        is_virtual: record.is_virtual.unwrap_or(false),
    }
}
