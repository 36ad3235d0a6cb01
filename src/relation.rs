use crate::model::{Flow, FlowId, ProcessId};
use crate::normalize::YearSnapshot;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

/// Per-year adjacency of processes to their inflow and outflow ids.
///
/// Built once from a snapshot and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    graph: DiGraph<ProcessId, FlowId>,
    node_indices: HashMap<ProcessId, NodeIndex>,
}

/// Count and totals over one direction of a process's flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowTotals {
    pub count: usize,
    pub total_value: f64,
    pub indicators: BTreeMap<String, f64>,
}

impl RelationIndex {
    pub fn build(snapshot: &YearSnapshot) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for process in snapshot.processes() {
            let idx = graph.add_node(process.id.clone());
            node_indices.insert(process.id.clone(), idx);
        }

        // Single pass over the flows. Normalization already dropped dangling ones.
        for flow in snapshot.flows() {
            let from = node_index(&mut graph, &mut node_indices, &flow.source);
            let to = node_index(&mut graph, &mut node_indices, &flow.target);
            graph.add_edge(from, to, flow.id.clone());
        }

        Self {
            graph,
            node_indices,
        }
    }

    pub fn contains(&self, process_id: &str) -> bool {
        self.node_indices.contains_key(process_id)
    }

    /// Incoming flow ids in flow order. Empty for unknown processes.
    pub fn inflows_of(&self, process_id: &str) -> Vec<&FlowId> {
        self.flow_ids(process_id, Direction::Incoming)
    }

    /// Outgoing flow ids in flow order. Empty for unknown processes.
    pub fn outflows_of(&self, process_id: &str) -> Vec<&FlowId> {
        self.flow_ids(process_id, Direction::Outgoing)
    }

    pub fn num_inflows(&self, process_id: &str) -> usize {
        self.degree(process_id, Direction::Incoming)
    }

    pub fn num_outflows(&self, process_id: &str) -> usize {
        self.degree(process_id, Direction::Outgoing)
    }

    pub fn is_unconnected(&self, process_id: &str) -> bool {
        self.num_inflows(process_id) == 0 && self.num_outflows(process_id) == 0
    }

    pub fn inflow_totals(&self, process_id: &str, snapshot: &YearSnapshot) -> FlowTotals {
        totals(self.inflows_of(process_id), snapshot)
    }

    pub fn outflow_totals(&self, process_id: &str, snapshot: &YearSnapshot) -> FlowTotals {
        totals(self.outflows_of(process_id), snapshot)
    }

    fn flow_ids(&self, process_id: &str, direction: Direction) -> Vec<&FlowId> {
        let Some(&idx) = self.node_indices.get(process_id) else {
            return Vec::new();
        };

        // petgraph walks adjacency newest first; edge indices restore insertion order
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| e.id())
            .collect();
        edges.sort();
        edges.into_iter().map(|e| &self.graph[e]).collect()
    }

    fn degree(&self, process_id: &str, direction: Direction) -> usize {
        self.node_indices
            .get(process_id)
            .map(|&idx| self.graph.edges_directed(idx, direction).count())
            .unwrap_or(0)
    }
}

fn node_index(
    graph: &mut DiGraph<ProcessId, FlowId>,
    node_indices: &mut HashMap<ProcessId, NodeIndex>,
    id: &ProcessId,
) -> NodeIndex {
    *node_indices
        .entry(id.clone())
        .or_insert_with(|| graph.add_node(id.clone()))
}

fn totals(flow_ids: Vec<&FlowId>, snapshot: &YearSnapshot) -> FlowTotals {
    let mut result = FlowTotals::default();
    for flow in flow_ids
        .into_iter()
        .filter_map(|id| snapshot.flow(id.as_str()))
    {
        accumulate(&mut result, flow);
    }
    result
}

fn accumulate(totals: &mut FlowTotals, flow: &Flow) {
    totals.count += 1;
    totals.total_value += flow.magnitude();
    for (name, value) in &flow.indicators {
        *totals.indicators.entry(name.clone()).or_insert(0.0) += value;
    }
}
