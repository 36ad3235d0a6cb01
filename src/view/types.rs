use crate::model::{FlowId, ProcessId, Year};
use serde::Serialize;

/// Color used to hide nodes and links without removing them from the arrays.
pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// Renderable graph for one year under one set of display filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub year: Year,
    pub nodes: Vec<ViewNode>,
    pub links: Vec<ViewLink>,
    pub categories: Vec<Category>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLabel {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: ProcessId,
    /// Resolved display name. Also the sort key of the node array.
    pub name: String,
    pub category: String,
    pub label: NodeLabel,
    pub item_style: ItemStyle,
    pub num_inflows: usize,
    pub num_outflows: usize,
    pub total_inflows: f64,
    pub total_outflows: f64,
    pub visible: bool,
    pub is_virtual: bool,
    pub is_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Pre-rendered tooltip content.
    pub tooltip: String,
}

impl ViewNode {
    /// Label text as drawn on the chart; empty for hidden nodes.
    pub fn shown_label(&self) -> &str {
        if self.label.show { &self.name } else { "" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLabel {
    pub show: bool,
    pub position: &'static str,
    pub formatter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLink {
    pub id: FlowId,
    pub name: String,
    pub source: ProcessId,
    pub target: ProcessId,
    pub value: f64,
    pub label: LinkLabel,
    pub line_style: LineStyle,
    pub visible: bool,
    pub is_virtual: bool,
    pub is_absolute: bool,
    pub tooltip: String,
}

/// One category per rendered node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub item_style: ItemStyle,
}

/// One legend entry per visible node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub name: String,
    pub item_style: ItemStyle,
}

impl GraphView {
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn link(&self, id: &str) -> Option<&ViewLink> {
        self.links.iter().find(|l| l.id.as_str() == id)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &ViewNode> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn visible_node_ids(&self) -> Vec<ProcessId> {
        self.visible_nodes().map(|n| n.id.clone()).collect()
    }
}
