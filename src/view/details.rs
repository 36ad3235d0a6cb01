//! Hover details for nodes and links, with the HTML fragments shown as tooltips.

use super::format_value;
use crate::dataset::YearData;
use crate::model::{Flow, FlowId, Process, ProcessId};
use crate::relation::FlowTotals;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Process,
    Stock,
    VirtualProcess,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Process => write!(f, "Process"),
            NodeKind::Stock => write!(f, "Stock"),
            NodeKind::VirtualProcess => write!(f, "Virtual process"),
        }
    }
}

/// A flow as seen from one end: the process on the other end and its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub process: ProcessId,
    pub value: f64,
    pub indicators: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub distribution_type: Option<String>,
    pub lifetime: f64,
    pub params: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetails {
    pub id: ProcessId,
    pub name: String,
    pub kind: NodeKind,
    pub baseline_name: String,
    pub indicator_names: Vec<String>,
    pub stock: Option<StockSummary>,
    pub inflows: Vec<FlowRow>,
    pub outflows: Vec<FlowRow>,
    pub inflow_totals: Vec<f64>,
    pub outflow_totals: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDetails {
    pub id: FlowId,
    pub is_virtual: bool,
    pub source: ProcessId,
    pub target: ProcessId,
    pub baseline_name: String,
    pub value: f64,
    pub indicators: BTreeMap<String, f64>,
}

impl NodeDetails {
    pub fn collect(process: &Process, name: &str, data: &YearData, baseline_name: &str) -> Self {
        let id = process.id.as_str();
        let inflows = resolve(data, data.relations.inflows_of(id));
        let outflows = resolve(data, data.relations.outflows_of(id));

        let indicator_names: Vec<String> = inflows
            .iter()
            .chain(outflows.iter())
            .flat_map(|f| f.indicators.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let kind = if process.is_virtual {
            NodeKind::VirtualProcess
        } else if process.is_stock() {
            NodeKind::Stock
        } else {
            NodeKind::Process
        };

        let stock = process.stock.as_ref().map(|s| StockSummary {
            distribution_type: s.distribution_type.clone(),
            lifetime: s.lifetime,
            params: s.params_text(),
        });

        let inflow_totals = totals_row(
            &data.relations.inflow_totals(id, &data.snapshot),
            &indicator_names,
        );
        let outflow_totals = totals_row(
            &data.relations.outflow_totals(id, &data.snapshot),
            &indicator_names,
        );

        Self {
            id: process.id.clone(),
            name: name.to_string(),
            kind,
            baseline_name: baseline_name.to_string(),
            stock,
            inflows: inflows
                .iter()
                .map(|f| row(&f.source, f, &indicator_names))
                .collect(),
            outflows: outflows
                .iter()
                .map(|f| row(&f.target, f, &indicator_names))
                .collect(),
            inflow_totals,
            outflow_totals,
            indicator_names,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"tooltip-wrapper\"><div class=\"tooltip-title\">{}</div>\
             <span class=\"tooltip-type-title\">Type: {}</span><br/>\
             <span class=\"tooltip-type-title\">ID: {}</span><br/><br/>",
            escape_html(&self.name),
            self.kind,
            escape_html(self.id.as_str())
        );

        if let Some(stock) = &self.stock {
            html.push_str("<span class=\"tooltip-table-title\">Stock</span><table class=\"tooltip-table\"><thead><tr><th>Type</th><th>Lifetime</th>");
            if stock.params.is_some() {
                html.push_str("<th>Parameters</th>");
            }
            let _ = write!(
                html,
                "</tr></thead><tbody><tr><td>{}</td><td>{}</td>",
                escape_html(stock.distribution_type.as_deref().unwrap_or("")),
                format_value(stock.lifetime)
            );
            if let Some(params) = &stock.params {
                let _ = write!(html, "<td>{}</td>", escape_html(params));
            }
            html.push_str("</tr></tbody></table><br/>");
        }

        html.push_str("<div class=\"tooltip-body-wrapper\">");
        self.write_flow_table(&mut html, "Inflows", "Source", &self.inflows, &self.inflow_totals);
        self.write_flow_table(
            &mut html,
            "Outflows",
            "Target",
            &self.outflows,
            &self.outflow_totals,
        );
        html.push_str("</div></div>");
        html
    }

    fn write_flow_table(
        &self,
        html: &mut String,
        title: &str,
        counterpart: &str,
        rows: &[FlowRow],
        totals: &[f64],
    ) {
        let _ = write!(
            html,
            "<div class=\"tooltip-col\"><span class=\"tooltip-table-title\">{}</span><br/>",
            title
        );
        if rows.is_empty() {
            let _ = write!(html, "No {}</div>", title.to_lowercase());
            return;
        }

        html.push_str("<table class=\"tooltip-table\"><thead><tr>");
        let _ = write!(
            html,
            "<th>{}</th><th>{}</th>",
            counterpart,
            escape_html(&self.baseline_name)
        );
        for name in &self.indicator_names {
            let _ = write!(html, "<th>{}</th>", escape_html(name));
        }
        html.push_str("</tr></thead><tbody>");

        for row in rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td>",
                escape_html(row.process.as_str()),
                format_value(row.value)
            );
            for value in &row.indicators {
                let _ = write!(html, "<td>{}</td>", format_value(*value));
            }
            html.push_str("</tr>");
        }

        html.push_str("<tr><td><b>Total</b></td>");
        for value in totals {
            let _ = write!(html, "<td><b>{}</b></td>", format_value(*value));
        }
        html.push_str("</tr></tbody></table></div>");
    }
}

impl FlowDetails {
    pub fn collect(flow: &Flow, baseline_name: &str) -> Self {
        Self {
            id: flow.id.clone(),
            is_virtual: flow.is_virtual,
            source: flow.source.clone(),
            target: flow.target.clone(),
            baseline_name: baseline_name.to_string(),
            value: flow.magnitude(),
            indicators: flow.indicators.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_virtual { "Virtual flow" } else { "Flow" }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"tooltip-wrapper\"><div class=\"tooltip-title\">{id}</div>\
             <span class=\"tooltip-type-title\">Type: {kind}</span><br/>\
             <span class=\"tooltip-type-title\">ID: {id}</span><br/><br/>\
             <span class=\"tooltip-table-title\">Flow</span>\
             <table class=\"tooltip-table\"><thead><tr><th>Source</th><th>Target</th><th>{baseline}</th>",
            id = escape_html(self.id.as_str()),
            kind = self.kind(),
            baseline = escape_html(&self.baseline_name)
        );
        for name in self.indicators.keys() {
            let _ = write!(html, "<th>{}</th>", escape_html(name));
        }
        let _ = write!(
            html,
            "</tr></thead><tbody><tr><td>{}</td><td>{}</td><td>{}</td>",
            escape_html(self.source.as_str()),
            escape_html(self.target.as_str()),
            format_value(self.value)
        );
        for value in self.indicators.values() {
            let _ = write!(html, "<td>{}</td>", format_value(*value));
        }
        html.push_str("</tr></tbody></table></div>");
        html
    }
}

fn resolve<'a>(data: &'a YearData, ids: Vec<&FlowId>) -> Vec<&'a Flow> {
    ids.into_iter()
        .filter_map(|id| data.snapshot.flow(id.as_str()))
        .collect()
}

fn row(process: &ProcessId, flow: &Flow, indicator_names: &[String]) -> FlowRow {
    FlowRow {
        process: process.clone(),
        value: flow.magnitude(),
        indicators: indicator_names
            .iter()
            .map(|name| flow.indicators.get(name).copied().unwrap_or(0.0))
            .collect(),
    }
}

fn totals_row(totals: &FlowTotals, indicator_names: &[String]) -> Vec<f64> {
    std::iter::once(totals.total_value)
        .chain(
            indicator_names
                .iter()
                .map(|name| totals.indicators.get(name).copied().unwrap_or(0.0)),
        )
        .collect()
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
