//! Derivation of a renderable graph from one year of data.

mod builder;
mod details;
mod types;

pub use builder::{GraphViewBuilder, build_view, display_name};
pub(crate) use builder::is_small;
pub(crate) use details::escape_html;
pub use details::{FlowDetails, FlowRow, NodeDetails, NodeKind, StockSummary};
pub use types::{
    Category, GraphView, ItemStyle, LegendEntry, LineStyle, LinkLabel, NodeLabel, TRANSPARENT,
    ViewLink, ViewNode,
};

/// Format a value with at most three decimals, dropping trailing zeros.
pub fn format_value(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" { "0".to_string() } else { text }
}
