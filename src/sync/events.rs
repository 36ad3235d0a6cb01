//! Typed controller events and the adapter that builds them from raw engine payloads.

use super::engine::Viewport;
use crate::filter::{ColorMode, FlowLabelMode, LabelMode};
use crate::model::ProcessId;
use crate::position::Position;
use crate::view::ViewNode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Timeline moved to the year at `index`.
    YearChanged { index: usize },
    NodeDragStart { node: ProcessId },
    NodeDragMove,
    NodeDragEnd,
    NodeHover { node: ProcessId },
    LabelModeChanged(LabelMode),
    FlowLabelModeChanged(FlowLabelMode),
    ColorModeChanged(ColorMode),
    HideUnconnectedChanged(bool),
    HideSmallNodesChanged(bool),
    ShowVirtualChanged(bool),
    FreezeToggled,
    ResetView,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event payload is not a JSON object")]
    NotAnObject,
    #[error("Event payload has no 'type'")]
    MissingType,
    #[error("Unknown event type '{0}'")]
    UnknownType(String),
    #[error("Event '{event}' is missing '{field}'")]
    MissingField { event: String, field: &'static str },
    #[error("Event '{event}' has an invalid '{field}': {source}")]
    InvalidField {
        event: String,
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("Event '{event}' targets a {data_type}, not a node")]
    NotANode { event: String, data_type: String },
    #[error("No node at index {0}")]
    NoNodeAtIndex(usize),
}

/// An adapted event plus the layout the engine reported alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineMessage {
    pub event: ViewEvent,
    pub layout: Vec<(ProcessId, Position)>,
    pub viewport: Option<Viewport>,
}

#[derive(serde::Deserialize)]
struct LayoutEntry {
    id: String,
    x: f64,
    y: f64,
}

#[derive(serde::Deserialize)]
struct RawViewport {
    zoom: f64,
    center: [f64; 2],
}

/// Convert a raw engine payload into a typed event.
///
/// `nodes` is the node array the engine is currently showing; data indices in mouse events
/// point into it.
pub fn adapt(payload: &Value, nodes: &[ViewNode]) -> Result<EngineMessage, EventError> {
    let object = payload.as_object().ok_or(EventError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(EventError::MissingType)?;

    let event = match kind {
        "timelinechanged" => ViewEvent::YearChanged {
            index: field(object, kind, "currentIndex")?,
        },
        "mousedown" => ViewEvent::NodeDragStart {
            node: node_at(object, kind, nodes)?,
        },
        "mousemove" => {
            require_node_target(object, kind)?;
            ViewEvent::NodeDragMove
        }
        "mouseup" => ViewEvent::NodeDragEnd,
        "mouseover" => ViewEvent::NodeHover {
            node: node_at(object, kind, nodes)?,
        },
        "labelmode" => ViewEvent::LabelModeChanged(field(object, kind, "value")?),
        "flowlabelmode" => ViewEvent::FlowLabelModeChanged(field(object, kind, "value")?),
        "colormode" => ViewEvent::ColorModeChanged(field(object, kind, "value")?),
        "hideunconnected" => ViewEvent::HideUnconnectedChanged(field(object, kind, "value")?),
        "hidesmallnodes" => ViewEvent::HideSmallNodesChanged(field(object, kind, "value")?),
        "showvirtual" => ViewEvent::ShowVirtualChanged(field(object, kind, "value")?),
        "freeze" => ViewEvent::FreezeToggled,
        "reset" => ViewEvent::ResetView,
        other => return Err(EventError::UnknownType(other.to_string())),
    };

    let layout = match object.get("layout") {
        Some(value) => {
            let entries: Vec<LayoutEntry> = parse(value, kind, "layout")?;
            entries
                .into_iter()
                .map(|e| (ProcessId::from(e.id), Position::new(e.x, e.y)))
                .collect()
        }
        None => Vec::new(),
    };

    let viewport = match object.get("viewport") {
        Some(value) => {
            let raw: RawViewport = parse(value, kind, "viewport")?;
            Some(Viewport {
                zoom: raw.zoom,
                center: raw.center,
            })
        }
        None => None,
    };

    Ok(EngineMessage {
        event,
        layout,
        viewport,
    })
}

fn field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    event: &str,
    name: &'static str,
) -> Result<T, EventError> {
    let value = object.get(name).ok_or_else(|| EventError::MissingField {
        event: event.to_string(),
        field: name,
    })?;
    parse(value, event, name)
}

fn parse<T: DeserializeOwned>(
    value: &Value,
    event: &str,
    name: &'static str,
) -> Result<T, EventError> {
    serde_json::from_value(value.clone()).map_err(|source| EventError::InvalidField {
        event: event.to_string(),
        field: name,
        source,
    })
}

fn require_node_target(object: &Map<String, Value>, event: &str) -> Result<(), EventError> {
    match object.get("dataType").and_then(Value::as_str) {
        None | Some("node") => Ok(()),
        Some(other) => Err(EventError::NotANode {
            event: event.to_string(),
            data_type: other.to_string(),
        }),
    }
}

fn node_at(
    object: &Map<String, Value>,
    event: &str,
    nodes: &[ViewNode],
) -> Result<ProcessId, EventError> {
    require_node_target(object, event)?;
    let index: usize = field(object, event, "dataIndex")?;
    nodes
        .get(index)
        .map(|n| n.id.clone())
        .ok_or(EventError::NoNodeAtIndex(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ItemStyle, NodeLabel};
    use serde_json::json;

    fn node(id: &str) -> ViewNode {
        ViewNode {
            id: ProcessId::from(id),
            name: id.to_string(),
            category: id.to_string(),
            label: NodeLabel { show: true },
            item_style: ItemStyle::default(),
            num_inflows: 0,
            num_outflows: 0,
            total_inflows: 0.0,
            total_outflows: 0.0,
            visible: true,
            is_virtual: false,
            is_stock: false,
            x: None,
            y: None,
            tooltip: String::new(),
        }
    }

    #[test]
    fn test_timeline_event() {
        let message = adapt(&json!({"type": "timelinechanged", "currentIndex": 3}), &[]).unwrap();
        assert_eq!(message.event, ViewEvent::YearChanged { index: 3 });
        assert!(message.layout.is_empty());
        assert_eq!(message.viewport, None);
    }

    #[test]
    fn test_mouse_events_resolve_data_index() {
        let nodes = [node("A"), node("B")];
        let message = adapt(
            &json!({"type": "mousedown", "dataType": "node", "dataIndex": 1}),
            &nodes,
        )
        .unwrap();
        assert_eq!(
            message.event,
            ViewEvent::NodeDragStart {
                node: ProcessId::from("B")
            }
        );

        let result = adapt(
            &json!({"type": "mousedown", "dataType": "node", "dataIndex": 5}),
            &nodes,
        );
        assert!(matches!(result, Err(EventError::NoNodeAtIndex(5))));

        let result = adapt(
            &json!({"type": "mousedown", "dataType": "edge", "dataIndex": 0}),
            &nodes,
        );
        assert!(matches!(result, Err(EventError::NotANode { .. })));
    }

    #[test]
    fn test_control_events() {
        let message = adapt(&json!({"type": "labelmode", "value": "name"}), &[]).unwrap();
        assert_eq!(message.event, ViewEvent::LabelModeChanged(LabelMode::Name));

        let message = adapt(&json!({"type": "hidesmallnodes", "value": true}), &[]).unwrap();
        assert_eq!(message.event, ViewEvent::HideSmallNodesChanged(true));

        let result = adapt(&json!({"type": "colormode", "value": "rainbow"}), &[]);
        assert!(matches!(result, Err(EventError::InvalidField { .. })));

        let result = adapt(&json!({"type": "showvirtual"}), &[]);
        assert!(matches!(result, Err(EventError::MissingField { .. })));
    }

    #[test]
    fn test_layout_and_viewport_reports() {
        let message = adapt(
            &json!({
                "type": "freeze",
                "layout": [{"id": "A", "x": 1.5, "y": -2.0}],
                "viewport": {"zoom": 1.2, "center": [3.0, 4.0]}
            }),
            &[],
        )
        .unwrap();
        assert_eq!(message.event, ViewEvent::FreezeToggled);
        assert_eq!(
            message.layout,
            vec![(ProcessId::from("A"), Position::new(1.5, -2.0))]
        );
        assert_eq!(
            message.viewport,
            Some(Viewport {
                zoom: 1.2,
                center: [3.0, 4.0]
            })
        );
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(adapt(&json!([1, 2]), &[]), Err(EventError::NotAnObject)));
        assert!(matches!(adapt(&json!({"x": 1}), &[]), Err(EventError::MissingType)));
        assert!(matches!(
            adapt(&json!({"type": "explode"}), &[]),
            Err(EventError::UnknownType(_))
        ));
    }
}
