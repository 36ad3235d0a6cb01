use serde::{Deserialize, Serialize};

/// What a node shows as its display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Id,
    Name,
}

/// What a link shows as its label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FlowLabelMode {
    /// `ABS` for absolute flows, `%` for relative ones
    Type,
    #[default]
    Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color by transformation stage
    #[default]
    Stage,
    Normal,
}

/// Orthogonal display toggles. Replaced wholesale between events, never mutated mid-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayFilterState {
    pub label_mode: LabelMode,
    pub flow_label_mode: FlowLabelMode,
    pub color_mode: ColorMode,
    pub hide_unconnected: bool,
    pub hide_small_nodes: bool,
    pub show_virtual: bool,
    pub freeze_layout: bool,
}

impl Default for DisplayFilterState {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::Id,
            flow_label_mode: FlowLabelMode::Value,
            color_mode: ColorMode::Stage,
            hide_unconnected: false,
            hide_small_nodes: false,
            show_virtual: true,
            freeze_layout: false,
        }
    }
}

impl DisplayFilterState {
    pub fn with_label_mode(self, label_mode: LabelMode) -> Self {
        Self { label_mode, ..self }
    }

    pub fn with_flow_label_mode(self, flow_label_mode: FlowLabelMode) -> Self {
        Self {
            flow_label_mode,
            ..self
        }
    }

    pub fn with_color_mode(self, color_mode: ColorMode) -> Self {
        Self { color_mode, ..self }
    }

    pub fn with_hide_unconnected(self, hide_unconnected: bool) -> Self {
        Self {
            hide_unconnected,
            ..self
        }
    }

    pub fn with_hide_small_nodes(self, hide_small_nodes: bool) -> Self {
        Self {
            hide_small_nodes,
            ..self
        }
    }

    pub fn with_show_virtual(self, show_virtual: bool) -> Self {
        Self {
            show_virtual,
            ..self
        }
    }

    pub fn with_freeze_layout(self, freeze_layout: bool) -> Self {
        Self {
            freeze_layout,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_touch_one_field() {
        let base = DisplayFilterState::default();
        let changed = base.with_label_mode(LabelMode::Name).with_hide_unconnected(true);
        assert_eq!(changed.label_mode, LabelMode::Name);
        assert!(changed.hide_unconnected);
        assert_eq!(changed.color_mode, base.color_mode);
        assert_eq!(changed.show_virtual, base.show_virtual);
    }

    #[test]
    fn test_deserialize_partial() {
        let filters: DisplayFilterState =
            serde_json::from_str(r#"{"labelMode": "name", "hideSmallNodes": true}"#).unwrap();
        assert_eq!(filters.label_mode, LabelMode::Name);
        assert!(filters.hide_small_nodes);
        assert!(filters.show_virtual);
    }
}
