use crate::filter::{ColorMode, DisplayFilterState, FlowLabelMode, LabelMode};
use crate::fs::FileSystem;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "flowmap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub thresholds: Thresholds,
    pub colors: Colors,
    pub layout: Layout,
    /// Initial display filters.
    pub display: DisplayFilterState,
    /// Display labels for virtual processes, keyed by process id.
    pub virtual_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Processes whose only side carries less than this total are hidden by the small node filter.
    pub small_node_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub absolute_flow: String,
    pub relative_flow: String,
    pub virtual_node: String,
    pub virtual_flow: String,
    pub stock_border: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub zoom: f64,
    pub symbol_size: f64,
    pub repulsion: Vec<f64>,
    pub edge_length: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    thresholds: Option<RawThresholds>,
    colors: Option<RawColors>,
    layout: Option<RawLayout>,
    display: Option<RawDisplay>,
    virtual_labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    small_node_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawColors {
    absolute_flow: Option<String>,
    relative_flow: Option<String>,
    virtual_node: Option<String>,
    virtual_flow: Option<String>,
    stock_border: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    zoom: Option<f64>,
    symbol_size: Option<f64>,
    repulsion: Option<Vec<f64>>,
    edge_length: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    label_mode: Option<LabelMode>,
    flow_label_mode: Option<FlowLabelMode>,
    color_mode: Option<ColorMode>,
    hide_unconnected: Option<bool>,
    hide_small_nodes: Option<bool>,
    show_virtual: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            colors: Colors::default(),
            layout: Layout::default(),
            display: DisplayFilterState::default(),
            virtual_labels: BTreeMap::new(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            small_node_threshold: 0.0,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            absolute_flow: "rgba(59, 162, 114, 1)".to_string(),
            relative_flow: "rgba(255, 50, 50, 1)".to_string(),
            virtual_node: "rgba(100, 100, 100, 0.8)".to_string(),
            virtual_flow: "rgba(100, 100, 100, 0.8)".to_string(),
            stock_border: "#333".to_string(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            symbol_size: 40.0,
            repulsion: vec![500.0, 1000.0, 2000.0],
            edge_length: 50.0,
        }
    }
}

impl Config {
    /// Load `flowmap.toml` from a directory, or defaults when the file does not exist.
    pub fn load(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }
        Self::load_file(&config_path, fs)
    }

    pub fn load_file(path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let content = fs.read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let thresholds = match raw.thresholds {
            Some(t) => Thresholds {
                small_node_threshold: t
                    .small_node_threshold
                    .unwrap_or(defaults.thresholds.small_node_threshold),
            },
            None => defaults.thresholds,
        };

        let colors = match raw.colors {
            Some(c) => {
                let d = defaults.colors;
                Colors {
                    absolute_flow: c.absolute_flow.unwrap_or(d.absolute_flow),
                    relative_flow: c.relative_flow.unwrap_or(d.relative_flow),
                    virtual_node: c.virtual_node.unwrap_or(d.virtual_node),
                    virtual_flow: c.virtual_flow.unwrap_or(d.virtual_flow),
                    stock_border: c.stock_border.unwrap_or(d.stock_border),
                }
            }
            None => defaults.colors,
        };

        let layout = match raw.layout {
            Some(l) => {
                let d = defaults.layout;
                Layout {
                    zoom: l.zoom.unwrap_or(d.zoom),
                    symbol_size: l.symbol_size.unwrap_or(d.symbol_size),
                    repulsion: l.repulsion.unwrap_or(d.repulsion),
                    edge_length: l.edge_length.unwrap_or(d.edge_length),
                }
            }
            None => defaults.layout,
        };

        let display = match raw.display {
            Some(r) => {
                let d = defaults.display;
                DisplayFilterState {
                    label_mode: r.label_mode.unwrap_or(d.label_mode),
                    flow_label_mode: r.flow_label_mode.unwrap_or(d.flow_label_mode),
                    color_mode: r.color_mode.unwrap_or(d.color_mode),
                    hide_unconnected: r.hide_unconnected.unwrap_or(d.hide_unconnected),
                    hide_small_nodes: r.hide_small_nodes.unwrap_or(d.hide_small_nodes),
                    show_virtual: r.show_virtual.unwrap_or(d.show_virtual),
                    freeze_layout: false,
                }
            }
            None => defaults.display,
        };

        Ok(Self {
            thresholds,
            colors,
            layout,
            display,
            virtual_labels: raw.virtual_labels.unwrap_or_default(),
        })
    }
}

/// Starter `flowmap.toml` with every option at its default.
pub fn generate_config_template() -> String {
    r##"# flowmap configuration

[thresholds]
# Processes with no inflows and total outflows below this value (or no outflows and
# total inflows below it) are hidden when "hide small nodes" is enabled.
small_node_threshold = 0.0

[colors]
absolute_flow = "rgba(59, 162, 114, 1)"
relative_flow = "rgba(255, 50, 50, 1)"
virtual_node = "rgba(100, 100, 100, 0.8)"
virtual_flow = "rgba(100, 100, 100, 0.8)"
stock_border = "#333"

[layout]
zoom = 2.0
symbol_size = 40.0
repulsion = [500.0, 1000.0, 2000.0]
edge_length = 50.0

[display]
label_mode = "id"          # "id" or "name"
flow_label_mode = "value"  # "type" or "value"
color_mode = "stage"       # "stage" or "normal"
hide_unconnected = false
hide_small_nodes = false
show_virtual = true

# Labels shown for virtual processes in "name" label mode.
[virtual_labels]
# "Virtual:Balance" = "Unreported"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::parse(&generate_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse(
            r#"
            [thresholds]
            small_node_threshold = 5.0

            [display]
            label_mode = "name"

            [virtual_labels]
            "Virtual:Balance" = "Unreported"
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.small_node_threshold, 5.0);
        assert_eq!(config.display.label_mode, LabelMode::Name);
        assert_eq!(config.display.color_mode, ColorMode::Stage);
        assert_eq!(config.colors, Colors::default());
        assert_eq!(config.virtual_labels["Virtual:Balance"], "Unreported");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let fs = MockFs::new();
        let config = Config::load(Path::new("/data"), &fs).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let fs = MockFs::with_files([(Path::new("/data/flowmap.toml"), "[thresholds")]);
        let result = Config::load(Path::new("/data"), &fs);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
