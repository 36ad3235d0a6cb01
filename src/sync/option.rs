//! Declarative chart option handed to the rendering engine.
//!
//! The option follows the engine's timeline format: a `baseOption` with the shared components
//! and one entry in `options` per year carrying that year's nodes, links, categories, legend and
//! subtitle. The engine merges the year entry into the base when the timeline moves.

use super::engine::Viewport;
use crate::config::Config;
use crate::model::{ScenarioMetadata, Year};
use crate::view::{Category, GraphView, LegendEntry, ViewLink, ViewNode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Force-directed graph
    #[default]
    Graph,
    Sankey,
}

/// Node placement mode of a graph series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Force,
    /// Static positions, no simulation.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub base_option: BaseOption,
    pub options: Vec<YearOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseOption {
    pub title: Title,
    pub tooltip: Tooltip,
    pub legend: Vec<Legend>,
    pub timeline: Timeline,
    pub series: Vec<SeriesTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub subtext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<LegendEntry>,
    pub orient: &'static str,
    pub right: u32,
    pub top: u32,
    pub height: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub axis_type: &'static str,
    pub current_index: usize,
    pub data: Vec<Year>,
    pub left: &'static str,
    pub right: &'static str,
}

/// Series settings shared by every year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesTemplate {
    Graph(GraphSeries),
    Sankey(SankeySeries),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub layout: LayoutMode,
    pub zoom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    pub draggable: bool,
    pub roam: bool,
    pub symbol_size: f64,
    pub edge_symbol: [&'static str; 2],
    pub edge_symbol_size: [f64; 2],
    pub force: Force,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Force {
    pub repulsion: Vec<f64>,
    pub edge_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeySeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub node_align: &'static str,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOption {
    pub title: YearTitle,
    pub legend: Vec<YearLegend>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTitle {
    pub subtext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearLegend {
    pub data: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub data: Vec<ViewNode>,
    pub links: Vec<ViewLink>,
    pub categories: Vec<Category>,
}

/// Everything about the option that is not derived from the views.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OptionSettings {
    pub kind: SeriesKind,
    pub layout: LayoutMode,
    pub viewport: Option<Viewport>,
}

impl ChartOption {
    /// Assemble the option from one view per year, in timeline order.
    pub fn build(
        scenario: &ScenarioMetadata,
        views: Vec<GraphView>,
        current_index: usize,
        settings: &OptionSettings,
        config: &Config,
    ) -> Self {
        let current_index = current_index.min(views.len().saturating_sub(1));
        let years: Vec<Year> = views.iter().map(|v| v.year).collect();
        let subtext = years
            .get(current_index)
            .map(|&y| year_subtext(y))
            .unwrap_or_default();
        let legend = views
            .get(current_index)
            .map(|v| v.legend.clone())
            .unwrap_or_default();

        let series_name = "Process flows".to_string();
        let template = match settings.kind {
            SeriesKind::Graph => SeriesTemplate::Graph(GraphSeries {
                name: series_name,
                kind: "graph",
                layout: settings.layout,
                zoom: settings
                    .viewport
                    .map(|v| v.zoom)
                    .unwrap_or(config.layout.zoom),
                center: settings.viewport.map(|v| v.center),
                draggable: true,
                roam: true,
                symbol_size: config.layout.symbol_size,
                edge_symbol: ["circle", "arrow"],
                edge_symbol_size: [0.0, 15.0],
                force: Force {
                    repulsion: config.layout.repulsion.clone(),
                    edge_length: config.layout.edge_length,
                },
            }),
            SeriesKind::Sankey => SeriesTemplate::Sankey(SankeySeries {
                name: series_name,
                kind: "sankey",
                node_align: "justify",
                draggable: true,
            }),
        };

        let options = views
            .into_iter()
            .map(|view| YearOption {
                title: YearTitle {
                    subtext: year_subtext(view.year),
                },
                legend: vec![YearLegend { data: view.legend }],
                series: vec![SeriesData {
                    data: view.nodes,
                    links: view.links,
                    categories: view.categories,
                }],
            })
            .collect();

        Self {
            base_option: BaseOption {
                title: Title {
                    text: scenario.scenario_name.clone(),
                    subtext,
                },
                tooltip: Tooltip { show: true },
                legend: vec![Legend {
                    kind: "scroll",
                    data: legend,
                    orient: "vertical",
                    right: 10,
                    top: 50,
                    height: "88%",
                }],
                timeline: Timeline {
                    show: true,
                    kind: "slider",
                    axis_type: "category",
                    current_index,
                    data: years,
                    left: "20px",
                    right: "20px",
                },
                series: vec![template],
            },
            options,
        }
    }

    pub fn current_index(&self) -> usize {
        self.base_option.timeline.current_index
    }

    /// Series data of the year the timeline points at.
    pub fn current_series(&self) -> Option<&SeriesData> {
        self.options
            .get(self.current_index())?
            .series
            .first()
    }

    /// Layout mode of the graph series; `None` for Sankey options.
    pub fn layout(&self) -> Option<LayoutMode> {
        match self.base_option.series.first()? {
            SeriesTemplate::Graph(series) => Some(series.layout),
            SeriesTemplate::Sankey(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn year_subtext(year: Year) -> String {
    format!("Year {}", year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::filter::DisplayFilterState;
    use crate::position::PositionStore;
    use crate::view::GraphViewBuilder;

    fn views(dataset: &Dataset, config: &Config) -> Vec<GraphView> {
        let builder = GraphViewBuilder::new(dataset, config);
        let positions = PositionStore::new();
        let filters = DisplayFilterState::default();
        dataset
            .years()
            .into_iter()
            .filter_map(|year| builder.build(year, &positions, &filters))
            .collect()
    }

    fn dataset() -> Dataset {
        let mut scenario = ScenarioMetadata::default();
        scenario.scenario_name = "Wood".to_string();
        Dataset::from_json(
            r#"{
                "2000": {"node_index_to_data": {"0": {"process_id": "A"}}},
                "2001": {"node_index_to_data": {"0": {"process_id": "A"}, "1": {"process_id": "B"}}}
            }"#,
            scenario,
        )
        .unwrap()
    }

    #[test]
    fn test_timeline_option_shape() {
        let dataset = dataset();
        let config = Config::default();
        let option = ChartOption::build(
            dataset.scenario(),
            views(&dataset, &config),
            1,
            &OptionSettings::default(),
            &config,
        );

        assert_eq!(option.options.len(), 2);
        assert_eq!(option.current_index(), 1);
        assert_eq!(option.base_option.title.text, "Wood");
        assert_eq!(option.base_option.title.subtext, "Year 2001");
        assert_eq!(option.base_option.legend[0].data.len(), 2);
        assert_eq!(option.current_series().unwrap().data.len(), 2);
        assert_eq!(option.layout(), Some(LayoutMode::Force));

        let json: serde_json::Value = serde_json::from_str(&option.to_json().unwrap()).unwrap();
        assert_eq!(json["baseOption"]["series"][0]["type"], "graph");
        assert_eq!(json["baseOption"]["series"][0]["layout"], "force");
        assert_eq!(json["baseOption"]["timeline"]["data"][0], 2000);
        assert_eq!(json["baseOption"]["timeline"]["currentIndex"], 1);
        assert!(json["baseOption"]["series"][0].get("center").is_none());
        assert_eq!(json["options"][1]["series"][0]["data"][1]["id"], "B");
    }

    #[test]
    fn test_each_year_carries_its_legend_and_subtitle() {
        let dataset = dataset();
        let config = Config::default();
        let option = ChartOption::build(
            dataset.scenario(),
            views(&dataset, &config),
            0,
            &OptionSettings::default(),
            &config,
        );

        assert_eq!(option.base_option.title.subtext, "Year 2000");
        assert_eq!(option.base_option.legend[0].data.len(), 1);
        assert_eq!(option.options[0].title.subtext, "Year 2000");
        assert_eq!(option.options[0].legend[0].data.len(), 1);
        assert_eq!(option.options[1].title.subtext, "Year 2001");
        assert_eq!(option.options[1].legend[0].data.len(), 2);

        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["options"][1]["title"]["subtext"], "Year 2001");
        assert_eq!(json["options"][1]["legend"][0]["data"][1]["name"], "B");
    }

    #[test]
    fn test_frozen_viewport_and_sankey() {
        let dataset = dataset();
        let config = Config::default();
        let frozen = ChartOption::build(
            dataset.scenario(),
            views(&dataset, &config),
            0,
            &OptionSettings {
                kind: SeriesKind::Graph,
                layout: LayoutMode::None,
                viewport: Some(Viewport {
                    zoom: 1.5,
                    center: [10.0, -4.0],
                }),
            },
            &config,
        );
        let json = serde_json::to_value(&frozen).unwrap();
        assert_eq!(json["baseOption"]["series"][0]["layout"], "none");
        assert_eq!(json["baseOption"]["series"][0]["zoom"], 1.5);
        assert_eq!(json["baseOption"]["series"][0]["center"][0], 10.0);

        let sankey = ChartOption::build(
            dataset.scenario(),
            views(&dataset, &config),
            0,
            &OptionSettings {
                kind: SeriesKind::Sankey,
                ..OptionSettings::default()
            },
            &config,
        );
        assert_eq!(sankey.layout(), None);
        let json = serde_json::to_value(&sankey).unwrap();
        assert_eq!(json["baseOption"]["series"][0]["type"], "sankey");
    }

    #[test]
    fn test_out_of_range_index_is_clamped() {
        let dataset = dataset();
        let config = Config::default();
        let option = ChartOption::build(
            dataset.scenario(),
            views(&dataset, &config),
            7,
            &OptionSettings::default(),
            &config,
        );
        assert_eq!(option.current_index(), 1);
    }
}
