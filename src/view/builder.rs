use super::details::{FlowDetails, NodeDetails};
use super::format_value;
use super::types::{
    Category, GraphView, ItemStyle, LegendEntry, LineStyle, LinkLabel, NodeLabel, TRANSPARENT,
    ViewLink, ViewNode,
};
use crate::config::Config;
use crate::dataset::{Dataset, YearData};
use crate::filter::{ColorMode, DisplayFilterState, FlowLabelMode, LabelMode};
use crate::model::{Flow, Process, ProcessId, ScenarioMetadata, Year};
use crate::position::PositionStore;
use std::collections::{BTreeMap, HashMap};

const STOCK_BORDER_WIDTH: f64 = 3.0;

/// Derives views for the years of one dataset.
pub struct GraphViewBuilder<'a> {
    dataset: &'a Dataset,
    config: &'a Config,
}

impl<'a> GraphViewBuilder<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a Config) -> Self {
        Self { dataset, config }
    }

    /// Build the view of `year`, or `None` when the dataset has no such year.
    pub fn build(
        &self,
        year: Year,
        positions: &PositionStore,
        filters: &DisplayFilterState,
    ) -> Option<GraphView> {
        let Some(data) = self.dataset.year_data(year) else {
            tracing::debug!("No data for year {}", year);
            return None;
        };
        Some(build_view(
            data,
            self.dataset.scenario(),
            positions,
            filters,
            self.config,
        ))
    }
}

/// Derive the renderable graph of one year. Reads its inputs only.
pub fn build_view(
    data: &YearData,
    scenario: &ScenarioMetadata,
    positions: &PositionStore,
    filters: &DisplayFilterState,
    config: &Config,
) -> GraphView {
    let year = data.snapshot.year();
    let relations = &data.relations;
    let threshold = config.thresholds.small_node_threshold;

    let mut nodes = Vec::with_capacity(data.snapshot.process_count());
    for process in data.snapshot.processes() {
        let id = process.id.as_str();
        let num_inflows = relations.num_inflows(id);
        let num_outflows = relations.num_outflows(id);

        if filters.hide_unconnected && num_inflows == 0 && num_outflows == 0 {
            continue;
        }

        let total_inflows = relations.inflow_totals(id, &data.snapshot).total_value;
        let total_outflows = relations.outflow_totals(id, &data.snapshot).total_value;

        let small = filters.hide_small_nodes
            && is_small(
                num_inflows,
                total_inflows,
                num_outflows,
                total_outflows,
                threshold,
            );
        let virtual_hidden = process.is_virtual && !filters.show_virtual;
        let visible = !small && !virtual_hidden;

        let name = display_name(process, filters.label_mode, &config.virtual_labels);
        let item_style = if visible {
            node_style(process, filters.color_mode, config)
        } else {
            ItemStyle {
                color: Some(TRANSPARENT.to_string()),
                ..ItemStyle::default()
            }
        };
        let position = positions.get(year, id);
        let tooltip =
            NodeDetails::collect(process, &name, data, &scenario.baseline_value_name).to_html();

        nodes.push(ViewNode {
            id: process.id.clone(),
            category: process.id.to_string(),
            name,
            label: NodeLabel { show: visible },
            item_style,
            num_inflows,
            num_outflows,
            total_inflows,
            total_outflows,
            visible,
            is_virtual: process.is_virtual,
            is_stock: process.is_stock(),
            x: position.map(|p| p.x),
            y: position.map(|p| p.y),
            tooltip,
        });
    }

    nodes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let node_visibility: HashMap<&ProcessId, bool> =
        nodes.iter().map(|n| (&n.id, n.visible)).collect();

    let links = data
        .snapshot
        .flows()
        .iter()
        .filter_map(|flow| {
            let source_visible = *node_visibility.get(&flow.source)?;
            let target_visible = *node_visibility.get(&flow.target)?;
            let visible =
                source_visible && target_visible && (!flow.is_virtual || filters.show_virtual);
            Some(view_link(
                flow,
                visible,
                filters.flow_label_mode,
                config,
                scenario,
            ))
        })
        .collect();

    let categories = nodes
        .iter()
        .map(|n| Category {
            name: n.category.clone(),
            item_style: n.item_style.clone(),
        })
        .collect();

    let legend = nodes
        .iter()
        .filter(|n| n.visible)
        .map(|n| LegendEntry {
            name: n.category.clone(),
            item_style: n.item_style.clone(),
        })
        .collect();

    GraphView {
        year,
        nodes,
        links,
        categories,
        legend,
    }
}

/// Display name of a process under a label mode.
pub fn display_name(
    process: &Process,
    mode: LabelMode,
    virtual_labels: &BTreeMap<String, String>,
) -> String {
    match mode {
        LabelMode::Id => process.id.to_string(),
        LabelMode::Name => {
            if process.is_virtual {
                if let Some(label) = virtual_labels.get(process.id.as_str()) {
                    return label.clone();
                }
            }
            match &process.label {
                Some(label) => label.clone(),
                None => format!("Missing label ({})", process.id),
            }
        }
    }
}

/// A process with no inflows carrying little out, or little in with no outflows.
pub(crate) fn is_small(
    num_inflows: usize,
    total_inflows: f64,
    num_outflows: usize,
    total_outflows: f64,
    threshold: f64,
) -> bool {
    (num_inflows == 0 && total_outflows < threshold)
        || (total_inflows < threshold && num_outflows == 0)
}

fn node_style(process: &Process, mode: ColorMode, config: &Config) -> ItemStyle {
    let color = if process.is_virtual {
        Some(config.colors.virtual_node.clone())
    } else {
        match mode {
            ColorMode::Stage => process
                .colors
                .stage
                .clone()
                .or_else(|| process.colors.normal.clone()),
            ColorMode::Normal => process.colors.normal.clone(),
        }
    };

    if process.is_stock() {
        ItemStyle {
            color,
            border_color: Some(config.colors.stock_border.clone()),
            border_width: Some(STOCK_BORDER_WIDTH),
        }
    } else {
        ItemStyle {
            color,
            ..ItemStyle::default()
        }
    }
}

fn view_link(
    flow: &Flow,
    visible: bool,
    mode: FlowLabelMode,
    config: &Config,
    scenario: &ScenarioMetadata,
) -> ViewLink {
    let color = if !visible {
        TRANSPARENT.to_string()
    } else if flow.is_virtual {
        config.colors.virtual_flow.clone()
    } else if flow.is_unit_absolute_value {
        config.colors.absolute_flow.clone()
    } else {
        config.colors.relative_flow.clone()
    };

    let formatter = match mode {
        FlowLabelMode::Type if flow.is_unit_absolute_value => "ABS".to_string(),
        FlowLabelMode::Type => "%".to_string(),
        FlowLabelMode::Value => format_value(flow.magnitude()),
    };

    ViewLink {
        id: flow.id.clone(),
        name: flow.id.to_string(),
        source: flow.source.clone(),
        target: flow.target.clone(),
        value: flow.magnitude(),
        label: LinkLabel {
            show: visible,
            position: "middle",
            formatter,
        },
        line_style: LineStyle { color },
        visible,
        is_virtual: flow.is_virtual,
        is_absolute: flow.is_unit_absolute_value,
        tooltip: FlowDetails::collect(flow, &scenario.baseline_value_name).to_html(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    const PAYLOAD: &str = r#"{
        "2000": {
            "node_index_to_data": {
                "0": {"process_id": "Source", "process_label": "Forest"},
                "1": {"process_id": "Mill", "process_label": "Saw mill", "stock_lifetime": 10},
                "2": {"process_id": "Sink"},
                "3": {"process_id": "Island", "process_label": "Lonely"},
                "4": {"process_id": "Virtual:Balance", "is_virtual": true, "process_label": "Balance"}
            },
            "edge_index_to_data": {
                "0": {"flow_id": "Source Mill", "source_process_id": "Source", "target_process_id": "Mill", "value": 2},
                "1": {"flow_id": "Mill Sink", "source_process_id": "Mill", "target_process_id": "Sink", "value": 6,
                      "is_unit_absolute_value": false},
                "2": {"flow_id": "Mill Virtual:Balance", "source_process_id": "Mill",
                      "target_process_id": "Virtual:Balance", "value": 1, "is_virtual": true}
            }
        }
    }"#;

    fn dataset() -> Dataset {
        Dataset::from_json(PAYLOAD, ScenarioMetadata::default()).unwrap()
    }

    fn config_with_threshold(threshold: f64) -> Config {
        let mut config = Config::default();
        config.thresholds.small_node_threshold = threshold;
        config
    }

    fn build(dataset: &Dataset, config: &Config, filters: DisplayFilterState) -> GraphView {
        GraphViewBuilder::new(dataset, config)
            .build(Year(2000), &PositionStore::new(), &filters)
            .unwrap()
    }

    #[test]
    fn test_build_is_deterministic() {
        let dataset = dataset();
        let config = config_with_threshold(5.0);
        let filters = DisplayFilterState::default()
            .with_hide_small_nodes(true)
            .with_label_mode(LabelMode::Name);
        let mut positions = PositionStore::new();
        positions.set(Year(2000), ProcessId::from("Mill"), Position::new(1.0, 2.0));

        let builder = GraphViewBuilder::new(&dataset, &config);
        let first = builder.build(Year(2000), &positions, &filters).unwrap();
        let second = builder.build(Year(2000), &positions, &filters).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_year_is_none() {
        let dataset = dataset();
        let config = Config::default();
        let view = GraphViewBuilder::new(&dataset, &config).build(
            Year(1999),
            &PositionStore::new(),
            &DisplayFilterState::default(),
        );
        assert!(view.is_none());
    }

    #[test]
    fn test_small_node_rule() {
        assert!(is_small(0, 0.0, 3, 2.0, 5.0));
        assert!(!is_small(0, 0.0, 3, 6.0, 5.0));
        // no outflows: only the inflow total matters
        assert!(!is_small(2, 9.0, 0, 0.0, 5.0));
        assert!(is_small(2, 4.0, 0, 0.0, 5.0));
        // zero threshold hides nothing
        assert!(!is_small(0, 0.0, 1, 0.0, 0.0));
    }

    #[test]
    fn test_hide_small_nodes_is_visual_only() {
        let dataset = dataset();
        let config = config_with_threshold(5.0);
        let view = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_hide_small_nodes(true),
        );

        assert_eq!(view.nodes.len(), 5);
        let source = view.node("Source").unwrap();
        assert!(!source.visible);
        assert!(!source.label.show);
        assert_eq!(source.shown_label(), "");
        assert_eq!(source.item_style.color.as_deref(), Some(TRANSPARENT));

        // Sink receives 6 >= 5 and stays visible.
        assert!(view.node("Sink").unwrap().visible);

        // The flow out of the hidden process is hidden whatever its magnitude.
        let link = view.link("Source Mill").unwrap();
        assert!(!link.visible);
        assert_eq!(link.line_style.color, TRANSPARENT);
        assert_eq!(view.links.len(), 3);

        assert!(view.legend.iter().all(|l| l.name != "Source"));
        assert_eq!(view.categories.len(), 5);
    }

    #[test]
    fn test_hide_unconnected_excludes_only_isolated() {
        let dataset = dataset();
        let config = Config::default();

        let shown = build(&dataset, &config, DisplayFilterState::default());
        assert!(shown.node("Island").is_some());

        let view = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_hide_unconnected(true),
        );
        assert!(view.node("Island").is_none());
        assert_eq!(view.nodes.len(), 4);
        // outflows but no inflows is still connected
        assert!(view.node("Source").is_some());
        assert!(view.categories.iter().all(|c| c.name != "Island"));
    }

    #[test]
    fn test_show_virtual_toggle() {
        let dataset = dataset();
        let config = Config::default();

        let view = build(&dataset, &config, DisplayFilterState::default());
        let node = view.node("Virtual:Balance").unwrap();
        assert!(node.visible);
        assert_eq!(
            node.item_style.color.as_deref(),
            Some(config.colors.virtual_node.as_str())
        );
        let link = view.link("Mill Virtual:Balance").unwrap();
        assert_eq!(link.line_style.color, config.colors.virtual_flow);

        let hidden = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_show_virtual(false),
        );
        assert!(!hidden.node("Virtual:Balance").unwrap().visible);
        assert!(!hidden.link("Mill Virtual:Balance").unwrap().visible);
        assert!(hidden.node("Mill").unwrap().visible);
    }

    #[test]
    fn test_label_fallback() {
        let process = Process::new("P7");
        let labels = BTreeMap::new();
        assert_eq!(
            display_name(&process, LabelMode::Name, &labels),
            "Missing label (P7)"
        );
        assert_eq!(display_name(&process, LabelMode::Id, &labels), "P7");
    }

    #[test]
    fn test_virtual_label_override() {
        let mut process = Process::new("Virtual:Balance");
        process.is_virtual = true;
        process.label = Some("Balance".to_string());
        let mut labels = BTreeMap::new();
        labels.insert("Virtual:Balance".to_string(), "Unreported".to_string());

        assert_eq!(
            display_name(&process, LabelMode::Name, &labels),
            "Unreported"
        );
        assert_eq!(
            display_name(&process, LabelMode::Id, &labels),
            "Virtual:Balance"
        );
    }

    #[test]
    fn test_nodes_sorted_by_display_name() {
        let dataset = Dataset::from_json(
            r#"{"2000": {"node_index_to_data": {
                "0": {"process_id": "B"},
                "1": {"process_id": "A"},
                "2": {"process_id": "C"}
            }}}"#,
            ScenarioMetadata::default(),
        )
        .unwrap();
        let config = Config::default();
        let view = build(&dataset, &config, DisplayFilterState::default());

        let names: Vec<&str> = view.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        let legend: Vec<&str> = view.legend.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(legend, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_follows_label_mode() {
        let dataset = dataset();
        let config = Config::default();
        let view = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_label_mode(LabelMode::Name),
        );
        let names: Vec<&str> = view.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Balance", "Forest", "Lonely", "Missing label (Sink)", "Saw mill"]
        );
    }

    #[test]
    fn test_positions_seeded_from_store() {
        let dataset = dataset();
        let config = Config::default();
        let mut positions = PositionStore::new();
        positions.set(Year(2000), ProcessId::from("Mill"), Position::new(10.0, 20.0));

        let view = GraphViewBuilder::new(&dataset, &config)
            .build(Year(2000), &positions, &DisplayFilterState::default())
            .unwrap();
        let mill = view.node("Mill").unwrap();
        assert_eq!((mill.x, mill.y), (Some(10.0), Some(20.0)));
        let sink = view.node("Sink").unwrap();
        assert_eq!((sink.x, sink.y), (None, None));
    }

    #[test]
    fn test_stock_border_and_link_labels() {
        let dataset = dataset();
        let config = Config::default();

        let view = build(&dataset, &config, DisplayFilterState::default());
        let mill = view.node("Mill").unwrap();
        assert!(mill.is_stock);
        assert_eq!(mill.item_style.border_width, Some(STOCK_BORDER_WIDTH));
        assert_eq!(
            view.link("Mill Sink").unwrap().line_style.color,
            config.colors.relative_flow
        );
        assert_eq!(view.link("Mill Sink").unwrap().label.formatter, "6");

        let typed = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_flow_label_mode(FlowLabelMode::Type),
        );
        assert_eq!(typed.link("Mill Sink").unwrap().label.formatter, "%");
        assert_eq!(typed.link("Source Mill").unwrap().label.formatter, "ABS");
    }

    #[test]
    fn test_color_modes() {
        let mut scenario = ScenarioMetadata::default();
        scenario
            .transformation_stage_name_to_color
            .insert("Primary".to_string(), "#123456".to_string());
        let dataset = Dataset::from_json(
            r#"{"2000": {"node_index_to_data": {
                "0": {"process_id": "A", "transformation_stage": "Primary"},
                "1": {"process_id": "B"}
            }}}"#,
            scenario,
        )
        .unwrap();
        let config = Config::default();

        let staged = build(&dataset, &config, DisplayFilterState::default());
        assert_eq!(
            staged.node("A").unwrap().item_style.color.as_deref(),
            Some("#123456")
        );
        // no stage: falls back to the normal color
        let normal_b = dataset
            .snapshot(Year(2000))
            .unwrap()
            .process("B")
            .unwrap()
            .colors
            .normal
            .clone();
        assert_eq!(staged.node("B").unwrap().item_style.color, normal_b);

        let normal = build(
            &dataset,
            &config,
            DisplayFilterState::default().with_color_mode(ColorMode::Normal),
        );
        assert_ne!(
            normal.node("A").unwrap().item_style.color.as_deref(),
            Some("#123456")
        );
    }
}
