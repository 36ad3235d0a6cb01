use super::engine::{ChartEngine, Viewport};
use super::events::ViewEvent;
use super::option::{ChartOption, LayoutMode, OptionSettings, SeriesKind};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::filter::DisplayFilterState;
use crate::model::{ProcessId, Year};
use crate::position::PositionStore;
use crate::view::{GraphView, GraphViewBuilder, NodeDetails, display_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Viewing,
    Dragging { node: ProcessId },
}

/// Whether handling an event produced a new option for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    Unchanged,
}

/// Application state of one interactive session, driven one event at a time.
#[derive(Debug)]
pub struct ViewSyncController {
    dataset: Dataset,
    config: Config,
    positions: PositionStore,
    filters: DisplayFilterState,
    current: usize,
    interaction: InteractionState,
    kind: SeriesKind,
    viewport: Option<Viewport>,
}

impl ViewSyncController {
    pub fn new(dataset: Dataset, config: Config) -> Self {
        let filters = config.display;
        Self {
            dataset,
            config,
            positions: PositionStore::new(),
            filters,
            current: 0,
            interaction: InteractionState::Viewing,
            kind: SeriesKind::Graph,
            viewport: None,
        }
    }

    pub fn with_series_kind(self, kind: SeriesKind) -> Self {
        Self { kind, ..self }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn filters(&self) -> &DisplayFilterState {
        &self.filters
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut PositionStore {
        &mut self.positions
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_year(&self) -> Option<Year> {
        self.dataset.year_at(self.current)
    }

    pub fn current_view(&self) -> Option<GraphView> {
        self.view_of(self.current_year()?)
    }

    fn view_of(&self, year: Year) -> Option<GraphView> {
        GraphViewBuilder::new(&self.dataset, &self.config).build(
            year,
            &self.positions,
            &self.filters,
        )
    }

    /// The complete option for the current state.
    pub fn option(&self) -> ChartOption {
        let views = self
            .dataset
            .years()
            .into_iter()
            .filter_map(|year| self.view_of(year))
            .collect();
        let layout = if self.filters.freeze_layout {
            LayoutMode::None
        } else {
            LayoutMode::Force
        };
        ChartOption::build(
            self.dataset.scenario(),
            views,
            self.current,
            &OptionSettings {
                kind: self.kind,
                layout,
                viewport: self.viewport,
            },
            &self.config,
        )
    }

    /// Push the current option to the engine.
    pub fn render(&self, engine: &mut impl ChartEngine) {
        engine.apply_option(&self.option());
    }

    /// Hover details of a node in the current year.
    pub fn node_details(&self, process_id: &str) -> Option<NodeDetails> {
        let year = self.current_year()?;
        let data = self.dataset.year_data(year)?;
        let Some(process) = data.snapshot.process(process_id) else {
            tracing::debug!("No process '{}' in {}", process_id, year);
            return None;
        };
        let name = display_name(process, self.filters.label_mode, &self.config.virtual_labels);
        Some(NodeDetails::collect(
            process,
            &name,
            data,
            &self.dataset.scenario().baseline_value_name,
        ))
    }

    /// Handle one event to completion, including the handoff to the engine.
    pub fn handle(&mut self, event: ViewEvent, engine: &mut impl ChartEngine) -> Outcome {
        match event {
            ViewEvent::YearChanged { index } => return self.change_year(index, engine),
            ViewEvent::NodeDragStart { node } => {
                tracing::debug!("Dragging '{}'", node);
                self.interaction = InteractionState::Dragging { node };
                return Outcome::Unchanged;
            }
            ViewEvent::NodeDragMove => {
                self.track_drag(&*engine);
                return Outcome::Unchanged;
            }
            ViewEvent::NodeDragEnd => {
                self.track_drag(&*engine);
                self.interaction = InteractionState::Viewing;
                return Outcome::Unchanged;
            }
            ViewEvent::NodeHover { node } => {
                if self.node_details(node.as_str()).is_none() {
                    tracing::debug!("Hover over unknown node '{}'", node);
                }
                return Outcome::Unchanged;
            }
            ViewEvent::LabelModeChanged(mode) => {
                self.filters = self.filters.with_label_mode(mode);
            }
            ViewEvent::FlowLabelModeChanged(mode) => {
                self.filters = self.filters.with_flow_label_mode(mode);
            }
            ViewEvent::ColorModeChanged(mode) => {
                self.filters = self.filters.with_color_mode(mode);
            }
            ViewEvent::HideUnconnectedChanged(hide) => {
                self.filters = self.filters.with_hide_unconnected(hide);
            }
            ViewEvent::HideSmallNodesChanged(hide) => {
                self.filters = self.filters.with_hide_small_nodes(hide);
            }
            ViewEvent::ShowVirtualChanged(show) => {
                self.filters = self.filters.with_show_virtual(show);
            }
            ViewEvent::FreezeToggled => {
                let committed = self.commit_live_positions(&*engine);
                self.viewport = engine.viewport().or(self.viewport);
                self.filters = self
                    .filters
                    .with_freeze_layout(!self.filters.freeze_layout);
                tracing::debug!(
                    "Layout {} with {} committed positions",
                    if self.filters.freeze_layout { "frozen" } else { "unfrozen" },
                    committed
                );
            }
            ViewEvent::ResetView => {
                self.filters = self.filters.with_freeze_layout(false);
                self.viewport = None;
                self.interaction = InteractionState::Viewing;
            }
        }

        self.render(engine);
        Outcome::Rendered
    }

    fn change_year(&mut self, index: usize, engine: &mut impl ChartEngine) -> Outcome {
        let Some(target) = self.dataset.year_at(index) else {
            tracing::warn!("Ignoring change to year index {}", index);
            return Outcome::Unchanged;
        };
        let Some(from) = self.current_year() else {
            return Outcome::Unchanged;
        };
        if target == from {
            return Outcome::Unchanged;
        }

        self.commit_live_positions(&*engine);

        let seeded = match self.dataset.snapshot(target) {
            Some(snapshot) => {
                let ids: Vec<&ProcessId> = snapshot.processes().map(|p| &p.id).collect();
                self.positions.copy_forward(from, target, ids)
            }
            None => 0,
        };
        tracing::debug!(
            "Year {} -> {}: seeded {} positions",
            from,
            target,
            seeded
        );

        self.current = index;
        self.interaction = InteractionState::Viewing;
        self.render(engine);
        Outcome::Rendered
    }

    /// Store the engine's rendered position of every visible node for the current year.
    fn commit_live_positions(&mut self, engine: &impl ChartEngine) -> usize {
        let (Some(year), Some(view)) = (self.current_year(), self.current_view()) else {
            return 0;
        };

        let mut committed = 0;
        for id in view.visible_node_ids() {
            match engine.live_position(id.as_str()) {
                Some(position) => {
                    self.positions.set(year, id, position);
                    committed += 1;
                }
                None => tracing::debug!("No live position for '{}' in {}", id, year),
            }
        }
        committed
    }

    fn track_drag(&mut self, engine: &impl ChartEngine) {
        let InteractionState::Dragging { node } = &self.interaction else {
            return;
        };
        let Some(year) = self.current_year() else {
            return;
        };
        match engine.live_position(node.as_str()) {
            Some(position) => self.positions.set(year, node.clone(), position),
            None => tracing::debug!("No live position for dragged '{}'", node),
        }
    }
}
