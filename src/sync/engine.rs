//! Boundary to the external chart engine that renders options and runs the force layout.

use super::option::ChartOption;
use crate::model::ProcessId;
use crate::position::Position;
use std::collections::HashMap;

/// Zoom and center of the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub center: [f64; 2],
}

/// What the controller needs from a rendering engine.
pub trait ChartEngine {
    /// Position a node is currently drawn at, or `None` when the engine has not laid it out.
    fn live_position(&self, process_id: &str) -> Option<Position>;

    /// Current zoom and center, when the engine reports them.
    fn viewport(&self) -> Option<Viewport>;

    /// Hand a complete option to the engine.
    fn apply_option(&mut self, option: &ChartOption);
}

/// An engine running elsewhere (a browser) that reports its layout back with each event.
///
/// Keeps the last reported layout and viewport, and the last option handed over. A reported
/// layout belongs to the year it was drawn for and is dropped once an option for another year is
/// applied.
#[derive(Debug, Default)]
pub struct RemoteChart {
    layout: HashMap<ProcessId, Position>,
    viewport: Option<Viewport>,
    option: Option<ChartOption>,
    applied: usize,
}

impl RemoteChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known layout with a fresh report from the engine.
    pub fn report_layout<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (ProcessId, Position)>,
    {
        self.layout = positions.into_iter().filter(|(_, p)| p.is_finite()).collect();
    }

    pub fn report_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Option most recently applied.
    pub fn option(&self) -> Option<&ChartOption> {
        self.option.as_ref()
    }

    /// Number of options applied so far.
    pub fn applied_count(&self) -> usize {
        self.applied
    }
}

impl ChartEngine for RemoteChart {
    fn live_position(&self, process_id: &str) -> Option<Position> {
        self.layout.get(process_id).copied()
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn apply_option(&mut self, option: &ChartOption) {
        let shown = self.option.as_ref().map(ChartOption::current_index);
        if shown != Some(option.current_index()) {
            self.layout.clear();
        }
        self.option = Some(option.clone());
        self.applied += 1;
    }
}
