use super::controller::{Outcome, ViewSyncController};
use super::engine::RemoteChart;
use super::events::{EventError, adapt};
use super::option::ChartOption;
use serde_json::Value;

/// A controller paired with the remote engine it drives.
#[derive(Debug)]
pub struct Session {
    controller: ViewSyncController,
    chart: RemoteChart,
}

impl Session {
    /// Start a session and hand the initial option to the engine.
    pub fn new(controller: ViewSyncController) -> Self {
        let mut chart = RemoteChart::new();
        controller.render(&mut chart);
        Self { controller, chart }
    }

    pub fn controller(&self) -> &ViewSyncController {
        &self.controller
    }

    /// Option the engine should currently show.
    pub fn option(&self) -> ChartOption {
        match self.chart.option() {
            Some(option) => option.clone(),
            None => self.controller.option(),
        }
    }

    /// Adapt a raw engine payload and run it through the controller.
    pub fn apply(&mut self, payload: &Value) -> Result<Outcome, EventError> {
        let nodes = self
            .controller
            .current_view()
            .map(|v| v.nodes)
            .unwrap_or_default();
        let message = adapt(payload, &nodes)?;

        if !message.layout.is_empty() {
            self.chart.report_layout(message.layout);
        }
        if let Some(viewport) = message.viewport {
            self.chart.report_viewport(viewport);
        }
        Ok(self.controller.handle(message.event, &mut self.chart))
    }

    /// Stored positions of the current year as tab-separated lines.
    pub fn positions_tsv(&self) -> String {
        match self.controller.current_year() {
            Some(year) => self.controller.positions().export_tsv(year),
            None => String::new(),
        }
    }
}
