//! Event-driven synchronization between the state model and a chart engine.

mod controller;
mod engine;
mod events;
mod option;
mod session;

pub use controller::{InteractionState, Outcome, ViewSyncController};
pub use engine::{ChartEngine, RemoteChart, Viewport};
pub use events::{EngineMessage, EventError, ViewEvent, adapt};
pub use option::{
    BaseOption, ChartOption, Force, GraphSeries, LayoutMode, Legend, OptionSettings,
    SankeySeries, SeriesData, SeriesKind, SeriesTemplate, Timeline, Title, Tooltip, YearLegend,
    YearOption, YearTitle,
};
pub use session::Session;
