pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod fs;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod palette;
pub mod position;
pub mod relation;
pub mod style;
pub mod sync;
pub mod view;

pub use api::{FlowmapError, LoadOptions, Loaded, inspect, load, render_html};
pub use cli::Cli;
pub use commands::{cmd_init, cmd_inspect, cmd_render, cmd_serve};
pub use config::Config;
pub use dataset::Dataset;
pub use filter::DisplayFilterState;
pub use position::{Position, PositionStore};
pub use relation::RelationIndex;
pub use sync::{ViewEvent, ViewSyncController};
pub use view::{GraphView, GraphViewBuilder, build_view};
