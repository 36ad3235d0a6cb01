mod flow;
mod ids;
mod process;
mod scenario;

pub use flow::Flow;
pub use ids::{FlowId, ProcessId, Year};
pub use process::{Process, ProcessColors, StockInfo};
pub use scenario::{DEFAULT_BASELINE_VALUE_NAME, DEFAULT_SCENARIO_NAME, ScenarioMetadata};
