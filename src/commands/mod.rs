mod init;
mod inspect;
mod render;
mod serve;

pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use render::cmd_render;
pub use serve::cmd_serve;

use crate::api::{load_config, load_dataset, load_scenario};
use crate::cli::DataArgs;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::fs::FileSystem;
use crate::style;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub dataset: Dataset,
    pub config: Config,
}

impl CommandContext {
    /// Load the data, scenario metadata and configuration named by the arguments.
    /// Returns Err(exit_code) if the data cannot be loaded.
    pub fn new(args: &DataArgs, fs: &dyn FileSystem) -> Result<Self, i32> {
        let config = load_config(&args.data, args.config.as_deref(), fs).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        let scenario = match load_scenario(&args.data, args.scenario.as_deref(), fs) {
            Ok(scenario) => scenario,
            Err(e) => {
                style::error(&e.to_string());
                return Err(1);
            }
        };

        let dataset = match load_dataset(&args.data, scenario, fs) {
            Ok(dataset) => dataset,
            Err(e) => {
                style::error(&e.to_string());
                style::hint("Expected a JSON object of year -> {node_index_to_data, edge_index_to_data}");
                return Err(1);
            }
        };

        let skipped = dataset.issues().len();
        if skipped > 0 {
            style::warning(&format!(
                "{} flow(s) reference missing processes and were skipped",
                skipped
            ));
        }

        Ok(Self { dataset, config })
    }
}
