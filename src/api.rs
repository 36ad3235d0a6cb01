//! Library API for flowmap.
//!
//! Unlike the CLI commands, which print output and return exit codes, these functions return
//! `Result`s for the calling code to handle.
//!
//! # Example
//!
//! ```no_run
//! use flowmap::{LoadOptions, load, render_html};
//! use flowmap::sync::SeriesKind;
//! use std::path::Path;
//!
//! let loaded = load(Path::new("data/flows.json"), &LoadOptions::default())?;
//! let html = render_html(&loaded.dataset, &loaded.config, SeriesKind::Graph)?;
//! println!("{} bytes", html.len());
//! # Ok::<(), flowmap::FlowmapError>(())
//! ```

use crate::config::{Config, ConfigError};
use crate::dataset::Dataset;
use crate::filter::DisplayFilterState;
use crate::fs::{FileSystem, default_fs, read_optional};
use crate::graph::generate_static_html;
use crate::model::{ScenarioMetadata, Year};
use crate::normalize::NormalizeError;
use crate::position::PositionStore;
use crate::sync::{SeriesKind, ViewSyncController};
use crate::view::{GraphViewBuilder, format_value, is_small};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the scenario metadata file looked up next to the data file.
pub const SCENARIO_FILE_NAME: &str = "scenario.json";

/// Errors that can occur during flowmap operations.
#[derive(Debug, Error)]
pub enum FlowmapError {
    /// A required input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The year data is unusable.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The option could not be serialized.
    #[error("Failed to serialize chart option: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Year {0} is not in the data")]
    YearNotFound(Year),
}

/// Where to find the companion files of a data file.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Scenario metadata file. Defaults to `scenario.json` beside the data, when present.
    pub scenario: Option<PathBuf>,

    /// Configuration file. Defaults to `flowmap.toml` beside the data, when present.
    pub config: Option<PathBuf>,
}

/// A dataset together with the configuration used to render it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub config: Config,
}

/// Load year data, scenario metadata and configuration.
pub fn load(data: &Path, options: &LoadOptions) -> Result<Loaded, FlowmapError> {
    load_with_fs(data, options, default_fs())
}

pub fn load_with_fs(
    data: &Path,
    options: &LoadOptions,
    fs: &dyn FileSystem,
) -> Result<Loaded, FlowmapError> {
    let config = load_config(data, options.config.as_deref(), fs)?;
    let scenario = load_scenario(data, options.scenario.as_deref(), fs)?;
    let dataset = load_dataset(data, scenario, fs)?;
    Ok(Loaded { dataset, config })
}

/// Read and normalize the year data file.
pub fn load_dataset(
    data: &Path,
    scenario: ScenarioMetadata,
    fs: &dyn FileSystem,
) -> Result<Dataset, FlowmapError> {
    let json = fs.read_to_string(data).map_err(|source| FlowmapError::Read {
        path: data.to_path_buf(),
        source,
    })?;
    Ok(Dataset::from_json(&json, scenario)?)
}

/// Configuration from an explicit file, or `flowmap.toml` beside the data, or defaults.
pub fn load_config(
    data: &Path,
    explicit: Option<&Path>,
    fs: &dyn FileSystem,
) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => Config::load_file(path, fs),
        None => Config::load(&data_dir(data), fs),
    }
}

/// Scenario metadata, falling back to defaults when the file is absent or malformed.
///
/// An explicitly named file that cannot be read is an error.
pub fn load_scenario(
    data: &Path,
    explicit: Option<&Path>,
    fs: &dyn FileSystem,
) -> Result<ScenarioMetadata, FlowmapError> {
    let content = match explicit {
        Some(path) => Some(
            fs.read_to_string(path)
                .map_err(|source| FlowmapError::Read {
                    path: path.to_path_buf(),
                    source,
                })?,
        ),
        None => {
            let path = data_dir(data).join(SCENARIO_FILE_NAME);
            read_optional(fs, &path).map_err(|source| FlowmapError::Read { path, source })?
        }
    };

    let Some(content) = content else {
        tracing::debug!("No scenario metadata, using defaults");
        return Ok(ScenarioMetadata::default());
    };

    match ScenarioMetadata::from_json(&content) {
        Ok(meta) => Ok(meta),
        Err(e) => {
            tracing::warn!("Invalid scenario metadata ({}), using defaults", e);
            Ok(ScenarioMetadata::default())
        }
    }
}

/// Self-contained HTML page with every year on the chart's timeline.
pub fn render_html(
    dataset: &Dataset,
    config: &Config,
    kind: SeriesKind,
) -> Result<String, FlowmapError> {
    let controller = ViewSyncController::new(dataset.clone(), config.clone()).with_series_kind(kind);
    Ok(generate_static_html(&controller.option())?)
}

/// Markdown summary of one year: process table, hidden small nodes and dropped flows.
///
/// Defaults to the first year.
pub fn inspect(
    dataset: &Dataset,
    config: &Config,
    year: Option<Year>,
) -> Result<String, FlowmapError> {
    let year = match year.or_else(|| dataset.first_year()) {
        Some(year) => year,
        None => return Err(FlowmapError::Normalize(NormalizeError::Empty)),
    };

    let filters: DisplayFilterState = config
        .display
        .with_hide_small_nodes(true)
        .with_hide_unconnected(false);
    let view = GraphViewBuilder::new(dataset, config)
        .build(year, &PositionStore::new(), &filters)
        .ok_or(FlowmapError::YearNotFound(year))?;

    let virtual_count = view.nodes.iter().filter(|n| n.is_virtual).count();
    let stock_count = view.nodes.iter().filter(|n| n.is_stock).count();
    let unconnected = view
        .nodes
        .iter()
        .filter(|n| n.num_inflows == 0 && n.num_outflows == 0)
        .count();
    let threshold = config.thresholds.small_node_threshold;
    let hidden = view
        .nodes
        .iter()
        .filter(|n| {
            is_small(
                n.num_inflows,
                n.total_inflows,
                n.num_outflows,
                n.total_outflows,
                threshold,
            )
        })
        .count();
    let issues: Vec<_> = dataset
        .issues()
        .iter()
        .filter(|i| i.year() == year)
        .collect();

    let mut md = String::new();
    let _ = writeln!(md, "# {}: Year {}\n", dataset.scenario().scenario_name, year);
    let _ = writeln!(md, "## Summary\n");
    let _ = writeln!(
        md,
        "- **Processes:** {} ({} virtual, {} stock)",
        view.nodes.len(),
        virtual_count,
        stock_count
    );
    let _ = writeln!(md, "- **Flows:** {}", view.links.len());
    let _ = writeln!(md, "- **Unconnected processes:** {}", unconnected);
    let _ = writeln!(
        md,
        "- **Hidden small nodes:** {} (threshold {})",
        hidden,
        format_value(threshold)
    );
    let _ = writeln!(md, "- **Data integrity issues:** {}\n", issues.len());

    let _ = writeln!(md, "## Processes\n");
    let _ = writeln!(md, "| Process | Name | In | Out | Total in | Total out | Shown |");
    let _ = writeln!(md, "|---|---|---|---|---|---|---|");
    for node in &view.nodes {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} | {} |",
            node.id,
            node.name,
            node.num_inflows,
            node.num_outflows,
            format_value(node.total_inflows),
            format_value(node.total_outflows),
            if node.visible { "yes" } else { "no" }
        );
    }

    if !issues.is_empty() {
        let _ = writeln!(md, "\n## Data integrity issues\n");
        for issue in issues {
            let _ = writeln!(md, "- {}", issue);
        }
    }

    Ok(md)
}

fn data_dir(data: &Path) -> PathBuf {
    match data.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
