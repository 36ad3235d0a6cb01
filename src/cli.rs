use crate::sync::SeriesKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flowmap")]
#[command(about = "Interactive multi-year flow network visualization")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export a self-contained HTML page with every year on a timeline
    Render(RenderArgs),

    /// Serve an interactive page that keeps node positions across years
    Serve(ServeArgs),

    /// Summarize the processes and flows of one year
    Inspect(InspectArgs),

    /// Generate a starter flowmap.toml configuration file
    Init(InitArgs),
}

/// Inputs shared by every command that loads pipeline output.
#[derive(Parser, Debug, Clone)]
pub struct DataArgs {
    /// Year-indexed process/flow JSON produced by the pipeline
    pub data: PathBuf,

    /// Scenario metadata JSON (defaults to scenario.json next to the data, if present)
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Configuration file (defaults to flowmap.toml next to the data, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: DataArgs,

    /// Output file
    #[arg(short, long, default_value = "flowmap.html")]
    pub output: PathBuf,

    /// Series type to render
    #[arg(long, value_enum, default_value = "graph")]
    pub series: SeriesKind,

    /// Open the exported page in the browser
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub input: DataArgs,

    /// Port for the web server
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Series type to render
    #[arg(long, value_enum, default_value = "graph")]
    pub series: SeriesKind,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: DataArgs,

    /// Year to summarize (defaults to the first year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory to create flowmap.toml in (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}
