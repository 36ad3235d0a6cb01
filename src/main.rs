use clap::Parser;
use flowmap::cli::{Cli, Command};
use flowmap::{cmd_init, cmd_inspect, cmd_render, cmd_serve};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "flowmap=debug" } else { "flowmap=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
