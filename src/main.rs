use clap::Parser;
use linbench::cli::{execute, Cli, Mode};
use linbench::{init_logging, SweepConfig};
use tracing::error;

fn main() {
    init_logging();

    let cli = Cli::parse();
    let mode = Mode::from_args(&cli.args);

    if let Err(e) = execute(mode, SweepConfig::default()) {
        error!(error = %e, ?mode, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
