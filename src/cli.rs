//! Command-line mode selection and dispatch.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::compute::BackendKind;
use crate::config::SweepConfig;
use crate::error::Result;
use crate::plot::plot_times;
use crate::runner::BenchmarkRunner;

/// `linbench [MODE]`: `1`, `2` or `3` benchmark a backend, anything else plots.
#[derive(Debug, Parser)]
#[command(name = "linbench", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Benchmark(BackendKind),
    Plot,
}

impl Mode {
    /// Only a single argument of `1`, `2` or `3` selects a benchmark.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        match args {
            [arg] => match arg.as_ref() {
                "1" => Mode::Benchmark(BackendKind::Ndarray),
                "2" => Mode::Benchmark(BackendKind::Cpu),
                "3" => Mode::Benchmark(BackendKind::Rayon),
                _ => Mode::Plot,
            },
            _ => Mode::Plot,
        }
    }
}

/// Output of a completed mode.
#[derive(Debug)]
pub enum Outcome {
    Saved(PathBuf),
    Plotted(Vec<PathBuf>),
}

pub fn execute(mode: Mode, config: SweepConfig) -> Result<Outcome> {
    match mode {
        Mode::Benchmark(kind) => {
            let runner = BenchmarkRunner::new(config)?;
            let path = runner.run_and_save(kind)?;
            Ok(Outcome::Saved(path))
        }
        Mode::Plot => {
            info!(dir = %config.output_dir.display(), "Plotting results");
            let figures = plot_times(&config.output_dir, &BackendKind::names())?;
            Ok(Outcome::Plotted(figures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use tempfile::tempdir;

    #[test]
    fn digits_select_backends() {
        assert_eq!(Mode::from_args(&["1"]), Mode::Benchmark(BackendKind::Ndarray));
        assert_eq!(Mode::from_args(&["2"]), Mode::Benchmark(BackendKind::Cpu));
        assert_eq!(Mode::from_args(&["3"]), Mode::Benchmark(BackendKind::Rayon));
    }

    #[test]
    fn everything_else_plots() {
        let none: [&str; 0] = [];
        assert_eq!(Mode::from_args(&none), Mode::Plot);
        assert_eq!(Mode::from_args(&["4"]), Mode::Plot);
        assert_eq!(Mode::from_args(&["plot"]), Mode::Plot);
        assert_eq!(Mode::from_args(&["1", "2"]), Mode::Plot);
    }

    #[test]
    fn clap_accepts_any_arguments() {
        let cli = Cli::try_parse_from(["linbench", "2"]).expect("single mode");
        assert_eq!(Mode::from_args(&cli.args), Mode::Benchmark(BackendKind::Cpu));

        let cli = Cli::try_parse_from(["linbench"]).expect("no arguments");
        assert_eq!(Mode::from_args(&cli.args), Mode::Plot);

        let cli = Cli::try_parse_from(["linbench", "3", "-x"]).expect("extra arguments");
        assert_eq!(cli.args.len(), 2);
        assert_eq!(Mode::from_args(&cli.args), Mode::Plot);
    }

    #[test]
    fn benchmark_then_plot() -> Result<()> {
        let dir = tempdir()?;
        let config = SweepConfig {
            min_size: 4,
            max_size: 9,
            step: 4,
            repeats: 2,
            output_dir: dir.path().to_path_buf(),
            ..SweepConfig::default()
        };

        // Plotting before every backend has results fails
        let early = execute(Mode::Plot, config.clone());
        assert!(matches!(early, Err(BenchError::MissingResults { .. })));

        for kind in BackendKind::ALL {
            match execute(Mode::Benchmark(kind), config.clone())? {
                Outcome::Saved(path) => assert!(path.exists()),
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        match execute(Mode::Plot, config)? {
            Outcome::Plotted(figures) => {
                assert_eq!(figures.len(), 6);
                assert!(figures.iter().all(|figure| figure.exists()));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        Ok(())
    }
}
