//! Comparative time-vs-size figures.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::compute::Operation;
use crate::error::{BenchError, Result};
use crate::results::ResultTable;

const FIGURE_SIZE: (u32, u32) = (1024, 768);
const PALETTE: [RGBColor; 3] = [BLUE, RED, GREEN];

fn plot_error<E: std::fmt::Display>(e: E) -> BenchError {
    BenchError::Plot(e.to_string())
}

/// Loads the result table of every backend in `backends` from `dir` and
/// writes one `<operation>.svg` per operation next to them.
///
/// All tables are loaded before anything is drawn, so a missing backend
/// leaves no figures behind.
pub fn plot_times(dir: &Path, backends: &[&str]) -> Result<Vec<PathBuf>> {
    let tables = backends
        .iter()
        .map(|backend| ResultTable::load(dir, backend))
        .collect::<Result<Vec<_>>>()?;

    Operation::ALL
        .iter()
        .map(|&operation| plot_operation(dir, operation, &tables))
        .collect()
}

fn plot_operation(dir: &Path, operation: Operation, tables: &[ResultTable]) -> Result<PathBuf> {
    let path = dir.join(format!("{}.svg", operation.name()));

    let x_max = tables
        .iter()
        .flat_map(|table| table.rows().iter().map(|row| row.size as f64))
        .fold(1.0, f64::max);
    let y_max = tables
        .iter()
        .flat_map(|table| table.rows().iter().map(move |row| row.time(operation)))
        .filter(|t| t.is_finite())
        .fold(f64::MIN_POSITIVE, f64::max);

    {
        let root = SVGBackend::new(&path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(operation.name(), ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(0f64..x_max * 1.05, 0f64..y_max * 1.1)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc("size")
            .y_desc("time (s)")
            .draw()
            .map_err(plot_error)?;

        for (idx, table) in tables.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(
                    table.series(operation),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
                .label(table.backend())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
    }

    info!(%operation, path = %path.display(), "Wrote figure");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TimingRow;
    use tempfile::tempdir;

    const BACKENDS: [&str; 3] = ["ndarray", "cpu", "rayon"];

    fn write_table(dir: &Path, backend: &str, scale: f64) -> Result<()> {
        let mut table = ResultTable::new(backend);
        for (i, size) in [500usize, 1000, 1500].into_iter().enumerate() {
            let t = scale * (i + 1) as f64;
            table.push(TimingRow {
                size,
                times: [t, t / 2.0, t / 3.0, t / 4.0, t / 5.0, t / 6.0],
            });
        }
        table.save(dir)?;
        Ok(())
    }

    #[test]
    fn writes_one_figure_per_operation() -> Result<()> {
        let dir = tempdir()?;
        for (i, backend) in BACKENDS.iter().enumerate() {
            write_table(dir.path(), backend, 0.01 * (i + 1) as f64)?;
        }

        let figures = plot_times(dir.path(), &BACKENDS)?;

        assert_eq!(figures.len(), Operation::ALL.len());
        for (figure, operation) in figures.iter().zip(Operation::ALL) {
            assert_eq!(figure, &dir.path().join(format!("{}.svg", operation.name())));
            let svg = std::fs::read_to_string(figure)?;
            assert!(svg.contains("<svg"));
            for backend in BACKENDS {
                assert!(svg.contains(backend), "{} missing from {}", backend, operation);
            }
        }
        Ok(())
    }

    #[test]
    fn missing_backend_aborts_before_drawing() -> Result<()> {
        let dir = tempdir()?;
        write_table(dir.path(), "ndarray", 0.01)?;
        write_table(dir.path(), "rayon", 0.02)?;

        match plot_times(dir.path(), &BACKENDS) {
            Err(BenchError::MissingResults { backend, .. }) => assert_eq!(backend, "cpu"),
            other => panic!("expected missing results, got {:?}", other),
        }

        let svgs = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "svg"))
            .count();
        assert_eq!(svgs, 0);
        Ok(())
    }
}
