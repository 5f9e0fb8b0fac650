//! Timing rows, result tables and their on-disk form.
//!
//! A table is stored as a JSON array of 7-element arrays,
//! `[size, dot, add, exp, sum, mean, min]`, one per swept size.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compute::{Operation, OPERATION_COUNT};
use crate::error::{BenchError, Result};

/// Columns per persisted row: the size followed by one timing per operation.
pub const COLUMN_COUNT: usize = OPERATION_COUNT + 1;

/// Fastest trial time of every operation, in seconds, for one matrix size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; COLUMN_COUNT]", into = "[f64; COLUMN_COUNT]")]
pub struct TimingRow {
    pub size: usize,
    pub times: [f64; OPERATION_COUNT],
}

impl TimingRow {
    pub fn time(&self, operation: Operation) -> f64 {
        self.times[operation.index()]
    }

    pub fn columns(&self) -> [f64; COLUMN_COUNT] {
        let mut columns = [0.0; COLUMN_COUNT];
        columns[0] = self.size as f64;
        columns[1..].copy_from_slice(&self.times);
        columns
    }
}

impl From<[f64; COLUMN_COUNT]> for TimingRow {
    fn from(columns: [f64; COLUMN_COUNT]) -> Self {
        let mut times = [0.0; OPERATION_COUNT];
        times.copy_from_slice(&columns[1..]);
        Self {
            size: columns[0] as usize,
            times,
        }
    }
}

impl From<TimingRow> for [f64; COLUMN_COUNT] {
    fn from(row: TimingRow) -> Self {
        row.columns()
    }
}

/// All timing rows of one backend, in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    backend: String,
    rows: Vec<TimingRow>,
}

impl ResultTable {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            rows: Vec::new(),
        }
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn rows(&self) -> &[TimingRow] {
        &self.rows
    }

    pub fn push(&mut self, row: TimingRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(size, seconds)` points of one operation.
    pub fn series(&self, operation: Operation) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| (row.size as f64, row.time(operation)))
            .collect()
    }

    pub fn file_name(backend: &str) -> String {
        format!("{backend}_times.json")
    }

    pub fn path_in(dir: &Path, backend: &str) -> PathBuf {
        dir.join(Self::file_name(backend))
    }

    /// Writes the table to `<dir>/<backend>_times.json`, replacing any previous run.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(dir, &self.backend);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, &self.rows)?;
        writer.flush()?;

        info!(backend = %self.backend, rows = self.rows.len(), path = %path.display(), "Saved results");
        Ok(path)
    }

    pub fn load(dir: &Path, backend: &str) -> Result<Self> {
        let path = Self::path_in(dir, backend);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BenchError::MissingResults {
                    backend: backend.to_string(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let rows: Vec<TimingRow> = serde_json::from_reader(BufReader::new(file))?;
        debug!(backend, rows = rows.len(), "Loaded results");

        Ok(Self {
            backend: backend.to_string(),
            rows,
        })
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "size")?;
        for operation in Operation::ALL {
            write!(f, " {:>12}", operation.name())?;
        }
        for row in &self.rows {
            writeln!(f)?;
            write!(f, "{:>8}", row.size)?;
            for time in row.times {
                write!(f, " {:>12.6e}", time)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_table(backend: &str) -> ResultTable {
        let mut table = ResultTable::new(backend);
        table.push(TimingRow {
            size: 500,
            times: [0.5, 0.001, 0.002, 0.0003, 0.0004, 0.0005],
        });
        table.push(TimingRow {
            size: 1000,
            times: [4.0, 0.004, 0.008, 0.0012, 0.0013, 0.0014],
        });
        table
    }

    #[test]
    fn saved_table_is_an_n_by_7_matrix() -> Result<()> {
        let dir = tempdir()?;
        let path = sample_table("cpu").save(dir.path())?;

        assert_eq!(path, dir.path().join("cpu_times.json"));
        let raw: Vec<Vec<f64>> = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(raw.len(), 2);
        assert!(raw.iter().all(|row| row.len() == COLUMN_COUNT));
        assert_eq!(raw[0][0], 500.0);
        assert_eq!(raw[1][1], 4.0);
        Ok(())
    }

    #[test]
    fn load_reads_back_saved_rows() -> Result<()> {
        let dir = tempdir()?;
        let table = sample_table("ndarray");
        table.save(dir.path())?;

        let loaded = ResultTable::load(dir.path(), "ndarray")?;
        assert_eq!(loaded, table);
        assert_eq!(loaded.series(Operation::Dot), vec![(500.0, 0.5), (1000.0, 4.0)]);
        assert_eq!(loaded.rows()[1].time(Operation::Min), 0.0014);
        Ok(())
    }

    #[test]
    fn missing_file_names_the_backend() -> Result<()> {
        let dir = tempdir()?;
        match ResultTable::load(dir.path(), "rayon") {
            Err(BenchError::MissingResults { backend, path }) => {
                assert_eq!(backend, "rayon");
                assert_eq!(path, dir.path().join("rayon_times.json"));
            }
            other => panic!("expected missing results, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn rows_with_wrong_width_fail_to_load() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("cpu_times.json"), "[[500, 1.0, 2.0]]")?;

        let result = ResultTable::load(dir.path(), "cpu");
        assert!(matches!(result, Err(BenchError::Serialization(_))));
        Ok(())
    }

    #[test]
    fn display_lists_one_line_per_row() {
        let rendered = sample_table("cpu").to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("dot") && lines[0].contains("min"));
        assert!(lines[2].trim_start().starts_with("1000"));
    }
}
