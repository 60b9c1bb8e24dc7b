//! Per-algorithm timing records and their CSV store.
//!
//! One line per algorithm name: `name,executionTimeNanoseconds,pathLength`.

use std::{
    fs,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{MazeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmResult {
    pub algorithm_name: String,
    pub execution_time_nanos: u64,
    pub path_length: usize,
}

impl AlgorithmResult {
    pub fn new(algorithm_name: impl Into<String>, elapsed: Duration, path_length: usize) -> Self {
        Self {
            algorithm_name: algorithm_name.into(),
            execution_time_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            path_length,
        }
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{}",
            self.algorithm_name, self.execution_time_nanos, self.path_length
        )
    }

    pub fn from_csv_row(row: &str) -> Result<Self> {
        let malformed = || MazeError::MalformedRecord(row.to_string());
        let fields = row.trim().split(',').collect::<Vec<_>>();
        let [name, time, length] = fields.as_slice() else {
            return Err(malformed());
        };
        if name.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            algorithm_name: name.to_string(),
            execution_time_nanos: time.trim().parse().map_err(|_| malformed())?,
            path_length: length.trim().parse().map_err(|_| malformed())?,
        })
    }
}

/// Storage for the latest result of each algorithm.
pub trait ResultStore {
    /// Insert, or replace the record with the same algorithm name in place.
    fn save_or_update(&mut self, result: AlgorithmResult) -> Result<()>;
    /// All records in insertion order. Unreadable records are skipped.
    fn find_all(&self) -> Result<Vec<AlgorithmResult>>;
    fn clear_all(&mut self) -> Result<()>;
}

fn upsert(results: &mut Vec<AlgorithmResult>, result: AlgorithmResult) {
    match results
        .iter_mut()
        .find(|existing| existing.algorithm_name == result.algorithm_name)
    {
        Some(existing) => *existing = result,
        None => results.push(result),
    }
}

#[derive(Debug, Default)]
pub struct MemoryResultStore {
    results: Vec<AlgorithmResult>,
}

impl ResultStore for MemoryResultStore {
    fn save_or_update(&mut self, result: AlgorithmResult) -> Result<()> {
        upsert(&mut self.results, result);
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<AlgorithmResult>> {
        Ok(self.results.clone())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.results.clear();
        Ok(())
    }
}

/// CSV file store. Every write rereads the file, applies the change in memory
/// and rewrites the whole file.
#[derive(Debug)]
pub struct FileResultStore {
    path: PathBuf,
}

impl FileResultStore {
    /// Open the store, creating an empty file if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&path)?;
            tracing::info!("Created results file {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, results: &[AlgorithmResult]) -> Result<()> {
        let mut writer = BufWriter::new(fs::File::create(&self.path)?);
        for result in results {
            writeln!(writer, "{}", result.to_csv_row())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ResultStore for FileResultStore {
    fn save_or_update(&mut self, result: AlgorithmResult) -> Result<()> {
        let mut results = self.find_all()?;
        upsert(&mut results, result);
        self.write_all(&results)
    }

    fn find_all(&self) -> Result<Vec<AlgorithmResult>> {
        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut results = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match AlgorithmResult::from_csv_row(&line) {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!("Skipping record in {}: {}", self.path.display(), e),
            }
        }
        Ok(results)
    }

    fn clear_all(&mut self) -> Result<()> {
        self.write_all(&[])
    }
}

/// Plain-text table of results, fastest first.
pub fn summarize(results: &[AlgorithmResult]) -> String {
    if results.is_empty() {
        return "No results recorded yet.".to_string();
    }
    let mut sorted = results.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|r| r.execution_time_nanos);

    let name_width = sorted
        .iter()
        .map(|r| r.algorithm_name.len())
        .max()
        .unwrap_or(0)
        .max("Algorithm".len());
    let mut out = format!(
        "{:<name_width$}  {:>12}  {:>11}\n",
        "Algorithm", "Time (ms)", "Path length"
    );
    for r in sorted {
        out.push_str(&format!(
            "{:<name_width$}  {:>12.3}  {:>11}\n",
            r.algorithm_name,
            r.execution_time_nanos as f64 / 1_000_000.0,
            r.path_length
        ));
    }
    out
}
