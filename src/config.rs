use std::{path::PathBuf, time::Duration};

use tracing::Level;

pub const ENV_RESULTS: &str = "MAZETRACE_RESULTS";
pub const ENV_LOG_DIR: &str = "MAZETRACE_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "MAZETRACE_LOG_LEVEL";
pub const ENV_EXPLORE_MS: &str = "MAZETRACE_EXPLORE_MS";
pub const ENV_SOLUTION_MS: &str = "MAZETRACE_SOLUTION_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Timer period while an animation marks explored cells
    pub explore_interval: Duration,
    /// Timer period while an animation walks the solution
    pub solution_interval: Duration,
    /// CSV file holding the latest result per algorithm
    pub results_path: PathBuf,
    /// Directory for the log file; stdout belongs to the terminal UI
    pub log_dir: PathBuf,
    pub log_level: Level,
    /// Side length offered when the size prompt is left empty
    pub default_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            explore_interval: Duration::from_millis(20),
            solution_interval: Duration::from_millis(50),
            results_path: PathBuf::from("results.csv"),
            log_dir: PathBuf::from("logs"),
            log_level: Level::INFO,
            default_size: 21,
        }
    }
}

impl Config {
    /// Defaults overridden by `MAZETRACE_*` environment variables.
    /// Returns the config and one warning per value that could not be used.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        if let Some(path) = lookup(ENV_RESULTS).filter(|v| !v.trim().is_empty()) {
            config.results_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            match level.trim().parse::<Level>() {
                Ok(level) => config.log_level = level,
                Err(_) => warnings.push(format!(
                    "{}={:?} is not a log level, using {}",
                    ENV_LOG_LEVEL, level, config.log_level
                )),
            }
        }
        for (key, interval) in [
            (ENV_EXPLORE_MS, &mut config.explore_interval),
            (ENV_SOLUTION_MS, &mut config.solution_interval),
        ] {
            if let Some(value) = lookup(key) {
                match value.trim().parse::<u64>() {
                    Ok(ms) if ms > 0 => *interval = Duration::from_millis(ms),
                    _ => warnings.push(format!(
                        "{}={:?} is not a positive number of milliseconds, using {}",
                        key,
                        value,
                        interval.as_millis()
                    )),
                }
            }
        }

        (config, warnings)
    }
}
