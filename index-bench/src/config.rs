//! Run configuration: where the database lives, how many rows to load, how
//! many queries to time and which value ranges to draw from.
//!
//! Each scenario supplies its own defaults; the runner can override them
//! through environment variables:
//!
//! | Variable                    | Field            |
//! |-----------------------------|------------------|
//! | `INDEX_BENCH_DB`            | `database_path`  |
//! | `INDEX_BENCH_ROWS`          | `row_count`      |
//! | `INDEX_BENCH_QUERIES`       | `query_count`    |
//! | `INDEX_BENCH_SEED`          | `seed`           |
//! | `INDEX_BENCH_LIKE_BINDING`  | `like_binding`   |
//! | `INDEX_BENCH_TIMING`        | `timing_window`  |

use crate::error::{BenchError, Result};
use bench_core::types::ValueRanges;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_DATABASE: &str = "INDEX_BENCH_DB";
pub const ENV_ROWS: &str = "INDEX_BENCH_ROWS";
pub const ENV_QUERIES: &str = "INDEX_BENCH_QUERIES";
pub const ENV_SEED: &str = "INDEX_BENCH_SEED";
pub const ENV_LIKE_BINDING: &str = "INDEX_BENCH_LIKE_BINDING";
pub const ENV_TIMING_WINDOW: &str = "INDEX_BENCH_TIMING";
/// Optional log file path, read by the binary.
pub const ENV_LOG_FILE: &str = "INDEX_BENCH_LOG";

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// How `LIKE` patterns reach the engine.
///
/// `Literal` splices the pattern into the SQL text; `Bound` passes it as a
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeBinding {
    #[default]
    Literal,
    Bound,
}

impl FromStr for LikeBinding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(LikeBinding::Literal),
            "bound" => Ok(LikeBinding::Bound),
            other => Err(format!("expected 'literal' or 'bound', got '{other}'")),
        }
    }
}

impl fmt::Display for LikeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeBinding::Literal => write!(f, "literal"),
            LikeBinding::Bound => write!(f, "bound"),
        }
    }
}

/// What part of a query execution the clock covers.
///
/// `FirstRow` stops the clock once the statement has produced its first
/// result row (or finished without one), so a scan that hits a match early
/// is cheap. `AllRows` keeps the clock running until every result row has
/// been stepped through. Result rows are counted in both modes; with
/// `FirstRow` the remaining rows are stepped after the clock stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingWindow {
    #[default]
    FirstRow,
    AllRows,
}

impl FromStr for TimingWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect();
        match normalized.as_str() {
            "firstrow" => Ok(TimingWindow::FirstRow),
            "allrows" => Ok(TimingWindow::AllRows),
            _ => Err(format!(
                "expected 'first-row' or 'all-rows', got '{}'",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for TimingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingWindow::FirstRow => write!(f, "first-row"),
            TimingWindow::AllRows => write!(f, "all-rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub database_path: PathBuf,
    pub row_count: u64,
    pub query_count: usize,
    pub ranges: ValueRanges,
    pub like_binding: LikeBinding,
    pub timing_window: TimingWindow,
    /// When set, every table load restarts the random source from this
    /// seed, so sibling tables hold identical rows.
    pub seed: Option<u64>,
}

impl BenchConfig {
    pub fn new(database_path: impl Into<PathBuf>, row_count: u64, query_count: usize) -> Self {
        Self {
            database_path: database_path.into(),
            row_count,
            query_count,
            ranges: ValueRanges::default(),
            like_binding: LikeBinding::default(),
            timing_window: TimingWindow::default(),
            seed: None,
        }
    }

    pub fn in_memory(row_count: u64, query_count: usize) -> Self {
        Self::new(IN_MEMORY, row_count, query_count)
    }

    pub fn with_ranges(mut self, ranges: ValueRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_like_binding(mut self, like_binding: LikeBinding) -> Self {
        self.like_binding = like_binding;
        self
    }

    pub fn with_timing_window(mut self, timing_window: TimingWindow) -> Self {
        self.timing_window = timing_window;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    /// Reject ranges the row and parameter generators cannot sample from.
    pub fn validate(&self) -> Result<()> {
        match self.ranges.problem() {
            Some(reason) => Err(BenchError::Config {
                key: "ranges".to_string(),
                value: format!("{:?}", self.ranges),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Apply the `INDEX_BENCH_*` environment variables on top of `self`.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unset keys keep the
    /// current value; unparseable values are a configuration error.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_ROWS) {
            self.row_count = parse_var(ENV_ROWS, &value)?;
        }
        if let Some(value) = lookup(ENV_QUERIES) {
            self.query_count = parse_var(ENV_QUERIES, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_LIKE_BINDING) {
            self.like_binding = parse_var(ENV_LIKE_BINDING, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMING_WINDOW) {
            self.timing_window = parse_var(ENV_TIMING_WINDOW, &value)?;
        }
        Ok(self)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|e: T::Err| BenchError::Config {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let config = BenchConfig::new("index.db", 1_000_000, 1_000);
        let same = config.clone().apply_overrides(lookup(&[])).unwrap();
        assert_eq!(config, same);
    }

    #[test]
    fn overrides_replace_fields() {
        let config = BenchConfig::new("index.db", 1_000_000, 1_000)
            .apply_overrides(lookup(&[
                (ENV_DATABASE, ":memory:"),
                (ENV_ROWS, "10_000"),
                (ENV_QUERIES, "25"),
                (ENV_SEED, "99"),
                (ENV_LIKE_BINDING, "Bound"),
                (ENV_TIMING_WINDOW, "all-rows"),
            ]))
            .unwrap();

        assert!(config.is_in_memory());
        assert_eq!(config.row_count, 10_000);
        assert_eq!(config.query_count, 25);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.like_binding, LikeBinding::Bound);
        assert_eq!(config.timing_window, TimingWindow::AllRows);
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = BenchConfig::in_memory(10, 10)
            .apply_overrides(lookup(&[(ENV_ROWS, "lots")]))
            .unwrap_err();
        match err {
            BenchError::Config { key, value, .. } => {
                assert_eq!(key, ENV_ROWS);
                assert_eq!(value, "lots");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn like_binding_parses_both_spellings() {
        assert_eq!("literal".parse::<LikeBinding>(), Ok(LikeBinding::Literal));
        assert_eq!(" BOUND ".parse::<LikeBinding>(), Ok(LikeBinding::Bound));
        assert!("maybe".parse::<LikeBinding>().is_err());
    }

    #[test]
    fn timing_window_defaults_to_first_row() {
        assert_eq!(
            BenchConfig::in_memory(1, 1).timing_window,
            TimingWindow::FirstRow
        );
        assert_eq!("first_row".parse::<TimingWindow>(), Ok(TimingWindow::FirstRow));
        assert_eq!("All-Rows".parse::<TimingWindow>(), Ok(TimingWindow::AllRows));
        assert!("some-rows".parse::<TimingWindow>().is_err());
        assert_eq!(TimingWindow::AllRows.to_string(), "all-rows");
    }

    #[test]
    fn unusable_ranges_fail_validation() {
        let config = BenchConfig::in_memory(10, 10).with_ranges(ValueRanges {
            max_subsidiary_id: 0,
            ..Default::default()
        });
        assert!(matches!(config.validate(), Err(BenchError::Config { .. })));
    }
}
