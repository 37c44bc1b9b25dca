//! The benchmark harness: owns one connection and runs the
//! setup → load → measure sequence against it.

use crate::config::{BenchConfig, TimingWindow};
use crate::error::{BenchError, Result};
use crate::inspect;
use crate::populate::{load_rows, Row, RowGenerator};
use crate::schema::{configure_connection, create_schema};
use bench_core::types::Schema;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::fmt;
use std::time::{Duration, Instant};

type ParamFn = dyn Fn(&mut StdRng) -> Vec<Value>;

/// A timed query: SQL text against one table plus a generator for its bound
/// parameters, called fresh for every execution.
pub struct QueryCase {
    pub label: String,
    pub table: String,
    pub sql: String,
    params: Box<ParamFn>,
}

impl QueryCase {
    pub fn new<F>(label: &str, table: &str, sql: &str, params: F) -> Self
    where
        F: Fn(&mut StdRng) -> Vec<Value> + 'static,
    {
        Self {
            label: label.to_string(),
            table: table.to_string(),
            sql: sql.to_string(),
            params: Box::new(params),
        }
    }

    /// A case whose parameters never change (or that has none).
    pub fn fixed(label: &str, table: &str, sql: &str, params: Vec<Value>) -> Self {
        Self::new(label, table, sql, move |_| params.clone())
    }

    pub fn params(&self, rng: &mut StdRng) -> Vec<Value> {
        (self.params)(rng)
    }
}

impl fmt::Debug for QueryCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCase")
            .field("label", &self.label)
            .field("table", &self.table)
            .field("sql", &self.sql)
            .finish_non_exhaustive()
    }
}

/// One timed execution, handed to the instrumentation hook of
/// [`Harness::measure_with`].
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub iteration: usize,
    pub elapsed: Duration,
    pub rows: usize,
}

/// Per-execution durations of one measured query case.
#[derive(Debug, Clone, Default)]
pub struct Timings {
    samples: Vec<Duration>,
    rows_returned: u64,
}

impl Timings {
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    /// Arithmetic mean; zero when nothing was measured.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.samples.len()) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total() / n,
            Err(_) => Duration::from_secs_f64(self.mean_ns() / 1e9),
        }
    }

    pub fn mean_ns(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total().as_nanos() as f64 / self.samples.len() as f64
    }

    pub fn mean_us(&self) -> f64 {
        self.mean_ns() / 1_000.0
    }

    /// Nearest-rank percentile in nanoseconds.
    pub fn percentile_ns(&self, pct: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<u128> = self.samples.iter().map(Duration::as_nanos).collect();
        sorted.sort_unstable();
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)] as f64
    }

    pub fn rows_returned(&self) -> u64 {
        self.rows_returned
    }

    pub fn rows_per_query(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.rows_returned as f64 / self.samples.len() as f64
    }

    pub(crate) fn push_sample(&mut self, elapsed: Duration, rows: usize) {
        self.samples.push(elapsed);
        self.rows_returned += rows as u64;
    }
}

/// Owns the connection and random source for one scenario run.
pub struct Harness {
    conn: Connection,
    config: BenchConfig,
    rng: StdRng,
}

impl Harness {
    /// Open (or create) the configured database and apply the benchmark
    /// connection settings.
    pub fn open(config: BenchConfig) -> Result<Self> {
        config.validate()?;

        let path = config.database_path.display().to_string();
        let connection_error = |source: rusqlite::Error| BenchError::Connection {
            path: path.clone(),
            source,
        };

        let conn = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.database_path)
        }
        .map_err(connection_error)?;

        configure_connection(&conn).map_err(|e| match e {
            BenchError::Query { source, .. } => connection_error(source),
            other => other,
        })?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!("opened {path}");
        Ok(Self { conn, config, rng })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Drop any existing table of the same name, then create the table and
    /// its indexes.
    pub fn setup(&self, schema: &Schema) -> Result<()> {
        create_schema(&self.conn, schema)?;
        log::info!(
            "created {} with {} index(es)",
            schema.table,
            schema.indexes.len()
        );
        Ok(())
    }

    /// Insert `row_count` rows from `generator`, committed once.
    ///
    /// With a configured seed the random source restarts from it first, so
    /// every table loaded by this harness receives the same row sequence.
    pub fn load(
        &mut self,
        schema: &Schema,
        row_count: u64,
        generator: &dyn RowGenerator,
    ) -> Result<u64> {
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let start = Instant::now();
        let loaded = load_rows(&mut self.conn, schema, row_count, generator, &mut self.rng)?;
        log::info!(
            "loaded {loaded} rows into {} in {:.2?}",
            schema.table,
            start.elapsed()
        );
        Ok(loaded)
    }

    /// Execute `case` exactly `query_count` times and return every sample.
    pub fn measure(&mut self, case: &QueryCase, query_count: usize) -> Result<Timings> {
        self.measure_with(case, query_count, |_| {})
    }

    /// Like [`Harness::measure`], calling `hook` after every execution.
    ///
    /// Parameters are generated before the clock starts. How much of the
    /// execution the clock covers follows the configured [`TimingWindow`].
    pub fn measure_with<H>(
        &mut self,
        case: &QueryCase,
        query_count: usize,
        mut hook: H,
    ) -> Result<Timings>
    where
        H: FnMut(&Sample),
    {
        let mut timings = Timings {
            samples: Vec::with_capacity(query_count),
            rows_returned: 0,
        };

        for iteration in 0..query_count {
            let params = case.params(&mut self.rng);
            let (elapsed, rows) =
                execute_timed(&self.conn, &case.sql, &params, self.config.timing_window)?;

            timings.push_sample(elapsed, rows);
            hook(&Sample {
                iteration,
                elapsed,
                rows,
            });
        }

        log::info!(
            "{}: {} queries, mean {:.0}ns, {:.1} rows/query",
            case.label,
            timings.len(),
            timings.mean_ns(),
            timings.rows_per_query()
        );
        Ok(timings)
    }

    /// Run `case` once with freshly generated parameters, returning the
    /// number of result rows.
    pub fn execute(&mut self, case: &QueryCase) -> Result<usize> {
        let params = case.params(&mut self.rng);
        execute_counted(&self.conn, &case.sql, &params)
    }

    /// Run `case`'s SQL once with explicit parameters and decode every row.
    pub fn fetch(&self, case: &QueryCase, params: &[Value]) -> Result<Vec<Row>> {
        fetch_rows(&self.conn, &case.sql, params)
    }

    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        self.conn
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(|e| BenchError::query(&sql, e))
    }

    pub fn index_entry_count(&self, index: &str) -> Result<u64> {
        inspect::index_entry_count(&self.conn, index)
    }

    pub fn query_plan(&self, case: &QueryCase, params: &[Value]) -> Result<Vec<String>> {
        inspect::explain_query_plan(&self.conn, &case.sql, params)
    }
}

fn execute_counted(conn: &Connection, sql: &str, params: &[Value]) -> Result<usize> {
    execute_timed(conn, sql, params, TimingWindow::AllRows).map(|(_, rows)| rows)
}

/// Run `sql` once, returning the time spent inside `window` and the number
/// of result rows.
fn execute_timed(
    conn: &Connection,
    sql: &str,
    params: &[Value],
    window: TimingWindow,
) -> Result<(Duration, usize)> {
    let run = || -> rusqlite::Result<(Duration, usize)> {
        let start = Instant::now();
        let mut stmt = conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        if rows.next()?.is_none() {
            return Ok((start.elapsed(), 0));
        }
        let first_row = start.elapsed();

        let mut count = 1;
        while rows.next()?.is_some() {
            count += 1;
        }
        let elapsed = match window {
            TimingWindow::FirstRow => first_row,
            TimingWindow::AllRows => start.elapsed(),
        };
        Ok((elapsed, count))
    };
    run().map_err(|e| BenchError::query(sql, e))
}

/// Run `sql` and decode every column of every result row.
pub fn fetch_rows(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
    let run = || -> rusqlite::Result<Vec<Row>> {
        let mut stmt = conn.prepare_cached(sql)?;
        let width = stmt.column_count();
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            (0..width).map(|i| row.get::<_, Value>(i)).collect()
        })?;
        rows.collect()
    };
    run().map_err(|e| BenchError::query(sql, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::types::ColumnType;
    use rand::Rng;

    fn pairs() -> Schema {
        Schema::new("pairs")
            .column("k", ColumnType::Integer)
            .column("v", ColumnType::Text)
    }

    fn loaded_harness(rows: u64) -> Harness {
        let mut harness = Harness::open(BenchConfig::in_memory(rows, 10).with_seed(3)).unwrap();
        harness.setup(&pairs()).unwrap();
        let generator = |seq: u64, _: &mut StdRng| -> Row {
            vec![Value::Integer(seq as i64 % 10), Value::Text(format!("v{seq}"))]
        };
        harness.load(&pairs(), rows, &generator).unwrap();
        harness
    }

    #[test]
    fn timings_statistics() {
        let mut timings = Timings::default();
        for ns in [100u64, 200, 300, 400] {
            timings.push_sample(Duration::from_nanos(ns), 2);
        }
        assert_eq!(timings.len(), 4);
        assert_eq!(timings.mean(), Duration::from_nanos(250));
        assert_eq!(timings.mean_ns(), 250.0);
        assert_eq!(timings.percentile_ns(0.0), 100.0);
        assert_eq!(timings.percentile_ns(100.0), 400.0);
        assert_eq!(timings.rows_returned(), 8);
        assert_eq!(timings.rows_per_query(), 2.0);
    }

    #[test]
    fn empty_timings_are_zero() {
        let timings = Timings::default();
        assert!(timings.is_empty());
        assert_eq!(timings.mean(), Duration::ZERO);
        assert_eq!(timings.mean_ns(), 0.0);
        assert_eq!(timings.percentile_ns(95.0), 0.0);
    }

    #[test]
    fn measure_counts_rows_per_execution() {
        let mut harness = loaded_harness(100);
        let case = QueryCase::new("by key", "pairs", "SELECT * FROM pairs WHERE k = ?", |rng| {
            vec![Value::Integer(rng.gen_range(0..10))]
        });

        let timings = harness.measure(&case, 20).unwrap();
        assert_eq!(timings.len(), 20);
        // Every key 0..10 occurs exactly ten times.
        assert_eq!(timings.rows_returned(), 200);
    }

    #[test]
    fn first_row_window_stops_before_draining_results() {
        // Half a million generated rows: the first arrives at once, draining
        // the rest takes far longer.
        const SERIES: &str = "WITH RECURSIVE series(x) AS \
            (SELECT 1 UNION ALL SELECT x + 1 FROM series WHERE x < 500000) \
            SELECT x FROM series";
        let case = QueryCase::fixed("series", "series", SERIES, vec![]);

        let mut first = Harness::open(
            BenchConfig::in_memory(0, 3).with_timing_window(TimingWindow::FirstRow),
        )
        .unwrap();
        let mut all = Harness::open(
            BenchConfig::in_memory(0, 3).with_timing_window(TimingWindow::AllRows),
        )
        .unwrap();

        let first_row = first.measure(&case, 3).unwrap();
        let all_rows = all.measure(&case, 3).unwrap();

        assert_eq!(first_row.rows_returned(), 1_500_000);
        assert_eq!(all_rows.rows_returned(), 1_500_000);
        assert!(
            first_row.mean() < all_rows.mean(),
            "first-row {:?} vs all-rows {:?}",
            first_row.mean(),
            all_rows.mean()
        );
    }

    #[test]
    fn zero_queries_measure_nothing() {
        let mut harness = loaded_harness(10);
        let case = QueryCase::fixed("all", "pairs", "SELECT * FROM pairs", vec![]);
        let timings = harness.measure(&case, 0).unwrap();
        assert!(timings.is_empty());
        assert_eq!(timings.mean(), Duration::ZERO);
    }

    #[test]
    fn fetch_decodes_columns() {
        let harness = loaded_harness(20);
        let case = QueryCase::fixed("one", "pairs", "SELECT * FROM pairs WHERE v = ?", vec![]);
        let rows = harness
            .fetch(&case, &[Value::Text("v13".to_string())])
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![Value::Integer(3), Value::Text("v13".to_string())]]
        );
    }

    #[test]
    fn bad_sql_is_a_query_error() {
        let mut harness = loaded_harness(1);
        let case = QueryCase::fixed("broken", "pairs", "SELECT * FROM missing", vec![]);
        let err = harness.measure(&case, 1).unwrap_err();
        match err {
            BenchError::Query { statement, .. } => assert_eq!(statement, "SELECT * FROM missing"),
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn unopenable_path_is_a_connection_error() {
        let config = BenchConfig::new("/nonexistent-dir/for/bench.db", 1, 1);
        let err = Harness::open(config).err().expect("open should fail");
        assert!(matches!(err, BenchError::Connection { .. }), "got {err:?}");
    }
}
