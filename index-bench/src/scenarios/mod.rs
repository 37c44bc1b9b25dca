//! Named benchmark scenarios and the runner that drives them.
//!
//! Each scenario describes its tables (schema + row generator) and the
//! query cases to time against them:
//! - [`basic_index::BasicIndex`]: no index vs composite index on the filter columns
//! - [`composite_order::CompositeOrder`]: composite index column order
//! - [`like_pattern::LikePattern`]: `LIKE` prefixes against a `NOCASE` index
//! - [`partial_index::PartialIndex`]: full vs partial index on a message queue

pub mod basic_index;
pub mod composite_order;
pub mod like_pattern;
pub mod partial_index;

use crate::config::BenchConfig;
use crate::error::Result;
use crate::harness::{Harness, QueryCase};
use crate::populate::{Row, RowGenerator};
use crate::report::{CaseResult, ScenarioReport};
use bench_core::names::{random_birth_date, random_id};
use bench_core::types::{ColumnType, Schema};
use rand::rngs::StdRng;
use rusqlite::types::Value;

/// A table to create and fill before timing starts.
pub struct TableSpec {
    pub schema: Schema,
    pub generator: Box<dyn RowGenerator>,
}

impl TableSpec {
    pub fn new<G>(schema: Schema, generator: G) -> Self
    where
        G: RowGenerator + 'static,
    {
        Self {
            schema,
            generator: Box::new(generator),
        }
    }
}

/// A self-contained benchmark: tables plus the queries timed against them.
pub trait Scenario {
    /// Registry key, e.g. `partial-index`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Database path, sizes and ranges this scenario runs with by default.
    fn default_config(&self) -> BenchConfig;

    fn tables(&self, config: &BenchConfig) -> Vec<TableSpec>;

    fn queries(&self, config: &BenchConfig) -> Vec<QueryCase>;

    /// What the timings are expected to show, printed under the results.
    fn notes(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Every scenario, in report order.
pub fn registry() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(basic_index::BasicIndex),
        Box::new(composite_order::CompositeOrder),
        Box::new(like_pattern::LikePattern),
        Box::new(partial_index::PartialIndex),
    ]
}

pub fn names() -> Vec<&'static str> {
    registry().iter().map(|s| s.name()).collect()
}

pub fn find(name: &str) -> Option<Box<dyn Scenario>> {
    registry().into_iter().find(|s| s.name() == name)
}

/// Create and fill every table of `scenario` using the harness's config.
/// Returns the rows loaded per table.
pub fn populate(harness: &mut Harness, scenario: &dyn Scenario) -> Result<Vec<(String, u64)>> {
    let config = harness.config().clone();
    let mut loaded = Vec::new();
    for table in scenario.tables(&config) {
        harness.setup(&table.schema)?;
        let rows = harness.load(&table.schema, config.row_count, table.generator.as_ref())?;
        loaded.push((table.schema.table.clone(), rows));
    }
    Ok(loaded)
}

/// Full run: populate, capture each query's plan, time every query case
/// `config.query_count` times, then record index sizes.
pub fn run_scenario(scenario: &dyn Scenario, config: &BenchConfig) -> Result<ScenarioReport> {
    log::info!(
        "running {} against {} ({} rows, {} queries)",
        scenario.name(),
        config.database_path.display(),
        config.row_count,
        config.query_count
    );

    let mut harness = Harness::open(config.clone())?;
    populate(&mut harness, scenario)?;

    let mut cases = Vec::new();
    for case in scenario.queries(config) {
        let sample_params = case.params(harness.rng());
        let plan = harness.query_plan(&case, &sample_params)?;
        for line in &plan {
            log::debug!("{}: {line}", case.label);
        }

        let timings = harness.measure(&case, config.query_count)?;
        cases.push(CaseResult {
            label: case.label.clone(),
            table: case.table.clone(),
            timings,
            plan,
        });
    }

    let mut index_entries = Vec::new();
    for table in scenario.tables(config) {
        for index in &table.schema.indexes {
            let entries = harness.index_entry_count(&index.name)?;
            index_entries.push((index.name.clone(), entries));
        }
    }

    Ok(ScenarioReport {
        scenario: scenario.name().to_string(),
        description: scenario.description().to_string(),
        row_count: config.row_count,
        query_count: config.query_count,
        timing_window: config.timing_window,
        cases,
        index_entries,
        notes: scenario.notes().iter().map(|n| n.to_string()).collect(),
    })
}

// ── Employee tables shared by several scenarios ─────────────────────

/// `(employee_id BIGINT, subsidiary_id BIGINT, birth_date DATE)`
pub(crate) fn employee_schema(table: &str) -> Schema {
    Schema::new(table)
        .column("employee_id", ColumnType::Integer)
        .column("subsidiary_id", ColumnType::Integer)
        .column("birth_date", ColumnType::Date)
}

/// Rows of `(sequence, random subsidiary, random birth date)`.
pub(crate) fn employee_rows(config: &BenchConfig) -> impl Fn(u64, &mut StdRng) -> Row {
    let max_subsidiary_id = config.ranges.max_subsidiary_id;
    let birth_years = config.ranges.birth_years.clone();
    move |sequence: u64, rng: &mut StdRng| {
        vec![
            Value::Integer(sequence as i64),
            Value::Integer(random_id(rng, max_subsidiary_id)),
            Value::Text(random_birth_date(rng, &birth_years)),
        ]
    }
}
