//! Point lookups on `(employee_id, subsidiary_id)` with and without an index
//! covering both columns.

use super::{employee_rows, employee_schema, Scenario, TableSpec};
use crate::config::BenchConfig;
use crate::harness::QueryCase;
use bench_core::constants::{
    BASIC_INDEX_DATABASE, BASIC_INDEX_MAX_SUBSIDIARY_ID, BASIC_INDEX_QUERY_COUNT,
    BASIC_INDEX_ROW_COUNT,
};
use bench_core::names::random_id;
use bench_core::types::{IndexDef, ValueRanges};
use rusqlite::types::Value;

pub const WITHOUT_INDEX_TABLE: &str = "employees_without_index";
pub const WITH_INDEX_TABLE: &str = "employees_with_index";
pub const INDEX_NAME: &str = "idx_employee_id_subsidiary_id";

pub struct BasicIndex;

impl BasicIndex {
    fn lookup(table: &str, config: &BenchConfig) -> QueryCase {
        let max_employee_id = config.row_count.max(1) as i64;
        let max_subsidiary_id = config.ranges.max_subsidiary_id;
        QueryCase::new(
            table,
            table,
            &format!("SELECT * FROM {table} WHERE employee_id = ? AND subsidiary_id = ?"),
            move |rng| {
                vec![
                    Value::Integer(random_id(rng, max_employee_id)),
                    Value::Integer(random_id(rng, max_subsidiary_id)),
                ]
            },
        )
    }
}

impl Scenario for BasicIndex {
    fn name(&self) -> &'static str {
        "basic-index"
    }

    fn description(&self) -> &'static str {
        "point lookup on (employee_id, subsidiary_id): table scan vs composite index"
    }

    fn default_config(&self) -> BenchConfig {
        BenchConfig::new(
            BASIC_INDEX_DATABASE,
            BASIC_INDEX_ROW_COUNT,
            BASIC_INDEX_QUERY_COUNT,
        )
        .with_ranges(ValueRanges {
            max_subsidiary_id: BASIC_INDEX_MAX_SUBSIDIARY_ID,
            ..Default::default()
        })
    }

    fn tables(&self, config: &BenchConfig) -> Vec<TableSpec> {
        vec![
            TableSpec::new(employee_schema(WITHOUT_INDEX_TABLE), employee_rows(config)),
            TableSpec::new(
                employee_schema(WITH_INDEX_TABLE)
                    .index(IndexDef::new(INDEX_NAME, &["employee_id", "subsidiary_id"])),
                employee_rows(config),
            ),
        ]
    }

    fn queries(&self, config: &BenchConfig) -> Vec<QueryCase> {
        vec![
            Self::lookup(WITHOUT_INDEX_TABLE, config),
            Self::lookup(WITH_INDEX_TABLE, config),
        ]
    }

    fn notes(&self) -> &'static [&'static str] {
        &[
            "Without an index every lookup scans the whole table.",
            "With the index each lookup is a b-tree search and should be orders of magnitude faster.",
        ]
    }
}
