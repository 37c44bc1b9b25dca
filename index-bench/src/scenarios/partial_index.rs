//! A message queue where only a small share of rows is unprocessed. The
//! partial index holds just those rows; the full index holds all of them.

use super::{Scenario, TableSpec};
use crate::config::BenchConfig;
use crate::harness::QueryCase;
use crate::populate::Row;
use bench_core::constants::{
    PARTIAL_INDEX_DATABASE, PARTIAL_INDEX_QUERY_COUNT, PARTIAL_INDEX_ROW_COUNT,
};
use bench_core::names::random_string;
use bench_core::types::{ColumnType, IndexDef, Schema};
use rand::rngs::StdRng;
use rand::Rng;
use rusqlite::types::Value;

pub const FULL_INDEX_TABLE: &str = "messages_full_index";
pub const PARTIAL_INDEX_TABLE: &str = "messages_with_partial_index";
pub const FULL_INDEX: &str = "idx_messages_full_index";
pub const PARTIAL_INDEX: &str = "idx_messages_partial_index";

/// Rows the partial index keeps.
pub const UNPROCESSED_PREDICATE: &str = "processed = 'N'";

pub struct PartialIndex;

impl PartialIndex {
    fn message_schema(table: &str) -> Schema {
        Schema::new(table)
            .column("message_id", ColumnType::Integer)
            .column("message", ColumnType::Text)
            .column("receiver", ColumnType::Text)
            .column("processed", ColumnType::Char(1))
    }

    pub fn full_schema() -> Schema {
        Self::message_schema(FULL_INDEX_TABLE)
            .index(IndexDef::new(FULL_INDEX, &["receiver", "processed"]))
    }

    pub fn partial_schema() -> Schema {
        Self::message_schema(PARTIAL_INDEX_TABLE)
            .index(IndexDef::new(PARTIAL_INDEX, &["receiver"]).filter(UNPROCESSED_PREDICATE))
    }

    fn message_rows(config: &BenchConfig) -> impl Fn(u64, &mut StdRng) -> Row {
        let ranges = config.ranges.clone();
        let row_count = config.row_count;
        move |sequence: u64, rng: &mut StdRng| {
            let processed = if rng.gen_range(0..=row_count) < ranges.expected_unprocessed {
                "N"
            } else {
                "Y"
            };
            vec![
                Value::Integer(sequence as i64),
                Value::Text(random_string(
                    rng,
                    ranges.message_alphabet,
                    ranges.message_length,
                )),
                Value::Text(random_string(
                    rng,
                    ranges.receiver_alphabet,
                    ranges.receiver_length,
                )),
                Value::Text(processed.to_string()),
            ]
        }
    }

    /// Unprocessed messages for a random receiver.
    pub fn pending_for_receiver(table: &str, config: &BenchConfig) -> QueryCase {
        let alphabet = config.ranges.receiver_alphabet;
        let length = config.ranges.receiver_length;
        QueryCase::new(
            table,
            table,
            &format!("SELECT * FROM {table} WHERE receiver = ? AND {UNPROCESSED_PREDICATE}"),
            move |rng| vec![Value::Text(random_string(rng, alphabet, length))],
        )
    }
}

impl Scenario for PartialIndex {
    fn name(&self) -> &'static str {
        "partial-index"
    }

    fn description(&self) -> &'static str {
        "pending messages per receiver: full (receiver, processed) vs partial (receiver) WHERE processed = 'N'"
    }

    fn default_config(&self) -> BenchConfig {
        BenchConfig::new(
            PARTIAL_INDEX_DATABASE,
            PARTIAL_INDEX_ROW_COUNT,
            PARTIAL_INDEX_QUERY_COUNT,
        )
    }

    fn tables(&self, config: &BenchConfig) -> Vec<TableSpec> {
        vec![
            TableSpec::new(Self::full_schema(), Self::message_rows(config)),
            TableSpec::new(Self::partial_schema(), Self::message_rows(config)),
        ]
    }

    fn queries(&self, config: &BenchConfig) -> Vec<QueryCase> {
        vec![
            Self::pending_for_receiver(PARTIAL_INDEX_TABLE, config),
            Self::pending_for_receiver(FULL_INDEX_TABLE, config),
        ]
    }

    fn notes(&self) -> &'static [&'static str] {
        &[
            "Both indexes can answer the query; the partial one only stores unprocessed rows.",
            "A smaller index means fewer pages to search, so the partial index should be at least as fast.",
        ]
    }
}
