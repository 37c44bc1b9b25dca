//! Data model shared by the benchmark harness: table schemas, index
//! definitions and the ranges random values are drawn from.

mod ranges;
mod schema;

pub use ranges::ValueRanges;
pub use schema::{Collation, Column, ColumnType, IndexDef, Schema, SchemaViolation};
