//! SQLite Index Latency Benchmarks
//!
//! Measures how much an index strategy changes the latency of a fixed query
//! pattern. Every scenario creates its tables, bulk-loads synthetic rows and
//! times a parameterized query a fixed number of times:
//! - **basic-index**: table scan vs composite index on the filter columns
//! - **composite-index-order**: the same two columns indexed in either order
//! - **like-pattern**: `LIKE` prefixes against a `COLLATE NOCASE` index
//! - **partial-index**: full vs partial index on a message queue
//!
//! Run benchmarks: `cargo run --release [SCENARIO ...]` or `cargo bench`
//! Run tests: `cargo test`

pub mod config;
pub mod error;
pub mod harness;
pub mod inspect;
pub mod populate;
pub mod report;
pub mod scenarios;
pub mod schema;

pub use config::{BenchConfig, LikeBinding, TimingWindow};
pub use error::{BenchError, Result};
pub use harness::{Harness, QueryCase, Sample, Timings};
