//! Benchmark error types.

use bench_core::types::SchemaViolation;
use thiserror::Error;

/// Errors raised while setting up, loading or querying a benchmark table.
///
/// Nothing here is retried: every variant aborts the scenario run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The schema definition itself is inconsistent.
    #[error("invalid schema for table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: SchemaViolation,
    },

    /// The database could not be opened or configured.
    #[error("failed to open database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Bulk insertion into a table failed.
    #[error("failed to load table '{table}' ({stage}): {source}")]
    Load {
        table: String,
        /// Which step failed, e.g. `row 42` or `commit`.
        stage: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The engine rejected a statement (DDL, query or inspection).
    #[error("statement failed: {statement}: {source}")]
    Query {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A configuration value could not be used.
    #[error("invalid configuration {key}={value}: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },
}

impl BenchError {
    pub(crate) fn query(statement: &str, source: rusqlite::Error) -> Self {
        BenchError::Query {
            statement: statement.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
