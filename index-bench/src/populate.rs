//! Data population: bulk-inserts synthetic rows produced by a row generator.

use crate::error::{BenchError, Result};
use bench_core::types::Schema;
use rand::rngs::StdRng;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// One row's values, in column order.
pub type Row = Vec<Value>;

/// Produces the values of one row from its sequence number and the run's
/// random source. Called once per row; rows do not depend on each other.
pub trait RowGenerator {
    fn generate(&self, sequence: u64, rng: &mut StdRng) -> Row;
}

impl<F> RowGenerator for F
where
    F: Fn(u64, &mut StdRng) -> Row,
{
    fn generate(&self, sequence: u64, rng: &mut StdRng) -> Row {
        self(sequence, rng)
    }
}

/// Insert `row_count` generated rows into `schema`'s table.
///
/// All rows go through one prepared statement inside a single transaction
/// that is committed once at the end. On failure the transaction is dropped
/// and rolled back, so the table keeps whatever it held before the call.
/// Returns the number of rows inserted.
pub fn load_rows(
    conn: &mut Connection,
    schema: &Schema,
    row_count: u64,
    generator: &dyn RowGenerator,
    rng: &mut StdRng,
) -> Result<u64> {
    let load_error = |stage: String, source: rusqlite::Error| BenchError::Load {
        table: schema.table.clone(),
        stage,
        source,
    };

    let tx = conn
        .transaction()
        .map_err(|e| load_error("begin transaction".to_string(), e))?;

    {
        let sql = schema.insert_sql();
        let mut stmt = tx
            .prepare(&sql)
            .map_err(|e| load_error("prepare insert".to_string(), e))?;

        for sequence in 0..row_count {
            let row = generator.generate(sequence, rng);
            stmt.execute(params_from_iter(row.iter()))
                .map_err(|e| load_error(format!("row {sequence}"), e))?;
        }
    }

    tx.commit()
        .map_err(|e| load_error("commit".to_string(), e))?;

    Ok(row_count)
}
