//! Connection setup and table/index creation.

use crate::error::{BenchError, Result};
use bench_core::types::Schema;
use rusqlite::Connection;

/// Settings applied to every benchmark connection: no fsync, temp b-trees
/// in memory.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    const PRAGMAS: &str = "PRAGMA synchronous = OFF;
         PRAGMA temp_store = MEMORY;";
    conn.execute_batch(PRAGMAS)
        .map_err(|e| BenchError::query(PRAGMAS, e))
}

/// Drop and recreate `schema`'s table along with all of its indexes.
///
/// The schema is validated first; nothing touches the database when an
/// index references an undeclared column. Index names are global in SQLite,
/// so each index is also dropped by name in case another table owns it.
pub fn create_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    schema.validate().map_err(|source| BenchError::Schema {
        table: schema.table.clone(),
        source,
    })?;

    execute_ddl(conn, &schema.drop_table_sql())?;
    execute_ddl(conn, &schema.create_table_sql())?;

    for index in &schema.indexes {
        execute_ddl(conn, &index.drop_sql())?;
        execute_ddl(conn, &index.create_sql(&schema.table))?;
    }

    Ok(())
}

fn execute_ddl(conn: &Connection, sql: &str) -> Result<()> {
    log::debug!("{sql}");
    conn.execute(sql, [])
        .map(|_| ())
        .map_err(|e| BenchError::query(sql, e))
}

/// Names of the indexes SQLite reports for `table`, sorted.
pub fn index_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    const SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 ORDER BY name";
    let mut stmt = conn.prepare(SQL).map_err(|e| BenchError::query(SQL, e))?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>())
        .map_err(|e| BenchError::query(SQL, e))?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::types::{Collation, ColumnType, IndexDef};

    fn messages() -> Schema {
        Schema::new("messages")
            .column("message_id", ColumnType::Integer)
            .column("receiver", ColumnType::Text)
            .column("processed", ColumnType::Char(1))
    }

    fn open() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        configure_connection(&conn).expect("configure");
        conn
    }

    #[test]
    fn creates_table_and_indexes() {
        let conn = open();
        let schema = messages()
            .index(IndexDef::new("idx_receiver_nocase", &["receiver"]).collate(Collation::NoCase))
            .index(IndexDef::new("idx_pending", &["receiver"]).filter("processed = 'N'"));
        create_schema(&conn, &schema).unwrap();

        assert_eq!(
            index_names(&conn, "messages").unwrap(),
            vec!["idx_pending".to_string(), "idx_receiver_nocase".to_string()]
        );
    }

    #[test]
    fn recreating_drops_old_rows() {
        let conn = open();
        let schema = messages();
        create_schema(&conn, &schema).unwrap();
        conn.execute("INSERT INTO messages VALUES (1, 'abcd', 'N')", [])
            .unwrap();

        create_schema(&conn, &schema).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn index_name_owned_by_another_table_is_moved() {
        let conn = open();
        let index = IndexDef::new("idx_receiver", &["receiver"]);
        let first = messages().index(index.clone());
        let mut second = messages().index(index);
        second.table = "messages_copy".to_string();

        create_schema(&conn, &first).unwrap();
        create_schema(&conn, &second).unwrap();

        assert!(index_names(&conn, "messages").unwrap().is_empty());
        assert_eq!(
            index_names(&conn, "messages_copy").unwrap(),
            vec!["idx_receiver".to_string()]
        );
    }

    #[test]
    fn undeclared_index_column_is_a_schema_error() {
        let conn = open();
        let schema = messages().index(IndexDef::new("idx_bad", &["sender"]));
        let err = create_schema(&conn, &schema).unwrap_err();
        assert!(matches!(err, BenchError::Schema { .. }), "got {err:?}");

        // Validation runs before any DDL.
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }
}
