//! Planner and index inspection helpers.

use crate::error::{BenchError, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};

/// Detail lines of `EXPLAIN QUERY PLAN` for `sql` bound with `params`,
/// e.g. `SEARCH employees USING INDEX idx_name (name>? AND name<?)`.
pub fn explain_query_plan(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<String>> {
    let explain = format!("EXPLAIN QUERY PLAN {sql}");
    let mut stmt = conn
        .prepare(&explain)
        .map_err(|e| BenchError::query(&explain, e))?;
    let details = stmt
        .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(3))
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>())
        .map_err(|e| BenchError::query(&explain, e))?;
    Ok(details)
}

/// Whether any plan line searches or scans through `index`.
pub fn plan_uses_index(plan: &[String], index: &str) -> bool {
    plan.iter().any(|line| {
        line.split_whitespace()
            .skip_while(|word| *word != "INDEX")
            .nth(1)
            == Some(index)
    })
}

/// Whether any plan line is a full scan of `table` without an index.
pub fn plan_scans_table(plan: &[String], table: &str) -> bool {
    plan.iter().any(|line| {
        let words: Vec<&str> = line.split_whitespace().collect();
        words.first() == Some(&"SCAN")
            && words.get(1) == Some(&table)
            && !words.contains(&"INDEX")
    })
}

/// Exact number of entries stored in `index`.
///
/// Runs `ANALYZE` on the index and reads the first figure of its
/// `sqlite_stat1` row, which is the entry count of the index b-tree. For a
/// partial index that is the number of rows matching its predicate. An
/// index without a stat row (nothing to analyze) counts as empty.
///
/// `ANALYZE` feeds the query planner, so call this after timing, not before.
pub fn index_entry_count(conn: &Connection, index: &str) -> Result<u64> {
    let analyze = format!("ANALYZE {index}");
    conn.execute_batch(&analyze)
        .map_err(|e| BenchError::query(&analyze, e))?;

    const STAT_SQL: &str = "SELECT stat FROM sqlite_stat1 WHERE idx = ?1";
    let stat: Option<String> = conn
        .query_row(STAT_SQL, [index], |row| row.get::<_, Option<String>>(0))
        .optional()
        .map_err(|e| BenchError::query(STAT_SQL, e))?
        .flatten();

    Ok(stat
        .as_deref()
        .and_then(|s| s.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn recognises_index_searches() {
        let p = plan(&["SEARCH employees USING INDEX idx_employee_name (name>? AND name<?)"]);
        assert!(plan_uses_index(&p, "idx_employee_name"));
        assert!(!plan_uses_index(&p, "idx_employee"));
        assert!(!plan_scans_table(&p, "employees"));
    }

    #[test]
    fn recognises_covering_index_searches() {
        let p = plan(&["SEARCH t USING COVERING INDEX idx_t (a=?)"]);
        assert!(plan_uses_index(&p, "idx_t"));
    }

    #[test]
    fn recognises_full_scans() {
        let p = plan(&["SCAN employees"]);
        assert!(plan_scans_table(&p, "employees"));
        assert!(!plan_uses_index(&p, "idx_employee_name"));

        let p = plan(&["SCAN employees USING INDEX idx_employee_name"]);
        assert!(!plan_scans_table(&p, "employees"));
    }

    #[test]
    fn explains_real_queries() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a BIGINT, b BIGINT);
             CREATE INDEX idx_t_a ON t(a);",
        )
        .unwrap();

        let by_a = explain_query_plan(&conn, "SELECT * FROM t WHERE a = ?", &[Value::Integer(1)])
            .unwrap();
        assert!(plan_uses_index(&by_a, "idx_t_a"), "{by_a:?}");

        let by_b = explain_query_plan(&conn, "SELECT * FROM t WHERE b = ?", &[Value::Integer(1)])
            .unwrap();
        assert!(plan_scans_table(&by_b, "t"), "{by_b:?}");
    }

    #[test]
    fn counts_index_entries() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a BIGINT, flag TEXT);
             CREATE INDEX idx_all ON t(a);
             CREATE INDEX idx_flagged ON t(a) WHERE flag = 'N';
             INSERT INTO t VALUES (1, 'N'), (2, 'Y'), (3, 'N'), (4, 'Y'), (5, 'Y');",
        )
        .unwrap();

        assert_eq!(index_entry_count(&conn, "idx_all").unwrap(), 5);
        assert_eq!(index_entry_count(&conn, "idx_flagged").unwrap(), 2);
    }
}
