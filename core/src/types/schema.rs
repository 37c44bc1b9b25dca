use std::collections::HashSet;
use thiserror::Error;

/// Semantic column type, rendered as the SQL type name used in `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Date,
    /// Fixed-width character column, e.g. `CHARACTER(1)`.
    Char(u8),
}

impl ColumnType {
    pub fn sql(self) -> String {
        match self {
            ColumnType::Integer => "BIGINT".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Char(width) => format!("CHARACTER({width})"),
        }
    }
}

/// Collating sequence applied to the columns of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collation {
    NoCase,
}

impl Collation {
    pub fn as_sql(self) -> &'static str {
        match self {
            Collation::NoCase => "NOCASE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// An index over one or more columns of a table.
///
/// `collation` is applied to every indexed column. `predicate` turns the
/// index into a partial index that only holds rows matching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
    pub collation: Option<Collation>,
    pub predicate: Option<String>,
}

impl IndexDef {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            collation: None,
            predicate: None,
        }
    }

    pub fn collate(mut self, collation: Collation) -> Self {
        self.collation = Some(collation);
        self
    }

    pub fn filter(mut self, predicate: &str) -> Self {
        self.predicate = Some(predicate.to_string());
        self
    }

    pub fn is_partial(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn create_sql(&self, table: &str) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| match self.collation {
                Some(collation) => format!("{column} COLLATE {}", collation.as_sql()),
                None => column.clone(),
            })
            .collect();

        let mut sql = format!(
            "CREATE INDEX {} ON {}({})",
            self.name,
            table,
            columns.join(", ")
        );
        if let Some(predicate) = &self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        sql
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP INDEX IF EXISTS {}", self.name)
    }
}

/// Reasons a [`Schema`] cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("table declares no columns")]
    NoColumns,

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("index '{0}' is declared more than once")]
    DuplicateIndex(String),

    #[error("index '{0}' lists no columns")]
    EmptyIndex(String),

    #[error("index '{index}' references undeclared column '{column}'")]
    UnknownColumn { index: String, column: String },
}

/// A table definition: name, ordered columns and the indexes built on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub table: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<IndexDef>,
}

impl Schema {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, column_type: ColumnType) -> Self {
        self.columns.push(Column {
            name: name.to_string(),
            column_type,
        });
        self
    }

    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Check that the table has columns and every index only references
    /// declared ones.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        if self.columns.is_empty() {
            return Err(SchemaViolation::NoColumns);
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaViolation::DuplicateColumn(column.name.clone()));
            }
        }

        let mut index_names = HashSet::new();
        for index in &self.indexes {
            if !index_names.insert(index.name.as_str()) {
                return Err(SchemaViolation::DuplicateIndex(index.name.clone()));
            }
            if index.columns.is_empty() {
                return Err(SchemaViolation::EmptyIndex(index.name.clone()));
            }
            if let Some(column) = index.columns.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(SchemaViolation::UnknownColumn {
                    index: index.name.clone(),
                    column: column.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table)
    }

    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.column_type.sql()))
            .collect();
        format!("CREATE TABLE {} ({})", self.table, columns.join(", "))
    }

    /// Positional insert covering every column, e.g.
    /// `INSERT INTO t VALUES (?, ?, ?)`.
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!("INSERT INTO {} VALUES ({})", self.table, placeholders)
    }
}
