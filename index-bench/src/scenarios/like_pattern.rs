//! `LIKE` queries against a `NOCASE` index on `name`.
//!
//! SQLite can turn a `LIKE` with a fixed prefix into a range search on a
//! case-insensitive index; everything after the first wildcard is checked
//! row by row. The longer the fixed prefix, the fewer rows remain to check.
//! A leading wildcard makes the index useless.

use super::{Scenario, TableSpec};
use crate::config::{BenchConfig, LikeBinding};
use crate::harness::QueryCase;
use crate::populate::Row;
use bench_core::constants::{
    LIKE_PATTERNS, LIKE_PATTERN_DATABASE, LIKE_PATTERN_QUERY_COUNT, LIKE_PATTERN_ROW_COUNT,
};
use bench_core::names::{random_birth_date, random_id, random_string};
use bench_core::types::{Collation, ColumnType, IndexDef, Schema};
use rand::rngs::StdRng;
use rusqlite::types::Value;

pub const TABLE: &str = "employees";
pub const ID_INDEX: &str = "idx_employee_id_subsidiary_id";
pub const NAME_INDEX: &str = "idx_employee_name";

pub struct LikePattern;

impl LikePattern {
    pub fn schema() -> Schema {
        Schema::new(TABLE)
            .column("employee_id", ColumnType::Integer)
            .column("name", ColumnType::Text)
            .column("subsidiary_id", ColumnType::Integer)
            .column("birth_date", ColumnType::Date)
            .index(IndexDef::new(ID_INDEX, &["employee_id", "subsidiary_id"]))
            .index(IndexDef::new(NAME_INDEX, &["name"]).collate(Collation::NoCase))
    }

    /// Query case for one pattern.
    ///
    /// With [`LikeBinding::Literal`] the pattern is spliced into the SQL text
    /// unescaped; the patterns are compile-time constants, never user input.
    pub fn case(pattern: &str, binding: LikeBinding) -> QueryCase {
        match binding {
            LikeBinding::Literal => QueryCase::fixed(
                pattern,
                TABLE,
                &format!("SELECT * FROM {TABLE} WHERE name LIKE '{pattern}'"),
                Vec::new(),
            ),
            LikeBinding::Bound => QueryCase::fixed(
                pattern,
                TABLE,
                &format!("SELECT * FROM {TABLE} WHERE name LIKE ?"),
                vec![Value::Text(pattern.to_string())],
            ),
        }
    }
}

impl Scenario for LikePattern {
    fn name(&self) -> &'static str {
        "like-pattern"
    }

    fn description(&self) -> &'static str {
        "LIKE with long prefix, short prefix and leading wildcard against a NOCASE index"
    }

    fn default_config(&self) -> BenchConfig {
        BenchConfig::new(
            LIKE_PATTERN_DATABASE,
            LIKE_PATTERN_ROW_COUNT,
            LIKE_PATTERN_QUERY_COUNT,
        )
    }

    fn tables(&self, config: &BenchConfig) -> Vec<TableSpec> {
        let ranges = config.ranges.clone();
        let generator = move |sequence: u64, rng: &mut StdRng| -> Row {
            let name = random_string(rng, ranges.name_alphabet, ranges.name_length);
            vec![
                Value::Integer(sequence as i64),
                Value::Text(name),
                Value::Integer(random_id(rng, ranges.max_subsidiary_id)),
                Value::Text(random_birth_date(rng, &ranges.birth_years)),
            ]
        };
        vec![TableSpec::new(Self::schema(), generator)]
    }

    fn queries(&self, config: &BenchConfig) -> Vec<QueryCase> {
        LIKE_PATTERNS
            .iter()
            .map(|pattern| Self::case(pattern, config.like_binding))
            .collect()
    }

    fn notes(&self) -> &'static [&'static str] {
        &[
            "abc%lm should be fastest: the index narrows the search to names starting with 'abc'.",
            "a%jklm is slower: only the 'a' prefix comes from the index, the rest is scanned.",
            "%ijklm is slowest: a leading wildcard rules out the index and every row is scanned.",
        ]
    }
}

/// Evaluate a `LIKE` pattern the way SQLite does by default: `%` matches any
/// run of characters, `_` exactly one, and ASCII letters compare without
/// regard to case.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last '%' seen and the text position it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len()
            && (pattern[p] == '_' || pattern[p].eq_ignore_ascii_case(&text[t]))
        {
            p += 1;
            t += 1;
        } else if let Some((star, tried)) = backtrack {
            p = star + 1;
            t = tried + 1;
            backtrack = Some((star, tried + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_bound_cases_differ_only_in_binding() {
        let literal = LikePattern::case("abc%lm", LikeBinding::Literal);
        assert_eq!(
            literal.sql,
            "SELECT * FROM employees WHERE name LIKE 'abc%lm'"
        );

        let bound = LikePattern::case("abc%lm", LikeBinding::Bound);
        assert_eq!(bound.sql, "SELECT * FROM employees WHERE name LIKE ?");
        assert_eq!(bound.label, literal.label);
    }

    #[test]
    fn name_index_is_case_insensitive() {
        let schema = LikePattern::schema();
        let name_index = schema
            .indexes
            .iter()
            .find(|i| i.name == NAME_INDEX)
            .expect("name index");
        assert_eq!(name_index.collation, Some(Collation::NoCase));
    }

    #[test]
    fn percent_matches_any_run() {
        assert!(like_matches("abc%lm", "abcdefghlm"));
        assert!(like_matches("abc%lm", "abclm"));
        assert!(!like_matches("abc%lm", "abcdefghl"));
        assert!(like_matches("%ijklm", "aaaaaijklm"));
        assert!(!like_matches("%ijklm", "ijklmaaaaa"));
        assert!(like_matches("a%jklm", "ajklm"));
        assert!(like_matches("%", ""));
        assert!(like_matches("%%", "anything"));
    }

    #[test]
    fn underscore_matches_exactly_one() {
        assert!(like_matches("a_c", "abc"));
        assert!(!like_matches("a_c", "ac"));
        assert!(!like_matches("a_c", "abbc"));
    }

    #[test]
    fn ascii_case_is_ignored() {
        assert!(like_matches("ABC%", "abcdef"));
        assert!(like_matches("abc%", "ABCDEF"));
    }

    #[test]
    fn backtracks_across_repeated_suffixes() {
        assert!(like_matches("%lm", "lmlmlm"));
        assert!(like_matches("a%a%a", "aaa"));
        assert!(!like_matches("a%a%a", "aa"));
    }
}
