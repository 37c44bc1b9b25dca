//! Default tunables for the benchmark scenarios.
//!
//! Every scenario starts from these values; the runner may override the
//! database path, row count, query count and seed from the environment.

// =============================================================================
// basic-index: no index vs (employee_id, subsidiary_id)
// =============================================================================

pub const BASIC_INDEX_DATABASE: &str = "index.db";
pub const BASIC_INDEX_ROW_COUNT: u64 = 1_000_000;
pub const BASIC_INDEX_QUERY_COUNT: usize = 1_000;
pub const BASIC_INDEX_MAX_SUBSIDIARY_ID: i64 = 100;

// =============================================================================
// composite-index-order: (employee_id, subsidiary_id) vs (subsidiary_id, employee_id)
// =============================================================================

pub const COMPOSITE_ORDER_DATABASE: &str = "example2.db";
pub const COMPOSITE_ORDER_ROW_COUNT: u64 = 1_000_000;
pub const COMPOSITE_ORDER_QUERY_COUNT: usize = 1_000;

// =============================================================================
// like-pattern: LIKE against a NOCASE index on name
// =============================================================================

pub const LIKE_PATTERN_DATABASE: &str = "index_like_query_perf.db";
pub const LIKE_PATTERN_ROW_COUNT: u64 = 3_000_000;
pub const LIKE_PATTERN_QUERY_COUNT: usize = 100;

/// Patterns timed by the like-pattern scenario, most selective prefix first.
pub const LIKE_PATTERNS: [&str; 3] = ["abc%lm", "a%jklm", "%ijklm"];

// =============================================================================
// partial-index: full (receiver, processed) vs partial (receiver) WHERE processed = 'N'
// =============================================================================

pub const PARTIAL_INDEX_DATABASE: &str = "partial_index.db";
pub const PARTIAL_INDEX_ROW_COUNT: u64 = 2_000_000;
pub const PARTIAL_INDEX_QUERY_COUNT: usize = 100;

// =============================================================================
// Random value ranges
// =============================================================================

pub const MAX_SUBSIDIARY_ID: i64 = 100_000;
pub const BIRTH_YEAR_MIN: i32 = 1975;
pub const BIRTH_YEAR_MAX: i32 = 1980;

pub const NAME_ALPHABET: &str = "abcdefghijklm";
pub const NAME_LENGTH: usize = 10;

pub const MESSAGE_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
pub const MESSAGE_LENGTH: usize = 16;

pub const RECEIVER_ALPHABET: &str = "abcdef";
pub const RECEIVER_LENGTH: usize = 4;

/// Approximate number of unprocessed ('N') messages per load, independent
/// of the row count.
pub const EXPECTED_UNPROCESSED: u64 = 1_000;
