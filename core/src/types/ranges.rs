use crate::constants;
use std::ops::RangeInclusive;

/// Ranges and alphabets used when generating synthetic rows and query
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRanges {
    /// Subsidiary ids are drawn from `1..=max_subsidiary_id`.
    pub max_subsidiary_id: i64,
    pub birth_years: RangeInclusive<i32>,
    pub name_alphabet: &'static str,
    pub name_length: usize,
    pub message_alphabet: &'static str,
    pub message_length: usize,
    pub receiver_alphabet: &'static str,
    pub receiver_length: usize,
    /// Expected number of unprocessed messages per load. A row is marked
    /// unprocessed when a draw from `0..=row_count` falls below this value.
    pub expected_unprocessed: u64,
}

impl Default for ValueRanges {
    fn default() -> Self {
        Self {
            max_subsidiary_id: constants::MAX_SUBSIDIARY_ID,
            birth_years: constants::BIRTH_YEAR_MIN..=constants::BIRTH_YEAR_MAX,
            name_alphabet: constants::NAME_ALPHABET,
            name_length: constants::NAME_LENGTH,
            message_alphabet: constants::MESSAGE_ALPHABET,
            message_length: constants::MESSAGE_LENGTH,
            receiver_alphabet: constants::RECEIVER_ALPHABET,
            receiver_length: constants::RECEIVER_LENGTH,
            expected_unprocessed: constants::EXPECTED_UNPROCESSED,
        }
    }
}

impl ValueRanges {
    /// Describe the first range that cannot be sampled from, if any.
    pub fn problem(&self) -> Option<String> {
        if self.max_subsidiary_id < 1 {
            return Some(format!(
                "max_subsidiary_id must be at least 1, got {}",
                self.max_subsidiary_id
            ));
        }
        if self.birth_years.is_empty() {
            return Some(format!("birth_years {:?} is empty", self.birth_years));
        }
        for (label, alphabet) in [
            ("name_alphabet", self.name_alphabet),
            ("message_alphabet", self.message_alphabet),
            ("receiver_alphabet", self.receiver_alphabet),
        ] {
            if alphabet.is_empty() {
                return Some(format!("{label} is empty"));
            }
        }
        None
    }
}
