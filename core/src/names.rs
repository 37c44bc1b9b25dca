use rand::Rng;
use std::ops::RangeInclusive;

/// Build a string of `length` characters drawn uniformly (with replacement)
/// from `alphabet`. An empty alphabet yields an empty string.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Random birth date formatted as `YYYY-M-D` (month and day are not
/// zero-padded). Days stop at 28 so every month is valid.
pub fn random_birth_date<R: Rng + ?Sized>(rng: &mut R, years: &RangeInclusive<i32>) -> String {
    let year = rng.gen_range(years.clone());
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    format!("{year}-{month}-{day}")
}

/// Uniform id in `1..=max_id`. `max_id` below 1 is treated as 1.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R, max_id: i64) -> i64 {
    rng.gen_range(1..=max_id.max(1))
}
