//! Net score arithmetic.
//!
//! A net score is `correct - wrong / 4`: four wrong answers cancel one right
//! answer. Every function here is total; malformed input scores as zero.

use crate::model::ExamRecord;

/// Points awarded per correct answer.
pub const CORRECT_POINTS: f64 = 1.0;

/// Points deducted per wrong answer.
pub const WRONG_PENALTY: f64 = 0.25;

/// Rounds to 2 decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coerces free-form input into an answer count.
///
/// Leading whitespace and a leading sign are accepted, then the longest run
/// of ASCII digits is read (`"12abc"` is 12). Empty, non-numeric and negative
/// input all yield 0; values past `u32::MAX` saturate.
#[must_use]
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let digits = &rest[..len];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Net score for one subject, rounded to 2 decimals. May be negative.
#[must_use]
pub fn net_score(correct: u32, wrong: u32) -> f64 {
    round2(f64::from(correct) * CORRECT_POINTS - f64::from(wrong) * WRONG_PENALTY)
}

/// [`net_score`] over raw form text.
#[must_use]
pub fn net_score_raw(correct: &str, wrong: &str) -> f64 {
    net_score(parse_count(correct), parse_count(wrong))
}

/// Sum of every result entry's net, regardless of nesting.
///
/// Results are keyed flat by dotted path, so this is a plain sum. Legacy
/// entries contribute their stored net. No results means a total of 0.
#[must_use]
pub fn total_net(record: &ExamRecord) -> f64 {
    round2(record.results().values().map(|result| result.net()).sum())
}
