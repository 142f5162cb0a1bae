// src/scoring/mod.rs

//! Exam scoring and result aggregation.
//!
//! Everything here is a pure function over records already fetched from the
//! database; handlers own persistence.

pub mod aggregate;
pub mod grade;
pub mod scorer;

pub use aggregate::{RankedResult, ResultSummary, rank_results, summarize};
pub use grade::Grade;
pub use scorer::{ScoreOutcome, score_submission};

/// `round(100 * part / whole)` with halves rounded up, in integer arithmetic.
/// Returns 0 when `whole` is 0.
pub(crate) fn rounded_percentage(part: i64, whole: i64) -> i32 {
    if whole <= 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as i32
}

/// Integer mean rounded half up. Returns 0 for an empty input.
pub(crate) fn rounded_mean(sum: i64, count: i64) -> i32 {
    if count <= 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as i32
}
