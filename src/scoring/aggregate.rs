// src/scoring/aggregate.rs

use serde::Serialize;

use super::{Grade, rounded_mean};
use crate::models::exam_result::ResultRow;

/// Summary statistics over every result of one exam.
/// All fields are 0 when nobody has submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub participants: i64,
    pub average_score: i32,
    pub highest_score: i32,
    pub lowest_score: i32,
}

/// A result placed in the exam ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub grade: Grade,
    pub wrong_answers: i32,
    #[serde(flatten)]
    pub result: ResultRow,
}

pub fn summarize<I>(scores: I) -> ResultSummary
where
    I: IntoIterator<Item = i32>,
{
    let mut participants = 0i64;
    let mut sum = 0i64;
    let mut highest: Option<i32> = None;
    let mut lowest: Option<i32> = None;

    for score in scores {
        participants += 1;
        sum += score as i64;
        highest = Some(highest.map_or(score, |h| h.max(score)));
        lowest = Some(lowest.map_or(score, |l| l.min(score)));
    }

    ResultSummary {
        participants,
        average_score: rounded_mean(sum, participants),
        highest_score: highest.unwrap_or(0),
        lowest_score: lowest.unwrap_or(0),
    }
}

/// Orders results by score descending, then student name ascending, and
/// attaches rank, grade and wrong-answer count.
///
/// Equal score and name fall back to result id so the order is stable
/// across requests. Ties still get distinct, consecutive ranks.
pub fn rank_results(mut rows: Vec<ResultRow>) -> Vec<RankedResult> {
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then_with(|| a.id.cmp(&b.id))
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, result)| RankedResult {
            rank: i + 1,
            grade: Grade::from_score(result.score),
            wrong_answers: result.total_questions - result.correct_answers,
            result,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, score: i32) -> ResultRow {
        ResultRow {
            id,
            student_id: id,
            nisn: format!("00{}", id),
            student_name: name.to_string(),
            student_class: "XII IPA 1".to_string(),
            score,
            total_questions: 10,
            correct_answers: score / 10,
            submit_time: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_summary_of_three() {
        let summary = summarize([90, 80, 70]);
        assert_eq!(summary.participants, 3);
        assert_eq!(summary.average_score, 80);
        assert_eq!(summary.highest_score, 90);
        assert_eq!(summary.lowest_score, 70);
    }

    #[test]
    fn test_summary_of_nobody_is_zero() {
        let summary = summarize(Vec::<i32>::new());
        assert_eq!(
            summary,
            ResultSummary {
                participants: 0,
                average_score: 0,
                highest_score: 0,
                lowest_score: 0,
            }
        );
    }

    #[test]
    fn test_summary_average_rounds() {
        // (85 + 86) / 2 = 85.5
        assert_eq!(summarize([85, 86]).average_score, 86);
        // (70 + 70 + 71) / 3 = 70.33
        assert_eq!(summarize([70, 70, 71]).average_score, 70);
    }

    #[test]
    fn test_summary_single_zero_score() {
        let summary = summarize([0]);
        assert_eq!(summary.participants, 1);
        assert_eq!(summary.highest_score, 0);
        assert_eq!(summary.lowest_score, 0);
    }

    #[test]
    fn test_rank_orders_by_score_then_name() {
        let ranked = rank_results(vec![
            row(1, "Citra", 70),
            row(2, "Budi", 90),
            row(3, "Andi", 70),
            row(4, "Dewi", 100),
        ]);

        let names: Vec<&str> = ranked.iter().map(|r| r.result.student_name.as_str()).collect();
        assert_eq!(names, vec!["Dewi", "Budi", "Andi", "Citra"]);

        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_tie_break_is_lexicographic() {
        let ranked = rank_results(vec![row(1, "bella", 80), row(2, "Zaki", 80)]);
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(ranked[0].result.student_name, "Zaki");
        assert_eq!(ranked[1].result.student_name, "bella");
    }

    #[test]
    fn test_rank_attaches_grade_and_wrong_count() {
        let ranked = rank_results(vec![row(1, "Andi", 60), row(2, "Budi", 59)]);

        assert_eq!(ranked[0].grade, Grade::D);
        assert_eq!(ranked[0].wrong_answers, 4);
        assert_eq!(ranked[1].grade, Grade::E);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_results(Vec::new()).is_empty());
    }

    #[test]
    fn test_ranked_result_flattens_row() {
        let ranked = rank_results(vec![row(7, "Andi", 90)]);
        let json = serde_json::to_value(&ranked[0]).unwrap();

        assert_eq!(json["rank"], 1);
        assert_eq!(json["grade"], "A");
        assert_eq!(json["student_name"], "Andi");
        assert_eq!(json["score"], 90);
    }
}
