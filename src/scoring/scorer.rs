// src/scoring/scorer.rs

use std::collections::HashMap;

use serde::Serialize;

use super::{Grade, rounded_percentage};
use crate::models::{answer_key::AnswerKey, exam_result::SubmittedAnswer};

/// Result of scoring one submission against an exam's answer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    /// Number of answer keys the exam had at scoring time.
    pub total_questions: i32,
    pub correct_answers: i32,
    /// 0..=100
    pub score: i32,
    pub grade: Grade,
}

impl ScoreOutcome {
    pub fn wrong_answers(&self) -> i32 {
        self.total_questions - self.correct_answers
    }
}

/// Scores a submission against the exam's answer keys.
///
/// Walks the keys, not the answers: a key with no matching answer counts as
/// wrong, and an answer whose question number has no key is ignored.
/// Options match only on exact, case-sensitive equality.
pub fn score_submission(keys: &[AnswerKey], answers: &[SubmittedAnswer]) -> ScoreOutcome {
    let submitted: HashMap<i32, &str> = answers
        .iter()
        .map(|a| (a.question_number, a.answer.as_str()))
        .collect();

    let correct = keys
        .iter()
        .filter(|key| submitted.get(&key.question_number) == Some(&key.correct_answer.as_str()))
        .count();

    let total = keys.len();
    let score = rounded_percentage(correct as i64, total as i64);

    ScoreOutcome {
        total_questions: total as i32,
        correct_answers: correct as i32,
        score,
        grade: Grade::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(i32, &str)]) -> Vec<AnswerKey> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (n, a))| AnswerKey {
                id: i as i64 + 1,
                exam_id: 1,
                question_number: *n,
                correct_answer: a.to_string(),
                created_at: None,
            })
            .collect()
    }

    fn answers(pairs: &[(i32, &str)]) -> Vec<SubmittedAnswer> {
        pairs
            .iter()
            .map(|(n, a)| SubmittedAnswer {
                question_number: *n,
                answer: a.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_score_perfect() {
        let k = keys(&[(1, "A"), (2, "B"), (3, "C")]);
        let s = answers(&[(1, "A"), (2, "B"), (3, "C")]);

        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.correct_answers, 3);
        assert_eq!(outcome.total_questions, 3);
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.grade, Grade::A);
    }

    #[test]
    fn test_score_zero() {
        let k = keys(&[(1, "A"), (2, "B")]);
        let s = answers(&[(1, "D"), (2, "D")]);

        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.correct_answers, 0);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.wrong_answers(), 2);
        assert_eq!(outcome.grade, Grade::E);
    }

    #[test]
    fn test_score_without_keys_is_zero() {
        let outcome = score_submission(&[], &answers(&[(1, "A")]));
        assert_eq!(outcome.total_questions, 0);
        assert_eq!(outcome.correct_answers, 0);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_unanswered_questions_count_as_wrong() {
        let k = keys(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")]);
        let s = answers(&[(1, "A"), (3, "C")]);

        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.correct_answers, 2);
        assert_eq!(outcome.total_questions, 4);
        assert_eq!(outcome.score, 50);
    }

    #[test]
    fn test_answers_without_keys_are_ignored() {
        let k = keys(&[(1, "A")]);
        let s = answers(&[(1, "A"), (2, "B"), (99, "C")]);

        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.correct_answers, 1);
        assert_eq!(outcome.total_questions, 1);
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let k = keys(&[(1, "A"), (2, "Jakarta")]);
        let s = answers(&[(1, "a"), (2, "jakarta")]);

        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.correct_answers, 0);
    }

    #[test]
    fn test_matching_does_not_trim() {
        let k = keys(&[(1, "A")]);
        let s = answers(&[(1, "A ")]);

        assert_eq!(score_submission(&k, &s).correct_answers, 0);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        // 2 of 3 correct = 66.67%
        let k = keys(&[(1, "A"), (2, "B"), (3, "C")]);
        let s = answers(&[(1, "A"), (2, "B"), (3, "X")]);
        assert_eq!(score_submission(&k, &s).score, 67);

        // 7 of 8 correct = 87.5%, rounds up
        let k = keys(&[
            (1, "A"),
            (2, "A"),
            (3, "A"),
            (4, "A"),
            (5, "A"),
            (6, "A"),
            (7, "A"),
            (8, "A"),
        ]);
        let s = answers(&[
            (1, "A"),
            (2, "A"),
            (3, "A"),
            (4, "A"),
            (5, "A"),
            (6, "A"),
            (7, "A"),
            (8, "B"),
        ]);
        let outcome = score_submission(&k, &s);
        assert_eq!(outcome.score, 88);
        assert_eq!(outcome.grade, Grade::B);
    }

    #[test]
    fn test_score_always_within_bounds() {
        let k = keys(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "A"), (6, "B"), (7, "C")]);
        let options = ["A", "B", "C", "D"];

        for seed in 0..64usize {
            let s: Vec<SubmittedAnswer> = (1..=7)
                .map(|n| SubmittedAnswer {
                    question_number: n,
                    answer: options[(seed * 7 + n as usize * 3) % options.len()].to_string(),
                })
                .collect();
            let outcome = score_submission(&k, &s);
            assert!((0..=100).contains(&outcome.score));
            assert!(outcome.correct_answers <= outcome.total_questions);
        }
    }
}
