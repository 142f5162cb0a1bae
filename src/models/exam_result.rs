// src/models/exam_result.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::{config::MAX_ANSWER_LENGTH, scoring::Grade};

/// Represents the 'exam_results' table in the database.
/// One row per (student, exam); written once at submission time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub student_id: i64,
    pub exam_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    /// The raw submission, kept for auditing.
    pub answers: Json<Vec<SubmittedAnswer>>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub submit_time: chrono::DateTime<chrono::Utc>,
}

/// A single (question number, chosen option) pair.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmittedAnswer {
    #[validate(range(min = 1, message = "Question number must be positive"))]
    pub question_number: i32,
    #[validate(length(min = 1, max = MAX_ANSWER_LENGTH))]
    pub answer: String,
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    #[validate(nested)]
    #[validate(custom(function = validate_unique_answers))]
    pub answers: Vec<SubmittedAnswer>,
}

fn validate_unique_answers(answers: &[SubmittedAnswer]) -> Result<(), validator::ValidationError> {
    let mut seen = std::collections::HashSet::new();
    if answers.iter().all(|a| seen.insert(a.question_number)) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("duplicate_question_number"))
    }
}

/// Response after a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub grade: Grade,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub submit_time: chrono::DateTime<chrono::Utc>,
}

/// A result joined with its student, as fed to the ranking.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResultRow {
    pub id: i64,
    pub student_id: i64,
    pub nisn: String,
    pub student_name: String,
    pub student_class: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub submit_time: chrono::DateTime<chrono::Utc>,
}

/// A result joined with its student and exam, for the cross-exam listing.
#[derive(Debug, Serialize, FromRow)]
pub struct ResultOverviewRow {
    pub id: i64,
    pub exam_id: i64,
    pub exam_code: String,
    pub exam_title: String,
    pub nisn: String,
    pub student_name: String,
    pub student_class: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub submit_time: chrono::DateTime<chrono::Utc>,
}
