// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{config::MAX_EXAM_DURATION_MINUTES, utils::validation::validate_exam_code};

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,

    /// Short code students type in to open the exam.
    pub code: String,

    pub title: String,

    pub description: Option<String>,

    /// Time allowed, in minutes.
    pub duration_minutes: i32,

    /// Public path of the uploaded question sheet, if any.
    pub pdf_url: Option<String>,

    /// Owning teacher.
    pub teacher_id: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Exam row joined with its teacher and child counts, for listings.
#[derive(Debug, Serialize, FromRow)]
pub struct ExamListItem {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub pdf_url: Option<String>,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub question_count: i64,
    pub result_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Validated text fields of the multipart exam upload form.
#[derive(Debug, Default, Validate)]
pub struct NewExam {
    #[validate(custom(function = validate_exam_code))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = MAX_EXAM_DURATION_MINUTES))]
    pub duration_minutes: i32,
}

/// Exam info shown to a student once the exam has started.
#[derive(Debug, Serialize)]
pub struct StudentExamView {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub pdf_url: Option<String>,
}

impl From<Exam> for StudentExamView {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id,
            code: exam.code,
            title: exam.title,
            description: exam.description,
            duration_minutes: exam.duration_minutes,
            pdf_url: exam.pdf_url,
        }
    }
}
