// src/models/exam_attempt.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'exam_attempts' table in the database.
/// Written on a student's first start; its window never moves afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamAttempt {
    pub id: i64,
    pub student_id: i64,
    pub exam_id: i64,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// False when the row already existed and this start resumed it.
    #[sqlx(default)]
    #[serde(skip)]
    pub created: bool,
}

impl ExamAttempt {
    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Unix seconds of the window, as carried in the session token.
    pub fn token_window(&self) -> (usize, usize) {
        (
            self.started_at.timestamp().max(0) as usize,
            self.expires_at.timestamp().max(0) as usize,
        )
    }
}
