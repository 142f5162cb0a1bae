// src/models/answer_key.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::config::MAX_ANSWER_LENGTH;

/// Represents the 'answer_keys' table in the database.
/// At most one row per (exam_id, question_number).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerKey {
    pub id: i64,
    pub exam_id: i64,
    pub question_number: i32,
    /// Compared byte-for-byte with the submitted option.
    pub correct_answer: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnswerKeyInput {
    #[validate(range(min = 1, message = "Question number must be positive"))]
    pub question_number: i32,
    #[validate(length(min = 1, max = MAX_ANSWER_LENGTH))]
    pub correct_answer: String,
}

/// DTO for replacing every answer key of an exam.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceAnswerKeysRequest {
    #[validate(nested)]
    #[validate(custom(function = validate_unique_keys))]
    pub keys: Vec<AnswerKeyInput>,
}

fn validate_unique_keys(keys: &[AnswerKeyInput]) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    if keys.iter().all(|k| seen.insert(k.question_number)) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("duplicate_question_number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: i32, answer: &str) -> AnswerKeyInput {
        AnswerKeyInput {
            question_number: n,
            correct_answer: answer.to_string(),
        }
    }

    #[test]
    fn test_replace_request_accepts_unique_keys() {
        let req = ReplaceAnswerKeysRequest {
            keys: vec![key(1, "A"), key(2, "C")],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_replace_request_rejects_duplicates() {
        let req = ReplaceAnswerKeysRequest {
            keys: vec![key(1, "A"), key(1, "B")],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_replace_request_rejects_bad_entries() {
        let zero = ReplaceAnswerKeysRequest {
            keys: vec![key(0, "A")],
        };
        assert!(zero.validate().is_err());

        let empty = ReplaceAnswerKeysRequest {
            keys: vec![key(3, "")],
        };
        assert!(empty.validate().is_err());
    }
}
