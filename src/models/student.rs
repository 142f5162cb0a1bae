// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::validate_nisn;

/// Represents the 'students' table in the database.
/// Students never log in with a password; the roster is maintained by teachers.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,

    /// National student number, unique across the roster.
    pub nisn: String,

    pub name: String,

    pub class: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Whether a roster row created a new student or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Created,
    Updated,
}

/// One successfully imported roster row.
#[derive(Debug, Serialize)]
pub struct ImportedStudent {
    pub nisn: String,
    pub name: String,
    pub class: String,
    pub action: ImportAction,
}

/// Summary returned by the roster import endpoint.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub message: String,
    pub students: Vec<ImportedStudent>,
    pub errors: Vec<String>,
}

/// DTO for a student opening an exam.
#[derive(Debug, Deserialize, Validate)]
pub struct StartExamRequest {
    #[validate(custom(function = validate_nisn))]
    pub nisn: String,
    #[validate(length(min = 1, max = 32, message = "Exam code is required."))]
    pub exam_code: String,
}

impl StartExamRequest {
    /// Trims both fields the way roster import trims spreadsheet cells.
    pub fn normalized(self) -> Self {
        Self {
            nisn: self.nisn.trim().to_string(),
            exam_code: self.exam_code.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nisn: &str, exam_code: &str) -> StartExamRequest {
        StartExamRequest {
            nisn: nisn.to_string(),
            exam_code: exam_code.to_string(),
        }
    }

    #[test]
    fn test_padded_nisn_is_accepted_after_trim() {
        let req = request("  0012345678 ", " MTK-01\t").normalized();
        assert_eq!(req.nisn, "0012345678");
        assert_eq!(req.exam_code, "MTK-01");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_inner_space_is_still_rejected() {
        let req = request("0012 345678", "MTK-01").normalized();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_exam_code_is_rejected() {
        let req = request("0012345678", "   ").normalized();
        assert!(req.validate().is_err());
    }
}
