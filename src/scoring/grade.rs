use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{GRADE_A_MIN, GRADE_B_MIN, GRADE_C_MIN, GRADE_D_MIN};

/// Letter bucket derived from a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// Lower bounds are inclusive: 90 is an A, 89 is a B.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= GRADE_A_MIN => Grade::A,
            s if s >= GRADE_B_MIN => Grade::B,
            s if s >= GRADE_C_MIN => Grade::C,
            s if s >= GRADE_D_MIN => Grade::D,
            _ => Grade::E,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::E);
        assert_eq!(Grade::from_score(0), Grade::E);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        let json = serde_json::to_string(&Grade::B).unwrap();
        assert_eq!(json, "\"B\"");
        assert_eq!(Grade::E.to_string(), "E");
    }
}
