// src/models/mod.rs

pub mod answer_key;
pub mod exam;
pub mod exam_attempt;
pub mod exam_result;
pub mod question;
pub mod student;
pub mod teacher;
