// src/handlers/mod.rs

pub mod answer_keys;
pub mod attempts;
pub mod exams;
pub mod health;
pub mod questions;
pub mod results;
pub mod students;
pub mod teachers;
