// src/config.rs

use std::env;
use std::path::{Path, PathBuf};
use dotenvy::dotenv;

// Inclusive lower bounds for each letter grade.
pub const GRADE_A_MIN: i32 = 90;
pub const GRADE_B_MIN: i32 = 80;
pub const GRADE_C_MIN: i32 = 70;
pub const GRADE_D_MIN: i32 = 60;

/// Extra seconds a student token stays valid after the exam duration ends.
pub const SUBMISSION_GRACE_SECONDS: u64 = 120;

pub const MAX_EXAM_DURATION_MINUTES: i32 = 600;
pub const MAX_ANSWER_LENGTH: u64 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: Option<String>,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20 * 1024 * 1024);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_name: env::var("ADMIN_NAME").ok(),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        }
    }

    /// Directory that holds uploaded exam PDFs.
    pub fn exam_upload_dir(&self) -> PathBuf {
        Path::new(&self.upload_dir).join("exams")
    }
}
