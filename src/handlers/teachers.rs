// src/handlers/teachers.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, conflict_or_internal},
    models::teacher::{CreateTeacherRequest, LoginRequest, Teacher},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{ROLE_TEACHER, sign_staff_jwt},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new teacher account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the teacher object (excluding password).
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let hashed_password = hash_password(&payload.password)?;

    let teacher = sqlx::query_as::<_, Teacher>(
        r#"
        INSERT INTO teachers (email, name, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, name, password, role, created_at
        "#,
    )
    .bind(&email)
    .bind(payload.name.trim())
    .bind(&hashed_password)
    .bind(ROLE_TEACHER)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_or_internal(e, format!("Teacher with email '{}' already exists", email)))?;

    tracing::info!("Registered teacher {} ({})", teacher.id, teacher.email);

    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Authenticates a teacher and returns a JWT token.
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// does not reveal which accounts exist.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let teacher = sqlx::query_as::<_, Teacher>(
        r#"
        SELECT id, email, name, password, role, created_at
        FROM teachers
        WHERE email = $1
        "#,
    )
    .bind(normalize_email(&payload.email))
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&payload.password, &teacher.password)? {
        return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
    }

    let token = sign_staff_jwt(
        teacher.id,
        &teacher.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "teacher": teacher
    })))
}

/// Lists all teacher accounts (password hashes are never serialized).
pub async fn list_teachers(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let teachers = sqlx::query_as::<_, Teacher>(
        r#"
        SELECT id, email, name, password, role, created_at
        FROM teachers
        ORDER BY name ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list teachers: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(teachers))
}
