// src/handlers/questions.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::{AppError, conflict_or_internal},
    handlers::exams::{find_exam, find_owned_exam},
    models::question::{CreateQuestionRequest, Question},
    utils::{html::clean_html, jwt::Claims},
};

/// Fetches an exam's questions ordered by question number.
pub(crate) async fn questions_for_exam(
    pool: &PgPool,
    exam_id: i64,
) -> Result<Vec<Question>, AppError> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, exam_id, question_number, question_text, options, created_at
        FROM questions
        WHERE exam_id = $1
        ORDER BY question_number ASC
        "#,
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions for exam {}: {:?}", exam_id, e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Adds a question to an exam.
/// Question text is sanitized before storage. Options are stored verbatim:
/// students submit them back and they must equal the answer key exactly.
pub async fn create_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    find_owned_exam(&pool, exam_id, &claims).await?;

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (exam_id, question_number, question_text, options)
        VALUES ($1, $2, $3, $4)
        RETURNING id, exam_id, question_number, question_text, options, created_at
        "#,
    )
    .bind(exam_id)
    .bind(payload.question_number)
    .bind(clean_html(payload.question_text.trim()))
    .bind(SqlJson(&payload.options))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        conflict_or_internal(
            e,
            format!("Question {} already exists in this exam", payload.question_number),
        )
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn list_questions(
    State(pool): State<PgPool>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_exam(&pool, exam_id).await?;
    Ok(Json(questions_for_exam(&pool, exam_id).await?))
}
