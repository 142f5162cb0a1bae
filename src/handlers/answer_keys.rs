// src/handlers/answer_keys.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::exams::find_owned_exam,
    models::answer_key::{AnswerKey, ReplaceAnswerKeysRequest},
    utils::jwt::Claims,
};

/// Fetches an exam's answer keys ordered by question number.
pub(crate) async fn keys_for_exam(pool: &PgPool, exam_id: i64) -> Result<Vec<AnswerKey>, AppError> {
    sqlx::query_as::<_, AnswerKey>(
        r#"
        SELECT id, exam_id, question_number, correct_answer, created_at
        FROM answer_keys
        WHERE exam_id = $1
        ORDER BY question_number ASC
        "#,
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch answer keys for exam {}: {:?}", exam_id, e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Replaces every answer key of an exam with the submitted set.
///
/// Runs in one transaction holding a row lock on the exam, so concurrent
/// replacements of the same exam apply one after the other and readers
/// never see a mix of two sets.
pub async fn replace_answer_keys(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
    Json(payload): Json<ReplaceAnswerKeysRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    find_owned_exam(&pool, exam_id, &claims).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("SELECT id FROM exams WHERE id = $1 FOR UPDATE")
        .bind(exam_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    sqlx::query("DELETE FROM answer_keys WHERE exam_id = $1")
        .bind(exam_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to clear answer keys: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let mut keys: Vec<AnswerKey> = if payload.keys.is_empty() {
        Vec::new()
    } else {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO answer_keys (exam_id, question_number, correct_answer) ");

        builder.push_values(&payload.keys, |mut row, key| {
            row.push_bind(exam_id)
                .push_bind(key.question_number)
                .push_bind(&key.correct_answer);
        });
        builder.push(" RETURNING id, exam_id, question_number, correct_answer, created_at");

        builder
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert answer keys: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?
    };

    tx.commit().await?;

    keys.sort_by_key(|k| k.question_number);
    tracing::info!("Replaced answer keys of exam {}: {} keys", exam_id, keys.len());

    Ok(Json(keys))
}

/// Returns an exam's answer keys. Owner or admin only.
pub async fn list_answer_keys(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_exam(&pool, exam_id, &claims).await?;
    Ok(Json(keys_for_exam(&pool, exam_id).await?))
}

/// Removes every answer key of an exam.
pub async fn delete_answer_keys(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    find_owned_exam(&pool, exam_id, &claims).await?;

    let result = sqlx::query("DELETE FROM answer_keys WHERE exam_id = $1")
        .bind(exam_id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete answer keys: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tracing::info!(
        "Deleted {} answer keys of exam {}",
        result.rows_affected(),
        exam_id
    );

    Ok(StatusCode::NO_CONTENT)
}
