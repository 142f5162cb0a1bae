// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    handlers::exams::find_exam,
    models::exam_result::{ResultOverviewRow, ResultRow},
    scoring::{RankedResult, ResultSummary, rank_results, summarize},
    utils::report::{ReportHeader, XLSX_CONTENT_TYPE, build_results_workbook, export_file_name},
};

/// Loads, ranks and summarizes every result of one exam.
async fn ranked_results(
    pool: &PgPool,
    exam_id: i64,
) -> Result<(ResultSummary, Vec<RankedResult>), AppError> {
    let rows = sqlx::query_as::<_, ResultRow>(
        r#"
        SELECT
            r.id, r.student_id,
            s.nisn,
            s.name AS student_name,
            s.class AS student_class,
            r.score, r.total_questions, r.correct_answers, r.submit_time
        FROM exam_results r
        JOIN students s ON s.id = r.student_id
        WHERE r.exam_id = $1
        "#,
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch results for exam {}: {:?}", exam_id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    let summary = summarize(rows.iter().map(|r| r.score));
    Ok((summary, rank_results(rows)))
}

/// Returns an exam's statistics and ranked, graded results.
pub async fn exam_results(
    State(pool): State<PgPool>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = find_exam(&pool, exam_id).await?;
    let (summary, results) = ranked_results(&pool, exam_id).await?;

    Ok(Json(serde_json::json!({
        "exam": exam,
        "summary": summary,
        "results": results,
    })))
}

/// Streams an exam's ranked results as an .xlsx attachment.
pub async fn export_results(
    State(pool): State<PgPool>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = find_exam(&pool, exam_id).await?;

    let teacher_name = sqlx::query_scalar::<_, String>("SELECT name FROM teachers WHERE id = $1")
        .bind(exam.teacher_id)
        .fetch_optional(&pool)
        .await?
        .unwrap_or_default();

    let (summary, results) = ranked_results(&pool, exam_id).await?;

    let today = chrono::Local::now().date_naive();
    let header_info = ReportHeader {
        code: &exam.code,
        title: &exam.title,
        teacher_name: &teacher_name,
        generated_on: today,
    };
    let bytes = build_results_workbook(&header_info, &summary, &results)?;

    tracing::info!(
        "Exported {} results of exam {} ({})",
        results.len(),
        exam.id,
        exam.code
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    export_file_name(&exam.code, today)
                ),
            ),
        ],
        bytes,
    ))
}

/// Lists every result across all exams, by exam title then score.
pub async fn list_all_results(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let results = sqlx::query_as::<_, ResultOverviewRow>(
        r#"
        SELECT
            r.id, r.exam_id,
            e.code AS exam_code,
            e.title AS exam_title,
            s.nisn,
            s.name AS student_name,
            s.class AS student_class,
            r.score, r.total_questions, r.correct_answers, r.submit_time
        FROM exam_results r
        JOIN exams e ON e.id = r.exam_id
        JOIN students s ON s.id = r.student_id
        ORDER BY e.title ASC, r.score DESC, s.name ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list results: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(results))
}
