// src/handlers/exams.rs

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, conflict_or_internal},
    models::exam::{Exam, ExamListItem, NewExam},
    utils::{html::clean_html, jwt::Claims, upload},
};

const EXAM_COLUMNS: &str =
    "id, code, title, description, duration_minutes, pdf_url, teacher_id, created_at";

/// Loads an exam or fails with 404.
pub(crate) async fn find_exam(pool: &PgPool, exam_id: i64) -> Result<Exam, AppError> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {} FROM exams WHERE id = $1", EXAM_COLUMNS))
        .bind(exam_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch exam {}: {:?}", exam_id, e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))
}

/// Loads an exam the caller may modify: its owner, or any admin.
pub(crate) async fn find_owned_exam(
    pool: &PgPool,
    exam_id: i64,
    claims: &Claims,
) -> Result<Exam, AppError> {
    let exam = find_exam(pool, exam_id).await?;

    if exam.teacher_id != claims.subject_id()? && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only the teacher who created this exam can change it".to_string(),
        ));
    }

    Ok(exam)
}

/// An uploaded file taken from a multipart field.
struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Reads the exam upload form: text fields plus an optional `pdf` file.
async fn read_exam_form(
    multipart: &mut Multipart,
) -> Result<(NewExam, Option<UploadedFile>), AppError> {
    let mut exam = NewExam::default();
    let mut duration: Option<String> = None;
    let mut pdf = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "code" => exam.code = field.text().await?.trim().to_string(),
            "title" => exam.title = clean_html(field.text().await?.trim()),
            "description" => {
                let text = field.text().await?;
                let text = text.trim();
                if !text.is_empty() {
                    exam.description = Some(clean_html(text));
                }
            }
            "duration" => duration = Some(field.text().await?),
            "pdf" => {
                let file_name = field.file_name().unwrap_or("exam.pdf").to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    pdf = Some(UploadedFile {
                        name: file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!("Ignoring unknown exam form field '{}'", other),
        }
    }

    exam.duration_minutes = duration
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| AppError::BadRequest("Duration is required".to_string()))?
        .parse()
        .map_err(|_| AppError::BadRequest("Duration must be a whole number of minutes".to_string()))?;

    Ok((exam, pdf))
}

/// Creates an exam from a multipart form, storing the optional PDF.
///
/// * The authenticated teacher becomes the owner.
/// * Exam codes are unique; a duplicate yields 409.
pub async fn create_exam(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (new_exam, pdf) = read_exam_form(&mut multipart).await?;
    new_exam.validate()?;

    let teacher_id = claims.subject_id()?;

    let taken = sqlx::query_scalar::<_, i64>("SELECT id FROM exams WHERE code = $1")
        .bind(&new_exam.code)
        .fetch_optional(&pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Exam with this code already exists".to_string()));
    }

    let pdf_url = match pdf {
        Some(file) => {
            Some(upload::store_exam_pdf(&config.exam_upload_dir(), &file.name, &file.bytes).await?)
        }
        None => None,
    };

    let inserted = sqlx::query_as::<_, Exam>(&format!(
        r#"
        INSERT INTO exams (code, title, description, duration_minutes, pdf_url, teacher_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        EXAM_COLUMNS
    ))
    .bind(&new_exam.code)
    .bind(&new_exam.title)
    .bind(&new_exam.description)
    .bind(new_exam.duration_minutes)
    .bind(&pdf_url)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await;

    let exam = match inserted {
        Ok(exam) => exam,
        Err(e) => {
            if let Some(url) = &pdf_url {
                upload::remove_exam_pdf(&config.exam_upload_dir(), url).await;
            }
            return Err(conflict_or_internal(e, "Exam with this code already exists"));
        }
    };

    tracing::info!(
        "Teacher {} created exam {} ({}), pdf: {}",
        teacher_id,
        exam.id,
        exam.code,
        exam.pdf_url.is_some()
    );

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Lists every exam, newest first, with owner name and child counts.
pub async fn list_exams(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, ExamListItem>(
        r#"
        SELECT
            e.id, e.code, e.title, e.description, e.duration_minutes, e.pdf_url,
            e.teacher_id,
            t.name AS teacher_name,
            (SELECT COUNT(*) FROM questions q WHERE q.exam_id = e.id) AS question_count,
            (SELECT COUNT(*) FROM exam_results r WHERE r.exam_id = e.id) AS result_count,
            e.created_at
        FROM exams e
        JOIN teachers t ON t.id = e.teacher_id
        ORDER BY e.created_at DESC, e.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list exams: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(exams))
}

pub async fn get_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_exam(&pool, id).await?))
}

/// Deletes an exam with its questions, answer keys and results.
/// Owner or admin only.
pub async fn delete_exam(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = find_owned_exam(&pool, id, &claims).await?;

    sqlx::query("DELETE FROM exams WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if let Some(url) = &exam.pdf_url {
        upload::remove_exam_pdf(&config.exam_upload_dir(), url).await;
    }

    tracing::info!("Exam {} ({}) deleted", exam.id, exam.code);

    Ok(StatusCode::NO_CONTENT)
}
