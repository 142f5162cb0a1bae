// src/handlers/attempts.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::{Config, SUBMISSION_GRACE_SECONDS},
    error::{AppError, conflict_or_internal},
    handlers::{answer_keys::keys_for_exam, exams::find_exam, questions::questions_for_exam},
    models::{
        exam::{Exam, StudentExamView},
        exam_attempt::ExamAttempt,
        exam_result::{ExamResult, SubmissionResponse, SubmitExamRequest},
        question::PublicQuestion,
        student::{StartExamRequest, Student},
    },
    scoring::score_submission,
    utils::jwt::{Claims, sign_student_jwt},
};

const ALREADY_SUBMITTED: &str = "This exam has already been submitted";
const TIME_IS_UP: &str = "The time for this exam is over";

/// Records the first start of an exam, or returns the existing attempt.
/// The window of an existing attempt is never moved.
async fn open_attempt(
    pool: &PgPool,
    student_id: i64,
    exam: &Exam,
) -> Result<ExamAttempt, AppError> {
    let now = Utc::now();
    let started_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
    let valid_for = exam.duration_minutes.max(0) as i64 * 60 + SUBMISSION_GRACE_SECONDS as i64;
    let expires_at = started_at + TimeDelta::seconds(valid_for);

    sqlx::query_as::<_, ExamAttempt>(
        r#"
        INSERT INTO exam_attempts (student_id, exam_id, started_at, expires_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (student_id, exam_id) DO UPDATE SET student_id = EXCLUDED.student_id
        RETURNING id, student_id, exam_id, started_at, expires_at, (xmax = 0) AS created
        "#,
    )
    .bind(student_id)
    .bind(exam.id)
    .bind(started_at)
    .bind(expires_at)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to open attempt of student {} on exam {}: {:?}", student_id, exam.id, e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Opens an exam for a student on the roster.
///
/// * Looks up the student by NISN and the exam by code.
/// * Refuses once a result exists (409) or the attempt window has closed (403).
/// * A repeated start resumes the first attempt with its original deadline.
/// * Returns the questions without answers and an exam session token that
///   expires when the time is up.
pub async fn start_exam(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<StartExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let student = sqlx::query_as::<_, Student>(
        "SELECT id, nisn, name, class, created_at FROM students WHERE nisn = $1",
    )
    .bind(&payload.nisn)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Student is not on the roster".to_string()))?;

    let exam = sqlx::query_as::<_, Exam>(
        r#"
        SELECT id, code, title, description, duration_minutes, pdf_url, teacher_id, created_at
        FROM exams
        WHERE code = $1
        "#,
    )
    .bind(&payload.exam_code)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    let submitted = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM exam_results WHERE student_id = $1 AND exam_id = $2",
    )
    .bind(student.id)
    .bind(exam.id)
    .fetch_optional(&pool)
    .await?;
    if submitted.is_some() {
        return Err(AppError::Conflict(ALREADY_SUBMITTED.to_string()));
    }

    let attempt = open_attempt(&pool, student.id, &exam).await?;
    if attempt.is_over(Utc::now()) {
        return Err(AppError::Forbidden(TIME_IS_UP.to_string()));
    }

    let questions: Vec<PublicQuestion> = questions_for_exam(&pool, exam.id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    let (issued_at, expires_at) = attempt.token_window();
    let token = sign_student_jwt(student.id, exam.id, &config.jwt_secret, issued_at, expires_at)?;

    tracing::info!(
        "Student {} ({}) {} exam {} ({}), deadline {}",
        student.id,
        student.nisn,
        if attempt.created { "started" } else { "resumed" },
        exam.id,
        exam.code,
        attempt.expires_at
    );

    Ok(Json(serde_json::json!({
        "token": token,
        "type": "Bearer",
        "started_at": attempt.started_at,
        "expires_at": attempt.expires_at,
        "resumed": !attempt.created,
        "student": student,
        "exam": StudentExamView::from(exam),
        "questions": questions,
    })))
}

/// Scores and records a student's answers.
///
/// The session token supplies the student and the exam; the attempt row
/// supplies the start time. An expired token is rejected by the auth layer.
pub async fn submit_exam(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student_id = claims.subject_id()?;
    let exam_id = claims
        .exam_id
        .ok_or_else(|| AppError::AuthError("Token is not bound to an exam".to_string()))?;

    find_exam(&pool, exam_id).await?;

    let attempt = sqlx::query_as::<_, ExamAttempt>(
        r#"
        SELECT id, student_id, exam_id, started_at, expires_at
        FROM exam_attempts
        WHERE student_id = $1 AND exam_id = $2
        "#,
    )
    .bind(student_id)
    .bind(exam_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::AuthError("No exam session found".to_string()))?;

    if attempt.is_over(Utc::now()) {
        return Err(AppError::Forbidden(TIME_IS_UP.to_string()));
    }

    let keys = keys_for_exam(&pool, exam_id).await?;
    let outcome = score_submission(&keys, &payload.answers);

    let result = sqlx::query_as::<_, ExamResult>(
        r#"
        INSERT INTO exam_results
            (student_id, exam_id, score, total_questions, correct_answers, answers, start_time, submit_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING id, student_id, exam_id, score, total_questions, correct_answers, answers,
                  start_time, submit_time
        "#,
    )
    .bind(student_id)
    .bind(exam_id)
    .bind(outcome.score)
    .bind(outcome.total_questions)
    .bind(outcome.correct_answers)
    .bind(SqlJson(&payload.answers))
    .bind(attempt.started_at)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_or_internal(e, ALREADY_SUBMITTED))?;

    tracing::info!(
        "Student {} submitted exam {}: {}/{} correct, score {}",
        student_id,
        exam_id,
        outcome.correct_answers,
        outcome.total_questions,
        outcome.score
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            id: result.id,
            exam_id: result.exam_id,
            student_id: result.student_id,
            score: result.score,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            grade: outcome.grade,
            start_time: result.start_time,
            submit_time: result.submit_time,
        }),
    ))
}
