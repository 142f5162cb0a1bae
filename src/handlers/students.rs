// src/handlers/students.rs

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::student::{ImportAction, ImportReport, ImportedStudent, Student},
    utils::roster::parse_roster,
};

/// Imports a student roster from an .xlsx upload (multipart field `file`).
///
/// Each usable row upserts by NISN. Rows with problems are reported back
/// and skipped; they never abort the rest of the import.
pub async fn import_students(
    State(pool): State<PgPool>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await?);
        }
    }

    let bytes = upload
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::BadRequest("Excel file is required".to_string()))?;

    let parsed = parse_roster(&bytes)?;
    let mut errors = parsed.errors;
    let mut students = Vec::with_capacity(parsed.entries.len());

    for entry in parsed.entries {
        // xmax is 0 only for freshly inserted rows.
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO students (nisn, name, class)
            VALUES ($1, $2, $3)
            ON CONFLICT (nisn) DO UPDATE SET
                name = EXCLUDED.name,
                class = EXCLUDED.class
            RETURNING (xmax = 0)
            "#,
        )
        .bind(&entry.nisn)
        .bind(&entry.name)
        .bind(&entry.class)
        .fetch_one(&pool)
        .await;

        match inserted {
            Ok(inserted) => students.push(ImportedStudent {
                nisn: entry.nisn,
                name: entry.name,
                class: entry.class,
                action: if inserted {
                    ImportAction::Created
                } else {
                    ImportAction::Updated
                },
            }),
            Err(e) => {
                tracing::error!("Failed to upsert roster row {}: {:?}", entry.row, e);
                errors.push(format!("Row {}: Error processing student", entry.row));
            }
        }
    }

    tracing::info!(
        "Roster import: {} students processed, {} rows rejected",
        students.len(),
        errors.len()
    );

    Ok(Json(ImportReport {
        message: format!("Successfully processed {} students", students.len()),
        students,
        errors,
    }))
}

/// Lists the roster ordered by class, then name.
pub async fn list_students(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, nisn, name, class, created_at
        FROM students
        ORDER BY class ASC, name ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list students: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(students))
}
