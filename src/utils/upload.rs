// src/utils/upload.rs

use std::path::Path;

use crate::error::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";
const MAX_FILE_NAME_LEN: usize = 100;

/// URL prefix under which `UPLOAD_DIR` is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, so it can never
/// escape the upload directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_NAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "exam.pdf".to_string()
    } else {
        cleaned
    }
}

/// Writes an exam PDF under `dir` and returns its public URL.
pub async fn store_exam_pdf(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    if !is_pdf(bytes) {
        return Err(AppError::BadRequest("Uploaded file is not a PDF".to_string()));
    }

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!("Failed to create upload dir {:?}: {:?}", dir, e);
        AppError::InternalServerError(e.to_string())
    })?;

    let file_name = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );

    tokio::fs::write(dir.join(&file_name), bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write exam PDF: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(format!("{}/exams/{}", UPLOADS_URL_PREFIX, file_name))
}

/// Deletes the file behind a URL returned by [`store_exam_pdf`].
/// Failures are logged, never returned.
pub async fn remove_exam_pdf(dir: &Path, url: &str) {
    let Some(file_name) = url.rsplit('/').next().filter(|name| !name.is_empty()) else {
        return;
    };

    let path = dir.join(file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Could not remove PDF {:?}: {}", path, e);
    }
}
