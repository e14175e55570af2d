use crate::{
    auth::middleware::AuthAdmin,
    types::{ApiResponse, AppError, Profile, Result},
    AppState,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use sha2::{Digest, Sha256};
use std::path::Path;

const RESUME_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Lowercased extension of an accepted resume file name, if it is one.
pub fn resume_extension(file_name: &str) -> Option<String> {
    let mime = mime_guess::from_path(file_name).first_raw()?;
    if !RESUME_MIME_TYPES.contains(&mime) {
        return None;
    }

    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Content-addressed file name, so re-uploading the same file is idempotent.
fn stored_name(bytes: &[u8], extension: &str) -> String {
    let digest = Sha256::digest(bytes);
    format!("resume-{}.{}", hex::encode(&digest[..8]), extension)
}

/// Stores the multipart `file` field and points the profile's `resume_url` at it
pub async fn upload_resume(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<()>>> {
    let config = state.config_manager.config();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = resume_extension(&file_name).ok_or_else(|| {
            AppError::InvalidInput("Only PDF, DOC and DOCX files are allowed".to_string())
        })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }
        if bytes.len() > config.uploads.max_bytes {
            return Err(AppError::InvalidInput(format!(
                "File exceeds the {} byte limit",
                config.uploads.max_bytes
            )));
        }

        let name = stored_name(&bytes, &extension);
        tokio::fs::create_dir_all(&config.uploads.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(config.uploads.dir.join(&name), &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        let url = format!("/uploads/{}", name);
        let mut profile = state.store.get_section::<Profile>().await?.unwrap_or_default();
        profile.resume_url = Some(url.clone());
        state.store.put_section(&profile).await?;

        tracing::info!(admin = %claims.sub, %url, size = bytes.len(), "resume uploaded");

        return Ok(Json(
            ApiResponse::done("Resume uploaded successfully").with_url(url),
        ));
    }

    Err(AppError::InvalidInput("Missing 'file' field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_extension_allows_documents_only() {
        assert_eq!(resume_extension("cv.PDF").as_deref(), Some("pdf"));
        assert_eq!(resume_extension("cv.docx").as_deref(), Some("docx"));
        assert_eq!(resume_extension("cv.doc").as_deref(), Some("doc"));
        assert!(resume_extension("cv.png").is_none());
        assert!(resume_extension("cv").is_none());
    }

    #[test]
    fn test_stored_name_is_content_addressed() {
        assert_eq!(stored_name(b"abc", "pdf"), stored_name(b"abc", "pdf"));
        assert_ne!(stored_name(b"abc", "pdf"), stored_name(b"abd", "pdf"));
        assert!(stored_name(b"abc", "pdf").ends_with(".pdf"));
    }
}
