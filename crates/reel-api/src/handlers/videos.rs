//! Catalog listing and reel creation handlers.

use std::path::{Path, PathBuf};
use std::time::Instant;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use reel_media::fs_utils::{ensure_dir, FileGuard};
use reel_models::{AnimationStyle, CatalogListing, Selection, UploadedImage};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying an image file.
const IMAGES_FIELD: &str = "images";

/// Response for a finished reel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoResponse {
    pub video_url: String,
    pub status: String,
}

/// List the songs, backgrounds and animations a client may pick.
pub async fn list_options(State(state): State<AppState>) -> Json<CatalogListing> {
    Json(state.maker.list_catalog())
}

/// Create a reel from a multipart form.
///
/// Text fields: `song`, `background`, `animation`, `text`. File parts:
/// `images`. Uploads are handed to the maker, which deletes them whatever the
/// outcome. Server-side error details are hidden in production.
pub async fn create_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<CreateVideoResponse>> {
    let production = state.config.is_production();
    create_reel(&state, multipart)
        .await
        .map_err(|e| e.hide_details(production))
}

async fn create_reel(
    state: &AppState,
    mut multipart: Multipart,
) -> ApiResult<Json<CreateVideoResponse>> {
    let mut selection = Selection::default();
    let mut uploads = FileGuard::default();

    read_form(&mut multipart, &state.config.upload_dir, &mut selection, &mut uploads).await?;
    // The maker owns the uploads from here on
    uploads.release_all();

    let animation = AnimationStyle::from_display_name(&selection.animation).as_tag();
    info!(
        song = %selection.song,
        background = %selection.background,
        animation,
        images = selection.images.len(),
        "Creating reel"
    );

    metrics::record_render_started(animation);
    let start = Instant::now();

    match state.maker.create_video(selection).await {
        Ok(output) => {
            metrics::record_render_completed(animation, start.elapsed().as_secs_f64());
            Ok(Json(CreateVideoResponse {
                video_url: output.video_url,
                status: output.status.to_string(),
            }))
        }
        Err(e) => {
            let reason = if e.is_validation() { "validation" } else { "engine" };
            metrics::record_render_failed(animation, reason);
            if let Some(stderr) = e.diagnostics() {
                warn!(error = %e, stderr, "Reel creation failed");
            } else {
                warn!(error = %e, "Reel creation failed");
            }
            Err(e.into())
        }
    }
}

/// Read every part of the form into `selection`, writing image parts to
/// `upload_dir`. Every image written is also tracked by `uploads`.
async fn read_form(
    multipart: &mut Multipart,
    upload_dir: &Path,
    selection: &mut Selection,
    uploads: &mut FileGuard,
) -> ApiResult<()> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGES_FIELD => {
                if let Some(image) = save_upload(field, upload_dir).await? {
                    uploads.push(image.path.clone());
                    selection.images.push(image);
                }
            }
            "song" => selection.song = text(field).await?,
            "background" => selection.background = text(field).await?,
            "animation" => selection.animation = text(field).await?,
            "text" => selection.caption = text(field).await?,
            other => {
                warn!(field = other, "Ignoring unknown form field");
            }
        }
    }
    Ok(())
}

async fn text(field: Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

/// Write one image part under a random name. Empty parts are skipped.
async fn save_upload(field: Field<'_>, upload_dir: &Path) -> ApiResult<Option<UploadedImage>> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?;

    if bytes.is_empty() {
        return Ok(None);
    }

    ensure_dir(upload_dir)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let path = upload_path(upload_dir, &original_name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to store upload: {e}")))?;

    Ok(Some(UploadedImage::new(path, original_name)))
}

/// `<upload_dir>/<uuid>.<ext>`, keeping a short alphanumeric extension from
/// the client's file name.
fn upload_path(upload_dir: &Path, original_name: &str) -> PathBuf {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "img".to_string());
    upload_dir.join(format!("{}.{ext}", Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_path_keeps_safe_extension() {
        let path = upload_path(Path::new("/tmp/up"), "photo.JPG");
        assert_eq!(path.parent(), Some(Path::new("/tmp/up")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    }

    #[test]
    fn test_upload_path_rejects_odd_extensions() {
        for name in ["../../etc/passwd", "noext", "a.ph p", "x.verylongextension"] {
            let path = upload_path(Path::new("/tmp/up"), name);
            assert_eq!(path.parent(), Some(Path::new("/tmp/up")), "{name}");
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("img"), "{name}");
        }
    }
}
