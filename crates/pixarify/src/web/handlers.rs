use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use pixarify_core::{Interaction, PipelineError};

use super::{page, AppState};

/// Multipart field carrying the portrait.
const IMAGE_FIELD: &str = "image";

type PageResponse = (StatusCode, Html<String>);

pub async fn index() -> Html<String> {
    Html(page::upload_form())
}

pub async fn health() -> &'static str {
    "ok"
}

/// Run one full interaction for the submitted portrait.
pub async fn pixarify(State(state): State<AppState>, multipart: Multipart) -> PageResponse {
    let (bytes, file_name) = match read_image_field(multipart).await {
        Ok(Some(field)) => field,
        Ok(None) => return rejected(PipelineError::EmptyUpload),
        Err(e) => {
            tracing::warn!("Malformed upload: {e}");
            let status = e.status();
            if status == StatusCode::PAYLOAD_TOO_LARGE {
                // The body limit tripped before the full size was known.
                let max_mb = state.pipeline.intake().max_upload_size_mb();
                return rejected(PipelineError::UploadTooLarge {
                    size_mb: max_mb + 1,
                    max_mb,
                });
            }
            return (status, Html(page::rejected(&PipelineError::EmptyUpload)));
        }
    };

    let image = match state.pipeline.intake().accept(bytes, file_name) {
        Ok(image) => image,
        Err(e) => return rejected(e),
    };

    let mut interaction = Interaction::new();
    if let Err(e) = interaction.upload(image) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(page::rejected(&e)));
    }

    let outcome = interaction
        .run(&state.pipeline, |phase| tracing::debug!(%phase, "Interaction advanced"))
        .await;

    let status = match &outcome {
        Ok(url) => {
            tracing::info!(url = url.url(), "Pixarified image ready");
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!("Interaction failed: {e}");
            status_for(e)
        }
    };
    (status, Html(page::interaction(&interaction)))
}

async fn read_image_field(
    mut multipart: Multipart,
) -> Result<Option<(Vec<u8>, String)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some((bytes.to_vec(), file_name)));
    }
    Ok(None)
}

fn rejected(error: PipelineError) -> PageResponse {
    tracing::info!("Upload rejected: {error}");
    (status_for(&error), Html(page::rejected(&error)))
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        e if e.is_intake() => StatusCode::BAD_REQUEST,
        PipelineError::InvalidTransition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}
