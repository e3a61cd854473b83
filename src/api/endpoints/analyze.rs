//! `POST /api/analyze`: multipart description plus optional device photo.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalysisResponse, ApiContext};
use crate::pipeline::orchestrator::AnalysisRequest;

pub const DESCRIPTION_FIELD: &str = "description";
pub const IMAGE_FIELD: &str = "image";

pub async fn analyze(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let multipart = multipart?;
    let request = read_request(multipart).await?;

    let service = ctx.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.analyze(request))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))??;

    Ok(Json(outcome.into()))
}

/// Any method other than POST.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Collect the known fields. A missing description is empty text; other
/// fields are ignored.
async fn read_request(mut multipart: Multipart) -> Result<AnalysisRequest, ApiError> {
    let mut request = AnalysisRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(DESCRIPTION_FIELD) => request.description = field.text().await?,
            Some(IMAGE_FIELD) => {
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    request.image = Some(bytes.to_vec());
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(request)
}
