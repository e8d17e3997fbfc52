//! `POST /api/analyze-instagram`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use followback_analyzer::AnalyzeError;
use followback_core::AnalysisResult;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub username: String,
}

pub(super) async fn analyze_instagram(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiError> {
    let rid = req_id.0;

    let Json(body) = body.map_err(|rejection| {
        ApiError::new(
            &rid,
            "validation_error",
            format!("request body must be {{\"username\": \"...\"}}: {}", rejection.body_text()),
        )
    })?;

    match state.analyzer.analyze(&body.username).await {
        Ok(result) => Ok(Json(ApiResponse {
            data: result,
            meta: ResponseMeta::new(rid),
        })),
        Err(e) => Err(map_analyze_error(rid, &e)),
    }
}

fn map_analyze_error(request_id: String, error: &AnalyzeError) -> ApiError {
    match error {
        AnalyzeError::Validation(e) => {
            tracing::debug!(error = %e, "rejected username");
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        AnalyzeError::Timeout { .. } => {
            ApiError::new(request_id, "timeout", format!("{error}; please retry"))
        }
    }
}
