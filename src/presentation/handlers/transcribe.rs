use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct TranscribeRequest {
    pub audios: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> impl IntoResponse {
    let audios = match request.audios {
        Some(audios) if !audios.is_empty() => audios,
        _ => {
            tracing::warn!("Transcription request without audio paths");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "The 'audios' field is missing or empty".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::info!(count = audios.len(), "Received transcription request");

    match state.transcription_service.transcribe_batch(&audios).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Transcription request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
