use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn ping_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }),
    )
}
