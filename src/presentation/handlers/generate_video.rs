use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{render_job_defaults, RenderJob, VideoJobParams};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub video_topic: Option<String>,
    pub agent_a: Option<String>,
    pub agent_b: Option<String>,
    pub music: Option<String>,
    pub background: Option<String>,
    pub ai_generated_images: Option<bool>,
    pub fps: Option<u32>,
    pub duration: Option<u32>,
    pub clean_srt: Option<bool>,
}

impl GenerateVideoRequest {
    /// Required fields are checked in a fixed order and the first missing
    /// one is reported; optional fields fall back to their defaults.
    fn into_params(self) -> Result<VideoJobParams, &'static str> {
        Ok(VideoJobParams {
            video_topic: self.video_topic.ok_or("videoTopic")?,
            agent_a: self.agent_a.ok_or("agentA")?,
            agent_b: self.agent_b.ok_or("agentB")?,
            music: self.music.ok_or("music")?,
            background: self.background.ok_or("background")?,
            ai_generated_images: self
                .ai_generated_images
                .unwrap_or(render_job_defaults::AI_GENERATED_IMAGES),
            fps: self.fps.unwrap_or(render_job_defaults::FPS),
            duration: self.duration.unwrap_or(render_job_defaults::DURATION),
            clean_srt: self.clean_srt.unwrap_or(render_job_defaults::CLEAN_SRT),
        })
    }
}

#[derive(Serialize)]
pub struct GenerateVideoResponse {
    pub status: String,
    pub job_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn generate_video_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateVideoRequest>,
) -> impl IntoResponse {
    let params = match request.into_params() {
        Ok(params) => params,
        Err(field) => {
            tracing::warn!(field = field, "Video generation request missing field");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Missing required field: {}", field),
                }),
            )
                .into_response();
        }
    };

    let job = RenderJob::new(params);
    let job_id = job.id;

    tracing::info!(
        job_id = %job_id,
        topic = %job.params.video_topic,
        "Received video generation request"
    );

    if let Err(e) = state.render_launcher.launch(&job).await {
        tracing::error!(job_id = %job_id, error = %e, "Failed to launch render job");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(GenerateVideoResponse {
            status: "processing".to_string(),
            job_id: job_id.to_string(),
            message: "Video generation started. The process will continue in the background."
                .to_string(),
        }),
    )
        .into_response()
}
