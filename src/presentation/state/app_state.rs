use std::sync::Arc;

use crate::application::ports::RenderLauncher;
use crate::application::services::TranscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub render_launcher: Arc<dyn RenderLauncher>,
}
