use async_trait::async_trait;

use crate::domain::RenderJob;

/// Launches a render job as an external process and returns without
/// waiting for it. Output and exit status are observable only through the
/// logging sink; there is no cancellation path once launched.
#[async_trait]
pub trait RenderLauncher: Send + Sync {
    async fn launch(&self, job: &RenderJob) -> Result<(), RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("runner script write failed: {0}")]
    ScriptWrite(String),
    #[error("renderer spawn failed: {0}")]
    SpawnFailed(String),
    #[error("renderer {0} stream unavailable")]
    StreamUnavailable(&'static str),
}
