use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identifier of a launched render job.
///
/// Generated, not derived from the launch time, so two launches within the
/// same second cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated parameter set for one video render.
///
/// Optional fields are already defaulted by the time this exists; the
/// renderer contract only sees the environment overlay from `env_vars`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoJobParams {
    pub video_topic: String,
    pub agent_a: String,
    pub agent_b: String,
    pub music: String,
    pub background: String,
    pub ai_generated_images: bool,
    pub fps: u32,
    pub duration: u32,
    pub clean_srt: bool,
}

/// Defaults applied to optional job fields before launch.
pub mod defaults {
    pub const AI_GENERATED_IMAGES: bool = true;
    pub const FPS: u32 = 20;
    pub const DURATION: u32 = 1;
    pub const CLEAN_SRT: bool = true;
}

impl VideoJobParams {
    /// Environment variables overlaid onto the inherited process environment
    /// of the spawned renderer. Booleans are lowercased, integers
    /// stringified.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("VIDEO_TOPIC", self.video_topic.clone()),
            ("AGENT_A", self.agent_a.clone()),
            ("AGENT_B", self.agent_b.clone()),
            ("MUSIC", self.music.clone()),
            ("BACKGROUND", self.background.clone()),
            (
                "AI_GENERATED_IMAGES",
                self.ai_generated_images.to_string(),
            ),
            ("FPS", self.fps.to_string()),
            ("DURATION", self.duration.to_string()),
            ("CLEAN_SRT", self.clean_srt.to_string()),
        ]
    }
}

/// A render job owned by the request that launched it.
///
/// No registry retains the job after launch; the id returned to the caller
/// carries no queryable state.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub id: JobId,
    pub params: VideoJobParams,
    pub created_at: DateTime<Utc>,
}

impl RenderJob {
    pub fn new(params: VideoJobParams) -> Self {
        Self {
            id: JobId::new(),
            params,
            created_at: Utc::now(),
        }
    }
}
