mod render_job;
mod transcript;

pub use render_job::defaults as render_job_defaults;
pub use render_job::{JobId, RenderJob, VideoJobParams};
pub use transcript::{Transcript, TranscriptSegment, TranscriptionOutcome, TranscriptionResult};
