mod render_launcher;
mod speech_model;

pub use render_launcher::{RenderError, RenderLauncher};
pub use speech_model::{SpeechModel, SpeechModelFactory, TranscriptionError};
