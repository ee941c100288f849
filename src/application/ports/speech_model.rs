use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Transcript;

/// A loaded speech-recognition model.
///
/// Mirrors the external model contract: audio is loaded into a waveform
/// separately from inference so a missing or unreadable file fails before
/// any model work happens.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Decode an audio file into the waveform the model consumes
    /// (16 kHz mono PCM).
    fn load_audio(&self, path: &Path) -> Result<Vec<f32>, TranscriptionError>;

    async fn transcribe(
        &self,
        waveform: &[f32],
        language: &str,
    ) -> Result<Transcript, TranscriptionError>;
}

/// Loads a model instance for a given size and device.
///
/// Called once per transcription request; implementations may cache, the
/// default candle adapter does not.
#[async_trait]
pub trait SpeechModelFactory: Send + Sync {
    async fn load(
        &self,
        size: &str,
        device: &str,
    ) -> Result<Arc<dyn SpeechModel>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
}
