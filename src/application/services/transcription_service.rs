use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{SpeechModel, SpeechModelFactory, TranscriptionError};
use crate::domain::{TranscriptionOutcome, TranscriptionResult};

/// Language hint passed to the model for every file.
const LANGUAGE_HINT: &str = "en";

/// Transcribes batches of audio files.
///
/// The model is loaded once per batch, not cached across requests. Items
/// are processed in input order and each failure stays in its own slot;
/// only a model-load failure aborts the whole batch.
pub struct TranscriptionService {
    model_factory: Arc<dyn SpeechModelFactory>,
    model_size: String,
    device: String,
}

impl TranscriptionService {
    pub fn new(
        model_factory: Arc<dyn SpeechModelFactory>,
        model_size: String,
        device: String,
    ) -> Self {
        Self {
            model_factory,
            model_size,
            device,
        }
    }

    pub async fn transcribe_batch(
        &self,
        audios: &[String],
    ) -> Result<Vec<TranscriptionResult>, TranscriptionError> {
        tracing::debug!(
            model = %self.model_size,
            device = %self.device,
            "Loading speech model"
        );
        let model = self
            .model_factory
            .load(&self.model_size, &self.device)
            .await?;

        let mut results = Vec::with_capacity(audios.len());
        for path in audios {
            let outcome = self.transcribe_one(model.as_ref(), path).await;
            results.push(TranscriptionResult(outcome, path.clone()));
        }

        Ok(results)
    }

    async fn transcribe_one(&self, model: &dyn SpeechModel, path: &str) -> TranscriptionOutcome {
        let audio_path = Path::new(path);

        let metadata = match tokio::fs::metadata(audio_path).await {
            Ok(m) => m,
            Err(_) => {
                tracing::warn!(path = %path, "Audio file not found");
                return TranscriptionOutcome::error(format!("File not found: {}", path));
            }
        };

        tracing::info!(path = %path, size = metadata.len(), "Processing audio file");

        let waveform = match model.load_audio(audio_path) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Audio loading failed");
                return TranscriptionOutcome::error(e.to_string());
            }
        };

        match model.transcribe(&waveform, LANGUAGE_HINT).await {
            Ok(transcript) => {
                tracing::info!(
                    path = %path,
                    chars = transcript.text.len(),
                    "Transcription completed"
                );
                TranscriptionOutcome::Transcript(transcript)
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Transcription failed");
                TranscriptionOutcome::error(e.to_string())
            }
        }
    }
}
