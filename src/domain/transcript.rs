use serde::Serialize;

/// Output of the speech-recognition model for one audio file.
///
/// The API treats this as an opaque payload; nothing downstream inspects it
/// beyond serializing it back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub id: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Per-item outcome: either the model's transcript or an error descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranscriptionOutcome {
    Transcript(Transcript),
    Error { error: String },
}

impl TranscriptionOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Pairing of an outcome with the source path it came from.
///
/// Serializes as a two-element array `[outcome, path]`, which is the wire
/// shape callers consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult(pub TranscriptionOutcome, pub String);

impl TranscriptionResult {
    pub fn outcome(&self) -> &TranscriptionOutcome {
        &self.0
    }

    pub fn path(&self) -> &str {
        &self.1
    }
}
