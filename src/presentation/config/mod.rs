mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LoggingSettings, RendererSettings, ServerSettings, Settings, TranscriptionSettings,
};
