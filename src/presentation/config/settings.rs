use std::path::PathBuf;

use config::{Config, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub transcription: TranscriptionSettings,
    pub renderer: RendererSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    /// Whisper model size, e.g. "tiny" or "base".
    pub model: String,
    pub device: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererSettings {
    /// Executable the runner script is handed to.
    pub command: String,
    /// Directory of the rendering pipeline; runner scripts are written
    /// here so the pipeline's relative imports resolve.
    pub workdir: PathBuf,
}

impl Settings {
    /// Layer `appsettings.{environment}` under `APP_`-prefixed environment
    /// variables.
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(EnvironmentSource::with_prefix("APP").separator("_"))
            .build()?
            .try_deserialize()
    }
}
