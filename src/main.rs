use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use clipforge::application::services::TranscriptionService;
use clipforge::infrastructure::audio::CandleWhisperFactory;
use clipforge::infrastructure::observability::{init_tracing, TracingConfig};
use clipforge::infrastructure::render::NodeRenderLauncher;
use clipforge::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.json,
            filter: settings.logging.filter.clone(),
        },
        settings.server.port,
    );

    let transcription_service = Arc::new(TranscriptionService::new(
        Arc::new(CandleWhisperFactory),
        settings.transcription.model.clone(),
        settings.transcription.device.clone(),
    ));

    let render_launcher = Arc::new(NodeRenderLauncher::new(
        settings.renderer.command.clone(),
        settings.renderer.workdir.clone(),
    ));

    let state = AppState {
        transcription_service,
        render_launcher,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
