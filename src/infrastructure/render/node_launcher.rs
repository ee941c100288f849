use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::application::ports::{RenderError, RenderLauncher};
use crate::domain::{JobId, RenderJob};

use super::output_relay::{self, RelayedLine};

/// Disposable entry point handed to the renderer command. The rendering
/// pipeline reads its parameters from the environment, so the script
/// content is identical for every job.
const RUNNER_SCRIPT: &str = r#"import { generateVideo } from './localBuild.mjs';

const params = {
    videoTopic: process.env.VIDEO_TOPIC,
    agentA: process.env.AGENT_A,
    agentB: process.env.AGENT_B,
    music: process.env.MUSIC,
    background: process.env.BACKGROUND,
    aiGeneratedImages: process.env.AI_GENERATED_IMAGES === 'true',
    fps: parseInt(process.env.FPS || '20'),
    duration: parseInt(process.env.DURATION || '1'),
    cleanSrt: process.env.CLEAN_SRT === 'true',
    local: true
};

generateVideo(params)
    .then(() => console.log('Video generation completed'))
    .catch((error) => {
        console.error('Error generating video:', error);
        process.exit(1);
    });
"#;

/// Launches the Node.js rendering pipeline as a supervised child process.
///
/// Each launch writes its own runner script (the path is keyed by job id,
/// so concurrent launches never share a file), spawns the renderer with
/// the job parameters overlaid onto the inherited environment, and hands
/// the child to a background supervisor. The supervisor relays both output
/// streams to the log sink, observes the exit status, and deletes the
/// runner script.
pub struct NodeRenderLauncher {
    command: String,
    workdir: PathBuf,
}

impl NodeRenderLauncher {
    pub fn new(command: String, workdir: PathBuf) -> Self {
        Self { command, workdir }
    }

    /// Runner scripts live next to the rendering pipeline so its relative
    /// imports resolve.
    pub fn runner_script_path(&self, job_id: JobId) -> PathBuf {
        self.workdir.join(format!("render-job-{}.mjs", job_id))
    }

    async fn remove_script(&self, script_path: &Path) {
        if let Err(e) = tokio::fs::remove_file(script_path).await {
            tracing::warn!(path = %script_path.display(), error = %e, "Failed to remove runner script");
        }
    }
}

#[async_trait]
impl RenderLauncher for NodeRenderLauncher {
    async fn launch(&self, job: &RenderJob) -> Result<(), RenderError> {
        let script_path = self.runner_script_path(job.id);

        tokio::fs::write(&script_path, RUNNER_SCRIPT)
            .await
            .map_err(|e| RenderError::ScriptWrite(e.to_string()))?;

        let mut child = match Command::new(&self.command)
            .arg(&script_path)
            .current_dir(&self.workdir)
            .envs(job.params.env_vars())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                self.remove_script(&script_path).await;
                return Err(RenderError::SpawnFailed(e.to_string()));
            }
        };

        let lines = match output_relay::spawn_relays(&mut child) {
            Ok(rx) => rx,
            Err(e) => {
                let _ = child.start_kill();
                self.remove_script(&script_path).await;
                return Err(e);
            }
        };

        tracing::info!(
            job_id = %job.id,
            pid = ?child.id(),
            command = %self.command,
            "Renderer process spawned"
        );

        tokio::spawn(supervise(job.id, child, lines, script_path));

        Ok(())
    }
}

/// Owns the child after launch: waits for exit, drains the log consumer,
/// and cleans up the runner script. Never joined by the request path.
async fn supervise(
    job_id: JobId,
    mut child: Child,
    lines: mpsc::Receiver<RelayedLine>,
    script_path: PathBuf,
) {
    let consumer = tokio::spawn(output_relay::log_lines(job_id, lines));

    match child.wait().await {
        Ok(status) if status.success() => {
            tracing::info!(job_id = %job_id, "Renderer process completed");
        }
        Ok(status) => {
            tracing::error!(job_id = %job_id, code = ?status.code(), "Renderer process failed");
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Failed to wait on renderer process");
        }
    }

    // Readers hit EOF once the process exits, which closes the channel.
    let _ = consumer.await;

    if let Err(e) = tokio::fs::remove_file(&script_path).await {
        tracing::warn!(job_id = %job_id, error = %e, "Failed to remove runner script");
    }
}
