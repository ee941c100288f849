use std::time::Duration;

use clipforge::application::ports::{RenderError, RenderLauncher};
use clipforge::domain::{RenderJob, VideoJobParams};
use clipforge::infrastructure::render::NodeRenderLauncher;

fn test_params() -> VideoJobParams {
    VideoJobParams {
        video_topic: "ownership and borrowing".to_string(),
        agent_a: "RICK".to_string(),
        agent_b: "MORTY".to_string(),
        music: "lofi".to_string(),
        background: "minecraft".to_string(),
        ai_generated_images: true,
        fps: 20,
        duration: 1,
        clean_srt: true,
    }
}

async fn wait_until_removed(path: &std::path::Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn given_short_lived_child_when_launched_then_runner_script_is_cleaned_up() {
    let workdir = tempfile::TempDir::new().unwrap();
    // `cat` prints the script and exits 0, standing in for the renderer.
    let launcher = NodeRenderLauncher::new("cat".to_string(), workdir.path().to_path_buf());

    let job = RenderJob::new(test_params());
    let script_path = launcher.runner_script_path(job.id);

    launcher.launch(&job).await.unwrap();

    assert!(wait_until_removed(&script_path).await);
}

#[tokio::test]
async fn given_failing_child_when_launched_then_script_still_cleaned_up() {
    let workdir = tempfile::TempDir::new().unwrap();
    // `sh` chokes on the JS runner and exits non-zero; supervision must
    // still observe the exit and remove the script.
    let launcher = NodeRenderLauncher::new("sh".to_string(), workdir.path().to_path_buf());

    let job = RenderJob::new(test_params());
    let script_path = launcher.runner_script_path(job.id);

    launcher.launch(&job).await.unwrap();

    assert!(wait_until_removed(&script_path).await);
}

#[tokio::test]
async fn given_unknown_command_when_launched_then_spawn_fails_and_script_removed() {
    let workdir = tempfile::TempDir::new().unwrap();
    let launcher = NodeRenderLauncher::new(
        "/nonexistent/renderer-binary".to_string(),
        workdir.path().to_path_buf(),
    );

    let job = RenderJob::new(test_params());
    let script_path = launcher.runner_script_path(job.id);

    match launcher.launch(&job).await {
        Err(RenderError::SpawnFailed(_)) => {}
        other => panic!("expected SpawnFailed, got {:?}", other),
    }
    assert!(!script_path.exists());
}

#[tokio::test]
async fn given_unwritable_workdir_when_launched_then_script_write_fails() {
    let launcher = NodeRenderLauncher::new(
        "cat".to_string(),
        std::path::PathBuf::from("/nonexistent/workdir"),
    );

    let job = RenderJob::new(test_params());

    match launcher.launch(&job).await {
        Err(RenderError::ScriptWrite(_)) => {}
        other => panic!("expected ScriptWrite, got {:?}", other),
    }
}

#[tokio::test]
async fn given_two_jobs_then_runner_script_paths_are_distinct() {
    let workdir = tempfile::TempDir::new().unwrap();
    let launcher = NodeRenderLauncher::new("cat".to_string(), workdir.path().to_path_buf());

    let first = RenderJob::new(test_params());
    let second = RenderJob::new(test_params());

    assert_ne!(
        launcher.runner_script_path(first.id),
        launcher.runner_script_path(second.id)
    );
}

#[tokio::test]
async fn given_concurrent_launches_then_each_keeps_its_own_script() {
    let workdir = tempfile::TempDir::new().unwrap();
    let launcher = NodeRenderLauncher::new("cat".to_string(), workdir.path().to_path_buf());

    let first = RenderJob::new(test_params());
    let second = RenderJob::new(test_params());

    let (a, b) = tokio::join!(launcher.launch(&first), launcher.launch(&second));
    a.unwrap();
    b.unwrap();

    assert!(wait_until_removed(&launcher.runner_script_path(first.id)).await);
    assert!(wait_until_removed(&launcher.runner_script_path(second.id)).await);
}
