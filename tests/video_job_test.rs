use std::collections::HashMap;

use clipforge::domain::{JobId, RenderJob, VideoJobParams};

fn base_params() -> VideoJobParams {
    VideoJobParams {
        video_topic: "why borrowck says no".to_string(),
        agent_a: "RICK".to_string(),
        agent_b: "MORTY".to_string(),
        music: "phonk".to_string(),
        background: "subway".to_string(),
        ai_generated_images: true,
        fps: 20,
        duration: 1,
        clean_srt: true,
    }
}

#[test]
fn given_default_params_then_env_overlay_matches_renderer_contract() {
    let env: HashMap<_, _> = base_params().env_vars().into_iter().collect();

    assert_eq!(env.len(), 9);
    assert_eq!(env["VIDEO_TOPIC"], "why borrowck says no");
    assert_eq!(env["AGENT_A"], "RICK");
    assert_eq!(env["AGENT_B"], "MORTY");
    assert_eq!(env["MUSIC"], "phonk");
    assert_eq!(env["BACKGROUND"], "subway");
    assert_eq!(env["AI_GENERATED_IMAGES"], "true");
    assert_eq!(env["FPS"], "20");
    assert_eq!(env["DURATION"], "1");
    assert_eq!(env["CLEAN_SRT"], "true");
}

#[test]
fn given_false_booleans_then_env_values_are_lowercase_false() {
    let mut params = base_params();
    params.ai_generated_images = false;
    params.clean_srt = false;

    let env: HashMap<_, _> = params.env_vars().into_iter().collect();
    assert_eq!(env["AI_GENERATED_IMAGES"], "false");
    assert_eq!(env["CLEAN_SRT"], "false");
}

#[test]
fn given_custom_integers_then_env_values_are_stringified() {
    let mut params = base_params();
    params.fps = 30;
    params.duration = 4;

    let env: HashMap<_, _> = params.env_vars().into_iter().collect();
    assert_eq!(env["FPS"], "30");
    assert_eq!(env["DURATION"], "4");
}

#[test]
fn given_two_job_ids_then_they_never_collide() {
    assert_ne!(JobId::new(), JobId::new());
}

#[test]
fn given_job_id_then_display_round_trips_through_uuid() {
    let id = JobId::new();
    let parsed = uuid::Uuid::parse_str(&id.to_string()).unwrap();
    assert_eq!(JobId::from_uuid(parsed), id);
}

#[test]
fn given_new_jobs_then_each_gets_its_own_id() {
    let first = RenderJob::new(base_params());
    let second = RenderJob::new(base_params());
    assert_ne!(first.id, second.id);
}
