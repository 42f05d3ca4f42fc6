use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use shuttle_coach::models::{Joint, PoseFrame, PoseSequence};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn shuttle_coach(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shuttle-coach").unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env("SHUTTLE_COACH_CONFIG", config_dir.join("config.toml"));
    cmd
}

/// 40 frames, arm raised at 175° and shifted 25px at frame 10
fn write_overhead_poses(path: &Path) {
    let theta = 175f64.to_radians();
    let poses: PoseSequence = (0..40)
        .map(|i| {
            let x = if i >= 10 { 125.0 } else { 100.0 };
            Some(
                PoseFrame::new()
                    .with_joint(Joint::RightShoulder, (x, 300.0))
                    .with_joint(Joint::RightElbow, (x, 200.0))
                    .with_joint(
                        Joint::RightWrist,
                        (x + 100.0 * theta.sin(), 200.0 + 100.0 * theta.cos()),
                    ),
            )
        })
        .collect();
    fs::write(path, serde_json::to_string(&poses).unwrap()).unwrap();
}

fn write_frames(dir: &Path, count: usize) {
    fs::create_dir_all(dir).unwrap();
    for i in 0..count {
        RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]))
            .save(dir.join(format!("{:05}.png", i)))
            .unwrap();
    }
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("shuttle-coach").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Badminton shot detection"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("shuttle-coach").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("shuttle-coach").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("_shuttle__coach").and(predicate::str::contains("complete -F")),
        );
}

#[test]
fn test_analyze_offline_writes_result() {
    let dir = TempDir::new().unwrap();
    let poses = dir.path().join("poses.json");
    let output = dir.path().join("result.json");
    write_overhead_poses(&poses);

    shuttle_coach(dir.path())
        .args(["analyze", "--offline", "--poses"])
        .arg(&poses)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Overhead"))
        .stdout(predicate::str::contains("Good form"));

    let result: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        result["shots"],
        serde_json::json!([{ "frame": 10, "shot_type": "Overhead", "pose_errors": [] }])
    );
    assert_eq!(result["gemini_feedback"], "");
}

#[test]
fn test_analyze_missing_pose_file() {
    let dir = TempDir::new().unwrap();

    shuttle_coach(dir.path())
        .args(["analyze", "--offline", "--poses"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read pose file"));
}

#[test]
fn test_trajectory_on_missing_directory() {
    let dir = TempDir::new().unwrap();

    shuttle_coach(dir.path())
        .args(["trajectory", "--frames"])
        .arg(dir.path().join("no-frames"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Video source could not be read"));
}

#[test]
fn test_trajectory_json_on_blank_frames() {
    let dir = TempDir::new().unwrap();
    let frames = dir.path().join("frames");
    write_frames(&frames, 4);

    shuttle_coach(dir.path())
        .args(["trajectory", "--json", "--frames"])
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"avg_speed\": 0.0"));
}

#[test]
fn test_render_writes_every_frame() {
    let dir = TempDir::new().unwrap();
    let frames = dir.path().join("frames");
    let poses = dir.path().join("poses.json");
    let analysis = dir.path().join("analysis.json");
    let out = dir.path().join("out");
    write_frames(&frames, 12);
    fs::write(&poses, "[]").unwrap();
    fs::write(
        &analysis,
        r#"{"shots":[{"frame":2,"shot_type":"Net Shot","pose_errors":[]}],"gemini_feedback":""}"#,
    )
    .unwrap();

    shuttle_coach(dir.path())
        .args(["render", "--frames"])
        .arg(&frames)
        .arg("--poses")
        .arg(&poses)
        .arg("--analysis")
        .arg(&analysis)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 12 annotated frames"))
        .stdout(predicate::str::contains("@ 30 fps"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 12);
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();

    shuttle_coach(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
    assert!(dir.path().join("config.toml").exists());

    shuttle_coach(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    shuttle_coach(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrist_speed_threshold = 20.0"));
}
