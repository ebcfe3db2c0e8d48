use std::process::{Command, Output};

fn run_headless(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pledge-lungs"))
        .arg("--headless")
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch pledge-lungs")
}

#[test]
fn headless_report_describes_the_fill_state() {
    let output = run_headless(&["--pledges", "100"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "headless run should succeed");
    assert!(stdout.contains("100 / 200 pledges (50%)"), "{stdout}");
    assert!(stdout.contains("Halfway there!"), "{stdout}");
    assert!(stdout.contains("markers: 25 scene, 5 overlay"), "{stdout}");
}

#[test]
fn headless_json_report_saturates_past_the_goal() {
    let output = run_headless(&["--pledges", "500", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "headless json run should succeed");
    assert!(stdout.contains("\"tier\": \"complete\""), "{stdout}");
    assert!(stdout.contains("\"percentage\": 100"), "{stdout}");
    assert!(stdout.contains("\"scene_markers\": 50"), "{stdout}");
}

#[test]
fn missing_models_fail_with_context() {
    let output = run_headless(&["--model", "does/not/exist.glb"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "a missing model must abort start-up");
    assert!(stderr.contains("failed to load model"), "{stderr}");
}
