use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "kabos-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_kabos-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("restart-cycle"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_kabos-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--seeds",
            "7,100..102",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "cli failed: {stdout}");
    assert!(stdout.contains("Kabos Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = report.as_array().expect("array of results");
    assert_eq!(results.len(), 8 * 3);
    assert!(results.iter().all(|r| r["passed"] == true));
    assert!(results.iter().all(|r| r["iterations_run"] == 2));
}

#[test]
fn cli_honors_quiz_config_file() {
    let exe = env!("CARGO_BIN_EXE_kabos-tester");
    let config_path = temp_path("config");
    std::fs::write(
        &config_path,
        r#"{ "questions_per_stage": 1, "attempts_per_question": 3 }"#,
    )
    .expect("write config");
    let output_path = temp_path("config-report");
    let output = Command::new(exe)
        .args([
            "--report",
            "markdown",
            "--scenarios",
            "perfect-run,stumbler-run,saboteur-run",
            "--iterations",
            "1",
            "--config",
        ])
        .arg(&config_path)
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Kabos Logic Test Results"));
    assert!(content.contains("- **Failed**: 0"));
}

#[test]
fn cli_rejects_bad_config_and_seeds() {
    let exe = env!("CARGO_BIN_EXE_kabos-tester");
    let config_path = temp_path("bad-config");
    std::fs::write(&config_path, r#"{ "questions_per_stage": 0 }"#).expect("write config");
    let output = Command::new(exe)
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("questions_per_stage"));

    let output = Command::new(exe)
        .args(["--seeds", "banana"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unrecognized seed token"));
}
