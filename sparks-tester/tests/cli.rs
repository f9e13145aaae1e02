use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "sparks-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_sparks-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("sustainability-fill"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_sparks-tester");
    let output_path = temp_path("run");
    let status = Command::new(exe)
        .args(["--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["failed"], 0);
    assert_eq!(report["results"].as_array().map(Vec::len), Some(10));
}

#[test]
fn cli_rejects_unknown_scenario() {
    let exe = env!("CARGO_BIN_EXE_sparks-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "does-not-exist"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown scenario"));
}

#[test]
fn cli_dumps_charts_for_inputs() {
    let exe = env!("CARGO_BIN_EXE_sparks-tester");
    let output_path = temp_path("dump");
    let status = Command::new(exe)
        .args(["--dump-charts", "--inputs", "mau_scale=1.5", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let dump: serde_json::Value = serde_json::from_str(&content).expect("json dump");
    assert_eq!(dump["inputs"]["mau_scale"], 1.5);
    assert_eq!(dump["input_charts"].as_array().map(Vec::len), Some(8));
    assert_eq!(dump["result_charts"].as_array().map(Vec::len), Some(10));
}
