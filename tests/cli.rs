use std::process::{Command, Output};

use serde_json::Value;

fn stream_faker(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stream-faker"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn console_run_writes_only_records_and_summary_to_stderr() {
    let output = stream_faker(&["--service-name", "console", "--max-count", "3", "--delay-ms", "0"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 4, "unexpected stderr: {stderr}");

    for line in &lines[..3] {
        let record: Value = serde_json::from_str(line).unwrap();
        assert_eq!(record.as_object().unwrap().len(), 6);
    }
    assert_eq!(lines[3], "Total 3 records are processed");
}

#[test]
fn network_service_without_stream_name_fails_before_generating() {
    let output = stream_faker(&["--service-name", "kinesis", "--max-count", "3", "--delay-ms", "0"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stderr.contains("Total"), "unexpected stderr: {stderr}");
    assert!(
        stderr.lines().all(|line| serde_json::from_str::<Value>(line).is_err()),
        "unexpected stderr: {stderr}"
    );
}
