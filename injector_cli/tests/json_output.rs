use assert_cmd::Command;
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.output().expect("run injector");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = String::from_utf8(out.stdout).expect("utf8");
    serde_json::from_str(text.trim()).expect("stdout is one JSON document")
}

/// Validate the JSON schema for a characterization run.
#[rstest]
fn characterize_json_schema() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("rows.csv");
    fs::write(
        &rows,
        "injections,pulse_width_ms,total_mass_g\n10,2,0.02\n10,4,0.06\n10,,0.01\n",
    )
    .unwrap();

    let v = stdout_json(
        Command::cargo_bin("injector")
            .unwrap()
            .arg("--json")
            .arg("--log-level")
            .arg("error")
            .arg("characterize")
            .arg("--data")
            .arg(&rows),
    );

    let summary = &v["summary"];
    assert!((summary["flow_rate_g_per_s"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    assert!((summary["deadtime_ms"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((summary["flow_rate_cc_per_min"].as_f64().unwrap() - 166.666).abs() < 1e-6);
    assert_eq!(summary["included_rows"], 2);

    let rows = v["rows"].as_array().unwrap();
    // three CSV rows plus the open row
    assert_eq!(rows.len(), 4);
    assert!(rows[2]["pulse_width_ms"].is_null());
    assert!(rows[2]["metrics"].is_null());
    let m = &rows[1]["metrics"];
    assert!((m["actual_mass_per_pulse_mg"].as_f64().unwrap() - 6.0).abs() < 1e-9);
    assert!(m["percent_error"].as_f64().unwrap().abs() < 1e-9);

    assert_eq!(v["measured"].as_array().unwrap().len(), 2);
    // deadtime point + two observed widths
    assert_eq!(v["fitted"].as_array().unwrap().len(), 3);
}

#[rstest]
fn degenerate_session_emits_nulls() {
    let v = stdout_json(
        Command::cargo_bin("injector")
            .unwrap()
            .arg("--json")
            .arg("--log-level")
            .arg("error")
            .arg("session")
            .write_stdin("set 0 injections 10\nset 0 pulse_width_ms 2\nset 0 total_mass_g 0.02\n"),
    );
    assert!(v["summary"]["deadtime_ms"].is_null());
    assert!(v["summary"]["flow_rate_g_per_s"].is_null());
    assert!(v["rows"][0]["metrics"]["percent_error"].is_null());
    let actual = v["rows"][0]["metrics"]["actual_mass_per_pulse_mg"]
        .as_f64()
        .unwrap();
    assert!((actual - 2.0).abs() < 1e-9);
}

#[rstest]
fn json_errors_are_structured() {
    let out = Command::cargo_bin("injector")
        .unwrap()
        .arg("--json")
        .arg("characterize")
        .arg("--data")
        .arg("definitely-missing.csv")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    let last = stderr.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(v["message"].as_str().unwrap().contains("rows CSV"));
}

#[rstest]
fn session_show_emits_json_lines() {
    let out = Command::cargo_bin("injector")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("session")
        .write_stdin("set 0 injections 10\nshow\n")
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let docs: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    // one for `show`, one at end of input
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["rows"][0]["injections"], 10.0);
}
