use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_rows(dir: &tempfile::TempDir) -> PathBuf {
    let csv = "\
injections,pulse_width_ms,total_mass_g,include
10,2,0.02,yes
10,4,0.06,
10,1,0.008,
";
    let path = dir.path().join("rows.csv");
    fs::write(&path, csv).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["characterize"], 2, "required", "stderr")]
#[case(&["characterize", "--data", "ROWS", "--exclude", "3"], 0, "deadtime: 1.0 ms", "stdout")]
#[case(&["characterize", "--data", "ROWS", "--exclude", "9"], 3, "no such row", "stderr")]
#[case(&["characterize", "--data", "missing.csv"], 1, "Could not open the rows CSV", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let rows = write_rows(&dir);

    let mut cmd = Command::cargo_bin("injector").unwrap();
    cmd.current_dir(dir.path()).arg("--log-level").arg("error");
    for a in args {
        if *a == "ROWS" {
            cmd.arg(&rows);
        } else {
            cmd.arg(a);
        }
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn characterize_prints_table_without_nan() {
    let dir = tempdir().unwrap();
    let rows = write_rows(&dir);

    Command::cargo_bin("injector")
        .unwrap()
        .arg("--log-level")
        .arg("error")
        .arg("characterize")
        .arg("--data")
        .arg(&rows)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows in fit: 3"))
        .stdout(predicate::str::contains("mg/pulse"))
        .stdout(predicate::str::contains("NaN").not());
}

#[rstest]
fn cli_reports_bad_rows_header() {
    let dir = tempdir().unwrap();
    let bad_csv = dir.path().join("rows.csv");
    fs::write(&bad_csv, "pulses,width,mass\n10,2,0.02\n").unwrap();

    Command::cargo_bin("injector")
        .unwrap()
        .arg("characterize")
        .arg("--data")
        .arg(&bad_csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn config_controls_precision() {
    let dir = tempdir().unwrap();
    let rows = write_rows(&dir);
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[display]\ndecimals = 3\n").unwrap();

    Command::cargo_bin("injector")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--log-level")
        .arg("error")
        .arg("characterize")
        .arg("--data")
        .arg(&rows)
        .arg("--exclude")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadtime: 1.000 ms"))
        .stdout(predicate::str::contains("(166.666 cc/min)"));
}

#[rstest]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[display]\ndecimals = 42\n").unwrap();

    Command::cargo_bin("injector")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("display.decimals must be <= 9"));
}

#[rstest]
fn session_script_from_stdin() {
    let script = "\
# two runs, then a typo
set 0 injections 10
set 0 pulse_width_ms 2
set 0 total_mass_g 0.02
set 1 injections 10
set 1 pulse_width_ms 4
set 1 total_mass_g 0.06
set 7 injections 3
remove 2
";
    assert_cmd::Command::cargo_bin("injector")
        .unwrap()
        .arg("--log-level")
        .arg("error")
        .arg("session")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("deadtime: 1.0 ms"))
        .stderr(predicate::str::contains("line 8: unknown row id 7"));
}
