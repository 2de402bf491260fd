//! End-to-end tests running the `biller` binary against a data file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const REFERENCE: &str = "
families:
  W&E:
    persons: [ Willow, Emersyn ]
  M&M:
    persons: [ Mckenna, Mia ]
  S:
    persons: [ Steven ]
bills:
  - desc: water
    mode: per-person-per-day
  - desc: internet
    mode: per-family-per-day
  - desc: rent
    mode: per-family
    tmpl: |-
      Rent for ${amount}
      ${content}
activities:
  20220101: { Willow: +1, Emersyn: +1 }
  20220105: { Mia: +1, Steven: +1 }
  20220110: { Willow: -1 }
  20220115: { Mia: 0 }
  20220116: { Mia: 0 }
";

fn biller_binary() -> String {
    env!("CARGO_BIN_EXE_biller").to_string()
}

/// Writes the reference data file into a fresh temp dir.
fn setup() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data.yaml");
    std::fs::write(&data, REFERENCE).unwrap();
    (temp, data)
}

/// A command isolated from the user's config and environment.
fn biller(home: &Path) -> Command {
    let mut cmd = Command::new(biller_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("BILLER_DATA_PATH")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_compute_prints_shares_report() {
    let (temp, data) = setup();
    let output = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .args(["compute", "water", "20220101", "20220131", "33.12"])
        .output()
        .unwrap();

    assert!(output.status.success(), "compute failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "========================
==== SHARES REPORT =====
========================
water bill: 20220101~20220131(31d) 33.12
20220101~20220104(4d): Willow, Emersyn
20220105~20220109(5d): Willow, Emersyn, Mia, Steven
20220110~20220114(5d): Emersyn, Mia, Steven
20220115~20220116(2d): Emersyn, Steven
20220117~20220131(15d): Emersyn, Mia, Steven
water per person per day: $33.12/(4*2+5*4+5*3+2*2+15*3)=$0.36
W&E: $0.36*(4*2+5*2+5*1+2*1+15*1)=$14.4
M&M: $0.36*(5*1+5*1+15*1)=$9
S: $0.36*(5*1+5*1+2*1+15*1)=$9.72
"
    );
}

#[test]
fn test_compute_renders_billed_report_from_template() {
    let (temp, data) = setup();
    let output = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .args(["compute", "2", "20220101", "20220131", "900"])
        .output()
        .unwrap();

    assert!(output.status.success(), "compute failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("rent per family: $900/(3)=$300\n"));
    assert!(out.contains("==== BILLED REPORT =====\n========================\nRent for 900\n"));
}

#[test]
fn test_data_path_from_config_file() {
    let (temp, data) = setup();
    let config = temp.path().join("biller.toml");
    std::fs::write(&config, format!("data_path = {:?}\n", data.display().to_string())).unwrap();

    let output = biller(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("bills")
        .output()
        .unwrap();

    assert!(output.status.success(), "bills failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "[0]: water - per-person-per-day\n[1]: internet - per-family-per-day\n[2]: rent - per-family\n"
    );
}

#[test]
fn test_data_yaml_in_working_directory_is_the_default() {
    let (temp, _data) = setup();
    let output = biller(temp.path()).arg("timeline").output().unwrap();

    assert!(output.status.success(), "timeline failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "20220101: Willow, Emersyn
20220105: Willow, Emersyn, Mia, Steven
20220110: Emersyn, Mia, Steven
20220115: Emersyn, Steven
20220117: Emersyn, Mia, Steven
"
    );
}

#[test]
fn test_unknown_bill_fails_with_message() {
    let (temp, data) = setup();
    let output = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .args(["compute", "gas", "20220101", "20220131", "10"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("cannot find bill under name gas"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_inconsistent_log_is_reported_at_startup() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data.yaml");
    std::fs::write(
        &data,
        "families:\n  S:\n    persons: [ Steven ]\nactivities:\n  20220101: { Steven: -1 }\n",
    )
    .unwrap();

    let output = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .arg("timeline")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("was not previously there"));
}

#[test]
fn test_missing_arguments_are_prompted_for() {
    let (temp, data) = setup();
    let mut child = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .arg("compute")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"internet\n20220101\n20220131\n38.678\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "compute failed: {}", stderr(&output));
    let prompts = stderr(&output);
    assert!(prompts.contains("List of bills:\n[0]: water - per-person-per-day\n"));
    assert!(prompts.contains("Which bill to generate? "));
    assert!(prompts.contains("Amount? "));
    assert!(stdout(&output).contains("internet per family per day: $38.678/(4+5*3+5*3+2*2+15*3)=$0.466\n"));
}

#[test]
fn test_compute_json_output() {
    let (temp, data) = setup();
    let output = biller(temp.path())
        .arg("--data")
        .arg(&data)
        .args(["compute", "rent", "20220101", "20220131", "900", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "compute failed: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "per-family");
    assert_eq!(value["rate"], 300.0);
    assert_eq!(value["intervals"].as_array().unwrap().len(), 5);
    assert_eq!(value["charges"][2]["family"], "S");
}
