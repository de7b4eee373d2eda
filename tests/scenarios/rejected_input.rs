//! Scenario: Submitting bad input
//!
//! Journey: An operator mistypes fields while adding stock.
//!
//! Success Criteria:
//! - Every failing field is reported at once, under the key that was used
//! - The submitted values come back sanitized
//! - Nothing is stored

use crate::common::*;

#[test]
fn scenario_invalid_due_date_stores_nothing() {
    let env = TestEnv::new();
    let ford = env
        .run(&["manufacturer", "create", "-f", "name=Ford"])
        .created_id();
    let manufacturer_field = format!("manufacturer={}", ford);
    let focus = env
        .run(&["vehicle", "create", "-f", "model=Focus", "-f", manufacturer_field.as_str()])
        .created_id();
    let vehicle_field = format!("vehicle={}", focus);

    let result = env.run(&[
        "instance",
        "create",
        "-f",
        vehicle_field.as_str(),
        "-f",
        "dueBack=not-a-date",
        "-f",
        "customer=<script>",
    ]);
    assert_eq!(result.exit_code, 1);
    let report = result.json();
    assert_eq!(report["error"], "validation_failed");
    assert_eq!(report["errors"][0]["field"], "dueBack");
    assert_eq!(report["errors"][0]["message"], "Invalid date");
    assert_eq!(report["input"]["customer"], "&lt;script&gt;");

    let instances = env.run(&["instance", "list"]).json();
    assert!(instances.as_array().unwrap().is_empty());
}

#[test]
fn scenario_unknown_references_are_reported_per_field() {
    let env = TestEnv::new();
    let result = env.run(&[
        "vehicle",
        "create",
        "-f",
        "model=Ghost",
        "-f",
        "make=01ARZ3NDEKTSV4RRFFQ69G5FAV",
    ]);
    assert_eq!(result.exit_code, 1);
    let report = result.json();
    assert_eq!(report["errors"][0]["field"], "make");
    assert_eq!(report["errors"][0]["message"], "Manufacturer does not exist.");
}

#[test]
fn scenario_malformed_field_flag_is_a_usage_error() {
    let env = TestEnv::new();
    let result = env.run(&["manufacturer", "create", "-f", "no-equals-sign"]);
    assert!(!result.success);
    assert!(result.stderr.contains("expected key=value"));
}

#[test]
fn scenario_text_output_lists_errors() {
    let env = TestEnv::new();
    env.write_config("[output]\nformat = \"text\"\n");
    let data_dir = env.data_dir();
    let data_dir = data_dir.to_str().unwrap();
    // --json is always passed by `run`; drive the binary directly for text.
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_autolot"))
        .current_dir(env.root.path())
        .env("HOME", env.root.path())
        .env("XDG_CONFIG_HOME", env.root.path().join(".config"))
        .args(["--data-dir", data_dir, "manufacturer", "create", "-f", "name=F"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid manufacturer input:"));
    assert!(stderr.contains("name: Manufacturer name must be specified."));
}
