//! Test environment for isolated autolot runs.
//!
//! Every run gets `--data-dir` and `--json`, starts in a temp working
//! directory, and sees no user config or `AUTOLOT_*` variables from the
//! host.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Result of running an autolot CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as JSON, failing the test with the full output if it isn't.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({}).\nOutput:\n{}",
                e,
                self.combined_output()
            )
        })
    }

    /// `id` of a create receipt
    pub fn created_id(&self) -> String {
        assert!(
            self.success,
            "expected success.\nOutput:\n{}",
            self.combined_output()
        );
        self.json()["id"]
            .as_str()
            .expect("receipt has an id")
            .to_string()
    }
}

pub struct TestEnv {
    pub root: TempDir,
    autolot_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
            autolot_bin: PathBuf::from(env!("CARGO_BIN_EXE_autolot")),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    /// Write `./autolot.toml` in the working directory
    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.root.path().join("autolot.toml"), toml)
            .expect("Failed to write config");
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let data_dir = self.data_dir();
        let mut cmd = Command::new(&self.autolot_bin);
        cmd.current_dir(self.root.path())
            .arg("--json")
            .arg("--data-dir")
            .arg(&data_dir)
            .args(args);
        isolate(&mut cmd, self.root.path());

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute autolot");
        output_to_result(output)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn isolate(cmd: &mut Command, home: &Path) {
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("APPDATA", home.join("AppData"));
    for (key, _) in std::env::vars() {
        if key.starts_with("AUTOLOT_") {
            cmd.env_remove(key);
        }
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
