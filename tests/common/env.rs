//! Test environment for rackfit CLI runs.
//!
//! Provides `TestEnv` - a temp directory holding a catalog and a build file,
//! plus a helper that runs the binary against them.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a rackfit CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Catalog in YAML, the format most teams keep by hand
pub const CATALOG_YAML: &str = r#"
cpu:
  - uuid: cpu-i9
    model: Core i9-13900K
    socket: LGA1700
  - uuid: cpu-6338
    model: Xeon Gold 6338
    socket: LGA4189
motherboard:
  - uuid: mb-z790
    socket: lga 1700
    max_cpus: 1
  - uuid: mb-x12dpi
    socket: LGA 4189
    max_cpus: 1
    pcie_slots:
      - size: x16
        count: 2
    riser_slots:
      - size: x16
        count: 1
pciecard:
  - uuid: riser-2x8
    subtype: riser
    slot_size: x16
    provides_slots:
      - size: x8
        count: 2
"#;

/// Builds whose `assignment` column holds JSON text
pub const BUILDS_JSON: &str = r#"{
  "builds": [
    {"build_id": "desk", "components": [
      {"type": "motherboard", "uuid": "mb-z790"},
      {"type": "cpu", "uuid": "cpu-i9"}
    ]},
    {"build_id": "rack", "components": [
      {"type": "motherboard", "uuid": "mb-x12dpi"},
      {"type": "pciecard", "uuid": "riser-2x8"}
    ]}
  ]
}"#;

/// Isolated directory with a catalog and build file
pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("catalog.yaml"), CATALOG_YAML).expect("write catalog");
        std::fs::write(root.path().join("builds.json"), BUILDS_JSON).expect("write builds");
        Self {
            root,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_rackfit")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        std::fs::write(self.path(relative), content).expect("write file");
    }

    /// Run rackfit with the environment's directory as cwd
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_in(self.root.path(), args)
    }

    fn run_in(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(&self.bin)
            .current_dir(cwd)
            .args(args)
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("XDG_CONFIG_HOME", self.root.path().join("xdg"))
            .env("HOME", self.root.path())
            .output()
            .expect("run rackfit");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
