//! Shared helpers for CLI tests.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Isolated project directory for a CLI run.
#[allow(dead_code)]
pub struct TestContext {
    project: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let project = TempDir::new().expect("Failed to create temp project directory");
        Self { project }
    }

    pub fn project_dir(&self) -> &Path {
        self.project.path()
    }

    pub fn write_manifest(&self, content: &str) {
        std::fs::write(self.project.path().join("fastly.toml"), content)
            .expect("Failed to write fastly.toml");
    }

    /// `fastly` with no ambient configuration leaking in from the host.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("fastly").expect("Failed to locate fastly binary");
        cmd.current_dir(self.project.path())
            .env("FASTLY_PROJECT_DIR", self.project.path())
            .env_remove("FASTLY_API_TOKEN")
            .env_remove("FASTLY_API_ENDPOINT")
            .env_remove("FASTLY_SERVICE_ID")
            .env_remove("RUST_LOG");
        cmd
    }
}
