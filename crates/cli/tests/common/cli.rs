//! CLI command execution helpers with automatic timing
//!
//! Wraps the `dagseal` binary with a per-test store and config file and
//! provides convenient assertion methods.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct DagsealCommand {
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl DagsealCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let output = Command::new(env!("CARGO_BIN_EXE_dagseal"))
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout_text(),
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout_text()
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Raw stdout; `get` writes binary content here
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout_text().contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse the first node id (raw-<hex> or dag-<hex>) from stdout
    pub fn parse_node_id(&self) -> Option<String> {
        self.stdout_text().lines().find_map(extract_node_id)
    }
}

/// Extract a node id from a line of text
pub fn extract_node_id(line: &str) -> Option<String> {
    line.split_whitespace()
        .find(|word| {
            let hex = word.strip_prefix("raw-").or_else(|| word.strip_prefix("dag-"));
            matches!(hex, Some(h) if h.len() == 64 && h.chars().all(|c| c.is_ascii_hexdigit()))
        })
        .map(str::to_string)
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// dagseal!(dir, "import", "data").assert_success()?;
/// ```
#[macro_export]
macro_rules! dagseal {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::DagsealCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_extraction() {
        let id = format!("dag-{}", "ab".repeat(32));
        assert_eq!(extract_node_id(&format!("root {id}")), Some(id));
        assert_eq!(extract_node_id("raw-1234"), None);
        assert_eq!(extract_node_id(&format!("cid-{}", "0".repeat(64))), None);
    }
}
