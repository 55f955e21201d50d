use crate::error::{Result, SysupError};
use crate::utils::run_log::RunLog;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;

/// Outcome of one blocking apt invocation.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    pub success: bool,
    pub exit_code: i32,
    /// Combined stdout and stderr, stdout first.
    pub output: String,
}

/// AptExecutionAgent drives the apt-get CLI and captures its output.
///
/// Every invocation runs with `LC_ALL=C` and
/// `DEBIAN_FRONTEND=noninteractive` so the output markers the count
/// extraction relies on stay stable and apt never prompts on its own.
pub struct AptExecutionAgent {
    apt_get: PathBuf,
}

impl AptExecutionAgent {
    pub fn new() -> Self {
        Self {
            apt_get: PathBuf::from("apt-get"),
        }
    }

    /// Point the agent at a different binary. Tests use stub scripts.
    pub fn with_command<P: AsRef<Path>>(apt_get: P) -> Self {
        Self {
            apt_get: apt_get.as_ref().to_path_buf(),
        }
    }

    pub fn refresh_lists(&self, log: &mut RunLog) -> Result<CommandCapture> {
        self.run(&["update"], "Refreshing package lists", log)
    }

    /// Upgrade simulation; its `Inst` lines are the upgradable count.
    pub fn simulate_upgrade(&self, log: &mut RunLog) -> Result<CommandCapture> {
        self.run(&["-s", "upgrade"], "Calculating upgrade candidates", log)
    }

    pub fn apply_upgrades(&self, log: &mut RunLog) -> Result<CommandCapture> {
        self.run(&["-y", "upgrade"], "Applying upgrades", log)
    }

    pub fn remove_unused(&self, log: &mut RunLog) -> Result<CommandCapture> {
        self.run(&["-y", "autoremove"], "Removing unused packages", log)
    }

    pub fn clear_cache(&self, log: &mut RunLog) -> Result<CommandCapture> {
        self.run(&["clean"], "Clearing package cache", log)
    }

    fn run(&self, args: &[&str], label: &str, log: &mut RunLog) -> Result<CommandCapture> {
        log.detail(&format!(
            "Executing: {} {}",
            self.apt_get.display(),
            args.join(" ")
        ));

        let spinner = ProgressBar::new_spinner();
        if log.is_verbose() {
            spinner.set_draw_target(ProgressDrawTarget::hidden());
        }
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {msg}")
                .unwrap(),
        );
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = Command::new(&self.apt_get)
            .args(args)
            .env("LC_ALL", "C")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .output();

        spinner.finish_and_clear();

        let output = result.map_err(|e| {
            SysupError::CommandExecution(format!(
                "Failed to execute '{} {}': {e}",
                self.apt_get.display(),
                args.join(" ")
            ))
        })?;

        Ok(Self::capture(&output, log))
    }

    fn capture(output: &Output, log: &mut RunLog) -> CommandCapture {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }
        log.raw(&combined);

        CommandCapture {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        }
    }
}

impl Default for AptExecutionAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("apt-get");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn captures_combined_output() {
        let dir = tempdir().unwrap();
        let agent = AptExecutionAgent::with_command(stub(
            dir.path(),
            "echo from-stdout\necho from-stderr >&2\nexit 0",
        ));
        let mut log = RunLog::create(dir.path(), false).unwrap();
        let capture = agent.refresh_lists(&mut log).unwrap();
        assert!(capture.success);
        assert_eq!(capture.exit_code, 0);
        assert!(capture.output.contains("from-stdout"));
        assert!(capture.output.contains("from-stderr"));
    }

    #[test]
    fn reports_failing_exit_code() {
        let dir = tempdir().unwrap();
        let agent = AptExecutionAgent::with_command(stub(dir.path(), "exit 100"));
        let mut log = RunLog::create(dir.path(), false).unwrap();
        let capture = agent.refresh_lists(&mut log).unwrap();
        assert!(!capture.success);
        assert_eq!(capture.exit_code, 100);
    }

    #[test]
    fn missing_binary_is_an_execution_error() {
        let dir = tempdir().unwrap();
        let agent = AptExecutionAgent::with_command(dir.path().join("no-such-apt"));
        let mut log = RunLog::create(dir.path(), false).unwrap();
        let err = agent.refresh_lists(&mut log).unwrap_err();
        assert!(matches!(err, SysupError::CommandExecution(_)));
    }
}
