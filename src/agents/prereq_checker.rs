use crate::error::{Result, SysupError};
use std::path::{Path, PathBuf};

const REQUIRED_TOOLS: &[&str] = &["apt-get", "dpkg"];
const SUPPORTED_IDS: &[&str] = &["debian", "ubuntu"];

/// PrereqCheckerAgent validates the host before any state-changing command
/// runs: privileges first, then OS family, then required tools.
pub struct PrereqCheckerAgent {
    os_release_path: PathBuf,
}

impl PrereqCheckerAgent {
    pub fn new() -> Self {
        Self {
            os_release_path: PathBuf::from("/etc/os-release"),
        }
    }

    /// Read the OS descriptor from a different path. Tests use fixtures.
    pub fn with_os_release<P: AsRef<Path>>(path: P) -> Self {
        Self {
            os_release_path: path.as_ref().to_path_buf(),
        }
    }

    /// The hard prerequisite gate, short-circuiting on the first failure.
    pub fn validate(&self) -> Result<()> {
        self.check_privileges()?;
        self.check_os_family()?;
        self.check_required_tools()?;
        Ok(())
    }

    fn check_privileges(&self) -> Result<()> {
        if nix::unistd::Uid::effective().is_root() {
            return Ok(());
        }
        Err(SysupError::InsufficientPrivileges(
            "this tool must run as root (try sudo)".to_string(),
        ))
    }

    fn check_os_family(&self) -> Result<()> {
        let content = std::fs::read_to_string(&self.os_release_path).map_err(|e| {
            SysupError::UnsupportedOs(format!(
                "cannot read {}: {e}",
                self.os_release_path.display()
            ))
        })?;

        if os_family_supported(&content) {
            Ok(())
        } else {
            Err(SysupError::UnsupportedOs(
                "host does not identify as a Debian/Ubuntu family system".to_string(),
            ))
        }
    }

    fn check_required_tools(&self) -> Result<()> {
        let missing = missing_tools(REQUIRED_TOOLS);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SysupError::MissingDependencies(missing.join(", ")))
        }
    }
}

impl Default for PrereqCheckerAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Every tool from `tools` that does not resolve on the search path.
/// All missing tools are reported together, not just the first.
fn missing_tools(tools: &[&str]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| (*tool).to_string())
        .collect()
}

/// Accept any apt-family identifier in the ID or ID_LIKE field of an
/// os-release document. ID_LIKE may hold a space-separated list.
fn os_family_supported(content: &str) -> bool {
    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key != "ID" && key != "ID_LIKE" {
            continue;
        }
        let value = value.trim().trim_matches('"');
        if value
            .split_whitespace()
            .any(|id| SUPPORTED_IDS.contains(&id))
        {
            return true;
        }
    }
    false
}
