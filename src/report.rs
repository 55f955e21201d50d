use crate::agents::upgrade::UpdateSession;
use jiff::Zoned;
use std::path::Path;

/// Host facts stamped into every summary.
pub struct HostContext {
    pub hostname: String,
    pub invoking_user: String,
}

impl HostContext {
    pub fn detect() -> Self {
        let hostname = nix::unistd::gethostname()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        // Under sudo the interesting name is the invoking account, not root.
        let invoking_user = std::env::var("SUDO_USER")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            hostname,
            invoking_user,
        }
    }
}

/// Render the fixed plain-text summary shared by console, log, and mail
/// body. Counters are read straight from the session at the moment
/// reporting begins; nothing is recomputed or reset.
pub fn build_summary(session: &UpdateSession, host: &HostContext, log_path: &Path) -> String {
    let now = Zoned::now().strftime("%Y-%m-%d %H:%M:%S").to_string();

    let mut summary = String::new();
    summary.push_str("System update report\n");
    summary.push_str("====================\n");
    summary.push_str(&format!("Host: {}\n", host.hostname));
    summary.push_str(&format!("Date: {now}\n"));
    summary.push_str(&format!("User: {}\n", host.invoking_user));
    summary.push('\n');
    summary.push_str(&format!(
        "Updates available: {}\n",
        session.updates_available
    ));
    summary.push_str(&format!(
        "Packages upgraded: {}\n",
        session.packages_upgraded
    ));
    summary.push_str(&format!("Packages removed:  {}\n", session.packages_removed));
    summary.push_str(&format!("Errors:            {}\n", session.errors_occurred));
    summary.push('\n');
    summary.push_str(&format!("Status: {}\n", session.status_label()));
    if session.was_cancelled() {
        summary.push_str("Note: a step was declined at the confirmation prompt\n");
    }
    summary.push_str(&format!("Log: {}\n", log_path.display()));
    summary
}

/// Subject line for the mailed report.
pub fn build_subject(host: &HostContext) -> String {
    let date = Zoned::now().strftime("%Y-%m-%d").to_string();
    format!("System update report: {} {date}", host.hostname)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::upgrade::ExitStatus;
    use std::path::PathBuf;

    fn host() -> HostContext {
        HostContext {
            hostname: "web01".to_string(),
            invoking_user: "alice".to_string(),
        }
    }

    #[test]
    fn counters_appear_verbatim() {
        let mut session = UpdateSession::new();
        session.updates_available = 12;
        session.packages_upgraded = 11;
        session.packages_removed = 3;
        session.record_error();

        let summary = build_summary(&session, &host(), &PathBuf::from("/var/log/sysup/x.log"));
        assert!(summary.contains("Updates available: 12"));
        assert!(summary.contains("Packages upgraded: 11"));
        assert!(summary.contains("Packages removed:  3"));
        assert!(summary.contains("Errors:            1"));
        assert!(summary.contains("Host: web01"));
        assert!(summary.contains("User: alice"));
        assert!(summary.contains("Log: /var/log/sysup/x.log"));
    }

    #[test]
    fn status_line_tracks_the_session() {
        let mut session = UpdateSession::new();
        let summary = build_summary(&session, &host(), &PathBuf::from("/tmp/x.log"));
        assert!(summary.contains("Status: NO UPDATES NEEDED"));

        session.updates_available = 2;
        session.packages_upgraded = 2;
        let summary = build_summary(&session, &host(), &PathBuf::from("/tmp/x.log"));
        assert!(summary.contains("Status: SUCCESS"));

        session.fail_stage(ExitStatus::CleanupFailed);
        let summary = build_summary(&session, &host(), &PathBuf::from("/tmp/x.log"));
        assert!(summary.contains("Status: COMPLETED WITH ERRORS"));
    }

    #[test]
    fn cancellation_note_only_when_declined() {
        let mut session = UpdateSession::new();
        session.updates_available = 1;
        let summary = build_summary(&session, &host(), &PathBuf::from("/tmp/x.log"));
        assert!(!summary.contains("declined"));

        session.mark_cancelled();
        let summary = build_summary(&session, &host(), &PathBuf::from("/tmp/x.log"));
        assert!(summary.contains("declined at the confirmation prompt"));
    }

    #[test]
    fn subject_names_the_host() {
        let subject = build_subject(&host());
        assert!(subject.starts_with("System update report: web01 "));
    }
}
