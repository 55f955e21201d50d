/// Terminal status of one run, doubling as the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    PrereqFailed = 1,
    ListRefreshFailed = 2,
    ApplyFailed = 3,
    CleanupFailed = 4,
    CompletedWithErrors = 5,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        i32::from(self as u8)
    }
}

/// In-memory record of counters and status for one run of the tool.
///
/// Created zeroed at process start, mutated by each pipeline stage, and
/// read once by the reporter. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct UpdateSession {
    pub updates_available: u32,
    pub packages_upgraded: u32,
    pub packages_removed: u32,
    pub errors_occurred: u32,
    status: ExitStatus,
    cancelled: bool,
}

impl UpdateSession {
    pub fn new() -> Self {
        Self {
            updates_available: 0,
            packages_upgraded: 0,
            packages_removed: 0,
            errors_occurred: 0,
            status: ExitStatus::Success,
            cancelled: false,
        }
    }

    /// Record a non-stage error (interruption, prompt I/O failure).
    pub fn record_error(&mut self) {
        self.errors_occurred += 1;
    }

    /// Record a failed stage. The first failing stage sets the status;
    /// later stages never overwrite it.
    pub fn fail_stage(&mut self, status: ExitStatus) {
        self.errors_occurred += 1;
        if self.status == ExitStatus::Success {
            self.status = status;
        }
    }

    /// Remember that the operator declined a confirmation prompt.
    /// Cancellation is not an error and does not change the status.
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Final status resolution, evaluated once when the run ends: errors
    /// recorded without a hard stage code downgrade a would-be success to
    /// `CompletedWithErrors`.
    pub fn resolve_status(&self) -> ExitStatus {
        if self.status == ExitStatus::Success && self.errors_occurred > 0 {
            ExitStatus::CompletedWithErrors
        } else {
            self.status
        }
    }

    /// Human-facing status string for the summary report.
    pub fn status_label(&self) -> &'static str {
        match self.resolve_status() {
            ExitStatus::Success if self.updates_available == 0 => "NO UPDATES NEEDED",
            ExitStatus::Success => "SUCCESS",
            _ => "COMPLETED WITH ERRORS",
        }
    }
}

impl Default for UpdateSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_zeroed() {
        let session = UpdateSession::new();
        assert_eq!(session.updates_available, 0);
        assert_eq!(session.packages_upgraded, 0);
        assert_eq!(session.packages_removed, 0);
        assert_eq!(session.errors_occurred, 0);
        assert_eq!(session.resolve_status(), ExitStatus::Success);
    }

    #[test]
    fn first_failing_stage_wins() {
        let mut session = UpdateSession::new();
        session.fail_stage(ExitStatus::ApplyFailed);
        session.fail_stage(ExitStatus::CleanupFailed);
        assert_eq!(session.resolve_status(), ExitStatus::ApplyFailed);
        assert_eq!(session.errors_occurred, 2);
    }

    #[test]
    fn soft_errors_resolve_to_completed_with_errors() {
        let mut session = UpdateSession::new();
        session.record_error();
        assert_eq!(session.resolve_status(), ExitStatus::CompletedWithErrors);
        assert_eq!(session.resolve_status().code(), 5);
    }

    #[test]
    fn clean_run_resolves_to_success() {
        let mut session = UpdateSession::new();
        session.updates_available = 4;
        session.packages_upgraded = 4;
        assert_eq!(session.resolve_status(), ExitStatus::Success);
        assert_eq!(session.status_label(), "SUCCESS");
    }

    #[test]
    fn cancellation_is_not_an_error() {
        let mut session = UpdateSession::new();
        session.updates_available = 2;
        session.mark_cancelled();
        assert!(session.was_cancelled());
        assert_eq!(session.errors_occurred, 0);
        assert_eq!(session.resolve_status(), ExitStatus::Success);
    }

    #[test]
    fn no_updates_gets_its_own_label() {
        let session = UpdateSession::new();
        assert_eq!(session.status_label(), "NO UPDATES NEEDED");
    }

    #[test]
    fn failed_stage_changes_label() {
        let mut session = UpdateSession::new();
        session.updates_available = 1;
        session.fail_stage(ExitStatus::ListRefreshFailed);
        assert_eq!(session.status_label(), "COMPLETED WITH ERRORS");
        assert_eq!(session.resolve_status().code(), 2);
    }
}
