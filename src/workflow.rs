use crate::agents::upgrade::{AssumeYes, ConfirmPrompt, ExitStatus, TerminalPrompt, UpdateSession};
use crate::agents::{AptExecutionAgent, MailNotifierAgent, PrereqCheckerAgent};
use crate::report::{self, HostContext};
use crate::utils::interrupt;
use crate::utils::output_scan;
use crate::utils::run_log::RunLog;
use colored::Colorize;
use std::path::PathBuf;

/// Run configuration distilled from the CLI.
pub struct RunConfig {
    pub email: Option<String>,
    pub assume_yes: bool,
    pub verbose: bool,
    pub log_dir: PathBuf,
}

/// Execute one full update run and hand back the process exit status.
///
/// Every path after the prerequisite gate reaches the reporting block, and
/// the log footer is written exactly once whichever way the run ends.
pub fn execute_update(mut config: RunConfig) -> ExitStatus {
    if let Err(e) = interrupt::install_handlers() {
        eprintln!("{} {e}", "Warning:".yellow().bold());
    }

    let Some(mut log) = open_run_log(&config) else {
        return ExitStatus::PrereqFailed;
    };

    log.headline("Starting system update...");
    let log_path_line = format!("Log file: {}", log.path().display());
    log.info(&log_path_line);

    let host = HostContext::detect();
    let mut session = UpdateSession::new();

    log.step("1. Checking prerequisites...");
    let prereq = PrereqCheckerAgent::new();
    if let Err(e) = prereq.validate() {
        log.error(&format!("Prerequisite check failed: {e}"));
        session.fail_stage(ExitStatus::PrereqFailed);
        let status = session.resolve_status();
        log.finalize(status);
        return status;
    }
    log.success("Prerequisites satisfied");

    let notifier = resolve_notifier(&mut config, &mut log);

    let apt = AptExecutionAgent::new();
    let mut prompt: Box<dyn ConfirmPrompt> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };

    run_stages(&apt, prompt.as_mut(), &mut session, &mut log);

    log.step("Update summary");
    let summary = report::build_summary(&session, &host, log.path());
    log.info(&summary);

    if let (Some(recipient), Some(notifier)) = (config.email.as_deref(), notifier.as_ref()) {
        let subject = report::build_subject(&host);
        match notifier.send(recipient, &subject, &summary) {
            Ok(()) => log.success(&format!("Report mailed to {recipient}")),
            Err(e) => log.warning(&format!("Could not mail the report: {e}")),
        }
    }

    let status = session.resolve_status();
    if status == ExitStatus::Success {
        log.success("Update run completed");
    } else {
        log.error(&format!("Update run finished with issues (exit code {})", status.code()));
    }
    log.finalize(status);
    status
}

/// The refresh → query → apply → cleanup sequence. Each stage gates the
/// next; failures land in the session and the run always falls through to
/// reporting.
pub fn run_stages(
    apt: &AptExecutionAgent,
    prompt: &mut dyn ConfirmPrompt,
    session: &mut UpdateSession,
    log: &mut RunLog,
) {
    log.step("2. Refreshing package lists...");
    match apt.refresh_lists(log) {
        Ok(capture) if capture.success => log.success("Package lists refreshed"),
        Ok(capture) => {
            log.error(&format!(
                "apt-get update failed with exit code {}",
                capture.exit_code
            ));
            session.fail_stage(ExitStatus::ListRefreshFailed);
            return;
        }
        Err(e) => {
            log.error(&e.to_string());
            session.fail_stage(ExitStatus::ListRefreshFailed);
            return;
        }
    }
    if bail_on_interrupt(session, log) {
        return;
    }

    log.step("3. Checking for upgradable packages...");
    let simulation = match apt.simulate_upgrade(log) {
        Ok(capture) if capture.success => capture,
        Ok(capture) => {
            log.error(&format!(
                "apt-get -s upgrade failed with exit code {}",
                capture.exit_code
            ));
            session.fail_stage(ExitStatus::ListRefreshFailed);
            return;
        }
        Err(e) => {
            log.error(&e.to_string());
            session.fail_stage(ExitStatus::ListRefreshFailed);
            return;
        }
    };
    session.updates_available = output_scan::count_pending_upgrades(&simulation.output);
    if session.updates_available == 0 {
        log.success("All packages are up to date");
        return;
    }
    log.info(&format!(
        "Found {} upgradable package(s)",
        session.updates_available
    ));
    if bail_on_interrupt(session, log) {
        return;
    }

    log.step("4. Applying upgrades...");
    match prompt.confirm("upgrading all packages") {
        Ok(true) => {}
        Ok(false) => {
            log.warning("Upgrade declined, skipping apply and cleanup");
            session.mark_cancelled();
            return;
        }
        Err(e) => {
            log.error(&format!("Confirmation prompt failed: {e}"));
            session.record_error();
            return;
        }
    }
    match apt.apply_upgrades(log) {
        Ok(capture) if capture.success => {
            session.packages_upgraded = output_scan::count_completed_upgrades(&capture.output);
            log.success(&format!(
                "Upgraded {} package(s)",
                session.packages_upgraded
            ));
        }
        Ok(capture) => {
            log.error(&format!(
                "apt-get upgrade failed with exit code {}",
                capture.exit_code
            ));
            session.fail_stage(ExitStatus::ApplyFailed);
            return;
        }
        Err(e) => {
            log.error(&e.to_string());
            session.fail_stage(ExitStatus::ApplyFailed);
            return;
        }
    }
    if bail_on_interrupt(session, log) {
        return;
    }

    // Cleanup sub-steps are independent: a failure in one never skips the
    // other.
    log.step("5. Cleaning up...");
    match prompt.confirm("removing unused packages") {
        Ok(true) => match apt.remove_unused(log) {
            Ok(capture) if capture.success => {
                session.packages_removed =
                    output_scan::extract_removed_count(&capture.output).unwrap_or(0);
                log.success(&format!(
                    "Removed {} unused package(s)",
                    session.packages_removed
                ));
            }
            Ok(capture) => {
                log.error(&format!(
                    "apt-get autoremove failed with exit code {}",
                    capture.exit_code
                ));
                session.fail_stage(ExitStatus::CleanupFailed);
            }
            Err(e) => {
                log.error(&e.to_string());
                session.fail_stage(ExitStatus::CleanupFailed);
            }
        },
        Ok(false) => {
            log.warning("Unused package removal declined");
            session.mark_cancelled();
        }
        Err(e) => {
            log.error(&format!("Confirmation prompt failed: {e}"));
            session.record_error();
        }
    }

    match prompt.confirm("clearing the package cache") {
        Ok(true) => match apt.clear_cache(log) {
            Ok(capture) if capture.success => log.success("Package cache cleared"),
            Ok(capture) => {
                log.error(&format!(
                    "apt-get clean failed with exit code {}",
                    capture.exit_code
                ));
                session.fail_stage(ExitStatus::CleanupFailed);
            }
            Err(e) => {
                log.error(&e.to_string());
                session.fail_stage(ExitStatus::CleanupFailed);
            }
        },
        Ok(false) => {
            log.warning("Package cache clearing declined");
            session.mark_cancelled();
        }
        Err(e) => {
            log.error(&format!("Confirmation prompt failed: {e}"));
            session.record_error();
        }
    }
}

fn bail_on_interrupt(session: &mut UpdateSession, log: &mut RunLog) -> bool {
    if !interrupt::interrupted() {
        return false;
    }
    log.warning("Termination signal received, stopping before the next stage");
    session.record_error();
    true
}

fn open_run_log(config: &RunConfig) -> Option<RunLog> {
    match RunLog::create(&config.log_dir, config.verbose) {
        Ok(log) => Some(log),
        Err(e) => {
            eprintln!(
                "{}",
                format!("⚠ Cannot open log in {}: {e}", config.log_dir.display()).yellow()
            );
            let fallback = std::env::temp_dir().join("sysup");
            match RunLog::create(&fallback, config.verbose) {
                Ok(log) => Some(log),
                Err(e) => {
                    eprintln!("{}", format!("✗ Cannot open a run log: {e}").red());
                    None
                }
            }
        }
    }
}

/// Soft prerequisite: a configured recipient without a mail tool on the
/// search path disables notification instead of aborting the run.
fn resolve_notifier(config: &mut RunConfig, log: &mut RunLog) -> Option<MailNotifierAgent> {
    config.email.as_ref()?;
    match MailNotifierAgent::detect() {
        Some(notifier) => {
            log.detail(&format!("Mail transport: {}", notifier.describe()));
            Some(notifier)
        }
        None => {
            log.warning("No mail command found on PATH, notification disabled");
            config.email = None;
            None
        }
    }
}
