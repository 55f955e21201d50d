use crate::error::{Result, SysupError};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn flag_interrupt(_signum: c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Route SIGINT and SIGTERM into a flag the pipeline polls between stages.
///
/// A signal delivered while a foreground apt command runs also reaches the
/// child, so the blocked stage surfaces it as an ordinary command failure;
/// the flag covers the windows between commands.
pub fn install_handlers() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(flag_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        unsafe { sigaction(signal, &action) }.map_err(|e| {
            SysupError::CommandExecution(format!("Failed to install {signal:?} handler: {e}"))
        })?;
    }
    Ok(())
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
