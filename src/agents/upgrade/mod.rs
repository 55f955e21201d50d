pub mod interaction;
pub mod session;

pub use interaction::{AssumeYes, ConfirmPrompt, TerminalPrompt};
pub use session::{ExitStatus, UpdateSession};
