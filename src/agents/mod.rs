pub mod apt_execution;
pub mod mail_notifier;
pub mod prereq_checker;
pub mod upgrade;

pub use apt_execution::{AptExecutionAgent, CommandCapture};
pub use mail_notifier::{MailNotifierAgent, MailTool};
pub use prereq_checker::PrereqCheckerAgent;
