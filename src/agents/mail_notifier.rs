use crate::error::{Result, SysupError};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Local mail transport resolved from the search path.
#[derive(Debug, Clone)]
pub enum MailTool {
    /// bsd-mailx interface: `mail -s SUBJECT RCPT` with the body on stdin.
    Mail(PathBuf),
    /// `sendmail -t` with RFC-822 headers and body on stdin.
    Sendmail(PathBuf),
}

/// MailNotifierAgent delivers the run summary through a local mail command.
/// Delivery failures are the caller's to log as warnings; nothing here is
/// allowed to fail the overall run.
pub struct MailNotifierAgent {
    tool: MailTool,
}

impl MailNotifierAgent {
    /// Probe the search path: `mail` first, `sendmail` as fallback.
    pub fn detect() -> Option<Self> {
        if let Ok(path) = which::which("mail") {
            return Some(Self {
                tool: MailTool::Mail(path),
            });
        }
        if let Ok(path) = which::which("sendmail") {
            return Some(Self {
                tool: MailTool::Sendmail(path),
            });
        }
        None
    }

    pub fn with_tool(tool: MailTool) -> Self {
        Self { tool }
    }

    pub fn describe(&self) -> String {
        match &self.tool {
            MailTool::Mail(path) => format!("mail ({})", path.display()),
            MailTool::Sendmail(path) => format!("sendmail ({})", path.display()),
        }
    }

    pub fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let mut command = match &self.tool {
            MailTool::Mail(path) => {
                let mut command = Command::new(path);
                command.arg("-s").arg(subject).arg(recipient);
                command
            }
            MailTool::Sendmail(path) => {
                let mut command = Command::new(path);
                command.arg("-t");
                command
            }
        };

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SysupError::Notification(format!("failed to spawn mail command: {e}")))?;

        let payload = match &self.tool {
            MailTool::Mail(_) => body.to_string(),
            MailTool::Sendmail(_) => {
                format!("To: {recipient}\nSubject: {subject}\n\n{body}")
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| SysupError::Notification(format!("failed to write mail body: {e}")))?;
        }

        let status = child
            .wait()
            .map_err(|e| SysupError::Notification(format!("failed to wait for mail command: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(SysupError::Notification(format!(
                "mail command exited with code {}",
                status.code().unwrap_or(-1)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    fn stub_mailer(dir: &Path) -> PathBuf {
        let path = dir.join("mailer");
        let body = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > {}/args.txt\ncat > {}/body.txt\n",
            dir.display(),
            dir.display()
        );
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn mail_tool_passes_subject_and_recipient_as_args() {
        let dir = tempdir().unwrap();
        let agent = MailNotifierAgent::with_tool(MailTool::Mail(stub_mailer(dir.path())));
        agent
            .send("root@example.org", "System update report", "all good")
            .unwrap();

        let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(args, "-s\nSystem update report\nroot@example.org\n");
        let body = fs::read_to_string(dir.path().join("body.txt")).unwrap();
        assert_eq!(body, "all good");
    }

    #[test]
    fn sendmail_tool_writes_headers_into_the_body() {
        let dir = tempdir().unwrap();
        let agent = MailNotifierAgent::with_tool(MailTool::Sendmail(stub_mailer(dir.path())));
        agent
            .send("root@example.org", "Subject line", "summary text")
            .unwrap();

        let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(args, "-t\n");
        let body = fs::read_to_string(dir.path().join("body.txt")).unwrap();
        assert!(body.starts_with("To: root@example.org\nSubject: Subject line\n\n"));
        assert!(body.ends_with("summary text"));
    }

    #[test]
    fn failing_mail_command_is_a_notification_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mailer");
        fs::write(&path, "#!/bin/sh\nexit 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let agent = MailNotifierAgent::with_tool(MailTool::Mail(path));
        let err = agent.send("root@example.org", "s", "b").unwrap_err();
        assert!(matches!(err, SysupError::Notification(_)));
    }
}
