use thiserror::Error;

#[derive(Error, Debug)]
pub enum SysupError {
    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),

    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("Missing required tools: {0}")]
    MissingDependencies(String),

    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    #[error("Mail notification failed: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SysupError>;
