use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum FileOutcome {
    Written(PathBuf),
    ReadFailed(String),
    RequestFailed(String),
    WriteFailed(String),
    /// Stop arrived while the file waited for its turn; nothing was read or sent.
    NotStarted,
}

impl FileOutcome {
    /// Whether the file cost an API request, and so counts against the rate limit.
    pub const fn issued_request(&self) -> bool {
        !matches!(self, Self::ReadFailed(_) | Self::NotStarted)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Written(_) | Self::NotStarted => None,
            Self::ReadFailed(msg) | Self::RequestFailed(msg) | Self::WriteFailed(msg) => Some(msg),
        }
    }
}
