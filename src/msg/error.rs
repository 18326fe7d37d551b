/// Precondition violations of the message facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no status bar has been registered")]
    NoStatusBar,
    #[error("invalid message level: {0}")]
    InvalidLevel(i32),
}
