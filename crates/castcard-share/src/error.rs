use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("native share failed: {0}")]
    NativeShare(String),

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("a share is already in progress")]
    AlreadySharing,
}
