use thiserror::Error;

/// Errors from queue-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A queue with this name already exists.
    #[error("queue already exists: {0}")]
    DuplicateName(String),

    /// No queue with this name.
    #[error("queue not found: {0}")]
    NotFound(String),

    #[error("I/O error on queue file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a single publish tick. Transient: the publish loop logs
/// them and keeps running.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("I/O error writing status file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize status record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Startup single-instance failures.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("another instance is already running")]
    AlreadyRunning,

    #[error("I/O error on lock file: {0}")]
    Io(#[from] std::io::Error),
}
