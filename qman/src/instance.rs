//! Single-instance guard.
//!
//! Advisory exclusive lock on a well-known path, held for the process
//! lifetime. A second instance must refuse to start; this is the only
//! error that aborts startup.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use fs2::FileExt;
use tracing::debug;

use crate::error::InstanceError;

/// Default lock path, shared with the legacy tooling.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/qman.lock";

/// Holds the instance lock for the lifetime of the value.
#[derive(Debug)]
pub struct SingleInstance {
    _file: File,
}

impl SingleInstance {
    /// Try to take the lock. Fails with
    /// [`InstanceError::AlreadyRunning`] when another process holds it.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(path)?;
        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == ErrorKind::WouldBlock {
                InstanceError::AlreadyRunning
            } else {
                InstanceError::Io(e)
            }
        })?;
        debug!("instance lock acquired: {}", path.display());
        Ok(Self { _file: file })
    }
}
