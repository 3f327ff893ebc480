//! Error types reported to the block-storage host.

use thiserror::Error;

use crate::config::ConfigError;

/// Failures surfaced through the [`super::VolumeDriver`] interface.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DriverError {
    /// Raised when the appliance rejects or fails an operation.
    #[error("bad or unexpected response from the storage volume backend API: {message}")]
    BackendApi {
        /// Description including the appliance's error text.
        message: String,
    },
    /// Raised when a volume cannot be deleted, typically because it is still
    /// exported or has dependent snapshots.
    #[error("volume {volume} is still in use: {message}")]
    VolumeIsBusy {
        /// Volume name as known to the host.
        volume: String,
        /// Appliance error text.
        message: String,
    },
    /// Raised when a snapshot cannot be deleted because clones depend on it.
    #[error("snapshot {snapshot_name} is busy")]
    SnapshotIsBusy {
        /// Snapshot name as known to the host.
        snapshot_name: String,
    },
    /// Raised when the driver configuration is invalid.
    #[error("driver configuration error: {0}")]
    Config(String),
}

impl DriverError {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        Self::BackendApi {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for DriverError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
