//! Volume-driver adapter for block-storage hosts.
//!
//! A host drives volumes through the narrow [`VolumeDriver`] interface. The
//! [`ZnstorIscsiDriver`] implementation keeps every volume in one appliance
//! project, addresses volumes by alias (the host's volume name), and exports
//! them over iSCSI through a configured target group.

mod config;
mod error;
mod iscsi;
mod types;

use std::future::Future;
use std::pin::Pin;

pub use config::{
    COMPRESSION_ALGORITHMS, DEFAULT_OVERSUBS_RATIO, DEFAULT_TARGET_GROUP, DriverConfig,
};
pub use error::DriverError;
pub use iscsi::{
    BACKEND_NAME, DRIVER_VERSION, GIB, STORAGE_PROTOCOL, VENDOR_NAME, ZnstorIscsiDriver,
};
pub use types::{
    ConnectionInfo, Connector, IscsiProperties, PoolStats, SnapshotRef, VolumeRef, VolumeStats,
};

/// Future returned by driver operations.
pub type DriverFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DriverError>> + Send + 'a>>;

/// Lifecycle operations a block-storage host invokes on its volume driver.
pub trait VolumeDriver {
    /// Prepares the backend, creating the driver project when missing and
    /// applying quota and compression.
    fn do_setup(&self) -> DriverFuture<'_, ()>;

    /// Confirms that setup left the backend usable.
    fn check_for_setup_error(&self) -> DriverFuture<'_, ()>;

    /// Reports capacity and capabilities.
    fn update_volume_stats(&self) -> DriverFuture<'_, VolumeStats>;

    /// Creates a volume.
    fn create_volume<'a>(&'a self, volume: &'a VolumeRef) -> DriverFuture<'a, ()>;

    /// Deletes a volume. A volume the backend no longer knows counts as
    /// deleted.
    fn delete_volume<'a>(&'a self, volume: &'a VolumeRef) -> DriverFuture<'a, ()>;

    /// Exports a volume to the connector's host and returns attachment
    /// details.
    fn initialize_connection<'a>(
        &'a self,
        volume: &'a VolumeRef,
        connector: &'a Connector,
    ) -> DriverFuture<'a, ConnectionInfo>;

    /// Removes the export of a volume to the connector's host.
    fn terminate_connection<'a>(
        &'a self,
        volume: &'a VolumeRef,
        connector: &'a Connector,
    ) -> DriverFuture<'a, ()>;

    /// Snapshots the parent volume.
    fn create_snapshot<'a>(&'a self, snapshot: &'a SnapshotRef) -> DriverFuture<'a, ()>;

    /// Deletes a snapshot.
    fn delete_snapshot<'a>(&'a self, snapshot: &'a SnapshotRef) -> DriverFuture<'a, ()>;

    /// Creates `volume` as a clone of `snapshot`.
    fn create_volume_from_snapshot<'a>(
        &'a self,
        volume: &'a VolumeRef,
        snapshot: &'a SnapshotRef,
    ) -> DriverFuture<'a, ()>;

    /// Grows a volume to `new_size_gb`.
    fn extend_volume<'a>(&'a self, volume: &'a VolumeRef, new_size_gb: u64)
    -> DriverFuture<'a, ()>;
}
