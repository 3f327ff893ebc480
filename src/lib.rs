//! Client library for the znstor storage appliance.
//!
//! The crate exposes a REST client ([`Znstor`]) covering projects, volumes,
//! snapshots, host groups, target groups and target-port groups, and an
//! iSCSI volume-driver adapter ([`ZnstorIscsiDriver`]) that maps a
//! block-storage host's driver lifecycle onto those calls. The appliance owns
//! all state; nothing is cached or retried locally.

pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod rest;
pub mod test_support;
pub mod transport;

pub use api::{AUTO_LUN, ExportTarget, Znstor};
pub use config::{ConfigError, ZnstorConfig};
pub use driver::{
    ConnectionInfo, Connector, DriverConfig, DriverError, SnapshotRef, VolumeDriver, VolumeRef,
    VolumeStats, ZnstorIscsiDriver,
};
pub use error::ZnstorError;
pub use rest::RestClient;
pub use transport::{HttpTransport, Transport, TransportError};
