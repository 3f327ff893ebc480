//! Host-facing driver types and typed views over appliance JSON.

use serde::{Deserialize, Serialize};

/// Volume as described by the host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeRef {
    /// Host-side volume name, stored as the appliance alias.
    pub name: String,
    /// Size in GiB.
    pub size_gb: u64,
}

impl VolumeRef {
    /// Creates a volume reference.
    #[must_use]
    pub fn new(name: impl Into<String>, size_gb: u64) -> Self {
        Self {
            name: name.into(),
            size_gb,
        }
    }
}

/// Snapshot as described by the host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotRef {
    /// Snapshot name.
    pub name: String,
    /// Host-side name of the parent volume.
    pub volume_name: String,
}

impl SnapshotRef {
    /// Creates a snapshot reference.
    #[must_use]
    pub fn new(name: impl Into<String>, volume_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume_name: volume_name.into(),
        }
    }
}

/// Initiator details supplied when a host attaches a volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connector {
    /// Initiator IQN.
    pub initiator: String,
    /// Host name, used as the host group name.
    pub host: String,
}

impl Connector {
    /// Creates a connector.
    #[must_use]
    pub fn new(initiator: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            initiator: initiator.into(),
            host: host.into(),
        }
    }
}

/// Connection info returned from `initialize_connection`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ConnectionInfo {
    /// Always `iscsi`.
    pub driver_volume_type: String,
    /// iSCSI attachment properties.
    pub data: IscsiProperties,
}

/// iSCSI attachment properties.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IscsiProperties {
    /// Always `false`; the host logs in directly.
    pub target_discovered: bool,
    /// Portal `ip:port`.
    pub target_portal: String,
    /// Target IQN.
    pub target_iqn: String,
    /// LUN assigned by the export.
    pub target_lun: i64,
    /// Serial number of the logical unit.
    pub volume_id: String,
    /// Whether the host may issue discard/unmap.
    pub discard: bool,
}

/// Backend statistics reported to the scheduler.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VolumeStats {
    /// Appliance vendor.
    pub vendor_name: String,
    /// Backend name used by the scheduler.
    pub volume_backend_name: String,
    /// Driver version string.
    pub driver_version: String,
    /// Attachment protocol.
    pub storage_protocol: String,
    /// One entry per backing project.
    pub pools: Vec<PoolStats>,
}

/// Capacity and capability report for one pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "mirrors the capability flags the scheduler expects in pool stats"
)]
pub struct PoolStats {
    /// Project name.
    pub pool_name: String,
    /// Project quota in whole GiB.
    pub total_capacity_gb: u64,
    /// Available space in whole GiB.
    pub free_capacity_gb: u64,
    /// Used space in whole GiB.
    pub provisioned_capacity_gb: u64,
    /// Opaque location string.
    pub location_info: String,
    /// Quality-of-service support flag.
    #[serde(rename = "QoS_support")]
    pub qos_support: bool,
    /// Maximum oversubscription ratio from configuration.
    pub max_over_subscription_ratio: u32,
    /// Thin provisioning support flag.
    pub thin_provisioning_support: bool,
    /// Thick provisioning support flag.
    pub thick_provisioning_support: bool,
    /// Number of volumes in the project.
    pub total_volumes: usize,
    /// Whether a volume may attach to several hosts.
    pub multiattach: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectSummary {
    pub(super) project: String,
    #[serde(default)]
    pub(super) options: ProjectOptions,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProjectOptions {
    #[serde(default)]
    pub(super) quota: u64,
    #[serde(default)]
    pub(super) available: u64,
    #[serde(default)]
    pub(super) used: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct VolumeSummary {
    #[serde(default)]
    pub(super) id: String,
    #[serde(rename = "LUName")]
    pub(super) lu_name: String,
    #[serde(rename = "SerialNum", default)]
    pub(super) serial_num: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct HostGroupSummary {
    #[serde(rename = "HostGroup")]
    pub(super) host_group: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct View {
    #[serde(rename = "HostGroup")]
    pub(super) host_group: String,
    #[serde(rename = "TargetGroup")]
    pub(super) target_group: String,
    #[serde(rename = "LUN")]
    pub(super) lun: i64,
}

impl View {
    pub(super) fn matches(&self, host_group: &str, target_group: &str) -> bool {
        self.host_group == host_group && self.target_group == target_group
    }
}
