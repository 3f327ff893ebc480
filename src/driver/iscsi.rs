//! iSCSI driver backed by the znstor REST API.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::types::{HostGroupSummary, ProjectSummary, View, VolumeSummary};
use super::{
    ConnectionInfo, Connector, DriverConfig, DriverError, DriverFuture, IscsiProperties,
    PoolStats, SnapshotRef, VolumeDriver, VolumeRef, VolumeStats,
};
use crate::api::{ExportTarget, Znstor};
use crate::error::ZnstorError;
use crate::transport::{HttpTransport, Transport};

/// Bytes per GiB, the driver's size unit.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Vendor reported in stats.
pub const VENDOR_NAME: &str = "ZNStor";

/// Driver version reported in stats.
pub const DRIVER_VERSION: &str = "0.0.1";

/// Backend name reported in stats.
pub const BACKEND_NAME: &str = "znstor";

/// Storage protocol reported in stats and connection info.
pub const STORAGE_PROTOCOL: &str = "iscsi";

/// Volume driver that exports appliance volumes over iSCSI.
#[derive(Clone, Debug)]
pub struct ZnstorIscsiDriver<T = HttpTransport> {
    storage: Znstor<T>,
    config: DriverConfig,
}

fn gib_to_bytes(size_gb: u64) -> Result<u64, DriverError> {
    size_gb
        .checked_mul(GIB)
        .ok_or_else(|| DriverError::backend(format!("size of {size_gb} GiB overflows bytes")))
}

fn bytes_to_gib(bytes: u64) -> u64 {
    bytes.checked_div(GIB).unwrap_or_default()
}

fn decode<D: DeserializeOwned>(value: Value, what: &str) -> Result<D, DriverError> {
    serde_json::from_value(value).map_err(|err| {
        error!(what, error = %err, "unexpected appliance response");
        DriverError::backend(format!("unexpected {what} from appliance: {err}"))
    })
}

fn decode_list<D: DeserializeOwned>(value: Value, what: &str) -> Result<Vec<D>, DriverError> {
    decode::<Option<Vec<D>>>(value, what).map(Option::unwrap_or_default)
}

fn backend_failure(context: &str) -> impl FnOnce(ZnstorError) -> DriverError + '_ {
    move |err| {
        error!(error = %err, "{context}");
        DriverError::backend(format!("{context}: {err}"))
    }
}

impl<T: Transport> ZnstorIscsiDriver<T> {
    /// Creates a driver after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] when the configuration is invalid.
    pub fn new(storage: Znstor<T>, config: DriverConfig) -> Result<Self, DriverError> {
        config.validate()?;
        Ok(Self { storage, config })
    }

    /// Returns the resource client.
    #[must_use]
    pub const fn storage(&self) -> &Znstor<T> {
        &self.storage
    }

    /// Returns the driver configuration.
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn project(&self) -> &str {
        &self.config.project
    }

    async fn find_volume(&self, alias: &str) -> Result<VolumeSummary, ZnstorError> {
        let found = self
            .storage
            .volume_require_by_alias(self.project(), alias)
            .await?;
        serde_json::from_value(found).map_err(|err| ZnstorError::Decode {
            path: format!(
                "{}/{}/volumes",
                self.storage.rest().projects_base_path(),
                self.project()
            ),
            message: err.to_string(),
        })
    }

    async fn views(&self, lu_name: &str) -> Result<Vec<View>, DriverError> {
        let views = self
            .storage
            .volume_exports(self.project(), lu_name)
            .await
            .map_err(backend_failure("reading volume views failed"))?;
        decode(Value::Array(views), "volume views")
    }

    async fn fetch_project(&self) -> Result<ProjectSummary, DriverError> {
        let project = self
            .storage
            .project_get(self.project())
            .await
            .map_err(backend_failure("fetching project failed"))?;
        decode(project, "project")
    }

    async fn ensure_host_group(&self, connector: &Connector) -> Result<(), ZnstorError> {
        let listing = self.storage.hostgroup_list().await?;
        let groups: Vec<HostGroupSummary> = match listing {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other).map_err(|err| ZnstorError::Decode {
                path: String::from("host groups"),
                message: err.to_string(),
            })?,
        };
        if groups.iter().any(|group| group.host_group == connector.host) {
            return Ok(());
        }
        info!(host = %connector.host, initiator = %connector.initiator, "creating host group");
        self.storage.hostgroup_create(&connector.host).await?;
        self.storage
            .hostgroup_add_member(&connector.host, &connector.initiator)
            .await?;
        Ok(())
    }

    fn connection_info(&self, view: &View, volume: &VolumeSummary) -> ConnectionInfo {
        ConnectionInfo {
            driver_volume_type: String::from(STORAGE_PROTOCOL),
            data: IscsiProperties {
                target_discovered: false,
                target_portal: self.config.portal_addr.clone(),
                target_iqn: self.config.portal_iqn.clone(),
                target_lun: view.lun,
                volume_id: volume.serial_num.clone(),
                discard: true,
            },
        }
    }

    fn export_target(&self, connector: &Connector) -> ExportTarget {
        ExportTarget::new(connector.host.as_str(), self.config.target_group.as_str())
    }
}

impl<T: Transport> VolumeDriver for ZnstorIscsiDriver<T> {
    fn do_setup(&self) -> DriverFuture<'_, ()> {
        Box::pin(async move {
            let quota = gib_to_bytes(self.config.quota_gb)?;
            let listing = self
                .storage
                .project_list()
                .await
                .map_err(backend_failure("listing projects failed"))?;
            let projects: Vec<ProjectSummary> = decode_list(listing, "project list")?;

            if !projects.iter().any(|p| p.project == self.config.project) {
                info!(project = %self.config.project, quota, "creating driver project");
                self.storage
                    .project_create(self.project(), json!({ "quota": quota }))
                    .await
                    .map_err(backend_failure("backend initialization failed"))?;
            }

            let project = self.fetch_project().await?;
            self.storage
                .project_set(&project.project, json!({ "quota": quota }))
                .await
                .map_err(backend_failure("setting project quota failed"))?;
            self.storage
                .project_set(
                    &project.project,
                    json!({ "compression": self.config.compression }),
                )
                .await
                .map_err(backend_failure("setting project compression failed"))?;
            Ok(())
        })
    }

    fn check_for_setup_error(&self) -> DriverFuture<'_, ()> {
        Box::pin(async move {
            let project = self.fetch_project().await?;
            if project.project != self.config.project {
                error!(
                    expected = %self.config.project,
                    found = %project.project,
                    "project is not initialised"
                );
                return Err(DriverError::backend(format!(
                    "project {} is not initialised, appliance returned {}",
                    self.config.project, project.project
                )));
            }
            Ok(())
        })
    }

    fn update_volume_stats(&self) -> DriverFuture<'_, VolumeStats> {
        Box::pin(async move {
            let project = self.fetch_project().await?;
            let total_volumes = match self.storage.volume_list(&project.project).await {
                Ok(Value::Array(volumes)) => volumes.len(),
                Ok(_) => 0,
                Err(err) => return Err(backend_failure("listing volumes failed")(err)),
            };

            let pool = PoolStats {
                pool_name: project.project.clone(),
                total_capacity_gb: bytes_to_gib(project.options.quota),
                free_capacity_gb: bytes_to_gib(project.options.available),
                provisioned_capacity_gb: bytes_to_gib(project.options.used),
                location_info: String::from("None"),
                qos_support: false,
                max_over_subscription_ratio: self.config.oversubs_ratio,
                thin_provisioning_support: true,
                thick_provisioning_support: true,
                total_volumes,
                multiattach: true,
            };
            Ok(VolumeStats {
                vendor_name: String::from(VENDOR_NAME),
                volume_backend_name: String::from(BACKEND_NAME),
                driver_version: String::from(DRIVER_VERSION),
                storage_protocol: String::from(STORAGE_PROTOCOL),
                pools: vec![pool],
            })
        })
    }

    fn create_volume<'a>(&'a self, volume: &'a VolumeRef) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let volsize = gib_to_bytes(volume.size_gb)?;
            let properties = json!({
                "alias": volume.name,
                "volsize": volsize,
                "options": {
                    "thin": self.config.thin_volumes,
                    "compression": self.config.compression,
                },
            });
            self.storage
                .volume_create(self.project(), properties)
                .await
                .map_err(backend_failure("create volume failed"))?;
            Ok(())
        })
    }

    fn delete_volume<'a>(&'a self, volume: &'a VolumeRef) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let busy = |err: ZnstorError| {
                error!(volume = %volume.name, error = %err, "delete volume failed");
                DriverError::VolumeIsBusy {
                    volume: volume.name.clone(),
                    message: err.to_string(),
                }
            };
            let found = match self.find_volume(&volume.name).await {
                Ok(found) => found,
                Err(ZnstorError::NotFound { .. }) => {
                    warn!(volume = %volume.name, "volume absent on appliance, nothing to delete");
                    return Ok(());
                }
                Err(err) => return Err(busy(err)),
            };
            self.storage
                .volume_destroy(self.project(), &found.lu_name)
                .await
                .map_err(busy)?;
            Ok(())
        })
    }

    fn initialize_connection<'a>(
        &'a self,
        volume: &'a VolumeRef,
        connector: &'a Connector,
    ) -> DriverFuture<'a, ConnectionInfo> {
        Box::pin(async move {
            let context = format!("volume export failed: {}", volume.name);
            let found = self
                .find_volume(&volume.name)
                .await
                .map_err(backend_failure(&context))?;
            self.ensure_host_group(connector)
                .await
                .map_err(backend_failure(&context))?;

            let target_group = self.config.target_group.as_str();
            let existing = self.views(&found.lu_name).await?;
            if let Some(view) = existing
                .iter()
                .find(|view| view.matches(&connector.host, target_group))
            {
                return Ok(self.connection_info(view, &found));
            }

            let exported = self
                .storage
                .volume_export(self.project(), &found.lu_name, &self.export_target(connector))
                .await
                .map_err(backend_failure(&context))?;
            let views = match exported.get("views") {
                Some(Value::Array(views)) => decode(Value::Array(views.clone()), "volume views")?,
                _ => Vec::<View>::new(),
            };
            views
                .iter()
                .find(|view| view.matches(&connector.host, target_group))
                .map(|view| self.connection_info(view, &found))
                .ok_or_else(|| {
                    error!(volume = %volume.name, host = %connector.host, "export left no view");
                    DriverError::backend(format!("{context}: no view after export"))
                })
        })
    }

    fn terminate_connection<'a>(
        &'a self,
        volume: &'a VolumeRef,
        connector: &'a Connector,
    ) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let context = format!("volume unexport failed: {}", volume.name);
            let found = match self.find_volume(&volume.name).await {
                Ok(found) => found,
                Err(ZnstorError::NotFound { .. }) => {
                    warn!(volume = %volume.name, "volume absent on appliance, nothing to unexport");
                    return Ok(());
                }
                Err(err) => return Err(backend_failure(&context)(err)),
            };

            let target = self.export_target(connector);
            let views = self.views(&found.lu_name).await?;
            for _ in views
                .iter()
                .filter(|view| view.matches(&connector.host, &self.config.target_group))
            {
                self.storage
                    .volume_unexport(self.project(), &found.lu_name, &target)
                    .await
                    .map_err(backend_failure(&context))?;
            }
            Ok(())
        })
    }

    fn create_snapshot<'a>(&'a self, snapshot: &'a SnapshotRef) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let failed = backend_failure("create snapshot failed");
            let parent = match self.find_volume(&snapshot.volume_name).await {
                Ok(parent) => parent,
                Err(err) => return Err(failed(err)),
            };
            self.storage
                .volume_create_snapshot(self.project(), &parent.lu_name, &snapshot.name)
                .await
                .map_err(failed)?;
            Ok(())
        })
    }

    fn delete_snapshot<'a>(&'a self, snapshot: &'a SnapshotRef) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let busy = |err: ZnstorError| {
                error!(snapshot = %snapshot.name, error = %err, "snapshot has clones");
                DriverError::SnapshotIsBusy {
                    snapshot_name: snapshot.name.clone(),
                }
            };
            let parent = self.find_volume(&snapshot.volume_name).await.map_err(busy)?;
            self.storage
                .volume_destroy_snapshot(self.project(), &parent.lu_name, &snapshot.name)
                .await
                .map_err(busy)?;
            Ok(())
        })
    }

    fn create_volume_from_snapshot<'a>(
        &'a self,
        volume: &'a VolumeRef,
        snapshot: &'a SnapshotRef,
    ) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let failed = backend_failure("create volume from snapshot failed");
            let parent = match self.find_volume(&snapshot.volume_name).await {
                Ok(parent) => parent,
                Err(err) => return Err(failed(err)),
            };
            self.storage
                .volume_create_from_snapshot(
                    self.project(),
                    &parent.id,
                    &snapshot.name,
                    &volume.name,
                )
                .await
                .map_err(failed)?;
            Ok(())
        })
    }

    fn extend_volume<'a>(
        &'a self,
        volume: &'a VolumeRef,
        new_size_gb: u64,
    ) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let volsize = gib_to_bytes(new_size_gb)?;
            let failed = backend_failure("extend volume failed");
            let found = match self.find_volume(&volume.name).await {
                Ok(found) => found,
                Err(err) => return Err(failed(err)),
            };
            self.storage
                .volume_resize(self.project(), &found.lu_name, volsize)
                .await
                .map_err(failed)?;
            Ok(())
        })
    }
}
