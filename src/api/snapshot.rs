//! Snapshot operations scoped to a volume.

use reqwest::Method;
use serde_json::{Value, json};

use super::Znstor;
use crate::error::ZnstorError;
use crate::transport::Transport;

impl<T: Transport> Znstor<T> {
    fn snapshots_path(&self, project: &str, volume: &str) -> String {
        format!("{}/snapshots", self.volume_path(project, volume))
    }

    fn snapshot_path(&self, project: &str, volume: &str, snapshot: &str) -> String {
        format!("{}/{snapshot}", self.snapshots_path(project, volume))
    }

    /// Creates `snapshot` of `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_create_snapshot(
        &self,
        project: &str,
        volume: &str,
        snapshot: &str,
    ) -> Result<Value, ZnstorError> {
        self.call(
            Method::POST,
            self.snapshot_path(project, volume, snapshot),
            None,
        )
        .await
    }

    /// Clones `snapshot` into a new volume named `clone_alias`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_create_from_snapshot(
        &self,
        project: &str,
        volume: &str,
        snapshot: &str,
        clone_alias: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/clone", self.snapshot_path(project, volume, snapshot));
        self.call(Method::POST, path, Some(json!({ "alias": clone_alias })))
            .await
    }

    /// Destroys `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request, for example while clones still depend on it.
    pub async fn volume_destroy_snapshot(
        &self,
        project: &str,
        volume: &str,
        snapshot: &str,
    ) -> Result<Value, ZnstorError> {
        self.call(
            Method::DELETE,
            self.snapshot_path(project, volume, snapshot),
            None,
        )
        .await
    }

    /// Lists the snapshots of `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn volume_list_snapshot(
        &self,
        project: &str,
        volume: &str,
    ) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.snapshots_path(project, volume), None)
            .await
    }

    /// Fetches a single snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn volume_get_snapshot(
        &self,
        project: &str,
        volume: &str,
        snapshot: &str,
    ) -> Result<Value, ZnstorError> {
        self.call(
            Method::GET,
            self.snapshot_path(project, volume, snapshot),
            None,
        )
        .await
    }

    /// Rolls `volume` back to `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_rollback_snapshot(
        &self,
        project: &str,
        volume: &str,
        snapshot: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!(
            "{}/rollback",
            self.snapshot_path(project, volume, snapshot)
        );
        self.call(Method::PUT, path, None).await
    }
}
