//! Volume operations, including alias lookup and exports.

use reqwest::Method;
use serde_json::{Value, json};

use super::{ExportTarget, Znstor};
use crate::error::ZnstorError;
use crate::transport::Transport;

impl<T: Transport> Znstor<T> {
    pub(super) fn volumes_path(&self, project: &str) -> String {
        format!("{}/{project}/volumes", self.rest.projects_base_path())
    }

    pub(super) fn volume_path(&self, project: &str, volume: &str) -> String {
        format!("{}/{volume}", self.volumes_path(project))
    }

    /// Creates a volume in `project`. `properties` carries at least `alias`
    /// and `volsize` (bytes) and may include an `options` object.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_create(
        &self,
        project: &str,
        properties: Value,
    ) -> Result<Value, ZnstorError> {
        self.call(Method::POST, self.volumes_path(project), Some(properties))
            .await
    }

    /// Destroys `volume`, addressed by its appliance identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn volume_destroy(&self, project: &str, volume: &str) -> Result<Value, ZnstorError> {
        self.call(Method::DELETE, self.volume_path(project, volume), None)
            .await
    }

    /// Lists the volumes of `project`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn volume_list(&self, project: &str) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.volumes_path(project), None)
            .await
    }

    /// Fetches a single volume.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn volume_get(&self, project: &str, volume: &str) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.volume_path(project, volume), None)
            .await
    }

    /// Finds a volume by alias with a single listing call. Returns the first
    /// match in listing order.
    ///
    /// # Errors
    ///
    /// Propagates the listing failure.
    pub async fn volume_get_by_alias(
        &self,
        project: &str,
        alias: &str,
    ) -> Result<Option<Value>, ZnstorError> {
        let listing = self.volume_list(project).await?;
        let found = match listing {
            Value::Array(volumes) => volumes
                .into_iter()
                .find(|volume| volume.get("alias").and_then(Value::as_str) == Some(alias)),
            _ => None,
        };
        Ok(found)
    }

    /// Like [`Znstor::volume_get_by_alias`] but treats absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::NotFound`] when no volume carries `alias`, and
    /// propagates the listing failure.
    pub async fn volume_require_by_alias(
        &self,
        project: &str,
        alias: &str,
    ) -> Result<Value, ZnstorError> {
        self.volume_get_by_alias(project, alias)
            .await?
            .ok_or_else(|| ZnstorError::NotFound {
                object: self.volumes_path(project),
                debug: format!("no volume with alias {alias}"),
                payload: None,
            })
    }

    /// Resizes `volume` to `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_resize(
        &self,
        project: &str,
        volume: &str,
        size: u64,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/resize", self.volume_path(project, volume));
        self.call(Method::PUT, path, Some(json!({ "volsize": size })))
            .await
    }

    /// Sets the compression algorithm of `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn volume_compression(
        &self,
        project: &str,
        volume: &str,
        compression: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!(
            "{}/compression/{compression}",
            self.volume_path(project, volume)
        );
        self.call(Method::PUT, path, None).await
    }

    /// Maps `volume` to a host group and target group.
    ///
    /// On success the volume is fetched again so the returned object carries
    /// the updated `views`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when either call fails.
    pub async fn volume_export(
        &self,
        project: &str,
        volume: &str,
        target: &ExportTarget,
    ) -> Result<Value, ZnstorError> {
        self.send_export(project, volume, target).await?;
        self.volume_get(project, volume).await
    }

    /// Removes the mapping of `volume` to a host group and target group.
    ///
    /// The appliance toggles the view on the same call used to create it, so
    /// the wire request is identical to [`Znstor::volume_export`].
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when either call fails.
    pub async fn volume_unexport(
        &self,
        project: &str,
        volume: &str,
        target: &ExportTarget,
    ) -> Result<Value, ZnstorError> {
        self.send_export(project, volume, target).await?;
        self.volume_get(project, volume).await
    }

    async fn send_export(
        &self,
        project: &str,
        volume: &str,
        target: &ExportTarget,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/export", self.volume_path(project, volume));
        self.call(Method::PUT, path, Some(target.payload())).await
    }

    /// Returns the views (exports) of `volume`; an absent or `null` list is
    /// empty.
    ///
    /// # Errors
    ///
    /// Propagates the [`Znstor::volume_get`] failure.
    pub async fn volume_exports(
        &self,
        project: &str,
        volume: &str,
    ) -> Result<Vec<Value>, ZnstorError> {
        let mut found = self.volume_get(project, volume).await?;
        let views = match found.get_mut("views").map(Value::take) {
            Some(Value::Array(views)) => views,
            _ => Vec::new(),
        };
        Ok(views)
    }
}
