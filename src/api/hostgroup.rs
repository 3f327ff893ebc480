//! Host group operations.

use reqwest::Method;
use serde_json::Value;

use super::Znstor;
use crate::error::ZnstorError;
use crate::transport::Transport;

impl<T: Transport> Znstor<T> {
    fn hostgroup_path(&self, hostgroup: &str) -> String {
        format!("{}/{hostgroup}", self.rest.hosts_base_path())
    }

    /// Creates an empty host group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn hostgroup_create(&self, hostgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::POST, self.hostgroup_path(hostgroup), None)
            .await
    }

    /// Lists every host group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn hostgroup_list(&self) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.rest.hosts_base_path(), None)
            .await
    }

    /// Fetches a single host group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn hostgroup_get(&self, hostgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.hostgroup_path(hostgroup), None)
            .await
    }

    /// Adds an initiator (IQN or WWN) to `hostgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request, for example when the member already belongs to another
    /// group.
    pub async fn hostgroup_add_member(
        &self,
        hostgroup: &str,
        member: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/add/{member}", self.hostgroup_path(hostgroup));
        self.call(Method::PUT, path, None).await
    }

    /// Adds an initiator that may already belong to other host groups.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn hostgroup_add_multihost_member(
        &self,
        hostgroup: &str,
        member: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/add/{member}/force", self.hostgroup_path(hostgroup));
        self.call(Method::PUT, path, None).await
    }

    /// Removes an initiator from `hostgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn hostgroup_remove_member(
        &self,
        hostgroup: &str,
        member: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/remove/{member}", self.hostgroup_path(hostgroup));
        self.call(Method::PUT, path, None).await
    }

    /// Deletes `hostgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn hostgroup_delete(&self, hostgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::DELETE, self.hostgroup_path(hostgroup), None)
            .await
    }
}
