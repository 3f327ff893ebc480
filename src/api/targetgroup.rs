//! Target group and target-port group operations.

use reqwest::Method;
use serde_json::Value;

use super::Znstor;
use crate::error::ZnstorError;
use crate::transport::Transport;

impl<T: Transport> Znstor<T> {
    fn targetgroups_path(&self) -> String {
        format!("{}/tg", self.rest.targets_base_path())
    }

    fn targetgroup_path(&self, targetgroup: &str) -> String {
        format!("{}/{targetgroup}", self.targetgroups_path())
    }

    fn targetportgroup_path(&self, targetportgroup: &str) -> String {
        format!("{}/tpg/{targetportgroup}", self.rest.targets_base_path())
    }

    /// Creates an empty target group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetgroup_create(&self, targetgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::POST, self.targetgroup_path(targetgroup), None)
            .await
    }

    /// Lists every target group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn targetgroup_list(&self) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.targetgroups_path(), None).await
    }

    /// Fetches a single target group.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn targetgroup_get(&self, targetgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.targetgroup_path(targetgroup), None)
            .await
    }

    /// Adds a target endpoint to `targetgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetgroup_add_member(
        &self,
        targetgroup: &str,
        member: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/add/{member}", self.targetgroup_path(targetgroup));
        self.call(Method::PUT, path, None).await
    }

    /// Removes a target endpoint from `targetgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetgroup_remove_member(
        &self,
        targetgroup: &str,
        member: &str,
    ) -> Result<Value, ZnstorError> {
        let path = format!("{}/remove/{member}", self.targetgroup_path(targetgroup));
        self.call(Method::PUT, path, None).await
    }

    /// Deletes `targetgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetgroup_delete(&self, targetgroup: &str) -> Result<Value, ZnstorError> {
        self.call(Method::DELETE, self.targetgroup_path(targetgroup), None)
            .await
    }

    /// Creates a target-port group bound to `ipaddrs`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetportgroup_create(
        &self,
        targetportgroup: &str,
        ipaddrs: &[String],
    ) -> Result<Value, ZnstorError> {
        let addresses = ipaddrs.iter().cloned().map(Value::String).collect();
        self.call(
            Method::POST,
            self.targetportgroup_path(targetportgroup),
            Some(Value::Array(addresses)),
        )
        .await
    }

    /// Deletes `targetportgroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn targetportgroup_delete(
        &self,
        targetportgroup: &str,
    ) -> Result<Value, ZnstorError> {
        self.call(
            Method::DELETE,
            self.targetportgroup_path(targetportgroup),
            None,
        )
        .await
    }
}
