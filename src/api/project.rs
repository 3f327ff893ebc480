//! Project operations.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::Znstor;
use crate::error::ZnstorError;
use crate::transport::Transport;

impl<T: Transport> Znstor<T> {
    fn project_path(&self, project: &str) -> String {
        format!("{}/{project}", self.rest.projects_base_path())
    }

    /// Creates `project` with the given properties, for example
    /// `{"quota": 1073741824}`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn project_create(
        &self,
        project: &str,
        properties: Value,
    ) -> Result<Value, ZnstorError> {
        self.call(Method::POST, self.project_path(project), Some(properties))
            .await
    }

    /// Destroys `project` and every volume it holds.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn project_destroy(&self, project: &str) -> Result<(), ZnstorError> {
        self.call(Method::DELETE, self.project_path(project), None)
            .await
            .map(drop)
    }

    /// Lists every project in the configured pool and domain.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn project_list(&self) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.rest.projects_base_path(), None)
            .await
    }

    /// Fetches a single project.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] on a non-200 response.
    pub async fn project_get(&self, project: &str) -> Result<Value, ZnstorError> {
        self.call(Method::GET, self.project_path(project), None)
            .await
    }

    /// Updates project properties such as `quota`, `compression` or
    /// `dedup`.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::BadRequest`] when the appliance rejects the
    /// request.
    pub async fn project_set(
        &self,
        project: &str,
        properties: Value,
    ) -> Result<Value, ZnstorError> {
        self.call(Method::PUT, self.project_path(project), Some(properties))
            .await
    }

    /// Reports whether `project` exists. Only the status is inspected: a 200
    /// means present whatever the body says. Any failure, including a
    /// transport error, counts as absence.
    pub async fn project_exists(&self, project: &str) -> bool {
        let path = format!("{}/exists", self.project_path(project));
        match self.rest.get(&path).await {
            Ok(response) => response.is_ok(),
            Err(err) => {
                debug!(project, error = %err, "project existence check failed");
                false
            }
        }
    }
}
