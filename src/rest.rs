//! REST client that composes appliance URLs and issues requests.

use reqwest::Method;
use serde_json::Value;
use tracing::{Instrument, Span, debug, info_span, warn};

use crate::config::ZnstorConfig;
use crate::error::ZnstorError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Body sent by calls that carry no payload. The appliance receives the JSON
/// empty string on these requests.
#[must_use]
pub const fn empty_body() -> Value {
    Value::String(String::new())
}

/// Thin request layer over a [`Transport`].
///
/// Every request is instrumented with the span supplied at construction, so
/// callers decide where client logs go and at which level they are kept.
#[derive(Clone, Debug)]
pub struct RestClient<T> {
    config: ZnstorConfig,
    transport: T,
    span: Span,
}

impl<T: Transport> RestClient<T> {
    /// Creates a client that logs under a default `znstor` span.
    #[must_use]
    pub fn new(config: ZnstorConfig, transport: T) -> Self {
        let span = info_span!("znstor", address = %config.management_address);
        Self {
            config,
            transport,
            span,
        }
    }

    /// Replaces the span used to instrument requests.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Returns the configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &ZnstorConfig {
        &self.config
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn api_root(&self) -> String {
        format!(
            "{}{}/api/{}/storage",
            self.config.scheme, self.config.management_address, self.config.api_version
        )
    }

    /// Base URL for project, volume, and snapshot resources.
    #[must_use]
    pub fn projects_base_path(&self) -> String {
        format!(
            "{}/domains/{}/pools/{}/projects",
            self.api_root(),
            self.config.domain,
            self.config.pool
        )
    }

    /// Base URL for host group resources.
    #[must_use]
    pub fn hosts_base_path(&self) -> String {
        format!("{}/hosts", self.api_root())
    }

    /// Base URL for target group and target-port group resources.
    #[must_use]
    pub fn targets_base_path(&self) -> String {
        format!("{}/targets", self.api_root())
    }

    /// Performs one request and returns the raw response, whatever its
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::Transport`] when the round trip fails.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Value,
    ) -> Result<HttpResponse, ZnstorError> {
        let request = HttpRequest::new(method, path, body);
        async {
            debug!(
                path = %request.url,
                method = %request.method,
                body = %request.body,
                "sending request"
            );
            let response =
                self.transport
                    .send(&request)
                    .await
                    .map_err(|err| ZnstorError::Transport {
                        path: request.url.clone(),
                        message: err.message,
                    })?;
            if !response.is_ok() {
                warn!(
                    path = %request.url,
                    status = response.status,
                    "appliance rejected request"
                );
            }
            Ok::<_, ZnstorError>(response)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`RestClient::request`].
    pub async fn get(&self, path: &str) -> Result<HttpResponse, ZnstorError> {
        self.request(path, Method::GET, empty_body()).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`RestClient::request`].
    pub async fn put(&self, path: &str, body: Value) -> Result<HttpResponse, ZnstorError> {
        self.request(path, Method::PUT, body).await
    }

    /// Sends a POST request.
    ///
    /// # Errors
    ///
    /// See [`RestClient::request`].
    pub async fn post(&self, path: &str, body: Value) -> Result<HttpResponse, ZnstorError> {
        self.request(path, Method::POST, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`RestClient::request`].
    pub async fn delete(&self, path: &str, body: Value) -> Result<HttpResponse, ZnstorError> {
        self.request(path, Method::DELETE, body).await
    }
}
