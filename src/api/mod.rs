//! Resource layer for the znstor appliance.
//!
//! [`Znstor`] maps each appliance resource (projects, volumes, snapshots,
//! host groups, target groups and target-port groups) onto REST calls. Every
//! operation follows the same contract: a 200 response yields the decoded
//! JSON body and any other status becomes [`ZnstorError::BadRequest`] with
//! the request path as its `object`. Identifiers are substituted into paths
//! verbatim.

mod hostgroup;
mod project;
mod snapshot;
mod targetgroup;
mod volume;

use reqwest::Method;
use serde_json::{Value, json};
use tracing::Span;

use crate::config::ZnstorConfig;
use crate::error::ZnstorError;
use crate::rest::{RestClient, empty_body};
use crate::transport::{HttpTransport, Transport};

/// LUN value that asks the appliance to pick the next free LUN.
pub const AUTO_LUN: i64 = -1;

/// Host group, target group and LUN of a volume export.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportTarget {
    /// Host group granted access.
    pub hostgroup: String,
    /// Target group presenting the volume.
    pub targetgroup: String,
    /// Logical unit number, [`AUTO_LUN`] to let the appliance choose.
    pub lun: i64,
}

impl ExportTarget {
    /// Creates an export target with an appliance-assigned LUN.
    #[must_use]
    pub fn new(hostgroup: impl Into<String>, targetgroup: impl Into<String>) -> Self {
        Self {
            hostgroup: hostgroup.into(),
            targetgroup: targetgroup.into(),
            lun: AUTO_LUN,
        }
    }

    /// Pins the export to a specific LUN.
    #[must_use]
    pub const fn with_lun(mut self, lun: i64) -> Self {
        self.lun = lun;
        self
    }

    fn payload(&self) -> Value {
        json!({
            "hostgroup": self.hostgroup,
            "targetgroup": self.targetgroup,
            "lun": self.lun,
        })
    }
}

/// Client for the znstor REST API.
#[derive(Clone, Debug)]
pub struct Znstor<T = HttpTransport> {
    rest: RestClient<T>,
}

impl Znstor<HttpTransport> {
    /// Validates `config` and builds a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ZnstorError::Config`] when validation fails and
    /// [`ZnstorError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: ZnstorConfig) -> Result<Self, ZnstorError> {
        config.validate()?;
        let transport = HttpTransport::new(&config).map_err(|err| ZnstorError::Transport {
            path: config.management_address.clone(),
            message: err.message,
        })?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Znstor<T> {
    /// Builds a client over an arbitrary transport. The configuration is used
    /// as given; call [`ZnstorConfig::validate`] first when it comes from
    /// untrusted sources.
    #[must_use]
    pub fn with_transport(config: ZnstorConfig, transport: T) -> Self {
        Self {
            rest: RestClient::new(config, transport),
        }
    }

    /// Replaces the span that instruments every request.
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self {
            rest: self.rest.with_span(span),
        }
    }

    /// Returns the underlying REST client.
    #[must_use]
    pub const fn rest(&self) -> &RestClient<T> {
        &self.rest
    }

    async fn call(
        &self,
        method: Method,
        path: String,
        payload: Option<Value>,
    ) -> Result<Value, ZnstorError> {
        let body = payload.clone().unwrap_or_else(empty_body);
        let response = self.rest.request(&path, method, body).await?;
        if !response.is_ok() {
            return Err(ZnstorError::BadRequest {
                object: path,
                debug: response.text,
                payload,
            });
        }
        response.json().map_err(|err| ZnstorError::Decode {
            path,
            message: err.to_string(),
        })
    }
}
