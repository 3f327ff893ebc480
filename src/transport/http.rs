//! reqwest-backed transport.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};

use super::{HttpRequest, HttpResponse, Transport, TransportError, TransportFuture};
use crate::config::ZnstorConfig;

/// Static `User-Agent` sent with every request.
pub const USER_AGENT: &str = "znstor-RESTClient";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport that talks to the appliance over HTTP with Basic authentication.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    user: String,
    password: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Builds a transport from the credentials and timeout in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the underlying HTTP client cannot be
    /// constructed (for example when the TLS backend fails to initialise).
    pub fn new(config: &ZnstorConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|err| TransportError::new(err.to_string()))?;
        Ok(Self {
            client,
            user: config.user.clone(),
            password: config.password.clone(),
            timeout: config.timeout(),
        })
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .request(request.method.clone(), &request.url)
                .basic_auth(&self.user, Some(&self.password))
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .timeout(self.timeout)
                .json(&request.body)
                .send()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;
            Ok(HttpResponse { status, text })
        })
    }
}
