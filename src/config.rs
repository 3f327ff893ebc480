//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Management address used when none is configured.
pub const DEFAULT_MANAGEMENT_ADDRESS: &str = "127.0.0.1:10987";

/// The only REST API version the appliance exposes.
pub const SUPPORTED_API_VERSION: &str = "v1";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Connection settings for the appliance REST API, merged from defaults,
/// configuration files, and environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ZNSTOR",
    discovery(
        app_name = "znstor",
        env_var = "ZNSTOR_CONFIG_PATH",
        config_file_name = "znstor.toml",
        dotfile_name = ".znstor.toml",
        project_file_name = "znstor.toml"
    )
)]
pub struct ZnstorConfig {
    /// Storage management interface as `host:port` (IP or DNS name).
    #[ortho_config(default = DEFAULT_MANAGEMENT_ADDRESS.to_owned())]
    pub management_address: String,
    /// REST API version. Only `v1` is supported.
    #[ortho_config(default = SUPPORTED_API_VERSION.to_owned())]
    pub api_version: String,
    /// Pool identifier (zpool name).
    #[ortho_config(default = "tank".to_owned())]
    pub pool: String,
    /// Domain identifier, the first-level dataset inside the pool.
    #[ortho_config(default = "default".to_owned())]
    pub domain: String,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    /// User for HTTP Basic authentication.
    #[ortho_config(default = "znstor".to_owned())]
    pub user: String,
    /// Password for HTTP Basic authentication.
    #[ortho_config(default = "nevada".to_owned())]
    pub password: String,
    /// URL scheme prefix including the separator, for example `https://`.
    #[ortho_config(default = "http://".to_owned())]
    pub scheme: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
pub(crate) struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    pub(crate) const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    pub(crate) fn require(&self, value: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to znstor.toml",
                self.description, self.env_var, self.toml_key
            )));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidValue(format!(
            "invalid {}: {reason}; check {} or {} in znstor.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

impl ZnstorConfig {
    /// Builds a configuration for `management_address` with every other
    /// field at its default.
    #[must_use]
    pub fn new(management_address: impl Into<String>) -> Self {
        Self {
            management_address: management_address.into().trim().to_owned(),
            api_version: String::from(SUPPORTED_API_VERSION),
            pool: String::from("tank"),
            domain: String::from("default"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user: String::from("znstor"),
            password: String::from("nevada"),
            scheme: String::from("http://"),
        }
    }

    /// Sets the pool identifier.
    #[must_use]
    pub fn pool(mut self, value: impl Into<String>) -> Self {
        self.pool = value.into().trim().to_owned();
        self
    }

    /// Sets the domain identifier.
    #[must_use]
    pub fn domain(mut self, value: impl Into<String>) -> Self {
        self.domain = value.into().trim().to_owned();
        self
    }

    /// Sets the Basic authentication credentials.
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Sets the per-request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, value: u64) -> Self {
        self.timeout_secs = value;
        self
    }

    /// Sets the URL scheme prefix, for example `https://`.
    #[must_use]
    pub fn scheme(mut self, value: impl Into<String>) -> Self {
        self.scheme = value.into();
        self
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads configuration using the `ortho-config` derive without parsing
    /// CLI arguments. Values merge defaults, configuration files, and
    /// environment variables in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("znstor")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and configuration key that supply each field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty,
    /// [`ConfigError::UnsupportedApiVersion`] for any version other than
    /// `v1`, and [`ConfigError::InvalidValue`] for a zero timeout or a scheme
    /// without `://`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        FieldMetadata::new(
            "management address",
            "ZNSTOR_MANAGEMENT_ADDRESS",
            "management_address",
        )
        .require(&self.management_address)?;
        FieldMetadata::new("pool identifier", "ZNSTOR_POOL", "pool").require(&self.pool)?;
        FieldMetadata::new("domain identifier", "ZNSTOR_DOMAIN", "domain")
            .require(&self.domain)?;
        FieldMetadata::new("API user", "ZNSTOR_USER", "user").require(&self.user)?;

        if self.api_version != SUPPORTED_API_VERSION {
            return Err(ConfigError::UnsupportedApiVersion(self.api_version.clone()));
        }

        let timeout = FieldMetadata::new("request timeout", "ZNSTOR_TIMEOUT_SECS", "timeout_secs");
        if self.timeout_secs == 0 {
            return Err(timeout.invalid("must be greater than zero"));
        }

        let scheme = FieldMetadata::new("URL scheme", "ZNSTOR_SCHEME", "scheme");
        if !self.scheme.ends_with("://") {
            return Err(scheme.invalid("must end with `://`"));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Raised when a version other than `v1` is requested.
    #[error("unsupported API version {0}: only v1 is available (ZNSTOR_API_VERSION)")]
    UnsupportedApiVersion(String),
    /// Raised when a field is present but unusable.
    #[error("{0}")]
    InvalidValue(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
