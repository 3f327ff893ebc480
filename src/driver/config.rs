//! Driver settings loaded via `ortho-config`.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::config::{ConfigError, FieldMetadata};

/// Compression algorithms the appliance accepts for projects and volumes.
pub const COMPRESSION_ALGORITHMS: [&str; 14] = [
    "off", "lz4", "lzjb", "gzip", "gzip-1", "gzip-2", "gzip-3", "gzip-4", "gzip-5", "gzip-6",
    "gzip-7", "gzip-8", "gzip-9", "zle",
];

/// Target group used for exports when none is configured.
pub const DEFAULT_TARGET_GROUP: &str = "tg-openstack";

/// Default maximum oversubscription ratio reported in pool stats.
pub const DEFAULT_OVERSUBS_RATIO: u32 = 20;

/// Settings for the iSCSI volume driver, merged from defaults, configuration
/// files, and environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ZNSTOR_DRIVER",
    discovery(
        app_name = "znstor",
        env_var = "ZNSTOR_CONFIG_PATH",
        config_file_name = "znstor.toml",
        dotfile_name = ".znstor.toml",
        project_file_name = "znstor.toml"
    )
)]
pub struct DriverConfig {
    /// Project that holds every volume the driver manages.
    #[ortho_config(default = String::new())]
    pub project: String,
    /// Project quota in GiB.
    #[ortho_config(default = 0)]
    pub quota_gb: u64,
    /// Whether new volumes are thin provisioned.
    #[ortho_config(default = true)]
    pub thin_volumes: bool,
    /// Compression algorithm for the project and new volumes.
    #[ortho_config(default = "lzjb".to_owned())]
    pub compression: String,
    /// Maximum oversubscription ratio advertised to the scheduler.
    #[ortho_config(default = DEFAULT_OVERSUBS_RATIO)]
    pub oversubs_ratio: u32,
    /// iSCSI portal (`ip:port`) handed to initiators.
    #[ortho_config(default = String::new())]
    pub portal_addr: String,
    /// iSCSI target IQN handed to initiators.
    #[ortho_config(default = String::new())]
    pub portal_iqn: String,
    /// Target group volumes are exported through.
    #[ortho_config(default = DEFAULT_TARGET_GROUP.to_owned())]
    pub target_group: String,
}

impl DriverConfig {
    /// Builds a configuration for `project` with the given quota and every
    /// other field at its default.
    #[must_use]
    pub fn new(project: impl Into<String>, quota_gb: u64) -> Self {
        Self {
            project: project.into().trim().to_owned(),
            quota_gb,
            thin_volumes: true,
            compression: String::from("lzjb"),
            oversubs_ratio: DEFAULT_OVERSUBS_RATIO,
            portal_addr: String::new(),
            portal_iqn: String::new(),
            target_group: String::from(DEFAULT_TARGET_GROUP),
        }
    }

    /// Sets the iSCSI portal address and target IQN.
    #[must_use]
    pub fn portal(mut self, addr: impl Into<String>, iqn: impl Into<String>) -> Self {
        self.portal_addr = addr.into();
        self.portal_iqn = iqn.into();
        self
    }

    /// Sets the compression algorithm.
    #[must_use]
    pub fn compression(mut self, value: impl Into<String>) -> Self {
        self.compression = value.into();
        self
    }

    /// Loads configuration without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("znstor")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Checks required fields and value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the project or target group
    /// is empty and [`ConfigError::InvalidValue`] for a zero quota or an
    /// unknown compression algorithm.
    pub fn validate(&self) -> Result<(), ConfigError> {
        FieldMetadata::new("driver project", "ZNSTOR_DRIVER_PROJECT", "project")
            .require(&self.project)?;
        FieldMetadata::new(
            "export target group",
            "ZNSTOR_DRIVER_TARGET_GROUP",
            "target_group",
        )
        .require(&self.target_group)?;

        if self.quota_gb == 0 {
            return Err(
                FieldMetadata::new("project quota", "ZNSTOR_DRIVER_QUOTA_GB", "quota_gb")
                    .invalid("must be greater than zero"),
            );
        }

        if !COMPRESSION_ALGORITHMS.contains(&self.compression.as_str()) {
            let reason = format!(
                "`{}` is not one of {}",
                self.compression,
                COMPRESSION_ALGORITHMS.join(", ")
            );
            return Err(FieldMetadata::new(
                "compression algorithm",
                "ZNSTOR_DRIVER_COMPRESSION",
                "compression",
            )
            .invalid(&reason));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_uses_driver_defaults() {
        let cfg = DriverConfig::new("openstack", 100);
        assert!(cfg.thin_volumes);
        assert_eq!(cfg.compression, "lzjb");
        assert_eq!(cfg.oversubs_ratio, 20);
        assert_eq!(cfg.target_group, "tg-openstack");
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn missing_project_names_env_var() {
        let err = DriverConfig::new("  ", 10)
            .validate()
            .expect_err("empty project");
        assert!(
            matches!(err, ConfigError::MissingField(ref message) if message.contains("ZNSTOR_DRIVER_PROJECT")),
            "{err}"
        );
    }

    #[test]
    fn zero_quota_is_rejected() {
        let err = DriverConfig::new("p", 0).validate().expect_err("zero quota");
        assert!(err.to_string().contains("ZNSTOR_DRIVER_QUOTA_GB"), "{err}");
    }

    #[rstest]
    #[case("off")]
    #[case("lz4")]
    #[case("gzip")]
    #[case("gzip-9")]
    #[case("zle")]
    fn known_compression_is_accepted(#[case] algorithm: &str) {
        let cfg = DriverConfig::new("p", 1).compression(algorithm);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[rstest]
    #[case("zstd")]
    #[case("gzip-10")]
    #[case("")]
    fn unknown_compression_is_rejected(#[case] algorithm: &str) {
        let err = DriverConfig::new("p", 1)
            .compression(algorithm)
            .validate()
            .expect_err("unknown algorithm");
        assert!(matches!(err, ConfigError::InvalidValue(_)), "{err}");
    }
}
