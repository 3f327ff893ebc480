//! Tests for configuration loading and validation.

use rstest::{fixture, rstest};
use tempfile::TempDir;
use znstor::test_support::EnvGuard;
use znstor::{ConfigError, DriverConfig, ZnstorConfig};

#[fixture]
fn valid_config() -> ZnstorConfig {
    ZnstorConfig::new("192.0.2.10:10987")
        .pool("tank")
        .domain("default")
        .credentials("znstor", "nevada")
}

/// Verifies that validation produces actionable errors mentioning both the
/// environment variable and configuration file for each required field.
#[rstest]
#[case::address(
    ZnstorConfig { management_address: String::new(), ..valid_config() },
    "ZNSTOR_MANAGEMENT_ADDRESS",
    "management_address"
)]
#[case::pool(ZnstorConfig { pool: String::from(" "), ..valid_config() }, "ZNSTOR_POOL", "pool")]
#[case::domain(
    ZnstorConfig { domain: String::new(), ..valid_config() },
    "ZNSTOR_DOMAIN",
    "domain"
)]
#[case::user(ZnstorConfig { user: String::new(), ..valid_config() }, "ZNSTOR_USER", "user")]
fn validation_errors_are_actionable(
    #[case] cfg: ZnstorConfig,
    #[case] env_var: &str,
    #[case] toml_key: &str,
) {
    let error = cfg.validate().expect_err("field is required");
    let ConfigError::MissingField(ref message) = error else {
        panic!("expected MissingField error, got {error:?}");
    };
    assert!(message.contains(env_var), "error should mention env var: {message}");
    assert!(
        message.contains("znstor.toml"),
        "error should mention config file: {message}"
    );
    assert!(message.contains(toml_key), "error should mention TOML key: {message}");
}

#[rstest]
fn valid_config_passes(valid_config: ZnstorConfig) {
    assert_eq!(valid_config.validate(), Ok(()));
}

#[rstest]
fn only_v1_is_supported(valid_config: ZnstorConfig) {
    let cfg = ZnstorConfig {
        api_version: String::from("v2"),
        ..valid_config
    };
    let err = cfg.validate().expect_err("v2 is not served");
    assert_eq!(err, ConfigError::UnsupportedApiVersion(String::from("v2")));
    assert!(err.to_string().contains("only v1"), "{err}");
}

#[tokio::test]
async fn environment_overrides_defaults() {
    let home = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let home_path = home.path().to_string_lossy().to_string();
    let _guard = EnvGuard::set_vars(&[
        ("HOME", home_path.as_str()),
        ("XDG_CONFIG_HOME", home_path.as_str()),
        ("ZNSTOR_MANAGEMENT_ADDRESS", "198.51.100.7:10987"),
        ("ZNSTOR_POOL", "gold"),
        ("ZNSTOR_TIMEOUT_SECS", "30"),
        ("ZNSTOR_DRIVER_PROJECT", "openstack"),
        ("ZNSTOR_DRIVER_QUOTA_GB", "250"),
        ("ZNSTOR_DRIVER_COMPRESSION", "lz4"),
    ])
    .await;

    let client = ZnstorConfig::load_without_cli_args()
        .unwrap_or_else(|err| panic!("client config should load: {err}"));
    assert_eq!(client.management_address, "198.51.100.7:10987");
    assert_eq!(client.pool, "gold");
    assert_eq!(client.domain, "default");
    assert_eq!(client.timeout_secs, 30);
    assert_eq!(client.api_version, "v1");
    assert_eq!(client.validate(), Ok(()));

    let driver = DriverConfig::load_without_cli_args()
        .unwrap_or_else(|err| panic!("driver config should load: {err}"));
    assert_eq!(driver.project, "openstack");
    assert_eq!(driver.quota_gb, 250);
    assert_eq!(driver.compression, "lz4");
    assert!(driver.thin_volumes);
    assert_eq!(driver.target_group, "tg-openstack");
    assert_eq!(driver.validate(), Ok(()));
}

#[test]
fn driver_validation_names_env_vars() {
    let err = DriverConfig::new("openstack", 10)
        .compression("brotli")
        .validate()
        .expect_err("unknown algorithm");
    let message = err.to_string();
    assert!(message.contains("ZNSTOR_DRIVER_COMPRESSION"), "{message}");
    assert!(message.contains("brotli"), "{message}");
}
