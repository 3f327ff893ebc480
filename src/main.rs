//! Binary entry point for the znstor CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use serde_json::{Value, json};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use znstor::{
    DriverConfig, DriverError, VolumeDriver, Znstor, ZnstorConfig, ZnstorError,
    ZnstorIscsiDriver,
};

mod cli;

use cli::{Cli, Command, LogLevel};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] ZnstorError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("failed to render output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let exit_code = match dispatch(cli.command).await.and_then(|value| print_json(&value)) {
        Ok(()) => 0,
        Err(err) => {
            write_error(io::stderr(), &err);
            1
        }
    };
    process::exit(exit_code);
}

const fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn client() -> Result<Znstor, CliError> {
    let config =
        ZnstorConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    Ok(Znstor::new(config)?)
}

fn driver() -> Result<ZnstorIscsiDriver, CliError> {
    let storage = client()?;
    let config =
        DriverConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    Ok(ZnstorIscsiDriver::new(storage, config)?)
}

async fn dispatch(command: Command) -> Result<Value, CliError> {
    let value = match command {
        Command::Projects => client()?.project_list().await?,
        Command::Project { name } => client()?.project_get(&name).await?,
        Command::Volumes { project } => client()?.volume_list(&project).await?,
        Command::Snapshots { project, volume } => {
            client()?.volume_list_snapshot(&project, &volume).await?
        }
        Command::Hostgroups => client()?.hostgroup_list().await?,
        Command::Targetgroups => client()?.targetgroup_list().await?,
        Command::Setup => {
            let driver = driver()?;
            driver.do_setup().await?;
            driver.check_for_setup_error().await?;
            json!({ "project": driver.config().project, "status": "ready" })
        }
        Command::Stats => {
            let stats = driver()?.update_volume_stats().await?;
            serde_json::to_value(stats).map_err(|err| CliError::Output(err.to_string()))?
        }
    };
    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(io::stdout(), "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
