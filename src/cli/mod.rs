//! Command-line interface definitions for the `znstor` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `znstor` binary.
#[derive(Debug, Parser)]
#[command(
    name = "znstor",
    about = "Inspect and prepare a znstor storage appliance over its REST API",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Log verbosity used when `RUST_LOG` is not set.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub(crate) log_level: LogLevel,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Operations exposed by the CLI.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List projects in the configured pool and domain.
    #[command(name = "projects")]
    Projects,
    /// Show a single project.
    #[command(name = "project")]
    Project {
        /// Project name.
        name: String,
    },
    /// List the volumes of a project.
    #[command(name = "volumes")]
    Volumes {
        /// Project name.
        project: String,
    },
    /// List the snapshots of a volume.
    #[command(name = "snapshots")]
    Snapshots {
        /// Project name.
        project: String,
        /// Volume identifier (LU name) as reported by `volumes`.
        volume: String,
    },
    /// List host groups.
    #[command(name = "hostgroups")]
    Hostgroups,
    /// List target groups.
    #[command(name = "targetgroups")]
    Targetgroups,
    /// Create or update the driver project and verify it.
    ///
    /// Reads the driver settings from `ZNSTOR_DRIVER_*` environment variables
    /// or `znstor.toml`.
    #[command(name = "setup")]
    Setup,
    /// Print the driver's capacity report.
    #[command(name = "stats")]
    Stats,
}

/// Log levels accepted by `--log-level`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Request summaries.
    Info,
    /// Request paths and bodies.
    Debug,
    /// Everything, including HTTP stack internals.
    Trace,
}
