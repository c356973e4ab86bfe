//! Process-level plumbing shared by profile-viewer binaries: layered configuration and
//! logging initialization.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, resolve_home_dir, AppConfig, CliArgs, LoggingConfig, Section,
};
