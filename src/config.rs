//! Settings taken from the environment.

use std::{env, ffi::OsString, path::PathBuf};

use log::LevelFilter;

use crate::devmem::DEFAULT_DEVICE;

/// Overrides the memory device, e.g. to map a plain file.
pub const DEVICE_VAR: &str = "MEMCTL_DEVICE";
/// Log level filter for stderr.
pub const LOG_VAR: &str = "MEMCTL_LOG";

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub device: PathBuf,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env(verbose: bool) -> Settings {
        Settings::resolve(
            env::var_os(DEVICE_VAR),
            env::var(LOG_VAR).ok().as_deref(),
            verbose,
        )
    }

    /// `MEMCTL_LOG` wins over `-v`, which wins over the default of `warn`.
    pub fn resolve(device: Option<OsString>, log: Option<&str>, verbose: bool) -> Settings {
        let device = device
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE));

        let default_level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        let log_level = log
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(default_level);

        Settings { device, log_level }
    }
}
