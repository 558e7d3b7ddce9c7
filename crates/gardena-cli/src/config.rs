//! CLI configuration: thin wrapper around `gardena_config` that applies
//! `GlobalOpts` overrides (--config, --profile, --timeout).

use std::path::PathBuf;
use std::time::Duration;

use gardena_config::{Config, load_config_from, profile_to_mower_config};
use gardena_core::MowerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file in effect: `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(gardena_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&config_path(global))?)
}

pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Resolve the active profile into a `MowerConfig`. Flags win over the
/// profile.
pub fn resolve_mower_config(global: &GlobalOpts) -> Result<MowerConfig, CliError> {
    let config = load(global)?;
    let name = active_profile_name(global, &config);
    let profile = config.profile(&name).map_err(|e| match CliError::from(e) {
        CliError::ProfileNotFound {
            name, available, ..
        } => CliError::ProfileNotFound {
            name,
            available,
            path: config_path(global).display().to_string(),
        },
        other => other,
    })?;

    let mut mower = profile_to_mower_config(profile, &name, &config.defaults)?;
    if let Some(secs) = global.timeout {
        mower.timeout = Duration::from_secs(secs);
    }
    tracing::debug!(profile = %name, base_url = %mower.base_url, "resolved profile");
    Ok(mower)
}
