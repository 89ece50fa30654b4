pub mod agent;
pub mod config_cmd;
pub mod cooldown;
pub mod status;

use ctxpack_config::AppConfig;

/// Effective configuration, with failures as domain errors.
pub fn load_config() -> ctxpack_core::Result<AppConfig> {
    Ok(AppConfig::load()?)
}
