//! `ctxpack config`: Configuration management commands.

use anyhow::Context;
use ctxpack_config::{AppConfig, LOCAL_CONFIG_FILE};
use std::path::{Path, PathBuf};

pub fn validate() -> anyhow::Result<()> {
    let path = AppConfig::config_path();
    println!("🔍 Validating configuration ({})...", path.display());

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            if config.token_budget == 0 {
                warnings.push("token_budget is 0; packets will contain tier 1 only");
            }
            if !path.exists() {
                warnings.push("No config file found; using defaults");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Context dir:  {}", config.context_dir);
            println!("   Budget:       {}", config.token_budget);
            println!(
                "   Tiers:        tasks {}%, conventions {}%, split floor {}%",
                config.packet.task_pct, config.packet.convention_pct, config.packet.split_floor_pct
            );
            println!("   Cooldown:     {}s", config.agent.cooldown_secs);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> anyhow::Result<()> {
    let config = super::load_config().context("Failed to load config")?;
    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> anyhow::Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Write a default config file, project-local unless `global`.
pub fn init(global: bool, force: bool) -> anyhow::Result<()> {
    let path = if global {
        AppConfig::config_dir().join("config.toml")
    } else {
        PathBuf::from(LOCAL_CONFIG_FILE)
    };

    if init_at(&path, force)? {
        println!("✅ Created config file: {}", path.display());
    } else {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Use --force to overwrite it");
    }
    Ok(())
}

/// Write the default config to `path`. Returns false if it already exists
/// and `force` is not set.
pub fn init_at(path: &Path, force: bool) -> anyhow::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, AppConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote default config");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_writes_loadable_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        assert!(init_at(&path, false).unwrap());

        let config = AppConfig::load_from(&path).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.token_budget, defaults.token_budget);
        assert_eq!(config.packet, defaults.packet);
        assert_eq!(config.scoring, defaults.scoring);
    }

    #[test]
    fn init_keeps_existing_file_unless_forced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "token_budget = 1234\n").unwrap();

        assert!(!init_at(&path, false).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().token_budget, 1234);

        assert!(init_at(&path, true).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().token_budget, 8000);
    }
}
