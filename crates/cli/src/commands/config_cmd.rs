//! `fewshot config` — Effective configuration.

use super::CmdResult;
use fewshot_config::AppConfig;
use std::path::Path;

pub fn show(config_path: Option<&Path>) -> CmdResult {
    let config = super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path(config_path: Option<&Path>) -> CmdResult {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", AppConfig::config_dir().join("config.toml").display()),
    }
    Ok(())
}
