//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Display name of the companion
    #[serde(default = "default_name")]
    pub companion_name: String,

    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Surface raw model output for diagnostics
    #[serde(default)]
    pub debug: bool,
}

fn default_name() -> String {
    "Ayane".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            companion_name: default_name(),
            gemini_api_key: String::new(),
            model: default_model(),
            debug: false,
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".thera")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default location
pub fn load() -> Result<Config> {
    let path = config_path();

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config not found at {:?}. Run 'thera onboard' first.",
            path
        )));
    }

    load_from(&path)
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

/// Save configuration to an explicit path
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Initialize configuration interactively
pub fn onboard() -> Result<()> {
    use crate::ui;
    use inquire::{Confirm, Text};

    ui::print_step("Welcome! Let's get your companion configured.");
    println!();

    let mut config = Config::default();

    let key = Text::new("Enter your Gemini API Key:")
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    if key.trim().is_empty() {
        return Err(Error::Config("API key cannot be empty".to_string()));
    }
    config.gemini_api_key = key.trim().to_string();

    let name = Text::new("Companion name:")
        .with_default(&config.companion_name)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    if !name.trim().is_empty() {
        config.companion_name = name.trim().to_string();
    }

    let keep_model = Confirm::new(&format!("Use default model ({})?", config.model))
        .with_default(true)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    if !keep_model {
        let model = Text::new("Model:")
            .prompt()
            .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
        config.model = model.trim().to_string();
    }

    ui::print_thinking("Saving configuration");
    save(&config)?;

    println!();
    ui::print_success("Setup complete!");
    ui::print_step("You're all set! Run 'thera chat' to start talking.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.companion_name, "Ayane");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert!(!config.debug);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.companion_name, config.companion_name);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.gemini_api_key = "test-key".to_string();
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.gemini_api_key, "test-key");
        assert_eq!(loaded.model, config.model);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"gemini_api_key":"k"}"#).unwrap();
        assert_eq!(parsed.companion_name, "Ayane");
        assert_eq!(parsed.model, "gemini-2.0-flash");
    }
}
