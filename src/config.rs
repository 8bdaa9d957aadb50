use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main gate-prep configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub gateway: GatewayConfig,
    pub ui: UiConfig,
    /// File this configuration was read from; `None` for built-in defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Log verbosity, overridden by RUST_LOG when set
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the generative language API
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Model override applied to every persona
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show routing trace blocks in the chat view
    pub show_trace: bool,
    /// Maximum bubble width as a percentage of the terminal
    pub max_width_percent: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            gateway: GatewayConfig::default(),
            ui: UiConfig::default(),
            source: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "API_KEY".to_string(),
            model: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_trace: true,
            max_width_percent: 75,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("GATE_PREP_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from GATE_PREP_CONFIG: {}", e);
                    }
                }
            }
        }

        if let Ok(app_dir) = std::env::var("GATE_PREP_DIR") {
            let path = PathBuf::from(app_dir).join("gate-prep.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from GATE_PREP_DIR: {}", e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("gate-prep").join("gate-prep.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./gate-prep.yaml (for development)
        let local_config = PathBuf::from("gate-prep.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = Self::expand_path(path.as_ref());
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.display());
        config.source = Some(path);
        Ok(config)
    }

    /// Get the application directory (config file and .env live here)
    pub fn app_dir() -> PathBuf {
        std::env::var("GATE_PREP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("gate-prep")
            })
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Look up a single value by dotted key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "log_level" | "log-level" => Some(self.log_level.as_filter().to_string()),
            "gateway.base_url" => Some(self.gateway.base_url.clone()),
            "gateway.api_key_env" => Some(self.gateway.api_key_env.clone()),
            "gateway.model" => Some(self.gateway.model.clone().unwrap_or_default()),
            "ui.show_trace" => Some(self.ui.show_trace.to_string()),
            "ui.max_width_percent" => Some(self.ui.max_width_percent.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.gateway.api_key_env, "API_KEY");
        assert!(config.gateway.model.is_none());
        assert!(config.ui.show_trace);
        assert_eq!(config.ui.max_width_percent, 75);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
gateway:
  model: gemini-2.5-flash
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(config.gateway.api_key_env, "API_KEY");
        assert!(config.gateway.base_url.starts_with("https://generativelanguage"));
        assert!(config.ui.show_trace);
    }

    #[test]
    fn test_log_level_parse() {
        let config: Config = serde_yaml::from_str("log_level: debug").unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_level.as_filter(), "debug");
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "ui:\n  show_trace: false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.ui.show_trace);
    }

    #[test]
    fn test_load_records_source_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("elsewhere.yaml");
        fs::write(&path, "log_level: warn\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert!(Config::default().source.is_none());
    }

    #[test]
    fn test_source_is_not_serialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gate-prep.yaml");
        fs::write(&path, "ui:\n  show_trace: false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("source"));
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("gateway.api_key_env").as_deref(), Some("API_KEY"));
        assert_eq!(config.get("log-level").as_deref(), Some("info"));
        assert_eq!(config.get("ui.max_width_percent").as_deref(), Some("75"));
        assert!(config.get("gateway.api_key").is_none());
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/bin");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.gateway.base_url, config.gateway.base_url);
        assert_eq!(parsed.ui.max_width_percent, config.ui.max_width_percent);
    }
}
