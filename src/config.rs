//! Configuration for medlearn.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (MEDLEARN_LEVEL, MEDLEARN_VALIDATE_ON_LOAD)
//! 2. Project config file (.medlearn/config.yaml)
//! 3. User config file (~/.medlearn/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .medlearn/config.yaml
//! - Falls back to the home directory when no project file exists

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Level;
use crate::validation::ValidationOptions;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const CONFIG_DIR: &str = ".medlearn";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_LEVEL: &str = "MEDLEARN_LEVEL";
pub const ENV_VALIDATE_ON_LOAD: &str = "MEDLEARN_VALIDATE_ON_LOAD";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Level used when a command does not ask for one
    pub default_level: Option<Level>,
    /// Maximum entries printed by list commands
    pub list_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Validate bundled content when the CLI starts
    pub on_load: Option<bool>,
    #[serde(flatten)]
    pub options: ValidationOptions,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_level: Level,
    pub list_limit: usize,
    pub validate_on_load: bool,
    pub validation: ValidationOptions,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_level: Level::Patient,
            list_limit: 20,
            validate_on_load: true,
            validation: ValidationOptions::default(),
            config_file: None,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Project config above the current directory, else the user config
fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file_from(&cwd))
    {
        return Some(path);
    }

    let user_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Expected true or false, got '{}'", other),
    }
}

/// Merge a parsed config file and environment lookups over the defaults
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some((path, config)) = file {
        if let Some(level) = config.display.default_level {
            resolved.default_level = level;
        }
        if let Some(limit) = config.display.list_limit {
            resolved.list_limit = limit;
        }
        if let Some(on_load) = config.validation.on_load {
            resolved.validate_on_load = on_load;
        }
        resolved.validation = config.validation.options;
        resolved.config_file = Some(path);
    }

    if let Some(level) = env(ENV_LEVEL) {
        resolved.default_level = level
            .parse::<Level>()
            .with_context(|| format!("Invalid {}", ENV_LEVEL))?;
    }
    if let Some(on_load) = env(ENV_VALIDATE_ON_LOAD) {
        resolved.validate_on_load =
            parse_bool(&on_load).with_context(|| format!("Invalid {}", ENV_VALIDATE_ON_LOAD))?;
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!(path = %path.display(), version = %config.version, "Loaded config file");
            Some((path, config))
        }
        None => None,
    };

    resolve(file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, no_env).unwrap();
        assert_eq!(config.default_level, Level::Patient);
        assert_eq!(config.list_limit, 20);
        assert!(config.validate_on_load);
        assert!(config.validation.report_dangling_references);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
display:
  default_level: 4
  list_limit: 5
validation:
  on_load: false
  report_dangling_references: false
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.display.default_level, Some(Level::MedicalStudent));
        assert_eq!(config.validation.on_load, Some(false));
        assert!(!config.validation.options.report_dangling_references);
        assert!(config.validation.options.report_unused_categories);

        let resolved = resolve(Some((config_path.clone(), config)), no_env).unwrap();
        assert_eq!(resolved.list_limit, 5);
        assert!(!resolved.validate_on_load);
        assert_eq!(resolved.config_file, Some(config_path));
    }

    #[test]
    fn test_version_is_optional() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "display:\n  list_limit: 3\n");

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.display.list_limit, Some(3));
    }

    #[test]
    fn test_invalid_level_in_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"\ndisplay:\n  default_level: 9\n");

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file_from(&nested), Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            display: DisplayConfig {
                default_level: Some(Level::Child),
                list_limit: None,
            },
            validation: ValidationConfig::default(),
        };

        let env = |key: &str| match key {
            ENV_LEVEL => Some("physician".to_string()),
            ENV_VALIDATE_ON_LOAD => Some("0".to_string()),
            _ => None,
        };

        let resolved = resolve(Some((PathBuf::from("config.yaml"), file)), env).unwrap();
        assert_eq!(resolved.default_level, Level::Physician);
        assert!(!resolved.validate_on_load);
    }

    #[test]
    fn test_invalid_env_value() {
        let env = |key: &str| (key == ENV_VALIDATE_ON_LOAD).then(|| "maybe".to_string());
        let err = resolve(None, env).unwrap_err();
        assert!(format!("{:#}", err).contains(ENV_VALIDATE_ON_LOAD));

        let env = |key: &str| (key == ENV_LEVEL).then(|| "surgeon".to_string());
        assert!(resolve(None, env).is_err());
    }
}
