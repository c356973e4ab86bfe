use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Subdirectory created under the user's home when `home_dir` is not configured.
pub const DEFAULT_SUBDIR: &str = ".profile-viewer";

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base directory for relative paths such as log files (normalized to absolute).
    #[serde(default)]
    pub home_dir: String,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/profile-viewer.log", empty => no file output
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many rotated files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Rotate once the file grows past this size
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/profile-viewer.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            logging: Some(default_logging_config()),
            modules: HashMap::new(),
        }
    }
}

/// Command line arguments that influence configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.exists() {
            return Err(anyhow!("config file not found: {}", path.display()));
        }

        // Start from a base where logging is None so it stays None unless provided.
        let base = AppConfig {
            home_dir: String::new(),
            logging: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // Example: APP__MODULES__PROFILE__BASE_URL=http://localhost:3000
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to extract config from {}", path.display()))?;

        config.normalize_home_dir()?;
        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                c.normalize_home_dir()
                    .context("Failed to resolve home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(),
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    /// Set a single key inside a module's configuration bag, creating the bag if needed.
    pub fn set_module_value(&mut self, module: &str, key: &str, value: serde_json::Value) {
        let entry = self
            .modules
            .entry(module.to_string())
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        if !entry.is_object() {
            *entry = serde_json::Value::Object(Default::default());
        }
        if let Some(obj) = entry.as_object_mut() {
            obj.insert(key.to_string(), value);
        }
    }

    /// Deserialize a module's configuration. A missing section yields `T::default()`.
    pub fn module_config<T>(&self, module: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module) {
            None => Ok(T::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("invalid configuration for module '{module}'")),
        }
    }

    fn normalize_home_dir(&mut self) -> Result<()> {
        let opt = if self.home_dir.trim().is_empty() {
            None
        } else {
            Some(self.home_dir.as_str())
        };
        let resolved = resolve_home_dir(opt, DEFAULT_SUBDIR, true)
            .context("home_dir normalization failed")?;
        self.home_dir = resolved.to_string_lossy().to_string();
        Ok(())
    }
}

/// Resolve the application home directory.
///
/// - `None` → `<user home>/<default_subdir>`
/// - `~` / `~/...` → expanded against the user home
/// - relative paths → joined onto the current directory
pub fn resolve_home_dir(
    configured: Option<&str>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home directory"));

    let path = match configured.map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some("~") => user_home()?,
        Some(p) if p.starts_with("~/") || p.starts_with("~\\") => user_home()?.join(&p[2..]),
        Some(p) => {
            let p = PathBuf::from(p);
            if p.is_absolute() {
                p
            } else {
                std::env::current_dir()
                    .context("cannot read current directory")?
                    .join(p)
            }
        }
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    }
    Ok(path)
}
