//! Configuration management for pagewright.
//!
//! Parses `pw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Project Layout
//!
//! ```text
//! project/
//! ├── pw.toml
//! ├── content/
//! │   ├── en/              # one page tree per language
//! │   │   ├── page.md
//! │   │   ├── assets/
//! │   │   └── about/
//! │   │       └── page.md
//! │   └── fr/
//! └── themes/
//!     └── default/
//!         ├── routes.conf
//!         ├── templates/
//!         └── static/
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: `site.title`, `site.theme`, and every `[paths]` entry.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override theme name.
    pub theme: Option<String>,
    /// Override the clean-before-build flag.
    pub clean: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pw.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteConfig,
    /// Project paths as written in the file (relative strings).
    paths: PathsConfigRaw,
    /// Build behaviour.
    pub build: BuildConfig,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, exposed to templates.
    pub title: String,
    /// Theme directory name under the themes directory.
    pub theme: String,
    /// Languages to build. `None` means every non-hidden content subdirectory.
    pub languages: Option<Vec<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            theme: "default".to_owned(),
            languages: None,
        }
    }
}

/// Raw paths configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    content_dir: Option<String>,
    themes_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved project paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathsConfig {
    /// Directory holding one page tree per language.
    pub content_dir: PathBuf,
    /// Directory holding themes.
    pub themes_dir: PathBuf,
    /// Directory the site is generated into.
    pub output_dir: PathBuf,
}

/// Build behaviour configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Remove the output directory before generating.
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { clean: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.theme`").
        field: String,
        /// Error message (e.g., "${`PW_THEME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a name to be a single path segment.
fn require_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single directory name, got '{value}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pw.toml` in current directory and parents,
    /// falling back to defaults rooted at the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.paths_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(theme) = &settings.theme {
            self.site.theme.clone_from(theme);
        }
        if let Some(clean) = settings.clean {
            self.build.clean = clean;
        }
    }

    /// Directory of the configured theme.
    #[must_use]
    pub fn theme_dir(&self) -> PathBuf {
        self.paths_resolved.themes_dir.join(&self.site.theme)
    }

    /// Content tree directory for one language.
    #[must_use]
    pub fn language_dir(&self, lang: &str) -> PathBuf {
        self.paths_resolved.content_dir.join(lang)
    }

    /// Languages to build.
    ///
    /// Uses `site.languages` when set. Otherwise lists every non-hidden
    /// subdirectory of the content directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the content directory is missing,
    /// or `ConfigError::Io` if it can't be listed.
    pub fn languages(&self) -> Result<Vec<String>, ConfigError> {
        let content_dir = &self.paths_resolved.content_dir;
        if !content_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "content folder '{}' not found",
                content_dir.display()
            )));
        }

        if let Some(languages) = &self.site.languages {
            return Ok(languages.clone());
        }

        let mut languages = Vec::new();
        for entry in std::fs::read_dir(content_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            languages.push(name);
        }
        languages.sort();
        Ok(languages)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfigRaw::default(),
            build: BuildConfig::default(),
            paths_resolved: PathsConfig {
                content_dir: base.join("content"),
                themes_dir: base.join("themes"),
                output_dir: base.join("www"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_segment(&self.site.theme, "site.theme")?;
        for lang in self.site.languages.iter().flatten() {
            require_segment(lang, "site.languages")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.site.theme = expand::expand_env(&self.site.theme, "site.theme")?;

        let paths = &mut self.paths;
        for (value, field) in [
            (&mut paths.content_dir, "paths.content_dir"),
            (&mut paths.themes_dir, "paths.themes_dir"),
            (&mut paths.output_dir, "paths.output_dir"),
        ] {
            if let Some(raw) = value {
                *raw = expand::expand_env(raw, field)?;
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            content_dir: resolve(self.paths.content_dir.as_deref(), "content"),
            themes_dir: resolve(self.paths.themes_dir.as_deref(), "themes"),
            output_dir: resolve(self.paths.output_dir.as_deref(), "www"),
        };
    }
}
