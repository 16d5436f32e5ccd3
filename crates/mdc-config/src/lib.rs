//! Configuration management for mdc.
//!
//! Parses `mdc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Command-line style overrides can be applied during load via [`Overrides`].
//!
//! ```toml
//! [components]
//! builtins = true
//! strict_blocks = false
//! placeholder_prefix = "__COMPONENT_"
//!
//! [navigation]
//! root_title = "Documentation"
//! root_href = "/docs"
//! words_per_minute = 200
//!
//! [frontmatter]
//! visibility = ["public", "private", "draft"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override built-in component registration.
    pub builtins: Option<bool>,
    /// Override depth-aware block matching.
    pub strict_blocks: Option<bool>,
    /// Override breadcrumb root title.
    pub root_title: Option<String>,
    /// Override breadcrumb root href.
    pub root_href: Option<String>,
    /// Override reading speed.
    pub words_per_minute: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdc.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Component engine configuration.
    pub components: ComponentsConfig,
    /// Navigation configuration.
    pub navigation: NavigationConfig,
    /// Front matter validation configuration.
    pub frontmatter: FrontmatterConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Component engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Register `Alert`, `Card`, `Callout` and `CodeBlock`.
    pub builtins: bool,
    /// Balance nested same-named block tags instead of closing at the first
    /// matching close tag.
    pub strict_blocks: bool,
    /// Prefix of placeholder tokens left in rendered text.
    pub placeholder_prefix: String,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            builtins: true,
            strict_blocks: false,
            placeholder_prefix: "__COMPONENT_".to_owned(),
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Title of the breadcrumb root.
    pub root_title: String,
    /// Href of the breadcrumb root.
    pub root_href: String,
    /// Reading speed for section read time estimates.
    pub words_per_minute: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            root_title: "Documentation".to_owned(),
            root_href: "/docs".to_owned(),
            words_per_minute: 200,
        }
    }
}

/// Front matter validation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FrontmatterConfig {
    /// Allowed `visibility` values.
    pub visibility: Vec<String>,
}

impl Default for FrontmatterConfig {
    fn default() -> Self {
        Self {
            visibility: vec!["public".to_owned(), "private".to_owned(), "draft".to_owned()],
        }
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdc.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// Overrides are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(builtins) = overrides.builtins {
            self.components.builtins = builtins;
        }
        if let Some(strict_blocks) = overrides.strict_blocks {
            self.components.strict_blocks = strict_blocks;
        }
        if let Some(root_title) = &overrides.root_title {
            self.navigation.root_title.clone_from(root_title);
        }
        if let Some(root_href) = &overrides.root_href {
            self.navigation.root_href.clone_from(root_href);
        }
        if let Some(words_per_minute) = overrides.words_per_minute {
            self.navigation.words_per_minute = words_per_minute;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_components()?;
        self.validate_navigation()?;
        self.validate_frontmatter()?;
        Ok(())
    }

    fn validate_components(&self) -> Result<(), ConfigError> {
        require_non_empty(
            &self.components.placeholder_prefix,
            "components.placeholder_prefix",
        )
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        let nav = &self.navigation;
        require_non_empty(&nav.root_title, "navigation.root_title")?;
        if !nav.root_href.starts_with('/') {
            return Err(ConfigError::Validation(
                "navigation.root_href must start with /".to_owned(),
            ));
        }
        if nav.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "navigation.words_per_minute must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_frontmatter(&self) -> Result<(), ConfigError> {
        if self.frontmatter.visibility.is_empty() {
            return Err(ConfigError::Validation(
                "frontmatter.visibility cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.components.builtins);
        assert!(!config.components.strict_blocks);
        assert_eq!(config.components.placeholder_prefix, "__COMPONENT_");
        assert_eq!(config.navigation.root_title, "Documentation");
        assert_eq!(config.navigation.root_href, "/docs");
        assert_eq!(config.navigation.words_per_minute, 200);
        assert_eq!(config.frontmatter.visibility, vec!["public", "private", "draft"]);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.components.builtins);
        assert_eq!(config.navigation.root_href, "/docs");
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r#"
[components]
strict_blocks = true

[navigation]
root_title = "Handbook"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.components.strict_blocks);
        assert!(config.components.builtins); // Default
        assert_eq!(config.navigation.root_title, "Handbook");
        assert_eq!(config.navigation.root_href, "/docs"); // Default
    }

    #[test]
    fn test_parse_frontmatter_visibility() {
        let toml = r#"
[frontmatter]
visibility = ["public", "internal"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.frontmatter.visibility, vec!["public", "internal"]);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = Overrides {
            strict_blocks: Some(true),
            root_href: Some("/handbook".to_owned()),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert!(config.components.strict_blocks);
        assert_eq!(config.navigation.root_href, "/handbook");
        assert_eq!(config.navigation.root_title, "Documentation"); // Unchanged
    }

    #[test]
    fn test_apply_overrides_empty() {
        let mut config = Config::default();
        config.apply_overrides(&Overrides::default());

        assert!(config.components.builtins);
        assert_eq!(config.navigation.words_per_minute, 200);
    }

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(
            err.to_string().contains(expected),
            "Expected error to contain {expected:?}, got: {err}"
        );
    }

    #[test]
    fn test_validate_default_config_passes() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_validate_empty_root_title() {
        let mut config = Config::default();
        config.navigation.root_title = String::new();
        assert_validation_error(&config, "navigation.root_title");
    }

    #[test]
    fn test_validate_relative_root_href() {
        let mut config = Config::default();
        config.navigation.root_href = "docs".to_owned();
        assert_validation_error(&config, "navigation.root_href");
    }

    #[test]
    fn test_validate_zero_words_per_minute() {
        let mut config = Config::default();
        config.navigation.words_per_minute = 0;
        assert_validation_error(&config, "words_per_minute");
    }

    #[test]
    fn test_validate_empty_placeholder_prefix() {
        let mut config = Config::default();
        config.components.placeholder_prefix = String::new();
        assert_validation_error(&config, "placeholder_prefix");
    }

    #[test]
    fn test_validate_empty_visibility() {
        let mut config = Config::default();
        config.frontmatter.visibility.clear();
        assert_validation_error(&config, "frontmatter.visibility");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdc.toml");
        fs::write(&path, "[navigation]\nwords_per_minute = 250\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.navigation.words_per_minute, 250);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdc.toml");
        fs::write(&path, "[navigation\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates_after_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdc.toml");
        fs::write(&path, "").unwrap();
        let overrides = Overrides {
            words_per_minute: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
