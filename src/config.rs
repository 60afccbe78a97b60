//! # Stylesheet Configuration
//!
//! This module provides the configuration layer around the resolution
//! core: declarative stylesheets loaded from TOML or JSON files, theme
//! selection through environment variables, and hot reloading of
//! stylesheet files.
//!
//! ## Stylesheet format
//!
//! A stylesheet maps pattern identifiers to property tables. Property
//! values are opaque to the resolution core; they are handed to whichever
//! layer applies them.
//!
//! ```toml
//! theme = "dark"
//!
//! [styles."searchBar/label"]
//! color = "#6b7a8f"
//! font-size = 14.0
//!
//! [styles."@dark/searchBar/label"]
//! color = "#e8e8e8"
//! ```
//!
//! ## Environment variables
//!
//! - `STYLIST_STYLESHEET`: path of a stylesheet file to load.
//! - `STYLIST_THEME`: name of the theme to activate, overriding the
//!   stylesheet's own `theme` key.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stylist::config::StylistConfig;
//!
//! let config = StylistConfig::from_file("styles.toml")?;
//! let stylist = config.into_stylist();
//! let style = stylist.resolve(&"home/searchBar/label".into());
//! # Ok::<(), stylist::error::StylistError>(())
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};

use crate::error::StylistError;
use crate::identifier::StylistIdentifier;
use crate::registry::{Style, Stylist};
use crate::theme::Theme;

/// Environment variable naming the theme to activate.
pub const THEME_ENV_VAR: &str = "STYLIST_THEME";

/// Environment variable pointing at a stylesheet file.
pub const STYLESHEET_ENV_VAR: &str = "STYLIST_STYLESHEET";

/// The properties a stylesheet attaches to one pattern, in declaration
/// order.
pub type StyleProperties = IndexMap<String, PropertyValue>;

/// A single stylesheet property value.
///
/// Interpretation is up to the layer applying the style; the resolution
/// core treats the whole property table as an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A float value.
    Float(f64),
    /// A string value.
    String(String),
}

impl PropertyValue {
    /// The boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float value, if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

/// A stylesheet: an optional active theme and pattern-keyed property
/// tables, loadable from TOML or JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylistConfig {
    /// The theme to activate, without its `@` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Pattern identifier strings mapped to their properties.
    #[serde(default)]
    pub styles: IndexMap<String, StyleProperties>,
}

impl StylistConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Add a style entry.
    pub fn with_style(mut self, pattern: impl Into<String>, properties: StyleProperties) -> Self {
        self.styles.insert(pattern.into(), properties);
        self
    }

    /// Load a stylesheet file, dispatching on its extension (`.toml` or
    /// `.json`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StylistError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StylistError::StylesheetNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|extension| extension.to_str());

        match extension {
            Some("toml") => toml::from_str(&contents).map_err(|error| {
                StylistError::StylesheetParse {
                    path: path.to_path_buf(),
                    details: error.to_string(),
                }
            }),
            Some("json") => serde_json::from_str(&contents).map_err(|error| {
                StylistError::StylesheetParse {
                    path: path.to_path_buf(),
                    details: error.to_string(),
                }
            }),
            _ => Err(StylistError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Build a configuration from the environment: the stylesheet named by
    /// `STYLIST_STYLESHEET` (if any), with `STYLIST_THEME` overriding the
    /// theme.
    pub fn from_env() -> Result<Self, StylistError> {
        let mut config = match env::var_os(STYLESHEET_ENV_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Ok(theme) = env::var(THEME_ENV_VAR) {
            if !theme.is_empty() {
                config.theme = Some(theme);
            }
        }

        Ok(config)
    }

    /// Like [from_env](Self::from_env), but degrades to the default
    /// configuration (with a logged warning) instead of failing.
    pub fn from_env_or_default() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(error) => {
                log::warn!("falling back to default stylist configuration: {error}");
                Self::default()
            }
        }
    }

    /// Build a ready-to-resolve registry from this configuration.
    pub fn into_stylist(self) -> Stylist<StyleProperties> {
        let theme = self.theme.map(Theme::new);
        let styles = self
            .styles
            .into_iter()
            .map(|(pattern, properties)| {
                Style::new(StylistIdentifier::from(pattern.as_str()), properties)
            })
            .collect();

        let mut stylist = Stylist::new();
        stylist.add_styles(styles);
        stylist.set_theme(theme);
        stylist
    }
}

/// Watches a stylesheet file and hands every successfully reloaded
/// configuration to a callback.
///
/// Dropping the watcher stops watching. Reload failures (the file
/// mid-save, a syntax error) are logged and skipped; the previous
/// configuration simply stays in effect at the call site.
///
/// ```rust,no_run
/// use stylist::config::StylesheetWatcher;
///
/// let watcher = StylesheetWatcher::watch("styles.toml", |config| {
///     let stylist = config.into_stylist();
///     // swap the new registry in, trigger a re-render, ...
/// })?;
/// # Ok::<(), stylist::error::StylistError>(())
/// ```
pub struct StylesheetWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl StylesheetWatcher {
    /// Start watching `path`, invoking `handler` with each reloaded
    /// configuration.
    pub fn watch(
        path: impl AsRef<Path>,
        handler: impl Fn(StylistConfig) + Send + 'static,
    ) -> Result<Self, StylistError> {
        let path = path.as_ref().to_path_buf();
        let reload_path = path.clone();

        let mut watcher =
            notify::recommended_watcher(move |event: Result<notify::Event, notify::Error>| {
                match event {
                    Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                        match StylistConfig::from_file(&reload_path) {
                            Ok(config) => {
                                log::info!("reloaded stylesheet {reload_path:?}");
                                handler(config);
                            }
                            Err(error) => {
                                log::error!("failed to reload stylesheet {reload_path:?}: {error}");
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(error) => log::error!("stylesheet watcher error: {error}"),
                }
            })
            .map_err(|source| StylistError::Watch {
                path: path.clone(),
                source,
            })?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|source| StylistError::Watch {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            _watcher: watcher,
            path,
        })
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for StylesheetWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylesheetWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLESHEET_TOML: &str = r##"
theme = "dark"

[styles."searchBar/label"]
color = "#6b7a8f"
font-size = 14.0
weight = 600
bold = true

[styles."label"]
color = "#202020"
"##;

    fn write_stylesheet(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_toml_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.toml", STYLESHEET_TOML);

        let config = StylistConfig::from_file(&path).unwrap();
        assert_eq!(config.theme.as_deref(), Some("dark"));
        assert_eq!(config.styles.len(), 2);

        let properties = &config.styles["searchBar/label"];
        assert_eq!(properties["color"].as_str(), Some("#6b7a8f"));
        assert_eq!(properties["font-size"].as_float(), Some(14.0));
        assert_eq!(properties["weight"].as_int(), Some(600));
        assert_eq!(properties["bold"].as_bool(), Some(true));
        // Declaration order is preserved.
        let keys: Vec<&String> = properties.keys().collect();
        assert_eq!(keys, ["color", "font-size", "weight", "bold"]);
    }

    #[test]
    fn test_load_json_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(
            &dir,
            "styles.json",
            r##"{ "theme": "dark", "styles": { "label": { "color": "#202020" } } }"##,
        );

        let config = StylistConfig::from_file(&path).unwrap();
        assert_eq!(config.theme.as_deref(), Some("dark"));
        assert_eq!(config.styles["label"]["color"].as_str(), Some("#202020"));
    }

    #[test]
    fn test_missing_stylesheet() {
        let error = StylistConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(error, StylistError::StylesheetNotFound { .. }));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.yaml", "theme: dark");
        let error = StylistConfig::from_file(&path).unwrap_err();
        assert!(matches!(error, StylistError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_malformed_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.toml", "theme = [not toml");
        let error = StylistConfig::from_file(&path).unwrap_err();
        assert!(matches!(error, StylistError::StylesheetParse { .. }));
    }

    #[test]
    fn test_into_stylist_resolves_configured_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.toml", STYLESHEET_TOML);

        let stylist = StylistConfig::from_file(&path).unwrap().into_stylist();
        assert_eq!(stylist.current_theme(), Some(&Theme::new("dark")));
        assert_eq!(stylist.style_count(), 2);

        let style = stylist
            .resolve(&"home/header/searchBar/label".into())
            .expect("configured pattern should match");
        assert_eq!(style.payload()["color"].as_str(), Some("#6b7a8f"));
    }

    #[test]
    fn test_from_env_reads_stylesheet_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.toml", STYLESHEET_TOML);

        env::set_var(STYLESHEET_ENV_VAR, &path);
        env::set_var(THEME_ENV_VAR, "light");
        let config = StylistConfig::from_env().unwrap();
        env::remove_var(STYLESHEET_ENV_VAR);
        env::remove_var(THEME_ENV_VAR);

        // The env theme overrides the stylesheet's own.
        assert_eq!(config.theme.as_deref(), Some("light"));
        assert_eq!(config.styles.len(), 2);
    }

    #[test]
    fn test_builder_round_trips_through_toml() {
        let mut properties = StyleProperties::new();
        properties.insert("color".into(), PropertyValue::String("#ffffff".into()));
        let config = StylistConfig::new()
            .with_theme("light")
            .with_style("button/close", properties);

        let serialized = toml::to_string(&config).unwrap();
        let reparsed: StylistConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_watcher_watches_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stylesheet(&dir, "styles.toml", STYLESHEET_TOML);

        let watcher = StylesheetWatcher::watch(&path, |_config| {}).unwrap();
        assert_eq!(watcher.path(), path.as_path());
    }
}
