//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`PREPMAP_ROADMAP` for the roadmap path)
//! 3. config.kdl (`$PREPMAP_CONFIG_DIR/config.kdl` or `~/.config/prepmap/config.kdl`)
//! 4. Built-in defaults

use crate::config::{OutputFormat, PrepmapConfig};
use crate::diagram::renderer::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::{Error, Result};
use kdl::KdlDocument;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "PREPMAP_CONFIG_DIR";

/// Environment variable naming the roadmap file.
pub const ROADMAP_ENV: &str = "PREPMAP_ROADMAP";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Output format preference
    pub output_format: Resolved<OutputFormat>,
    /// Roadmap file; `None` means the built-in plan
    pub roadmap: Option<Resolved<PathBuf>>,
    /// Export directory; `None` means the current directory
    pub export_dir: Option<Resolved<PathBuf>>,
    pub min_zoom: Resolved<f64>,
    pub max_zoom: Resolved<f64>,
    /// Config file that was consulted, if it exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            roadmap: None,
            export_dir: None,
            min_zoom: Resolved::new(DEFAULT_MIN_ZOOM, ValueSource::Default),
            max_zoom: Resolved::new(DEFAULT_MAX_ZOOM, ValueSource::Default),
            config_path: None,
        }
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn roadmap(&self) -> Option<&Path> {
        self.roadmap.as_ref().map(|r| r.value.as_path())
    }

    /// Export directory, falling back to the current directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(|r| r.value.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom.value, self.max_zoom.value)
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output format override from CLI flag
    pub output_format: Option<OutputFormat>,
    /// Roadmap file from `--roadmap`
    pub roadmap: Option<PathBuf>,
    /// Export directory from `--out`
    pub export_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_roadmap(mut self, path: impl Into<PathBuf>) -> Self {
        self.roadmap = Some(path.into());
        self
    }

    pub fn with_export_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(path.into());
        self
    }
}

/// Directory holding config.kdl.
///
/// Uses `PREPMAP_CONFIG_DIR` when set, otherwise the platform config directory.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|d| d.join("prepmap"))
        .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))
}

/// Load config.kdl from `path`.
///
/// Returns an empty config if the file doesn't exist.
pub fn load_config_file(path: &Path) -> Result<PrepmapConfig> {
    if !path.exists() {
        return Ok(PrepmapConfig::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Other(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Other(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    let config = PrepmapConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Resolve configuration from the default config location.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let path = get_config_dir()?.join(CONFIG_FILE);
    let file_config = load_config_file(&path)?;
    let env_roadmap = std::env::var(ROADMAP_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let mut result = resolve_with(&file_config, env_roadmap, overrides);
    if path.exists() {
        result.config_path = Some(path);
    }
    Ok(result)
}

/// Resolve configuration from already-loaded sources.
///
/// Precedence (highest to lowest):
/// 1. CLI flags (from `overrides`)
/// 2. `env_roadmap` (roadmap only)
/// 3. `file_config`
/// 4. Built-in defaults
pub fn resolve_with(
    file_config: &PrepmapConfig,
    env_roadmap: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    // Resolve output_format
    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = file_config.output_format {
        result.output_format = Resolved::new(format, ValueSource::ConfigFile);
    }
    // else: remains Default (Json)

    // Resolve roadmap
    if let Some(ref path) = overrides.roadmap {
        result.roadmap = Some(Resolved::new(path.clone(), ValueSource::CliFlag));
    } else if let Some(path) = env_roadmap {
        result.roadmap = Some(Resolved::new(
            path,
            ValueSource::EnvVar(ROADMAP_ENV.to_string()),
        ));
    } else if let Some(ref path) = file_config.roadmap {
        result.roadmap = Some(Resolved::new(path.clone(), ValueSource::ConfigFile));
    }
    // else: remains None (built-in roadmap)

    // Resolve export_dir
    if let Some(ref path) = overrides.export_dir {
        result.export_dir = Some(Resolved::new(path.clone(), ValueSource::CliFlag));
    } else if let Some(ref path) = file_config.export_dir {
        result.export_dir = Some(Resolved::new(path.clone(), ValueSource::ConfigFile));
    }

    if let Some(zoom) = file_config.min_zoom {
        result.min_zoom = Resolved::new(zoom, ValueSource::ConfigFile);
    }
    if let Some(zoom) = file_config.max_zoom {
        result.max_zoom = Resolved::new(zoom, ValueSource::ConfigFile);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::CliFlag.to_string(), "cli");
        assert_eq!(ValueSource::ConfigFile.to_string(), "config");
        assert_eq!(ValueSource::Default.to_string(), "default");
        assert_eq!(
            ValueSource::EnvVar(ROADMAP_ENV.to_string()).to_string(),
            "env:PREPMAP_ROADMAP"
        );
    }

    #[test]
    fn test_defaults() {
        let resolved = resolve_with(&PrepmapConfig::new(), None, &ConfigOverrides::new());
        assert_eq!(resolved.output_format(), OutputFormat::Json);
        assert_eq!(resolved.output_format.source, ValueSource::Default);
        assert!(resolved.roadmap().is_none());
        assert_eq!(resolved.export_dir(), PathBuf::from("."));
        assert_eq!(resolved.zoom_range(), (DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM));
    }

    #[test]
    fn test_roadmap_precedence() {
        let file = PrepmapConfig {
            roadmap: Some(PathBuf::from("file.json")),
            ..Default::default()
        };

        let resolved = resolve_with(&file, None, &ConfigOverrides::new());
        assert_eq!(resolved.roadmap(), Some(Path::new("file.json")));
        assert_eq!(resolved.roadmap.unwrap().source, ValueSource::ConfigFile);

        let resolved = resolve_with(&file, Some(PathBuf::from("env.json")), &ConfigOverrides::new());
        assert_eq!(resolved.roadmap(), Some(Path::new("env.json")));

        let overrides = ConfigOverrides::new().with_roadmap("cli.json");
        let resolved = resolve_with(&file, Some(PathBuf::from("env.json")), &overrides);
        assert_eq!(resolved.roadmap(), Some(Path::new("cli.json")));
        assert_eq!(resolved.roadmap.unwrap().source, ValueSource::CliFlag);
    }

    #[test]
    fn test_cli_output_format_beats_file() {
        let file = PrepmapConfig {
            output_format: Some(OutputFormat::Human),
            ..Default::default()
        };
        let resolved = resolve_with(&file, None, &ConfigOverrides::new());
        assert_eq!(resolved.output_format(), OutputFormat::Human);

        let overrides = ConfigOverrides::new().with_output_format(OutputFormat::Json);
        let resolved = resolve_with(&file, None, &overrides);
        assert_eq!(resolved.output_format(), OutputFormat::Json);
        assert_eq!(resolved.output_format.source, ValueSource::CliFlag);
    }

    #[test]
    #[serial]
    fn test_resolve_config_reads_file_and_env() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "output-format \"human\"\nexport-dir \"/tmp/exports\"\nmax-zoom 2.0\n",
        )
        .unwrap();

        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, dir.path());
            std::env::set_var(ROADMAP_ENV, "/tmp/env-roadmap.json");
        }
        let resolved = resolve_config(&ConfigOverrides::new());
        unsafe {
            std::env::remove_var(CONFIG_DIR_ENV);
            std::env::remove_var(ROADMAP_ENV);
        }

        let resolved = resolved.unwrap();
        assert_eq!(resolved.output_format(), OutputFormat::Human);
        assert_eq!(resolved.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(resolved.zoom_range(), (DEFAULT_MIN_ZOOM, 2.0));
        assert_eq!(resolved.roadmap(), Some(Path::new("/tmp/env-roadmap.json")));
        assert_eq!(resolved.config_path, Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    #[serial]
    fn test_resolve_config_rejects_inverted_zoom() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "min-zoom 3.0\nmax-zoom 1.0\n").unwrap();

        // SAFETY: serialized with other env-mutating tests
        unsafe { std::env::set_var(CONFIG_DIR_ENV, dir.path()) };
        let result = resolve_config(&ConfigOverrides::new());
        unsafe { std::env::remove_var(CONFIG_DIR_ENV) };

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = load_config_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, PrepmapConfig::new());
    }
}
