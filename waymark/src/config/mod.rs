//! Configuration file handling.
//!
//! Settings live in an INI file under the platform config directory
//! (`~/.config/waymark/config.ini` on Linux). [`ConfigFile`] is the typed
//! view of that file; [`ConfigKey`] enumerates the settable keys for the
//! `config get`/`config set` command surface. CLI arguments override config
//! file values when specified.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::coord::DEFAULT_SPAN_DEG;
use crate::location::DEFAULT_FEED_BIND;

/// Errors from loading, saving, or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

/// `[location]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSection {
    /// Backend name, `udp` or `demo`.
    pub backend: String,
    /// Whether location updates are enabled at all.
    pub enabled: bool,
    /// Bind address for the UDP feed backend.
    pub udp_bind: String,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            backend: "udp".to_string(),
            enabled: true,
            udp_bind: DEFAULT_FEED_BIND.to_string(),
        }
    }
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSection {
    /// Span of the displayed region in degrees.
    pub span_deg: f64,
    /// Whether region changes animate.
    pub animate: bool,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            span_deg: DEFAULT_SPAN_DEG,
            animate: true,
        }
    }
}

/// `[route]` section, used by the demo backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteSection {
    /// Route file to replay. Unset means the built-in walk.
    pub file: Option<PathBuf>,
    /// Delay between waypoints in milliseconds.
    pub interval_ms: u64,
    /// Whether the route loops.
    pub loop_route: bool,
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSection {
    /// Default log level when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Typed view of the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub location: LocationSection,
    pub map: MapSection,
    pub route: RouteSection,
    pub log: LogSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            location: LocationSection::default(),
            map: MapSection::default(),
            route: RouteSection {
                file: None,
                interval_ms: 1000,
                loop_route: true,
            },
            log: LogSection::default(),
        }
    }
}

impl ConfigFile {
    /// Load from the default path.
    ///
    /// Returns an error when the file is missing or unreadable; callers that
    /// want defaults in that case use `load().unwrap_or_default()`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("location")) {
            if let Some(value) = section.get("backend") {
                config.location.backend = value.to_string();
            }
            if let Some(value) = section.get("enabled") {
                config.location.enabled = parse_bool("location.enabled", value)?;
            }
            if let Some(value) = section.get("udp_bind") {
                config.location.udp_bind = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("map")) {
            if let Some(value) = section.get("span_deg") {
                config.map.span_deg = parse_span("map.span_deg", value)?;
            }
            if let Some(value) = section.get("animate") {
                config.map.animate = parse_bool("map.animate", value)?;
            }
        }

        if let Some(section) = ini.section(Some("route")) {
            if let Some(value) = section.get("file") {
                if !value.is_empty() {
                    config.route.file = Some(PathBuf::from(value));
                }
            }
            if let Some(value) = section.get("interval_ms") {
                config.route.interval_ms = parse_u64("route.interval_ms", value)?;
            }
            if let Some(value) = section.get("loop") {
                config.route.loop_route = parse_bool("route.loop", value)?;
            }
        }

        if let Some(section) = ini.section(Some("log")) {
            if let Some(value) = section.get("level") {
                config.log.level = value.to_string();
            }
        }

        Ok(config)
    }

    /// Save to the default path, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("location"))
            .set("backend", self.location.backend.clone())
            .set("enabled", self.location.enabled.to_string())
            .set("udp_bind", self.location.udp_bind.clone());
        ini.with_section(Some("map"))
            .set("span_deg", self.map.span_deg.to_string())
            .set("animate", self.map.animate.to_string());
        {
            let mut section = ini.with_section(Some("route"));
            section
                .set("interval_ms", self.route.interval_ms.to_string())
                .set("loop", self.route.loop_route.to_string());
            if let Some(file) = &self.route.file {
                section.set("file", file.display().to_string());
            }
        }
        ini.with_section(Some("log"))
            .set("level", self.log.level.clone());

        ini.write_to_file(path)?;
        Ok(())
    }
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waymark")
        .join("config.ini")
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "true or false".to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "a whole number".to_string(),
    })
}

fn parse_span(key: &str, value: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "a positive number of degrees".to_string(),
    };
    let span: f64 = value.parse().map_err(|_| invalid())?;
    if !span.is_finite() || span <= 0.0 {
        return Err(invalid());
    }
    Ok(span)
}

/// All settable configuration keys, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    LocationBackend,
    LocationEnabled,
    LocationUdpBind,
    MapSpanDeg,
    MapAnimate,
    RouteFile,
    RouteIntervalMs,
    RouteLoop,
    LogLevel,
}

impl ConfigKey {
    /// All keys in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::LocationBackend,
            ConfigKey::LocationEnabled,
            ConfigKey::LocationUdpBind,
            ConfigKey::MapSpanDeg,
            ConfigKey::MapAnimate,
            ConfigKey::RouteFile,
            ConfigKey::RouteIntervalMs,
            ConfigKey::RouteLoop,
            ConfigKey::LogLevel,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LocationBackend => "location.backend",
            ConfigKey::LocationEnabled => "location.enabled",
            ConfigKey::LocationUdpBind => "location.udp_bind",
            ConfigKey::MapSpanDeg => "map.span_deg",
            ConfigKey::MapAnimate => "map.animate",
            ConfigKey::RouteFile => "route.file",
            ConfigKey::RouteIntervalMs => "route.interval_ms",
            ConfigKey::RouteLoop => "route.loop",
            ConfigKey::LogLevel => "log.level",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or_default()
    }

    /// Key part of the name.
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or_default()
    }

    /// Render the current value as a string. Unset values render empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::LocationBackend => config.location.backend.clone(),
            ConfigKey::LocationEnabled => config.location.enabled.to_string(),
            ConfigKey::LocationUdpBind => config.location.udp_bind.clone(),
            ConfigKey::MapSpanDeg => config.map.span_deg.to_string(),
            ConfigKey::MapAnimate => config.map.animate.to_string(),
            ConfigKey::RouteFile => config
                .route
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::RouteIntervalMs => config.route.interval_ms.to_string(),
            ConfigKey::RouteLoop => config.route.loop_route.to_string(),
            ConfigKey::LogLevel => config.log.level.clone(),
        }
    }

    /// Parse and apply a value. An empty value clears `route.file`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        match self {
            ConfigKey::LocationBackend => config.location.backend = value.to_string(),
            ConfigKey::LocationEnabled => {
                config.location.enabled = parse_bool(self.name(), value)?;
            }
            ConfigKey::LocationUdpBind => config.location.udp_bind = value.to_string(),
            ConfigKey::MapSpanDeg => config.map.span_deg = parse_span(self.name(), value)?,
            ConfigKey::MapAnimate => config.map.animate = parse_bool(self.name(), value)?,
            ConfigKey::RouteFile => {
                config.route.file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            ConfigKey::RouteIntervalMs => {
                config.route.interval_ms = parse_u64(self.name(), value)?;
            }
            ConfigKey::RouteLoop => config.route.loop_route = parse_bool(self.name(), value)?,
            ConfigKey::LogLevel => config.log.level = value.to_string(),
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .find(|key| key.name() == s)
            .copied()
            .ok_or_else(|| ConfigError::Parse(format!("unknown configuration key '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();

        assert_eq!(config.location.backend, "udp");
        assert!(config.location.enabled);
        assert_eq!(config.location.udp_bind, DEFAULT_FEED_BIND);
        assert_eq!(config.map.span_deg, DEFAULT_SPAN_DEG);
        assert!(config.map.animate);
        assert_eq!(config.route.file, None);
        assert_eq!(config.route.interval_ms, 1000);
        assert!(config.route.loop_route);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.location.backend = "demo".to_string();
        config.map.span_deg = 0.05;
        config.map.animate = false;
        config.route.file = Some(PathBuf::from("/tmp/route.json"));
        config.route.interval_ms = 250;
        config.log.level = "debug".to_string();

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");

        assert!(ConfigFile::load_from(&path).is_err());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[map]\nspan_deg = 0.2\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();

        assert_eq!(config.map.span_deg, 0.2);
        assert!(config.map.animate);
        assert_eq!(config.location.backend, "udp");
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[map]\nspan_deg = wide\n").unwrap();

        assert!(matches!(
            ConfigFile::load_from(&path).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_key_parse_and_name_round_trip() {
        for key in ConfigKey::all() {
            let parsed: ConfigKey = key.name().parse().unwrap();
            assert_eq!(parsed, *key);
            assert_eq!(format!("{}.{}", key.section(), key.key_name()), key.name());
        }
    }

    #[test]
    fn test_unknown_key_fails_to_parse() {
        assert!("cache.size".parse::<ConfigKey>().is_err());
        assert!("loop".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_key_set_validates_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::MapAnimate.set(&mut config, "yes").is_err());
        assert!(ConfigKey::MapSpanDeg.set(&mut config, "-1").is_err());
        assert!(ConfigKey::MapSpanDeg.set(&mut config, "0").is_err());
        assert!(ConfigKey::RouteIntervalMs.set(&mut config, "soon").is_err());

        ConfigKey::MapSpanDeg.set(&mut config, "0.02").unwrap();
        assert_eq!(config.map.span_deg, 0.02);
    }

    #[test]
    fn test_empty_value_clears_route_file() {
        let mut config = ConfigFile::default();

        ConfigKey::RouteFile.set(&mut config, "/tmp/route.json").unwrap();
        assert!(config.route.file.is_some());
        assert_eq!(ConfigKey::RouteFile.get(&config), "/tmp/route.json");

        ConfigKey::RouteFile.set(&mut config, "").unwrap();
        assert_eq!(config.route.file, None);
        assert_eq!(ConfigKey::RouteFile.get(&config), "");
    }
}
