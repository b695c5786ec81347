//! `craby.toml`: project name, spec source directory, Android package and build families.

use std::path::PathBuf;

use craby_core::{PlatformFamily, ProjectLayout};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no craby.toml found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid craby.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid craby.toml: `{key}` {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    project: RawProject,
    android: Option<RawAndroid>,
    build: Option<RawBuild>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,
    source_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawAndroid {
    package_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBuild {
    families: Option<Vec<String>>,
}

/// Validated project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    /// Relative to the project root.
    pub source_dir: PathBuf,
    pub android_package: String,
    pub families: Vec<PlatformFamily>,
}

impl ProjectConfig {
    pub fn load(layout: &ProjectLayout) -> Result<Self, ConfigError> {
        let path = layout.config_file();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path));
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        log::debug!("loaded {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let name = raw.project.name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("project.name", "must not be empty"));
        }

        let android_package = raw
            .android
            .and_then(|a| a.package_name)
            .ok_or_else(|| invalid("android.package_name", "is required"))?;
        if !is_java_package(&android_package) {
            return Err(invalid(
                "android.package_name",
                format!("`{android_package}` is not a dotted Java package name"),
            ));
        }

        let families = match raw.build.and_then(|b| b.families) {
            None => PlatformFamily::ALL.to_vec(),
            Some(names) if names.is_empty() => {
                return Err(invalid("build.families", "must name at least one family"));
            }
            Some(names) => names
                .iter()
                .map(|n| n.parse::<PlatformFamily>())
                .collect::<Result<_, _>>()
                .map_err(|e| invalid("build.families", e.to_string()))?,
        };

        Ok(Self {
            name,
            source_dir: raw.project.source_dir.unwrap_or_else(|| PathBuf::from("src")),
            android_package,
            families,
        })
    }

    pub fn source_dir(&self, layout: &ProjectLayout) -> PathBuf {
        layout.root().join(&self.source_dir)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

fn is_java_package(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
