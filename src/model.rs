use serde::Deserialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// The configuration whose binaries carry no `-<platform>-<config>` suffix.
pub const DEFAULT_CONFIGURATION: &str = "Development";

/// A source file handed to the generator by whoever resolved the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
}
impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[serde(alias = "Game")]
    Game,
    #[serde(alias = "Editor")]
    Editor,
    #[serde(alias = "Client")]
    Client,
    #[serde(alias = "Server")]
    Server,
    #[serde(alias = "Program")]
    Program,
}
impl TargetType {
    fn as_str(&self) -> &str {
        match self {
            Self::Game => "Game",
            Self::Editor => "Editor",
            Self::Client => "Client",
            Self::Server => "Server",
            Self::Program => "Program",
        }
    }

    /// Game and Program binaries are named after the target and carry the
    /// platform/configuration suffix.
    pub fn is_standalone(&self) -> bool {
        matches!(self, Self::Game | Self::Program)
    }
}
impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named buildable unit together with the files that belong to it.
#[derive(Debug, Clone)]
pub struct ProjectTarget {
    pub name: String,
    pub target_type: TargetType,
    pub sources: Vec<SourceFile>,
}
impl ProjectTarget {
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            name: name.into(),
            target_type,
            sources: Vec::new(),
        }
    }

    pub fn with_sources<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.sources.extend(paths.into_iter().map(SourceFile::new));
        self
    }
}

/// A build-variant label such as `Debug`, `Development` or `Shipping`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Configuration(String);
impl Configuration {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_CONFIGURATION
    }

    /// Matches `Debug` as well as `DebugGame`.
    pub fn is_debug(&self) -> bool {
        self.0.contains("Debug")
    }
}
impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<&str> for Configuration {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

pub fn default_configurations() -> Vec<Configuration> {
    ["Debug", "DebugGame", "Development", "Shipping", "Test"]
        .into_iter()
        .map(Configuration::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_is_the_default_configuration() {
        assert!(Configuration::from("Development").is_default());
        assert!(!Configuration::from("Debug").is_default());
        assert!(!Configuration::from("development").is_default());
    }

    #[test]
    fn test_debug_detection_covers_debug_game() {
        assert!(Configuration::from("Debug").is_debug());
        assert!(Configuration::from("DebugGame").is_debug());
        assert!(!Configuration::from("Shipping").is_debug());
    }

    #[test]
    fn test_source_file_extension() {
        assert_eq!(SourceFile::new("/a/b/Foo.cpp").extension(), Some("cpp"));
        assert_eq!(SourceFile::new("/a/b/Makefile").extension(), None);
    }

    #[test]
    fn test_target_type_accepts_both_spellings() {
        #[derive(Deserialize)]
        struct Holder {
            kind: TargetType,
        }

        let lower: Holder = toml::from_str(r#"kind = "editor""#).unwrap();
        let upper: Holder = toml::from_str(r#"kind = "Program""#).unwrap();

        assert_eq!(lower.kind, TargetType::Editor);
        assert_eq!(upper.kind, TargetType::Program);
    }
}
