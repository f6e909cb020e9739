use crate::{
    errors::{FileFormat, FileOperation, IoError, ParseError},
    model::{default_configurations, Configuration, TargetType},
    platform::{HostPlatform, PlatformError},
    utils::resolve_against,
};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_PRODUCT_TOKEN: &str = "UE4";
const DEFAULT_EXTENSION: &str = "project";
const DEFAULT_BUILD_TOOL: &str = "Binaries/DotNET/UnrealBuildTool.exe";
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["h", "cpp", "cs", "uproject", "ini", "usf"];

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(codelite_gen::config::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// One `[[target]]` table of the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Files listed one by one.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Directories walked recursively for files.
    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,
}

/// The generator manifest, usually `codelite.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub engine_root: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub host_platform: Option<String>,
    /// Product descriptor (`.uproject`) of the game being generated for.
    #[serde(default)]
    pub project_file: Option<PathBuf>,
    #[serde(default)]
    pub build_tool: Option<PathBuf>,
    #[serde(default)]
    pub product_token: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub configurations: Option<Vec<Configuration>>,
    #[serde(default)]
    pub allowed_extensions: Option<Vec<String>>,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}
impl Manifest {
    /// Reads a manifest and resolves its relative paths against the
    /// directory that contains it, so every path it yields is absolute.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let manifest: Manifest = toml::from_str(&content)
            .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()
                .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?
                .join(path)
        };
        let base_dir = absolute.parent().unwrap_or_else(|| Path::new("/"));

        log::debug!("loaded manifest {} ({} targets)", path.display(), manifest.targets.len());

        Ok(manifest.resolve_paths(base_dir))
    }

    fn resolve_paths(mut self, base_dir: &Path) -> Self {
        let resolve = |path: &Path| resolve_against(base_dir, path);

        self.engine_root = resolve(&self.engine_root);
        self.output_dir = resolve(&self.output_dir);
        self.project_file = self.project_file.as_deref().map(resolve);
        self.build_tool = self.build_tool.as_deref().map(resolve);

        for target in &mut self.targets {
            target.files = target.files.iter().map(|file| resolve(file)).collect();
            target.source_dirs = target.source_dirs.iter().map(|dir| resolve(dir)).collect();
        }

        self
    }

    /// Applies command-line overrides on top of the manifest.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(platform) = &overrides.host_platform {
            self.host_platform = Some(platform.clone());
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = output_dir.clone();
        }
        if !overrides.configurations.is_empty() {
            self.configurations = Some(overrides.configurations.clone());
        }
    }

    /// Resolves defaults and the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when the configured (or the
    /// running) host platform is not one descriptors can be generated for.
    pub fn settings(&self) -> Result<GeneratorSettings, PlatformError> {
        let host = match &self.host_platform {
            Some(name) => name.parse::<HostPlatform>()?,
            None => HostPlatform::current()?,
        };

        let mut settings =
            GeneratorSettings::new(self.engine_root.clone(), self.output_dir.clone(), host);

        settings.project_file = self.project_file.clone();
        if let Some(build_tool) = &self.build_tool {
            settings.build_tool = build_tool.clone();
        }
        if let Some(product_token) = &self.product_token {
            settings.product_token = product_token.clone();
        }
        if let Some(extension) = &self.extension {
            settings.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(configurations) = &self.configurations {
            settings.configurations = configurations.clone();
        }
        if let Some(allowed_extensions) = self.allowed_extensions() {
            settings.allowed_extensions = allowed_extensions;
        }

        Ok(settings)
    }

    /// The configured extension allow-list, without leading dots.
    pub fn allowed_extensions(&self) -> Option<Vec<String>> {
        self.allowed_extensions.as_ref().map(|extensions| {
            extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect()
        })
    }
}

/// Values given on the command line that win over the manifest.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host_platform: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub configurations: Vec<Configuration>,
}

/// Read-only inputs shared by every target of a run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub engine_root: PathBuf,
    pub output_dir: PathBuf,
    pub host: HostPlatform,
    pub project_file: Option<PathBuf>,
    pub build_tool: PathBuf,
    pub product_token: String,
    /// Descriptor file extension, without the dot.
    pub extension: String,
    pub configurations: Vec<Configuration>,
    /// Source extensions shown in the IDE, without the dot.
    pub allowed_extensions: Vec<String>,
}
impl GeneratorSettings {
    pub fn new(
        engine_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        host: HostPlatform,
    ) -> Self {
        let engine_root = engine_root.into();
        let build_tool = engine_root.join(DEFAULT_BUILD_TOOL);

        Self {
            engine_root,
            output_dir: output_dir.into(),
            host,
            project_file: None,
            build_tool,
            product_token: DEFAULT_PRODUCT_TOKEN.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            configurations: default_configurations(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn with_project_file(mut self, project_file: impl Into<PathBuf>) -> Self {
        self.project_file = Some(project_file.into());
        self
    }

    pub fn with_configurations(mut self, configurations: &[&str]) -> Self {
        self.configurations = configurations
            .iter()
            .map(|label| Configuration::from(*label))
            .collect();
        self
    }
}
