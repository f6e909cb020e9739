//! Host platform conventions and the executable each configuration runs.
//!
//! The per-platform differences (launcher prefix, executable extension, app
//! bundles, interpreter wrapping) live in one table of
//! [`PlatformConventions`]; [`PlatformCommandResolver::resolve`] combines a
//! row of that table with the target type to produce a [`CommandSpec`].

use crate::model::{Configuration, TargetType};
use miette::Diagnostic;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PlatformError {
    #[error("unsupported host platform: {name}")]
    #[diagnostic(
        code(codelite_gen::platform::unsupported),
        help("Supported host platforms are: ['Linux', 'Mac', 'Win64', 'Win32']")
    )]
    Unsupported { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Linux,
    Mac,
    Win64,
    Win32,
}
impl HostPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Mac => "Mac",
            Self::Win64 => "Win64",
            Self::Win32 => "Win32",
        }
    }

    /// The platform this process runs on.
    pub fn current() -> Result<Self, PlatformError> {
        match std::env::consts::OS {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Mac),
            "windows" if cfg!(target_pointer_width = "64") => Ok(Self::Win64),
            "windows" => Ok(Self::Win32),
            other => Err(PlatformError::Unsupported {
                name: other.to_string(),
            }),
        }
    }

    pub fn conventions(&self) -> &'static PlatformConventions {
        match self {
            Self::Linux => &LINUX,
            Self::Mac => &MAC,
            Self::Win64 | Self::Win32 => &WINDOWS,
        }
    }

    /// `<root>/Binaries/<platform>`
    pub fn binaries_dir(&self, root: &Path) -> PathBuf {
        root.join("Binaries").join(self.as_str())
    }
}
impl FromStr for HostPlatform {
    type Err = PlatformError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "mac" | "macos" => Ok(Self::Mac),
            "win64" => Ok(Self::Win64),
            "win32" => Ok(Self::Win32),
            _ => Err(PlatformError::Unsupported {
                name: value.to_string(),
            }),
        }
    }
}
impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How executables are named and launched on one family of host platforms.
#[derive(Debug)]
pub struct PlatformConventions {
    pub launcher_prefix: &'static str,
    pub executable_extension: &'static str,
    /// Game, Program and Editor binaries live inside `<name>.app` bundles.
    pub app_bundles: bool,
    /// The editor binary carries the configuration suffix too.
    pub suffix_editor: bool,
    /// Wrapper needed to run the .NET build tools.
    pub interpreter: Option<&'static str>,
}

static LINUX: PlatformConventions = PlatformConventions {
    launcher_prefix: "./",
    executable_extension: "",
    app_bundles: false,
    suffix_editor: false,
    interpreter: Some("mono"),
};

static MAC: PlatformConventions = PlatformConventions {
    launcher_prefix: "./",
    executable_extension: "",
    app_bundles: true,
    suffix_editor: true,
    interpreter: Some("mono"),
};

static WINDOWS: PlatformConventions = PlatformConventions {
    launcher_prefix: "",
    executable_extension: ".exe",
    app_bundles: false,
    suffix_editor: false,
    interpreter: None,
};

/// What the IDE runs for one target in one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub invocation: String,
    pub working_directory: PathBuf,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlatformCommandResolver<'a> {
    host: HostPlatform,
    engine_root: &'a Path,
    project_file: Option<&'a Path>,
    product_token: &'a str,
}
impl<'a> PlatformCommandResolver<'a> {
    pub fn new(
        host: HostPlatform,
        engine_root: &'a Path,
        project_file: Option<&'a Path>,
        product_token: &'a str,
    ) -> Self {
        Self {
            host,
            engine_root,
            project_file,
            product_token,
        }
    }

    /// Name of the engine's own editor binary, e.g. `UE4Editor`.
    pub fn editor_name(&self) -> String {
        format!("{}Editor", self.product_token)
    }

    /// Name of the engine's own game target, e.g. `UE4Game`.
    pub fn engine_game_name(&self) -> String {
        format!("{}Game", self.product_token)
    }

    pub fn resolve(
        &self,
        target_type: TargetType,
        configuration: &Configuration,
        project_name: &str,
    ) -> CommandSpec {
        CommandSpec {
            invocation: self.invocation(target_type, configuration, project_name),
            working_directory: self.working_directory(target_type, project_name),
            arguments: self.arguments(target_type, configuration, project_name),
        }
    }

    fn invocation(
        &self,
        target_type: TargetType,
        configuration: &Configuration,
        project_name: &str,
    ) -> String {
        let conventions = self.host.conventions();

        let suffix = if configuration.is_default() {
            String::new()
        } else {
            format!("-{}-{}", self.host, configuration)
        };

        let (binary, bundled) = match target_type {
            TargetType::Game | TargetType::Program => {
                (format!("{project_name}{suffix}"), conventions.app_bundles)
            }
            TargetType::Editor => {
                let editor = self.editor_name();
                let binary = if conventions.suffix_editor {
                    format!("{editor}{suffix}")
                } else {
                    editor
                };
                (binary, conventions.app_bundles)
            }
            TargetType::Client | TargetType::Server => (project_name.to_string(), false),
        };

        let path = if bundled {
            format!("{binary}.app/Contents/MacOS/{binary}")
        } else {
            binary
        };

        format!(
            "{}{}{}",
            conventions.launcher_prefix, path, conventions.executable_extension
        )
    }

    fn working_directory(&self, target_type: TargetType, project_name: &str) -> PathBuf {
        let engine_binaries = self.host.binaries_dir(self.engine_root);

        if target_type != TargetType::Game || project_name == self.engine_game_name() {
            return engine_binaries;
        }

        match self.project_file.and_then(|file| file.parent()) {
            Some(product_root) => self.host.binaries_dir(product_root),
            None => engine_binaries,
        }
    }

    fn arguments(
        &self,
        target_type: TargetType,
        configuration: &Configuration,
        project_name: &str,
    ) -> Option<String> {
        match target_type {
            TargetType::Game if configuration.is_debug() => Some("-debug".to_string()),
            TargetType::Editor if project_name != self.editor_name() => self
                .project_file
                .map(|file| format!("\"{}\" -game", file.display())),
            _ => None,
        }
    }
}
