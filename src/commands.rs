use crate::{
    model::{Configuration, TargetType},
    platform::HostPlatform,
};
use std::path::{Path, PathBuf};

/// The IDE runs each line of the rebuild command in turn.
pub const REBUILD_SEPARATOR: &str = "\n";

const AUTOMATION_TOOL: &str = "AutomationTool.exe";

/// No source control, and leave spawned processes running.
const SESSION_FLAGS: &[&str] = &["-noP4", "-nokill"];

const DEPLOYMENT_FLAGS: &[&str] = &["-nocompile", "-compressed", "-stage", "-deploy"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCommand {
    pub name: String,
    pub command: String,
}

/// Custom build commands of one target in one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommands {
    pub working_directory: PathBuf,
    pub build: String,
    pub clean: String,
    pub rebuild: String,
    pub auxiliary: Vec<NamedCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookMode {
    Cook,
    CookOnTheFly,
    SkipCook,
}
impl CookMode {
    pub const ALL: [CookMode; 3] = [Self::Cook, Self::CookOnTheFly, Self::SkipCook];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cook => "Cook Game",
            Self::CookOnTheFly => "Cook Game on the fly",
            Self::SkipCook => "Skip Cook Game",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Self::Cook => "-cook",
            Self::CookOnTheFly => "-cookonthefly",
            Self::SkipCook => "-skipcook",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildCommandSynthesizer<'a> {
    host: HostPlatform,
    build_tool: &'a Path,
    project_file: Option<&'a Path>,
}
impl<'a> BuildCommandSynthesizer<'a> {
    pub fn new(host: HostPlatform, build_tool: &'a Path, project_file: Option<&'a Path>) -> Self {
        Self {
            host,
            build_tool,
            project_file,
        }
    }

    pub fn synthesize(
        &self,
        target_name: &str,
        target_type: TargetType,
        configuration: &Configuration,
    ) -> BuildCommands {
        let build = self.build_command(target_name, configuration);
        let clean = format!("{build} -clean");
        let rebuild = format!("{clean}{REBUILD_SEPARATOR}{build}");

        let auxiliary = match target_type {
            TargetType::Game => CookMode::ALL
                .iter()
                .map(|mode| NamedCommand {
                    name: mode.label().to_string(),
                    command: self.cook_command(configuration, *mode),
                })
                .collect(),
            _ => Vec::new(),
        };

        BuildCommands {
            working_directory: self
                .build_tool
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            build,
            clean,
            rebuild,
            auxiliary,
        }
    }

    /// `[mono ]<tool> <target> <platform> <configuration>[ -project="<file>"]`
    fn build_command(&self, target_name: &str, configuration: &Configuration) -> String {
        let tool = self
            .build_tool
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.build_tool.display().to_string());

        let mut command = self.wrap(format!(
            "{tool} {target_name} {} {configuration}",
            self.host
        ));

        if let Some(project_file) = self.project_file {
            command.push_str(&format!(" -project=\"{}\"", project_file.display()));
        }

        command
    }

    fn cook_command(&self, configuration: &Configuration, mode: CookMode) -> String {
        let mut args = vec![format!("{AUTOMATION_TOOL} BuildCookRun")];

        if let Some(project_file) = self.project_file {
            args.push(format!("-project=\"{}\"", project_file.display()));
        }

        args.extend(SESSION_FLAGS.iter().map(|flag| flag.to_string()));
        args.push(format!("-clientconfig={configuration}"));
        args.push(format!("-serverconfig={configuration}"));
        args.push(format!("-platform={}", self.host));
        args.push(format!("-targetplatform={}", self.host));
        args.extend(DEPLOYMENT_FLAGS.iter().map(|flag| flag.to_string()));
        args.push(mode.flag().to_string());

        self.wrap(args.join(" "))
    }

    /// Prefixes the interpreter on hosts that cannot run .NET tools natively.
    fn wrap(&self, command: String) -> String {
        match self.host.conventions().interpreter {
            Some(interpreter) => format!("{interpreter} {command}"),
            None => command,
        }
    }
}
