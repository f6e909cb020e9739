use crate::{
    commands::BuildCommandSynthesizer,
    config::GeneratorSettings,
    descriptor::{ConfigurationBlock, ProjectDescriptor},
    errors::{FileOperation, IoError},
    model::ProjectTarget,
    platform::PlatformCommandResolver,
    preview::preview_as_tree,
    prompt::{apply_changes, PromptError},
    relativize::{PathRelativizer, PathResolutionError},
    source,
    transactions::{Active, RollbackOperation, Transaction},
    vfs::{build_folder_tree, VirtualEntry, VirtualFS},
};
use colored::Colorize;
use indexmap::IndexSet;
use miette::Diagnostic;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("I/O error within generator domain")]
    #[diagnostic(code(codelite_gen::generator::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PathResolution(#[from] PathResolutionError),

    #[error("target name '{name}' cannot be used as a file name")]
    #[diagnostic(
        code(codelite_gen::generator::invalid_target_name),
        help("Target names must be non-empty and must not contain path separators")
    )]
    InvalidTargetName { name: String },

    #[error("target '{name}' is listed more than once")]
    #[diagnostic(
        code(codelite_gen::generator::duplicate_target),
        help("Each target writes '{name}.<extension>'; remove or rename the duplicate")
    )]
    DuplicateTarget { name: String },

    #[error("Error occurred trying to prompt user")]
    #[diagnostic(code(codelite_gen::generator::prompt))]
    Prompt(#[from] PromptError),
}

/// How planned descriptors reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write without asking.
    #[default]
    Write,
    /// Print the preview and write nothing.
    DryRun,
    /// Print the preview and ask before writing.
    Confirm,
}

/// Assembles the descriptor of one target: its folder tree and one
/// configuration block per requested configuration.
pub fn describe_target(
    target: &ProjectTarget,
    settings: &GeneratorSettings,
) -> Result<ProjectDescriptor, GeneratorError> {
    let sources = source::select(&target.sources, &settings.allowed_extensions);

    let relativizer = PathRelativizer::new(target, &settings.engine_root, &settings.product_token);
    let root = build_folder_tree(&sources, &relativizer)?;

    log::debug!(
        "{}: {} files in {} folders ({:?})",
        target.name,
        root.leaf_count(),
        root.folder_count(),
        relativizer.strategy()
    );

    let resolver = PlatformCommandResolver::new(
        settings.host,
        &settings.engine_root,
        settings.project_file.as_deref(),
        &settings.product_token,
    );
    let synthesizer = BuildCommandSynthesizer::new(
        settings.host,
        &settings.build_tool,
        settings.project_file.as_deref(),
    );

    let configurations = settings
        .configurations
        .iter()
        .map(|configuration| ConfigurationBlock {
            configuration: configuration.clone(),
            general: resolver.resolve(target.target_type, configuration, &target.name),
            custom_build: synthesizer.synthesize(&target.name, target.target_type, configuration),
        })
        .collect();

    Ok(ProjectDescriptor {
        name: target.name.clone(),
        root,
        configurations,
    })
}

/// Renders every descriptor of the run in memory.
///
/// Nothing touches the disk here; the first target that fails aborts the
/// whole plan.
pub fn plan(
    targets: &[ProjectTarget],
    settings: &GeneratorSettings,
) -> Result<VirtualFS, GeneratorError> {
    let mut vfs = VirtualFS::new();
    let mut destinations: IndexSet<PathBuf> = IndexSet::new();

    for target in targets {
        let destination = destination_for(target, settings)?;

        if !destinations.insert(destination.clone()) {
            return Err(GeneratorError::DuplicateTarget {
                name: target.name.clone(),
            });
        }

        let descriptor = describe_target(target, settings)?;

        vfs.entries.push(VirtualEntry {
            target: target.name.clone(),
            destination,
            content: descriptor.to_xml(),
            folders: descriptor.root,
        });
    }

    Ok(vfs)
}

/// `<output dir>/<target name>.<extension>`
fn destination_for(
    target: &ProjectTarget,
    settings: &GeneratorSettings,
) -> Result<PathBuf, GeneratorError> {
    let name = target.name.as_str();

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(GeneratorError::InvalidTargetName {
            name: name.to_string(),
        });
    }

    let file_name = if settings.extension.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{}", settings.extension)
    };

    Ok(settings.output_dir.join(file_name))
}

/// Plans, optionally previews, and writes one descriptor per target.
///
/// Returns `true` when descriptors were written and `false` when there was
/// nothing to write, the run was a dry run, or the user declined.
///
/// # Errors
///
/// Fails on the first target whose files cannot be placed in the folder tree
/// (before anything is written), or on the first write that fails, in which
/// case every change made by the run is rolled back.
pub fn try_generate(
    targets: &[ProjectTarget],
    settings: &GeneratorSettings,
    mode: WriteMode,
) -> Result<bool, GeneratorError> {
    if targets.is_empty() {
        log::warn!("no targets to generate project files for");
        return Ok(false);
    }

    let vfs = plan(targets, settings)?;

    match mode {
        WriteMode::Write => {}
        WriteMode::DryRun => {
            preview_as_tree(&vfs);
            return Ok(false);
        }
        WriteMode::Confirm => {
            preview_as_tree(&vfs);

            if !apply_changes()? {
                log::info!("canceled, nothing was written");
                return Ok(false);
            }
        }
    }

    let mut trx = Transaction::<Active>::new();

    apply_vfs(&vfs, &mut trx)?;

    log::debug!("committing {} changes", trx.pending());
    trx.commit();

    log::info!(
        "generated {} project files in {}",
        vfs.entries.len(),
        settings.output_dir.display()
    );

    Ok(true)
}

/// Writes every planned descriptor, creating directories as needed.
fn apply_vfs(vfs: &VirtualFS, trx: &mut Transaction<Active>) -> Result<(), GeneratorError> {
    for entry in &vfs.entries {
        log::debug!("writing {} for target {}", entry.destination.display(), entry.target);

        if let Some(parent) = entry.destination.parent() {
            create_directory(trx, parent)?;
        }

        write_file(trx, &entry.destination, &entry.content)?;
    }

    Ok(())
}

/// Creates `path` and its missing parents.
///
/// Only the topmost directory that did not exist before is registered as a
/// [`RollbackOperation::RemoveDir`], so a rollback never removes directories
/// the run did not create.
fn create_directory(trx: &mut Transaction<Active>, path: &Path) -> Result<(), GeneratorError> {
    let topmost_missing = path
        .ancestors()
        .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.exists())
        .last()
        .map(Path::to_path_buf);

    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))?;

    if let Some(created) = topmost_missing {
        log::debug!("created directory {}", created.display());
        trx.add_operation(RollbackOperation::RemoveDir(created));
    }

    Ok(())
}

/// Replaces `path` with `contents` through a temporary file in the same
/// directory, so the destination is either the old or the new descriptor.
///
/// An overwritten file keeps its permissions; a new one is readable by
/// everyone, as with the usual umask. New files register a
/// [`RollbackOperation::RemoveFile`]; overwritten ones
/// register a [`RollbackOperation::RestoreFile`] with their previous bytes.
fn write_file(
    trx: &mut Transaction<Active>,
    path: &Path,
    contents: &str,
) -> Result<(), GeneratorError> {
    let previous = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(error) if error.kind() == io::ErrorKind::NotFound => None,
        Err(error) => Err(IoError::new(FileOperation::Read, path.to_path_buf(), error))?,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = match &previous {
        Some(_) => Some(
            fs::metadata(path)
                .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?
                .permissions(),
        ),
        None => default_permissions(),
    };

    let mut temp = NamedTempFile::new_in(directory)
        .map_err(|error| IoError::new(FileOperation::Write, directory.to_path_buf(), error))?;

    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;
    }

    temp.write_all(contents.as_bytes())
        .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;

    temp.persist(path)
        .map_err(|error| IoError::new(FileOperation::Persist, path.to_path_buf(), error.error))?;

    let (verb, operation) = match previous {
        Some(bytes) => (
            "update".yellow(),
            RollbackOperation::RestoreFile(path.to_path_buf(), bytes),
        ),
        None => (
            "create".green(),
            RollbackOperation::RemoveFile(path.to_path_buf()),
        ),
    };

    println!("{} {}", verb, path.display());

    trx.add_operation(operation);

    Ok(())
}

/// Mode for new descriptors; temporary files start out owner-only.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
