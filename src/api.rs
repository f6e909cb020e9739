use crate::{
    config::{self, GeneratorSettings, Manifest, Overrides, DEFAULT_ALLOWED_EXTENSIONS},
    generator::{self, WriteMode},
    model::{ProjectTarget, TargetType},
    platform, source,
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CodeliteGenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Platform(#[from] platform::PlatformError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] source::SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generator(#[from] generator::GeneratorError),
}

/// Generates one CodeLite project file per target listed in a manifest.
///
/// `overrides` win over the manifest's own values. Returns `true` when the
/// project files were written.
///
/// # Errors
///
/// Returns a [`CodeliteGenError`] if:
///
/// - The manifest cannot be read or parsed.
/// - The host platform is not supported.
/// - A target's source directory cannot be walked.
/// - A file of a target cannot be placed under the target's root.
/// - A directory or project file cannot be created or written to.
pub fn generate(
    manifest_path: &Path,
    overrides: &Overrides,
    mode: WriteMode,
) -> Result<bool, CodeliteGenError> {
    let mut manifest = Manifest::from_file(manifest_path)?;
    manifest.apply(overrides);

    let settings = manifest.settings()?;

    log::debug!(
        "generating for {} into {}",
        settings.host,
        settings.output_dir.display()
    );

    let targets = manifest
        .targets
        .iter()
        .map(source::gather)
        .collect::<Result<Vec<_>, _>>()?;

    generate_targets(&targets, &settings, mode)
}

/// Generates project files for targets resolved by the caller.
///
/// # Errors
///
/// See [`generate`]; manifest and source errors do not occur here.
pub fn generate_targets(
    targets: &[ProjectTarget],
    settings: &GeneratorSettings,
    mode: WriteMode,
) -> Result<bool, CodeliteGenError> {
    Ok(generator::try_generate(targets, settings, mode)?)
}

/// A manifest target as listed by the `targets` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSummary {
    pub name: String,
    pub target_type: TargetType,
    /// Files that pass the extension filter, after duplicates are dropped.
    pub file_count: usize,
}

/// Lists the targets of a manifest with the number of files each would show.
pub fn list_targets(manifest_path: &Path) -> Result<Vec<TargetSummary>, CodeliteGenError> {
    let manifest = Manifest::from_file(manifest_path)?;

    let allowed = manifest.allowed_extensions().unwrap_or_else(|| {
        DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect()
    });

    manifest
        .targets
        .iter()
        .map(|entry| -> Result<TargetSummary, CodeliteGenError> {
            let target = source::gather(entry)?;

            Ok(TargetSummary {
                file_count: source::select(&target.sources, &allowed).len(),
                name: target.name,
                target_type: target.target_type,
            })
        })
        .collect()
}
