use crate::{
    config::TargetEntry,
    errors::{FileOperation, IoError},
    model::{ProjectTarget, SourceFile},
    utils::normalize_path,
};
use indexmap::IndexSet;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(codelite_gen::source::io))]
    Io(#[from] IoError),

    #[error("source directory '{path}' of target '{target}' is not a directory")]
    #[diagnostic(
        code(codelite_gen::source::not_a_directory),
        help("Check `source_dirs` of the target in the manifest")
    )]
    NotADirectory { target: String, path: PathBuf },
}

/// Builds a [`ProjectTarget`] from a manifest entry: the listed files first,
/// then every file found under its source directories.
pub fn gather(entry: &TargetEntry) -> Result<ProjectTarget, SourceError> {
    let mut target = ProjectTarget::new(&entry.name, entry.target_type);

    target
        .sources
        .extend(entry.files.iter().map(|file| SourceFile::new(file.clone())));

    for directory in &entry.source_dirs {
        if !directory.is_dir() {
            return Err(SourceError::NotADirectory {
                target: entry.name.clone(),
                path: directory.clone(),
            });
        }

        let before = target.sources.len();
        walk(directory, &mut target.sources)?;

        log::debug!(
            "found {} files under {} for {}",
            target.sources.len() - before,
            directory.display(),
            entry.name
        );
    }

    Ok(target)
}

fn walk(directory: &Path, sources: &mut Vec<SourceFile>) -> Result<(), SourceError> {
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(directory).to_path_buf();

                Err(IoError::new(FileOperation::Walk, path, error.into()))?
            }
        };

        if entry.file_type().is_file() {
            sources.push(SourceFile::new(entry.into_path()));
        }
    }

    Ok(())
}

/// Keeps the files whose extension is in `allowed`, dropping repeated paths.
///
/// Paths are compared after lexical normalization, and the first occurrence
/// wins so the original order is preserved.
pub fn select(sources: &[SourceFile], allowed: &[String]) -> Vec<SourceFile> {
    let mut seen: IndexSet<PathBuf> = IndexSet::new();

    sources
        .iter()
        .filter(|source| {
            source
                .extension()
                .map(|ext| allowed.iter().any(|candidate| candidate == ext))
                .unwrap_or(false)
        })
        .filter(|source| seen.insert(normalize_path(source.path())))
        .cloned()
        .collect()
}
