//! Maps absolute source paths onto the folder layout shown in the IDE.
//!
//! Every target picks a [`RootStrategy`]: engine targets are displayed
//! relative to the engine root, everything else relative to the first path
//! component named after the target. A path that does not contain the
//! expected root is an error rather than a silently mis-rooted folder.

use crate::{
    model::{ProjectTarget, TargetType},
    utils::{normalize_path, to_slash_path},
};
use miette::Diagnostic;
use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

const EDITOR_SUFFIX: &str = "Editor";

#[derive(Debug, Error, Diagnostic)]
pub enum PathResolutionError {
    #[error("no path component named '{token}' in '{path}' for target '{target}'")]
    #[diagnostic(
        code(codelite_gen::relativize::token_not_found),
        help("Files of this target must live below a directory named '{token}'")
    )]
    TokenNotFound {
        target: String,
        token: String,
        path: PathBuf,
    },

    #[error("'{path}' is outside the engine root '{engine_root}' for target '{target}'")]
    #[diagnostic(
        code(codelite_gen::relativize::outside_engine_root),
        help("Check `engine_root` in the manifest")
    )]
    OutsideEngineRoot {
        target: String,
        path: PathBuf,
        engine_root: PathBuf,
    },

    #[error("'{path}' of target '{target}' is not an absolute path")]
    #[diagnostic(
        code(codelite_gen::relativize::not_absolute),
        help("Source files must be given as absolute paths")
    )]
    NotAbsolute { target: String, path: PathBuf },

    #[error("'{path}' has no parent directory")]
    #[diagnostic(code(codelite_gen::relativize::no_parent))]
    NoParent { path: PathBuf },
}

/// How the display root of a target's files is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStrategy {
    /// Everything below the engine root is kept.
    EngineRooted,
    /// Everything after the first path component equal to the token is kept.
    TokenStripped(String),
}
impl RootStrategy {
    pub fn for_target(target_type: TargetType, target_name: &str, product_token: &str) -> Self {
        if target_type.is_standalone() {
            return Self::TokenStripped(target_name.to_string());
        }

        if !product_token.is_empty() && target_name.contains(product_token) {
            return Self::EngineRooted;
        }

        let token = target_name
            .strip_suffix(EDITOR_SUFFIX)
            .filter(|stripped| !stripped.is_empty())
            .unwrap_or(target_name);

        Self::TokenStripped(token.to_string())
    }
}

/// Computes the slash-delimited virtual folder of each file of one target.
#[derive(Debug, Clone)]
pub struct PathRelativizer {
    target: String,
    engine_root: PathBuf,
    strategy: RootStrategy,
}
impl PathRelativizer {
    pub fn new(target: &ProjectTarget, engine_root: &Path, product_token: &str) -> Self {
        Self {
            target: target.name.clone(),
            engine_root: normalize_path(engine_root),
            strategy: RootStrategy::for_target(target.target_type, &target.name, product_token),
        }
    }

    pub fn strategy(&self) -> &RootStrategy {
        &self.strategy
    }

    /// Returns the folder path of `file`'s directory relative to the root.
    ///
    /// The result is empty when the file sits directly in the root.
    pub fn relative_dir(&self, file: &Path) -> Result<String, PathResolutionError> {
        if !file.is_absolute() {
            return Err(PathResolutionError::NotAbsolute {
                target: self.target.clone(),
                path: file.to_path_buf(),
            });
        }

        let normalized = normalize_path(file);

        let directory = normalized
            .parent()
            .ok_or_else(|| PathResolutionError::NoParent {
                path: file.to_path_buf(),
            })?;

        match &self.strategy {
            RootStrategy::EngineRooted => directory
                .strip_prefix(&self.engine_root)
                .map(|rest| to_slash_path(rest.components()))
                .map_err(|_| PathResolutionError::OutsideEngineRoot {
                    target: self.target.clone(),
                    path: normalized.clone(),
                    engine_root: self.engine_root.clone(),
                }),
            RootStrategy::TokenStripped(token) => {
                let components: Vec<Component> = directory.components().collect();

                let position = components
                    .iter()
                    .position(|component| {
                        matches!(component, Component::Normal(name) if *name == OsStr::new(token))
                    })
                    .ok_or_else(|| PathResolutionError::TokenNotFound {
                        target: self.target.clone(),
                        token: token.clone(),
                        path: normalized.clone(),
                    })?;

                Ok(to_slash_path(components[position + 1..].iter().copied()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relativizer(name: &str, target_type: TargetType) -> PathRelativizer {
        let target = ProjectTarget::new(name, target_type);
        PathRelativizer::new(&target, Path::new("/opt/UnrealEngine/Engine"), "UE4")
    }

    #[test]
    fn test_editor_target_strips_editor_suffix() {
        let rel = relativizer("MyGameEditor", TargetType::Editor);

        assert_eq!(
            rel.strategy(),
            &RootStrategy::TokenStripped("MyGame".to_string())
        );
        assert_eq!(
            rel.relative_dir(Path::new("/home/me/MyGame/Source/MyGameEditor/Foo.h"))
                .unwrap(),
            "Source/MyGameEditor"
        );
        assert_eq!(
            rel.relative_dir(Path::new("/home/me/MyGame/Source/MyGameEditor/Sub/Bar.cpp"))
                .unwrap(),
            "Source/MyGameEditor/Sub"
        );
    }

    #[test]
    fn test_engine_targets_are_engine_rooted() {
        let rel = relativizer("UE4Editor", TargetType::Editor);

        assert_eq!(rel.strategy(), &RootStrategy::EngineRooted);
        assert_eq!(
            rel.relative_dir(Path::new(
                "/opt/UnrealEngine/Engine/Source/Runtime/Core/Private/Core.cpp"
            ))
            .unwrap(),
            "Source/Runtime/Core/Private"
        );
    }

    #[test]
    fn test_engine_rooted_file_outside_engine_fails() {
        let rel = relativizer("UE4Client", TargetType::Client);

        let error = rel
            .relative_dir(Path::new("/home/me/MyGame/Source/Foo.h"))
            .unwrap_err();

        assert!(matches!(error, PathResolutionError::OutsideEngineRoot { .. }));
    }

    #[test]
    fn test_program_target_keeps_everything_after_its_name() {
        let rel = relativizer("ShaderCompileWorker", TargetType::Program);

        assert_eq!(
            rel.relative_dir(Path::new(
                "/opt/UnrealEngine/Engine/Source/Programs/ShaderCompileWorker/Private/Worker.cpp"
            ))
            .unwrap(),
            "Private"
        );
    }

    #[test]
    fn test_game_target_uses_project_name() {
        let rel = relativizer("MyGame", TargetType::Game);

        assert_eq!(
            rel.relative_dir(Path::new("/home/me/MyGame/Config/DefaultGame.ini"))
                .unwrap(),
            "Config"
        );
        assert_eq!(
            rel.relative_dir(Path::new("/home/me/MyGame/MyGame.uproject"))
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_token_must_match_a_whole_component() {
        let rel = relativizer("MyGame", TargetType::Game);

        assert_eq!(
            rel.relative_dir(Path::new("/home/MyGameDev/MyGame/Source/MyGame/MyGame.h"))
                .unwrap(),
            "Source/MyGame"
        );
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let rel = relativizer("MyGameServer", TargetType::Server);

        let error = rel
            .relative_dir(Path::new("/home/me/MyGame/Source/MyGame/MyGame.h"))
            .unwrap_err();

        match error {
            PathResolutionError::TokenNotFound { token, target, .. } => {
                assert_eq!(token, "MyGameServer");
                assert_eq!(target, "MyGameServer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_relative_paths_are_rejected() {
        let rel = relativizer("MyGame", TargetType::Game);

        let error = rel
            .relative_dir(Path::new("../MyGame/Source/MyGame/A.h"))
            .unwrap_err();

        assert!(matches!(error, PathResolutionError::NotAbsolute { .. }));
    }

    #[test]
    fn test_dot_segments_are_normalized_before_matching() {
        let rel = relativizer("MyGame", TargetType::Game);

        assert_eq!(
            rel.relative_dir(Path::new("/home/me/Other/../MyGame/Source/./MyGame/A.h"))
                .unwrap(),
            "Source/MyGame"
        );
    }

    #[test]
    fn test_bare_editor_name_is_not_stripped_to_nothing() {
        assert_eq!(
            RootStrategy::for_target(TargetType::Editor, "Editor", "UE4"),
            RootStrategy::TokenStripped("Editor".to_string())
        );
    }
}
