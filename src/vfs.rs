use crate::{
    model::SourceFile,
    relativize::{PathRelativizer, PathResolutionError},
    utils::normalize_path,
};
use foldertree::FolderNode;
use std::path::PathBuf;

/// Virtual folders as shown in the IDE; leaves are absolute file paths.
pub type VirtualFolder = FolderNode<PathBuf>;

/// Builds the virtual folder tree of one target.
///
/// Every file is placed under the folder path its [`PathRelativizer`]
/// resolves. The first file whose root cannot be resolved aborts the build.
pub fn build_folder_tree(
    sources: &[SourceFile],
    relativizer: &PathRelativizer,
) -> Result<VirtualFolder, PathResolutionError> {
    let mut root = VirtualFolder::root();

    for source in sources {
        let relative_dir = relativizer.relative_dir(source.path())?;

        root.insert(&relative_dir, normalize_path(source.path()));
    }

    Ok(root)
}

/// A descriptor file staged in memory before it is written to disk.
#[derive(Debug, Clone)]
pub struct VirtualEntry {
    /// Target the descriptor was generated for.
    pub target: String,
    /// Final location of the descriptor file.
    pub destination: PathBuf,
    /// Serialized descriptor.
    pub content: String,
    /// Folder tree the descriptor contains, kept for previews.
    pub folders: VirtualFolder,
}
/// Every descriptor of one run, in target order.
///
/// All entries are planned before the first one is written, so a run that
/// fails while planning leaves the filesystem untouched.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectTarget, TargetType};
    use std::path::Path;

    fn tree_for(target: &ProjectTarget) -> Result<VirtualFolder, PathResolutionError> {
        let relativizer = PathRelativizer::new(target, Path::new("/opt/UE/Engine"), "UE4");
        build_folder_tree(&target.sources, &relativizer)
    }

    #[test]
    fn test_editor_target_tree() {
        let target = ProjectTarget::new("MyGameEditor", TargetType::Editor).with_sources([
            "/home/me/MyGame/Source/MyGameEditor/Foo.h",
            "/home/me/MyGame/Source/MyGameEditor/Sub/Bar.cpp",
        ]);

        let root = tree_for(&target).unwrap();

        let editor = root.find("Source/MyGameEditor").unwrap();
        assert_eq!(
            editor.leaves(),
            &[PathBuf::from("/home/me/MyGame/Source/MyGameEditor/Foo.h")]
        );

        let sub = editor.folder("Sub").unwrap();
        assert_eq!(
            sub.leaves(),
            &[PathBuf::from("/home/me/MyGame/Source/MyGameEditor/Sub/Bar.cpp")]
        );
        assert_eq!(root.folder_count(), 3);
    }

    #[test]
    fn test_tree_shape_does_not_depend_on_file_order() {
        let files = [
            "/home/me/MyGame/Source/MyGame/MyGame.h",
            "/home/me/MyGame/Source/MyGame/Private/MyGame.cpp",
            "/home/me/MyGame/Config/DefaultEngine.ini",
            "/home/me/MyGame/MyGame.uproject",
        ];
        let mut reversed = files;
        reversed.reverse();

        let forward = tree_for(&ProjectTarget::new("MyGame", TargetType::Game).with_sources(files));
        let backward =
            tree_for(&ProjectTarget::new("MyGame", TargetType::Game).with_sources(reversed));

        assert_eq!(forward.unwrap(), backward.unwrap());
    }

    #[test]
    fn test_unresolvable_file_aborts_the_tree() {
        let target = ProjectTarget::new("MyGame", TargetType::Game).with_sources([
            "/home/me/MyGame/Source/MyGame/MyGame.h",
            "/somewhere/else/Stray.h",
        ]);

        let error = tree_for(&target).unwrap_err();

        assert!(matches!(error, PathResolutionError::TokenNotFound { .. }));
    }
}
