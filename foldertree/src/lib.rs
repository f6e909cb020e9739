//! An owned tree of named virtual folders holding leaf entries.
//!
//! Folders are created on demand while inserting a slash-delimited path, and
//! every folder is exclusively owned by its parent. Sibling folders never
//! share a name, and children keep the order in which they were first
//! inserted so that anything rendered from the tree is stable across runs.
//!
//! # Example
//! ```
//! use foldertree::FolderNode;
//!
//! let mut root: FolderNode<&str> = FolderNode::root();
//! root.insert("Source/Game", "Game.h");
//! root.insert("Source/Game/Private", "Game.cpp");
//!
//! assert_eq!(root.find("Source/Game").unwrap().leaves(), &["Game.h"]);
//! assert_eq!(root.folder_count(), 3);
//! ```

/// Splits `path` on `/`, skipping empty segments.
///
/// Leading, trailing and repeated separators therefore never create folders
/// with an empty name.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A named folder with child folders and leaf entries.
#[derive(Debug, Clone)]
pub struct FolderNode<Leaf> {
    name: String,
    folders: Vec<FolderNode<Leaf>>,
    leaves: Vec<Leaf>,
}

impl<Leaf> FolderNode<Leaf> {
    /// Creates the unnamed root of a tree.
    pub fn root() -> Self {
        Self::new("")
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folders: Vec::new(),
            leaves: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child folders in first-insertion order.
    pub fn folders(&self) -> &[FolderNode<Leaf>] {
        &self.folders
    }

    /// Leaves attached directly to this folder, in insertion order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Returns the direct child folder called `name`.
    pub fn folder(&self, name: &str) -> Option<&FolderNode<Leaf>> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    /// Follows a slash-delimited path of folder names from this node.
    ///
    /// An empty path resolves to the node itself.
    pub fn find(&self, path: &str) -> Option<&FolderNode<Leaf>> {
        segments(path).try_fold(self, |node, segment| node.folder(segment))
    }

    /// Inserts `leaf` under `relative_path`, creating any missing folders.
    ///
    /// Each non-empty segment is matched exactly against the names of the
    /// current node's children; a missing child is appended and descended
    /// into. The leaf is attached at the deepest folder. Nothing is ever
    /// deduplicated here: inserting the same leaf twice attaches it twice.
    ///
    /// Returns the depth of the folder the leaf was attached to, which equals
    /// the number of non-empty segments in `relative_path`.
    pub fn insert(&mut self, relative_path: &str, leaf: Leaf) -> usize {
        let mut node = self;
        let mut depth = 0;

        for segment in segments(relative_path) {
            let index = match node.folders.iter().position(|f| f.name == segment) {
                Some(index) => index,
                None => {
                    node.folders.push(FolderNode::new(segment));
                    node.folders.len() - 1
                }
            };

            node = &mut node.folders[index];
            depth += 1;
        }

        node.leaves.push(leaf);

        depth
    }

    /// Number of folders below this node, not counting the node itself.
    pub fn folder_count(&self) -> usize {
        self.folders
            .iter()
            .map(|folder| 1 + folder.folder_count())
            .sum()
    }

    /// Number of leaves in this node and every folder below it.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
            + self
                .folders
                .iter()
                .map(|folder| folder.leaf_count())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.leaves.is_empty()
    }
}

impl<Leaf> Default for FolderNode<Leaf> {
    fn default() -> Self {
        Self::root()
    }
}

/// Two trees are equal when they have the same shape: the same folder names
/// at every level and the same leaves in every folder, regardless of the
/// order in which they were inserted.
impl<Leaf: PartialEq> PartialEq for FolderNode<Leaf> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && same_elements(&self.leaves, &other.leaves)
            && same_elements(&self.folders, &other.folders)
    }
}

impl<Leaf: Eq> Eq for FolderNode<Leaf> {}

/// Multiset comparison that only needs `PartialEq`.
fn same_elements<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut matched = vec![false; right.len()];

    for item in left {
        let found = right
            .iter()
            .enumerate()
            .position(|(index, candidate)| !matched[index] && candidate == item);

        match found {
            Some(index) => matched[index] = true,
            None => return false,
        }
    }

    true
}
