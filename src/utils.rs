use std::path::{Component, Path, PathBuf};

/// Lexically normalizes `source`: drops `.` and resolves `..` against the
/// components seen so far. The filesystem is never consulted.
pub fn normalize_path(source: &Path) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in source.components() {
        match component {
            // Skip the current-dir marker "."
            Component::CurDir => {}

            // For "..", pop the last component if possible
            Component::ParentDir => {
                new_path.pop();
            }

            // For normal components, push them
            other => new_path.push(other.as_os_str()),
        }
    }

    new_path
}

/// Joins `path` onto `base` unless it is already absolute, then normalizes.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Renders the normal components of `components` as a `/`-delimited string.
pub fn to_slash_path<'a>(components: impl IntoIterator<Item = Component<'a>>) -> String {
    components
        .into_iter()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
