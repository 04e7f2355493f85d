//! Path helpers

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `cwd`
///
/// Absolute paths are returned unchanged. Relative paths are joined to
/// `cwd` and lexically normalized (`.` dropped, `..` pops a component), so
/// `./foo` under `/work` becomes `/work/foo`. The filesystem is not touched.
#[must_use]
pub fn absolute_from(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let mut normalized = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_is_joined_and_normalized() {
        assert_eq!(
            absolute_from(Path::new("./foo"), Path::new("/work")),
            PathBuf::from("/work/foo")
        );
        assert_eq!(
            absolute_from(Path::new("foo/../bar"), Path::new("/work")),
            PathBuf::from("/work/bar")
        );
        assert_eq!(
            absolute_from(Path::new("../../../x"), Path::new("/work")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn test_absolute_is_unchanged() {
        assert_eq!(
            absolute_from(Path::new("/abs/foo"), Path::new("/work")),
            PathBuf::from("/abs/foo")
        );
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(
            absolute_from(Path::new("my_midway_app"), Path::new("/work")),
            PathBuf::from("/work/my_midway_app")
        );
    }
}
