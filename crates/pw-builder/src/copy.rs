//! Directory copying for theme static files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Copy every file below `source` into `target`, keeping relative paths.
///
/// Returns the number of files copied.
pub(crate) fn copy_dir_all(source: &Path, target: &Path) -> Result<usize, io::Error> {
    let mut files = Vec::new();
    walk_dir(source, source, &mut files)?;

    for (relative, path) in &files {
        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &destination)?;
    }

    Ok(files.len())
}

fn walk_dir(
    base: &Path,
    current: &Path,
    files: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), io::Error> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(base, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            files.push((relative.to_path_buf(), path.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_dir_all_keeps_structure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("static");
        fs::create_dir_all(source.join("css")).unwrap();
        fs::write(source.join("css/site.css"), "body {}").unwrap();
        fs::write(source.join("favicon.ico"), "ico").unwrap();
        let target = temp_dir.path().join("www");

        let copied = copy_dir_all(&source, &target).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(target.join("css/site.css")).unwrap(),
            "body {}"
        );
        assert!(target.join("favicon.ico").is_file());
    }

    #[test]
    fn test_copy_dir_all_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = copy_dir_all(&temp_dir.path().join("missing"), temp_dir.path());

        assert!(result.is_err());
    }
}
