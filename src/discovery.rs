//! Input path expansion into the ordered list of Go files to scan.

use crate::error::InputError;
use glob::glob;
use std::path::{Component, Path, PathBuf};

const LOG_TARGET: &str = "promlinter::discovery";

/// Expand `paths` into Go source files.
///
/// Files are kept as given. Directories are walked recursively in sorted
/// order, skipping `_test.go` files and (unless `with_vendor`) anything
/// under a `vendor` directory. Duplicates are kept; callers pass distinct
/// roots.
pub fn discover<P: AsRef<Path>>(paths: &[P], with_vendor: bool) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for p in paths {
        let p = p.as_ref();
        if !p.exists() {
            return Err(InputError::NotFound(p.to_string_lossy().to_string()));
        }
        if p.is_file() {
            files.push(p.to_path_buf());
            continue;
        }
        let pattern = p.join("**").join("*.go").to_string_lossy().to_string();
        let entries = glob(&pattern).map_err(|source| InputError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|f| f.is_file())
            .filter(|f| !is_test_file(f))
            .filter(|f| with_vendor || !under_vendor(f.strip_prefix(p).unwrap_or(f)))
            .collect();
        found.sort();
        log::debug!(target: LOG_TARGET, "{}: {} Go files", p.display(), found.len());
        files.extend(found);
    }
    Ok(files)
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

fn under_vendor(rel: &Path) -> bool {
    rel.components()
        .any(|c| matches!(c, Component::Normal(s) if s == "vendor"))
}

/// Path shown in positions: relative to `base` when it lies beneath it,
/// otherwise as given.
pub fn display_path(path: &Path, base: &Path) -> String {
    if path.is_absolute() {
        if let Some(rel) = pathdiff::diff_paths(path, base) {
            if !rel.starts_with("..") {
                return rel.to_string_lossy().to_string();
            }
        }
    }
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "package x\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_sorted_skips_tests_and_vendor() {
        let td = tempdir().unwrap();
        let root = td.path();
        touch(root, "b.go");
        touch(root, "a.go");
        touch(root, "a_test.go");
        touch(root, "pkg/c.go");
        touch(root, "vendor/dep/d.go");
        touch(root, "notes.txt");
        let files = discover(&[root], false).unwrap();
        assert_eq!(names(root, &files), vec!["a.go", "b.go", "pkg/c.go"]);
    }

    #[test]
    fn test_discover_with_vendor() {
        let td = tempdir().unwrap();
        let root = td.path();
        touch(root, "a.go");
        touch(root, "vendor/dep/d.go");
        let files = discover(&[root], true).unwrap();
        assert_eq!(names(root, &files), vec!["a.go", "vendor/dep/d.go"]);
    }

    #[test]
    fn test_discover_file_kept_as_given() {
        let td = tempdir().unwrap();
        touch(td.path(), "one_test.go");
        let f = td.path().join("one_test.go");
        let files = discover(&[&f], false).unwrap();
        assert_eq!(files, vec![f]);
    }

    #[test]
    fn test_discover_missing_path() {
        let td = tempdir().unwrap();
        let missing = td.path().join("nope");
        let err = discover(&[missing], false).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }

    #[test]
    fn test_display_path() {
        let base = Path::new("/work/repo");
        assert_eq!(display_path(Path::new("/work/repo/pkg/a.go"), base), "pkg/a.go");
        assert_eq!(display_path(Path::new("/elsewhere/a.go"), base), "/elsewhere/a.go");
        assert_eq!(display_path(Path::new("pkg/a.go"), base), "pkg/a.go");
    }
}
