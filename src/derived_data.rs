//! Name-based eviction of the build tool's derived-data caches.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Remove cache subdirectories whose name contains the project's name.
///
/// Coarse invalidation: every directory entry whose file name contains
/// `project_name` as a substring is deleted recursively. Returns the names of
/// the removed entries. A missing cache directory is not an error.
pub fn evict_project_caches(derived_data_dir: &Path, project_name: &str) -> Result<Vec<String>> {
    if !derived_data_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(derived_data_dir)
        .with_context(|| format!("failed to read {}", derived_data_dir.display()))?;

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", derived_data_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.contains(project_name) {
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        fs::remove_dir_all(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        removed.push(name);
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_only_directories_matching_the_project_name() {
        let temp = tempdir().expect("failed to create temp dir");
        let cache = temp.path();

        fs::create_dir_all(cache.join("Redi-abcdefgh/Build")).unwrap();
        fs::create_dir(cache.join("Other-12345678")).unwrap();
        fs::write(cache.join("Redi-notes.txt"), b"not a cache dir").unwrap();

        let removed = evict_project_caches(cache, "Redi").expect("eviction failed");

        assert_eq!(removed, vec!["Redi-abcdefgh".to_string()]);
        assert!(!cache.join("Redi-abcdefgh").exists());
        assert!(cache.join("Other-12345678").exists());
        assert!(cache.join("Redi-notes.txt").exists());
    }

    #[test]
    fn missing_cache_directory_is_a_no_op() {
        let temp = tempdir().expect("failed to create temp dir");

        let removed = evict_project_caches(&temp.path().join("DerivedData"), "Redi")
            .expect("eviction failed");

        assert!(removed.is_empty());
    }
}
