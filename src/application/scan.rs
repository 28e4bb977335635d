//! Directory tree listing shared by detection, dependabot generation and sync

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Entries of one directory, relative to the scan root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// `/`-separated path relative to the root; the root itself is `.`
    pub rel: String,
    /// Names of non-directory entries
    pub files: BTreeSet<String>,
    /// Names of subdirectories that were not pruned
    pub dirs: BTreeSet<String>,
}

/// Which directories a walk descends into.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions<'a> {
    /// Directory names never entered (e.g. `.git`, `node_modules`)
    pub exclude_dirs: &'a [String],
    /// Also prune every directory whose name starts with `.`
    pub skip_hidden: bool,
}

/// Root-relative, `/`-separated form of `path`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn is_pruned(entry: &DirEntry, options: &ScanOptions<'_>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    (options.skip_hidden && name.starts_with('.'))
        || options.exclude_dirs.iter().any(|d| d.as_str() == name.as_ref())
}

/// Walk `root` and list every visited directory, sorted by relative path.
///
/// Unreadable entries are skipped.
pub fn scan_tree(root: &Path, options: ScanOptions<'_>) -> Vec<DirListing> {
    let mut listings: BTreeMap<String, DirListing> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned(e, &options));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("scan_tree: skipping unreadable entry: {}", e);
                continue;
            }
        };
        let is_dir = entry.file_type().is_dir();

        if is_dir {
            let rel = relative_path(root, entry.path());
            listings.entry(rel.clone()).or_insert_with(|| DirListing {
                rel,
                ..Default::default()
            });
        }
        if entry.depth() == 0 {
            continue;
        }

        let parent_rel = entry
            .path()
            .parent()
            .map(|p| relative_path(root, p))
            .unwrap_or_else(|| ".".to_string());
        let name = entry.file_name().to_string_lossy().into_owned();
        let parent = listings
            .entry(parent_rel.clone())
            .or_insert_with(|| DirListing {
                rel: parent_rel,
                ..Default::default()
            });
        if is_dir {
            parent.dirs.insert(name);
        } else {
            parent.files.insert(name);
        }
    }

    debug!(
        "scan_tree: root={} directories={}",
        root.display(),
        listings.len()
    );
    listings.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_nested_tree_when_scanned_then_lists_each_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("pkg/inner")).unwrap();
        fs::write(temp.path().join("go.mod"), "module x").unwrap();
        fs::write(temp.path().join("pkg/inner/main.go"), "package inner").unwrap();

        let listings = scan_tree(
            temp.path(),
            ScanOptions {
                exclude_dirs: &[],
                skip_hidden: true,
            },
        );

        let rels: Vec<&str> = listings.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, vec![".", "pkg", "pkg/inner"]);
        assert!(listings[0].files.contains("go.mod"));
        assert!(listings[0].dirs.contains("pkg"));
        assert!(listings[2].files.contains("main.go"));
    }

    #[test]
    fn given_hidden_and_excluded_dirs_when_scanned_then_pruned() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".cache")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules/left-pad")).unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();

        let exclude = vec!["node_modules".to_string()];
        let listings = scan_tree(
            temp.path(),
            ScanOptions {
                exclude_dirs: &exclude,
                skip_hidden: true,
            },
        );

        let rels: Vec<&str> = listings.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, vec![".", "src"]);
        assert!(!listings[0].dirs.contains(".cache"));
    }

    #[test]
    fn given_hidden_root_when_scanned_then_root_still_walked() {
        let temp = tempfile::Builder::new().prefix(".hidden").tempdir().unwrap();
        fs::write(temp.path().join("go.mod"), "module x").unwrap();

        let listings = scan_tree(
            temp.path(),
            ScanOptions {
                exclude_dirs: &[],
                skip_hidden: true,
            },
        );

        assert_eq!(listings.len(), 1);
        assert!(listings[0].files.contains("go.mod"));
    }
}
