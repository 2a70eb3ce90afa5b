//! Expansion of user-supplied paths into index targets

use crate::error::{IndexError, Result};
use aerodex_core::path::{is_private, lexical_clean, PRIVATE_DIR};
use ahash::AHashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Insertion-ordered set of paths
#[derive(Debug, Default)]
struct PathSet {
    order: Vec<PathBuf>,
    seen: AHashSet<PathBuf>,
}

impl PathSet {
    fn insert(&mut self, path: &Path) {
        if self.seen.insert(path.to_path_buf()) {
            self.order.push(path.to_path_buf());
        }
    }

    fn into_vec(self) -> Vec<PathBuf> {
        self.order
    }
}

/// Resolves candidate paths against a tracked root
///
/// The root must be absolute and canonical.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    max_depth: usize,
    follow_links: bool,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: 0,
            follow_links: false,
        }
    }

    /// Recursion limit below each candidate directory (0 = unlimited)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expand `candidates` into absolute, deduplicated target paths
    ///
    /// With `include_dirs`, every directory leading to a target (up to, not
    /// including, the root) is emitted once after all other targets, in
    /// discovery order. Without it, a candidate directory yields itself
    /// and everything below it.
    ///
    /// All candidates are checked for containment before any existence
    /// check or traversal happens.
    pub fn resolve<P: AsRef<Path>>(
        &self,
        candidates: &[P],
        include_dirs: bool,
    ) -> Result<Vec<PathBuf>> {
        let absolute = candidates
            .iter()
            .map(|p| self.absolutize(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if let Some(outside) = absolute.iter().find(|p| !p.starts_with(&self.root)) {
            return Err(IndexError::OutsideRoot {
                root: self.root.clone(),
                path: outside.clone(),
            });
        }

        let mut result = PathSet::default();
        let mut dirs = PathSet::default();

        for path in absolute {
            if self.is_private_target(&path) {
                debug!("Skipping {}", path.display());
                continue;
            }

            let metadata = std::fs::metadata(&path).map_err(|e| IndexError::from_io(&path, e))?;

            if metadata.is_dir() {
                for entry in self.walk(&path) {
                    let entry = entry?;
                    let entry_path = entry.path();

                    if include_dirs {
                        self.insert_ancestors(entry_path, &mut dirs);
                    }

                    if entry.file_type().is_dir() && include_dirs {
                        dirs.insert(entry_path);
                    } else {
                        result.insert(entry_path);
                    }
                }

                if path != self.root {
                    if include_dirs {
                        self.insert_ancestors(&path, &mut dirs);
                    }
                    dirs.insert(&path);
                }
            } else {
                if include_dirs {
                    self.insert_ancestors(&path, &mut dirs);
                }
                result.insert(&path);
            }
        }

        for dir in dirs.into_vec() {
            result.insert(&dir);
        }
        Ok(result.into_vec())
    }

    fn walk(&self, dir: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
        let mut walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if self.max_depth > 0 {
            walker = walker.max_depth(self.max_depth);
        }

        walker
            .into_iter()
            .filter_entry(|e| e.file_name() != PRIVATE_DIR)
    }

    /// Parents of `path` strictly between the root and `path`
    fn insert_ancestors(&self, path: &Path, dirs: &mut PathSet) {
        let mut chain: Vec<&Path> = path
            .ancestors()
            .skip(1)
            .take_while(|p| *p != self.root && p.starts_with(&self.root))
            .collect();
        chain.reverse();

        for dir in chain {
            dirs.insert(dir);
        }
    }

    fn is_private_target(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .map(is_private)
            .unwrap_or(false)
    }

    /// Absolute, cleaned form of a candidate with a canonical parent
    ///
    /// The final component is kept as given, so a symlink stays a symlink.
    fn absolutize(&self, path: &Path) -> Result<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(|e| IndexError::io(path, e))?;
            cwd.join(path)
        };

        let cleaned = lexical_clean(&joined);
        let (Some(parent), Some(name)) = (cleaned.parent(), cleaned.file_name()) else {
            return Ok(cleaned);
        };

        match std::fs::canonicalize(parent) {
            Ok(parent) => Ok(parent.join(name)),
            Err(_) => Ok(cleaned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/c.txt"), b"c").unwrap();
        fs::write(root.join("a/img.jpg"), b"img").unwrap();
        fs::write(root.join("top.txt"), b"top").unwrap();
        fs::create_dir_all(root.join(PRIVATE_DIR)).unwrap();
        fs::write(root.join(PRIVATE_DIR).join("index.sqlite"), b"").unwrap();
        (dir, root)
    }

    fn rel(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_resolve_root_with_dirs() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let paths = rel(&root, &resolver.resolve(&[&root], true).unwrap());
        assert_eq!(paths, vec!["a/b/c.txt", "a/img.jpg", "top.txt", "a", "a/b"]);
    }

    #[test]
    fn test_resolve_file_emits_ancestors() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let paths = rel(&root, &resolver.resolve(&[root.join("a/b/c.txt")], true).unwrap());
        assert_eq!(paths, vec!["a/b/c.txt", "a", "a/b"]);

        let paths = rel(&root, &resolver.resolve(&[root.join("a/b/c.txt")], false).unwrap());
        assert_eq!(paths, vec!["a/b/c.txt"]);
    }

    #[test]
    fn test_resolve_dir_without_ancestors() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let paths = rel(&root, &resolver.resolve(&[root.join("a/b")], false).unwrap());
        assert_eq!(paths, vec!["a/b/c.txt", "a/b"]);
    }

    #[test]
    fn test_private_dir_is_skipped() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let all = rel(&root, &resolver.resolve(&[&root], false).unwrap());
        assert!(all.iter().all(|p| !p.contains(PRIVATE_DIR)));

        let direct = resolver.resolve(&[root.join(PRIVATE_DIR)], true).unwrap();
        assert!(direct.is_empty());
    }

    #[test]
    fn test_nested_private_dir_is_pruned() {
        let (_dir, root) = fixture();
        fs::create_dir_all(root.join("a").join(PRIVATE_DIR)).unwrap();
        fs::write(root.join("a").join(PRIVATE_DIR).join("x"), b"x").unwrap();

        let paths = rel(&root, &PathResolver::new(&root).resolve(&[&root], true).unwrap());
        assert!(paths.iter().all(|p| !p.contains(PRIVATE_DIR)));
    }

    #[test]
    fn test_max_depth_stops_recursion() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root).max_depth(1);

        let paths = rel(&root, &resolver.resolve(&[&root], true).unwrap());
        assert!(paths.contains(&"a".to_string()));
        assert!(paths.contains(&"top.txt".to_string()));
        assert!(!paths.contains(&"a/b/c.txt".to_string()));
        assert!(!paths.contains(&"a/img.jpg".to_string()));

        let paths = rel(&root, &resolver.resolve(&[root.join("a")], true).unwrap());
        assert!(paths.contains(&"a/b".to_string()));
        assert!(!paths.contains(&"a/b/c.txt".to_string()));
    }

    #[test]
    fn test_outside_root_fails_before_anything_else() {
        let (_dir, root) = fixture();
        let other = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(&root);

        // Missing path listed first still reports containment
        let err = resolver
            .resolve(&[root.join("missing.jpg"), other.path().to_path_buf()], true)
            .unwrap_err();
        assert!(matches!(err, IndexError::OutsideRoot { .. }));

        let err = resolver.resolve(&[root.join("a/../../escape")], true).unwrap_err();
        assert!(matches!(err, IndexError::OutsideRoot { .. }));
    }

    #[test]
    fn test_missing_candidate_is_not_found() {
        let (_dir, root) = fixture();
        let err = PathResolver::new(&root)
            .resolve(&[root.join("nope.jpg")], false)
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_dirs_emitted_once() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let paths = rel(
            &root,
            &resolver
                .resolve(&[root.join("a/img.jpg"), root.join("a/b/c.txt")], true)
                .unwrap(),
        );
        assert_eq!(paths, vec!["a/img.jpg", "a/b/c.txt", "a", "a/b"]);
    }

    #[test]
    fn test_overlapping_candidates_emitted_once() {
        let (_dir, root) = fixture();
        let resolver = PathResolver::new(&root);

        let paths = rel(
            &root,
            &resolver
                .resolve(&[root.join("a"), root.join("a/img.jpg")], true)
                .unwrap(),
        );
        assert_eq!(paths, vec!["a/b/c.txt", "a/img.jpg", "a", "a/b"]);

        let paths = rel(
            &root,
            &resolver
                .resolve(&[root.join("a/img.jpg"), root.join("a/img.jpg")], true)
                .unwrap(),
        );
        assert_eq!(paths, vec!["a/img.jpg", "a"]);

        let paths = rel(
            &root,
            &resolver
                .resolve(&[root.join("a"), root.join("a/b")], false)
                .unwrap(),
        );
        assert_eq!(paths, vec!["a/b", "a/b/c.txt", "a/img.jpg", "a"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_candidate_keeps_its_name() {
        let (_dir, root) = fixture();
        std::os::unix::fs::symlink(root.join("a/img.jpg"), root.join("link.jpg")).unwrap();
        let resolver = PathResolver::new(&root);

        let direct = rel(&root, &resolver.resolve(&[root.join("link.jpg")], false).unwrap());
        assert_eq!(direct, vec!["link.jpg"]);

        let walked = rel(&root, &resolver.resolve(&[&root], false).unwrap());
        assert!(walked.contains(&"link.jpg".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_links_descends_linked_dirs() {
        let (_dir, root) = fixture();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("data.txt"), b"d").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("linked")).unwrap();

        let paths = rel(&root, &PathResolver::new(&root).resolve(&[&root], true).unwrap());
        assert!(paths.contains(&"linked".to_string()));
        assert!(!paths.contains(&"linked/data.txt".to_string()));

        let paths = rel(
            &root,
            &PathResolver::new(&root)
                .follow_links(true)
                .resolve(&[&root], true)
                .unwrap(),
        );
        assert!(paths.contains(&"linked".to_string()));
        assert!(paths.contains(&"linked/data.txt".to_string()));
    }
}
