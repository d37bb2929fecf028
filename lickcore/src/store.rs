//! Library file store
//!
//! One lick per `.lick` file under a root directory. The store owns folder
//! management (create, delete, move) as thin wrappers over single filesystem
//! calls; every operation either succeeds or is abandoned with the error
//! reported — no partial-state cleanup is ever needed.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::lick::Lick;

/// Default subfolders created under a fresh library root.
pub const DEFAULT_FOLDERS: [&str; 7] = [
    "E Licks", "A Licks", "D Licks", "G Licks", "B Licks", "F Licks", "C Licks",
];

pub const LICK_EXTENSION: &str = "lick";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{0}' already exists")]
    AlreadyExists(PathBuf),
    #[error("'{0}' is not a movable file path")]
    InvalidPath(PathBuf),
    #[error("lick error: {0}")]
    Lick(#[from] crate::lick::LickError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A `.lick` file in the library tree.
#[derive(Debug, Clone)]
pub struct LickEntry {
    pub name: String,
    pub path: PathBuf,
}

/// One folder in the library tree, subfolders first, both levels sorted
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FolderNode {
    pub name: String,
    pub path: PathBuf,
    pub folders: Vec<FolderNode>,
    pub licks: Vec<LickEntry>,
}

pub struct LickStore {
    root: PathBuf,
}

impl LickStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the library root and the default per-key folders when missing.
    pub fn ensure_layout(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        for folder in DEFAULT_FOLDERS {
            let path = self.root.join(folder);
            if !path.exists() {
                std::fs::create_dir(&path)?;
            }
        }
        Ok(())
    }

    /// Walk the library into a tree of folders and `.lick` files.
    pub fn scan(&self) -> Result<FolderNode> {
        Self::scan_dir(&self.root)
    }

    fn scan_dir(dir: &Path) -> Result<FolderNode> {
        let mut node = FolderNode {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: dir.to_path_buf(),
            ..Default::default()
        };

        for entry in std::fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            if path.is_dir() {
                node.folders.push(Self::scan_dir(&path)?);
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(LICK_EXTENSION))
                .unwrap_or(false)
            {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or(name);
                node.licks.push(LickEntry { name: stem, path });
            }
        }

        node.folders.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        node.licks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(node)
    }

    /// The file path a lick with this name would get in `dir`. Lets callers
    /// check for collisions before deciding to overwrite.
    pub fn lick_path(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", sanitize_name(name), LICK_EXTENSION))
    }

    /// Write a fresh one-measure lick into `dir`, overwriting silently — the
    /// caller is expected to have confirmed any collision via `lick_path`.
    pub fn create_lick(&self, dir: &Path, name: &str) -> Result<(Lick, PathBuf)> {
        let display_name = if name.trim().is_empty() {
            "Untitled Lick".to_string()
        } else {
            name.trim().to_string()
        };
        let path = self.lick_path(dir, &display_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lick = Lick::new(display_name);
        lick.save(&path)?;
        Ok((lick, path))
    }

    /// Create a subfolder; a name collision is an error, not an overwrite.
    pub fn create_folder(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        let path = parent.join(name);
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        std::fs::create_dir(&path)?;
        Ok(path)
    }

    /// Delete a lick file or a folder (recursively). Confirmation happens
    /// before this is called.
    pub fn delete(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Move a file into another folder. Without `overwrite`, a name
    /// collision is reported so the UI can ask first. Moving a file onto its
    /// own parent is a no-op.
    pub fn move_into(&self, src: &Path, dest_dir: &Path, overwrite: bool) -> Result<PathBuf> {
        if src.parent() == Some(dest_dir) {
            return Ok(src.to_path_buf());
        }
        let file_name = src
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(src.to_path_buf()))?;
        let dest = dest_dir.join(file_name);
        if dest.exists() && !overwrite {
            return Err(StoreError::AlreadyExists(dest));
        }
        std::fs::rename(src, &dest)?;
        Ok(dest)
    }
}

/// Strip path separators out of a lick name before it becomes a filename.
fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "Untitled Lick".to_string();
    }
    trimmed.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("lickstore_test_{}_{}", tag, std::process::id()));
            let _ = std::fs::remove_dir_all(&path);
            Self(path)
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_ensure_layout_creates_default_folders() {
        let root = TempRoot::new("layout");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        for folder in DEFAULT_FOLDERS {
            assert!(root.0.join(folder).is_dir());
        }
        // Idempotent
        store.ensure_layout().unwrap();
    }

    #[test]
    fn test_scan_tree() {
        let root = TempRoot::new("scan");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        store.create_lick(&root.0.join("A Licks"), "blues run").unwrap();
        store.create_lick(&root.0.join("A Licks"), "Arpeggio").unwrap();
        let nested = store.create_folder(&root.0.join("A Licks"), "slow").unwrap();
        store.create_lick(&nested, "bends").unwrap();

        let tree = store.scan().unwrap();
        assert_eq!(tree.folders.len(), DEFAULT_FOLDERS.len());
        let a_licks = tree.folders.iter().find(|f| f.name == "A Licks").unwrap();
        // Case-insensitive sort
        let names: Vec<&str> = a_licks.licks.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Arpeggio", "blues run"]);
        assert_eq!(a_licks.folders[0].licks[0].name, "bends");
    }

    #[test]
    fn test_create_lick_sanitizes_name() {
        let root = TempRoot::new("sanitize");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();

        let (lick, path) = store.create_lick(&root.0, "riff / run").unwrap();
        assert_eq!(lick.name, "riff / run");
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "riff _ run.lick");

        let (lick, path) = store.create_lick(&root.0, "   ").unwrap();
        assert_eq!(lick.name, "Untitled Lick");
        assert!(path.ends_with("Untitled Lick.lick"));
        assert_eq!(Lick::load(&path).unwrap().measures.len(), 1);
    }

    #[test]
    fn test_create_lick_replaces_existing_file() {
        let root = TempRoot::new("replace");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();

        let (mut lick, path) = store.create_lick(&root.0, "dup").unwrap();
        lick.measures.push(crate::lick::Measure::default());
        lick.save(&path).unwrap();
        assert_eq!(Lick::load(&path).unwrap().measures.len(), 2);

        // Creating under the same name writes a fresh document in place.
        let (_, again) = store.create_lick(&root.0, "dup").unwrap();
        assert_eq!(again, path);
        assert_eq!(Lick::load(&path).unwrap().measures.len(), 1);
    }

    #[test]
    fn test_create_folder_collision() {
        let root = TempRoot::new("folder");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        store.create_folder(&root.0, "minor").unwrap();
        assert!(matches!(
            store.create_folder(&root.0, "minor"),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_move_reports_collision() {
        let root = TempRoot::new("move");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        let e_dir = root.0.join("E Licks");
        let a_dir = root.0.join("A Licks");
        let (_, src) = store.create_lick(&e_dir, "turnaround").unwrap();
        store.create_lick(&a_dir, "turnaround").unwrap();

        assert!(matches!(
            store.move_into(&src, &a_dir, false),
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(src.exists());

        let dest = store.move_into(&src, &a_dir, true).unwrap();
        assert!(!src.exists());
        assert!(dest.exists());
    }

    #[test]
    fn test_move_rejects_src_without_file_name() {
        let root = TempRoot::new("badsrc");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        assert!(matches!(
            store.move_into(Path::new("/"), &root.0.join("E Licks"), false),
            Err(StoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_move_within_same_folder_is_noop() {
        let root = TempRoot::new("noop");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        let e_dir = root.0.join("E Licks");
        let (_, src) = store.create_lick(&e_dir, "stay").unwrap();
        let dest = store.move_into(&src, &e_dir, false).unwrap();
        assert_eq!(dest, src);
        assert!(src.exists());
    }

    #[test]
    fn test_delete_file_and_folder() {
        let root = TempRoot::new("delete");
        let store = LickStore::new(root.0.clone());
        store.ensure_layout().unwrap();
        let dir = store.create_folder(&root.0, "scratch").unwrap();
        let (_, path) = store.create_lick(&dir, "gone soon").unwrap();

        store.delete(&path).unwrap();
        assert!(!path.exists());
        store.delete(&dir).unwrap();
        assert!(!dir.exists());
    }
}
