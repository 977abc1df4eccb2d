use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::AssetError;

/// Where asset bytes come from.
///
/// Paths use URL style (`/textures/noise/perlinnoise.webp`). Implementations
/// are shared with loader threads, hence `Send + Sync`.
pub trait AssetSource: Send + Sync {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Serves assets from a directory, the way a static file server would.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL-style path below the root. Rejects `..` and absolute prefixes.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(AssetError::InvalidPath(path.to_string())),
            }
        }
        Ok(resolved)
    }
}

impl AssetSource for FileSystemSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let file = self.resolve(path)?;
        std::fs::read(&file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_string()),
            _ => AssetError::Io {
                path: path.to_string(),
                source: e,
            },
        })
    }
}

/// In-memory assets keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_url_paths_under_root() {
        let src = FileSystemSource::new("/srv/public");
        let p = src.resolve("/textures/noise/perlinnoise.webp").unwrap();
        assert_eq!(p, PathBuf::from("/srv/public/textures/noise/perlinnoise.webp"));
    }

    #[test]
    fn rejects_parent_components() {
        let src = FileSystemSource::new("/srv/public");
        assert!(matches!(
            src.resolve("/textures/../../etc/passwd"),
            Err(AssetError::InvalidPath(_))
        ));
    }

    #[test]
    fn reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        std::fs::write(dir.path().join("textures/a.bin"), b"abc").unwrap();

        let src = FileSystemSource::new(dir.path());
        assert_eq!(src.read("/textures/a.bin").unwrap(), b"abc");
        assert!(matches!(
            src.read("/textures/missing.bin"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn memory_source_lookup() {
        let src = MemorySource::new().with("/a", vec![1, 2, 3]);
        assert_eq!(src.read("/a").unwrap(), vec![1, 2, 3]);
        assert!(src.read("/b").is_err());
    }
}
