use std::{
    collections::HashMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use tracing::{
    debug,
    warn,
};

use crate::core::FlicktionaryError;

/// Uploaded files copied to disk, keyed by their original file name.
///
/// Storing a name again writes a new file and deletes the one it replaces.
#[derive(Debug)]
pub struct UploadCache {
    dir: PathBuf,
    entries: HashMap<String, PathBuf>,
}

impl UploadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), entries: HashMap::new() }
    }

    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn store(&mut self, name: &str, data: &[u8]) -> Result<PathBuf, FlicktionaryError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.unique_path(name);
        fs::write(&path, data)?;
        self.insert(name, path.clone());

        Ok(path)
    }

    /// Copy a file from disk into the cache, keyed by its file name.
    pub fn store_file(&mut self, source: &Path) -> Result<PathBuf, FlicktionaryError> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FlicktionaryError::Custom(format!("Not a file: {}", source.display())))?;

        fs::create_dir_all(&self.dir)?;

        let path = self.unique_path(name);
        fs::copy(source, &path)?;
        self.insert(name, path.clone());

        Ok(path)
    }

    fn insert(&mut self, name: &str, path: PathBuf) {
        debug!(name, path = %path.display(), "[Uploads] Stored upload");

        if let Some(old) = self.entries.insert(name.to_string(), path.clone()) {
            if old != path {
                remove_quietly(&old);
            }
        }
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.entries.remove(name) {
            Some(path) => {
                remove_quietly(&path);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for (_, path) in self.entries.drain() {
            remove_quietly(&path);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unique_path(&self, name: &str) -> PathBuf {
        let file_name = Path::new(name).file_name().and_then(|n| n.to_str()).unwrap_or("upload");
        let millis = chrono::Utc::now().timestamp_millis();

        let mut counter = 0;
        loop {
            let candidate = self.dir.join(format!("upload-{}-{}-{}", millis, counter, file_name));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "[Uploads] Failed to remove cached file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = UploadCache::new(dir.path());

        let path = cache.store("movie.mp4", b"video bytes").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"video bytes");
        assert_eq!(cache.path("movie.mp4"), Some(path.as_path()));
        assert!(path.to_string_lossy().ends_with("movie.mp4"));
        assert_eq!(cache.path("other.mp4"), None);
    }

    #[test]
    fn test_replacing_evicts_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = UploadCache::new(dir.path());

        let first = cache.store("movie.mp4", b"one").unwrap();
        let second = cache.store("movie.mp4", b"two").unwrap();

        assert_ne!(first, second);
        assert!(!first.exists());
        assert_eq!(fs::read(&second).unwrap(), b"two");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_file_copies_and_evicts() {
        let source_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("clip.mkv");
        fs::write(&source, b"first").unwrap();

        let mut cache = UploadCache::new(cache_dir.path().join("uploads"));
        let first = cache.store_file(&source).unwrap();
        assert_eq!(fs::read(&first).unwrap(), b"first");
        assert_eq!(cache.path("clip.mkv"), Some(first.as_path()));

        fs::write(&source, b"second").unwrap();
        let second = cache.store_file(&source).unwrap();
        assert!(!first.exists());
        assert!(source.exists());
        assert_eq!(fs::read(&second).unwrap(), b"second");

        assert!(cache.store_file(&source_dir.path().join("missing.mkv")).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = UploadCache::new(dir.path());

        let a = cache.store("a.srt", b"a").unwrap();
        let b = cache.store("b.srt", b"b").unwrap();

        assert!(cache.remove("a.srt"));
        assert!(!a.exists());
        assert!(!cache.remove("a.srt"));

        cache.clear();
        assert!(!b.exists());
        assert!(cache.is_empty());
    }
}
