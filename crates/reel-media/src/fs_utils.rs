//! Filesystem helpers for render outputs and temporary uploads.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Create `dir` and its parents if missing.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    if !fs::try_exists(dir).await.unwrap_or(false) {
        debug!("Creating directory {}", dir.display());
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}

/// Fail with `FileNotFound` for the first path that does not exist.
pub async fn require_files<'a, I>(paths: I) -> MediaResult<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Atomically claim a fresh file named `<stem>.<ext>` in `dir`, falling back
/// to `<stem>-<n>.<ext>` when the name is taken.
///
/// The claimed file is left empty for the caller to overwrite.
pub async fn reserve_file(dir: &Path, stem: &str, ext: &str) -> MediaResult<PathBuf> {
    const MAX_ATTEMPTS: u32 = 100;

    for attempt in 0..MAX_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{stem}.{ext}")
        } else {
            format!("{stem}-{attempt}.{ext}")
        };
        let path = dir.join(name);

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(MediaError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free name for {stem}.{ext} in {}", dir.display()),
    )))
}

/// Remove files, logging failures other than "already gone".
///
/// Returns how many files were actually removed.
pub async fn remove_files_best_effort<'a, I>(paths: I) -> usize
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut removed = 0;
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
    removed
}

/// Files deleted when the guard is dropped, unless released first.
///
/// Covers every exit from a request, including a future dropped mid-render
/// when the client goes away. Removal in `drop` is synchronous.
#[derive(Debug, Default)]
pub struct FileGuard {
    paths: Vec<PathBuf>,
}

impl FileGuard {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Start tracking `path`.
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Stop tracking `path` so it survives the drop.
    pub fn release(&mut self, path: &Path) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| p != path);
        self.paths.len() != before
    }

    /// Stop tracking everything and hand the paths to the caller.
    pub fn release_all(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let mut removed = 0;
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
        if removed > 0 {
            debug!(removed, "FileGuard removed files");
        }
    }
}
