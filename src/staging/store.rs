// Staging store - write-once files under the shared directory

use super::PersistError;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Directory that is bind-mounted read-only into every sandbox
#[derive(Debug, Clone)]
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    /// Use `dir` as-is. The caller guarantees it exists and is absolute.
    #[cfg(test)]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the directory if needed and canonicalize it for mounting
    pub async fn prepare(dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|source| PersistError::Prepare {
                path: dir.to_path_buf(),
                source,
            })?;
        let dir = fs::canonicalize(dir)
            .await
            .map_err(|source| PersistError::Prepare {
                path: dir.to_path_buf(),
                source,
            })?;

        info!(dir = %dir.display(), "staging directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{dir}/{job_id}`
    pub fn path_for(&self, job_id: &str) -> PathBuf {
        self.dir.join(job_id)
    }

    /// Drain `stream` into a new file at `target`.
    ///
    /// The file must not exist yet. Resolves only after the data has been
    /// flushed and synced.
    pub async fn persist<S, B>(&self, stream: S, target: &Path) -> Result<PathBuf, PersistError>
    where
        S: Stream<Item = std::io::Result<B>>,
        B: AsRef<[u8]>,
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(target)
            .await
            .map_err(|source| PersistError::Create {
                path: target.to_path_buf(),
                source,
            })?;

        let write_err = |source| PersistError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut stream = std::pin::pin!(stream);
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(PersistError::Source)?;
            file.write_all(chunk.as_ref()).await.map_err(write_err)?;
            written += chunk.as_ref().len();
        }

        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;

        debug!(path = %target.display(), bytes = written, "snippet staged");
        Ok(target.to_path_buf())
    }

    /// Remove a staged file
    pub async fn discard(&self, target: &Path) -> Result<(), PersistError> {
        fs::remove_file(target)
            .await
            .map_err(|source| PersistError::Remove {
                path: target.to_path_buf(),
                source,
            })?;
        debug!(path = %target.display(), "staged snippet removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = std::io::Result<&'static [u8]>> {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes())).collect::<Vec<_>>())
    }

    #[test]
    fn test_persist_writes_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = StagingStore::new(dir.path());
        let target = store.path_for("abc");

        let path = tokio_test::block_on(store.persist(chunks(&["print(", "6", ")"]), &target))
            .unwrap();

        assert_eq!(path, dir.path().join("abc"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print(6)");
    }

    #[test]
    fn test_persist_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StagingStore::new(dir.path());
        let target = store.path_for("taken");
        std::fs::write(&target, "old").unwrap();

        let err = tokio_test::block_on(store.persist(chunks(&["new"]), &target)).unwrap_err();

        assert!(matches!(err, PersistError::Create { .. }));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
    }

    #[test]
    fn test_source_error_aborts_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = StagingStore::new(dir.path());
        let target = store.path_for("broken");
        let source = stream::iter(vec![
            Ok(b"partial".as_slice()),
            Err(std::io::Error::other("connection reset")),
        ]);

        let err = tokio_test::block_on(store.persist(source, &target)).unwrap_err();
        assert!(matches!(err, PersistError::Source(_)));

        tokio_test::block_on(store.discard(&target)).unwrap();
        assert!(!target.exists());
    }
}
