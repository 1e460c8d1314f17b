use std::io;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::{File, OpenOptions};

/// Local copy of one recording, owned by a single pipeline attempt.
///
/// The file is created with exclusive creation and a random name, so concurrent attempts
/// never share it. It is deleted by [`StagedRecording::close`] or, on any other exit path
/// (error, cancellation, panic), when the value is dropped.
#[derive(Debug)]
pub struct StagedRecording {
    path: TempPath,
}

impl StagedRecording {
    pub fn create(staging_dir: &Path, extension: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("recording-")
            .suffix(&format!(".{}", extension))
            .tempfile_in(staging_dir)?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the staged file for writing, discarding anything already in it.
    pub async fn open_for_write(&self) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.path())
            .await
    }

    /// Current size on disk.
    pub async fn len(&self) -> io::Result<u64> {
        Ok(tokio::fs::metadata(self.path()).await?.len())
    }

    /// Delete the file now, reporting failures instead of swallowing them in `Drop`.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_create_write_close() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedRecording::create(dir.path(), "webm").unwrap();

        let name = staged.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".webm"));
        assert_eq!(staged.len().await.unwrap(), 0);

        let mut file = staged.open_for_write().await.unwrap();
        file.write_all(b"audio-bytes").await.unwrap();
        file.flush().await.unwrap();
        drop(file);
        assert_eq!(staged.len().await.unwrap(), 11);

        staged.close().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        {
            let _staged = StagedRecording::create(dir.path(), "mp3").unwrap();
            assert_eq!(entries(dir.path()), 1);
        }
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_concurrent_recordings_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let first = StagedRecording::create(dir.path(), "webm").unwrap();
        let second = StagedRecording::create(dir.path(), "webm").unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_missing_staging_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = StagedRecording::create(&missing, "webm").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
