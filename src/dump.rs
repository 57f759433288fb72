//! Raw-frame persistence for matched frames

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to create dump directory {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write frame dump {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Writes matched frames to uniquely named files under one directory
#[derive(Debug)]
pub struct DumpWriter {
    dir: PathBuf,
}

impl DumpWriter {
    /// Create the target directory up front so a bad `dump_dir` fails
    /// at startup instead of once per match.
    pub fn new(dir: &Path) -> Result<Self, DumpError> {
        fs::create_dir_all(dir).map_err(|source| DumpError::Create {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    /// Persist one frame's raw bytes. The filename is deterministic in
    /// (mask_name, frame_index), which is unique per session since the
    /// frame index never repeats.
    pub fn write(&self, mask_name: &str, frame_index: u64, data: &[u8]) -> Result<PathBuf, DumpError> {
        let path = self.dir.join(format!("{mask_name}-{frame_index}.raw"));
        fs::write(&path, data).map_err(|source| DumpError::Write {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Dumped {} bytes to {}", data.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn dump_is_byte_exact_and_unique_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DumpWriter::new(dir.path()).unwrap();

        let a = writer.write("start", 42, &[1, 2, 3]).unwrap();
        let b = writer.write("start", 43, &[4, 5]).unwrap();
        let c = writer.write("stop", 42, &[6]).unwrap();

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(fs::read(&a).unwrap(), vec![1, 2, 3]);
        assert_eq!(fs::read(&b).unwrap(), vec![4, 5]);
        assert_eq!(fs::read(&c).unwrap(), vec![6]);
    }

    #[test]
    fn missing_dump_directory_is_created_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("dumps").join("matched");

        let writer = DumpWriter::new(&nested).unwrap();
        let path = writer.write("start", 0, &[9]).unwrap();

        assert!(path.starts_with(&nested));
        assert_eq!(fs::read(&path).unwrap(), vec![9]);
    }

    #[test]
    fn uncreatable_dump_directory_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        File::create(&blocker).unwrap();

        let err = DumpWriter::new(&blocker.join("dumps")).unwrap_err();
        assert!(matches!(err, DumpError::Create { .. }));
    }

    #[test]
    fn write_failure_after_construction_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dumps");
        let writer = DumpWriter::new(&target).unwrap();

        // Directory vanishing mid-session degrades to per-write errors
        fs::remove_dir_all(&target).unwrap();
        let err = writer.write("start", 0, &[0]).unwrap_err();
        assert!(matches!(err, DumpError::Write { .. }));
    }
}
