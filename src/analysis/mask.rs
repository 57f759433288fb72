//! Reference image library, memory-mapped and frozen after load

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("failed to load mask {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One reference image, read-only for the process lifetime
pub struct Mask {
    name: String,
    map: Mmap,
}

impl Mask {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Ordered mask collection; load order determines match-emission order
#[derive(Default)]
pub struct MaskStore {
    masks: Vec<Mask>,
}

impl MaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a mask file and append it. Duplicate names are allowed and
    /// compared independently.
    pub fn load(&mut self, path: &Path) -> Result<(), MaskError> {
        let wrap = |source| MaskError::Load {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(&wrap)?;
        // SAFETY: masks are treated as immutable inputs; mutation of the
        // underlying file during a scan is outside the supported contract.
        let map = unsafe { Mmap::map(&file) }.map_err(&wrap)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!("Loaded mask {} ({} bytes)", name, map.len());
        self.masks.push(Mask { name, map });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
