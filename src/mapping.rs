//! Memory-mapping facility
//!
//! Presents the backing file as one contiguous mutable byte region. Writes
//! to the region are visible to reads within the process immediately and
//! reach the file via the OS page cache (or an explicit [`Mapping::flush`]).
//!
//! The mapping never grows behind the caller's back: [`Mapping::grow`] is
//! the only way the region gets longer, and it remaps.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::error::Result;

/// A file-backed mutable byte region
pub struct Mapping {
    file: std::fs::File,
    mmap: MmapMut,
    path: PathBuf,
}

impl Mapping {
    /// Open or create `path` and map it read-write.
    ///
    /// If the file is shorter than `min_len` bytes it is zero-extended first,
    /// so a freshly created file starts out as all zeroes.
    pub fn open(path: &Path, min_len: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_len = file.metadata()?.len();
        if file_len < min_len {
            tracing::debug!(
                path = %path.display(),
                from = file_len,
                to = min_len,
                "extending backing file"
            );
            file.set_len(min_len)?;
        }

        // Safety: the file is opened read-write by this process; the core's
        // single-writer contract (no other mutator of the file) is what makes
        // the aliasing sound.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            file,
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Length of the mapped region in bytes (== current file length)
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// The whole region, read-only
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// The whole region, writable
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Zero-extend the file to `new_len` bytes and remap.
    ///
    /// A no-op when the region is already at least that long.
    pub fn grow(&mut self, new_len: u64) -> Result<()> {
        if (self.mmap.len() as u64) >= new_len {
            return Ok(());
        }

        tracing::info!(
            path = %self.path.display(),
            from = self.mmap.len(),
            to = new_len,
            "growing mapping"
        );

        // Flush before dropping the old view, then remap at the new length.
        self.mmap.flush()?;
        self.file.set_len(new_len)?;
        self.mmap = unsafe { MmapMut::map_mut(&self.file)? };

        Ok(())
    }

    /// Flush dirty pages to the backing file
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }
}
