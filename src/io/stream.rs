//! The two stream abstractions named in §4.1: a file-backed stream and a
//! bounded in-memory stream, both exposing `(position, size, seek, read,
//! write)` plus thread-safe random access for parallel channel decode.

use crate::error::{PsdError, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Random, thread-safe positional reads shared by both stream kinds. A
/// parallel decode over several channels only needs `&Stream`, never `&mut`,
/// because every read is positional and self-contained.
pub trait RandomAccess: Send + Sync {
    /// Total size in bytes.
    fn size(&self) -> u64;

    /// Read `buf.len()` bytes starting at `offset`, without disturbing any
    /// other reader's position.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

/// A stream backed by an open file. Reads use positional I/O
/// (`pread`/`ReadAt`) so that multiple threads can read disjoint channel
/// payloads concurrently through a single shared handle.
pub struct FileStream {
    file: Arc<File>,
    size: u64,
}

impl FileStream {
    /// Open `path` for positional reading.
    pub fn open(path: impl AsRef<Path>) -> Result<FileStream> {
        let file = File::open(path.as_ref())
            .map_err(|e| PsdError::io("FileStream::open", 0, e))?;
        let size = file
            .metadata()
            .map_err(|e| PsdError::io("FileStream::open", 0, e))?
            .len();
        Ok(FileStream {
            file: Arc::new(file),
            size,
        })
    }

    /// Wrap an already-open file.
    pub fn from_file(file: File) -> Result<FileStream> {
        let size = file
            .metadata()
            .map_err(|e| PsdError::io("FileStream::from_file", 0, e))?
            .len();
        Ok(FileStream {
            file: Arc::new(file),
            size,
        })
    }
}

impl RandomAccess for FileStream {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        read_at_platform(&self.file, offset, buf)
            .map_err(|e| PsdError::io("FileStream::read_at", offset, e))
    }
}

#[cfg(unix)]
fn read_at_platform(file: &File, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_at_platform(file: &File, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    let mut read = 0;
    while read < buf.len() {
        let n = file.seek_read(&mut buf[read..], offset + read as u64)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "short read in FileStream::read_at",
            ));
        }
        read += n;
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn read_at_platform(_file: &File, _offset: u64, _buf: &mut [u8]) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "positional reads are not supported on this platform",
    ))
}

/// A bounded, owned in-memory stream. Used both for whole small files read
/// up front and as the backing store `PhotoshopFile::to_bytes` writes into
/// before it's flushed to disk.
pub struct MemStream {
    bytes: Arc<Vec<u8>>,
}

impl MemStream {
    /// Wrap an owned buffer.
    pub fn new(bytes: Vec<u8>) -> MemStream {
        MemStream {
            bytes: Arc::new(bytes),
        }
    }

    /// Zero-copy view into an arbitrary range, without touching any
    /// position.
    pub fn read_view(&self, offset: u64, len: u64) -> Result<&[u8]> {
        let start = offset as usize;
        let end = start + len as usize;
        if end > self.bytes.len() {
            return Err(PsdError::format(
                "MemStream::read_view",
                offset,
                format!(
                    "requested [{start}, {end}) but buffer is only {} bytes",
                    self.bytes.len()
                ),
            ));
        }
        Ok(&self.bytes[start..end])
    }

    /// Borrow the whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl RandomAccess for MemStream {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let view = self.read_view(offset, buf.len() as u64)?;
        buf.copy_from_slice(view);
        Ok(())
    }
}
