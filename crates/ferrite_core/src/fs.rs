//! File-system capability consumed by importers.
//!
//! Importers never touch `std::fs` directly; they go through [`FileSystem`]
//! so companion files (material libraries) can be served from memory in
//! tests or from an embedder's virtual file system.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// An open file.
pub trait FileHandle {
    /// Total size of the file in bytes.
    fn size(&self) -> u64;

    /// Read up to `buf.len()` bytes, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the handle. Dropping it has the same effect.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Minimal file-system interface: existence check and open.
pub trait FileSystem {
    type File: FileHandle;

    fn exists(&self, path: &Path) -> bool;

    fn open(&self, path: &Path) -> io::Result<Self::File>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    type File = F::File;

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn open(&self, path: &Path) -> io::Result<Self::File> {
        (**self).open(path)
    }
}

/// Open `path`, read it completely and close it.
pub fn read_to_end<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> io::Result<Vec<u8>> {
    let mut file = fs.open(path)?;
    let size = usize::try_from(file.size()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is too large to load", path.display()),
        )
    })?;

    let mut buffer = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        match file.read(&mut buffer[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    buffer.truncate(filled);
    file.close();

    Ok(buffer)
}

/// [`FileSystem`] backed by the host operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

/// Handle returned by [`StdFileSystem`].
#[derive(Debug)]
pub struct StdFile {
    file: File,
    size: u64,
}

impl FileHandle for StdFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl FileSystem for StdFileSystem {
    type File = StdFile;

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open(&self, path: &Path) -> io::Result<StdFile> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(StdFile { file, size })
    }
}

/// In-memory [`FileSystem`], keyed by exact path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

/// Handle returned by [`MemoryFileSystem`]; holds its own copy of the bytes.
#[derive(Debug)]
pub struct MemoryFile {
    data: Vec<u8>,
    offset: usize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl FileHandle for MemoryFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.offset..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n;
        Ok(n)
    }
}

impl FileSystem for MemoryFileSystem {
    type File = MemoryFile;

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn open(&self, path: &Path) -> io::Result<MemoryFile> {
        self.files
            .get(path)
            .map(|data| MemoryFile {
                data: data.clone(),
                offset: 0,
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )
            })
    }
}
