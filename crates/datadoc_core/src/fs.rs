use std::io::Result;
use std::path::Path;

/// Abstraction over filesystem operations
/// Allows for different implementations: real filesystem, in-memory (for tests), etc.
pub trait FileSystem {
    /// Reads the whole file content
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replaces a file's content.
    ///
    /// Implementations must not leave a partially written file behind: readers see either
    /// the old content or the new content.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates a file ONLY if it doesn't exist.
    /// Should return an error if file exists.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    /// Checks if a file exists
    fn exists(&self, path: &Path) -> bool;
}

// Blanket implementation for references to FileSystem
impl<T: FileSystem> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (*self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        (*self).write_file(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        (*self).create_new(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }
}

// ============================================================================
// RealFileSystem - Only available on non-WASM targets
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
use std::fs::{self, OpenOptions};
#[cfg(not(target_arch = "wasm32"))]
use std::io::{Error, ErrorKind, Write};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Default)]
/// Maps to std::fs, replacing files through a sibling temp file and a rename
pub struct RealFileSystem;

#[cfg(not(target_arch = "wasm32"))]
/// Sibling path used while a file is being replaced.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Not a file path: {}", path.display()),
        )
    })?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

#[cfg(not(target_arch = "wasm32"))]
impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let temp = temp_path(path)?;
        let written = (|| -> Result<()> {
            let mut file = fs::File::create(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        fs::rename(&temp, path)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        // This atomic check prevents race conditions
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content.as_bytes())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
