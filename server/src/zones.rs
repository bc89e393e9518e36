//! File-backed persistence for editor-authored zone documents.
//!
//! One JSON file per zone key under a configurable root directory. Bodies
//! are stored verbatim: the editor round-trips its own JSON byte for byte,
//! and the server never parses what it persists.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fallback key when sanitization strips everything.
const EMPTY_KEY_FALLBACK: &str = "default";

#[derive(Debug, Clone)]
pub struct ZoneStore {
    root: PathBuf,
}

impl ZoneStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strips a zone key down to `[A-Za-z0-9_-]` before it can touch the
    /// filesystem.
    pub fn sanitize_key(key: &str) -> String {
        let sanitized: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if sanitized.is_empty() {
            EMPTY_KEY_FALLBACK.to_string()
        } else {
            sanitized
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", Self::sanitize_key(key)))
    }

    /// Writes the body verbatim, creating the root directory if absent.
    pub fn save(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        fs::write(&path, bytes)?;
        info!("Saved zone {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Reads a zone back; `None` when no file exists for the key (the
    /// caller serves the scaffold instead).
    pub fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Zone {} not on disk, falling back to scaffold", key);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
