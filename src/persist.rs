//! Bitstream persistence.
//!
//! Writes the raw bitstream as plain text, one ASCII `'0'`/`'1'` per
//! bit with no delimiters. The core hands over the in-memory bitstream;
//! file naming and location belong here.
//!
//! Existing files are never overwritten. When `<prefix><stem>.txt` is
//! taken, the writer falls back to `<prefix><stem>-1.txt`, `-2`, and so on.

use crate::config::OutputConfig;
use crate::extraction::Bitstream;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing a bitstream file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The output directory could not be created.
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bitstream file could not be created or written.
    #[error("failed to write bitstream to '{path}': {source}")]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Writes bitstreams into a directory.
#[derive(Debug, Clone)]
pub struct BitsWriter {
    dir: PathBuf,
    prefix: String,
}

impl BitsWriter {
    /// Creates a writer for `dir`, naming files `<prefix><stem>.txt`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates a writer from the output section of the config file.
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.bits_dir, &config.file_prefix)
    }

    /// Preferred path for the bitstream of `source_name`.
    ///
    /// `photo.jpg` becomes `<dir>/<prefix>photo.txt`. [`write`](Self::write)
    /// only uses it if no file exists there yet.
    pub fn path_for(&self, source_name: &str) -> PathBuf {
        self.candidate(source_name, 0)
    }

    fn candidate(&self, source_name: &str, attempt: u32) -> PathBuf {
        let stem = Path::new(source_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "bits".to_string());
        match attempt {
            0 => self.dir.join(format!("{}{}.txt", self.prefix, stem)),
            n => self.dir.join(format!("{}{}-{}.txt", self.prefix, stem, n)),
        }
    }

    /// Writes the bitstream to a fresh file and returns its path.
    pub fn write(&self, source_name: &str, bits: &Bitstream) -> Result<PathBuf, PersistError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PersistError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let ascii = bits.to_ascii();
        let mut attempt = 0u32;
        loop {
            let path = self.candidate(source_name, attempt);
            // create_new makes the existence check and the create one step
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                    continue;
                }
                Err(source) => return Err(PersistError::Write { path, source }),
            };

            file.write_all(&ascii).map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

            tracing::debug!(path = %path.display(), bits = bits.len(), "Wrote bitstream");
            return Ok(path);
        }
    }
}
