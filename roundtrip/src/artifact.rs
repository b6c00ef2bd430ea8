use std::fs;
use std::path::{Path, PathBuf};

use super::RoundTripError;

/// A file read fully into memory.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    body: Vec<u8>,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self, RoundTripError> {
        if !path.exists() { return Err(RoundTripError::SourceNotFound(path.to_path_buf())) };

        let metadata = fs::metadata(path).map_err(|source| RoundTripError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() { return Err(RoundTripError::NotAFile(path.to_path_buf())) };

        let body = fs::read(path).map_err(|source| RoundTripError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            body,
        })
    }

    pub fn new(path: PathBuf, body: Vec<u8>) -> SourceFile {
        Self { path, body }
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn take_body(self) -> Vec<u8> {
        self.body
    }
}

pub fn write_artifact(path: &Path, data: &[u8]) -> Result<(), RoundTripError> {
    fs::write(path, data).map_err(|source| RoundTripError::Write {
        path: path.to_path_buf(),
        source,
    })
}
