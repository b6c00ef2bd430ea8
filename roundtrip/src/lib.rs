pub mod artifact;
pub mod utils;

use artifact::{write_artifact, SourceFile};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use compressor::{Compressor, CompressorError};

#[derive(Debug, Error)]
pub enum RoundTripError {
    #[error("source file {} does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("encoding failed: {0}")]
    Compress(#[source] CompressorError),

    #[error("decoding failed: {0}")]
    Decompress(#[source] CompressorError),
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash_array = [0u8; 32];
    hash_array.copy_from_slice(&result);

    hash_array
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Outcome of comparing decoded bytes with the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub expected_size: usize,
    pub actual_size: usize,
    /// Differing bytes within the length both buffers share.
    pub mismatched_bytes: usize,
    pub expected_digest: [u8; 32],
    pub actual_digest: [u8; 32],
}

impl Verification {
    pub fn compare(original: &[u8], decoded: &[u8]) -> Self {
        let mismatched_bytes = original
            .iter()
            .zip(decoded)
            .filter(|(a, b)| a != b)
            .count();

        Self {
            expected_size: original.len(),
            actual_size: decoded.len(),
            mismatched_bytes,
            expected_digest: sha256(original),
            actual_digest: sha256(decoded),
        }
    }

    pub fn size_matches(&self) -> bool {
        self.expected_size == self.actual_size
    }

    pub fn content_matches(&self) -> bool {
        self.mismatched_bytes == 0
    }

    pub fn is_ok(&self) -> bool {
        self.size_matches() && self.content_matches() && self.expected_digest == self.actual_digest
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub input_size: usize,
    pub encoded_size: usize,
    pub decoded_size: usize,
    pub encode_time: Duration,
    pub decode_time: Duration,
    pub encoded_path: PathBuf,
    pub decoded_path: PathBuf,
    pub verification: Verification,
}

impl Report {
    /// Encoded size as a percentage of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        self.encoded_size as f64 / self.input_size as f64 * 100.0
    }
}

/// Reads a file, encodes it, decodes the result and checks both directions
/// agree, writing each artifact next to the source.
pub struct RoundTrip {
    source: PathBuf,
    compressor: Arc<dyn Compressor>,
}

impl RoundTrip {
    pub fn new(source: &Path, compressor: Arc<dyn Compressor>) -> Self {
        Self {
            source: source.to_path_buf(),
            compressor,
        }
    }

    pub fn encoded_path(&self) -> PathBuf {
        utils::encoded_path(&self.source)
    }

    pub fn decoded_path(&self) -> PathBuf {
        utils::decoded_path(&self.source)
    }

    pub fn run(&self) -> Result<Report, RoundTripError> {
        let source = SourceFile::read(&self.source)?;
        info!(path = %source.path.display(), size = source.size(), "read source");

        let started = Instant::now();
        let encoded = self
            .compressor
            .compress(source.body())
            .map_err(RoundTripError::Compress)?;
        let encode_time = started.elapsed();

        let encoded_path = self.encoded_path();
        write_artifact(&encoded_path, &encoded)?;
        info!(
            codec = self.compressor.name(),
            path = %encoded_path.display(),
            size = encoded.len(),
            "wrote encoded artifact"
        );

        let started = Instant::now();
        let decoded = self
            .compressor
            .decompress(&encoded)
            .map_err(RoundTripError::Decompress)?;
        let decode_time = started.elapsed();

        let decoded_path = self.decoded_path();
        write_artifact(&decoded_path, &decoded)?;
        info!(path = %decoded_path.display(), size = decoded.len(), "wrote decoded artifact");

        let verification = Verification::compare(source.body(), &decoded);
        if !verification.is_ok() {
            warn!(
                expected = verification.expected_size,
                actual = verification.actual_size,
                mismatched = verification.mismatched_bytes,
                "round trip mismatch"
            );
        }

        Ok(Report {
            input_size: source.size(),
            encoded_size: encoded.len(),
            decoded_size: decoded.len(),
            encode_time,
            decode_time,
            encoded_path,
            decoded_path,
            verification,
        })
    }
}

#[cfg(test)]
mod roundtrip_test {
    use super::*;

    #[test]
    fn verification_ok() {
        let v = Verification::compare(b"hello", b"hello");

        assert!(v.is_ok());
        assert_eq!(v.expected_digest, v.actual_digest);
    }

    #[test]
    fn verification_size_mismatch() {
        let v = Verification::compare(b"hello", b"hell");

        assert!(!v.size_matches());
        assert!(v.content_matches());
        assert!(!v.is_ok());
        assert_eq!((v.actual_size, v.expected_size), (4, 5));
    }

    #[test]
    fn verification_content_mismatch() {
        let v = Verification::compare(b"hello", b"jelly");

        assert!(v.size_matches());
        assert_eq!(v.mismatched_bytes, 2);
        assert!(!v.is_ok());
    }

    #[test]
    fn sha256_res() {
        assert_eq!(
            to_hex(&sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn ratio_res() {
        let report = Report {
            input_size: 200,
            encoded_size: 50,
            decoded_size: 200,
            encode_time: Duration::ZERO,
            decode_time: Duration::ZERO,
            encoded_path: PathBuf::new(),
            decoded_path: PathBuf::new(),
            verification: Verification::compare(b"", b""),
        };

        assert_eq!(report.ratio(), 25.0);
    }
}
