use roundtrip::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compressor::{Compressor, CompressorError, Result as CompressorResult, LZW};

use rand::Rng;
use tempfile::{tempdir, TempDir};

/// Decodes correctly but drops the last byte, to exercise mismatch reporting.
struct Truncating;

impl Compressor for Truncating {
    fn compress(&self, src: &[u8]) -> CompressorResult<Vec<u8>> {
        LZW::new().compress(src)
    }

    fn decompress(&self, src: &[u8]) -> CompressorResult<Vec<u8>> {
        let mut decoded = LZW::new().decompress(src)?;
        decoded.pop();
        Ok(decoded)
    }

    fn name(&self) -> &'static str {
        "truncating"
    }
}

fn write_source(dir: &TempDir, name: &str, body: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn lzw() -> Arc<dyn Compressor> {
    Arc::new(LZW::new())
}

#[test]
fn round_trip_text_result() {
    let dir = tempdir().unwrap();
    let body = b"TOBEORNOTTOBEORTOBEORNOT".repeat(100);
    let source = write_source(&dir, "text.txt", &body);

    let report = RoundTrip::new(&source, lzw()).run().unwrap();

    assert_eq!(report.input_size, body.len());
    assert_eq!(report.decoded_size, body.len());
    assert!(report.encoded_size < body.len());
    assert!(report.ratio() < 100.0);
    assert!(report.verification.is_ok());

    assert_eq!(report.encoded_path, dir.path().join("text.txt.lzw"));
    assert_eq!(report.decoded_path, dir.path().join("text.txt.lzw_decoded"));
    assert_eq!(fs::read(&report.encoded_path).unwrap().len(), report.encoded_size);
    assert_eq!(fs::read(&report.decoded_path).unwrap(), body);
}

#[test]
fn round_trip_random_result() {
    let mut rng = rand::thread_rng();
    let dir = tempdir().unwrap();

    let length = rng.gen_range(100..20000);
    let body: Vec<u8> = (0..length).map(|_| rng.gen()).collect();
    let source = write_source(&dir, "random.bin", &body);

    let report = RoundTrip::new(&source, lzw()).run().unwrap();

    assert!(report.verification.is_ok());
    assert!(report.encoded_size <= 2 * body.len());
    assert_eq!(fs::read(&report.decoded_path).unwrap(), body);
}

#[test]
fn round_trip_errors() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.bin");
    let r = RoundTrip::new(&missing, lzw()).run();
    assert!(matches!(r.unwrap_err(), RoundTripError::SourceNotFound(_)));

    let empty = write_source(&dir, "empty.bin", b"");
    let r = RoundTrip::new(&empty, lzw()).run();
    assert!(matches!(
        r.unwrap_err(),
        RoundTripError::Compress(CompressorError::InvalidInput { .. })
    ));
    assert!(!Path::new(&dir.path().join("empty.bin.lzw")).exists());
}

#[test]
fn round_trip_mismatch_reported() {
    let dir = tempdir().unwrap();
    let source = write_source(&dir, "text.txt", b"abcabcabcabc");

    let report = RoundTrip::new(&source, Arc::new(Truncating)).run().unwrap();

    assert!(!report.verification.is_ok());
    assert!(!report.verification.size_matches());
    assert!(report.verification.content_matches());
    assert_eq!(report.decoded_size, 11);
}
