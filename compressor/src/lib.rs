pub mod buffer;
pub mod constants;
pub mod lzw;

pub use lzw::LZW;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompressorError>;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CompressorError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("corrupt stream: {message} at offset {offset}")]
    CorruptStream { offset: usize, message: String },

    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    AllocationFailure { requested_bytes: usize },
}

impl CompressorError {
    pub fn corrupt_at(message: impl Into<String>, offset: usize) -> Self {
        CompressorError::CorruptStream {
            offset,
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CompressorError::InvalidInput { .. })
    }

    pub fn is_corrupt_stream(&self) -> bool {
        matches!(self, CompressorError::CorruptStream { .. })
    }
}

/// A whole-buffer codec. Implementations keep no state between calls, so a
/// single instance can be shared behind an `Arc<dyn Compressor>`.
pub trait Compressor: Send + Sync {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>>;
    fn name(&self) -> &'static str;
}
