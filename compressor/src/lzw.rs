mod decoder;
mod encoder;

pub use decoder::{decode, DecoderDictionary, Span};
pub use encoder::{encode, EncoderDictionary};

use super::Compressor;
use super::Result;

/// LZW with fixed 16-bit codes and a dictionary that resets once all 65536
/// codes are taken. The output carries no header; its length is the only
/// delimiter.
#[derive(Debug, Default, Clone, Copy)]
pub struct LZW;

impl LZW {
    pub fn new() -> LZW {
        LZW
    }

    pub fn compress(&self, src: &[u8]) -> Result<Vec<u8>> {
        Compressor::compress(self, src)
    }

    pub fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        Compressor::decompress(self, src)
    }
}

impl Compressor for LZW {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>> {
        encode(src)
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        decode(src)
    }

    fn name(&self) -> &'static str {
        "lzw"
    }
}
