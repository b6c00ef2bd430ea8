//! Append-only byte sink shared by the encoder and the decoder.
//!
//! Content is addressed by offset, never by reference: the storage may move
//! when it grows, but bytes already written keep their logical offsets. The
//! decoder relies on this to keep dictionary entries as `(offset, length)`
//! spans into its own output.

use byteorder::{ByteOrder, LittleEndian};

use super::{CompressorError, Result};

#[derive(Debug)]
pub struct OutputBuffer {
    storage: Vec<u8>,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| CompressorError::AllocationFailure { requested_bytes: capacity })?;

        Ok(Self { storage })
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.storage
    }

    /// Makes room for `additional` more bytes, at least doubling the capacity
    /// whenever it has to grow.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let length = self.storage.len();
        let required = length
            .checked_add(additional)
            .ok_or(CompressorError::AllocationFailure { requested_bytes: usize::MAX })?;

        let capacity = self.storage.capacity();
        if required <= capacity {
            return Ok(());
        }

        let target = required.max(capacity.saturating_mul(2));
        self.storage
            .try_reserve_exact(target - length)
            .map_err(|_| CompressorError::AllocationFailure { requested_bytes: target })
    }

    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        self.reserve(data.len())?;
        self.storage.extend_from_slice(data);
        Ok(())
    }

    pub fn append_u8(&mut self, value: u8) -> Result<()> {
        self.append(&[value])
    }

    pub fn append_u16(&mut self, value: u16) -> Result<()> {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.append(&bytes)
    }

    /// Appends a copy of `length` bytes already written at `offset`.
    pub fn append_span(&mut self, offset: usize, length: usize) -> Result<()> {
        let written = self.storage.len();
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= written)
            .ok_or_else(|| {
                CompressorError::corrupt_at(
                    format!("span of {length} bytes runs past {written} written bytes"),
                    offset,
                )
            })?;

        if length == 0 {
            return Ok(());
        }

        self.reserve(length)?;
        self.storage.extend_from_within(offset..end);
        Ok(())
    }
}

#[cfg(test)]
mod buffer_test {
    use super::*;

    #[test]
    fn zero_capacity_is_raised() {
        let buffer = OutputBuffer::with_capacity(0).unwrap();

        assert!(buffer.capacity() >= 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn growth_at_least_doubles() {
        let mut buffer = OutputBuffer::with_capacity(4).unwrap();
        buffer.append(&[1, 2, 3]).unwrap();
        let before = buffer.capacity();

        buffer.append(&[4, 5, 6]).unwrap();

        assert!(buffer.capacity() >= 2 * before);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn growth_covers_large_writes() {
        let mut buffer = OutputBuffer::with_capacity(2).unwrap();
        let data = vec![7u8; 100];

        buffer.append(&data).unwrap();

        assert!(buffer.capacity() >= 100);
        assert_eq!(buffer.len(), 100);
    }

    #[test]
    fn u16_is_little_endian() {
        let mut buffer = OutputBuffer::with_capacity(1).unwrap();

        buffer.append_u16(0x0102).unwrap();
        buffer.append_u8(0xff).unwrap();

        assert_eq!(buffer.into_vec(), vec![0x02, 0x01, 0xff]);
    }

    #[test]
    fn span_copies_earlier_bytes() {
        let mut buffer = OutputBuffer::with_capacity(1).unwrap();
        buffer.append(b"abc").unwrap();

        buffer.append_span(1, 2).unwrap();
        buffer.append_span(0, 5).unwrap();

        assert_eq!(buffer.as_slice(), b"abcbcabcbc");
    }

    #[test]
    fn span_out_of_range() {
        let mut buffer = OutputBuffer::with_capacity(8).unwrap();
        buffer.append(b"abc").unwrap();

        let r = buffer.append_span(2, 2);
        assert!(r.unwrap_err().is_corrupt_stream());

        let r = buffer.append_span(usize::MAX, 2);
        assert!(r.unwrap_err().is_corrupt_stream());

        assert_eq!(buffer.as_slice(), b"abc");
    }

    #[test]
    fn empty_writes_are_noops() {
        let mut buffer = OutputBuffer::with_capacity(1).unwrap();

        buffer.append(&[]).unwrap();
        buffer.append_span(0, 0).unwrap();

        assert!(buffer.is_empty());
    }
}
