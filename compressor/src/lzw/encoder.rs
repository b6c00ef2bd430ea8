use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::buffer::OutputBuffer;
use crate::constants::{ALPHABET_SIZE, MAX_CODE_COUNT};
use crate::{CompressorError, Result};

/// One dictionary string: its last byte, the code of everything before it,
/// and the links of the binary tree holding the strings that extend it.
#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    character: u8,
    prefix: Option<u16>,
    first: Option<u16>,
    left: Option<u16>,
    right: Option<u16>,
}

/// Where a missing `(prefix, character)` entry gets linked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First(u16),
    Left(u16),
    Right(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    Found(u16),
    Vacant(Slot),
}

/// Encoder-side dictionary: a fixed arena of entries addressed by code.
///
/// The children of each code form an intrusive binary search tree ordered by
/// `character`, rooted at that code's `first` link.
#[derive(Debug)]
pub struct EncoderDictionary {
    entries: Vec<Entry>,
    next_code: usize,
    generation: usize,
}

impl EncoderDictionary {
    pub fn new() -> Result<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(MAX_CODE_COUNT).map_err(|_| {
            CompressorError::AllocationFailure {
                requested_bytes: MAX_CODE_COUNT * std::mem::size_of::<Entry>(),
            }
        })?;
        entries.resize(MAX_CODE_COUNT, Entry::default());

        let mut dict = Self {
            entries,
            next_code: ALPHABET_SIZE,
            generation: 0,
        };
        dict.init_alphabet();

        Ok(dict)
    }

    fn init_alphabet(&mut self) {
        for (i, entry) in self.entries[..ALPHABET_SIZE].iter_mut().enumerate() {
            *entry = Entry {
                character: i as u8,
                ..Entry::default()
            };
        }
    }

    pub fn next_code(&self) -> usize {
        self.next_code
    }

    /// Number of resets so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn search(&self, prefix: u16, character: u8) -> Search {
        let mut index = match self.entries[prefix as usize].first {
            Some(index) => index,
            None => return Search::Vacant(Slot::First(prefix)),
        };

        loop {
            let entry = &self.entries[index as usize];
            let (child, slot) = match character.cmp(&entry.character) {
                Ordering::Equal => return Search::Found(index),
                Ordering::Less => (entry.left, Slot::Left(index)),
                Ordering::Greater => (entry.right, Slot::Right(index)),
            };

            match child {
                Some(next) => index = next,
                None => return Search::Vacant(slot),
            }
        }
    }

    /// Code of the string `prefix + character`, if the dictionary holds it.
    pub fn find(&self, prefix: u16, character: u8) -> Option<u16> {
        match self.search(prefix, character) {
            Search::Found(code) => Some(code),
            Search::Vacant(_) => None,
        }
    }

    fn insert(&mut self, slot: Slot, prefix: u16, character: u8) {
        debug_assert!(self.next_code < MAX_CODE_COUNT);
        let code = self.next_code as u16;

        self.entries[code as usize] = Entry {
            character,
            prefix: Some(prefix),
            ..Entry::default()
        };

        match slot {
            Slot::First(parent) => self.entries[parent as usize].first = Some(code),
            Slot::Left(parent) => self.entries[parent as usize].left = Some(code),
            Slot::Right(parent) => self.entries[parent as usize].right = Some(code),
        }

        self.next_code += 1;
        if self.next_code == MAX_CODE_COUNT {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.init_alphabet();
        self.next_code = ALPHABET_SIZE;
        self.generation += 1;

        debug!(generation = self.generation, "encoder dictionary reset");
    }

    /// Rebuilds the bytes a code stands for in the current generation.
    pub fn expand(&self, code: u16) -> Option<Vec<u8>> {
        if code as usize >= self.next_code {
            return None;
        }

        let mut bytes = Vec::new();
        let mut cursor = Some(code);
        while let Some(index) = cursor {
            let entry = &self.entries[index as usize];
            bytes.push(entry.character);
            cursor = entry.prefix;
        }
        bytes.reverse();

        Some(bytes)
    }
}

/// Encodes `input` into a sequence of little-endian 16-bit codes.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut dict = EncoderDictionary::new()?;
    encode_with(&mut dict, input)
}

fn encode_with(dict: &mut EncoderDictionary, input: &[u8]) -> Result<Vec<u8>> {
    let (&first, rest) = input.split_first().ok_or(CompressorError::InvalidInput {
        reason: "cannot encode empty input",
    })?;

    let mut output = OutputBuffer::with_capacity(input.len())?;
    let mut cursor = u16::from(first);

    for &character in rest {
        match dict.search(cursor, character) {
            Search::Found(code) => cursor = code,
            Search::Vacant(slot) => {
                output.append_u16(cursor)?;
                dict.insert(slot, cursor, character);
                cursor = u16::from(character);
            }
        }
    }

    output.append_u16(cursor)?;

    trace!(
        input = input.len(),
        output = output.len(),
        resets = dict.generation(),
        "encoded"
    );

    Ok(output.into_vec())
}
