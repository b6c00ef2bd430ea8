use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace};

use crate::buffer::OutputBuffer;
use crate::constants::{ALPHABET_SIZE, CODE_WIDTH, MAX_CODE_COUNT};
use crate::{CompressorError, Result};

/// A decoded string, held as a range of the decoder's own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

/// Decoder-side dictionary mapping codes to spans of the output.
///
/// Alphabet codes never get a span; they are written directly.
#[derive(Debug)]
pub struct DecoderDictionary {
    spans: Vec<Option<Span>>,
    next_code: usize,
    generation: usize,
}

impl DecoderDictionary {
    pub fn new() -> Result<Self> {
        let mut spans = Vec::new();
        spans.try_reserve_exact(MAX_CODE_COUNT).map_err(|_| {
            CompressorError::AllocationFailure {
                requested_bytes: MAX_CODE_COUNT * std::mem::size_of::<Option<Span>>(),
            }
        })?;
        spans.resize(MAX_CODE_COUNT, None);

        Ok(Self {
            spans,
            next_code: ALPHABET_SIZE,
            generation: 0,
        })
    }

    pub fn get(&self, code: u16) -> Option<Span> {
        self.spans[code as usize]
    }

    pub fn next_code(&self) -> usize {
        self.next_code
    }

    /// Number of resets so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn push(&mut self, span: Span) {
        self.spans[self.next_code] = Some(span);

        self.next_code += 1;
        if self.next_code == MAX_CODE_COUNT {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.spans[ALPHABET_SIZE..].fill(None);
        self.next_code = ALPHABET_SIZE;
        self.generation += 1;

        debug!(generation = self.generation, "decoder dictionary reset");
    }
}

/// Decodes a sequence of little-endian 16-bit codes produced by [`encode`].
///
/// [`encode`]: super::encode
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut dict = DecoderDictionary::new()?;
    decode_with(&mut dict, input)
}

fn decode_with(dict: &mut DecoderDictionary, input: &[u8]) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Err(CompressorError::InvalidInput {
            reason: "cannot decode empty input",
        });
    }

    if input.len() % CODE_WIDTH != 0 {
        return Err(CompressorError::InvalidInput {
            reason: "encoded length is not a multiple of the code width",
        });
    }

    let mut codes = input
        .chunks_exact(CODE_WIDTH)
        .map(LittleEndian::read_u16)
        .enumerate();

    let Some((_, first)) = codes.next() else {
        return Err(CompressorError::InvalidInput {
            reason: "cannot decode empty input",
        });
    };

    if first as usize >= ALPHABET_SIZE {
        return Err(CompressorError::corrupt_at(
            format!("first code {first} is not a literal byte"),
            0,
        ));
    }

    let mut output = OutputBuffer::with_capacity(input.len())?;
    output.append_u8(first as u8)?;

    // Start of the string written for the previous code.
    let mut previous = 0;

    for (index, code) in codes {
        let start = output.len();

        if (code as usize) < ALPHABET_SIZE {
            output.append_u8(code as u8)?;
        } else {
            match dict.get(code) {
                Some(span) => output.append_span(span.offset, span.length)?,
                // The encoder used the entry it created one step before we can:
                // previous string plus its own first byte.
                None if code as usize == dict.next_code() => {
                    output.append_span(previous, start - previous)?;
                    output.append_span(previous, 1)?;
                }
                None => {
                    return Err(CompressorError::corrupt_at(
                        format!("code {code} is undefined, next code is {}", dict.next_code()),
                        index * CODE_WIDTH,
                    ));
                }
            }
        }

        dict.push(Span {
            offset: previous,
            length: start - previous + 1,
        });

        previous = start;
    }

    trace!(
        input = input.len(),
        output = output.len(),
        resets = dict.generation(),
        "decoded"
    );

    Ok(output.into_vec())
}
