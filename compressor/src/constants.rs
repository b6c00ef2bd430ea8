/// Number of distinct 16-bit codes; reaching it resets the dictionary.
pub const MAX_CODE_COUNT: usize = 1 << 16;

/// Codes below this value stand for the single byte of the same value.
pub const ALPHABET_SIZE: usize = 256;

/// Width of one code on the wire, in bytes.
pub const CODE_WIDTH: usize = 2;
