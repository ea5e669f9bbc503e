//! `bitpack-buffers`: bit-granular cursors over byte buffers.
//!
//! Bits are written and read least-significant-bit first within a byte, and
//! bytes are consumed in increasing index order. There is no padding or
//! alignment between adjacent writes.

mod bit_reader;
mod bit_writer;

pub use bit_reader::BitReader;
pub use bit_writer::BitWriter;

/// Widths up to this many bits go through native `u32` arithmetic.
pub const NATIVE_BITS: u32 = 32;

/// Widths up to this many bits fit a double-precision float without loss and
/// go through `u64` arithmetic. Wider fields use arbitrary precision.
pub const SAFE_INTEGER_BITS: u32 = 53;

/// Largest integer representable in the safe-integer regime, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: i64 = (1 << SAFE_INTEGER_BITS) - 1;

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Error returned by bounds-checked buffer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
}
