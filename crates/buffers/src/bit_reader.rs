//! Bit-granular buffer reader.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{BufferError, NATIVE_BITS};

/// A sequential LSB-first bit reader over a byte slice.
///
/// Every read is bounds-checked; reading past the last bit of the slice
/// returns [`BufferError::EndOfBuffer`] and leaves the cursor unchanged.
///
/// # Example
///
/// ```
/// use bitpack_buffers::BitReader;
///
/// let data = [0xff, 0x03];
/// let mut reader = BitReader::new(&data);
/// assert_eq!(reader.bit(), Ok(true));
/// assert_eq!(reader.bits_u32(9), Ok(0x1ff));
/// ```
pub struct BitReader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position, in bits.
    pub x: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new reader positioned at the first bit of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.uint8 = uint8;
        self.x = 0;
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bits left in the buffer.
    pub fn remaining(&self) -> usize {
        self.uint8.len() * 8 - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn take(&mut self) -> bool {
        let bit = (self.uint8[self.x >> 3] >> (self.x & 7)) & 1 == 1;
        self.x += 1;
        bit
    }

    #[inline]
    fn is_aligned(&self, n: u32) -> bool {
        n % 8 == 0 && self.x % 8 == 0
    }

    /// Copies `n / 8` whole bytes at a byte-aligned cursor.
    fn aligned_bytes(&mut self, n: u32) -> &'a [u8] {
        let start = self.x >> 3;
        let end = start + (n / 8) as usize;
        self.x += n as usize;
        &self.uint8[start..end]
    }

    /// Reads a single bit.
    #[inline]
    pub fn bit(&mut self) -> Result<bool, BufferError> {
        self.check(1)?;
        Ok(self.take())
    }

    /// Reads `n <= 32` bits as an unsigned integer.
    pub fn bits_u32(&mut self, n: u32) -> Result<u32, BufferError> {
        debug_assert!(n <= NATIVE_BITS);
        self.check(n as usize)?;
        if self.is_aligned(n) {
            let mut buf = [0u8; 4];
            let bytes = self.aligned_bytes(n);
            buf[..bytes.len()].copy_from_slice(bytes);
            return Ok(u32::from_le_bytes(buf));
        }
        let mut value = 0u32;
        for i in 0..n {
            if self.take() {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Reads `n <= 64` bits as an unsigned integer.
    pub fn bits_u64(&mut self, n: u32) -> Result<u64, BufferError> {
        debug_assert!(n <= 64);
        self.check(n as usize)?;
        if self.is_aligned(n) {
            let mut buf = [0u8; 8];
            let bytes = self.aligned_bytes(n);
            buf[..bytes.len()].copy_from_slice(bytes);
            return Ok(u64::from_le_bytes(buf));
        }
        if n <= NATIVE_BITS {
            return Ok(u64::from(self.bits_u32(n)?));
        }
        let low = u64::from(self.bits_u32(NATIVE_BITS)?);
        let high = u64::from(self.bits_u32(n - NATIVE_BITS)?);
        Ok(low | (high << NATIVE_BITS))
    }

    /// Reads `n` bits as an arbitrary-precision unsigned integer.
    pub fn bits_big(&mut self, n: u32) -> Result<BigUint, BufferError> {
        self.check(n as usize)?;
        if self.is_aligned(n) {
            return Ok(BigUint::from_bytes_le(self.aligned_bytes(n)));
        }
        let mut value = BigUint::zero();
        for i in 0..n {
            if self.take() {
                value.set_bit(u64::from(i), true);
            }
        }
        Ok(value)
    }
}
