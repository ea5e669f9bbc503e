//! Bit-granular buffer writer.

use std::collections::TryReserveError;

use num_bigint::BigUint;

use crate::{bytes_for_bits, NATIVE_BITS};

/// A sequential LSB-first bit writer over a zero-initialized byte buffer.
///
/// The buffer is normally pre-sized with [`BitWriter::with_bits`] from a
/// size computation pass, but grows on demand when it is not.
///
/// # Example
///
/// ```
/// use bitpack_buffers::BitWriter;
///
/// let mut writer = BitWriter::with_bits(10);
/// writer.bit(true);
/// writer.bits_u32(9, 0x1ff);
/// assert_eq!(writer.flush(), [0xff, 0x03]);
/// ```
pub struct BitWriter {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Current cursor position, in bits.
    pub x: usize,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    /// Creates an empty writer that grows as bits are written.
    pub fn new() -> Self {
        Self::with_bits(0)
    }

    /// Creates a writer whose buffer holds exactly `bits` bits.
    pub fn with_bits(bits: usize) -> Self {
        Self {
            uint8: vec![0u8; bytes_for_bits(bits)],
            x: 0,
        }
    }

    /// Like [`BitWriter::with_bits`], but reports allocation failure instead
    /// of aborting.
    pub fn try_with_bits(bits: usize) -> Result<Self, TryReserveError> {
        let bytes = bytes_for_bits(bits);
        let mut uint8 = Vec::new();
        uint8.try_reserve_exact(bytes)?;
        uint8.resize(bytes, 0);
        Ok(Self { uint8, x: 0 })
    }

    /// Number of bits written so far.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Ensures `bits` more bits fit after the cursor.
    pub fn ensure_capacity(&mut self, bits: usize) {
        let required = bytes_for_bits(self.x + bits);
        if required > self.uint8.len() {
            self.uint8.resize(required, 0);
        }
    }

    /// Returns the written bytes and resets the writer.
    ///
    /// The result is exactly `ceil(position / 8)` bytes long; unused high
    /// bits of the last byte are zero.
    pub fn flush(&mut self) -> Vec<u8> {
        let mut data = std::mem::take(&mut self.uint8);
        data.truncate(bytes_for_bits(self.x));
        self.x = 0;
        data
    }

    #[inline]
    fn put(&mut self, bit: bool) {
        if bit {
            self.uint8[self.x >> 3] |= 1 << (self.x & 7);
        }
        self.x += 1;
    }

    #[inline]
    fn is_aligned(&self, n: u32) -> bool {
        n % 8 == 0 && self.x % 8 == 0
    }

    /// Writes a single bit.
    #[inline]
    pub fn bit(&mut self, bit: bool) {
        self.ensure_capacity(1);
        self.put(bit);
    }

    /// Writes whole bytes, copying directly when the cursor is byte-aligned.
    pub fn bytes(&mut self, buf: &[u8]) {
        self.ensure_capacity(buf.len() * 8);
        if self.x % 8 == 0 {
            let start = self.x >> 3;
            self.uint8[start..start + buf.len()].copy_from_slice(buf);
            self.x += buf.len() * 8;
            return;
        }
        for byte in buf {
            for i in 0..8 {
                self.put((byte >> i) & 1 == 1);
            }
        }
    }

    /// Writes the low `n` bits of `value`, `n <= 32`.
    pub fn bits_u32(&mut self, n: u32, value: u32) {
        debug_assert!(n <= NATIVE_BITS);
        if self.is_aligned(n) {
            self.bytes(&value.to_le_bytes()[..(n / 8) as usize]);
            return;
        }
        self.ensure_capacity(n as usize);
        for i in 0..n {
            self.put((value >> i) & 1 == 1);
        }
    }

    /// Writes the low `n` bits of `value`, `n <= 64`.
    pub fn bits_u64(&mut self, n: u32, value: u64) {
        debug_assert!(n <= 64);
        if self.is_aligned(n) {
            self.bytes(&value.to_le_bytes()[..(n / 8) as usize]);
        } else if n <= NATIVE_BITS {
            self.bits_u32(n, value as u32);
        } else {
            self.bits_u32(NATIVE_BITS, value as u32);
            self.bits_u32(n - NATIVE_BITS, (value >> NATIVE_BITS) as u32);
        }
    }

    /// Writes the low `n` bits of an arbitrary-precision `value`.
    pub fn bits_big(&mut self, n: u32, value: &BigUint) {
        if self.is_aligned(n) {
            let mut bytes = value.to_bytes_le();
            bytes.resize((n / 8) as usize, 0);
            self.bytes(&bytes);
            return;
        }
        self.ensure_capacity(n as usize);
        for i in 0..n {
            self.put(value.bit(u64::from(i)));
        }
    }
}
