//! Little-endian reads over captured RMC payloads.

use crate::error::{Error, Result};

/// Trait for read-only buffer access with primitive reads.
///
/// All read methods use little-endian byte order; RMC payloads never carry
/// big-endian fields.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize;

    /// Checks that `len` bytes are readable at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the range runs past the end.
    #[inline]
    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        let required = offset.checked_add(len).ok_or(Error::OffsetOutOfBounds {
            offset,
            size: self.len(),
        })?;
        if required > self.len() {
            return Err(Error::BufferTooShort {
                required,
                available: self.len(),
            });
        }
        Ok(())
    }

    /// Reads a u8 at the given offset.
    #[inline(always)]
    fn get_u8(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Reads an i8 at the given offset.
    #[inline(always)]
    fn get_i8(&self, offset: usize) -> i8 {
        self.as_slice()[offset] as i8
    }

    /// Reads a u16 in little-endian at the given offset.
    #[inline(always)]
    fn get_u16_le(&self, offset: usize) -> u16 {
        let bytes = &self.as_slice()[offset..offset + 2];
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    /// Reads an i16 in little-endian at the given offset.
    #[inline(always)]
    fn get_i16_le(&self, offset: usize) -> i16 {
        let bytes = &self.as_slice()[offset..offset + 2];
        i16::from_le_bytes([bytes[0], bytes[1]])
    }

    /// Reads a u32 in little-endian at the given offset.
    #[inline(always)]
    fn get_u32_le(&self, offset: usize) -> u32 {
        let bytes = &self.as_slice()[offset..offset + 4];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Reads an i32 in little-endian at the given offset.
    #[inline(always)]
    fn get_i32_le(&self, offset: usize) -> i32 {
        let bytes = &self.as_slice()[offset..offset + 4];
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Reads a u64 in little-endian at the given offset.
    #[inline(always)]
    fn get_u64_le(&self, offset: usize) -> u64 {
        let bytes = &self.as_slice()[offset..offset + 8];
        u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    }

    /// Reads an i64 in little-endian at the given offset.
    #[inline(always)]
    fn get_i64_le(&self, offset: usize) -> i64 {
        self.get_u64_le(offset) as i64
    }

    /// Reads an f64 in little-endian at the given offset.
    #[inline(always)]
    fn get_f64_le(&self, offset: usize) -> f64 {
        f64::from_bits(self.get_u64_le(offset))
    }

    /// Returns a slice of bytes at the given offset and length.
    #[inline(always)]
    fn get_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.as_slice()[offset..offset + len]
    }

    /// Reads `len` bytes as text, dropping the trailing NUL terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; captured payloads are
    /// ASCII in practice.
    #[inline]
    fn get_text(&self, offset: usize, len: usize) -> String {
        let bytes = self.get_bytes(offset, len);
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}

impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}
