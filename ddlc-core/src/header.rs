//! Length and count prefixes used by RMC variable-size types.
//!
//! This module provides the two prefix shapes found on the wire:
//! - [`LengthPrefix`] - 2-byte length before strings, station URLs and buffers
//! - [`CountPrefix`] - 4-byte element count before lists and maps

use crate::buffer::ReadBuffer;
use crate::error::Result;

/// Length prefix of a string or buffer (2 bytes).
///
/// # Wire Format
/// ```text
/// +0: length (u16, 2 bytes)
/// +2: data   (length bytes)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthPrefix {
    /// Length of the data that follows, in bytes.
    pub length: u16,
}

impl LengthPrefix {
    /// Encoded length of the prefix in bytes.
    pub const ENCODED_LENGTH: usize = 2;

    /// Creates a new length prefix.
    #[must_use]
    pub const fn new(length: u16) -> Self {
        Self { length }
    }

    /// Decodes the prefix at the given offset.
    ///
    /// # Panics
    /// Panics if the buffer is too short.
    #[inline(always)]
    #[must_use]
    pub fn wrap<B: ReadBuffer + ?Sized>(buffer: &B, offset: usize) -> Self {
        Self {
            length: buffer.get_u16_le(offset),
        }
    }

    /// Decodes the prefix at the given offset, checking bounds first.
    ///
    /// # Errors
    /// Returns an error if fewer than two bytes remain.
    #[inline]
    pub fn read<B: ReadBuffer + ?Sized>(buffer: &B, offset: usize) -> Result<Self> {
        buffer.check_range(offset, Self::ENCODED_LENGTH)?;
        Ok(Self::wrap(buffer, offset))
    }
}

/// Element count of a list or map (4 bytes).
///
/// # Wire Format
/// ```text
/// +0: count (u32, 4 bytes)
/// +4: count elements (or key/value pairs)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountPrefix {
    /// Number of elements that follow.
    pub count: u32,
}

impl CountPrefix {
    /// Encoded length of the prefix in bytes.
    pub const ENCODED_LENGTH: usize = 4;

    /// Creates a new count prefix.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }

    /// Decodes the prefix at the given offset.
    ///
    /// # Panics
    /// Panics if the buffer is too short.
    #[inline(always)]
    #[must_use]
    pub fn wrap<B: ReadBuffer + ?Sized>(buffer: &B, offset: usize) -> Self {
        Self {
            count: buffer.get_u32_le(offset),
        }
    }

    /// Decodes the prefix at the given offset, checking bounds first.
    ///
    /// # Errors
    /// Returns an error if fewer than four bytes remain.
    #[inline]
    pub fn read<B: ReadBuffer + ?Sized>(buffer: &B, offset: usize) -> Result<Self> {
        buffer.check_range(offset, Self::ENCODED_LENGTH)?;
        Ok(Self::wrap(buffer, offset))
    }
}
