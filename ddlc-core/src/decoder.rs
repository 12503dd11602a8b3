//! Decode instructions and a reference decoder.
//!
//! A [`DecodeOp`] sequence is the byte-layout of a method's request or
//! response: the code generator renders it as dissector source, and
//! [`Decoder`] executes it directly against a captured payload.

use crate::buffer::ReadBuffer;
use crate::error::{Error, Result};
use crate::header::{CountPrefix, LengthPrefix};
use crate::wire::{WireType, Width};
use std::fmt;

/// One decode instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOp {
    /// Read one scalar into the named field.
    Scalar {
        /// Field identifier the value is recorded under.
        field: String,
        /// Wire type of the value.
        wire: WireType,
    },
    /// Read a u32 count, then run `body` that many times.
    Repeat {
        /// Instructions for one element (or one key/value pair).
        body: Vec<DecodeOp>,
    },
    /// A field whose layout could not be generated.
    Unresolved {
        /// Qualified field name.
        field: String,
        /// Why the field could not be generated.
        reason: String,
    },
}

impl DecodeOp {
    /// Creates a scalar instruction.
    pub fn scalar(field: impl Into<String>, wire: WireType) -> Self {
        Self::Scalar {
            field: field.into(),
            wire,
        }
    }

    /// Creates an unresolved placeholder.
    pub fn unresolved(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unresolved {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A decoded scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Unsigned integer.
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// Floating point.
    Double(f64),
    /// Raw fixed-point date/time.
    DateTime(u32),
    /// Result code.
    QResult(u32),
    /// Text (strings and station URLs).
    Text(String),
    /// Opaque bytes.
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "datetime({v:#010x})"),
            Self::QResult(v) if *v == crate::wire::QRESULT_SUCCESS => write!(f, "Ok"),
            Self::QResult(v) => write!(f, "{v:#x}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => {
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// A field read by the [`Decoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// Field identifier.
    pub field: String,
    /// Offset of the value (after any length prefix).
    pub offset: usize,
    /// Length of the value in bytes.
    pub length: usize,
    /// Decoded value.
    pub value: FieldValue,
}

/// Reference decoder: runs decode instructions over a buffer.
///
/// Every instruction advances the cursor by exactly the number of bytes
/// its type occupies, the same way the generated dissector does.
pub struct Decoder<'a, B: ReadBuffer + ?Sized> {
    buffer: &'a B,
    offset: usize,
    fields: Vec<DecodedField>,
}

impl<'a, B: ReadBuffer + ?Sized> Decoder<'a, B> {
    /// Wraps a buffer, starting at offset zero.
    #[must_use]
    pub fn new(buffer: &'a B) -> Self {
        Self {
            buffer,
            offset: 0,
            fields: Vec::new(),
        }
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Consumes the decoder, returning the decoded fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<DecodedField> {
        self.fields
    }

    /// Runs a sequence of instructions.
    ///
    /// # Errors
    /// Returns an error if the buffer ends early or a placeholder is reached.
    pub fn decode(&mut self, ops: &[DecodeOp]) -> Result<()> {
        for op in ops {
            self.decode_op(op)?;
        }
        Ok(())
    }

    fn decode_op(&mut self, op: &DecodeOp) -> Result<()> {
        match op {
            DecodeOp::Scalar { field, wire } => self.decode_scalar(field, *wire),
            DecodeOp::Repeat { body } => {
                let prefix = CountPrefix::read(self.buffer, self.offset)?;
                self.offset += CountPrefix::ENCODED_LENGTH;
                for _ in 0..prefix.count {
                    let start = self.offset;
                    self.decode(body)?;
                    // Nothing consumed means every remaining pass is identical.
                    if self.offset == start {
                        break;
                    }
                }
                Ok(())
            }
            DecodeOp::Unresolved { field, reason } => Err(Error::Unresolved {
                field: field.clone(),
                reason: reason.clone(),
            }),
        }
    }

    fn decode_scalar(&mut self, field: &str, wire: WireType) -> Result<()> {
        let (offset, length) = match wire.width() {
            Width::Unwrapped => return Ok(()),
            Width::Fixed(size) => (self.offset, size),
            Width::LengthPrefixed => {
                let prefix = LengthPrefix::read(self.buffer, self.offset)?;
                (
                    self.offset + LengthPrefix::ENCODED_LENGTH,
                    prefix.length as usize,
                )
            }
        };
        self.buffer.check_range(offset, length)?;

        let value = self.read_value(wire, offset, length);
        self.fields.push(DecodedField {
            field: field.to_string(),
            offset,
            length,
            value,
        });
        self.offset = offset + length;
        Ok(())
    }

    fn read_value(&self, wire: WireType, offset: usize, length: usize) -> FieldValue {
        let buf = self.buffer;
        match wire {
            WireType::Bool => FieldValue::Bool(buf.get_u8(offset) != 0),
            WireType::Byte | WireType::Uint8 => FieldValue::Unsigned(u64::from(buf.get_u8(offset))),
            WireType::Int8 => FieldValue::Signed(i64::from(buf.get_i8(offset))),
            WireType::Uint16 => FieldValue::Unsigned(u64::from(buf.get_u16_le(offset))),
            WireType::Int16 => FieldValue::Signed(i64::from(buf.get_i16_le(offset))),
            WireType::Uint32 => FieldValue::Unsigned(u64::from(buf.get_u32_le(offset))),
            WireType::Int32 => FieldValue::Signed(i64::from(buf.get_i32_le(offset))),
            WireType::Uint64 => FieldValue::Unsigned(buf.get_u64_le(offset)),
            WireType::Int64 => FieldValue::Signed(buf.get_i64_le(offset)),
            WireType::Double => FieldValue::Double(buf.get_f64_le(offset)),
            WireType::DateTime => FieldValue::DateTime(buf.get_u32_le(offset)),
            WireType::QResult => FieldValue::QResult(buf.get_u32_le(offset)),
            WireType::String | WireType::StationUrl => {
                FieldValue::Text(buf.get_text(offset, length))
            }
            WireType::Buffer | WireType::Variant => {
                FieldValue::Bytes(buf.get_bytes(offset, length).to_vec())
            }
        }
    }
}

/// Decodes a whole payload, returning the fields and the bytes consumed.
///
/// # Errors
/// Returns an error if the buffer ends early or a placeholder is reached.
pub fn decode_payload<B: ReadBuffer + ?Sized>(
    ops: &[DecodeOp],
    buffer: &B,
) -> Result<(Vec<DecodedField>, usize)> {
    let mut decoder = Decoder::new(buffer);
    decoder.decode(ops)?;
    let consumed = decoder.offset();
    Ok((decoder.into_fields(), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_length(len: u16, tail: usize) -> Vec<u8> {
        let mut buf = len.to_le_bytes().to_vec();
        buf.resize(2 + tail, 0xAA);
        buf
    }

    fn with_count(n: u32, tail: usize) -> Vec<u8> {
        let mut buf = n.to_le_bytes().to_vec();
        buf.resize(4 + tail, 0);
        buf
    }

    fn consumed(ops: &[DecodeOp], buf: &[u8]) -> usize {
        decode_payload(ops, buf).expect("decodes").1
    }

    #[test]
    fn test_fixed_scalars_advance_by_width() {
        for wire in WireType::ALL {
            if let Width::Fixed(size) = wire.width() {
                let buf = vec![0u8; size + 3];
                let ops = [DecodeOp::scalar("f", wire)];
                assert_eq!(consumed(&ops, &buf), size, "{wire}");
            }
        }
    }

    #[test]
    fn test_length_prefixed_advance_by_prefix_plus_length() {
        for wire in [WireType::String, WireType::StationUrl, WireType::Buffer] {
            for len in [0u16, 1, 7, 300] {
                let buf = with_length(len, len as usize + 5);
                let ops = [DecodeOp::scalar("s", wire)];
                assert_eq!(consumed(&ops, &buf), 2 + len as usize, "{wire} len {len}");
            }
        }
    }

    #[test]
    fn test_variant_consumes_nothing() {
        let buf = [1u8, 2, 3];
        let (fields, used) =
            decode_payload(&[DecodeOp::scalar("v", WireType::Variant)], &buf[..]).expect("ok");
        assert_eq!(used, 0);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_repeat_consumes_count_times_body() {
        let n = 5u32;
        let buf = with_count(n, (n as usize) * 6);
        let ops = [DecodeOp::Repeat {
            body: vec![
                DecodeOp::scalar("key", WireType::Uint16),
                DecodeOp::scalar("value", WireType::Int32),
            ],
        }];

        let (fields, used) = decode_payload(&ops, &buf).expect("ok");
        assert_eq!(used, 4 + 5 * (2 + 4));
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[1].offset, 6);
    }

    #[test]
    fn test_repeat_of_zero_width_body_terminates() {
        let buf = with_count(u32::MAX, 0);
        let ops = [DecodeOp::Repeat {
            body: vec![DecodeOp::scalar("v", WireType::Variant)],
        }];
        assert_eq!(consumed(&ops, &buf), 4);
    }

    #[test]
    fn test_values_are_little_endian() {
        let mut buf = 0x0001_0001u32.to_le_bytes().to_vec();
        buf.extend_from_slice(&0xBEEFu16.to_le_bytes());
        buf.extend_from_slice(&6u16.to_le_bytes());
        buf.extend_from_slice(b"guest\0");

        let ops = [
            DecodeOp::scalar("result", WireType::QResult),
            DecodeOp::scalar("port", WireType::Uint16),
            DecodeOp::scalar("name", WireType::String),
        ];
        let (fields, used) = decode_payload(&ops, &buf).expect("ok");
        assert_eq!(used, 14);
        assert_eq!(fields[0].value, FieldValue::QResult(0x0001_0001));
        assert_eq!(fields[0].value.to_string(), "Ok");
        assert_eq!(fields[1].value, FieldValue::Unsigned(0xBEEF));
        assert_eq!(fields[2].value, FieldValue::Text("guest".to_string()));
        assert_eq!(fields[2].offset, 8);
        assert_eq!(fields[2].length, 6);
    }

    #[test]
    fn test_short_buffer_is_an_error() {
        let buf = [0u8; 3];
        let err = decode_payload(&[DecodeOp::scalar("x", WireType::Uint32)], &buf[..]).unwrap_err();
        assert_eq!(
            err,
            Error::BufferTooShort {
                required: 4,
                available: 3
            }
        );

        let buf = with_length(10, 2);
        assert!(decode_payload(&[DecodeOp::scalar("s", WireType::String)], &buf).is_err());
    }

    #[test]
    fn test_unresolved_stops_decoding() {
        let buf = [0u8; 8];
        let ops = [
            DecodeOp::scalar("a", WireType::Uint32),
            DecodeOp::unresolved("proto.method.b", "class 'B' not found"),
        ];
        let mut decoder = Decoder::new(&buf[..]);
        let err = decoder.decode(&ops).unwrap_err();
        assert!(matches!(err, Error::Unresolved { .. }));
        assert_eq!(decoder.offset(), 4);
        assert_eq!(decoder.into_fields().len(), 1);
    }
}
