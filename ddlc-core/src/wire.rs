//! Scalar wire types.
//!
//! The set of scalars is closed: every simple type name a DDL document may
//! use maps to exactly one [`WireType`], and every wire type has a known
//! [`Width`].

use std::fmt;

/// Result code value the server uses for success.
pub const QRESULT_SUCCESS: u32 = 0x0001_0001;

/// How many bytes a scalar occupies on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// Constant number of bytes.
    Fixed(usize),
    /// A u16 length prefix followed by that many bytes.
    LengthPrefixed,
    /// No bytes of its own; the containing template decodes the payload.
    Unwrapped,
}

/// Scalar wire types of the RMC protocol family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Boolean (1 byte).
    Bool,
    /// Unsigned byte.
    Byte,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit floating point.
    Double,
    /// Fixed-point date/time (4 bytes).
    DateTime,
    /// Tagged "any" marker.
    Variant,
    /// Length-prefixed string.
    String,
    /// Length-prefixed station URL.
    StationUrl,
    /// Protocol result code.
    QResult,
    /// Length-prefixed opaque buffer.
    Buffer,
}

impl WireType {
    /// Every wire type, in table order.
    pub const ALL: [Self; 17] = [
        Self::Bool,
        Self::Byte,
        Self::Uint8,
        Self::Int8,
        Self::Uint16,
        Self::Int16,
        Self::Uint32,
        Self::Int32,
        Self::Uint64,
        Self::Int64,
        Self::Double,
        Self::DateTime,
        Self::Variant,
        Self::String,
        Self::StationUrl,
        Self::QResult,
        Self::Buffer,
    ];

    /// Parses a wire type from its DDL simple type name.
    #[must_use]
    pub fn from_ddl_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "byte" => Some(Self::Byte),
            "uint8" => Some(Self::Uint8),
            "int8" => Some(Self::Int8),
            "uint16" => Some(Self::Uint16),
            "int16" => Some(Self::Int16),
            "uint32" => Some(Self::Uint32),
            "int32" => Some(Self::Int32),
            "uint64" => Some(Self::Uint64),
            "int64" => Some(Self::Int64),
            "double" => Some(Self::Double),
            "datetime" => Some(Self::DateTime),
            "variant" => Some(Self::Variant),
            "string" => Some(Self::String),
            "stationurl" => Some(Self::StationUrl),
            "qresult" => Some(Self::QResult),
            "buffer" => Some(Self::Buffer),
            _ => None,
        }
    }

    /// Returns the DDL simple type name.
    #[must_use]
    pub const fn ddl_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::DateTime => "datetime",
            Self::Variant => "variant",
            Self::String => "string",
            Self::StationUrl => "stationurl",
            Self::QResult => "qresult",
            Self::Buffer => "buffer",
        }
    }

    /// Returns the wire width of this type.
    #[must_use]
    pub const fn width(&self) -> Width {
        match self {
            Self::Bool | Self::Byte | Self::Uint8 | Self::Int8 => Width::Fixed(1),
            Self::Uint16 | Self::Int16 => Width::Fixed(2),
            Self::Uint32 | Self::Int32 | Self::DateTime | Self::QResult => Width::Fixed(4),
            Self::Uint64 | Self::Int64 | Self::Double => Width::Fixed(8),
            Self::String | Self::StationUrl | Self::Buffer => Width::LengthPrefixed,
            Self::Variant => Width::Unwrapped,
        }
    }

    /// Returns true if the value is text or bytes behind a length prefix.
    #[must_use]
    pub const fn is_length_prefixed(&self) -> bool {
        matches!(self.width(), Width::LengthPrefixed)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ddl_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for wire in WireType::ALL {
            assert_eq!(WireType::from_ddl_name(wire.ddl_name()), Some(wire));
        }
        assert_eq!(WireType::from_ddl_name("float"), None);
        assert_eq!(WireType::from_ddl_name("String"), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(WireType::Bool.width(), Width::Fixed(1));
        assert_eq!(WireType::Int16.width(), Width::Fixed(2));
        assert_eq!(WireType::DateTime.width(), Width::Fixed(4));
        assert_eq!(WireType::QResult.width(), Width::Fixed(4));
        assert_eq!(WireType::Double.width(), Width::Fixed(8));
        assert_eq!(WireType::Buffer.width(), Width::LengthPrefixed);
        assert_eq!(WireType::Variant.width(), Width::Unwrapped);

        assert_eq!(WireType::Uint64.width(), Width::Fixed(8));
        assert_eq!(WireType::String.width(), Width::LengthPrefixed);
        assert!(WireType::StationUrl.is_length_prefixed());
        assert!(!WireType::Variant.is_length_prefixed());
    }

    #[test]
    fn test_display() {
        assert_eq!(WireType::StationUrl.to_string(), "stationurl");
    }
}
