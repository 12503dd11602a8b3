//! Wireshark field types for wire scalars.

use ddlc_core::{QRESULT_SUCCESS, WireType};

/// How a scalar is declared and added to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuaFieldType {
    /// `ftypes.*` constant.
    pub ftype: &'static str,
    /// Encoding passed to `add_packet_field`, if the value is decoded.
    pub encoding: Option<&'static str>,
    /// Show the value in hex with the result-code table.
    pub result_code: bool,
}

const LE: Option<&str> = Some("ENC_LITTLE_ENDIAN");
const ASCII: Option<&str> = Some("ENC_STRING + ENC_ASCII");

impl LuaFieldType {
    /// Maps a wire type to its Wireshark representation.
    #[must_use]
    pub const fn of(wire: WireType) -> Self {
        let (ftype, encoding) = match wire {
            WireType::Bool => ("ftypes.BOOLEAN", LE),
            WireType::Byte | WireType::Uint8 => ("ftypes.UINT8", LE),
            WireType::Int8 => ("ftypes.INT8", LE),
            WireType::Uint16 => ("ftypes.UINT16", LE),
            WireType::Int16 => ("ftypes.INT16", LE),
            WireType::Uint32 | WireType::QResult => ("ftypes.UINT32", LE),
            WireType::Int32 => ("ftypes.INT32", LE),
            WireType::Uint64 => ("ftypes.UINT64", LE),
            WireType::Int64 => ("ftypes.INT64", LE),
            WireType::Double => ("ftypes.DOUBLE", LE),
            WireType::DateTime => ("ftypes.ABSOLUTE_TIME", LE),
            WireType::Variant => ("ftypes.NONE", None),
            WireType::String | WireType::StationUrl | WireType::Buffer => ("ftypes.STRINGZ", ASCII),
        };
        Self {
            ftype,
            encoding,
            result_code: matches!(wire, WireType::QResult),
        }
    }

    /// Returns the extra `ProtoField.new` arguments, starting with a comma.
    #[must_use]
    pub fn extra_args(&self) -> String {
        if self.result_code {
            format!(", {{[{QRESULT_SUCCESS:#x}] = \"Ok\"}}, base.HEX")
        } else {
            String::new()
        }
    }
}

/// Quotes a string as a Lua literal.
#[must_use]
pub fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Flattens text so it fits in a single-line Lua comment.
#[must_use]
pub fn comment_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
