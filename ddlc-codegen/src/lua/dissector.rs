//! Decode statements.
//!
//! Each instruction becomes straight-line Lua that reads from `buffer` at
//! `off` and moves `off` past the bytes it consumed. The enclosing branch
//! declares `off`, `sz` and `cnt` once, so nested loops only reassign them.

use super::types::{LuaFieldType, comment_text};
use crate::writer::CodeWriter;
use ddlc_core::{CountPrefix, DecodeOp, LengthPrefix, WireType, Width};

/// Writes decode statements for one protocol.
#[derive(Debug, Clone, Copy)]
pub struct DecodeWriter<'a> {
    proto_var: &'a str,
}

impl<'a> DecodeWriter<'a> {
    /// Creates a writer for the given protocol variable.
    #[must_use]
    pub const fn new(proto_var: &'a str) -> Self {
        Self { proto_var }
    }

    /// Writes a request or response branch: subtree, cursor, then fields.
    pub fn write_branch(&self, w: &mut CodeWriter, title: &str, ops: &[DecodeOp]) {
        w.line(format!(
            "local subtree = tree:add({}, buffer(), {})",
            self.proto_var,
            super::types::lua_string(title)
        ));
        w.line("local off = 0");
        if needs_scratch(ops) {
            w.line("local sz, cnt");
        }
        self.write_ops(w, ops);
    }

    /// Writes statements for a sequence of instructions.
    pub fn write_ops(&self, w: &mut CodeWriter, ops: &[DecodeOp]) {
        for op in ops {
            self.write_op(w, op);
        }
    }

    fn write_op(&self, w: &mut CodeWriter, op: &DecodeOp) {
        match op {
            DecodeOp::Scalar { field, wire } => self.write_scalar(w, field, *wire),
            DecodeOp::Repeat { body } => {
                w.line(format!(
                    "cnt = buffer(off, {}):le_uint()",
                    CountPrefix::ENCODED_LENGTH
                ));
                w.line(format!("off = off + {}", CountPrefix::ENCODED_LENGTH));
                w.block("for i=1,cnt do", "end", |w| self.write_ops(w, body));
            }
            DecodeOp::Unresolved { field, reason } => {
                w.line(format!("-- {field}: {}", comment_text(reason)));
            }
        }
    }

    fn write_scalar(&self, w: &mut CodeWriter, field: &str, wire: WireType) {
        let Some(encoding) = LuaFieldType::of(wire).encoding else {
            return;
        };
        let size = match wire.width() {
            Width::Unwrapped => return,
            Width::Fixed(size) => size.to_string(),
            Width::LengthPrefixed => {
                w.line(format!(
                    "sz = buffer(off, {}):le_uint()",
                    LengthPrefix::ENCODED_LENGTH
                ));
                w.line(format!("off = off + {}", LengthPrefix::ENCODED_LENGTH));
                "sz".to_string()
            }
        };
        w.line(format!(
            "subtree:add_packet_field({}.fields.{field}, buffer(off, {size}), {encoding})",
            self.proto_var
        ));
        w.line(format!("off = off + {size}"));
    }
}

/// Returns true if any instruction assigns `sz` or `cnt`.
fn needs_scratch(ops: &[DecodeOp]) -> bool {
    ops.iter().any(|op| match op {
        DecodeOp::Repeat { .. } => true,
        DecodeOp::Scalar { wire, .. } => wire.is_length_prefixed(),
        DecodeOp::Unresolved { .. } => false,
    })
}
