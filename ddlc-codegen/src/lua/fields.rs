//! `ProtoField` declarations.

use super::types::{LuaFieldType, comment_text, lua_string};
use crate::writer::CodeWriter;
use ddlc_schema::{FieldDecl, FieldDiagnostic, Layout};
use std::collections::HashSet;

/// Writes field declarations for one protocol, each identifier once.
#[derive(Debug)]
pub struct FieldDeclarations<'a> {
    proto_var: &'a str,
    declared: HashSet<String>,
}

impl<'a> FieldDeclarations<'a> {
    /// Creates a declaration writer for the given protocol variable.
    #[must_use]
    pub fn new(proto_var: &'a str) -> Self {
        Self {
            proto_var,
            declared: HashSet::new(),
        }
    }

    /// Declares every field of a layout and comments its placeholders.
    pub fn write_layout(&mut self, w: &mut CodeWriter, layout: &Layout) {
        for decl in &layout.decls {
            self.write_decl(w, decl);
        }
        for diagnostic in &layout.diagnostics {
            self.write_placeholder(w, diagnostic);
        }
    }

    /// Declares one field unless it was declared already.
    pub fn write_decl(&mut self, w: &mut CodeWriter, decl: &FieldDecl) {
        if !self.declared.insert(decl.ident.name.clone()) {
            return;
        }
        let ty = LuaFieldType::of(decl.wire);
        w.line(format!(
            "{}.fields.{} = ProtoField.new({}, {}, {}{})",
            self.proto_var,
            decl.ident.name,
            lua_string(&decl.label),
            lua_string(&decl.ident.abbr),
            ty.ftype,
            ty.extra_args()
        ));
    }

    /// Comments a field that has no declaration.
    pub fn write_placeholder(&mut self, w: &mut CodeWriter, diagnostic: &FieldDiagnostic) {
        let key = format!("-- {}", diagnostic.ident);
        if !self.declared.insert(key) {
            return;
        }
        w.line(format!(
            "-- {}: {}",
            diagnostic.ident,
            comment_text(&diagnostic.error.to_string())
        ));
    }
}
