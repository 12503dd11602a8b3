//! Layout generation.
//!
//! Turns declared field types into field declarations and decode
//! instructions. This is where class references are resolved, bases are
//! flattened and templates are expanded.

use crate::error::SchemaError;
use crate::model::{Direction, Field, Method, Namespace};
use crate::naming::{FieldIdent, FieldScope, IdentifierTable};
use crate::registry::{ResolvedClass, SchemaRegistry};
use crate::types::{TemplateKind, TypeRef};
use ddlc_core::{DecodeOp, WireType, Width};

/// Suffix for map keys.
const KEY: &str = "key";
/// Suffix for map values.
const VALUE: &str = "value";

/// Declaration of one decodable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Generated identifiers.
    pub ident: FieldIdent,
    /// Display label.
    pub label: String,
    /// Wire type of the value.
    pub wire: WireType,
}

/// A field that could not be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Qualified schema path (`Method.field` or `Namespace::Class.field`).
    pub path: String,
    /// Identifier the placeholder is named after.
    pub ident: String,
    /// Why layout failed.
    pub error: SchemaError,
}

/// Declarations, decode instructions and diagnostics for some fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Field declarations in first-use order.
    pub decls: Vec<FieldDecl>,
    /// Decode instructions in wire order.
    pub ops: Vec<DecodeOp>,
    /// Fields replaced by placeholders.
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl Layout {
    /// Appends another layout.
    pub fn append(&mut self, other: Self) {
        self.decls.extend(other.decls);
        self.ops.extend(other.ops);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Builds layouts for the fields of one protocol.
///
/// All identifiers come from one [`IdentifierTable`], so the same field
/// reached through different methods shares its declaration. Class names
/// always resolve from the namespace passed in, which is the namespace of
/// the protocol, even inside classes declared elsewhere.
#[derive(Debug)]
pub struct LayoutBuilder<'a> {
    registry: &'a SchemaRegistry,
    idents: IdentifierTable,
    active: Vec<ResolvedClass<'a>>,
}

impl<'a> LayoutBuilder<'a> {
    /// Creates a builder for the named protocol.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry, protocol: &str) -> Self {
        Self {
            registry,
            idents: IdentifierTable::new(protocol),
            active: Vec::new(),
        }
    }

    /// Lays out every field a method sends in one direction.
    pub fn method_layout(
        &mut self,
        namespace: &'a Namespace,
        method: &Method,
        direction: Direction,
    ) -> Layout {
        let mut layout = Layout::default();
        let scope = FieldScope::Method(&method.name);
        for field in method.fields(direction) {
            self.push_field(namespace, scope, field, &mut layout);
        }
        layout
    }

    /// Lays out the flattened fields of a class, base fields first.
    pub fn class_layout(&mut self, namespace: &'a Namespace, resolved: ResolvedClass<'a>) -> Layout {
        let mut layout = Layout::default();
        if let Err(error) = self.push_class(namespace, resolved, &mut layout) {
            layout.diagnostics.push(FieldDiagnostic {
                path: resolved.qualified_name(),
                ident: resolved.class.name.clone(),
                error,
            });
        }
        layout
    }

    /// Lays out one field. Never fails: a field that cannot be laid out
    /// becomes a placeholder instruction and a diagnostic.
    fn push_field(
        &mut self,
        namespace: &'a Namespace,
        scope: FieldScope<'_>,
        field: &Field,
        out: &mut Layout,
    ) {
        let path = [field.name.as_str()];
        let mut scratch = Layout::default();
        match self.push_type(namespace, scope, &path, &field.name, &field.ty, &mut scratch) {
            Ok(()) => out.append(scratch),
            Err(error) => {
                let ident = self.idents.intern(scope, &path);
                out.ops
                    .push(DecodeOp::unresolved(ident.name.clone(), error.to_string()));
                out.diagnostics.push(FieldDiagnostic {
                    path: format!("{scope}.{}", field.name),
                    ident: ident.name,
                    error,
                });
            }
        }
    }

    fn push_type(
        &mut self,
        namespace: &'a Namespace,
        scope: FieldScope<'_>,
        path: &[&str],
        label: &str,
        ty: &TypeRef,
        out: &mut Layout,
    ) -> Result<(), SchemaError> {
        match ty {
            TypeRef::Scalar(name) => {
                let wire = TypeRef::wire_type(name)?;
                let ident = self.idents.intern(scope, path);
                if wire.width() != Width::Unwrapped {
                    out.ops.push(DecodeOp::scalar(ident.name.clone(), wire));
                }
                out.decls.push(FieldDecl {
                    ident,
                    label: label.to_string(),
                    wire,
                });
                Ok(())
            }
            TypeRef::ClassRef(name) => {
                let resolved = self.registry.resolve(name, namespace)?;
                self.push_class(namespace, resolved, out)
            }
            TypeRef::Template(name, parameters) => {
                match TemplateKind::checked(name, parameters)? {
                    // The discriminant is metadata; only the payload is on the wire.
                    TemplateKind::Any => {
                        self.push_type(namespace, scope, path, label, &parameters[1], out)
                    }
                    TemplateKind::Sequence => {
                        let mut body = Layout::default();
                        self.push_type(namespace, scope, path, label, &parameters[0], &mut body)?;
                        out.decls.extend(body.decls);
                        out.diagnostics.extend(body.diagnostics);
                        out.ops.push(DecodeOp::Repeat { body: body.ops });
                        Ok(())
                    }
                    TemplateKind::Map => {
                        let mut body = Layout::default();
                        let mut key_path = path.to_vec();
                        key_path.push(KEY);
                        let mut value_path = path.to_vec();
                        value_path.push(VALUE);
                        self.push_type(
                            namespace,
                            scope,
                            &key_path,
                            &format!("{label} Key"),
                            &parameters[0],
                            &mut body,
                        )?;
                        self.push_type(
                            namespace,
                            scope,
                            &value_path,
                            &format!("{label} Value"),
                            &parameters[1],
                            &mut body,
                        )?;
                        out.decls.extend(body.decls);
                        out.diagnostics.extend(body.diagnostics);
                        out.ops.push(DecodeOp::Repeat { body: body.ops });
                        Ok(())
                    }
                }
            }
        }
    }

    fn push_class(
        &mut self,
        namespace: &'a Namespace,
        resolved: ResolvedClass<'a>,
        out: &mut Layout,
    ) -> Result<(), SchemaError> {
        if self.active.iter().any(|c| std::ptr::eq(c.class, resolved.class)) {
            let mut path: Vec<String> = self.active.iter().map(ResolvedClass::qualified_name).collect();
            path.push(resolved.qualified_name());
            return Err(SchemaError::CircularReference {
                path: path.join(" -> "),
            });
        }

        let fields = self.registry.flatten(resolved, namespace)?;
        self.active.push(resolved);
        for flat in fields {
            let scope = FieldScope::Class {
                namespace: &flat.namespace.name,
                class: &flat.owner.name,
            };
            self.push_field(namespace, scope, flat.field, out);
        }
        self.active.pop();
        Ok(())
    }
}
