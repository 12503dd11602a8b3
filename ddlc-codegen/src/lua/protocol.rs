//! Per-protocol dissector blocks.

use super::dissector::DecodeWriter;
use super::fields::FieldDeclarations;
use super::types::lua_string;
use crate::generator::Diagnostic;
use crate::writer::CodeWriter;
use ddlc_schema::{
    Direction, Layout, LayoutBuilder, Method, Namespace, Protocol, SchemaRegistry, to_snake_case,
};

/// Returns the Lua variable holding a protocol's `Proto` object.
#[must_use]
pub fn proto_var(namespace: &str, protocol: &str) -> String {
    format!("{}_{}", to_snake_case(namespace), to_snake_case(protocol))
}

/// Emits the dissector block of one protocol.
pub struct ProtocolEmitter<'a> {
    registry: &'a SchemaRegistry,
    namespace: &'a Namespace,
    protocol: &'a Protocol,
    dissector_table: &'a str,
}

/// Request and response layouts of one method.
struct MethodLayouts<'m> {
    method: &'m Method,
    request: Layout,
    response: Layout,
}

impl<'a> ProtocolEmitter<'a> {
    /// Creates an emitter for a protocol of the given namespace.
    #[must_use]
    pub fn new(
        registry: &'a SchemaRegistry,
        namespace: &'a Namespace,
        protocol: &'a Protocol,
        dissector_table: &'a str,
    ) -> Self {
        Self {
            registry,
            namespace,
            protocol,
            dissector_table,
        }
    }

    /// Writes the full dissector for a protocol with an id.
    ///
    /// Returns the fields that had to be replaced by placeholders.
    pub fn emit(&self, w: &mut CodeWriter, id: u16) -> Vec<Diagnostic> {
        let var = proto_var(&self.namespace.name, &self.protocol.name);
        let mut builder = LayoutBuilder::new(self.registry, &self.protocol.name);
        let mut diagnostics = Vec::new();

        w.line(format!(
            "{var} = Proto({name}, {name})",
            name = lua_string(&self.protocol.name)
        ));

        let mut fields = FieldDeclarations::new(&var);
        let report = |layout: &Layout, diagnostics: &mut Vec<Diagnostic>| {
            for d in &layout.diagnostics {
                if diagnostics.iter().all(|seen| seen.path != d.path) {
                    diagnostics.push(Diagnostic {
                        namespace: self.namespace.name.clone(),
                        protocol: self.protocol.name.clone(),
                        path: d.path.clone(),
                        error: d.error.clone(),
                    });
                }
            }
        };

        for class in self.registry.required_classes(self.namespace, self.protocol) {
            let layout = builder.class_layout(self.namespace, class);
            fields.write_layout(w, &layout);
            report(&layout, &mut diagnostics);
        }

        let methods: Vec<MethodLayouts<'_>> = self
            .protocol
            .methods
            .iter()
            .map(|method| MethodLayouts {
                method,
                request: builder.method_layout(self.namespace, method, Direction::Request),
                response: builder.method_layout(self.namespace, method, Direction::Response),
            })
            .collect();

        for layouts in &methods {
            fields.write_layout(w, &layouts.request);
            fields.write_layout(w, &layouts.response);
            report(&layouts.request, &mut diagnostics);
            report(&layouts.response, &mut diagnostics);
        }

        w.blank();
        w.block(format!("function {var}.init()"), "end", |w| {
            w.line(format!(
                "DissectorTable.get({}):add({id}, {var})",
                lua_string(self.dissector_table)
            ));
        });

        w.blank();
        w.line("--- @param buffer Tvb");
        w.line("--- @param pinfo Pinfo");
        w.line("--- @param tree TreeItem");
        w.block(format!("function {var}.dissector(buffer, pinfo, tree)"), "end", |w| {
            w.line("local method_id = method_id_field().value");
            w.line("local is_request = is_request_field().value");
            let decoder = DecodeWriter::new(&var);
            for layouts in &methods {
                let title = format!("{}.{}", self.protocol.name, layouts.method.name);
                w.block(format!("if method_id == {} then", layouts.method.id), "end", |w| {
                    w.line("if is_request then");
                    w.indent();
                    decoder.write_branch(w, &title, &layouts.request.ops);
                    w.dedent();
                    w.line("else");
                    w.indent();
                    decoder.write_branch(w, &title, &layouts.response.ops);
                    w.dedent();
                    w.line("end");
                });
            }
        });

        diagnostics
    }

    /// Writes a comment-only summary for a protocol without an id.
    pub fn emit_stub(&self, w: &mut CodeWriter) {
        w.line(format!(
            "-- {}::{} has no protocol id; not registered",
            self.namespace.name, self.protocol.name
        ));
        for method in &self.protocol.methods {
            w.line(format!("--   {} {}", method.id, method.name));
            for (direction, fields) in [("request", &method.parameters), ("response", &method.returns)] {
                for field in fields {
                    w.line(format!("--     {direction} {}: {}", field.name, field.ty));
                }
            }
        }
    }
}
