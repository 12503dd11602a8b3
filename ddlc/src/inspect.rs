//! Decoding captured payloads against the schema.
//!
//! Runs the same layout the generated dissector uses through the reference
//! decoder, so a capture can confirm that the layout matches the wire.

use ddlc_core::{DecodedField, decode_payload};
use ddlc_schema::{Direction, FieldDiagnostic, LayoutBuilder, SchemaRegistry};
use std::fmt;
use thiserror::Error;

/// Error type for payload inspection.
#[derive(Debug, Error)]
pub enum InspectError {
    /// No protocol with that name.
    #[error("protocol '{name}' not found")]
    ProtocolNotFound {
        /// Protocol name as given.
        name: String,
    },

    /// Protocol name used in more than one namespace.
    #[error("protocol '{name}' is declared in {namespaces}; qualify it as Namespace::Protocol")]
    AmbiguousProtocol {
        /// Protocol name.
        name: String,
        /// Comma-separated namespaces.
        namespaces: String,
    },

    /// No method with that ordinal.
    #[error("protocol '{protocol}' has no method {method}")]
    MethodNotFound {
        /// Protocol name.
        protocol: String,
        /// Method ordinal.
        method: u32,
    },

    /// Payload did not decode.
    #[error("decode failed: {0}")]
    Decode(#[from] ddlc_core::Error),
}

/// Result of decoding one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    /// `Protocol.Method`.
    pub title: String,
    /// Decoded fields in wire order.
    pub fields: Vec<DecodedField>,
    /// Bytes the layout consumed.
    pub consumed: usize,
    /// Bytes left over after the layout.
    pub trailing: usize,
    /// Fields the layout could not describe.
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for field in &self.fields {
            writeln!(
                f,
                "  {:>6}  {:>5}  {}  {}",
                field.offset, field.length, field.field, field.value
            )?;
        }
        write!(f, "consumed {} bytes", self.consumed)?;
        if self.trailing > 0 {
            write!(f, ", {} trailing", self.trailing)?;
        }
        Ok(())
    }
}

/// Decodes a payload of one method.
///
/// `protocol` is a protocol name, optionally qualified as
/// `Namespace::Protocol`.
///
/// # Errors
/// Returns an error if the protocol or method does not exist or the payload
/// does not match the layout.
pub fn inspect_payload(
    registry: &SchemaRegistry,
    protocol: &str,
    method: u32,
    direction: Direction,
    payload: &[u8],
) -> Result<InspectReport, InspectError> {
    let (ns_filter, name) = match protocol.split_once("::") {
        Some((ns, name)) => (Some(ns), name),
        None => (None, protocol),
    };

    let matches: Vec<_> = registry
        .namespaces()
        .iter()
        .filter(|ns| ns_filter.is_none_or(|f| f == ns.name))
        .filter_map(|ns| ns.protocol(name).map(|p| (ns, p)))
        .collect();
    let (namespace, proto) = match matches.as_slice() {
        [one] => *one,
        [] => {
            return Err(InspectError::ProtocolNotFound {
                name: protocol.to_string(),
            });
        }
        many => {
            return Err(InspectError::AmbiguousProtocol {
                name: protocol.to_string(),
                namespaces: many
                    .iter()
                    .map(|(ns, _)| ns.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    };

    let target = proto.method(method).ok_or_else(|| InspectError::MethodNotFound {
        protocol: proto.name.clone(),
        method,
    })?;

    let mut builder = LayoutBuilder::new(registry, &proto.name);
    let layout = builder.method_layout(namespace, target, direction);
    let (fields, consumed) = decode_payload(&layout.ops, payload)?;

    Ok(InspectReport {
        title: format!("{}.{}", proto.name, target.name),
        fields,
        consumed,
        trailing: payload.len().saturating_sub(consumed),
        diagnostics: layout.diagnostics,
    })
}
