//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ddlc::prelude::*;
//! ```

// Core types
pub use ddlc_core::buffer::ReadBuffer;
pub use ddlc_core::decoder::{DecodeOp, DecodedField, Decoder, FieldValue, decode_payload};
pub use ddlc_core::error::{Error as CoreError, Result as CoreResult};
pub use ddlc_core::wire::WireType;

// Schema types
pub use ddlc_schema::{
    ClassDecl, Direction, Field, Layout, LayoutBuilder, Method, Namespace, ParseError, Protocol,
    SchemaError, SchemaRegistry, TypeRef, load_document, parse_document,
};

// Codegen types
pub use ddlc_codegen::{
    CodegenError, Diagnostic, GeneratedModule, Generator, GeneratorConfig, OutputConfig,
    OutputMode, write_modules,
};

// Tooling
pub use crate::config::default_out_dir;
pub use crate::inspect::{InspectError, InspectReport, inspect_payload};
