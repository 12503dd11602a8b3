//! # ddlc Codegen
//!
//! Wireshark Lua dissector generation from DDL documents.
//!
//! This crate provides:
//! - An indented code writer
//! - `ProtoField` declarations and decode statements for every wire type
//! - Per-protocol dissector blocks registered in a dissector table
//! - Per-namespace modules and writing them to disk

pub mod error;
pub mod generator;
pub mod lua;
pub mod output;
pub mod writer;

pub use error::CodegenError;
pub use generator::{
    DEFAULT_DISSECTOR_TABLE, Diagnostic, GeneratedModule, Generator, GeneratorConfig,
};
pub use output::{OutputConfig, OutputMode, render_single_file, write_modules};
pub use writer::CodeWriter;

/// Generates dissector modules from a DDL document string.
///
/// # Arguments
/// * `json` - DDL document content
///
/// # Returns
/// One generated module per namespace.
///
/// # Errors
/// Returns `CodegenError` if parsing fails.
pub fn generate_from_json(json: &str) -> Result<Vec<GeneratedModule>, CodegenError> {
    let registry = ddlc_schema::parse_document(json)?;
    Generator::new(&registry).generate()
}

/// Generates dissector modules from a DDL document file.
///
/// # Arguments
/// * `path` - Path to the DDL document
///
/// # Returns
/// One generated module per namespace.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<Vec<GeneratedModule>, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json)
}
