//! # ddlc
//!
//! Compiler from DDL schema documents to Wireshark Lua dissectors for RMC
//! protocols.
//!
//! A DDL document describes namespaces, classes with fields and protocols
//! with numbered methods. `ddlc` resolves every field type down to its byte
//! layout and emits one dissector module per namespace.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ddlc::prelude::*;
//!
//! let registry = load_document("ddl.json")?;
//! let modules = Generator::new(&registry).generate()?;
//! write_modules(&OutputConfig::new("plugins/quazal"), &modules)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Buffer traits, prefix headers, wire types, reference decoder
//! - [`schema`] - Document loading, class registry, layout generation
//! - [`codegen`] - Lua dissector generation and output
//! - [`config`] - Default output directory
//! - [`inspect`] - Decoding captured payloads against the schema

pub mod config;
pub mod inspect;
pub mod prelude;

/// Wire primitives and the reference decoder.
pub mod core {
    pub use ddlc_core::*;
}

/// Document loading and type resolution.
pub mod schema {
    pub use ddlc_schema::*;
}

/// Dissector generation.
pub mod codegen {
    pub use ddlc_codegen::*;
}
