//! # ddlc Schema
//!
//! DDL document loader, type model and layout generation.
//!
//! This crate provides:
//! - Deserialization of the JSON DDL document
//! - Namespaces, classes, protocols and methods
//! - Class resolution across namespaces with base-class flattening
//! - Collision-free field identifiers
//! - Layouts: field declarations plus decode instructions per field

pub mod document;
pub mod error;
pub mod ir;
pub mod model;
pub mod naming;
pub mod parser;
pub mod registry;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use ir::{FieldDecl, FieldDiagnostic, Layout, LayoutBuilder};
pub use model::{ClassDecl, Direction, Field, Method, Namespace, Protocol, RESULT_FIELD};
pub use naming::{FieldIdent, FieldScope, IdentifierTable, to_snake_case};
pub use parser::{build_registry, load_document, parse_document};
pub use registry::{FlatField, ResolvedClass, SchemaRegistry};
pub use types::{TemplateKind, TypeRef};
