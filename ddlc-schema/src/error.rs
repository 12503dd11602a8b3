//! Error types for document loading and schema resolution.

use thiserror::Error;

/// Error type for document loading.
///
/// Every variant means the document no longer matches the DDL grammar this
/// crate understands, so the whole run stops.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Element kind that is known but not allowed where it appeared.
    #[error("unexpected element '{element}' in {context}")]
    UnexpectedElement {
        /// Element kind.
        element: String,
        /// Where it was found.
        context: String,
    },

    /// Declaration before any unit declaration.
    #[error("{kind} '{name}' declared before any DDLUnitDeclaration")]
    MissingUnit {
        /// Kind of declaration.
        kind: String,
        /// Declared name.
        name: String,
    },

    /// Declaration that names a different namespace than its unit.
    #[error("{kind} '{name}' belongs to namespace '{declared}' but appears in unit '{unit}'")]
    NamespaceMismatch {
        /// Kind of declaration.
        kind: String,
        /// Declared name.
        name: String,
        /// Namespace named by the declaration.
        declared: String,
        /// Namespace of the enclosing unit.
        unit: String,
    },

    /// Type descriptor that cannot describe a decodable value.
    #[error("malformed type descriptor '{descriptor}' for '{field}'")]
    MalformedType {
        /// Field the descriptor belongs to.
        field: String,
        /// Descriptor kind.
        descriptor: String,
    },

    /// Parameter direction other than Request/Response.
    #[error("parameter '{parameter}' has unsupported direction '{direction}'")]
    InvalidDirection {
        /// Parameter name.
        parameter: String,
        /// Direction found.
        direction: String,
    },
}

impl ParseError {
    /// Creates an unexpected element error.
    pub fn unexpected(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates a missing unit error.
    pub fn missing_unit(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingUnit {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a malformed type error.
    pub fn malformed_type(field: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::MalformedType {
            field: field.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Returns true if the error only invalidates the method it occurred in.
    ///
    /// Such methods are skipped; the rest of the protocol still loads.
    #[must_use]
    pub const fn is_method_local(&self) -> bool {
        matches!(self, Self::InvalidDirection { .. })
    }
}

/// Error type for type resolution.
///
/// These errors are local to one field: the generator replaces the field
/// with a placeholder and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Class not declared in any namespace.
    #[error("class '{name}' not found")]
    ClassNotFound {
        /// Class name.
        name: String,
    },

    /// Class declared more than once where it is looked up.
    #[error("ambiguous class '{name}': declared in {namespaces}")]
    AmbiguousClass {
        /// Class name.
        name: String,
        /// Comma-separated namespaces declaring it.
        namespaces: String,
    },

    /// Simple type missing from the scalar table.
    #[error("unknown scalar type '{name}'")]
    UnknownScalar {
        /// Scalar name.
        name: String,
    },

    /// Template name outside the supported set.
    #[error("unsupported template '{name}'")]
    UnsupportedTemplate {
        /// Template name.
        name: String,
    },

    /// Template used with the wrong number of parameters.
    #[error("template '{name}' takes {expected} parameter(s), got {actual}")]
    TemplateArity {
        /// Template name.
        name: String,
        /// Expected parameter count.
        expected: usize,
        /// Actual parameter count.
        actual: usize,
    },

    /// Class that contains itself through fields or bases.
    #[error("circular type reference detected: {path}")]
    CircularReference {
        /// Path of the circular reference.
        path: String,
    },
}
