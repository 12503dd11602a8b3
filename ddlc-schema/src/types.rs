//! Declared field types.
//!
//! [`TypeRef`] is what the schema says a field is. Turning it into bytes is
//! the job of [`crate::ir::LayoutBuilder`].

use crate::document::{SubType, TypeDescriptor};
use crate::error::{ParseError, SchemaError};
use ddlc_core::WireType;
use std::fmt;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Primitive wire type, by name.
    Scalar(String),
    /// Reference to a class declared somewhere in the schema.
    ClassRef(String),
    /// Generic container with its type parameters.
    Template(String, Vec<TypeRef>),
}

impl TypeRef {
    /// Creates a scalar type reference.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    /// Creates a class type reference.
    pub fn class(name: impl Into<String>) -> Self {
        Self::ClassRef(name.into())
    }

    /// Creates a template type reference.
    pub fn template(name: impl Into<String>, parameters: Vec<TypeRef>) -> Self {
        Self::Template(name.into(), parameters)
    }

    /// Converts a document type descriptor, unwrapping any outer `ty` object.
    ///
    /// # Errors
    /// Returns [`ParseError::MalformedType`] for descriptor kinds that cannot
    /// appear in a decodable position.
    pub fn from_descriptor(field: &str, descriptor: &TypeDescriptor) -> Result<Self, ParseError> {
        Self::from_sub_type(field, descriptor.unwrap_descriptor())
    }

    fn from_sub_type(field: &str, sub_type: &SubType) -> Result<Self, ParseError> {
        match sub_type {
            SubType::Simple(name) => Ok(Self::Scalar(name.clone())),
            SubType::Class(name) => Ok(Self::ClassRef(name.clone())),
            SubType::Template(template) => {
                let parameters = template
                    .parameters
                    .iter()
                    .map(|p| Self::from_sub_type(field, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Template(template.template_name.clone(), parameters))
            }
            SubType::DistributedObject(name) => {
                Err(ParseError::malformed_type(field, format!("DOClass({name})")))
            }
            SubType::Dataset(name) => {
                Err(ParseError::malformed_type(field, format!("Dataset({name})")))
            }
        }
    }

    /// Looks up the wire type of a scalar reference.
    ///
    /// # Errors
    /// Returns [`SchemaError::UnknownScalar`] if the name is not in the table.
    pub fn wire_type(name: &str) -> Result<WireType, SchemaError> {
        WireType::from_ddl_name(name).ok_or_else(|| SchemaError::UnknownScalar {
            name: name.to_string(),
        })
    }

    /// Appends every class name this type mentions, recursing through
    /// template parameters but not into the classes themselves.
    pub fn collect_class_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Scalar(_) => {}
            Self::ClassRef(name) => out.push(name),
            Self::Template(_, parameters) => {
                for parameter in parameters {
                    parameter.collect_class_names(out);
                }
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) | Self::ClassRef(name) => f.write_str(name),
            Self::Template(name, parameters) => {
                write!(f, "{name}<")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Supported generic containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `any<Discriminant, Payload>`.
    Any,
    /// `qlist<T>`, `std_list<T>` and `qvector<T>`.
    Sequence,
    /// `std_map<K, V>`.
    Map,
}

impl TemplateKind {
    /// Classifies a template name.
    ///
    /// # Errors
    /// Returns [`SchemaError::UnsupportedTemplate`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "any" => Ok(Self::Any),
            "qlist" | "std_list" | "qvector" => Ok(Self::Sequence),
            "std_map" => Ok(Self::Map),
            _ => Err(SchemaError::UnsupportedTemplate {
                name: name.to_string(),
            }),
        }
    }

    /// Returns the number of type parameters the template takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Any | Self::Map => 2,
            Self::Sequence => 1,
        }
    }

    /// Classifies a template name and checks its parameter count.
    ///
    /// # Errors
    /// Returns an error for unknown names or the wrong number of parameters.
    pub fn checked(name: &str, parameters: &[TypeRef]) -> Result<Self, SchemaError> {
        let kind = Self::from_name(name)?;
        if parameters.len() != kind.arity() {
            return Err(SchemaError::TemplateArity {
                name: name.to_string(),
                expected: kind.arity(),
                actual: parameters.len(),
            });
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_kind_names() {
        assert_eq!(TemplateKind::from_name("any"), Ok(TemplateKind::Any));
        assert_eq!(TemplateKind::from_name("qlist"), Ok(TemplateKind::Sequence));
        assert_eq!(TemplateKind::from_name("std_list"), Ok(TemplateKind::Sequence));
        assert_eq!(TemplateKind::from_name("qvector"), Ok(TemplateKind::Sequence));
        assert_eq!(TemplateKind::from_name("std_map"), Ok(TemplateKind::Map));
        assert_eq!(
            TemplateKind::from_name("std_set"),
            Err(SchemaError::UnsupportedTemplate {
                name: "std_set".to_string()
            })
        );
    }

    #[test]
    fn test_template_arity_checked() {
        let one = [TypeRef::scalar("uint32")];
        assert!(TemplateKind::checked("qvector", &one).is_ok());
        assert!(matches!(
            TemplateKind::checked("std_map", &one),
            Err(SchemaError::TemplateArity {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_collect_class_names_recurses_templates() {
        let ty = TypeRef::template(
            "std_map",
            vec![
                TypeRef::scalar("string"),
                TypeRef::template("qlist", vec![TypeRef::class("Gathering")]),
            ],
        );
        let mut names = Vec::new();
        ty.collect_class_names(&mut names);
        assert_eq!(names, vec!["Gathering"]);
    }

    #[test]
    fn test_display() {
        let ty = TypeRef::template(
            "std_map",
            vec![TypeRef::scalar("string"), TypeRef::class("Score")],
        );
        assert_eq!(ty.to_string(), "std_map<string, Score>");
    }

    #[test]
    fn test_from_descriptor_rejects_dataset() {
        let desc: TypeDescriptor =
            serde_json::from_str(r#"{"Dataset": "PlayerInfo"}"#).expect("ok");
        assert!(matches!(
            TypeRef::from_descriptor("info", &desc),
            Err(ParseError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_wire_type_lookup() {
        assert_eq!(TypeRef::wire_type("qresult"), Ok(WireType::QResult));
        assert!(TypeRef::wire_type("float").is_err());
    }
}
