//! Namespaces, classes, protocols and methods.
//!
//! These are built once from the document and never change afterwards.

use crate::document::{Element, MethodDeclaration};
use crate::error::ParseError;
use crate::types::TypeRef;

/// Name of the field synthesized from a method's return value.
pub const RESULT_FIELD: &str = "result";

/// A named, typed field of a class or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as declared.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Parent class whose fields come first.
    pub base: Option<String>,
    /// Own fields in declaration order.
    pub fields: Vec<Field>,
}

impl ClassDecl {
    /// Creates a class without a base.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Sets the base class.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }
}

/// Direction of a method field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the client.
    Request,
    /// Sent back by the server.
    Response,
}

impl Direction {
    /// Parses the direction tag of a parameter.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Request" => Some(Self::Request),
            "Response" => Some(Self::Response),
            _ => None,
        }
    }
}

/// Protocol method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// 1-based position within the protocol; also the wire method id.
    pub id: u32,
    /// Method name.
    pub name: String,
    /// Request fields in declaration order.
    pub parameters: Vec<Field>,
    /// Response fields; a return value, if any, comes first.
    pub returns: Vec<Field>,
}

impl Method {
    /// Creates a method without fields.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parameters: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Builds a method from its declaration.
    ///
    /// Parameters go to `parameters` or `returns` by direction. A return
    /// value becomes a `result` field at the front of `returns` and ends
    /// processing: later elements are not looked at.
    ///
    /// # Errors
    /// Returns an error for malformed types, unsupported directions, or
    /// elements other than parameters and return values.
    pub fn from_declaration(id: u32, decl: &MethodDeclaration) -> Result<Self, ParseError> {
        let mut method = Self::new(id, decl.name.clone());

        for element in &decl.elements {
            match element {
                Element::Parameter(param) => {
                    let direction = Direction::parse(&param.direction).ok_or_else(|| {
                        ParseError::InvalidDirection {
                            parameter: param.name.clone(),
                            direction: param.direction.clone(),
                        }
                    })?;
                    let field = Field::new(
                        param.name.clone(),
                        TypeRef::from_descriptor(&param.name, &param.ty)?,
                    );
                    match direction {
                        Direction::Request => method.parameters.push(field),
                        Direction::Response => method.returns.push(field),
                    }
                }
                Element::ReturnValue(ret) => {
                    let ty = TypeRef::from_descriptor(RESULT_FIELD, &ret.ty)?;
                    method.returns.insert(0, Field::new(RESULT_FIELD, ty));
                    break;
                }
                other => {
                    return Err(ParseError::unexpected(
                        other.kind(),
                        format!("method '{}'", decl.name),
                    ));
                }
            }
        }

        Ok(method)
    }

    /// Returns the fields sent in the given direction.
    #[must_use]
    pub fn fields(&self, direction: Direction) -> &[Field] {
        match direction {
            Direction::Request => &self.parameters,
            Direction::Response => &self.returns,
        }
    }
}

/// Protocol declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    /// Dispatch id; protocols without one are not registered.
    pub id: Option<u16>,
    /// Protocol name.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<Method>,
}

impl Protocol {
    /// Creates a protocol without methods.
    #[must_use]
    pub fn new(id: Option<u16>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Returns class names mentioned directly by method fields, in first-seen
    /// order without duplicates.
    #[must_use]
    pub fn referenced_classes(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for method in &self.methods {
            for field in method.parameters.iter().chain(&method.returns) {
                field.ty.collect_class_names(&mut names);
            }
        }
        let mut seen = std::collections::HashSet::new();
        names.retain(|name| seen.insert(*name));
        names
    }

    /// Looks up a method by its ordinal.
    #[must_use]
    pub fn method(&self, id: u32) -> Option<&Method> {
        self.methods.iter().find(|m| m.id == id)
    }
}

/// Namespace: classes and protocols of one DDL unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Classes in declaration order.
    pub classes: Vec<ClassDecl>,
    /// Protocols in declaration order.
    pub protocols: Vec<Protocol>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns every class declared here under the given name.
    pub fn classes_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a ClassDecl> + use<'a, 'n> {
        self.classes.iter().filter(move |c| c.name == name)
    }

    /// Looks up a protocol by name.
    #[must_use]
    pub fn protocol(&self, name: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.name == name)
    }
}
