//! Serialized DDL document shapes.
//!
//! A document is a JSON array of units, each holding a flat list of tagged
//! elements as produced by the DDL extractor. Only the keys the compiler
//! needs are modelled; everything else is ignored.

use serde::Deserialize;
use serde::de::IgnoredAny;

/// One unit of the document (normally one namespace).
#[derive(Debug, Clone, Deserialize)]
pub struct DdlUnit {
    /// Elements in declaration order.
    pub elements: Vec<Element>,
}

/// Tagged element of the DDL grammar.
#[derive(Debug, Clone, Deserialize)]
pub enum Element {
    /// Names the namespace of the following declarations.
    #[serde(rename = "DDLUnitDeclaration")]
    UnitDeclaration(UnitDeclaration),
    /// Class with fields.
    ClassDeclaration(ClassDeclaration),
    /// Protocol with methods.
    ProtocolDeclaration(ProtocolDeclaration),
    /// Method of a protocol.
    Method(MethodDeclaration),
    /// Method parameter.
    Parameter(ParameterDeclaration),
    /// Method return value.
    ReturnValue(ReturnValueDeclaration),
    /// Class field.
    Variable(VariableDeclaration),
    /// Distributed object action.
    Action(IgnoredAny),
    /// Property of a class or dataset.
    PropertyDeclaration(IgnoredAny),
    /// Distributed object class.
    #[serde(rename = "DOClassDeclaration")]
    DistributedObjectDeclaration(IgnoredAny),
    /// Dataset.
    DatasetDeclaration(IgnoredAny),
    /// Built-in simple type.
    SimpleDeclaration(IgnoredAny),
    /// Built-in template.
    TemplateDeclaration(IgnoredAny),
    /// Named template instantiation.
    TemplateInstance(IgnoredAny),
    /// Duplication space.
    DupSpaceDeclaration(IgnoredAny),
}

impl Element {
    /// Returns the element kind as spelled in the document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnitDeclaration(_) => "DDLUnitDeclaration",
            Self::ClassDeclaration(_) => "ClassDeclaration",
            Self::ProtocolDeclaration(_) => "ProtocolDeclaration",
            Self::Method(_) => "Method",
            Self::Parameter(_) => "Parameter",
            Self::ReturnValue(_) => "ReturnValue",
            Self::Variable(_) => "Variable",
            Self::Action(_) => "Action",
            Self::PropertyDeclaration(_) => "PropertyDeclaration",
            Self::DistributedObjectDeclaration(_) => "DOClassDeclaration",
            Self::DatasetDeclaration(_) => "DatasetDeclaration",
            Self::SimpleDeclaration(_) => "SimpleDeclaration",
            Self::TemplateDeclaration(_) => "TemplateDeclaration",
            Self::TemplateInstance(_) => "TemplateInstance",
            Self::DupSpaceDeclaration(_) => "DupSpaceDeclaration",
        }
    }

    /// Returns true for declarations that carry no decode information.
    #[must_use]
    pub const fn is_declaration_only(&self) -> bool {
        matches!(
            self,
            Self::DistributedObjectDeclaration(_)
                | Self::DatasetDeclaration(_)
                | Self::SimpleDeclaration(_)
                | Self::TemplateDeclaration(_)
                | Self::TemplateInstance(_)
                | Self::DupSpaceDeclaration(_)
        )
    }
}

/// Unit declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitDeclaration {
    /// Namespace name.
    #[serde(rename = "name1")]
    pub name: String,
}

/// Class declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassDeclaration {
    /// Class name.
    #[serde(rename = "name1")]
    pub name: String,
    /// Namespace the class belongs to.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Base class name; empty means none.
    #[serde(default, alias = "maybe_base")]
    pub base: Option<String>,
    /// Fields, expected to be `Variable` elements.
    #[serde(default)]
    pub variables: Vec<Element>,
}

/// Protocol declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolDeclaration {
    /// Protocol name.
    #[serde(rename = "name1")]
    pub name: String,
    /// Namespace the protocol belongs to.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Numeric protocol id, if one was assigned.
    #[serde(default)]
    pub id: Option<u16>,
    /// Methods, expected to be `Method` elements.
    #[serde(default)]
    pub methods: Vec<Element>,
}

/// Method declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodDeclaration {
    /// Method name.
    #[serde(rename = "name1")]
    pub name: String,
    /// Parameters and return value in declaration order.
    #[serde(default, rename = "elements1")]
    pub elements: Vec<Element>,
}

/// Parameter declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDeclaration {
    /// Parameter name.
    #[serde(rename = "name1")]
    pub name: String,
    /// Parameter type.
    #[serde(rename = "dtype1")]
    pub ty: TypeDescriptor,
    /// Direction: `Request` or `Response`.
    #[serde(rename = "ty")]
    pub direction: String,
}

/// Return value declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnValueDeclaration {
    /// Return type.
    #[serde(rename = "dtype1")]
    pub ty: TypeDescriptor,
}

/// Class field declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableDeclaration {
    /// Field name.
    #[serde(rename = "name1")]
    pub name: String,
    /// Field type.
    pub ty: TypeDescriptor,
}

/// Type descriptor, optionally wrapped in a redundant `ty` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeDescriptor {
    /// `{"ty": <descriptor>, "unknown": n}`.
    Wrapped {
        /// The wrapped descriptor.
        ty: SubType,
        /// Opaque extractor value.
        #[serde(default)]
        unknown: u32,
    },
    /// A bare descriptor.
    Bare(SubType),
}

impl TypeDescriptor {
    /// Returns the descriptor with any outer wrapper removed.
    #[must_use]
    pub const fn unwrap_descriptor(&self) -> &SubType {
        match self {
            Self::Wrapped { ty, .. } | Self::Bare(ty) => ty,
        }
    }
}

/// Type descriptor variants.
#[derive(Debug, Clone, Deserialize)]
pub enum SubType {
    /// Scalar, by name.
    Simple(String),
    /// Class reference, by name.
    Class(String),
    /// Generic container.
    Template(TemplateDescriptor),
    /// Distributed object class reference.
    #[serde(rename = "DOClass")]
    DistributedObject(String),
    /// Dataset reference.
    Dataset(String),
}

/// Generic container descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDescriptor {
    /// Instance name, when the extractor recorded one.
    #[serde(default)]
    pub name: Option<String>,
    /// Template name (`qlist`, `std_map`, ...).
    pub template_name: String,
    /// Type parameters in order.
    #[serde(default)]
    pub parameters: Vec<SubType>,
}
