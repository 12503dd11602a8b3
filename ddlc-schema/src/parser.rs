//! DDL document loader.
//!
//! Turns the JSON document into a [`SchemaRegistry`]. Any shape the loader
//! does not understand stops the run with a [`ParseError`].

use crate::document::{ClassDeclaration, DdlUnit, Element, ProtocolDeclaration};
use crate::error::ParseError;
use crate::model::{ClassDecl, Field, Method, Namespace, Protocol};
use crate::registry::SchemaRegistry;
use crate::types::TypeRef;
use std::path::Path;
use tracing::{debug, warn};

/// Parses a DDL document from a JSON string.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or contains elements in
/// places the DDL grammar does not allow.
pub fn parse_document(json: &str) -> Result<SchemaRegistry, ParseError> {
    let units: Vec<DdlUnit> = serde_json::from_str(json)?;
    build_registry(&units)
}

/// Reads and parses a DDL document from disk.
///
/// # Errors
/// Returns `ParseError` on IO failure or if the document is malformed.
pub fn load_document(path: impl AsRef<Path>) -> Result<SchemaRegistry, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_document(&json)
}

/// Builds a registry from already deserialized units.
///
/// # Errors
/// Returns `ParseError` for declarations outside a unit, namespace mismatches,
/// and misplaced elements.
pub fn build_registry(units: &[DdlUnit]) -> Result<SchemaRegistry, ParseError> {
    let mut population = Population::default();
    for unit in units {
        for element in &unit.elements {
            population.accept(element)?;
        }
        population.close_unit();
    }
    Ok(population.finish())
}

/// Accumulator for the element fold.
#[derive(Debug, Default)]
struct Population {
    namespaces: Vec<Namespace>,
    current: Option<Namespace>,
}

impl Population {
    fn accept(&mut self, element: &Element) -> Result<(), ParseError> {
        match element {
            Element::UnitDeclaration(unit) => {
                self.close_unit();
                self.current = Some(Namespace::new(unit.name.clone()));
            }
            Element::ClassDeclaration(decl) => {
                let class = class_from_declaration(decl)?;
                let ns = self.namespace_for(
                    "ClassDeclaration",
                    &decl.name,
                    decl.namespace.as_deref(),
                )?;
                ns.classes.push(class);
            }
            Element::ProtocolDeclaration(decl) => {
                let protocol = protocol_from_declaration(decl)?;
                let ns = self.namespace_for(
                    "ProtocolDeclaration",
                    &decl.name,
                    decl.namespace.as_deref(),
                )?;
                ns.protocols.push(protocol);
            }
            other if other.is_declaration_only() => {
                debug!(kind = other.kind(), "skipping declaration");
            }
            other => {
                let context = self
                    .current
                    .as_ref()
                    .map_or_else(|| "document".to_string(), |ns| format!("unit '{}'", ns.name));
                return Err(ParseError::unexpected(other.kind(), context));
            }
        }
        Ok(())
    }

    fn namespace_for(
        &mut self,
        kind: &str,
        name: &str,
        declared: Option<&str>,
    ) -> Result<&mut Namespace, ParseError> {
        let ns = self
            .current
            .as_mut()
            .ok_or_else(|| ParseError::missing_unit(kind, name))?;
        if let Some(declared) = declared.filter(|d| !d.is_empty() && *d != ns.name) {
            return Err(ParseError::NamespaceMismatch {
                kind: kind.to_string(),
                name: name.to_string(),
                declared: declared.to_string(),
                unit: ns.name.clone(),
            });
        }
        Ok(ns)
    }

    fn close_unit(&mut self) {
        let Some(ns) = self.current.take() else {
            return;
        };
        // A namespace split over several units is merged back together.
        if let Some(existing) = self.namespaces.iter_mut().find(|n| n.name == ns.name) {
            existing.classes.extend(ns.classes);
            existing.protocols.extend(ns.protocols);
        } else {
            self.namespaces.push(ns);
        }
    }

    fn finish(mut self) -> SchemaRegistry {
        self.close_unit();
        SchemaRegistry::from_namespaces(self.namespaces)
    }
}

fn class_from_declaration(decl: &ClassDeclaration) -> Result<ClassDecl, ParseError> {
    let mut class = ClassDecl::new(decl.name.clone());
    class.base = decl.base.clone().filter(|b| !b.is_empty());

    for element in &decl.variables {
        let Element::Variable(var) = element else {
            return Err(ParseError::unexpected(
                element.kind(),
                format!("class '{}'", decl.name),
            ));
        };
        class.fields.push(Field::new(
            var.name.clone(),
            TypeRef::from_descriptor(&var.name, &var.ty)?,
        ));
    }

    Ok(class)
}

fn protocol_from_declaration(decl: &ProtocolDeclaration) -> Result<Protocol, ParseError> {
    let mut protocol = Protocol::new(decl.id, decl.name.clone());

    for (index, element) in decl.methods.iter().enumerate() {
        let Element::Method(method) = element else {
            return Err(ParseError::unexpected(
                element.kind(),
                format!("protocol '{}'", decl.name),
            ));
        };
        let ordinal = u32::try_from(index + 1).unwrap_or(u32::MAX);
        match Method::from_declaration(ordinal, method) {
            Ok(method) => protocol.methods.push(method),
            Err(err) if err.is_method_local() => {
                warn!(
                    protocol = %decl.name,
                    method = %method.name,
                    ordinal,
                    error = %err,
                    "skipping method"
                );
            }
            Err(err) => return Err(err),
        }
    }

    Ok(protocol)
}
