//! Class and namespace registry.
//!
//! Owns every namespace of a document. Class references are resolved on
//! demand against the namespace of the protocol being generated, falling
//! back to the whole document. This holds for references nested inside
//! classes of other namespaces too.

use crate::error::SchemaError;
use crate::model::{ClassDecl, Field, Namespace, Protocol};
use std::collections::HashSet;

/// A class together with the namespace that declares it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedClass<'a> {
    /// Declaring namespace.
    pub namespace: &'a Namespace,
    /// The class.
    pub class: &'a ClassDecl,
}

impl ResolvedClass<'_> {
    /// Returns `Namespace::Class`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace.name, self.class.name)
    }

    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self.class, other.class)
    }
}

/// A field of a flattened class, with the class that declares it.
#[derive(Debug, Clone, Copy)]
pub struct FlatField<'a> {
    /// Namespace of the declaring class.
    pub namespace: &'a Namespace,
    /// Declaring class (a base class for inherited fields).
    pub owner: &'a ClassDecl,
    /// The field.
    pub field: &'a Field,
}

/// All namespaces of one document.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    namespaces: Vec<Namespace>,
}

impl SchemaRegistry {
    /// Creates a registry from already-built namespaces.
    #[must_use]
    pub fn from_namespaces(namespaces: Vec<Namespace>) -> Self {
        Self { namespaces }
    }

    /// Returns namespaces in document order.
    #[must_use]
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Looks up a namespace by name.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Resolves a class name as seen from `current`.
    ///
    /// One match in `current` wins. With none there, every namespace is
    /// searched. More than one match at the level that decides is an error.
    ///
    /// # Errors
    /// Returns [`SchemaError::ClassNotFound`] or [`SchemaError::AmbiguousClass`].
    pub fn resolve<'a>(
        &'a self,
        name: &str,
        current: &'a Namespace,
    ) -> Result<ResolvedClass<'a>, SchemaError> {
        let local: Vec<_> = current.classes_named(name).collect();
        match local.as_slice() {
            [class] => {
                return Ok(ResolvedClass {
                    namespace: current,
                    class,
                });
            }
            [] => {}
            _ => {
                return Err(SchemaError::AmbiguousClass {
                    name: name.to_string(),
                    namespaces: current.name.clone(),
                });
            }
        }

        let global: Vec<ResolvedClass<'a>> = self
            .namespaces
            .iter()
            .flat_map(|ns| {
                ns.classes_named(name).map(move |class| ResolvedClass {
                    namespace: ns,
                    class,
                })
            })
            .collect();

        match global.as_slice() {
            [resolved] => Ok(*resolved),
            [] => Err(SchemaError::ClassNotFound {
                name: name.to_string(),
            }),
            many => Err(SchemaError::AmbiguousClass {
                name: name.to_string(),
                namespaces: many
                    .iter()
                    .map(|r| r.namespace.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Returns all fields of a class, base-class fields first.
    ///
    /// Bases resolve as seen from `from`, the namespace of the protocol.
    ///
    /// # Errors
    /// Returns an error if a base cannot be resolved or the base chain loops.
    pub fn flatten<'a>(
        &'a self,
        resolved: ResolvedClass<'a>,
        from: &'a Namespace,
    ) -> Result<Vec<FlatField<'a>>, SchemaError> {
        let mut chain = vec![resolved];
        let mut current = resolved;
        while let Some(base) = current.class.base.as_deref() {
            let next = self.resolve(base, from)?;
            if chain.iter().any(|c| c.same_as(&next)) {
                let mut path: Vec<String> = chain.iter().map(ResolvedClass::qualified_name).collect();
                path.push(next.qualified_name());
                return Err(SchemaError::CircularReference {
                    path: path.join(" -> "),
                });
            }
            chain.push(next);
            current = next;
        }

        Ok(chain
            .iter()
            .rev()
            .flat_map(|c| {
                c.class.fields.iter().map(move |field| FlatField {
                    namespace: c.namespace,
                    owner: c.class,
                    field,
                })
            })
            .collect())
    }

    /// Returns every class a protocol needs, in first-discovery order.
    ///
    /// Starts from the classes method fields reference and follows class
    /// fields and bases transitively. Names that do not resolve are left out;
    /// they surface as field diagnostics during layout.
    #[must_use]
    pub fn required_classes<'a>(
        &'a self,
        namespace: &'a Namespace,
        protocol: &Protocol,
    ) -> Vec<ResolvedClass<'a>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for name in protocol.referenced_classes() {
            self.collect_required(name, namespace, &mut seen, &mut out);
        }
        out
    }

    fn collect_required<'a>(
        &'a self,
        name: &str,
        from: &'a Namespace,
        seen: &mut HashSet<*const ClassDecl>,
        out: &mut Vec<ResolvedClass<'a>>,
    ) {
        let Ok(resolved) = self.resolve(name, from) else {
            return;
        };
        if !seen.insert(std::ptr::from_ref(resolved.class)) {
            return;
        }
        out.push(resolved);

        if let Some(base) = resolved.class.base.as_deref() {
            self.collect_required(base, from, seen, out);
        }
        for field in &resolved.class.fields {
            let mut names = Vec::new();
            field.ty.collect_class_names(&mut names);
            for nested in names {
                self.collect_required(nested, from, seen, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Method;
    use crate::types::TypeRef;

    fn registry() -> SchemaRegistry {
        let mut core = Namespace::new("Core");
        core.classes.push(
            ClassDecl::new("Data").with_field("version", TypeRef::scalar("uint32")),
        );
        core.classes.push(
            ClassDecl::new("Gathering")
                .with_base("Data")
                .with_field("id", TypeRef::scalar("uint32"))
                .with_field("owner", TypeRef::class("Principal")),
        );
        core.classes.push(
            ClassDecl::new("Principal").with_field("pid", TypeRef::scalar("uint32")),
        );

        let mut game = Namespace::new("Game");
        game.classes.push(
            ClassDecl::new("Session")
                .with_base("Gathering")
                .with_field("name", TypeRef::scalar("string")),
        );
        game.classes.push(ClassDecl::new("Principal"));

        SchemaRegistry::from_namespaces(vec![core, game])
    }

    #[test]
    fn test_resolve_prefers_local() {
        let reg = registry();
        let game = reg.namespace("Game").expect("ns");
        let resolved = reg.resolve("Principal", game).expect("resolve");
        assert_eq!(resolved.namespace.name, "Game");
    }

    #[test]
    fn test_resolve_falls_back_to_other_namespaces() {
        let reg = registry();
        let game = reg.namespace("Game").expect("ns");
        let resolved = reg.resolve("Gathering", game).expect("resolve");
        assert_eq!(resolved.qualified_name(), "Core::Gathering");
    }

    #[test]
    fn test_resolve_errors() {
        let mut namespaces = registry().namespaces().to_vec();
        let mut other = Namespace::new("Other");
        other.classes.push(ClassDecl::new("Principal"));
        namespaces.push(other);
        let mut empty = Namespace::new("Empty");
        empty.classes.push(ClassDecl::new("Twice"));
        empty.classes.push(ClassDecl::new("Twice"));
        namespaces.push(empty);
        let reg = SchemaRegistry::from_namespaces(namespaces);

        let probe = Namespace::new("Probe");
        assert_eq!(
            reg.resolve("Missing", &probe).unwrap_err(),
            SchemaError::ClassNotFound {
                name: "Missing".to_string()
            }
        );
        assert_eq!(
            reg.resolve("Principal", &probe).unwrap_err(),
            SchemaError::AmbiguousClass {
                name: "Principal".to_string(),
                namespaces: "Core, Game, Other".to_string(),
            }
        );
        let empty = reg.namespace("Empty").expect("ns");
        assert!(matches!(
            reg.resolve("Twice", empty),
            Err(SchemaError::AmbiguousClass { .. })
        ));
    }

    #[test]
    fn test_flatten_three_levels_base_first() {
        let reg = registry();
        let game = reg.namespace("Game").expect("ns");
        let session = reg.resolve("Session", game).expect("resolve");
        let fields = reg.flatten(session, game).expect("flatten");

        let names: Vec<_> = fields
            .iter()
            .map(|f| format!("{}.{}", f.owner.name, f.field.name))
            .collect();
        assert_eq!(
            names,
            ["Data.version", "Gathering.id", "Gathering.owner", "Session.name"]
        );
        // Inherited fields keep the namespace of their declaring class.
        assert_eq!(fields[2].namespace.name, "Core");
        assert_eq!(fields[3].namespace.name, "Game");
    }

    #[test]
    fn test_flatten_detects_base_cycle() {
        let mut ns = Namespace::new("Loop");
        ns.classes.push(ClassDecl::new("A").with_base("B"));
        ns.classes.push(ClassDecl::new("B").with_base("A"));
        let reg = SchemaRegistry::from_namespaces(vec![ns]);
        let ns = reg.namespace("Loop").expect("ns");
        let a = reg.resolve("A", ns).expect("resolve");

        match reg.flatten(a, ns) {
            Err(SchemaError::CircularReference { path }) => {
                assert_eq!(path, "Loop::A -> Loop::B -> Loop::A");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_required_classes_transitive_in_discovery_order() {
        let reg = registry();
        let game = reg.namespace("Game").expect("ns");

        let mut protocol = Protocol::new(Some(109), "Matchmake");
        let mut method = Method::new(1, "Find");
        method.returns.push(Field::new(
            "sessions",
            TypeRef::template("qlist", vec![TypeRef::class("Session")]),
        ));
        method.parameters.push(Field::new("who", TypeRef::class("Missing")));
        protocol.methods.push(method);

        let required: Vec<_> = reg
            .required_classes(game, &protocol)
            .iter()
            .map(ResolvedClass::qualified_name)
            .collect();
        // Gathering.owner is looked up from Game, which has its own Principal.
        assert_eq!(
            required,
            ["Game::Session", "Core::Gathering", "Core::Data", "Game::Principal"]
        );

        let core = reg.namespace("Core").expect("ns");
        let from_core: Vec<_> = reg
            .required_classes(core, &protocol)
            .iter()
            .map(ResolvedClass::qualified_name)
            .collect();
        assert_eq!(
            from_core,
            ["Game::Session", "Core::Gathering", "Core::Data", "Core::Principal"]
        );
    }

    #[test]
    fn test_flatten_resolves_bases_from_protocol_namespace() {
        let mut core = Namespace::new("Core");
        core.classes.push(ClassDecl::new("Base").with_field("a", TypeRef::scalar("uint8")));
        core.classes.push(ClassDecl::new("Derived").with_base("Base"));
        let mut game = Namespace::new("Game");
        game.classes.push(ClassDecl::new("Base").with_field("b", TypeRef::scalar("uint16")));
        let reg = SchemaRegistry::from_namespaces(vec![core, game]);

        let game = reg.namespace("Game").expect("ns");
        let derived = reg.resolve("Derived", game).expect("resolve");
        let fields = reg.flatten(derived, game).expect("flatten");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field.name, "b");
        assert_eq!(fields[0].namespace.name, "Game");
    }
}
