//! Identifier generation.
//!
//! Generated dissectors refer to every field through a variable name and a
//! display-filter abbreviation. Both are derived from the schema path of the
//! field and must never collide inside one protocol.

use std::collections::{HashMap, HashSet};

/// Converts a schema identifier to snake_case.
///
/// Splits at lower-case/digit to upper-case boundaries, and inside an
/// upper-case run before the last capital that is followed by a lower-case
/// letter: `ABCdef` becomes `ab_cdef`, `clOrdID` becomes `cl_ord_id`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && !result.ends_with('_') {
                    result.push('_');
                }
            }
            result.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' || c == '.' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Where a field is declared.
///
/// Two fields only share identifiers when their scopes are equal, so a
/// method and a class with the same name, or same-named classes of two
/// namespaces, never share a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope<'a> {
    /// Parameter or return value of a method.
    Method(&'a str),
    /// Variable of a class, with the namespace declaring the class.
    Class {
        /// Declaring namespace.
        namespace: &'a str,
        /// Class name.
        class: &'a str,
    },
}

impl<'a> FieldScope<'a> {
    /// Returns the name shown in identifiers (`Login`, `Gathering`).
    #[must_use]
    pub const fn name(&self) -> &'a str {
        match *self {
            Self::Method(name) => name,
            Self::Class { class, .. } => class,
        }
    }

    fn key(&self) -> ScopeKey {
        match *self {
            Self::Method(name) => ScopeKey::Method(name.to_string()),
            Self::Class { namespace, class } => {
                ScopeKey::Class(namespace.to_string(), class.to_string())
            }
        }
    }
}

impl std::fmt::Display for FieldScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Method(name) => f.write_str(name),
            Self::Class { namespace, class } => write!(f, "{namespace}::{class}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ScopeKey {
    Method(String),
    Class(String, String),
}

/// Identifiers of one generated field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldIdent {
    /// Variable name, unique within the protocol (`login_str_user_name`).
    pub name: String,
    /// Display-filter abbreviation (`ticket_granting.login.str_user_name`).
    pub abbr: String,
}

/// Interns schema paths into collision-free identifiers for one protocol.
///
/// The same scope and path always yield the same identifier. Anything else
/// that case-converts to the same text gets a numeric suffix in the order
/// it is first seen, so `ABTest` and `AbTest` end up as `ab_test` and
/// `ab_test_2`.
#[derive(Debug, Clone, Default)]
pub struct IdentifierTable {
    prefix: String,
    by_path: HashMap<(ScopeKey, Vec<String>), FieldIdent>,
    names: HashSet<String>,
    abbrs: HashSet<String>,
}

impl IdentifierTable {
    /// Creates a table for the given protocol name.
    #[must_use]
    pub fn new(protocol: &str) -> Self {
        Self {
            prefix: to_snake_case(protocol),
            ..Self::default()
        }
    }

    /// Returns the identifiers for a field, allocating them on first use.
    ///
    /// `path` is the field name followed by container suffixes such as
    /// `key` or `value`.
    pub fn intern(&mut self, scope: FieldScope<'_>, path: &[&str]) -> FieldIdent {
        let key = (
            scope.key(),
            path.iter().map(|p| (*p).to_string()).collect::<Vec<_>>(),
        );
        if let Some(existing) = self.by_path.get(&key) {
            return existing.clone();
        }

        let parts: Vec<String> = std::iter::once(scope.name())
            .chain(path.iter().copied())
            .map(to_snake_case)
            .collect();
        let base_name = parts.join("_");
        let base_abbr = if self.prefix.is_empty() {
            parts.join(".")
        } else {
            format!("{}.{}", self.prefix, parts.join("."))
        };

        let mut ident = FieldIdent {
            name: base_name.clone(),
            abbr: base_abbr.clone(),
        };
        let mut n = 2usize;
        while self.names.contains(&ident.name) || self.abbrs.contains(&ident.abbr) {
            ident = FieldIdent {
                name: format!("{base_name}_{n}"),
                abbr: format!("{base_abbr}_{n}"),
            };
            n += 1;
        }

        self.names.insert(ident.name.clone());
        self.abbrs.insert(ident.abbr.clone());
        self.by_path.insert(key, ident.clone());
        ident
    }
}
