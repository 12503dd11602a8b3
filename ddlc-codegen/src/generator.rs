//! Dissector module generator.
//!
//! Produces one Lua module per namespace. Each module declares and registers
//! the protocols of its namespace; classes from other namespaces are pulled
//! in through the registry.

use crate::error::CodegenError;
use crate::lua::{MODULE_HEADER, ProtocolEmitter};
use crate::writer::CodeWriter;
use ddlc_schema::{Namespace, SchemaError, SchemaRegistry};
use std::fmt;
use tracing::{debug, warn};

/// Dissector table protocols register in by default.
pub const DEFAULT_DISSECTOR_TABLE: &str = "rmc.protocol_id";

/// Extension of generated modules. The parent dissector loads them itself,
/// so Wireshark must not pick them up as plugins.
pub const MODULE_EXTENSION: &str = "lua.noload";

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Dissector table protocol ids are registered in.
    pub dissector_table: String,
    /// Emit comment stubs for protocols without an id.
    pub emit_stubs: bool,
    /// Only generate these namespaces; empty means all.
    pub namespaces: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dissector_table: DEFAULT_DISSECTOR_TABLE.to_string(),
            emit_stubs: true,
            namespaces: Vec::new(),
        }
    }
}

/// A field that was replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Namespace of the protocol.
    pub namespace: String,
    /// Protocol being generated.
    pub protocol: String,
    /// Qualified field path.
    pub path: String,
    /// Why the field was not generated.
    pub error: SchemaError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}: {}: {}",
            self.namespace, self.protocol, self.path, self.error
        )
    }
}

/// Generated Lua for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Namespace name.
    pub namespace: String,
    /// Protocol blocks, without the module header.
    pub body: String,
    /// Fields replaced by placeholders.
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedModule {
    /// Returns the complete module source.
    #[must_use]
    pub fn source(&self) -> String {
        format!("\n{MODULE_HEADER}\n{}", self.body)
    }

    /// Returns the file name the module is written to.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{MODULE_EXTENSION}", self.namespace)
    }
}

/// Main code generator.
pub struct Generator<'a> {
    registry: &'a SchemaRegistry,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self::with_config(registry, GeneratorConfig::default())
    }

    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn with_config(registry: &'a SchemaRegistry, config: GeneratorConfig) -> Self {
        Self { registry, config }
    }

    /// Generates one module per selected namespace, in document order.
    ///
    /// # Errors
    /// Returns [`CodegenError::UnknownNamespace`] if the namespace filter
    /// names a namespace the document does not declare.
    pub fn generate(&self) -> Result<Vec<GeneratedModule>, CodegenError> {
        if let Some(missing) = self
            .config
            .namespaces
            .iter()
            .find(|name| self.registry.namespace(name).is_none())
        {
            return Err(CodegenError::UnknownNamespace {
                name: missing.clone(),
            });
        }

        Ok(self
            .registry
            .namespaces()
            .iter()
            .filter(|ns| self.config.namespaces.is_empty() || self.config.namespaces.contains(&ns.name))
            .map(|ns| self.generate_namespace(ns))
            .collect())
    }

    /// Generates the module for one namespace.
    #[must_use]
    pub fn generate_namespace(&self, namespace: &'a Namespace) -> GeneratedModule {
        let mut w = CodeWriter::new();
        let mut diagnostics = Vec::new();

        for protocol in &namespace.protocols {
            let emitter = ProtocolEmitter::new(
                self.registry,
                namespace,
                protocol,
                &self.config.dissector_table,
            );
            match protocol.id {
                Some(id) => {
                    debug!(namespace = %namespace.name, protocol = %protocol.name, id, "generating protocol");
                    diagnostics.extend(emitter.emit(&mut w, id));
                    w.blank();
                }
                None if self.config.emit_stubs => {
                    debug!(namespace = %namespace.name, protocol = %protocol.name, "protocol has no id");
                    emitter.emit_stub(&mut w);
                    w.blank();
                }
                None => {}
            }
        }

        for diagnostic in &diagnostics {
            warn!(
                namespace = %diagnostic.namespace,
                protocol = %diagnostic.protocol,
                field = %diagnostic.path,
                error = %diagnostic.error,
                "field replaced by placeholder"
            );
        }

        GeneratedModule {
            namespace: namespace.name.clone(),
            body: w.finish(),
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlc_schema::parse_document;

    const DOCUMENT: &str = r#"[
        {"elements": [
            {"DDLUnitDeclaration": {"name1": "GameCore"}},
            {"ClassDeclaration": {"name1": "Data", "namespace": "GameCore", "maybe_base": "", "variables": []}},
            {"ClassDeclaration": {"name1": "Gathering", "namespace": "GameCore", "maybe_base": "Data", "variables": [
                {"Variable": {"name1": "idMyself", "ty": {"ty": {"Simple": "uint32"}, "unknown": 0}}},
                {"Variable": {"name1": "strDescription", "ty": {"Simple": "string"}}}
            ]}},
            {"ClassDeclaration": {"name1": "Wrapper", "namespace": "GameCore", "maybe_base": "", "variables": [
                {"Variable": {"name1": "good", "ty": {"Simple": "uint8"}}},
                {"Variable": {"name1": "ghost", "ty": {"Class": "Phantom"}}}
            ]}}
        ]},
        {"elements": [
            {"DDLUnitDeclaration": {"name1": "Match"}},
            {"ProtocolDeclaration": {"name1": "MatchMakingProtocol", "namespace": "Match", "id": 21, "methods": [
                {"Method": {"name1": "RegisterGathering", "elements1": [
                    {"Parameter": {"name1": "anyGathering", "ty": "Request", "dtype1": {"Template": {
                        "template_name": "any", "parameters": [{"Class": "Data"}, {"Simple": "string"}]}}}},
                    {"Parameter": {"name1": "idGathering", "ty": "Response", "dtype1": {"Simple": "uint32"}}},
                    {"ReturnValue": {"name1": "", "dtype1": {"Simple": "qresult"}}}
                ]}},
                {"Method": {"name1": "FindByOwner", "elements1": [
                    {"Parameter": {"name1": "lstGathering", "ty": "Response", "dtype1": {"Template": {
                        "template_name": "qlist", "parameters": [{"Class": "Gathering"}]}}}}
                ]}}
            ]}},
            {"ProtocolDeclaration": {"name1": "Broken", "namespace": "Match", "id": 22, "methods": [
                {"Method": {"name1": "Get", "elements1": [
                    {"Parameter": {"name1": "wrapped", "ty": "Response", "dtype1": {"Class": "Wrapper"}}},
                    {"Parameter": {"name1": "after", "ty": "Response", "dtype1": {"Simple": "uint16"}}}
                ]}}
            ]}},
            {"ProtocolDeclaration": {"name1": "Unnumbered", "namespace": "Match", "methods": [
                {"Method": {"name1": "Ping", "elements1": [
                    {"Parameter": {"name1": "n", "ty": "Request", "dtype1": {"Simple": "uint32"}}}
                ]}}
            ]}}
        ]}
    ]"#;

    fn match_module(config: GeneratorConfig) -> GeneratedModule {
        let registry = parse_document(DOCUMENT).expect("parse");
        let generator = Generator::with_config(&registry, config);
        let modules = generator.generate().expect("generate");
        modules
            .into_iter()
            .find(|m| m.namespace == "Match")
            .expect("Match module")
    }

    #[test]
    fn test_cross_namespace_protocol_without_diagnostics() {
        let registry = parse_document(DOCUMENT).expect("parse");
        let matching = registry.namespace("Match").expect("ns");
        let protocol = matching.protocol("MatchMakingProtocol").expect("protocol");

        let mut w = CodeWriter::new();
        let diagnostics = ProtocolEmitter::new(&registry, matching, protocol, DEFAULT_DISSECTOR_TABLE)
            .emit(&mut w, 21);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let text = w.finish();
        assert!(text.starts_with(
            "match_match_making_protocol = Proto(\"MatchMakingProtocol\", \"MatchMakingProtocol\")\n"
        ));
        assert!(text.contains(
            "match_match_making_protocol.fields.gathering_id_myself = ProtoField.new(\"idMyself\", \"match_making_protocol.gathering.id_myself\", ftypes.UINT32)"
        ));
        assert!(text.contains(
            "DissectorTable.get(\"rmc.protocol_id\"):add(21, match_match_making_protocol)"
        ));
        assert!(text.contains("if method_id == 2 then"));
        assert!(text.contains("local subtree = tree:add(match_match_making_protocol, buffer(), \"MatchMakingProtocol.FindByOwner\")"));
    }

    #[test]
    fn test_module_layout() {
        let module = match_module(GeneratorConfig::default());
        let source = module.source();
        assert!(source.starts_with(
            "\nlocal method_id_field, is_request_field, is_success_field = ...\n"
        ));
        assert_eq!(module.file_name(), "Match.lua.noload");

        // The return value is the first response field.
        let response = source
            .split("if method_id == 1 then")
            .nth(1)
            .and_then(|rest| rest.split("else").nth(1))
            .expect("response branch");
        let result_at = response.find("register_gathering_result").expect("result");
        let id_at = response.find("register_gathering_id_gathering").expect("id");
        assert!(result_at < id_at);
    }

    #[test]
    fn test_protocol_without_id_is_not_registered() {
        let module = match_module(GeneratorConfig::default());
        assert!(module.body.contains("-- Match::Unnumbered has no protocol id; not registered"));
        assert!(module.body.contains("--     request n: uint32"));
        assert!(!module.body.contains("match_unnumbered = Proto("));
        assert!(!module.body.contains("match_unnumbered.init"));

        let quiet = match_module(GeneratorConfig {
            emit_stubs: false,
            ..GeneratorConfig::default()
        });
        assert!(!quiet.body.contains("Unnumbered"));
    }

    #[test]
    fn test_unresolved_class_only_replaces_that_field() {
        let module = match_module(GeneratorConfig::default());
        assert_eq!(module.diagnostics.len(), 1);
        let diagnostic = &module.diagnostics[0];
        assert_eq!(diagnostic.protocol, "Broken");
        assert_eq!(diagnostic.path, "GameCore::Wrapper.ghost");
        assert_eq!(
            diagnostic.to_string(),
            "Match::Broken: GameCore::Wrapper.ghost: class 'Phantom' not found"
        );

        let body = &module.body;
        assert!(body.contains("-- wrapper_ghost: class 'Phantom' not found"));
        assert!(body.contains("match_broken.fields.wrapper_good = ProtoField.new("));
        assert!(body.contains("match_broken.fields.get_after = ProtoField.new("));
        assert!(body.contains(
            "subtree:add_packet_field(match_broken.fields.get_after, buffer(off, 2), ENC_LITTLE_ENDIAN)"
        ));
        assert!(!body.contains("wrapper_ghost = ProtoField"));
    }

    #[test]
    fn test_custom_dissector_table_and_namespace_filter() {
        let registry = parse_document(DOCUMENT).expect("parse");
        let config = GeneratorConfig {
            dissector_table: "quazal.protocol".to_string(),
            namespaces: vec!["Match".to_string()],
            ..GeneratorConfig::default()
        };
        let modules = Generator::with_config(&registry, config).generate().expect("generate");
        assert_eq!(modules.len(), 1);
        assert!(modules[0].body.contains("DissectorTable.get(\"quazal.protocol\"):add(21,"));

        let config = GeneratorConfig {
            namespaces: vec!["Nope".to_string()],
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            Generator::with_config(&registry, config).generate(),
            Err(CodegenError::UnknownNamespace { .. })
        ));
    }

    #[test]
    fn test_namespace_without_protocols_has_empty_body() {
        let registry = parse_document(DOCUMENT).expect("parse");
        let modules = Generator::new(&registry).generate().expect("generate");
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].namespace, "GameCore");
        assert!(modules[0].body.is_empty());
    }

    const SHADOWING: &str = r#"[
        {"elements": [
            {"DDLUnitDeclaration": {"name1": "Core"}},
            {"ClassDeclaration": {"name1": "Principal", "namespace": "Core", "variables": [
                {"Variable": {"name1": "pid", "ty": {"Simple": "uint32"}}}
            ]}},
            {"ClassDeclaration": {"name1": "Gathering", "namespace": "Core", "variables": [
                {"Variable": {"name1": "owner", "ty": {"Class": "Principal"}}}
            ]}}
        ]},
        {"elements": [
            {"DDLUnitDeclaration": {"name1": "Game"}},
            {"ClassDeclaration": {"name1": "Principal", "namespace": "Game", "variables": [
                {"Variable": {"name1": "pid", "ty": {"Simple": "string"}}}
            ]}},
            {"ClassDeclaration": {"name1": "Data", "namespace": "Game", "variables": [
                {"Variable": {"name1": "x", "ty": {"Simple": "string"}}}
            ]}},
            {"ProtocolDeclaration": {"name1": "Lobby", "namespace": "Game", "id": 30, "methods": [
                {"Method": {"name1": "Data", "elements1": [
                    {"Parameter": {"name1": "x", "ty": "Request", "dtype1": {"Simple": "uint8"}}},
                    {"Parameter": {"name1": "inner", "ty": "Request", "dtype1": {"Class": "Data"}}}
                ]}},
                {"Method": {"name1": "Join", "elements1": [
                    {"Parameter": {"name1": "gathering", "ty": "Request", "dtype1": {"Class": "Gathering"}}}
                ]}}
            ]}}
        ]},
        {"elements": [
            {"DDLUnitDeclaration": {"name1": "Admin"}},
            {"ProtocolDeclaration": {"name1": "Audit", "namespace": "Admin", "id": 31, "methods": [
                {"Method": {"name1": "Owner", "elements1": [
                    {"Parameter": {"name1": "gathering", "ty": "Request", "dtype1": {"Class": "Gathering"}}}
                ]}}
            ]}}
        ]}
    ]"#;

    fn shadowing_module(namespace: &str) -> GeneratedModule {
        let registry = parse_document(SHADOWING).expect("parse");
        let config = GeneratorConfig {
            namespaces: vec![namespace.to_string()],
            ..GeneratorConfig::default()
        };
        let mut modules = Generator::with_config(&registry, config)
            .generate()
            .expect("generate");
        modules.remove(0)
    }

    #[test]
    fn test_method_and_class_with_same_name_are_declared_separately() {
        // Class fields are declared first, so the class keeps the bare name.
        let module = shadowing_module("Game");
        let body = &module.body;
        assert!(body.contains(
            "game_lobby.fields.data_x = ProtoField.new(\"x\", \"lobby.data.x\", ftypes.STRINGZ)"
        ));
        assert!(body.contains(
            "game_lobby.fields.data_x_2 = ProtoField.new(\"x\", \"lobby.data.x_2\", ftypes.UINT8)"
        ));
        assert!(body.contains(
            "subtree:add_packet_field(game_lobby.fields.data_x_2, buffer(off, 1), ENC_LITTLE_ENDIAN)"
        ));
        assert!(body.contains(
            "subtree:add_packet_field(game_lobby.fields.data_x, buffer(off, sz), ENC_STRING + ENC_ASCII)"
        ));
    }

    #[test]
    fn test_same_named_classes_follow_protocol_namespace() {
        // Core::Gathering.owner binds the Principal seen from the protocol.
        let game = shadowing_module("Game");
        assert!(game.diagnostics.is_empty(), "{:?}", game.diagnostics);
        let declared: Vec<_> = game
            .body
            .lines()
            .filter(|l| l.starts_with("game_lobby.fields.principal_pid"))
            .collect();
        assert_eq!(
            declared,
            ["game_lobby.fields.principal_pid = ProtoField.new(\"pid\", \"lobby.principal.pid\", ftypes.STRINGZ)"]
        );

        // Seen from a namespace without a Principal of its own the name is
        // ambiguous, which only affects the owner field.
        let admin = shadowing_module("Admin");
        assert_eq!(admin.diagnostics.len(), 1);
        assert_eq!(admin.diagnostics[0].path, "Core::Gathering.owner");
        assert!(admin.body.contains("-- gathering_owner: "));
        assert!(!admin.body.contains("principal_pid"));
    }
}
