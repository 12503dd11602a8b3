//! Wireshark Lua code generation modules.

pub mod dissector;
pub mod fields;
pub mod protocol;
pub mod types;

pub use dissector::DecodeWriter;
pub use fields::FieldDeclarations;
pub use protocol::{ProtocolEmitter, proto_var};
pub use types::LuaFieldType;

/// First line of every namespace module: the header fields handed over by
/// the parent RMC dissector when it loads the file.
pub const MODULE_HEADER: &str =
    "local method_id_field, is_request_field, is_success_field = ...";
