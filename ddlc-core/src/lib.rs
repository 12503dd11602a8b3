//! # ddlc Core
//!
//! Wire-level building blocks for RMC payloads.
//!
//! This crate provides:
//! - Little-endian buffer reads
//! - Length and count prefix headers
//! - The closed table of scalar wire types
//! - Decode instructions and a reference decoder that executes them
//! - Error types for decoding operations

pub mod buffer;
pub mod decoder;
pub mod error;
pub mod header;
pub mod wire;

pub use buffer::ReadBuffer;
pub use decoder::{DecodeOp, DecodedField, Decoder, FieldValue, decode_payload};
pub use error::{Error, Result};
pub use header::{CountPrefix, LengthPrefix};
pub use wire::{QRESULT_SUCCESS, WireType, Width};
