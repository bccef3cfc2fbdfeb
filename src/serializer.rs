//! JSON rendering of the AST
//!
//! The format is defined by the serde attributes on [`AstNode`]: every node
//! is an object with a `"type"` discriminator and one field per attribute.
//! Field order follows the declarations, so output is deterministic.

use crate::parser::ast::AstNode;
use std::io;

/// Render `node` as compact JSON.
pub fn serialize(node: &AstNode) -> String {
    // AstNode holds only strings, numbers, booleans and nested nodes, and
    // every map key is a field name, so serialization cannot fail. Non-finite
    // floats are written as null.
    serde_json::to_string(node).expect("AST serialization is infallible")
}

/// Render `node` as indented JSON.
pub fn serialize_pretty(node: &AstNode) -> String {
    serde_json::to_string_pretty(node).expect("AST serialization is infallible")
}

/// Stream `node` as JSON to `writer`.
pub fn write_json<W: io::Write>(writer: W, node: &AstNode, pretty: bool) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, node)
    } else {
        serde_json::to_writer(writer, node)
    }
}

/// Load an AST previously written by [`serialize`].
pub fn deserialize(json: &str) -> serde_json::Result<AstNode> {
    serde_json::from_str(json)
}
