//! CommandPro source parser
//!
//! This module transforms script text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens), with [`keywords`] as the
//!   reserved-word table
//! - [`parse`]: Parsing (tokens → AST), split across `statements`,
//!   `declarations` and `expressions`
//! - [`scope`]: Lexical scopes and the control-flow context stack consulted
//!   while parsing
//! - [`ast`]: AST node definitions
//! - [`errors`]: The error type shared by every stage
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod declarations;
pub mod errors;
pub mod expressions;
pub mod keywords;
pub mod lexer;
pub mod parse;
pub mod scope;
pub mod statements;

pub use ast::AstNode;
pub use errors::{ControlKind, ErrorKind, ParseError};
pub use lexer::{tokenize, Token, TokenKind};
pub use parse::{parse, ParseOptions, Parser};
