//! # Introduction
//!
//! `commandpro` is the front end of the CommandPro automation language: it
//! turns a script into a validated abstract syntax tree and renders that tree
//! as JSON. Scripts describe variables, functions, loops and conditionals
//! alongside GUI-automation primitives such as `MOVE MOUSE TO`, `PRESS KEY`
//! and `WAIT 500ms`.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Tokenizer → Parser (scopes + contexts) → AST → Serializer → JSON
//! ```
//!
//! 1. [`parser::lexer`]: splits source text into [`Token`]s.
//! 2. [`parser::parse`]: recursive descent over the tokens, checking
//!    `BREAK`/`RETURN` placement against a context stack and, optionally,
//!    name resolution and call arity against a scope chain.
//! 3. [`parser::ast`]: the [`AstNode`] tree.
//! 4. [`serializer`]: JSON output (and input) for the tree.
//! 5. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let tokens = commandpro::tokenize("SET x = 10\nPRINT x").unwrap();
//! let program = commandpro::parse(tokens).unwrap();
//! let json = commandpro::serialize(&program);
//! assert!(json.starts_with(r#"{"type":"PROGRAM""#));
//! ```

pub mod parser;
pub mod serializer;
pub mod ui;

pub use parser::{parse, tokenize, AstNode, ParseError, ParseOptions, Parser, Token};
pub use serializer::serialize;
