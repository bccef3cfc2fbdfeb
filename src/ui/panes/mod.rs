//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Script display with syntax highlighting and the selected or failing line
//! - [`tokens`]: The token stream, one selectable row per token
//! - [`ast`]: The AST as pretty-printed JSON, or the parse error
//! - [`status`]: Status bar with keybindings and parse state
//!
//! Each pane module exports a primary `render_*` function plus the scroll
//! state it keeps between frames.

pub mod ast;
pub mod source;
pub mod status;
pub mod tokens;

// Re-export render functions for convenience
pub use ast::render_ast_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tokens::{render_tokens_pane, TokenScrollState};
