//! Error model shared by the tokenizer and the parser
//!
//! Every fallible step returns `Result<_, ParseError>`. The first error aborts
//! the construct being parsed and is propagated unchanged with `?`; there is
//! no resynchronization.
//!
//! [`ErrorKind::ControlFlow`] is not a failure in the usual sense: it is the
//! signal raised by a `BREAK`/`CONTINUE`/`RETURN`/`YIELD` that has no
//! enclosing loop or function to absorb it. [`Parser::parse_program`]
//! turns one that reaches the top level into a syntax error.
//!
//! [`Parser::parse_program`]: crate::parser::Parser::parse_program

use crate::parser::ast::AstNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four non-local control statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlKind {
    Break,
    Continue,
    Return,
    Yield,
}

impl ControlKind {
    /// Map a keyword (any case) to its control kind.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "BREAK" => Some(ControlKind::Break),
            "CONTINUE" => Some(ControlKind::Continue),
            "RETURN" => Some(ControlKind::Return),
            "YIELD" => Some(ControlKind::Yield),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Break => "BREAK",
            ControlKind::Continue => "CONTINUE",
            ControlKind::Return => "RETURN",
            ControlKind::Yield => "YIELD",
        }
    }

    /// Whether the statement may carry a value (`RETURN x`, `YIELD x`).
    pub fn carries_value(&self) -> bool {
        matches!(self, ControlKind::Return | ControlKind::Yield)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a [`ParseError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Syntax,
    /// Reserved for an evaluator; never produced by the front end.
    Runtime,
    Type,
    InvalidNumber,
    ControlFlow {
        statement: ControlKind,
        value: Option<Box<AstNode>>,
    },
    /// Reserved for an evaluator; never produced by the front end.
    Continue,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Runtime => "Runtime",
            ErrorKind::Type => "Type",
            ErrorKind::InvalidNumber => "Invalid number",
            ErrorKind::ControlFlow { .. } => "Control flow",
            ErrorKind::Continue => "Continue",
        }
    }
}

/// Error raised while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} error at line {}: {}", .kind.name(), .line, .message)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::Syntax, message, line)
    }

    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::Type, message, line)
    }

    pub fn invalid_number(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::InvalidNumber, message, line)
    }

    pub fn control_flow(
        statement: ControlKind,
        value: Option<AstNode>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::new(
            ErrorKind::ControlFlow {
                statement,
                value: value.map(Box::new),
            },
            message,
            line,
        )
    }

    pub fn is_control_flow(&self) -> bool {
        matches!(self.kind, ErrorKind::ControlFlow { .. })
    }

    /// Turn a control-flow signal that escaped every construct into a
    /// syntax error with the same message and line. Other errors pass through.
    pub fn into_syntax(self) -> Self {
        if self.is_control_flow() {
            Self::syntax(self.message, self.line)
        } else {
            self
        }
    }
}
