//! Expression parsing implementation
//!
//! This module handles CommandPro expressions using precedence climbing for
//! binary operators and recursive descent for primaries.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, times, strings, `TRUE`/`FALSE`
//! - Negative numeric literals: `-5`, `-0.5`, `-2s`
//! - Identifiers, with optional postfix `++`/`--` on the same line
//! - Prefix `++x` / `--x`
//! - Function calls: `name(arg, ...)`
//! - Parenthesized expressions
//!
//! # Precedence
//!
//! | Level | Operators            |
//! |-------|----------------------|
//! | 1     | `\|\|`, `OR`         |
//! | 2     | `&&`, `AND`          |
//! | 3     | `==`, `!=`           |
//! | 4     | `<`, `>`, `<=`, `>=` |
//! | 5     | `+`, `-`             |
//! | 6     | `*`, `/`, `%`        |
//!
//! All binary operators are left-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::AstNode;
use crate::parser::errors::ParseError;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;

/// Lowest binding power; the entry point for a full expression.
const LOWEST_PRECEDENCE: u8 = 1;

/// Binding power of a binary operator token, or `None` if `token` is not one.
pub fn binary_precedence(token: &Token) -> Option<u8> {
    match token.kind {
        TokenKind::Operator => match token.text() {
            "||" => Some(1),
            "&&" => Some(2),
            "==" | "!=" => Some(3),
            "<" | ">" | "<=" | ">=" => Some(4),
            "+" | "-" => Some(5),
            "*" | "/" | "%" => Some(6),
            _ => None,
        },
        TokenKind::Keyword if token.is_keyword("OR") => Some(1),
        TokenKind::Keyword if token.is_keyword("AND") => Some(2),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_expression_precedence(LOWEST_PRECEDENCE)
    }

    /// Precedence climbing: parse a primary, then fold in every binary
    /// operator binding at least as tightly as `min_precedence`.
    pub(crate) fn parse_expression_precedence(
        &mut self,
        min_precedence: u8,
    ) -> Result<AstNode, ParseError> {
        self.nested(|parser| parser.fold_binary(min_precedence))
    }

    fn fold_binary(&mut self, min_precedence: u8) -> Result<AstNode, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some(precedence) = binary_precedence(self.peek()) {
            if precedence < min_precedence {
                break;
            }

            let token = self.advance();
            let operator = match token.kind {
                TokenKind::Keyword => token.text().to_ascii_uppercase(),
                _ => token.text().to_string(),
            };
            let right = self.parse_expression_precedence(precedence + 1)?;
            left = AstNode::binary_operation(operator, left, right);
        }

        Ok(left)
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Integer | TokenKind::Float | TokenKind::Time => {
                self.advance();
                self.numeric_literal(&token, false)
            }
            TokenKind::String => {
                self.advance();
                Ok(AstNode::string(token.text()))
            }
            TokenKind::Keyword if token.is_keyword("TRUE") => {
                self.advance();
                Ok(AstNode::boolean(true))
            }
            TokenKind::Keyword if token.is_keyword("FALSE") => {
                self.advance();
                Ok(AstNode::boolean(false))
            }
            TokenKind::Id => {
                self.advance();
                let name = token.text().to_string();
                if self.check_operator("(") {
                    return self.parse_function_call(name);
                }
                self.require_variable(&name)?;
                self.parse_postfix_update(name, token.line)
            }
            TokenKind::Operator if token.is_operator("(") => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_operator(")", "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::Operator if token.is_operator("-") => {
                self.advance();
                let literal = self.peek().clone();
                if matches!(
                    literal.kind,
                    TokenKind::Integer | TokenKind::Float | TokenKind::Time
                ) {
                    self.advance();
                    self.numeric_literal(&literal, true)
                } else {
                    Err(self.unexpected("Expected numeric literal after '-'"))
                }
            }
            TokenKind::Operator if token.is_operator("++") || token.is_operator("--") => {
                self.parse_prefix_update()
            }
            _ => Err(self.unexpected("Expected expression")),
        }
    }

    /// Build a literal node from a numeric token already consumed.
    fn numeric_literal(&self, token: &Token, negative: bool) -> Result<AstNode, ParseError> {
        let text = if negative {
            format!("-{}", token.text())
        } else {
            token.text().to_string()
        };
        let invalid = || ParseError::invalid_number(format!("Invalid number '{}'", text), token.line);

        match token.kind {
            TokenKind::Integer => text.parse().map(AstNode::integer).map_err(|_| {
                ParseError::invalid_number(
                    format!("Integer literal '{}' is out of range", text),
                    token.line,
                )
            }),
            TokenKind::Float => text.parse().map(AstNode::float).map_err(|_| invalid()),
            _ => text.parse().map(AstNode::time).map_err(|_| invalid()),
        }
    }

    /// `x++` / `x--`, only when the operator sits on the identifier's line.
    fn parse_postfix_update(&mut self, name: String, line: usize) -> Result<AstNode, ParseError> {
        let postfix = (self.check_operator("++") || self.check_operator("--"))
            && self.current_line() == line;

        if postfix {
            let operation = self.advance().text().to_string();
            Ok(AstNode::increment_decrement(name, operation, false))
        } else {
            Ok(AstNode::identifier(name))
        }
    }

    /// Parse `(args...)` after a function name that has been consumed.
    pub(crate) fn parse_function_call(&mut self, name: String) -> Result<AstNode, ParseError> {
        let line = self.previous_line();
        self.expect_operator("(", &format!("Expected '(' after '{}'", name))?;

        let mut arguments = Vec::new();
        if !self.check_operator(")") {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_operator(",") {
                    break;
                }
            }
        }
        self.expect_operator(")", &format!("Expected ')' after arguments to '{}'", name))?;

        self.check_call(&name, arguments.len(), line)?;
        Ok(AstNode::function_call(name, arguments))
    }

    /// Name resolution and arity checks for a call, as configured.
    fn check_call(&self, name: &str, argument_count: usize, line: usize) -> Result<(), ParseError> {
        if self.options.resolve_names && !self.scopes.is_function_in_scope(name) {
            return Err(ParseError::type_error(
                format!("Undefined function '{}'", name),
                line,
            ));
        }

        if self.options.check_arity {
            if let Some(parameters) = self.scopes.function_parameters(name) {
                if parameters.len() != argument_count {
                    return Err(ParseError::type_error(
                        format!(
                            "Function '{}' expects {} arguments, got {}",
                            name,
                            parameters.len(),
                            argument_count
                        ),
                        line,
                    ));
                }
            }
        }

        Ok(())
    }

    /// Whether an expression begins at the current token on `line`.
    pub(crate) fn starts_expression_on(&self, line: usize) -> bool {
        let token = self.peek();
        if token.line != line {
            return false;
        }
        match token.kind {
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Time
            | TokenKind::String
            | TokenKind::Id => true,
            TokenKind::Keyword => token.is_keyword("TRUE") || token.is_keyword("FALSE"),
            TokenKind::Operator => matches!(token.text(), "(" | "-" | "++" | "--"),
            TokenKind::Eof => false,
        }
    }
}
