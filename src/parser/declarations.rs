//! Declaration parsing implementation
//!
//! This module handles the two constructs that bind names:
//!
//! - Assignments: `SET x = 10`, `SET delay: TIME = 500ms`, `SET n = 3 : INT`
//! - Function definitions: `DEFUN name(a, b) ... ENDDEFUN` or `DEFUN name(a, b) { ... }`
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::AstNode;
use crate::parser::errors::ParseError;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::scope::Context;
use log::debug;

/// Names accepted in a type annotation.
pub const VALID_TYPES: &[&str] = &["INT", "FLOAT", "STR", "TIME", "BOOL", "POINT"];

/// Whether a literal `value` may be stored in a variable of `var_type`.
/// Non-literal values are not checked.
fn literal_fits(var_type: &str, value: &AstNode) -> bool {
    if !value.is_literal() {
        return true;
    }
    match var_type {
        "INT" => matches!(value, AstNode::Integer { .. }),
        "FLOAT" => matches!(value, AstNode::Integer { .. } | AstNode::Float { .. }),
        "STR" => matches!(value, AstNode::String { .. }),
        "BOOL" => matches!(value, AstNode::Boolean { .. }),
        "TIME" => matches!(
            value,
            AstNode::Time { .. } | AstNode::Integer { .. } | AstNode::Float { .. }
        ),
        _ => false,
    }
}

impl Parser {
    /// Parse `SET name [: TYPE] = expr [: TYPE]`
    ///
    /// Without an annotation the variable keeps the type it was declared with
    /// in the current scope. The name is registered after the value is
    /// parsed, so `SET x = x` does not see its own binding.
    pub(crate) fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let line = self.advance().line; // SET
        let name = self.expect_identifier("Expected variable name after 'SET'")?;

        let mut var_type = if self.match_operator(":") {
            Some(self.parse_type_hint()?)
        } else {
            None
        };

        self.expect_operator("=", &format!("Expected '=' after variable '{}'", name))?;
        let value = self.parse_expression()?;

        if self.match_operator(":") {
            if var_type.is_some() {
                return Err(ParseError::syntax(
                    format!("Variable '{}' has two type annotations", name),
                    self.previous_line(),
                ));
            }
            var_type = Some(self.parse_type_hint()?);
        }

        let var_type =
            var_type.or_else(|| self.scopes.current_variable_type(&name).map(str::to_string));

        if let Some(expected) = &var_type {
            if !literal_fits(expected, &value) {
                return Err(ParseError::type_error(
                    format!(
                        "Cannot assign {} value to variable '{}' of type {}",
                        value.kind_name(),
                        name,
                        expected
                    ),
                    line,
                ));
            }
        }

        debug!("assignment to '{}' (type {:?})", name, var_type);
        self.scopes.register_variable(&name, var_type.as_deref());
        Ok(AstNode::assignment(name, value, var_type))
    }

    /// Parse the type name after `:`.
    fn parse_type_hint(&mut self) -> Result<String, ParseError> {
        if !matches!(self.peek().kind, TokenKind::Id | TokenKind::Keyword) {
            return Err(self.unexpected("Expected type name after ':'"));
        }

        let token = self.advance();
        let name = token.text().to_ascii_uppercase();
        if VALID_TYPES.contains(&name.as_str()) {
            Ok(name)
        } else {
            Err(ParseError::type_error(
                format!(
                    "Invalid type '{}', expected one of {}",
                    token.text(),
                    VALID_TYPES.join(", ")
                ),
                token.line,
            ))
        }
    }

    /// Parse `DEFUN name(params) body`
    ///
    /// The function is registered in the enclosing scope before its body is
    /// parsed so that it may call itself. Parameters live in a fresh scope
    /// that is discarded after the body.
    pub(crate) fn parse_function_definition(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // DEFUN
        let name = self.expect_identifier("Expected function name after 'DEFUN'")?;
        self.expect_operator("(", "Expected '(' after function name")?;

        let mut parameters: Vec<String> = Vec::new();
        if !self.check_operator(")") {
            loop {
                let param = self.expect_identifier("Expected parameter name")?;
                if parameters.contains(&param) {
                    return Err(ParseError::syntax(
                        format!("Duplicate parameter '{}' in function '{}'", param, name),
                        self.previous_line(),
                    ));
                }
                parameters.push(param);

                if !self.match_operator(",") {
                    break;
                }
            }
        }
        self.expect_operator(")", "Expected ')' after parameters")?;

        debug!("function '{}' with {} parameters", name, parameters.len());
        self.scopes.register_function(&name, &parameters);

        self.scopes.enter_scope();
        for param in &parameters {
            self.scopes.register_variable(param, None);
        }
        self.scopes.push_context(Context::Function);
        let body = self.parse_block(&["ENDDEFUN"], &format!("function '{}'", name));
        self.scopes.pop_context(Context::Function);
        self.scopes.exit_scope();

        let (body, braced) = body?;
        if !braced {
            self.expect_keyword(
                "ENDDEFUN",
                &format!("Expected 'ENDDEFUN' to close function '{}'", name),
            )?;
        }

        Ok(AstNode::function_definition(name, parameters, body))
    }
}
