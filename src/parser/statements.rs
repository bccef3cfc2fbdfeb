//! Statement parsing implementation
//!
//! This module handles statement dispatch and every compound statement:
//!
//! - Output and timing: `PRINT`, `PRINTLN`, `WAIT`
//! - Automation: `MOVE MOUSE TO`, `HOLD`/`RELEASE`/`PRESS` `KEY`/`BUTTON`
//! - Control flow: `IF`, `WHILE`, `REPEAT ... TIMES`
//! - Control statements: `BREAK`, `CONTINUE`, `RETURN`, `YIELD`
//! - Updates and calls: `x++`, `--x`, `f(a, b)`
//! - Empty statements: `;` and `PASS`
//!
//! # Grammar
//!
//! ```text
//! statement ::= assignment | function_def | print | wait | move | key_op
//!             | if_stmt | while_stmt | repeat_stmt | control | update
//!             | call | ";" | "PASS"
//! body      ::= "{" statement* "}" | statement* END_KEYWORD
//! ```
//!
//! A body is either braced or closed by the construct's end keyword
//! (`ENDIF`, `ENDWHILE`, `ENDREPEAT`, `ENDDEFUN`). Any statement may be
//! followed by an optional `;`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{AstNode, NodeList};
use crate::parser::errors::{ControlKind, ParseError};
use crate::parser::keywords::KeywordCategory;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::scope::Context;
use log::debug;

impl Parser {
    /// Parse a statement, including its optional `;` terminator
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        self.nested(Self::parse_terminated_statement)
    }

    fn parse_terminated_statement(&mut self) -> Result<AstNode, ParseError> {
        if self.match_terminator() {
            return Ok(AstNode::empty_statement());
        }

        let statement = match self.peek().kind {
            TokenKind::Keyword => self.parse_keyword_statement()?,
            TokenKind::Id => self.parse_identifier_statement()?,
            TokenKind::Operator if self.check_operator("++") || self.check_operator("--") => {
                self.parse_prefix_update()?
            }
            _ => return Err(self.unexpected("Expected statement")),
        };

        self.match_terminator();
        Ok(statement)
    }

    fn parse_keyword_statement(&mut self) -> Result<AstNode, ParseError> {
        let word = self.peek().text().to_ascii_uppercase();
        debug!("statement '{}' at line {}", word, self.current_line());

        match word.as_str() {
            "SET" => self.parse_assignment(),
            "DEFUN" => self.parse_function_definition(),
            "PRINT" | "PRINTLN" => {
                self.advance();
                let expression = self.parse_expression()?;
                Ok(AstNode::print_statement(word.clone(), expression))
            }
            "WAIT" => {
                self.advance();
                Ok(AstNode::wait_statement(self.parse_expression()?))
            }
            "MOVE" => self.parse_move_mouse(),
            "HOLD" | "RELEASE" | "PRESS" => self.parse_input_operation(word.clone()),
            "IF" => self.parse_if_statement(),
            "WHILE" => self.parse_while_loop(),
            "REPEAT" => self.parse_repeat_loop(),
            "BREAK" | "CONTINUE" | "RETURN" | "YIELD" => self.parse_control_statement(),
            "PASS" => {
                self.advance();
                Ok(AstNode::empty_statement())
            }
            _ => Err(ParseError::syntax(
                format!("Unexpected keyword '{}'", self.peek().text()),
                self.current_line(),
            )),
        }
    }

    /// `x++`, `x--` or a call used as a statement
    fn parse_identifier_statement(&mut self) -> Result<AstNode, ParseError> {
        let next = self.peek_ahead(1);
        let is_update = next.is_some_and(|t| t.is_operator("++") || t.is_operator("--"));
        let is_call = next.is_some_and(|t| t.is_operator("("));

        if is_update {
            let name = self.expect_identifier("Expected variable name")?;
            self.require_variable(&name)?;
            let operation = self.advance().text().to_string();
            return Ok(AstNode::increment_decrement(name, operation, false));
        }

        if is_call {
            let name = self.expect_identifier("Expected function name")?;
            return self.parse_function_call(name);
        }

        Err(ParseError::syntax(
            format!(
                "Unexpected identifier '{}' without context",
                self.peek().text()
            ),
            self.current_line(),
        ))
    }

    /// `++x` or `--x`
    pub(crate) fn parse_prefix_update(&mut self) -> Result<AstNode, ParseError> {
        let operation = self.advance().text().to_string();
        let name =
            self.expect_identifier(&format!("Expected variable name after '{}'", operation))?;
        self.require_variable(&name)?;
        Ok(AstNode::increment_decrement(name, operation, true))
    }

    /// Parse a construct body: either `{ ... }`, or statements up to (not
    /// including) one of the `closers` keywords. Returns the statements and
    /// whether the braced form was used.
    pub(crate) fn parse_block(
        &mut self,
        closers: &[&str],
        construct: &str,
    ) -> Result<(NodeList, bool), ParseError> {
        let mut statements = Vec::new();

        if self.match_operator("{") {
            while !self.check_operator("}") {
                if self.is_at_end() {
                    return Err(self.unexpected(&format!("Expected '}}' to close {}", construct)));
                }
                statements.push(self.parse_statement()?);
            }
            self.advance();
            return Ok((statements, true));
        }

        while !closers.iter().any(|word| self.check_keyword(word)) {
            if self.is_at_end() {
                return Err(self.unexpected(&format!(
                    "Expected '{}' to close {}",
                    closers[closers.len() - 1],
                    construct
                )));
            }
            statements.push(self.parse_statement()?);
        }

        Ok((statements, false))
    }

    /// Parse a loop body with the `loop` context pushed.
    fn parse_loop_body(
        &mut self,
        closer: &str,
        construct: &str,
    ) -> Result<NodeList, ParseError> {
        self.scopes.push_context(Context::Loop);
        let body = self.parse_block(&[closer], construct);
        self.scopes.pop_context(Context::Loop);

        let (body, braced) = body?;
        if !braced {
            self.expect_keyword(closer, &format!("Expected '{}' to close {}", closer, construct))?;
        }
        Ok(body)
    }

    /// `WHILE condition body`
    fn parse_while_loop(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // WHILE
        let condition = self.parse_expression()?;
        let body = self.parse_loop_body("ENDWHILE", "WHILE loop")?;
        Ok(AstNode::while_loop(condition, body))
    }

    /// `REPEAT count TIMES body`
    fn parse_repeat_loop(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // REPEAT
        let count = self.parse_expression()?;
        self.expect_keyword("TIMES", "Expected 'TIMES' after REPEAT count")?;
        let body = self.parse_loop_body("ENDREPEAT", "REPEAT loop")?;
        Ok(AstNode::repeat_loop(count, body))
    }

    /// `IF c [THEN] body {ELSEIF c [THEN] body} [ELSE body] [ENDIF]`
    ///
    /// `ENDIF` is required when any branch used the keyword form and must be
    /// absent when every branch was braced. `ELSE IF` on one line is read
    /// as `ELSEIF`.
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        const BRANCH_CLOSERS: &[&str] = &["ELSEIF", "ELSE", "ENDIF"];

        self.advance(); // IF
        let condition = self.parse_expression()?;
        self.match_keyword("THEN");
        let (then_body, braced) = self.parse_block(BRANCH_CLOSERS, "IF statement")?;
        let mut needs_endif = !braced;

        let mut else_if_conditions = Vec::new();
        let mut else_if_bodies = Vec::new();
        while self.match_else_if() {
            let condition = self.parse_expression()?;
            self.match_keyword("THEN");
            let (body, braced) = self.parse_block(BRANCH_CLOSERS, "IF statement")?;
            needs_endif |= !braced;
            else_if_conditions.push(condition);
            else_if_bodies.push(body);
        }

        let else_body = if self.match_keyword("ELSE") {
            let (body, braced) = self.parse_block(&["ENDIF"], "IF statement")?;
            needs_endif |= !braced;
            Some(body)
        } else {
            None
        };

        if needs_endif {
            self.expect_keyword("ENDIF", "Expected 'ENDIF' to close IF statement")?;
        }

        Ok(AstNode::if_statement(
            condition,
            then_body,
            else_if_conditions,
            else_if_bodies,
            else_body,
        ))
    }

    /// Consume `ELSEIF`, or `ELSE IF` written on one line.
    fn match_else_if(&mut self) -> bool {
        if self.match_keyword("ELSEIF") {
            return true;
        }

        let else_line = self.current_line();
        let if_follows = self
            .peek_ahead(1)
            .is_some_and(|t| t.is_keyword("IF") && t.line == else_line);
        if self.check_keyword("ELSE") && if_follows {
            self.advance();
            self.advance();
            return true;
        }
        false
    }

    /// `BREAK`, `CONTINUE`, `RETURN [value]`, `YIELD [value]`
    ///
    /// A value is read only when an expression starts on the keyword's line.
    /// Outside of a matching context this raises a control-flow error.
    fn parse_control_statement(&mut self) -> Result<AstNode, ParseError> {
        let token = self.advance().clone();
        let Some(kind) = ControlKind::from_keyword(token.text()) else {
            return Err(ParseError::syntax(
                format!("Unknown control statement '{}'", token.text()),
                token.line,
            ));
        };

        let value = if kind.carries_value() && self.starts_expression_on(token.line) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let required = match kind {
            ControlKind::Break | ControlKind::Continue => Context::Loop,
            ControlKind::Return | ControlKind::Yield => Context::Function,
        };
        if !self.scopes.is_in_context(required) {
            return Err(ParseError::control_flow(
                kind,
                value,
                format!("{} statement outside of {}", kind, required.label()),
                token.line,
            ));
        }

        Ok(AstNode::control_statement(kind, value))
    }

    /// `MOVE MOUSE TO (x, y)` or `MOVE MOUSE TO x, y`
    fn parse_move_mouse(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // MOVE
        self.expect_keyword("MOUSE", "Expected 'MOUSE' after 'MOVE'")?;
        self.expect_keyword("TO", "Expected 'TO' after 'MOVE MOUSE'")?;

        let parenthesized = self.match_operator("(");
        let x = self.parse_expression()?;
        self.expect_operator(",", "Expected ',' between mouse coordinates")?;
        let y = self.parse_expression()?;
        if parenthesized {
            self.expect_operator(")", "Expected ')' after mouse coordinates")?;
        }

        Ok(AstNode::move_mouse(x, y))
    }

    /// `HOLD|RELEASE|PRESS KEY name` or `HOLD|RELEASE|PRESS BUTTON name`
    fn parse_input_operation(&mut self, operation: String) -> Result<AstNode, ParseError> {
        self.advance(); // HOLD / RELEASE / PRESS

        if self.match_keyword("KEY") {
            let key = self.parse_key_name()?;
            return Ok(AstNode::key_operation(operation, key));
        }

        if self.match_keyword("BUTTON") {
            let token = self.peek();
            if token.keyword_category() == Some(KeywordCategory::MouseButton) {
                let button = token.text().to_ascii_uppercase();
                self.advance();
                return Ok(AstNode::button_operation(button));
            }
            return Err(self.unexpected("Expected mouse button after 'BUTTON'"));
        }

        Err(self.unexpected(&format!("Expected 'KEY' or 'BUTTON' after '{}'", operation)))
    }

    /// A named key (`ENTER`, `F5`), a single letter or digit, or a string.
    fn parse_key_name(&mut self) -> Result<String, ParseError> {
        let token = self.peek();
        let key = match token.kind {
            TokenKind::Keyword
                if token.keyword_category() == Some(KeywordCategory::KeyboardKey) =>
            {
                Some(token.text().to_ascii_uppercase())
            }
            TokenKind::Id | TokenKind::Integer if token.text().chars().count() == 1 => {
                Some(token.text().to_string())
            }
            TokenKind::String => Some(token.text().to_string()),
            _ => None,
        };

        match key {
            Some(key) => {
                self.advance();
                Ok(key)
            }
            None => Err(self.unexpected("Expected key name after 'KEY'")),
        }
    }

    /// Under `resolve_names`, `name` must be a variable in scope.
    pub(crate) fn require_variable(&self, name: &str) -> Result<(), ParseError> {
        if self.options.resolve_names && !self.scopes.is_variable_in_scope(name) {
            return Err(ParseError::type_error(
                format!("Undefined variable '{}'", name),
                self.previous_line(),
            ));
        }
        Ok(())
    }
}
