//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! configuration, token-cursor helpers, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: `SET` assignments and `DEFUN` function definitions
//! - `statements`: statement dispatch, blocks, loops, `IF`, control statements
//! - `expressions`: expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state (token cursor, scope chain
//! and context stack).

use crate::parser::ast::AstNode;
use crate::parser::errors::ParseError;
use crate::parser::lexer::{self, Token, TokenKind};
use crate::parser::scope::ScopeTracker;
use log::info;

/// Deepest nesting of statements and sub-expressions the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Optional semantic checks performed while parsing.
///
/// Both are off by default: scripts may call functions provided by the host
/// and refer to variables defined elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Identifiers, increments and calls must name something in scope.
    pub resolve_names: bool,
    /// Calls to known functions must pass exactly as many arguments as the
    /// function declares.
    pub check_arity: bool,
}

/// Recursive descent parser for CommandPro
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) scopes: ScopeTracker,
    pub(crate) options: ParseOptions,
    pub(crate) depth: usize,
}

/// Parse a token vector into a `Program` node with default options.
pub fn parse(tokens: Vec<Token>) -> Result<AstNode, ParseError> {
    Parser::new(tokens).parse_program()
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(mut tokens: Vec<Token>, options: ParseOptions) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            position: 0,
            scopes: ScopeTracker::new(),
            options,
            depth: 0,
        }
    }

    /// Tokenize `source` and set up a parser over the result.
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        let tokens = lexer::tokenize(source)?;
        Ok(Self::new(tokens))
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<AstNode, ParseError> {
        info!("parsing {} tokens", self.tokens.len());
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let statement = self.parse_statement().map_err(|err| {
                if err.is_control_flow() {
                    info!("control statement escaped to top level at line {}", err.line);
                }
                err.into_syntax()
            })?;
            statements.push(statement);
        }

        info!("parsed {} top-level statements", statements.len());
        Ok(AstNode::program(statements))
    }

    /// Declarations seen so far; after a parse this holds the global scope.
    pub fn scopes(&self) -> &ScopeTracker {
        &self.scopes
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    // ===== Helper methods =====

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`].
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::syntax(
                format!("Nesting exceeds {} levels", MAX_NESTING_DEPTH),
                self.current_line(),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek().line
    }

    pub(crate) fn previous_line(&self) -> usize {
        self.previous().line
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_keyword(&self, word: &str) -> bool {
        self.peek().is_keyword(word)
    }

    pub(crate) fn match_keyword(&mut self, word: &str) -> bool {
        if self.check_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, word: &str, message: &str) -> Result<(), ParseError> {
        if self.match_keyword(word) {
            Ok(())
        } else {
            Err(self.unexpected(message))
        }
    }

    pub(crate) fn check_operator(&self, op: &str) -> bool {
        self.peek().is_operator(op)
    }

    pub(crate) fn match_operator(&mut self, op: &str) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_operator(&mut self, op: &str, message: &str) -> Result<(), ParseError> {
        if self.match_operator(op) {
            Ok(())
        } else {
            Err(self.unexpected(message))
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        if self.check_kind(TokenKind::Id) {
            Ok(self.advance().text().to_string())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Consume an optional `;` after a statement.
    pub(crate) fn match_terminator(&mut self) -> bool {
        self.match_operator(";")
    }

    /// Syntax error at the current token: "`message`, found `token`".
    pub(crate) fn unexpected(&self, message: &str) -> ParseError {
        ParseError::syntax(
            format!("{}, found {}", message, self.peek()),
            self.current_line(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::errors::ErrorKind;

    #[test]
    fn test_parse_simple_program() {
        let mut parser = Parser::from_source("SET x = 10\nPRINT x").unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements().len(), 2);
        match &program.statements()[0] {
            AstNode::Assignment {
                variable_name,
                value,
                var_type,
            } => {
                assert_eq!(variable_name, "x");
                assert_eq!(**value, AstNode::integer(10));
                assert_eq!(*var_type, None);
            }
            _ => panic!("Expected assignment"),
        }
        assert!(parser.scopes().is_variable_in_scope("x"));
    }

    #[test]
    fn test_missing_eof_is_appended() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "PRINT", 1),
            Token::new(TokenKind::Integer, "1", 1),
        ];
        let program = parse(tokens).unwrap();
        assert_eq!(program.statements().len(), 1);
    }

    #[test]
    fn test_empty_token_vector() {
        let program = parse(Vec::new()).unwrap();
        assert_eq!(program, AstNode::program(vec![]));
    }

    #[test]
    fn test_escaped_control_flow_becomes_syntax_error() {
        let mut parser = Parser::from_source("PRINT 1\nBREAK").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "BREAK statement outside of loop");
    }

    #[test]
    fn test_unexpected_message_names_token() {
        let mut parser = Parser::from_source("SET = 1").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err.message,
            "Expected variable name after 'SET', found '='"
        );
    }
}
