//! Lexer (tokenizer) for CommandPro scripts
//!
//! Converts raw source text into a flat [`Token`] vector consumed by the
//! parser. The vector always ends with exactly one [`TokenKind::Eof`] token.
//!
//! Scanning rules, in priority order at each position:
//!
//! 1. whitespace is skipped (newlines advance the line counter);
//! 2. `# ...` line comments and `#* ... *#` block comments are skipped;
//! 3. identifiers are looked up case-insensitively in the keyword table;
//! 4. numbers are runs of digits and dots, optionally followed by a time
//!    unit (`ms`, `s`, `m`, `h`) which normalizes the literal to seconds;
//! 5. string literals run between double quotes, verbatim;
//! 6. everything else is an operator, with `== != <= >= && || ++ --`
//!    composed into single tokens.

use crate::parser::errors::ParseError;
use crate::parser::keywords::{self, KeywordCategory};
use log::{debug, trace};
use serde::Serialize;
use std::fmt;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    Keyword,
    Id,
    Integer,
    Float,
    Time,
    String,
    Operator,
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Id => "ID",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Time => "TIME",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical unit.
///
/// `value` holds the literal text as written, except for time literals which
/// carry their magnitude already converted to seconds. It is `None` only for
/// the end-of-file token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub line: usize,
}

/// Two-character operators recognized as single tokens.
const COMPOSED_OPERATORS: &[&str] = &["==", "!=", "<=", ">=", "&&", "||", "++", "--"];

/// Recognized time suffixes. `ms` must be tried before `m`.
const TIME_UNITS: &[&str] = &["ms", "s", "m", "h"];

/// Normalize a time magnitude to seconds.
fn to_seconds(magnitude: f64, unit: &str) -> f64 {
    match unit {
        "ms" => magnitude / 1000.0,
        "m" => magnitude * 60.0,
        "h" => magnitude * 3600.0,
        _ => magnitude,
    }
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: None,
            line,
        }
    }

    /// Token text, or `""` for end of file.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Whether this is the keyword `word` (compared case-insensitively).
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text().eq_ignore_ascii_case(word)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text() == op
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn keyword_category(&self) -> Option<KeywordCategory> {
        match self.kind {
            TokenKind::Keyword => keywords::lookup(self.text()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Keyword => write!(f, "keyword '{}'", self.text()),
            TokenKind::Id => write!(f, "identifier '{}'", self.text()),
            TokenKind::Integer => write!(f, "integer {}", self.text()),
            TokenKind::Float => write!(f, "float {}", self.text()),
            TokenKind::Time => write!(f, "time {}s", self.text()),
            TokenKind::String => write!(f, "string \"{}\"", self.text()),
            TokenKind::Operator => write!(f, "'{}'", self.text()),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// Tokenize a whole script.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).tokenize()
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Lexer for CommandPro source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::eof(self.line));
                break;
            }

            let token = self.next_token()?;
            trace!("token {} {:?} at line {}", token.kind, token.text(), token.line);
            tokens.push(token);
        }

        debug!("tokenized {} tokens over {} lines", tokens.len(), self.line);
        Ok(tokens)
    }

    /// Get next token. The caller guarantees input remains.
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let line = self.line;
        let ch = self
            .advance()
            .ok_or_else(|| ParseError::syntax("Unexpected end of file", line))?;

        match ch {
            '"' => self.string_literal(line),
            '0'..='9' => self.number_literal(ch, line),
            c if is_identifier_start(c) => Ok(self.identifier_or_keyword(c, line)),
            _ => Ok(self.operator(ch, line)),
        }
    }

    /// Parse string literal. No escape sequences: the text is kept verbatim.
    fn string_literal(&mut self, start_line: usize) -> Result<Token, ParseError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Ok(Token::new(TokenKind::String, string, start_line));
            }
            string.push(ch);
        }

        Err(ParseError::syntax("Unterminated string literal", start_line))
    }

    /// Parse a number, which may turn out to be a time literal.
    fn number_literal(&mut self, first: char, line: usize) -> Result<Token, ParseError> {
        let mut text = String::from(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let dots = text.matches('.').count();
        if dots > 1 {
            return Err(ParseError::invalid_number(
                format!("Invalid number '{}'", text),
                line,
            ));
        }

        let out_of_range = |text: &str| {
            ParseError::invalid_number(format!("Number literal '{}' is out of range", text), line)
        };

        if let Some(unit) = self.time_suffix() {
            let magnitude: f64 = text.parse().map_err(|_| {
                ParseError::invalid_number(format!("Invalid number '{}'", text), line)
            })?;
            let seconds = to_seconds(magnitude, unit);
            if !seconds.is_finite() {
                return Err(out_of_range(&format!("{}{}", text, unit)));
            }
            return Ok(Token::new(TokenKind::Time, seconds.to_string(), line));
        }

        if dots == 1 {
            let value = text.parse::<f64>().map_err(|_| {
                ParseError::invalid_number(format!("Invalid number '{}'", text), line)
            })?;
            if !value.is_finite() {
                return Err(out_of_range(&text));
            }
            Ok(Token::new(TokenKind::Float, text, line))
        } else {
            // Magnitude only: the parser applies the sign and the i64 bound
            text.parse::<u64>().map_err(|_| {
                ParseError::invalid_number(
                    format!("Integer literal '{}' is out of range", text),
                    line,
                )
            })?;
            Ok(Token::new(TokenKind::Integer, text, line))
        }
    }

    /// Consume a time unit directly after a number. A unit glued to a longer
    /// word (`5min`) is not a unit.
    fn time_suffix(&mut self) -> Option<&'static str> {
        for unit in TIME_UNITS {
            let len = unit.chars().count();
            let matches = unit
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek_ahead(i) == Some(c));
            let followed_by_word = self.peek_ahead(len).is_some_and(is_identifier_char);

            if matches && !followed_by_word {
                for _ in 0..len {
                    self.advance();
                }
                return Some(*unit);
            }
        }
        None
    }

    /// Parse identifier or keyword. Keywords keep the case they were written in.
    fn identifier_or_keyword(&mut self, first: char, line: usize) -> Token {
        let mut ident = String::from(first);

        while let Some(ch) = self.peek() {
            if is_identifier_char(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if keywords::is_keyword(&ident) {
            Token::new(TokenKind::Keyword, ident, line)
        } else {
            Token::new(TokenKind::Id, ident, line)
        }
    }

    fn operator(&mut self, first: char, line: usize) -> Token {
        if let Some(next) = self.peek() {
            let pair: String = [first, next].iter().collect();
            if COMPOSED_OPERATORS.contains(&pair.as_str()) {
                self.advance();
                return Token::new(TokenKind::Operator, pair, line);
            }
        }
        Token::new(TokenKind::Operator, first.to_string(), line)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' && self.peek_ahead(1) == Some('*') {
                self.skip_block_comment()?;
            } else if ch == '#' {
                self.skip_line_comment();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Skip `# ...` through end of line
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip `#* ... *#`
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start_line = self.line;
        self.advance(); // #
        self.advance(); // *

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('#') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(ParseError::syntax("Unterminated block comment", start_line))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::errors::ErrorKind;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("SET x = 10\nPRINT x").unwrap();

        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Id,
                TokenKind::Operator,
                TokenKind::Integer,
                TokenKind::Keyword,
                TokenKind::Id,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].text(), "SET");
        assert_eq!(tokens[3].text(), "10");
        assert_eq!(tokens[4].line, 2);
        assert_eq!(tokens[6].value, None);
        assert_eq!(tokens[6].line, 2);
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn test_keywords_keep_case() {
        let tokens = tokenize("set Set SET").unwrap();
        for token in &tokens[..3] {
            assert_eq!(token.kind, TokenKind::Keyword);
            assert!(token.is_keyword("SET"));
        }
        assert_eq!(tokens[0].text(), "set");
        assert_eq!(tokens[1].text(), "Set");
    }

    #[test]
    fn test_time_normalization() {
        let tokens = tokenize("500ms 2m 1h 3s 1.5s").unwrap();
        let values: Vec<&str> = tokens[..5].iter().map(|t| t.text()).collect();
        assert_eq!(values, vec!["0.5", "120", "3600", "3", "1.5"]);
        assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::Time));
    }

    #[test]
    fn test_unit_glued_to_word_is_not_time() {
        let tokens = tokenize("5min").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Id);
        assert_eq!(tokens[1].text(), "min");
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("42 3.14").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].text(), "3.14");
    }

    #[test]
    fn test_invalid_numbers() {
        let err = tokenize("SET x = 1.2.3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.line, 1);

        let err = tokenize("\n99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_overflowing_float_and_time() {
        let huge = "9".repeat(400);

        let err = tokenize(&format!("SET x = {}.0", huge)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert!(err.message.ends_with("is out of range"));

        let err = tokenize(&format!("WAIT\n{}h", huge)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_integer_magnitude_left_to_parser() {
        // Fits u64 but not i64; the parser decides once the sign is known
        let tokens = tokenize("9223372036854775808").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text(), "9223372036854775808");
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("== != <= >= && || ++ -- + ( ,").unwrap();
        let ops: Vec<&str> = tokens[..11].iter().map(|t| t.text()).collect();
        assert_eq!(
            ops,
            vec!["==", "!=", "<=", ">=", "&&", "||", "++", "--", "+", "(", ","]
        );
        assert!(tokens[..11].iter().all(|t| t.kind == TokenKind::Operator));
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("# line\nSET #* block\ncomment *# x").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[0].is_keyword("SET"));
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].text(), "x");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("SET x = 1\n#* never closed\n\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize("PRINT \"hello\\nworld\"").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text(), "hello\\nworld");
    }

    #[test]
    fn test_multiline_string_line_numbers() {
        let tokens = tokenize("PRINT \"a\nb\"\nPRINT 1").unwrap();
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].text(), "a\nb");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("SET x = 1\nPRINT \"oops\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "Unterminated string literal");
    }

    #[test]
    fn test_single_letter_is_identifier() {
        let tokens = tokenize("PRESS KEY a").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Id);
    }
}
