//! SQL lexer.
//!
//! [`TokenLine::lex`] converts one line of SQL source into a sequence of
//! positioned [`Token`]s. It handles keywords (case-insensitively),
//! identifiers, numeric and string literals, and operators, and it never
//! fails: every problem becomes a [`CompileError`] on the result and
//! scanning continues where sensible, so downstream stages can keep
//! reporting errors off a best-effort token list.

use std::rc::Rc;

use super::error::{CompileError, CompileErrorKind};
use super::token::{Token, TokenKind, TokenRef};

/// The lexer's output for one line of source: tokens and errors, in
/// discovery order, either possibly empty.
#[derive(Debug, Clone, Default)]
pub struct TokenLine {
    pub tokens: Vec<TokenRef>,
    pub errors: Vec<CompileError>,
}

impl TokenLine {
    /// Lexes one line of SQL source.
    pub fn lex(input: &str) -> TokenLine {
        Lexer::new(input).run()
    }
}

/// Single-pass scanner over one source line.
///
/// The cursor moves left to right with one character of lookahead. Columns
/// are 1-based character positions.
struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: TokenLine,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: TokenLine::default(),
        }
    }

    fn run(mut self) -> TokenLine {
        while let Some(c) = self.current() {
            if is_ignored(c) {
                self.pos += 1;
            } else if let Some(kind) = TokenKind::two_char_op(c, self.peek().unwrap_or('\0')) {
                let column = self.column();
                let value: String = [c, self.peek().unwrap()].iter().collect();
                self.emit(column, value, kind);
                self.pos += 2;
            } else if let Some(kind) = TokenKind::single_char_op(c) {
                let column = self.column();
                self.emit(column, c.to_string(), kind);
                self.pos += 1;
            } else if c == '"' {
                self.scan_string();
            } else if c.is_ascii_digit() {
                self.scan_number();
            } else if is_identifier_start(c) {
                self.scan_identifier();
            } else {
                self.error(
                    CompileErrorKind::UnexpectedChar,
                    self.column(),
                    c.to_string(),
                    format!("illegal char found: '{c}'"),
                );
                self.pos += 1;
            }
        }
        self.line
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    /// 1-based column of the cursor.
    fn column(&self) -> usize {
        self.pos + 1
    }

    fn text(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().collect()
    }

    /// Scans a numeric literal; the cursor is on its first digit.
    ///
    /// A decimal point must be followed by a digit. A trailing point still
    /// yields a float token made of the digits scanned so far, plus an
    /// error; the point itself is consumed and discarded.
    fn scan_number(&mut self) {
        let head = self.pos;
        let column = head + 1;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        if self.current() != Some('.') {
            self.emit(column, self.text(head, self.pos), TokenKind::IntegerLiteral);
            return;
        }

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            while self.current().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            self.emit(column, self.text(head, self.pos), TokenKind::FloatLiteral);
        } else {
            self.emit(column, self.text(head, self.pos), TokenKind::FloatLiteral);
            self.error(
                CompileErrorKind::InvalidFloat,
                column,
                self.text(head, self.pos + 1),
                "'.' should be followed by digit",
            );
            self.pos += 1;
        }
    }

    /// Scans an identifier run; the cursor is on its first character.
    /// Keyword reclassification happens in [`emit`](Self::emit).
    fn scan_identifier(&mut self) {
        let head = self.pos;
        while self.current().is_some_and(is_identifier_char) {
            self.pos += 1;
        }
        self.emit(head + 1, self.text(head, self.pos), TokenKind::Identifier);
    }

    /// Scans a string literal; the cursor is on the opening quote.
    ///
    /// The scan collects the raw character run including escape sequences;
    /// decoding is deferred to [`emit`](Self::emit). A newline, NUL, or end
    /// of line before the closing quote ends the literal early: the raw run
    /// is still emitted as a string token, an `IncompleteString` error
    /// referencing it is recorded, and the terminator is left for the main
    /// loop (which skips it as whitespace).
    fn scan_string(&mut self) {
        let column = self.column();
        self.pos += 1; // opening quote
        let run = self.pos;

        loop {
            match self.current() {
                None | Some('\n') | Some('\0') => {
                    self.emit_incomplete_string(column, self.text(run, self.pos));
                    return;
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.current() {
                        None | Some('\n') | Some('\0') => {
                            self.emit_incomplete_string(column, self.text(run, self.pos));
                            return;
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                Some('"') => {
                    let raw = self.text(run, self.pos);
                    self.pos += 1;
                    self.emit(column, raw, TokenKind::StringLiteral);
                    return;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Constructs and emits a token.
    ///
    /// Identifiers are re-tagged as keywords when a case-folded copy of the
    /// lexeme matches the keyword table; the stored value keeps the original
    /// spelling. String literal values arrive raw and are escape-decoded
    /// here; every unrecognized escape is recorded as an error against the
    /// emitted token while the backslash and the offending character pass
    /// through into the value literally.
    fn emit(&mut self, column: usize, value: String, kind: TokenKind) {
        match kind {
            TokenKind::Identifier => {
                let kind = TokenKind::keyword(&value).unwrap_or(TokenKind::Identifier);
                self.line.tokens.push(Rc::new(Token::new(column, value, kind)));
            }
            TokenKind::StringLiteral => {
                let (decoded, invalid_escapes) = unescape(&value);
                let token = Rc::new(Token::new(column, decoded, kind));
                for _ in 0..invalid_escapes {
                    self.line.errors.push(CompileError::new(
                        CompileErrorKind::InvalidEscapeChar,
                        token.clone(),
                        "invalid escape char found in string literal",
                    ));
                }
                self.line.tokens.push(token);
            }
            _ => {
                self.line.tokens.push(Rc::new(Token::new(column, value, kind)));
            }
        }
    }

    /// Emits the undecoded run of an unterminated string literal together
    /// with an `IncompleteString` error referencing it.
    fn emit_incomplete_string(&mut self, column: usize, raw: String) {
        let token = Rc::new(Token::new(column, raw, TokenKind::StringLiteral));
        self.line.errors.push(CompileError::new(
            CompileErrorKind::IncompleteString,
            token.clone(),
            "incomplete string, string must be closed with '\"'",
        ));
        self.line.tokens.push(token);
    }

    /// Records an error with a fresh carrier token for the offending run.
    fn error(
        &mut self,
        kind: CompileErrorKind,
        column: usize,
        value: String,
        message: impl Into<String>,
    ) {
        let token = Rc::new(Token::new(column, value, TokenKind::Unknown));
        self.line.errors.push(CompileError::new(kind, token, message));
    }
}

/// Decodes the escape sequences of a raw string literal body.
///
/// Returns the decoded text and the number of unrecognized escapes, which
/// are passed through with their backslash intact.
fn unescape(raw: &str) -> (String, usize) {
    let mut out = String::with_capacity(raw.len());
    let mut invalid = 0;
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
                invalid += 1;
            }
            None => {
                out.push('\\');
                invalid += 1;
            }
        }
    }
    (out, invalid)
}

fn is_ignored(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\0')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}
