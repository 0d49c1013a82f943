//! The scanner: source text to token stream.
//!
//! One pass, one token of lookahead at the character level. The scanner
//! classifies on the first character of each token: digit or `.` starts a
//! number, `'` a string, letter or `_` a word, anything in the punctuation
//! tables a punctuation token. Everything else is an invalid character.
//!
//! Indentation is handled after scanning: whenever the previous token was a
//! NEWLINE (or the stream is empty), the new token's column is compared
//! against the indent stack and synthetic INDENT/DEDENT tokens are inserted
//! in front of it. End of input drains the stack so every open block is
//! closed before EOF.

use slate_core::LexError;
use smallvec::{smallvec, SmallVec};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::LexResult;

/// The scanner. Construct with [`Lexer::new`], drive with
/// [`Lexer::tokenize`]; the top-level [`tokenize`](crate::tokenize)
/// function does both.
#[derive(Debug)]
pub struct Lexer {
    cursor: Cursor,
    /// Current unconsumed character; primed with a space so the first
    /// whitespace skip pulls the real first character.
    ch: Option<char>,
    /// Columns of open blocks. The bottom entry is the module level (1)
    /// and is never popped.
    indents: SmallVec<[u32; 8]>,
}

impl Lexer {
    /// Create a scanner over `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            ch: Some(' '),
            indents: smallvec![1],
        }
    }

    /// Scan the whole source. The returned stream always ends with exactly
    /// one EOF token; the first scan failure aborts with a [`LexError`].
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_spaces();
            let line = self.cursor.line();
            let column = self.cursor.column();

            let token = match self.ch {
                None => Token::new(TokenKind::Eof, "", line, column),
                Some(c) if c.is_ascii_digit() || c == '.' => self.scan_number(line, column)?,
                Some('\'') => self.scan_string(line, column)?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.scan_word(line, column),
                Some(c) if TokenKind::is_punct_start(c) => self.scan_punct(c, line, column)?,
                Some(c) => return Err(LexError::invalid_character(c, line, column)),
            };

            // Indentation only changes at the start of a logical line.
            if tokens.last().map_or(true, |t: &Token| t.kind == TokenKind::Newline) {
                self.check_indent(&mut tokens, line, column)?;
            }

            let at_eof = token.is_eof();
            tokens.push(token);
            if at_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn advance(&mut self) {
        self.ch = self.cursor.bump();
    }

    /// Skip horizontal whitespace. Newlines are tokens, not whitespace.
    fn skip_spaces(&mut self) {
        while let Some(c) = self.ch {
            if c == '\n' || !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Scan an unsigned numeric literal. The token is a float exactly when
    /// the lexeme contains a `.`; a second `.` is malformed, as is a bare
    /// `.` with no digits at all.
    fn scan_number(&mut self, line: u32, column: u32) -> LexResult<Token> {
        let mut kind = if self.ch == Some('.') {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        let mut lexeme = String::new();
        loop {
            if let Some(c) = self.ch {
                lexeme.push(c);
            }
            self.advance();
            match self.ch {
                Some(c) if c.is_ascii_digit() => {}
                Some('.') => {
                    if kind == TokenKind::Float {
                        return Err(LexError::invalid_number(line, column));
                    }
                    kind = TokenKind::Float;
                }
                _ => break,
            }
        }
        if lexeme == "." {
            return Err(LexError::invalid_number(line, column));
        }
        Ok(Token::new(kind, lexeme, line, column))
    }

    /// Scan a single-quoted string literal. The stored lexeme is the
    /// decoded text: escapes are resolved and the quotes dropped.
    fn scan_string(&mut self, line: u32, column: u32) -> LexResult<Token> {
        let mut lexeme = String::new();
        self.cursor.set_in_string(true);
        loop {
            self.advance();
            match self.ch {
                None | Some('\n') => return Err(LexError::unterminated_string(line, column)),
                Some('\'') => break,
                Some('\\') => {
                    self.advance();
                    match self.ch {
                        Some('t') => lexeme.push('\t'),
                        Some('r') => lexeme.push('\r'),
                        Some('n') => lexeme.push('\n'),
                        Some('v') => lexeme.push('\u{0b}'),
                        // Backslash-newline continues the string on the
                        // next line with nothing appended.
                        Some('\n') => {}
                        Some(c) => lexeme.push(c),
                        None => return Err(LexError::unterminated_string(line, column)),
                    }
                }
                Some(c) => lexeme.push(c),
            }
        }
        self.advance();
        self.cursor.set_in_string(false);
        Ok(Token::new(TokenKind::Str, lexeme, line, column))
    }

    /// Scan an identifier or keyword: `[A-Za-z_][A-Za-z0-9_]*`.
    fn scan_word(&mut self, line: u32, column: u32) -> Token {
        let mut lexeme = String::new();
        while let Some(c) = self.ch {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        let kind = TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, line, column)
    }

    /// Scan punctuation, trying the two-character table first. A `!` that
    /// is not followed by `=` has no single-character reading and is
    /// rejected here.
    fn scan_punct(&mut self, first: char, line: u32, column: u32) -> LexResult<Token> {
        self.advance();
        if let Some(second) = self.ch {
            if let Some(kind) = TokenKind::two_char(first, second) {
                self.advance();
                let mut lexeme = String::new();
                lexeme.push(first);
                lexeme.push(second);
                return Ok(Token::new(kind, lexeme, line, column));
            }
        }
        match TokenKind::one_char(first) {
            Some(kind) => Ok(Token::new(kind, first.to_string(), line, column)),
            None => Err(LexError::invalid_character(first, line, column)),
        }
    }

    /// Compare the new token's column against the indent stack, pushing
    /// INDENT/DEDENT tokens as needed. Dedenting pops one level per DEDENT
    /// until the column matches exactly; overshooting means the column
    /// aligns with no open block.
    fn check_indent(&mut self, tokens: &mut Vec<Token>, line: u32, column: u32) -> LexResult<()> {
        let top = self.indents.last().copied().unwrap_or(1);
        if column > top {
            self.indents.push(column);
            tokens.push(Token::new(TokenKind::Indent, "{", line, column));
        } else if column < top {
            loop {
                tokens.push(Token::new(TokenKind::Dedent, "}", line, column));
                self.indents.pop();
                let top = self.indents.last().copied().unwrap_or(0);
                if top == column {
                    break;
                }
                if top < column {
                    return Err(LexError::bad_indentation(line, column));
                }
            }
        }
        Ok(())
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
