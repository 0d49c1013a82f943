//! Token definitions and the keyword/punctuation tables.

use std::fmt;

/// The kind of a lexical token.
///
/// This is a closed set: the lexer either produces one of these kinds or
/// fails with a `LexError`. `Indent` and `Dedent` are synthetic; they mark
/// block boundaries derived from column positions rather than source
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Always the last token, exactly once.
    Eof,

    // Keywords
    /// `print`
    Print,
    /// `None`
    None,
    /// `True`
    True,
    /// `False`
    False,
    /// `pass`
    Pass,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,

    // Literals and identifiers
    /// Unsigned integer literal.
    Int,
    /// Unsigned float literal (contains a `.`).
    Float,
    /// Single-quoted string literal; the lexeme holds the decoded text.
    Str,
    /// Identifier.
    Ident,

    // Punctuation and operators
    /// `=`
    Equal,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// End of a logical line.
    Newline,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// Block open (column pushed on the indent stack).
    Indent,
    /// Block close (column popped off the indent stack).
    Dedent,
}

impl TokenKind {
    /// Uppercase name used by the token trace and in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eof => "EOF",
            Self::Print => "PRINT",
            Self::None => "NONE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Pass => "PASS",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Str => "STRING",
            Self::Ident => "NAME",
            Self::Equal => "EQUAL",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::EqualEqual => "EQEQUAL",
            Self::NotEqual => "NOTEQUAL",
            Self::Less => "LESS",
            Self::LessEqual => "LESSEQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEqual => "GREATEREQUAL",
            Self::Newline => "NEWLINE",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::Indent => "INDENT",
            Self::Dedent => "DEDENT",
        }
    }

    /// Look up a keyword; `None` if `text` is an ordinary identifier.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        match text {
            "print" => Some(Self::Print),
            "None" => Some(Self::None),
            "True" => Some(Self::True),
            "False" => Some(Self::False),
            "pass" => Some(Self::Pass),
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "while" => Some(Self::While),
            _ => Option::None,
        }
    }

    /// Single-character punctuation table.
    #[must_use]
    pub const fn one_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Self::Equal),
            '(' => Some(Self::LeftParen),
            ')' => Some(Self::RightParen),
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Star),
            '/' => Some(Self::Slash),
            '<' => Some(Self::Less),
            '>' => Some(Self::Greater),
            '\n' => Some(Self::Newline),
            ',' => Some(Self::Comma),
            ':' => Some(Self::Colon),
            _ => Option::None,
        }
    }

    /// Two-character punctuation table, consulted before [`Self::one_char`].
    #[must_use]
    pub const fn two_char(first: char, second: char) -> Option<Self> {
        match (first, second) {
            ('=', '=') => Some(Self::EqualEqual),
            ('!', '=') => Some(Self::NotEqual),
            ('<', '=') => Some(Self::LessEqual),
            ('>', '=') => Some(Self::GreaterEqual),
            _ => Option::None,
        }
    }

    /// Whether `c` can open a punctuation token. `!` is included even
    /// though it is only valid when followed by `=`.
    #[must_use]
    pub const fn is_punct_start(c: char) -> bool {
        Self::one_char(c).is_some() || c == '!'
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text of the token. Synthetic tokens use `{` (indent), `}`
    /// (dedent) and the empty string (end of input).
    pub lexeme: String,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 1-based column of the token's first character.
    pub column: u32,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// Whether this is the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// One aligned trace row: line, column, kind, debug-quoted lexeme.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {:<5} {:<13} {:?}",
            self.line,
            self.column,
            self.kind.name(),
            self.lexeme
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("print"), Some(TokenKind::Print));
        assert_eq!(TokenKind::keyword("None"), Some(TokenKind::None));
        assert_eq!(TokenKind::keyword("whileloop"), None);
        assert_eq!(TokenKind::keyword("Print"), None);
    }

    #[test]
    fn test_two_char_before_one_char() {
        assert_eq!(TokenKind::two_char('=', '='), Some(TokenKind::EqualEqual));
        assert_eq!(TokenKind::two_char('!', '='), Some(TokenKind::NotEqual));
        assert_eq!(TokenKind::two_char('<', '='), Some(TokenKind::LessEqual));
        assert_eq!(TokenKind::two_char('>', '='), Some(TokenKind::GreaterEqual));
        assert_eq!(TokenKind::two_char('=', '+'), None);
    }

    #[test]
    fn test_bang_only_pairs_with_equal() {
        assert!(TokenKind::is_punct_start('!'));
        assert_eq!(TokenKind::one_char('!'), None);
    }

    #[test]
    fn test_newline_is_a_punct_token() {
        assert_eq!(TokenKind::one_char('\n'), Some(TokenKind::Newline));
    }

    #[test]
    fn test_trace_row_format() {
        let token = Token::new(TokenKind::Ident, "x", 3, 7);
        assert_eq!(token.to_string(), "3     7     NAME          \"x\"");
    }

    #[test]
    fn test_trace_row_escapes_newline_lexeme() {
        let token = Token::new(TokenKind::Newline, "\n", 1, 6);
        assert_eq!(token.to_string(), "1     6     NEWLINE       \"\\n\"");
    }
}
