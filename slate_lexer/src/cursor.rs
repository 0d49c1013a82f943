//! Character-level reader with position tracking.
//!
//! The cursor hands the scanner one character per [`Cursor::bump`] call and
//! maintains the state the scanner must never see directly:
//!
//! - 1-based line and column numbers. A previous `'\n'` marks the start of
//!   a new line; the line counter advances on the *next* read, so the
//!   newline itself is reported on the line it terminates.
//! - The blank-line flag. A `'\n'` that ends a line containing no
//!   non-whitespace characters is handed out as `' '`, which keeps blank
//!   lines from producing NEWLINE tokens or indentation checks.
//! - Comment stripping. A `'#'` outside a string swallows the rest of the
//!   line, including its `'\n'`, without touching the blank-line flag, so
//!   a comment-only line still counts as blank.
//!
//! At end of input the column is pinned to 1 and every further `bump`
//! returns `None`. A missing final newline is supplied at construction so
//! the last line always terminates.

/// Character reader over the source text.
#[derive(Debug)]
pub(crate) struct Cursor {
    chars: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
    /// Previous character handed out; `Some('\n')` arms the new-line
    /// bookkeeping, `None` means start of input or end of input.
    prev: Option<char>,
    blank_line: bool,
    in_string: bool,
}

impl Cursor {
    pub(crate) fn new(source: &str) -> Self {
        let mut chars: Vec<char> = source.chars().collect();
        if chars.last().is_some_and(|&c| c != '\n') {
            chars.push('\n');
        }
        Self {
            chars,
            index: 0,
            line: 0,
            column: 0,
            prev: Some('\n'),
            blank_line: true,
            in_string: false,
        }
    }

    /// Line of the most recently returned character (1-based).
    pub(crate) const fn line(&self) -> u32 {
        self.line
    }

    /// Column of the most recently returned character (1-based; 1 at end
    /// of input).
    pub(crate) const fn column(&self) -> u32 {
        self.column
    }

    /// While set, `'#'` is ordinary string content rather than a comment.
    pub(crate) fn set_in_string(&mut self, in_string: bool) {
        self.in_string = in_string;
    }

    /// Read the next character, or `None` at end of input.
    pub(crate) fn bump(&mut self) -> Option<char> {
        if self.prev == Some('\n') {
            self.line += 1;
            self.column = 0;
            self.blank_line = true;
        }

        let Some(&first) = self.chars.get(self.index) else {
            self.column = 1;
            self.prev = None;
            return None;
        };
        self.index += 1;
        self.column += 1;

        let mut c = first;
        if c == '#' && !self.in_string {
            loop {
                match self.chars.get(self.index) {
                    Some(&next) => {
                        self.index += 1;
                        if next == '\n' {
                            c = '\n';
                            break;
                        }
                    }
                    None => {
                        self.column = 1;
                        self.prev = None;
                        return None;
                    }
                }
            }
        }

        if !c.is_whitespace() {
            self.blank_line = false;
        }
        self.prev = Some(c);

        // A newline ending a still-blank line degrades to plain whitespace.
        if c == '\n' && self.blank_line {
            Some(' ')
        } else {
            Some(c)
        }
    }
}
