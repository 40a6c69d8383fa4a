use alloc::string::String;
use core::fmt;

/// An error with the position it happened at.
///
/// Rendered as `filename:line:column: message`, with `<string>` standing in
/// for input that did not come from a file. Line and column are 1-based;
/// the column is a byte position, not a display width.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    filename: Option<String>,
    line: usize,
    column: usize,
    kind: ErrorKind,
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl Error {
    pub(crate) fn at(filename: Option<&str>, source: &str, offset: usize, kind: ErrorKind) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            filename: filename.map(String::from),
            line,
            column,
            kind,
        }
    }

    #[cfg(feature = "std")]
    pub(crate) fn io(filename: String, message: String) -> Self {
        Self {
            filename: Some(filename),
            line: 0,
            column: 0,
            kind: ErrorKind::Io(message),
        }
    }

    /// 1-based line of the failing token or cursor, 0 for I/O errors.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based byte column of the failing token or cursor, 0 for I/O errors.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filename = self.filename.as_deref().unwrap_or("<string>");
        if self.line == 0 {
            write!(f, "{filename}: {}", self.kind)
        } else {
            write!(f, "{filename}:{}:{}: {}", self.line, self.column, self.kind)
        }
    }
}

/// What went wrong, grouped by the stage that rejected the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The file could not be read.
    #[error("{0}")]
    Io(String),
    /// The scanner found a structural error.
    #[error("{0}")]
    Tokenizer(#[from] TokenizerError),
    /// A value decoder rejected a lexeme.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// An integer does not fit the requested width.
    #[error("{0}")]
    Range(#[from] RangeError),
    /// A malformed string escape.
    #[error("{0}")]
    Escape(#[from] EscapeError),
}

/// Structural errors raised while tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenizerError {
    #[error("expected a value but got '{0}'")]
    ExpectedValue(char),
    #[error("expected an object key but got '{0}'")]
    ExpectedKey(char),
    #[error("expected ':' but got '{0}'")]
    ExpectedColon(char),
    #[error("expected ',' or '}}' but got '{0}'")]
    ExpectedCommaOrObjectEnd(char),
    #[error("expected ',' or ']' but got '{0}'")]
    ExpectedCommaOrArrayEnd(char),
    #[error("expected end of input but got '{0}'")]
    TrailingData(char),
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("input is too large to tokenize")]
    InputTooLarge,
}

/// A lexeme that does not decode as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid null literal '{0}'")]
    InvalidNull(String),
    #[error("invalid bool literal '{0}'")]
    InvalidBool(String),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("number '{0}' has a fractional part")]
    FractionalPart(String),
    #[error("number '{0}' has an exponent")]
    Exponent(String),
    #[error("number '{0}' is negative")]
    Negative(String),
}

/// An integer lexeme whose magnitude exceeds the requested width.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value '{value}' does not fit into {target}")]
pub struct RangeError {
    pub(crate) value: String,
    pub(crate) target: &'static str,
}

/// A malformed escape sequence inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
    #[error("truncated escape sequence")]
    Truncated,
}

/// 1-based line and byte column of `offset`, counting `\n` only.
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source.as_bytes()[..offset.min(source.len())];
    let line = 1 + prefix.iter().filter(|&&b| b == b'\n').count();
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |at| at + 1);
    (line, offset - line_start + 1)
}
