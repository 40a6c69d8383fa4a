//! Single-pass structural scanner producing the flat token array.
//!
//! The scanner walks the input byte by byte, pushes a token per structural
//! element and tracks containment on an explicit stack of open objects,
//! arrays and object keys awaiting their value. Only structure is checked:
//! literals must have the right bytes, numbers are consumed as a maximal
//! lexeme without numeric validation, strings are skipped escape-aware but
//! never decoded.

use alloc::vec::Vec;

use crate::error::{Error, TokenizerError};
use crate::token::{JsonToken, TokenType, SIZE_MASK};

/// Where in the grammar the scanner currently stands. The split between the
/// `BeforeFirst*` and plain `Before*` states is what rejects trailing
/// commas: a closing bracket is only acceptable before the *first* entry or
/// after a complete value, never after a comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterValue,
    End,
}

/// An open token on the containment stack, by its array index.
#[derive(Debug, Clone, Copy)]
enum Open {
    Object(usize),
    Array(usize),
    Key(usize),
}

pub(crate) fn tokenize(
    source: &str,
    global: bool,
    filename: Option<&str>,
) -> Result<Vec<JsonToken>, Error> {
    Tokenizer {
        source,
        bytes: source.as_bytes(),
        global,
        filename,
        pos: 0,
        tokens: Vec::new(),
        stack: Vec::new(),
        state: State::Start,
    }
    .run()
}

struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    global: bool,
    filename: Option<&'a str>,
    pos: usize,
    tokens: Vec<JsonToken>,
    stack: Vec<Open>,
    state: State,
}

impl Tokenizer<'_> {
    fn run(mut self) -> Result<Vec<JsonToken>, Error> {
        if self.bytes.len() as u64 > SIZE_MASK {
            return Err(self.error_at(0, TokenizerError::InputTooLarge));
        }

        loop {
            self.skip_whitespace();
            let Some(&byte) = self.bytes.get(self.pos) else {
                if self.state == State::End {
                    return Ok(self.tokens);
                }
                return Err(self.error_here(TokenizerError::UnexpectedEndOfInput));
            };

            match self.state {
                State::Start
                | State::BeforePropertyValue
                | State::BeforeFirstArrayValue
                | State::BeforeArrayValue => self.value(byte)?,

                State::BeforeFirstPropertyName => match byte {
                    b'}' => self.close_container(TokenType::Object),
                    b'"' => self.key()?,
                    _ => {
                        return Err(
                            self.error_here(TokenizerError::ExpectedKey(self.current_char()))
                        )
                    }
                },

                // a comma was consumed, so a closing '}' here would be a
                // trailing comma
                State::BeforePropertyName => match byte {
                    b'"' => self.key()?,
                    _ => {
                        return Err(
                            self.error_here(TokenizerError::ExpectedKey(self.current_char()))
                        )
                    }
                },

                State::AfterPropertyName => match byte {
                    b':' => {
                        self.pos += 1;
                        self.state = State::BeforePropertyValue;
                    }
                    _ => {
                        return Err(
                            self.error_here(TokenizerError::ExpectedColon(self.current_char()))
                        )
                    }
                },

                State::AfterValue => match self.stack.last().copied() {
                    Some(Open::Object(_)) => match byte {
                        b',' => {
                            self.pos += 1;
                            self.state = State::BeforePropertyName;
                        }
                        b'}' => self.close_container(TokenType::Object),
                        _ => {
                            return Err(self.error_here(
                                TokenizerError::ExpectedCommaOrObjectEnd(self.current_char()),
                            ))
                        }
                    },
                    Some(Open::Array(_)) => match byte {
                        b',' => {
                            self.pos += 1;
                            self.state = State::BeforeArrayValue;
                        }
                        b']' => self.close_container(TokenType::Array),
                        _ => {
                            return Err(self.error_here(
                                TokenizerError::ExpectedCommaOrArrayEnd(self.current_char()),
                            ))
                        }
                    },
                    Some(Open::Key(_)) | None => {
                        unreachable!("value completion pops keys and leaves a container on top")
                    }
                },

                State::End => {
                    return Err(
                        self.error_here(TokenizerError::TrailingData(self.current_char()))
                    )
                }
            }
        }
    }

    fn value(&mut self, byte: u8) -> Result<(), Error> {
        match byte {
            b'{' => {
                let index = self.tokens.len();
                self.tokens
                    .push(JsonToken::container(TokenType::Object, self.pos));
                self.stack.push(Open::Object(index));
                self.pos += 1;
                self.state = State::BeforeFirstPropertyName;
            }
            b'[' => {
                let index = self.tokens.len();
                self.tokens
                    .push(JsonToken::container(TokenType::Array, self.pos));
                self.stack.push(Open::Array(index));
                self.pos += 1;
                self.state = State::BeforeFirstArrayValue;
            }
            b']' if self.state == State::BeforeFirstArrayValue => {
                self.close_container(TokenType::Array);
            }
            b'"' => {
                let token = self.scan_string(false)?;
                self.tokens.push(token);
                self.complete_value();
            }
            b't' => self.literal("true", TokenType::Bool)?,
            b'f' => self.literal("false", TokenType::Bool)?,
            b'n' => self.literal("null", TokenType::Null)?,
            b'-' | b'0'..=b'9' => self.number(),
            _ => {
                return Err(self.error_here(TokenizerError::ExpectedValue(self.current_char())));
            }
        }
        Ok(())
    }

    fn literal(&mut self, text: &'static str, kind: TokenType) -> Result<(), Error> {
        let end = self.pos + text.len();
        if self.bytes.get(self.pos..end) != Some(text.as_bytes()) {
            return Err(self.error_here(TokenizerError::InvalidLiteral));
        }
        self.tokens
            .push(JsonToken::scalar(kind, self.pos, text.len()));
        self.pos = end;
        self.complete_value();
        Ok(())
    }

    /// Consumes the maximal run of number-ish bytes. The lexeme is not
    /// validated here; a parse pass checks the grammar when asked.
    fn number(&mut self) {
        let start = self.pos;
        while let Some(&byte) = self.bytes.get(self.pos) {
            match byte {
                b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-' => self.pos += 1,
                _ => break,
            }
        }
        self.tokens
            .push(JsonToken::scalar(TokenType::Number, start, self.pos - start));
        self.complete_value();
    }

    /// Skips to the unescaped closing quote. Only `"` and `\` matter here;
    /// escape sequences are validated when the string is parsed.
    fn scan_string(&mut self, key: bool) -> Result<JsonToken, Error> {
        let start = self.pos;
        let mut escaped = false;
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None => return Err(self.error_at(start, TokenizerError::UnterminatedString)),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    escaped = true;
                    if self.pos + 1 >= self.bytes.len() {
                        return Err(self.error_at(start, TokenizerError::UnterminatedString));
                    }
                    self.pos += 2;
                }
                Some(_) => self.pos += 1,
            }
        }
        Ok(JsonToken::string(
            start,
            self.pos - start,
            key,
            escaped,
            self.global && !escaped,
        ))
    }

    fn key(&mut self) -> Result<(), Error> {
        let token = self.scan_string(true)?;
        let index = self.tokens.len();
        self.tokens.push(token);
        self.stack.push(Open::Key(index));
        self.state = State::AfterPropertyName;
        Ok(())
    }

    fn close_container(&mut self, kind: TokenType) {
        // the states only route a closer here with its opener on top
        let index = match self.stack.pop() {
            Some(Open::Object(index)) if kind == TokenType::Object => index,
            Some(Open::Array(index)) if kind == TokenType::Array => index,
            _ => unreachable!("closer routed without a matching opener"),
        };
        self.pos += 1;
        let count = (self.tokens.len() - index - 1) as u64;
        let token = &mut self.tokens[index];
        token.set_end(self.pos);
        token.set_child_count(count);
        self.complete_value();
    }

    /// A value (scalar or closed container) is complete: attribute it to a
    /// pending object key and derive the next state from the stack top.
    fn complete_value(&mut self) {
        if let Some(Open::Key(_)) = self.stack.last() {
            self.stack.pop();
        }
        self.state = match self.stack.last() {
            None => State::End,
            Some(_) => State::AfterValue,
        };
    }

    fn skip_whitespace(&mut self) {
        while matches!(
            self.bytes.get(self.pos),
            Some(b' ' | b'\t' | b'\r' | b'\n')
        ) {
            self.pos += 1;
        }
    }

    /// The character at the cursor, for diagnostics. The cursor only ever
    /// rests on a character boundary.
    fn current_char(&self) -> char {
        self.source[self.pos..]
            .chars()
            .next()
            .unwrap_or('\u{FFFD}')
    }

    fn error_here(&self, error: TokenizerError) -> Error {
        self.error_at(self.pos, error)
    }

    fn error_at(&self, offset: usize, error: TokenizerError) -> Error {
        Error::at(self.filename, self.source, offset, error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<JsonToken> {
        tokenize(source, false, None).unwrap()
    }

    #[test]
    fn whitespace_never_reaches_token_data() {
        let tokens = tokens(" \t\r\n{ \"a\" :\n1 } ");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token_type(), TokenType::Object);
        assert_eq!(tokens[1].token_type(), TokenType::String);
        assert!(tokens[1].is_object_key());
        assert_eq!(tokens[2].token_type(), TokenType::Number);
    }

    #[test]
    fn container_extents_include_the_closers() {
        let tokens = tokens(r#"[{"k":[0]}]"#);
        // data of the root spans the whole non-whitespace extent
        assert_eq!(tokens[0].stored_child_count(), 4);
        let root_size = 11;
        assert_eq!(
            (tokens[0].offset(), tokens[0].size()),
            (0, root_size)
        );
    }

    #[test]
    fn escaped_strings_are_flagged_not_decoded() {
        let tokens = tokens("[\"a\\u0041\", \"plain\"]");
        assert!(tokens[1].is_string_escaped());
        assert!(!tokens[1].is_parsed());
        assert!(!tokens[2].is_string_escaped());
    }

    #[test]
    fn number_lexemes_are_maximal_and_unchecked() {
        // structurally a single number token, numerically nonsense
        let tokens = tokens("1-2e++5");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].size(), 7);
        assert!(!tokens[0].is_parsed());
    }

    #[test]
    fn literals_must_match_exactly() {
        assert!(tokenize("truE", false, None).is_err());
        assert!(tokenize("nul", false, None).is_err());
        assert!(tokenize("fals", false, None).is_err());
    }

    #[test]
    fn global_inputs_mark_clean_strings() {
        let tokens = tokenize(r#"["a", "b\n"]"#, true, None).unwrap();
        assert!(tokens[1].is_string_global());
        // escape processing will need a buffer, so no global view
        assert!(!tokens[2].is_string_global());
    }
}
