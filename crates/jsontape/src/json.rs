//! The reader: owns the input, the token array and the unescape buffers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::{Error, ErrorKind, ParseError};
use crate::input::Input;
use crate::numbers;
use crate::options::Options;
use crate::token::{JsonToken, ParsedType, TokenRef, TokenType};
use crate::tokenizer;
use crate::unescape;

/// A tokenized JSON document with deferred value parsing.
///
/// Created by [`Json::from_string`], [`Json::from_static`] or
/// [`Json::from_file`]. The token array is depth-first: [`Json::root`] is
/// token 0 and covers the whole document. `parse_*` methods walk a subtree
/// and cache decoded values inside the visited tokens; each returns at the
/// first failing token, leaving earlier tokens parsed and later ones
/// untouched, and is a no-op on tokens that already hold the requested
/// representation.
///
/// The reader is movable but deliberately not cloneable; tokens borrow from
/// it and stay valid for its whole life.
#[derive(Debug)]
pub struct Json {
    input: Input,
    tokens: Vec<JsonToken>,
    strings: Vec<String>,
}

/// One decoded number, tagged with the representation to cache.
enum Decoded {
    Double(f64),
    Float(f32),
    UnsignedInt(u32),
    Int(i32),
    UnsignedLong(u64),
    #[cfg(target_pointer_width = "64")]
    Long(i64),
}

impl Json {
    /// Tokenizes `source`, copying it into the reader, and applies the
    /// passes selected in `options` to the root.
    pub fn from_string(source: &str, options: Options) -> Result<Json, Error> {
        Self::tokenize(Input::owned(source.to_string(), None), options)
    }

    /// Tokenizes `source` without copying: tokens reference the `'static`
    /// string directly, and unescaped string views keep its lifetime (see
    /// [`TokenRef::as_global_str`]).
    pub fn from_static(source: &'static str, options: Options) -> Result<Json, Error> {
        Self::tokenize(Input::global(source), options)
    }

    pub(crate) fn tokenize(input: Input, options: Options) -> Result<Json, Error> {
        let tokens = tokenizer::tokenize(input.as_str(), input.is_global(), input.filename())?;
        let mut json = Json {
            input,
            tokens,
            strings: Vec::new(),
        };
        json.apply_options(options)?;
        Ok(json)
    }

    fn apply_options(&mut self, options: Options) -> Result<(), Error> {
        if options.parse_literals {
            self.parse_literals(0)?;
        }
        if options.parse_doubles {
            self.parse_doubles(0)?;
        } else if options.parse_floats {
            self.parse_floats(0)?;
        }
        if options.parse_strings {
            self.parse_strings(0)?;
        } else if options.parse_string_keys {
            self.parse_string_keys(0)?;
        }
        Ok(())
    }

    /// The token array in depth-first order. The first token is the root.
    pub fn tokens(&self) -> &[JsonToken] {
        &self.tokens
    }

    /// The root token, always present on a successfully tokenized document.
    pub fn root(&self) -> TokenRef<'_> {
        TokenRef::new(self, 0)
    }

    /// The token at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn token(&self, index: usize) -> TokenRef<'_> {
        assert!(
            index < self.tokens.len(),
            "token(): index {index} out of range for {} tokens",
            self.tokens.len(),
        );
        TokenRef::new(self, index)
    }

    #[inline]
    pub(crate) fn source_str(&self) -> &str {
        self.input.as_str()
    }

    pub(crate) fn global_source(&self) -> Option<&'static str> {
        self.input.global_str()
    }

    pub(crate) fn unescape_buffer(&self, index: usize) -> &str {
        &self.strings[index]
    }

    /// One past the last token of the subtree rooted at `token`.
    fn subtree_end(&self, token: usize) -> usize {
        token + self.token(token).child_count() + 1
    }

    fn data_of(&self, index: usize) -> &str {
        let token = &self.tokens[index];
        &self.input.as_str()[token.offset()..token.offset() + token.size()]
    }

    fn error_at_token(&self, index: usize, kind: ErrorKind) -> Error {
        Error::at(
            self.input.filename(),
            self.input.as_str(),
            self.tokens[index].offset(),
            kind,
        )
    }

    /// Parses `null`, `true` and `false` literals in the subtree rooted at
    /// `token`, making them readable through [`JsonToken::as_null`] and
    /// [`JsonToken::as_bool`]. Other tokens and already-parsed literals are
    /// skipped.
    pub fn parse_literals(&mut self, token: usize) -> Result<(), Error> {
        let end = self.subtree_end(token);
        for index in token..end {
            let current = self.tokens[index];
            match current.token_type() {
                TokenType::Null if !current.is_parsed() => {
                    if self.data_of(index) != "null" {
                        let lexeme = self.data_of(index).to_string();
                        return Err(
                            self.error_at_token(index, ParseError::InvalidNull(lexeme).into())
                        );
                    }
                    self.tokens[index].mark_parsed_other();
                }
                TokenType::Bool if !current.is_parsed() => {
                    let value = match self.data_of(index) {
                        "true" => true,
                        "false" => false,
                        other => {
                            let lexeme = other.to_string();
                            return Err(
                                self.error_at_token(index, ParseError::InvalidBool(lexeme).into())
                            );
                        }
                    };
                    self.tokens[index].set_parsed_bool(value);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Shared walk for the numeric passes: visit every number token in the
    /// subtree that does not already hold `target` and cache the decoded
    /// value, reparsing from the raw lexeme on a representation switch.
    fn parse_numbers(
        &mut self,
        token: usize,
        target: ParsedType,
        decode: fn(&str) -> Result<Decoded, ErrorKind>,
    ) -> Result<(), Error> {
        let end = self.subtree_end(token);
        for index in token..end {
            let current = self.tokens[index];
            if current.token_type() != TokenType::Number || current.parsed_type() == target {
                continue;
            }
            let decoded = match decode(self.data_of(index)) {
                Ok(decoded) => decoded,
                Err(kind) => return Err(self.error_at_token(index, kind)),
            };
            let slot = &mut self.tokens[index];
            match decoded {
                Decoded::Double(value) => slot.set_parsed_double(value),
                Decoded::Float(value) => slot.set_parsed_float(value),
                Decoded::UnsignedInt(value) => slot.set_parsed_unsigned_int(value),
                Decoded::Int(value) => slot.set_parsed_int(value),
                Decoded::UnsignedLong(value) => slot.set_parsed_unsigned_long(value),
                #[cfg(target_pointer_width = "64")]
                Decoded::Long(value) => slot.set_parsed_long(value),
            }
        }
        Ok(())
    }

    /// Parses numbers in the subtree rooted at `token` as 64-bit floats,
    /// readable through [`JsonToken::as_double`]. Numbers already parsed as
    /// another representation are reparsed from their raw lexeme.
    pub fn parse_doubles(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::Double, |data| {
            numbers::decode_double(data).map(Decoded::Double)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as 32-bit floats,
    /// readable through [`JsonToken::as_float`]. Excess precision is
    /// truncated; use [`Json::parse_doubles`] to keep all of it.
    pub fn parse_floats(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::Float, |data| {
            numbers::decode_float(data).map(Decoded::Float)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as unsigned 32-bit
    /// integers, readable through [`JsonToken::as_unsigned_int`]. Fails on
    /// fractional parts, exponents, negative values and anything over 32
    /// bits.
    pub fn parse_unsigned_ints(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::UnsignedInt, |data| {
            numbers::decode_unsigned_int(data).map(Decoded::UnsignedInt)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as signed 32-bit
    /// integers, readable through [`JsonToken::as_int`]. Fails on
    /// fractional parts, exponents and anything outside 32 bits.
    pub fn parse_ints(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::Int, |data| {
            numbers::decode_int(data).map(Decoded::Int)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as unsigned 52-bit
    /// integers, the exactly-representable unsigned range of a JSON number,
    /// readable through [`JsonToken::as_unsigned_long`].
    pub fn parse_unsigned_longs(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::UnsignedLong, |data| {
            numbers::decode_unsigned_long(data).map(Decoded::UnsignedLong)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as signed 53-bit
    /// integers, the exactly-representable signed range of a JSON number,
    /// readable through [`JsonToken::as_long`]. Only on hosts with 64-bit
    /// pointers; elsewhere use [`TokenRef::parse_long`], which decodes
    /// without caching.
    #[cfg(target_pointer_width = "64")]
    pub fn parse_longs(&mut self, token: usize) -> Result<(), Error> {
        self.parse_numbers(token, ParsedType::Long, |data| {
            numbers::decode_long(data).map(Decoded::Long)
        })
    }

    /// Parses numbers in the subtree rooted at `token` as size values:
    /// [`Json::parse_unsigned_longs`] on 64-bit hosts,
    /// [`Json::parse_unsigned_ints`] on 32-bit ones. Readable through
    /// [`JsonToken::as_size`].
    pub fn parse_sizes(&mut self, token: usize) -> Result<(), Error> {
        #[cfg(target_pointer_width = "64")]
        {
            self.parse_unsigned_longs(token)
        }
        #[cfg(not(target_pointer_width = "64"))]
        {
            self.parse_unsigned_ints(token)
        }
    }

    /// Parses object keys in the subtree rooted at `token`, processing
    /// escape sequences, so they become readable through
    /// [`TokenRef::as_str`]. String *values* are left untouched, which is
    /// enough for key-based lookups. A subset of [`Json::parse_strings`].
    pub fn parse_string_keys(&mut self, token: usize) -> Result<(), Error> {
        self.parse_string_tokens(token, true)
    }

    /// Parses every string in the subtree rooted at `token`, keys included,
    /// so they become readable through [`TokenRef::as_str`]. A superset of
    /// [`Json::parse_string_keys`]; strings it already handled are skipped.
    pub fn parse_strings(&mut self, token: usize) -> Result<(), Error> {
        self.parse_string_tokens(token, false)
    }

    fn parse_string_tokens(&mut self, token: usize, keys_only: bool) -> Result<(), Error> {
        let end = self.subtree_end(token);
        let Json {
            input,
            tokens,
            strings,
        } = self;
        for index in token..end {
            let current = tokens[index];
            if current.token_type() != TokenType::String
                || current.is_parsed()
                || (keys_only && !current.is_object_key())
            {
                continue;
            }
            if !current.is_string_escaped() {
                // the view between the quotes is already the value
                tokens[index].mark_parsed_other();
                continue;
            }
            let data = &input.as_str()[current.offset()..current.offset() + current.size()];
            match unescape::unescape(&data[1..data.len() - 1]) {
                Ok(decoded) => {
                    let buffer = strings.len();
                    strings.push(decoded);
                    tokens[index].set_parsed_string(buffer);
                }
                Err(escape) => {
                    return Err(Error::at(
                        input.filename(),
                        input.as_str(),
                        current.offset(),
                        escape.into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
