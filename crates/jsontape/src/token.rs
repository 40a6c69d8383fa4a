//! The fixed-size token record and the navigation handle over it.
//!
//! A [`JsonToken`] is three words: the byte offset of its text, one word of
//! bit-packed size/flags/type information, and a payload word shared between
//! the child count (containers) and the decoded value (scalars). A token
//! either has children or carries a value, never both, which is what lets
//! the record stay at 24 bytes on 64-bit hosts.

use core::fmt;
use core::ops::Deref;

use crate::json::Json;
use crate::numbers;
use crate::unescape;

// Layout of `size_flags`, high bits first: 3 bits of token type, 3 bits of
// parsed type, the object-key / global / escaped string flags, and the
// remaining 55 bits for the byte size of the token text.
const TYPE_SHIFT: u32 = 61;
const TYPE_MASK: u64 = 0x7 << TYPE_SHIFT;
const PARSED_TYPE_SHIFT: u32 = 58;
const PARSED_TYPE_MASK: u64 = 0x7 << PARSED_TYPE_SHIFT;
const FLAG_STRING_KEY: u64 = 1 << 57;
const FLAG_STRING_GLOBAL: u64 = 1 << 56;
const FLAG_STRING_ESCAPED: u64 = 1 << 55;
pub(crate) const SIZE_MASK: u64 = (1 << 55) - 1;

/// Token type, implied by the first byte of the token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// `{}`. Immediate children are [`TokenType::String`] keys; values are
    /// children of the keys. Always parsed.
    Object = 1,
    /// `[]`. Immediate children are values. Always parsed.
    Array = 2,
    /// `null`. Not guaranteed valid until parsed.
    Null = 3,
    /// `true` or `false`. Not guaranteed valid until parsed.
    Bool = 4,
    /// A number. Not guaranteed valid until parsed as one of the numeric
    /// [`ParsedType`]s.
    Number = 5,
    /// A string. Not guaranteed valid (and possibly escape-ridden) until
    /// parsed.
    String = 6,
}

impl TokenType {
    #[inline]
    fn bits(self) -> u64 {
        (self as u64) << TYPE_SHIFT
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenType::Object => "Object",
            TokenType::Array => "Array",
            TokenType::Null => "Null",
            TokenType::Bool => "Bool",
            TokenType::Number => "Number",
            TokenType::String => "String",
        })
    }
}

/// The concrete representation a token currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedType {
    /// Not parsed yet.
    None = 0,
    /// 64-bit floating-point value.
    Double = 1,
    /// 32-bit floating-point value.
    Float = 2,
    /// 32-bit unsigned integer value.
    UnsignedInt = 3,
    /// 32-bit signed integer value.
    Int = 4,
    /// 52-bit unsigned integer value, the exactly-representable unsigned
    /// range of a JSON number.
    UnsignedLong = 5,
    /// 53-bit signed integer value, the exactly-representable signed range
    /// of a JSON number. Only on hosts with 64-bit pointers; the record has
    /// no room to cache it elsewhere.
    #[cfg(target_pointer_width = "64")]
    Long = 6,
    /// An object, array, null, bool or string value.
    Other = 7,
}

impl ParsedType {
    /// What [`Json::parse_sizes`] parses as: [`ParsedType::UnsignedLong`] on
    /// 64-bit hosts, [`ParsedType::UnsignedInt`] on 32-bit ones.
    #[cfg(target_pointer_width = "64")]
    pub const SIZE: ParsedType = ParsedType::UnsignedLong;
    #[cfg(not(target_pointer_width = "64"))]
    pub const SIZE: ParsedType = ParsedType::UnsignedInt;

    #[inline]
    fn bits(self) -> u64 {
        (self as u64) << PARSED_TYPE_SHIFT
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParsedType::None => "None",
            ParsedType::Double => "Double",
            ParsedType::Float => "Float",
            ParsedType::UnsignedInt => "UnsignedInt",
            ParsedType::Int => "Int",
            ParsedType::UnsignedLong => "UnsignedLong",
            #[cfg(target_pointer_width = "64")]
            ParsedType::Long => "Long",
            ParsedType::Other => "Other",
        })
    }
}

/// Payload word. Containers keep their child count here for their whole
/// life; scalars start with it zeroed and overwrite it with the decoded
/// value when a parse pass reaches them. Escaped strings store the index of
/// their unescape buffer instead of the text itself.
#[derive(Clone, Copy)]
union Payload {
    child_count: u64,
    boolean: bool,
    double: f64,
    float: f32,
    unsigned_int: u32,
    int: i32,
    unsigned_long: u64,
    long: i64,
    string: usize,
}

/// A single token of the flat depth-first array.
///
/// The record is self-contained for everything except tree navigation and
/// string views: a copy taken out of its [`Json`] keeps a meaningful type,
/// parsed type, flags and cached value, but `child_count` and the
/// navigation methods only make sense through a [`TokenRef`].
#[derive(Clone, Copy)]
pub struct JsonToken {
    offset: usize,
    size_flags: u64,
    payload: Payload,
}

impl JsonToken {
    pub(crate) fn container(kind: TokenType, offset: usize) -> Self {
        // containers are parsed by construction; size is wired on close
        Self {
            offset,
            size_flags: kind.bits() | ParsedType::Other.bits(),
            payload: Payload { child_count: 0 },
        }
    }

    pub(crate) fn scalar(kind: TokenType, offset: usize, size: usize) -> Self {
        Self {
            offset,
            size_flags: kind.bits() | size as u64,
            payload: Payload { child_count: 0 },
        }
    }

    pub(crate) fn string(offset: usize, size: usize, key: bool, escaped: bool, global: bool) -> Self {
        let mut size_flags = TokenType::String.bits() | size as u64;
        if key {
            size_flags |= FLAG_STRING_KEY;
        }
        if escaped {
            size_flags |= FLAG_STRING_ESCAPED;
        }
        if global {
            size_flags |= FLAG_STRING_GLOBAL;
        }
        Self {
            offset,
            size_flags,
            payload: Payload { child_count: 0 },
        }
    }

    /// Token type, decoded from the packed word.
    #[inline]
    pub fn token_type(&self) -> TokenType {
        match (self.size_flags & TYPE_MASK) >> TYPE_SHIFT {
            1 => TokenType::Object,
            2 => TokenType::Array,
            3 => TokenType::Null,
            4 => TokenType::Bool,
            5 => TokenType::Number,
            6 => TokenType::String,
            _ => unreachable!("tokens are only constructed with valid type bits"),
        }
    }

    /// The representation the token currently holds; [`ParsedType::None`]
    /// until some parse pass reaches it.
    #[inline]
    pub fn parsed_type(&self) -> ParsedType {
        match (self.size_flags & PARSED_TYPE_MASK) >> PARSED_TYPE_SHIFT {
            0 => ParsedType::None,
            1 => ParsedType::Double,
            2 => ParsedType::Float,
            3 => ParsedType::UnsignedInt,
            4 => ParsedType::Int,
            5 => ParsedType::UnsignedLong,
            #[cfg(target_pointer_width = "64")]
            6 => ParsedType::Long,
            7 => ParsedType::Other,
            _ => unreachable!("parsed-type bits never hold a representation this host cannot cache"),
        }
    }

    /// Whether the cached value can be read through the `as_*` getters.
    /// Always set for objects and arrays.
    #[inline]
    pub fn is_parsed(&self) -> bool {
        self.size_flags & PARSED_TYPE_MASK != 0
    }

    /// Whether this string is the key of an object entry.
    #[inline]
    pub fn is_object_key(&self) -> bool {
        self.size_flags & FLAG_STRING_KEY != 0
    }

    /// Whether this string is a view into a `'static` input and free of
    /// escape sequences, i.e. whether [`TokenRef::as_global_str`] applies.
    #[inline]
    pub fn is_string_global(&self) -> bool {
        self.size_flags & FLAG_STRING_GLOBAL != 0
    }

    /// Whether this string contains a backslash and needs an unescape
    /// buffer when parsed.
    #[inline]
    pub fn is_string_escaped(&self) -> bool {
        self.size_flags & FLAG_STRING_ESCAPED != 0
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        (self.size_flags & SIZE_MASK) as usize
    }

    pub(crate) fn set_end(&mut self, end: usize) {
        self.size_flags = (self.size_flags & !SIZE_MASK) | (end - self.offset) as u64;
    }

    pub(crate) fn set_child_count(&mut self, count: u64) {
        self.payload.child_count = count;
    }

    pub(crate) fn stored_child_count(&self) -> u64 {
        debug_assert!(matches!(
            self.token_type(),
            TokenType::Object | TokenType::Array
        ));
        // SAFETY: containers keep `child_count` as the active union field
        // for their whole life; nothing ever parses into them.
        unsafe { self.payload.child_count }
    }

    pub(crate) fn string_buffer_index(&self) -> usize {
        debug_assert!(self.is_parsed() && self.is_string_escaped());
        // SAFETY: parsing an escaped string stores the unescape-buffer
        // index as the active union field.
        unsafe { self.payload.string }
    }

    #[inline]
    fn set_parsed(&mut self, parsed: ParsedType) {
        self.size_flags = (self.size_flags & !PARSED_TYPE_MASK) | parsed.bits();
    }

    pub(crate) fn mark_parsed_other(&mut self) {
        self.set_parsed(ParsedType::Other);
    }

    pub(crate) fn set_parsed_bool(&mut self, value: bool) {
        self.payload = Payload { boolean: value };
        self.set_parsed(ParsedType::Other);
    }

    pub(crate) fn set_parsed_double(&mut self, value: f64) {
        self.payload = Payload { double: value };
        self.set_parsed(ParsedType::Double);
    }

    pub(crate) fn set_parsed_float(&mut self, value: f32) {
        self.payload = Payload { float: value };
        self.set_parsed(ParsedType::Float);
    }

    pub(crate) fn set_parsed_unsigned_int(&mut self, value: u32) {
        self.payload = Payload { unsigned_int: value };
        self.set_parsed(ParsedType::UnsignedInt);
    }

    pub(crate) fn set_parsed_int(&mut self, value: i32) {
        self.payload = Payload { int: value };
        self.set_parsed(ParsedType::Int);
    }

    pub(crate) fn set_parsed_unsigned_long(&mut self, value: u64) {
        self.payload = Payload {
            unsigned_long: value,
        };
        self.set_parsed(ParsedType::UnsignedLong);
    }

    #[cfg(target_pointer_width = "64")]
    pub(crate) fn set_parsed_long(&mut self, value: i64) {
        self.payload = Payload { long: value };
        self.set_parsed(ParsedType::Long);
    }

    pub(crate) fn set_parsed_string(&mut self, index: usize) {
        self.payload = Payload { string: index };
        self.set_parsed(ParsedType::Other);
    }

    /// The cached null value.
    ///
    /// # Panics
    ///
    /// If the token is not a parsed [`TokenType::Null`]; use
    /// [`TokenRef::parse_null`] for tokens that may not be parsed yet.
    pub fn as_null(&self) {
        assert!(
            self.token_type() == TokenType::Null && self.is_parsed(),
            "as_null(): token is {} {}",
            if self.is_parsed() { "a parsed" } else { "an unparsed" },
            self.token_type(),
        );
    }

    /// The cached boolean value.
    ///
    /// # Panics
    ///
    /// If the token is not a parsed [`TokenType::Bool`]; use
    /// [`TokenRef::parse_bool`] for tokens that may not be parsed yet.
    pub fn as_bool(&self) -> bool {
        assert!(
            self.token_type() == TokenType::Bool && self.is_parsed(),
            "as_bool(): token is {} {}",
            if self.is_parsed() { "a parsed" } else { "an unparsed" },
            self.token_type(),
        );
        // SAFETY: parsing a Bool stored the value as the active union field
        unsafe { self.payload.boolean }
    }

    /// The cached 64-bit floating-point value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::Double`]; use
    /// [`TokenRef::parse_double`] for tokens that may not be parsed yet.
    pub fn as_double(&self) -> f64 {
        assert!(
            self.parsed_type() == ParsedType::Double,
            "as_double(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.double }
    }

    /// The cached 32-bit floating-point value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::Float`].
    pub fn as_float(&self) -> f32 {
        assert!(
            self.parsed_type() == ParsedType::Float,
            "as_float(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.float }
    }

    /// The cached unsigned 32-bit integer value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::UnsignedInt`].
    pub fn as_unsigned_int(&self) -> u32 {
        assert!(
            self.parsed_type() == ParsedType::UnsignedInt,
            "as_unsigned_int(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.unsigned_int }
    }

    /// The cached signed 32-bit integer value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::Int`].
    pub fn as_int(&self) -> i32 {
        assert!(
            self.parsed_type() == ParsedType::Int,
            "as_int(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.int }
    }

    /// The cached unsigned 52-bit integer value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::UnsignedLong`].
    pub fn as_unsigned_long(&self) -> u64 {
        assert!(
            self.parsed_type() == ParsedType::UnsignedLong,
            "as_unsigned_long(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.unsigned_long }
    }

    /// The cached signed 53-bit integer value.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::Long`].
    #[cfg(target_pointer_width = "64")]
    pub fn as_long(&self) -> i64 {
        assert!(
            self.parsed_type() == ParsedType::Long,
            "as_long(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        // SAFETY: checked parsed type implies the matching union field
        unsafe { self.payload.long }
    }

    /// The cached size value, an alias for [`JsonToken::as_unsigned_long`]
    /// on 64-bit hosts and [`JsonToken::as_unsigned_int`] on 32-bit ones.
    ///
    /// # Panics
    ///
    /// If the token is not parsed as [`ParsedType::SIZE`].
    pub fn as_size(&self) -> usize {
        assert!(
            self.parsed_type() == ParsedType::SIZE,
            "as_size(): token is a {} parsed as {}",
            self.token_type(),
            self.parsed_type(),
        );
        #[cfg(target_pointer_width = "64")]
        // SAFETY: checked parsed type implies the matching union field
        unsafe {
            self.payload.unsigned_long as usize
        }
        #[cfg(not(target_pointer_width = "64"))]
        // SAFETY: checked parsed type implies the matching union field
        unsafe {
            self.payload.unsigned_int as usize
        }
    }

    /// Compares the logically active payload field; unparsed scalars carry
    /// no payload and compare equal on type and flags alone.
    fn payload_eq(&self, other: &Self) -> bool {
        match self.token_type() {
            TokenType::Object | TokenType::Array => {
                self.stored_child_count() == other.stored_child_count()
            }
            TokenType::Null => true,
            TokenType::Bool => !self.is_parsed() || self.as_bool() == other.as_bool(),
            TokenType::Number => match self.parsed_type() {
                ParsedType::None => true,
                ParsedType::Double => self.as_double().to_bits() == other.as_double().to_bits(),
                ParsedType::Float => self.as_float().to_bits() == other.as_float().to_bits(),
                ParsedType::UnsignedInt => self.as_unsigned_int() == other.as_unsigned_int(),
                ParsedType::Int => self.as_int() == other.as_int(),
                ParsedType::UnsignedLong => self.as_unsigned_long() == other.as_unsigned_long(),
                #[cfg(target_pointer_width = "64")]
                ParsedType::Long => self.as_long() == other.as_long(),
                ParsedType::Other => true,
            },
            TokenType::String => {
                !(self.is_parsed() && self.is_string_escaped())
                    || self.string_buffer_index() == other.string_buffer_index()
            }
        }
    }
}

impl PartialEq for JsonToken {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.size_flags == other.size_flags
            && self.payload_eq(other)
    }
}

impl fmt::Debug for JsonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("JsonToken");
        s.field("type", &self.token_type())
            .field("offset", &self.offset)
            .field("size", &self.size());
        match self.token_type() {
            TokenType::Object | TokenType::Array => {
                s.field("child_count", &self.stored_child_count());
            }
            TokenType::Bool if self.is_parsed() => {
                s.field("value", &self.as_bool());
            }
            TokenType::Number if self.parsed_type() != ParsedType::None => {
                s.field("parsed_type", &self.parsed_type());
            }
            TokenType::String => {
                s.field("key", &self.is_object_key())
                    .field("escaped", &self.is_string_escaped());
            }
            _ => {}
        }
        s.field("parsed", &self.is_parsed()).finish()
    }
}

/// A token bound to its reader: everything a bare [`JsonToken`] cannot do
/// on its own (navigation, raw data views, on-demand parsing and string
/// access). Derefs to the record for the type, flag and cached-value
/// queries.
#[derive(Clone, Copy)]
pub struct TokenRef<'a> {
    json: &'a Json,
    index: usize,
}

impl<'a> TokenRef<'a> {
    pub(crate) fn new(json: &'a Json, index: usize) -> Self {
        Self { json, index }
    }

    /// Position of this token in [`Json::tokens`].
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn token(&self) -> &'a JsonToken {
        &self.json.tokens()[self.index]
    }

    /// The raw token text, child tokens included for objects and arrays and
    /// both surrounding quotes included for strings. For an object key the
    /// text still ends at the closing quote; the value subtree lies after
    /// it, not inside.
    pub fn data(&self) -> &'a str {
        let token = self.token();
        &self.json.source_str()[token.offset()..token.offset() + token.size()]
    }

    /// Number of all nested tokens, not just immediate children. Zero for
    /// null, bool, number and non-key string tokens; at least one for an
    /// object key, whose single child is its value.
    pub fn child_count(&self) -> usize {
        let token = self.token();
        match token.token_type() {
            TokenType::Object | TokenType::Array => token.stored_child_count() as usize,
            // a key's subtree is its value; derived so the payload word
            // stays free for the unescape-buffer index
            TokenType::String if token.is_object_key() => {
                1 + TokenRef::new(self.json, self.index + 1).child_count()
            }
            _ => 0,
        }
    }

    /// All nested tokens in depth-first order.
    pub fn children(&self) -> &'a [JsonToken] {
        &self.json.tokens()[self.index + 1..self.index + 1 + self.child_count()]
    }

    /// The first child token, in O(1). For a non-empty object that is the
    /// first key; for a key it is the value.
    pub fn first_child(&self) -> Option<TokenRef<'a>> {
        let token = self.token();
        let has_child = match token.token_type() {
            TokenType::Object | TokenType::Array => token.stored_child_count() != 0,
            TokenType::String => token.is_object_key(),
            _ => false,
        };
        has_child.then(|| TokenRef::new(self.json, self.index + 1))
    }

    /// The next token at the same or a higher level, in O(1); `None` past
    /// the end of the token array.
    pub fn next(&self) -> Option<TokenRef<'a>> {
        let next = self.index + self.child_count() + 1;
        (next < self.json.tokens().len()).then(|| TokenRef::new(self.json, next))
    }

    /// The parent token, `None` for the root. Found by scanning the array
    /// backwards, so this is O(n); prefer remembering the parent while
    /// descending.
    pub fn parent(&self) -> Option<TokenRef<'a>> {
        (0..self.index)
            .rev()
            .map(|at| TokenRef::new(self.json, at))
            .find(|candidate| candidate.index + candidate.child_count() + 1 > self.index)
    }

    /// Decodes a [`TokenType::Null`] token; `None` for other token types or
    /// an invalid literal. Does not cache.
    pub fn parse_null(&self) -> Option<()> {
        let token = self.token();
        if token.token_type() != TokenType::Null {
            return None;
        }
        if token.is_parsed() {
            return Some(());
        }
        (self.data() == "null").then_some(())
    }

    /// Decodes a [`TokenType::Bool`] token; `None` for other token types or
    /// an invalid literal. Does not cache.
    pub fn parse_bool(&self) -> Option<bool> {
        let token = self.token();
        if token.token_type() != TokenType::Bool {
            return None;
        }
        if token.is_parsed() {
            return Some(token.as_bool());
        }
        match self.data() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Decodes a [`TokenType::Number`] token as a 64-bit float; `None` for
    /// other token types or an invalid number. Does not cache.
    pub fn parse_double(&self) -> Option<f64> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        if token.parsed_type() == ParsedType::Double {
            return Some(token.as_double());
        }
        numbers::decode_double(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as a 32-bit float; `None` for
    /// other token types or an invalid number. Does not cache.
    pub fn parse_float(&self) -> Option<f32> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        if token.parsed_type() == ParsedType::Float {
            return Some(token.as_float());
        }
        numbers::decode_float(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as an unsigned 32-bit integer;
    /// `None` for other token types, fractional/exponent/negative numbers
    /// or values over 32 bits. Does not cache.
    pub fn parse_unsigned_int(&self) -> Option<u32> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        if token.parsed_type() == ParsedType::UnsignedInt {
            return Some(token.as_unsigned_int());
        }
        numbers::decode_unsigned_int(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as a signed 32-bit integer;
    /// `None` for other token types, fractional/exponent numbers or values
    /// outside 32 bits. Does not cache.
    pub fn parse_int(&self) -> Option<i32> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        if token.parsed_type() == ParsedType::Int {
            return Some(token.as_int());
        }
        numbers::decode_int(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as an unsigned 52-bit integer;
    /// `None` for other token types, fractional/exponent/negative numbers
    /// or values over 52 bits. Does not cache.
    pub fn parse_unsigned_long(&self) -> Option<u64> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        if token.parsed_type() == ParsedType::UnsignedLong {
            return Some(token.as_unsigned_long());
        }
        numbers::decode_unsigned_long(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as a signed 53-bit integer;
    /// `None` for other token types, fractional/exponent numbers or values
    /// outside 53 bits. Does not cache. Unlike [`Json::parse_longs`] this
    /// works on 32-bit hosts too, since nothing is stored.
    pub fn parse_long(&self) -> Option<i64> {
        let token = self.token();
        if token.token_type() != TokenType::Number {
            return None;
        }
        #[cfg(target_pointer_width = "64")]
        if token.parsed_type() == ParsedType::Long {
            return Some(token.as_long());
        }
        numbers::decode_long(self.data()).ok()
    }

    /// Decodes a [`TokenType::Number`] token as a size value, via
    /// [`TokenRef::parse_unsigned_long`] on 64-bit hosts and
    /// [`TokenRef::parse_unsigned_int`] on 32-bit ones.
    pub fn parse_size(&self) -> Option<usize> {
        #[cfg(target_pointer_width = "64")]
        {
            self.parse_unsigned_long().map(|value| value as usize)
        }
        #[cfg(not(target_pointer_width = "64"))]
        {
            self.parse_unsigned_int().map(|value| value as usize)
        }
    }

    /// Decodes a [`TokenType::String`] token into a fresh owned string;
    /// `None` for other token types or invalid escapes. Does not cache;
    /// prefer [`TokenRef::as_str`] on parsed tokens.
    pub fn parse_string(&self) -> Option<alloc::string::String> {
        use alloc::borrow::ToOwned;

        let token = self.token();
        if token.token_type() != TokenType::String {
            return None;
        }
        if token.is_parsed() {
            return Some(self.as_str().to_owned());
        }
        let data = self.data();
        let raw = &data[1..data.len() - 1];
        if token.is_string_escaped() {
            unescape::unescape(raw).ok()
        } else {
            Some(raw.to_owned())
        }
    }

    /// The parsed string value: a view between the quotes for strings
    /// without escapes, a view into the reader-owned unescape buffer
    /// otherwise.
    ///
    /// # Panics
    ///
    /// If the token is not a parsed [`TokenType::String`]; use
    /// [`TokenRef::parse_string`] for tokens that may not be parsed yet.
    pub fn as_str(&self) -> &'a str {
        let token = self.token();
        assert!(
            token.token_type() == TokenType::String && token.is_parsed(),
            "as_str(): token is {} {}",
            if token.is_parsed() { "a parsed" } else { "an unparsed" },
            token.token_type(),
        );
        if token.is_string_escaped() {
            self.json.unescape_buffer(token.string_buffer_index())
        } else {
            let data = self.data();
            &data[1..data.len() - 1]
        }
    }

    /// The parsed string value with the input's `'static` lifetime; `None`
    /// unless the reader borrows its input ([`Json::from_static`]), the
    /// string is escape-free and it has been parsed.
    pub fn as_global_str(&self) -> Option<&'static str> {
        let token = self.token();
        if !token.is_string_global() || !token.is_parsed() {
            return None;
        }
        let source = self.json.global_source()?;
        Some(&source[token.offset() + 1..token.offset() + token.size() - 1])
    }
}

impl Deref for TokenRef<'_> {
    type Target = JsonToken;

    fn deref(&self) -> &JsonToken {
        self.token()
    }
}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRef")
            .field("index", &self.index)
            .field("token", self.token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn record_is_three_words() {
        assert_eq!(core::mem::size_of::<JsonToken>(), 24);
    }

    #[test]
    fn packed_fields_roundtrip() {
        let mut token = JsonToken::string(7, 11, true, true, false);
        assert_eq!(token.token_type(), TokenType::String);
        assert_eq!(token.parsed_type(), ParsedType::None);
        assert!(token.is_object_key());
        assert!(token.is_string_escaped());
        assert!(!token.is_string_global());
        assert_eq!((token.offset(), token.size()), (7, 11));

        token.set_parsed_string(3);
        assert!(token.is_parsed());
        assert_eq!(token.parsed_type(), ParsedType::Other);
        assert_eq!(token.string_buffer_index(), 3);
        // flags and extent survive the payload write
        assert!(token.is_object_key());
        assert_eq!((token.offset(), token.size()), (7, 11));
    }

    #[test]
    fn parsed_numbers_replace_each_other() {
        let mut token = JsonToken::scalar(TokenType::Number, 0, 2);
        token.set_parsed_double(42.0);
        assert_eq!(token.as_double(), 42.0);
        token.set_parsed_unsigned_int(42);
        assert_eq!(token.parsed_type(), ParsedType::UnsignedInt);
        assert_eq!(token.as_unsigned_int(), 42);
    }

    #[test]
    #[should_panic(expected = "as_bool()")]
    fn unparsed_cached_read_panics() {
        JsonToken::scalar(TokenType::Bool, 0, 4).as_bool();
    }

    #[test]
    #[should_panic(expected = "as_double()")]
    fn mismatched_cached_read_panics() {
        let mut token = JsonToken::scalar(TokenType::Number, 0, 2);
        token.set_parsed_unsigned_int(17);
        token.as_double();
    }
}
