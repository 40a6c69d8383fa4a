//! Flat depth-first JSON tokenizer with deferred, selective value parsing.
//!
//! A document is scanned once into a flat array of fixed-size [`JsonToken`]
//! records ordered depth-first: a container appears immediately before its
//! contents, and every token knows the total number of tokens nested inside
//! it. That is enough to skip over a whole subtree in O(1)
//! ([`TokenRef::next`]), dive into it in O(1) ([`TokenRef::first_child`]) and
//! keep the entire tree in a single contiguous allocation.
//!
//! The scanner validates *structure* only. Numbers, string escapes and the
//! `null`/`true`/`false` literals are left untouched until a caller asks for
//! them, either for a whole subtree ([`Json::parse_doubles`] and friends) or
//! for a single token ([`TokenRef::parse_double`] and friends). Decoded
//! values are cached inside the token record, so a document containing a
//! large array of numbers costs nothing for the parts the caller skips.
//!
//! ```
//! use jsontape::{Json, Options};
//!
//! let mut json = Json::from_string(r#"{"points":[1,2,3]}"#, Options::default()).unwrap();
//! json.parse_string_keys(0).unwrap();
//!
//! let points = json.root().first_child().unwrap();
//! assert_eq!(points.as_str(), "points");
//!
//! let array = points.first_child().unwrap().index();
//! json.parse_unsigned_ints(array).unwrap();
//! assert_eq!(json.token(array).first_child().unwrap().as_unsigned_int(), 1);
//! ```
//!
//! Strings without escape sequences are returned as views into the input; if
//! the input itself has `'static` lifetime (see [`Json::from_static`]), the
//! view can outlive the reader through [`TokenRef::as_global_str`].

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod input;
mod json;
mod numbers;
mod options;
mod token;
mod tokenizer;
mod unescape;

#[cfg(feature = "std")]
mod file;

pub use error::{Error, ErrorKind, EscapeError, ParseError, RangeError, TokenizerError};
pub use json::Json;
pub use options::Options;
pub use token::{JsonToken, ParsedType, TokenRef, TokenType};

#[cfg(test)]
mod tests;
