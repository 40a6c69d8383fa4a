/// Parsing passes applied to the root token right after tokenization.
///
/// By default [`Json::from_string`](crate::Json::from_string) and friends
/// only tokenize; every pass can also be run later on any subtree through
/// the matching `parse_*` method. There are no flags for the restricted
/// integer passes, since documents rarely consist of integers alone; call
/// [`Json::parse_unsigned_ints`](crate::Json::parse_unsigned_ints) and
/// friends on the subtrees where the restriction applies.
///
/// # Default
///
/// All passes default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Parse `null`, `true` and `false` literals up front.
    ///
    /// # Default
    ///
    /// `false`
    pub parse_literals: bool,

    /// Parse all numbers as 64-bit floating-point values.
    ///
    /// Takes precedence over [`parse_floats`](Self::parse_floats) when both
    /// are set.
    ///
    /// # Default
    ///
    /// `false`
    pub parse_doubles: bool,

    /// Parse all numbers as 32-bit floating-point values.
    ///
    /// Precision that does not fit a 32-bit float is truncated; use
    /// [`parse_doubles`](Self::parse_doubles) to keep all of it.
    ///
    /// # Default
    ///
    /// `false`
    pub parse_floats: bool,

    /// Unescape object keys up front.
    ///
    /// String *values* stay untouched, which is enough for key-based
    /// lookups over the token tree.
    ///
    /// # Default
    ///
    /// `false`
    pub parse_string_keys: bool,

    /// Unescape every string, keys included.
    ///
    /// Implies [`parse_string_keys`](Self::parse_string_keys).
    ///
    /// # Default
    ///
    /// `false`
    pub parse_strings: bool,
}
