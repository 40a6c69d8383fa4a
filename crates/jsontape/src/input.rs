use alloc::borrow::Cow;
use alloc::string::String;

/// Holds the document text and the filename used by diagnostics.
///
/// A `Borrowed` source is a caller-supplied string with `'static` lifetime;
/// tokens reference it directly and unescaped string views keep that
/// lifetime. Everything else (plain string input, file contents) is copied
/// into an `Owned` buffer that lives as long as the reader.
#[derive(Debug)]
pub(crate) struct Input {
    source: Cow<'static, str>,
    filename: Option<String>,
}

impl Input {
    pub(crate) fn owned(source: String, filename: Option<String>) -> Self {
        Self {
            source: Cow::Owned(source),
            filename,
        }
    }

    pub(crate) fn global(source: &'static str) -> Self {
        Self {
            source: Cow::Borrowed(source),
            filename: None,
        }
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.source
    }

    /// The source text when it has `'static` lifetime.
    pub(crate) fn global_str(&self) -> Option<&'static str> {
        match self.source {
            Cow::Borrowed(source) => Some(source),
            Cow::Owned(_) => None,
        }
    }

    pub(crate) fn is_global(&self) -> bool {
        matches!(self.source, Cow::Borrowed(_))
    }

    pub(crate) fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}
