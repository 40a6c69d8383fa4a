//! Filesystem entry point, the one `std`-only corner of the crate.

use alloc::string::ToString;

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::input::Input;
use crate::json::Json;
use crate::options::Options;

impl Json {
    /// Reads `path` into an owned buffer, tokenizes it and applies the
    /// passes selected in `options` to the root. The path becomes the
    /// filename in diagnostics. Fails with [`ErrorKind::Io`] when the file
    /// cannot be read or is not valid UTF-8.
    ///
    /// [`ErrorKind::Io`]: crate::ErrorKind::Io
    pub fn from_file<P: AsRef<Path>>(path: P, options: Options) -> Result<Json, Error> {
        let path = path.as_ref();
        let filename = path.display().to_string();
        let source = fs::read_to_string(path)
            .map_err(|error| Error::io(filename.clone(), error.to_string()))?;
        Self::tokenize(Input::owned(source, Some(filename)), options)
    }
}
