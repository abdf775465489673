//! Source streams and the token reader (`spec.md` §4.A).

mod context;
mod reader;

pub use context::SourceContext;
pub use reader::TokenReader;

use std::fmt::Display;
use std::sync::Arc;
use std::{error::Error, fs, io, path::Path};

/// The two trailing NUL bytes every in-memory buffer must carry so the
/// scanner can always peek two bytes ahead without a bounds check.
const TRAILER: [u8; 2] = [0, 0];

#[derive(Debug)]
pub enum SourceLoadError {
    Io(io::Error),
}

impl Display for SourceLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLoadError::Io(err) => write!(f, "unable to read source: {err}"),
        }
    }
}

impl Error for SourceLoadError {}

impl From<io::Error> for SourceLoadError {
    fn from(value: io::Error) -> Self {
        SourceLoadError::Io(value)
    }
}

/// Owns a byte stream and its logical path.
///
/// There are two input modes, matching `spec.md` §4.A: *file* (read
/// eagerly into memory here, since this crate's pipeline is single-pass
/// and synchronous — `spec.md` §5 never requires streaming re-reads) and
/// *buffer* (provided directly, e.g. by the harness or an in-memory
/// caller). Both end up as a NUL-terminated `Vec<u8>` so `TokenReader`
/// has one representation to scan.
#[derive(Debug, Clone)]
pub struct Source {
    path: Arc<str>,
    bytes: Vec<u8>,
}

impl Source {
    /// Loads a source from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceLoadError> {
        let path_ref = path.as_ref();
        let mut bytes = fs::read(path_ref)?;
        bytes.extend_from_slice(&TRAILER);
        Ok(Self {
            path: Arc::from(path_ref.to_string_lossy().as_ref()),
            bytes,
        })
    }

    /// Builds a source from an in-memory buffer, appending the two
    /// trailing NULs the scanner requires.
    pub fn from_buffer(path: impl Into<Arc<str>>, text: impl AsRef<[u8]>) -> Self {
        let mut bytes = text.as_ref().to_vec();
        bytes.extend_from_slice(&TRAILER);
        Self {
            path: path.into(),
            bytes,
        }
    }

    pub fn path(&self) -> &Arc<str> {
        &self.path
    }

    /// The source text, including the two trailing NULs.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The source text without the trailing NULs, as a lossily-decoded
    /// `&str` (used for excerpt rendering, which works line-by-line on
    /// the assumption that lines are displayable text).
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        let end = self.bytes.len().saturating_sub(TRAILER.len());
        String::from_utf8_lossy(&self.bytes[..end])
    }

    pub fn reader(&self) -> TokenReader<'_> {
        TokenReader::new(self.path.clone(), &self.bytes)
    }
}
