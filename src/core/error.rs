use std::fmt;

/// Coarse classification of what went wrong. Only `InputMissing` and
/// `QueryParse` are recovered locally; everything else aborts the
/// current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    NotFound,
    InvalidArgument,
    Internal,
    /// A source file could not be opened during build. Recovered: the
    /// caller logs a warning and continues with the remaining files.
    InputMissing,
    /// A block file could not be opened for writing during SPIMI.
    Spill,
    /// A read/write failure during the k-way merge.
    MergeIo,
    /// A postings line failed to parse.
    Codec,
    /// The Boolean query expression is malformed.
    QueryParse,
    /// The descriptor file is missing or malformed at load time.
    Descriptor,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }

    /// Attach file + byte offset context to a `Codec` error.
    pub fn codec_at(context: impl Into<String>, file: &std::path::Path, offset: u64) -> Self {
        Error {
            kind: ErrorKind::Codec,
            context: format!("{} (file={}, offset={})", context.into(), file.display(), offset),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Descriptor,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
