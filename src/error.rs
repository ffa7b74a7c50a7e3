use std::io;

use failure::Fail;

use crate::parse;


/// Everything that can go wrong while reading or querying a PLY file.
///
/// Use [`Error::kind`] if you only care about the category of the error.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    /// A header line is malformed, misplaced, duplicated or missing.
    #[fail(display = "invalid PLY header (line {}): {}", line, msg)]
    Format {
        msg: String,
        line: usize,
    },

    /// The header names a body encoding or a property type we don't know.
    #[fail(display = "unsupported PLY encoding or type (line {}): {}", line, msg)]
    UnsupportedEncoding {
        msg: String,
        line: usize,
    },

    /// The body could not be decoded (truncated file, invalid number, ...).
    #[fail(display = "failed to parse PLY body: {}", _0)]
    Parse(parse::Error),

    #[fail(display = "no element '{}' in PLY file", element)]
    UnknownElement {
        element: String,
    },

    #[fail(display = "element '{}' has no property '{}'", element, property)]
    UnknownProperty {
        element: String,
        property: String,
    },

    /// A scalar accessor was used for a list property or vice versa.
    #[fail(
        display = "property '{}' of element '{}' is not a {} property",
        property, element, expected
    )]
    TypeMismatch {
        element: String,
        property: String,
        expected: PropertyKind,
    },
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    UnsupportedEncoding,
    Parse,
    Lookup,
    TypeMismatch,
}

/// Whether a property holds one value per element or a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar,
    List,
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PropertyKind::Scalar => "scalar".fmt(f),
            PropertyKind::List => "list".fmt(f),
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Format { .. } => ErrorKind::Format,
            Error::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            Error::Parse(_) => ErrorKind::Parse,
            Error::UnknownElement { .. } | Error::UnknownProperty { .. } => ErrorKind::Lookup,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    pub(crate) fn format(line: usize, msg: impl Into<String>) -> Self {
        Error::Format { msg: msg.into(), line }
    }
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}

impl From<parse::Error> for Error {
    fn from(src: parse::Error) -> Self {
        match src {
            parse::Error::Io(e) => Error::Io(e),
            other => Error::Parse(other),
        }
    }
}
