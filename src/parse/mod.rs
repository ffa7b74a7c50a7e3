//! Low level parsing building blocks shared by the header parser and the
//! body reader.
//!
//! Parsers work on an [`Input`], which is a window of look-ahead bytes into
//! the underlying stream. The only implementation is [`buf::Buffer`].

use std::{
    fmt,
    io,
};

use failure::Fail;


pub(crate) mod buf;

#[cfg(test)]
mod tests;


pub(crate) trait Input {
    /// Makes sure at least `num_bytes` bytes are available in `raw_buf`.
    /// Returns `Error::UnexpectedEof` if the stream ends before that.
    fn prepare(&mut self, num_bytes: usize) -> Result<(), Error>;

    /// Like `prepare`, but hitting the end of the stream is not an error. Use
    /// `raw_buf().len()` to find out how many bytes are actually available.
    fn saturating_prepare(&mut self, num_bytes: usize) -> Result<(), Error>;

    fn consume(&mut self, num_bytes: usize);
    fn is_eof(&mut self) -> Result<bool, Error>;

    /// The number of bytes consumed since the start of the stream.
    fn offset(&self) -> usize;

    /// All currently available look-ahead bytes.
    fn raw_buf(&self) -> &[u8];


    fn spanned_data(&self, num_bytes: usize) -> SpannedData<'_> {
        SpannedData {
            data: &self.raw_buf()[..num_bytes],
            span: Span::new(self.offset(), self.offset() + num_bytes),
        }
    }

    fn skip_until(&mut self, stopper: impl Stopper) -> Result<(), Error> {
        loop {
            // `is_eof` refills the buffer if it's empty, so indexing is fine
            // afterwards.
            if self.is_eof()? {
                break;
            }

            if stopper.should_stop(self.raw_buf()[0]) {
                break;
            }

            self.consume(1);
        }

        Ok(())
    }

    fn with_bytes<F, O>(&mut self, num_bytes: usize, func: F) -> Result<O, Error>
    where
        F: FnOnce(SpannedData<'_>) -> Result<O, Error>,
    {
        self.prepare(num_bytes)?;
        let out = func(self.spanned_data(num_bytes))?;
        self.consume(num_bytes);

        Ok(out)
    }

    /// Passes all bytes up to (excluding) the first byte matching `stopper` to
    /// `func` and consumes them. The end of the stream also stops, so the
    /// data passed to `func` might be empty.
    fn take_until<F, O>(
        &mut self,
        stopper: impl Stopper,
        func: F,
    ) -> Result<O, Error>
    where
        F: FnOnce(SpannedData<'_>) -> Result<O, Error>
    {
        let mut pos = 0;
        loop {
            if self.raw_buf().len() <= pos {
                self.saturating_prepare(pos + 1)?;
                if self.raw_buf().len() <= pos {
                    break;
                }
            }

            if stopper.should_stop(self.raw_buf()[pos]) {
                break;
            }

            pos += 1;
        }

        let out = func(self.spanned_data(pos))?;
        self.consume(pos);

        Ok(out)
    }

    fn is_next(&mut self, expected: &[u8]) -> Result<bool, Error> {
        self.saturating_prepare(expected.len())?;
        Ok(self.raw_buf().starts_with(expected))
    }
}

#[derive(Debug)]
pub(crate) struct SpannedData<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) span: Span,
}

impl<'a> SpannedData<'a> {
    pub(crate) fn error(&self, msg: impl Into<String>) -> Error {
        Error::Custom(msg.into(), self.span)
    }

    pub(crate) fn assert_ascii(&self) -> Result<&'a str, Error> {
        if !self.data.is_ascii() {
            return Err(Error::NotAscii(self.span));
        }

        std::str::from_utf8(self.data).map_err(|_| Error::NotAscii(self.span))
    }
}

/// A range of absolute byte offsets in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    lo: usize,
    hi: usize,
}

impl Span {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub fn lo(&self) -> usize {
        self.lo
    }

    pub fn hi(&self) -> usize {
        self.hi
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

/// Errors of the low level parsing layer. Everything except `Io` is reported
/// as `ErrorKind::Parse` by the crate level [`Error`](crate::Error).
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    #[fail(display = "unexpected end of file at byte {} (truncated file)", _0)]
    UnexpectedEof(usize),

    #[fail(display = "unexpected non-ASCII data at {}", _0)]
    NotAscii(Span),

    #[fail(
        display = "parsing lookahead got too big (due to a really degenerated \
            file or a parser bug)"
    )]
    LookAheadTooBig,

    #[fail(display = "{} (at {})", _0, _1)]
    Custom(String, Span)
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}


/// Formats bytes as string if they are valid UTF-8, as byte list otherwise.
pub(crate) fn debug_fmt_bytes(data: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(data) {
        format!("{:?}", s)
    } else {
        format!("{:?}", data)
    }
}

pub(crate) trait Stopper {
    fn should_stop(&self, byte: u8) -> bool;
}

impl Stopper for u8 {
    fn should_stop(&self, byte: u8) -> bool {
        byte == *self
    }
}

impl<F: Fn(u8) -> bool> Stopper for F {
    fn should_stop(&self, byte: u8) -> bool {
        self(byte)
    }
}
