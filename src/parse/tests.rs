use std::io::{self, Read};

use super::{*, buf::Buffer};


/// A reader that returns at most one byte per `read` call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() || buf.is_empty() {
            return Ok(0);
        }

        buf[0] = self.0[0];
        self.0 = &self.0[1..];
        Ok(1)
    }
}

/// A reader that fails after `ok` bytes.
struct Failing {
    ok: usize,
}

impl Read for Failing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.ok == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }

        let n = std::cmp::min(self.ok, buf.len());
        for b in &mut buf[..n] {
            *b = b'a';
        }
        self.ok -= n;
        Ok(n)
    }
}


#[test]
fn take_and_skip() -> Result<(), Error> {
    let mut buf = Buffer::new(&b"  hello world\nrest"[..])?;

    buf.skip_until(|b: u8| b != b' ')?;
    assert_eq!(buf.offset(), 2);

    let word = buf.take_until(b' ', |sd| {
        assert_eq!(sd.span, Span::new(2, 7));
        Ok(sd.assert_ascii()?.to_string())
    })?;
    assert_eq!(word, "hello");

    buf.consume(1);
    let line = buf.take_until(b'\n', |sd| Ok(sd.data.to_vec()))?;
    assert_eq!(line, b"world");
    buf.consume(1);

    // The end of input also stops.
    let rest = buf.take_until(b'\n', |sd| Ok(sd.data.to_vec()))?;
    assert_eq!(rest, b"rest");
    assert!(buf.is_eof()?);

    let nothing = buf.take_until(b'\n', |sd| Ok(sd.data.len()))?;
    assert_eq!(nothing, 0);

    Ok(())
}

#[test]
fn refills_across_reads() -> Result<(), Error> {
    let data = b"ply\nformat ascii 1.0\n";
    let mut buf = Buffer::new(Trickle(data))?;

    let first = buf.take_until(b'\n', |sd| Ok(sd.data.to_vec()))?;
    assert_eq!(first, b"ply");
    buf.consume(1);

    assert!(buf.is_next(b"format")?);
    let second = buf.take_until(b'\n', |sd| Ok(sd.data.to_vec()))?;
    assert_eq!(second, b"format ascii 1.0");
    buf.consume(1);

    assert!(buf.is_eof()?);
    assert_eq!(buf.offset(), data.len());

    Ok(())
}

/// Takes the next `n` bytes.
fn take(buf: &mut impl Input, n: usize) -> Result<(Vec<u8>, Span), Error> {
    buf.with_bytes(n, |sd| Ok((sd.data.to_vec(), sd.span)))
}

#[test]
fn fixed_size_fields() -> Result<(), Error> {
    let data: &[u8] = &[
        0x01, 0x02,
        0xff,
        0x00, 0x00, 0x80, 0x3f,
        0x3f, 0xf0, 0, 0, 0, 0, 0, 0,
    ];
    let mut buf = Buffer::new(Trickle(data))?;

    assert_eq!(take(&mut buf, 2)?, (vec![0x01, 0x02], Span::new(0, 2)));
    assert_eq!(take(&mut buf, 1)?, (vec![0xff], Span::new(2, 3)));
    assert_eq!(take(&mut buf, 4)?, (vec![0x00, 0x00, 0x80, 0x3f], Span::new(3, 7)));
    assert_eq!(take(&mut buf, 8)?.1, Span::new(7, 15));
    assert!(buf.is_eof()?);

    Ok(())
}

#[test]
fn unexpected_eof() -> Result<(), Error> {
    let mut buf = Buffer::new(&[1u8, 2, 3][..])?;
    assert_eq!(take(&mut buf, 2)?.0, vec![1, 2]);

    match take(&mut buf, 4) {
        Err(Error::UnexpectedEof(pos)) => assert_eq!(pos, 3),
        other => panic!("expected EOF error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn io_errors_are_forwarded() {
    let mut buf = match Buffer::new(Failing { ok: 2 }) {
        Ok(buf) => buf,
        Err(e) => panic!("unexpected error: {}", e),
    };

    assert_eq!(take(&mut buf, 2).unwrap().0, b"aa".to_vec());
    match take(&mut buf, 1) {
        Err(Error::Io(e)) => assert_eq!(e.to_string(), "disk on fire"),
        other => panic!("expected IO error, got {:?}", other),
    }
}

#[test]
fn not_ascii() -> Result<(), Error> {
    let mut buf = Buffer::new(&b"ab\xffc d"[..])?;
    let res = buf.take_until(b' ', |sd| sd.assert_ascii().map(|s| s.to_string()));

    match res {
        Err(Error::NotAscii(span)) => assert_eq!(span, Span::new(0, 4)),
        other => panic!("expected non-ASCII error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn huge_lookahead_is_rejected() -> Result<(), Error> {
    let data = vec![b'x'; buf::MAX_BUFFER_SIZE + 10];
    let mut buf = Buffer::new(&data[..])?;

    match buf.take_until(b'\n', |sd| Ok(sd.data.len())) {
        Err(Error::LookAheadTooBig) => {}
        other => panic!("expected look-ahead error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn span_display() {
    assert_eq!(Span::new(3, 8).to_string(), "3..8");
    let err = Error::Custom("bad".into(), Span::new(3, 8));
    assert_eq!(err.to_string(), "bad (at 3..8)");
}
