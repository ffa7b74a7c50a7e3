//! Reading PLY files.
//!
//! [`Reader`] parses the header on construction and decodes the body in
//! [`Reader::read`]. Most users want [`PlyData::open`] or
//! [`PlyData::from_reader`] instead, which do both in one step.

use std::{
    cmp::min,
    fs::File,
    io,
    path::Path,
};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{
    Error, PlyData,
    header::{self, ElementDef, Header},
    parse::{self, Input, Span, buf::Buffer},
    store::{Column, Element, Values},
    types::{Encoding, PropertyType, ScalarType, Value},
};




/// Upper bound for the number of rows memory is reserved for before the
/// data is actually read. A header can claim any element count, so only the
/// data itself may cause larger allocations.
const MAX_PREALLOC_ROWS: usize = 64 * 1024;


// ===========================================================================
// ===== Definition of `Reader`
// ===========================================================================

/// A reader able to read PLY files.
///
/// You can create a reader with [`Reader::open`] or [`Reader::new`]. Both
/// read the header immediately, so you can inspect it via
/// [`Reader::header`] before deciding to read the (potentially large) body
/// with [`Reader::read`].
#[derive(Debug)]
pub struct Reader<R: io::Read> {
    buf: Buffer<R>,
    header: Header,
}

impl Reader<File> {
    /// Tries to open the file specified by the given path and creates a new
    /// `Reader` from that file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        // We don't need a `BufReader` here, because we will use our internal
        // parse buffer anyway.
        Self::new(File::open(path)?)
    }
}

impl<R: io::Read> Reader<R> {
    /// Creates a new `Reader` from the given `io::Read` instance and parses
    /// the header of the given input.
    ///
    /// If you want to open a file, rather use [`Reader::open`].
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut buf = Buffer::new(reader)?;
        let header = header::parse_header(&mut buf)?;

        log::debug!(
            "parsed PLY header ({} bytes): encoding {}, {} element group(s), {} comment(s)",
            buf.offset(),
            header.encoding,
            header.elements.len(),
            header.comments.len(),
        );

        Ok(Self { buf, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding
    }

    /// Reads the whole body and returns the file's data.
    ///
    /// Fails with a parse error if the body ends before all elements declared
    /// in the header are read or if a value can't be parsed. Data after the
    /// last element is ignored.
    pub fn read(self) -> Result<PlyData, Error> {
        let Self { mut buf, header } = self;
        let mut elements = Vec::with_capacity(header.elements.len());

        // Iterate through each element group
        for def in &header.elements {
            log::trace!(
                "reading {} '{}' element(s) starting at byte {}",
                def.count,
                def.name,
                buf.offset(),
            );

            let columns = match header.encoding {
                Encoding::Ascii => read_group::<AsciiEncoding, _>(&mut buf, def)?,
                Encoding::BinaryBigEndian => read_group::<BbeEncoding, _>(&mut buf, def)?,
                Encoding::BinaryLittleEndian => read_group::<BleEncoding, _>(&mut buf, def)?,
            };

            elements.push(Element::new(def.clone(), columns));
        }

        // The last ASCII line is usually terminated by a linebreak.
        if header.encoding == Encoding::Ascii {
            buf.skip_until(|b: u8| !is_separator(b))?;
        }
        if !buf.is_eof()? {
            buf.saturating_prepare(16)?;
            let len = min(16, buf.raw_buf().len());
            log::debug!(
                "ignoring trailing data after byte {} (starts with {})",
                buf.offset(),
                parse::debug_fmt_bytes(&buf.raw_buf()[..len]),
            );
        }

        Ok(PlyData::new(header, elements))
    }
}


// ===========================================================================
// ===== Helpers for body parsing
// ===========================================================================

/// Helper trait to abstract the three different encodings.
trait EncodingReader {
    /// Reads the next value of type `ty`.
    fn read_value(buf: &mut impl Input, ty: ScalarType) -> Result<Value, parse::Error>;
}

/// Binary big endian encoding.
enum BbeEncoding {}
impl EncodingReader for BbeEncoding {
    fn read_value(buf: &mut impl Input, ty: ScalarType) -> Result<Value, parse::Error> {
        read_binary::<BigEndian>(buf, ty)
    }
}

/// Binary little endian encoding.
enum BleEncoding {}
impl EncodingReader for BleEncoding {
    fn read_value(buf: &mut impl Input, ty: ScalarType) -> Result<Value, parse::Error> {
        read_binary::<LittleEndian>(buf, ty)
    }
}

fn read_binary<B: ByteOrder>(buf: &mut impl Input, ty: ScalarType) -> Result<Value, parse::Error> {
    buf.with_bytes(ty.size(), |sd| Ok(ty.decode_field::<B>(sd.data)))
}

/// Bytes separating two tokens in the ASCII body. Line structure is
/// irrelevant, so `\n` is just another separator.
fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

/// ASCII encoding.
enum AsciiEncoding {}
impl EncodingReader for AsciiEncoding {
    fn read_value(buf: &mut impl Input, ty: ScalarType) -> Result<Value, parse::Error> {
        buf.skip_until(|b: u8| !is_separator(b))?;
        if buf.is_eof()? {
            return Err(parse::Error::UnexpectedEof(buf.offset()));
        }

        buf.take_until(is_separator, |sd| ty.parse_token(&sd))
    }
}

/// Reads a single value and appends it to `values` (whose type determines
/// what is read).
fn push_value<E: EncodingReader, I: Input>(
    buf: &mut I,
    values: &mut Values,
) -> Result<(), parse::Error> {
    let value = E::read_value(buf, values.ty())?;
    values.push(value);

    Ok(())
}

/// Reads the length prefix of a list.
fn read_list_len<E: EncodingReader, I: Input>(
    buf: &mut I,
    len_type: ScalarType,
) -> Result<usize, parse::Error> {
    let start = buf.offset();
    let len = E::read_value(buf, len_type)?;

    // Float length types are rejected by the header parser, so `as_integer`
    // only fails for negative lengths.
    match len.as_integer() {
        Some(n) if n >= 0 => Ok(n as usize),
        _ => Err(parse::Error::Custom(
            format!("invalid list length {}", len),
            Span::new(start, buf.offset()),
        )),
    }
}

/// Reads all elements of one element group as described by `def`. Returns
/// one column per property. The type parameter `E` is used to actually read
/// values.
fn read_group<E: EncodingReader, I: Input>(
    buf: &mut I,
    def: &ElementDef,
) -> Result<Vec<Column>, Error> {
    // Rows without properties occupy no bytes, whatever the count says.
    if def.property_defs.is_empty() {
        return Ok(Vec::new());
    }

    let capacity = min(def.count, MAX_PREALLOC_ROWS);
    let mut columns = def.property_defs.iter()
        .map(|p| Column::with_capacity(p.ty, capacity))
        .collect::<Vec<_>>();

    for _ in 0..def.count {
        for (prop_def, column) in def.property_defs.iter().zip(&mut columns) {
            match (prop_def.ty, column) {
                (PropertyType::Scalar(_), Column::Scalar(values)) => {
                    push_value::<E, _>(buf, values)?;
                }
                (PropertyType::List { len_type, .. }, Column::List(lists)) => {
                    let len = read_list_len::<E, _>(buf, len_type)?;
                    for _ in 0..len {
                        push_value::<E, _>(buf, &mut lists.values)?;
                    }
                    lists.finish_row();
                }
                _ => unreachable!("column does not match its property definition"),
            }
        }
    }

    Ok(columns)
}
