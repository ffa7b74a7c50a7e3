//! The PLY type registry: scalar types, property types, body encodings and
//! dynamically typed values.
//!
//! Everything in here is a pure lookup without state. Both the header parser
//! (to understand type tokens) and the body reader (to know how many bytes
//! to read and how to interpret them) are built on top of this module.

use std::{
    fmt,
    str::FromStr,
};

use byteorder::ByteOrder;
use derive_more::From;

use crate::{
    Error,
    cast::Scalar,
    parse::{self, Span, SpannedData},
};


/// The encoding of the body of a PLY file, as declared by the `format` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl Encoding {
    /// Returns the token used in the `format` header line.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryLittleEndian => "binary_little_endian",
            Encoding::BinaryBigEndian => "binary_big_endian",
        }
    }

    pub fn is_binary(&self) -> bool {
        *self != Encoding::Ascii
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// The error emitted when the `FromStr` implementation for `Encoding` cannot
/// parse the given string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingParseError(pub String);

impl fmt::Display for EncodingParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "expected \"ascii\", \"binary_little_endian\" or \"binary_big_endian\", \
                found \"{}\"",
            self.0,
        )
    }
}

impl FromStr for Encoding {
    type Err = EncodingParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Encoding::Ascii),
            "binary_little_endian" => Ok(Encoding::BinaryLittleEndian),
            "binary_big_endian" => Ok(Encoding::BinaryBigEndian),
            other => Err(EncodingParseError(other.to_string())),
        }
    }
}


/// A primitive PLY type. There are 8 in total, 2 floating point types, 3
/// signed and 3 unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Returns the canonical type name used in the header (e.g. `short` for
    /// `i16`). The sized aliases (`int16`) are accepted when parsing, but
    /// never returned here.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Char => "char",
            ScalarType::UChar => "uchar",
            ScalarType::Short => "short",
            ScalarType::UShort => "ushort",
            ScalarType::Int => "int",
            ScalarType::UInt => "uint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
        }
    }

    /// Returns `true` if and only if the type is either `float` or `double`.
    pub fn is_floating_point(&self) -> bool {
        *self == ScalarType::Float || *self == ScalarType::Double
    }

    /// Returns `true` if and only if the type is one of `uchar`, `ushort` or
    /// `uint`.
    pub fn is_unsigned_integer(&self) -> bool {
        match self {
            ScalarType::UChar | ScalarType::UShort | ScalarType::UInt => true,
            _ => false,
        }
    }

    /// Returns `true` if and only if the type is one of `char`, `short` or
    /// `int`.
    pub fn is_signed_integer(&self) -> bool {
        match self {
            ScalarType::Char | ScalarType::Short | ScalarType::Int => true,
            _ => false,
        }
    }

    /// Returns the number of bytes this type occupies in binary encodings.
    pub fn size(&self) -> usize {
        match self {
            ScalarType::Char => 1,
            ScalarType::UChar => 1,
            ScalarType::Short => 2,
            ScalarType::UShort => 2,
            ScalarType::Int => 4,
            ScalarType::UInt => 4,
            ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    /// Parses one ASCII token as a value of this type.
    ///
    /// Fails with a parse error if the token is not a number or if it is out
    /// of range for an integer type. Floating point tokens for integer types
    /// are rejected, too. The span in the error is relative to `token`.
    pub fn parse_ascii(&self, token: &str) -> Result<Value, Error> {
        let sd = SpannedData {
            data: token.as_bytes(),
            span: Span::new(0, token.len()),
        };

        self.parse_token(&sd).map_err(Into::into)
    }

    /// Parses the ASCII token `sd`. Errors point at `sd.span`.
    pub(crate) fn parse_token(&self, sd: &SpannedData<'_>) -> Result<Value, parse::Error> {
        let token = sd.assert_ascii()?;
        parse_literal(*self, token).map_err(|msg| sd.error(msg))
    }

    /// Decodes one binary field of this type from `buf` at `*offset` in the
    /// byte order `B` and advances `offset` by `self.size()`.
    pub fn decode<B: ByteOrder>(&self, buf: &[u8], offset: &mut usize) -> Result<Value, Error> {
        let start = *offset;
        let field = start.checked_add(self.size())
            .and_then(|end| buf.get(start..end))
            .ok_or_else(|| parse::Error::UnexpectedEof(buf.len()))?;

        let value = self.decode_field::<B>(field);
        *offset += self.size();
        Ok(value)
    }

    /// Interprets `field` in the byte order `B`. `field` has to be exactly
    /// `self.size()` bytes long.
    pub(crate) fn decode_field<B: ByteOrder>(&self, field: &[u8]) -> Value {
        debug_assert_eq!(field.len(), self.size());

        match self {
            ScalarType::Char => Value::Char(field[0] as i8),
            ScalarType::UChar => Value::UChar(field[0]),
            ScalarType::Short => Value::Short(B::read_i16(field)),
            ScalarType::UShort => Value::UShort(B::read_u16(field)),
            ScalarType::Int => Value::Int(B::read_i32(field)),
            ScalarType::UInt => Value::UInt(B::read_u32(field)),
            ScalarType::Float => Value::Float(B::read_f32(field)),
            ScalarType::Double => Value::Double(B::read_f64(field)),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// The error emitted when the `FromStr` implementation for `ScalarType` cannot
/// parse the given string.
#[derive(Clone, PartialEq, Eq)]
pub struct ScalarTypeParseError(pub String);

impl fmt::Display for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" is not a valid PLY scalar type", self.0)
    }
}

impl fmt::Debug for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for ScalarType {
    type Err = ScalarTypeParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" | "int8" => Ok(ScalarType::Char),
            "uchar" | "uint8" => Ok(ScalarType::UChar),
            "short" | "int16" => Ok(ScalarType::Short),
            "ushort" | "uint16" => Ok(ScalarType::UShort),
            "int" | "int32" => Ok(ScalarType::Int),
            "uint" | "uint32" => Ok(ScalarType::UInt),
            "float" | "float32" => Ok(ScalarType::Float),
            "double" | "float64" => Ok(ScalarType::Double),
            other => Err(ScalarTypeParseError(other.to_string())),
        }
    }
}

/// Parses `token` as `ty`. On error, a message suitable for
/// `parse::Error::Custom` is returned.
fn parse_literal(ty: ScalarType, token: &str) -> Result<Value, String> {
    fn parse<T>(ty: ScalarType, token: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        token.parse::<T>()
            .map_err(|e| format!("invalid '{}' literal {:?}: {}", ty, token, e))
    }

    let value = match ty {
        ScalarType::Char => Value::Char(parse(ty, token)?),
        ScalarType::UChar => Value::UChar(parse(ty, token)?),
        ScalarType::Short => Value::Short(parse(ty, token)?),
        ScalarType::UShort => Value::UShort(parse(ty, token)?),
        ScalarType::Int => Value::Int(parse(ty, token)?),
        ScalarType::UInt => Value::UInt(parse(ty, token)?),
        ScalarType::Float => Value::Float(parse(ty, token)?),
        ScalarType::Double => Value::Double(parse(ty, token)?),
    };

    Ok(value)
}


/// The declared type of a property: either a single scalar or a list with
/// a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Scalar(ScalarType),
    List {
        len_type: ScalarType,
        scalar_type: ScalarType,
    }
}

impl PropertyType {
    pub fn len_type(&self) -> Option<ScalarType> {
        match self {
            PropertyType::Scalar(_) => None,
            PropertyType::List { len_type, .. } => Some(*len_type),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match *self {
            PropertyType::Scalar(scalar_type) => scalar_type,
            PropertyType::List { scalar_type, .. } => scalar_type,
        }
    }

    pub fn is_list(&self) -> bool {
        self.len_type().is_some()
    }
}

impl fmt::Display for PropertyType {
    /// Formats the type like in the header, e.g. `float` or `list uchar int`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyType::Scalar(ty) => ty.fmt(f),
            PropertyType::List { len_type, scalar_type } => {
                write!(f, "list {} {}", len_type, scalar_type)
            }
        }
    }
}


/// One dynamically typed PLY scalar value.
#[derive(Debug, Clone, Copy, PartialEq, From)]
pub enum Value {
    Char(i8),
    UChar(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
}

impl Value {
    /// Returns the type of this value.
    pub fn ty(&self) -> ScalarType {
        match self {
            Value::Char(_) => ScalarType::Char,
            Value::UChar(_) => ScalarType::UChar,
            Value::Short(_) => ScalarType::Short,
            Value::UShort(_) => ScalarType::UShort,
            Value::Int(_) => ScalarType::Int,
            Value::UInt(_) => ScalarType::UInt,
            Value::Float(_) => ScalarType::Float,
            Value::Double(_) => ScalarType::Double,
        }
    }

    /// Converts this value to `T`. See [`Scalar`] for the conversion rules.
    pub fn to<T: Scalar>(self) -> T {
        T::from_value(self)
    }

    /// Returns the value as integer, or `None` if the value does not have an
    /// integer type. This function does not cast floats.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Value::Char(v) => Some(v.into()),
            Value::UChar(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::UShort(v) => Some(v.into()),
            Value::Int(v) => Some(v.into()),
            Value::UInt(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Char(v) => v.fmt(f),
            Value::UChar(v) => v.fmt(f),
            Value::Short(v) => v.fmt(f),
            Value::UShort(v) => v.fmt(f),
            Value::Int(v) => v.fmt(f),
            Value::UInt(v) => v.fmt(f),
            Value::Float(v) => v.fmt(f),
            Value::Double(v) => v.fmt(f),
        }
    }
}


#[cfg(test)]
mod tests {
    use byteorder::{BigEndian, LittleEndian};
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn scalar_type_tokens() {
        assert_eq!("uchar".parse::<ScalarType>(), Ok(ScalarType::UChar));
        assert_eq!("uint8".parse::<ScalarType>(), Ok(ScalarType::UChar));
        assert_eq!("float32".parse::<ScalarType>(), Ok(ScalarType::Float));
        assert_eq!("double".parse::<ScalarType>(), Ok(ScalarType::Double));
        assert!("Float".parse::<ScalarType>().is_err());
        assert!("int64".parse::<ScalarType>().is_err());

        // Canonical names parse back to the same type.
        let all = [
            ScalarType::Char, ScalarType::UChar, ScalarType::Short, ScalarType::UShort,
            ScalarType::Int, ScalarType::UInt, ScalarType::Float, ScalarType::Double,
        ];
        for &ty in &all {
            assert_eq!(ty.name().parse::<ScalarType>(), Ok(ty));
        }
    }

    #[test]
    fn scalar_type_class() {
        assert_eq!(ScalarType::Char.size(), 1);
        assert_eq!(ScalarType::UShort.size(), 2);
        assert_eq!(ScalarType::Float.size(), 4);
        assert_eq!(ScalarType::Double.size(), 8);

        assert!(ScalarType::Int.is_signed_integer());
        assert!(!ScalarType::Int.is_unsigned_integer());
        assert!(ScalarType::UInt.is_unsigned_integer());
        assert!(ScalarType::Double.is_floating_point());
        assert!(!ScalarType::Double.is_signed_integer());
    }

    #[test]
    fn encoding_tokens() {
        assert_eq!("ascii".parse::<Encoding>(), Ok(Encoding::Ascii));
        assert_eq!(
            "binary_big_endian".parse::<Encoding>(),
            Ok(Encoding::BinaryBigEndian),
        );
        assert_eq!(
            "binary_little_endian".parse::<Encoding>(),
            Ok(Encoding::BinaryLittleEndian),
        );
        assert!("binary".parse::<Encoding>().is_err());
        assert!(Encoding::BinaryBigEndian.is_binary());
        assert!(!Encoding::Ascii.is_binary());
    }

    #[test]
    fn parse_ascii_tokens() {
        assert_eq!(ScalarType::UChar.parse_ascii("255").unwrap(), Value::UChar(255));
        assert_eq!(ScalarType::Char.parse_ascii("-128").unwrap(), Value::Char(-128));
        assert_eq!(ScalarType::Float.parse_ascii("1.5e2").unwrap(), Value::Float(150.0));
        assert_eq!(ScalarType::Double.parse_ascii("-0.25").unwrap(), Value::Double(-0.25));

        let out_of_range = ScalarType::UChar.parse_ascii("256").unwrap_err();
        assert_eq!(out_of_range.kind(), ErrorKind::Parse);
        assert_eq!(ScalarType::Int.parse_ascii("abc").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(ScalarType::Int.parse_ascii("1.0").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(ScalarType::UInt.parse_ascii("-1").unwrap_err().kind(), ErrorKind::Parse);

        // Spans are relative to the token.
        match ScalarType::Short.parse_ascii("4e4") {
            Err(Error::Parse(parse::Error::Custom(_, span))) => assert_eq!(span, Span::new(0, 3)),
            other => panic!("expected parse error, got {:?}", other),
        }
        match ScalarType::Int.parse_ascii("1ä") {
            Err(Error::Parse(parse::Error::NotAscii(span))) => assert_eq!(span, Span::new(0, 3)),
            other => panic!("expected non-ASCII error, got {:?}", other),
        }
    }

    #[test]
    fn decode_fields() {
        let buf = [0x01, 0x02, 0xff, 0x00, 0x00, 0x80, 0x3f];
        let mut offset = 0;

        assert_eq!(
            ScalarType::UShort.decode::<BigEndian>(&buf, &mut offset).unwrap(),
            Value::UShort(0x0102),
        );
        assert_eq!(offset, 2);
        assert_eq!(
            ScalarType::Char.decode::<BigEndian>(&buf, &mut offset).unwrap(),
            Value::Char(-1),
        );
        assert_eq!(offset, 3);
        assert_eq!(
            ScalarType::Float.decode::<LittleEndian>(&buf, &mut offset).unwrap(),
            Value::Float(1.0),
        );
        assert_eq!(offset, 7);

        // Underrun does not move the cursor.
        let err = ScalarType::UChar.decode::<LittleEndian>(&buf, &mut offset).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(offset, 7);
    }

    #[test]
    fn property_type_display() {
        assert_eq!(PropertyType::Scalar(ScalarType::Float).to_string(), "float");
        let list = PropertyType::List {
            len_type: ScalarType::UChar,
            scalar_type: ScalarType::Int,
        };
        assert_eq!(list.to_string(), "list uchar int");
        assert!(list.is_list());
        assert_eq!(list.scalar_type(), ScalarType::Int);
    }
}
