//! Parsing the textual PLY header.
//!
//! The header is a sequence of newline terminated ASCII lines:
//!
//! ```text
//! ply
//! format ascii 1.0
//! comment made by hand
//! element vertex 8
//! property float x
//! property float y
//! property float z
//! element face 6
//! property list uchar int vertex_indices
//! end_header
//! ```
//!
//! Leading and trailing whitespace of each line is ignored (this also makes
//! `\r\n` line endings work) and empty lines are skipped.

use crate::{
    Error,
    parse::Input,
    types::{Encoding, PropertyType, ScalarType, ScalarTypeParseError},
};


/// Everything declared in the header of a PLY file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub(crate) encoding: Encoding,
    pub(crate) comments: Vec<String>,
    pub(crate) obj_infos: Vec<String>,
    pub(crate) elements: Vec<ElementDef>,
}

impl Header {
    /// The encoding of the body as declared by the `format` line.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The text of all `comment` lines in order, without the keyword.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The text of all `obj_info` lines in order, without the keyword.
    pub fn obj_infos(&self) -> &[String] {
        &self.obj_infos
    }

    /// All element definitions in the order they are stored in the body.
    pub fn elements(&self) -> &[ElementDef] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// The header definition of one element group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDef {
    pub name: String,

    /// Number of elements in this group.
    pub count: usize,

    /// Definitions for all properties of elements in this group.
    pub property_defs: Vec<PropertyDef>,
}

impl ElementDef {
    /// Returns the index of the property with the given name.
    pub fn prop_pos(&self, prop_name: &str) -> Option<usize> {
        self.property_defs.iter().position(|p| p.name == prop_name)
    }

    pub fn property_def(&self, prop_name: &str) -> Option<&PropertyDef> {
        self.property_defs.iter().find(|p| p.name == prop_name)
    }
}

/// The header definition of one property of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    pub ty: PropertyType,
}


/// Reads one line and consumes its linebreak. The returned string does not
/// contain the `\n`. Returns `None` if the input is exhausted.
fn next_line(buf: &mut impl Input) -> Result<Option<String>, Error> {
    if buf.is_eof()? {
        return Ok(None);
    }

    let line = buf.take_until(b'\n', |sd| {
        Ok(String::from_utf8_lossy(sd.data).into_owned())
    })?;

    // Skip the '\n' (if the input didn't end without one).
    if !buf.is_eof()? {
        buf.consume(1);
    }

    Ok(Some(line))
}

/// Returns the text of `line` after its first word, trimmed.
fn rest_after_keyword<'a>(line: &'a str, keyword: &str) -> &'a str {
    line[keyword.len()..].trim()
}

/// Parses a type token of a `property` line.
fn parse_type(token: Option<&str>, line_no: usize) -> Result<ScalarType, Error> {
    let token = token.ok_or_else(|| {
        Error::format(line_no, "missing type in property definition")
    })?;

    token.parse().map_err(|e: ScalarTypeParseError| Error::UnsupportedEncoding {
        msg: e.to_string(),
        line: line_no,
    })
}

/// Makes sure there are no more words in the line.
fn expect_end<'a>(
    mut words: impl Iterator<Item = &'a str>,
    line: &str,
    line_no: usize,
) -> Result<(), Error> {
    match words.next() {
        None => Ok(()),
        Some(word) => Err(Error::format(
            line_no,
            format!("unexpected {:?} at the end of line {:?}", word, line),
        )),
    }
}

/// Parses the header and leaves `buf` at the first byte of the body.
pub(crate) fn parse_header(buf: &mut impl Input) -> Result<Header, Error> {
    let mut line_no = 0;
    let mut magic_found = false;
    let mut encoding = None;
    let mut comments = Vec::new();
    let mut obj_infos = Vec::new();
    let mut elements: Vec<ElementDef> = Vec::new();

    loop {
        let raw_line = match next_line(buf)? {
            Some(line) => line,
            None if !magic_found => {
                return Err(Error::format(line_no, "not a PLY file (missing \"ply\" line)"));
            }
            None => {
                return Err(Error::format(line_no, "header ends without \"end_header\" line"));
            }
        };
        line_no += 1;

        let line = raw_line.trim();
        let mut words = line.split_whitespace();
        let keyword = match words.next() {
            Some(keyword) => keyword,
            None => continue,
        };

        // Only comments are allowed before the magic line.
        if !magic_found {
            match keyword {
                "ply" if line == "ply" => magic_found = true,
                "comment" => comments.push(rest_after_keyword(line, keyword).to_string()),
                _ => {
                    return Err(Error::format(
                        line_no,
                        format!("not a PLY file (expected \"ply\", found {:?})", line),
                    ));
                }
            }
            continue;
        }

        match keyword {
            "comment" => comments.push(rest_after_keyword(line, keyword).to_string()),
            "obj_info" => obj_infos.push(rest_after_keyword(line, keyword).to_string()),

            // E.g. `format binary_little_endian 1.0`
            "format" => {
                if encoding.is_some() {
                    return Err(Error::format(line_no, "duplicate \"format\" line"));
                }

                let token = words.next().ok_or_else(|| {
                    Error::format(line_no, "missing encoding in \"format\" line")
                })?;
                let enc = token.parse::<Encoding>().map_err(|e| Error::UnsupportedEncoding {
                    msg: e.to_string(),
                    line: line_no,
                })?;

                match words.next() {
                    Some("1.0") => {}
                    Some(version) => {
                        return Err(Error::format(
                            line_no,
                            format!("unsupported PLY version {:?} (only \"1.0\" is supported)", version),
                        ));
                    }
                    None => return Err(Error::format(line_no, "missing version in \"format\" line")),
                }
                expect_end(words, line, line_no)?;

                encoding = Some(enc);
            }

            // E.g. `element vertex 8`
            "element" => {
                let name = words.next().ok_or_else(|| {
                    Error::format(line_no, "missing element name")
                })?;
                let count_token = words.next().ok_or_else(|| {
                    Error::format(line_no, format!("missing count for element '{}'", name))
                })?;
                let count = count_token.parse::<usize>().map_err(|e| {
                    Error::format(
                        line_no,
                        format!("invalid integer {:?} as element count ({})", count_token, e),
                    )
                })?;
                expect_end(words, line, line_no)?;

                if elements.iter().any(|e| e.name == name) {
                    return Err(Error::format(line_no, format!("duplicate element '{}'", name)));
                }

                elements.push(ElementDef {
                    name: name.to_string(),
                    count,
                    property_defs: vec![],
                });
            }

            // E.g. `property float x` or `property list uchar int vertex_indices`
            "property" => {
                let elem = elements.last_mut().ok_or_else(|| {
                    Error::format(line_no, "property definition without preceding element definition")
                })?;

                let ty = match words.next() {
                    Some("list") => {
                        let len_type = parse_type(words.next(), line_no)?;
                        let scalar_type = parse_type(words.next(), line_no)?;

                        if len_type.is_floating_point() {
                            return Err(Error::format(
                                line_no,
                                format!("list lengths have to be integers, found '{}'", len_type),
                            ));
                        }

                        PropertyType::List { len_type, scalar_type }
                    }
                    token => PropertyType::Scalar(parse_type(token, line_no)?),
                };

                let name = words.next().ok_or_else(|| {
                    Error::format(line_no, "missing property name")
                })?;
                expect_end(words, line, line_no)?;

                if elem.prop_pos(name).is_some() {
                    return Err(Error::format(
                        line_no,
                        format!("duplicate property '{}' in element '{}'", name, elem.name),
                    ));
                }

                elem.property_defs.push(PropertyDef { name: name.to_string(), ty });
            }

            "end_header" => {
                expect_end(words, line, line_no)?;
                break;
            }

            "ply" => return Err(Error::format(line_no, "duplicate \"ply\" line")),

            _ => {
                return Err(Error::format(
                    line_no,
                    format!(
                        "expected \"format\", \"comment\", \"obj_info\", \"element\", \
                            \"property\" or \"end_header\", found {:?}",
                        line,
                    ),
                ));
            }
        }
    }

    let encoding = encoding.ok_or_else(|| {
        Error::format(line_no, "missing \"format\" line")
    })?;

    Ok(Header { encoding, comments, obj_infos, elements })
}
