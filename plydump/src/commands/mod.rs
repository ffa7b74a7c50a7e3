use std::fs::File;

use failure::{Error, ResultExt};
use plydata::{PlyData, Reader};


pub mod dump;
pub mod info;


/// Opens the given file and parses its header.
fn open(filename: &str) -> Result<Reader<File>, Error> {
    let reader = Reader::open(filename)
        .context(format!("failed to read PLY header of '{}'", filename))?;

    Ok(reader)
}

/// Reads the body of a file previously opened with `open`.
fn read_body(reader: Reader<File>, filename: &str) -> Result<PlyData, Error> {
    let ply = progress!(["Reading body of '{}'", filename] => reader.read())
        .context(format!("failed to read PLY body of '{}'", filename))?;

    Ok(ply)
}
