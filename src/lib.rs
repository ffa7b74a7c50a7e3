//! Reading PLY (Polygon File Format) files.
//!
//! A PLY file consists of a textual header declaring *elements* (e.g.
//! `vertex` or `face`) with their *properties* (e.g. `x` or
//! `vertex_indices`), followed by a body holding the values in ASCII, binary
//! little endian or binary big endian encoding. This crate reads such files
//! completely into memory and lets you query every property by name,
//! converted into the numeric type you want.
//!
//! ```no_run
//! use plydata::PlyData;
//!
//! let ply = PlyData::open("bunny.ply")?;
//! let positions = ply.vertex_positions()?;
//! let faces = ply.face_indices::<u32>()?;
//! let confidence = ply.property::<f32>("vertex", "confidence")?;
//! # Ok::<(), plydata::Error>(())
//! ```
//!
//! If you want to look at the header before reading the body, use
//! [`Reader`]. How values are converted is described in the [`cast`]
//! module.

#![deny(missing_debug_implementations)]


pub mod cast;
mod data;
mod error;
pub mod header;
pub mod parse;
mod read;
pub mod store;
pub mod types;


pub use crate::{
    cast::Scalar,
    data::PlyData,
    error::{Error, ErrorKind, PropertyKind},
    header::{ElementDef, Header, PropertyDef},
    read::Reader,
    store::{Column, Element, ListValues, Property, Values},
    types::{Encoding, PropertyType, ScalarType, Value},
};
