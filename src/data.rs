use std::{
    io,
    path::Path,
};

use static_assertions::assert_impl_all;

use crate::{
    Error,
    cast::Scalar,
    header::Header,
    read::Reader,
    store::Element,
    types::Encoding,
};


/// The fully decoded contents of a PLY file.
///
/// This is the main type of this library. Create it with [`PlyData::open`],
/// [`PlyData::from_reader`] or [`PlyData::from_bytes`]; the whole file is
/// read and decoded right away. Afterwards, values can be queried by element
/// and property name and converted into any [`Scalar`] type:
///
/// ```
/// use plydata::PlyData;
///
/// let src = b"\
///     ply\n\
///     format ascii 1.0\n\
///     element vertex 2\n\
///     property float x\n\
///     property float y\n\
///     end_header\n\
///     1.0 2.0\n\
///     3.0 4.0\n\
/// ";
///
/// let ply = PlyData::from_bytes(src)?;
/// assert_eq!(ply.property::<f64>("vertex", "x")?, vec![1.0, 3.0]);
/// assert_eq!(ply.property::<f64>("vertex", "y")?, vec![2.0, 4.0]);
/// # Ok::<(), plydata::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlyData {
    header: Header,
    elements: Vec<Element>,
}

assert_impl_all!(PlyData: Send, Sync);

impl PlyData {
    pub(crate) fn new(header: Header, elements: Vec<Element>) -> Self {
        Self { header, elements }
    }

    /// Opens and reads the file at `path`. The file is closed before this
    /// function returns, no matter whether reading succeeded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Reader::open(path)?.read()
    }

    pub fn from_reader(reader: impl io::Read) -> Result<Self, Error> {
        Reader::new(reader)?.read()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_reader(bytes)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding()
    }

    pub fn comments(&self) -> &[String] {
        self.header.comments()
    }

    pub fn obj_infos(&self) -> &[String] {
        self.header.obj_infos()
    }

    /// All element groups in file order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().map(|e| e.name())
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name() == name)
    }

    /// Returns the element group called `name` or a lookup error.
    pub fn element(&self, name: &str) -> Result<&Element, Error> {
        self.elements.iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| Error::UnknownElement { element: name.to_string() })
    }

    /// Shorthand for `self.element(element)?.property(prop)`.
    pub fn property<T: Scalar>(&self, element: &str, prop: &str) -> Result<Vec<T>, Error> {
        self.element(element)?.property(prop)
    }

    /// Shorthand for `self.element(element)?.list_property(prop)`.
    pub fn list_property<T: Scalar>(
        &self,
        element: &str,
        prop: &str,
    ) -> Result<Vec<Vec<T>>, Error> {
        self.element(element)?.list_property(prop)
    }

    /// Returns the `x`, `y` and `z` properties of the `vertex` element.
    pub fn vertex_positions(&self) -> Result<Vec<[f64; 3]>, Error> {
        let vertex = self.element("vertex")?;
        let xs = vertex.property::<f64>("x")?;
        let ys = vertex.property::<f64>("y")?;
        let zs = vertex.property::<f64>("z")?;

        let positions = xs.into_iter()
            .zip(ys)
            .zip(zs)
            .map(|((x, y), z)| [x, y, z])
            .collect();

        Ok(positions)
    }

    /// Returns the face lists of the `face` element.
    ///
    /// The property is usually called `vertex_indices`, but some exporters
    /// write `vertex_index`. Both are accepted, the former is preferred.
    pub fn face_indices<T: Scalar>(&self) -> Result<Vec<Vec<T>>, Error> {
        let face = self.element("face")?;
        if !face.has_property("vertex_indices") && face.has_property("vertex_index") {
            face.list_property("vertex_index")
        } else {
            face.list_property("vertex_indices")
        }
    }
}
