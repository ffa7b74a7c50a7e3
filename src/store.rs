//! In-memory storage of decoded element data.
//!
//! Each property of an element is stored as one [`Column`]. Columns are
//! typed vectors of the declared PLY type, so nothing is converted while
//! reading. Conversion to the caller's type happens in the accessors (see
//! [`Scalar`]).

use std::{
    fmt,
    ops::Range,
};

use smallvec::SmallVec;

use crate::{
    Error, PropertyKind,
    cast::Scalar,
    header::{ElementDef, PropertyDef},
    types::{PropertyType, ScalarType, Value},
};


/// Expands `$body` once per variant of `Values` with `$v` bound to the inner
/// vector.
macro_rules! dispatch_values {
    ($values:expr, $v:ident => $body:expr) => {
        match $values {
            Values::Char($v) => $body,
            Values::UChar($v) => $body,
            Values::Short($v) => $body,
            Values::UShort($v) => $body,
            Values::Int($v) => $body,
            Values::UInt($v) => $body,
            Values::Float($v) => $body,
            Values::Double($v) => $body,
        }
    };
}

/// A vector of values of one PLY scalar type.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Char(Vec<i8>),
    UChar(Vec<u8>),
    Short(Vec<i16>),
    UShort(Vec<u16>),
    Int(Vec<i32>),
    UInt(Vec<u32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Values {
    pub fn new(ty: ScalarType) -> Self {
        Self::with_capacity(ty, 0)
    }

    pub fn with_capacity(ty: ScalarType, capacity: usize) -> Self {
        match ty {
            ScalarType::Char => Values::Char(Vec::with_capacity(capacity)),
            ScalarType::UChar => Values::UChar(Vec::with_capacity(capacity)),
            ScalarType::Short => Values::Short(Vec::with_capacity(capacity)),
            ScalarType::UShort => Values::UShort(Vec::with_capacity(capacity)),
            ScalarType::Int => Values::Int(Vec::with_capacity(capacity)),
            ScalarType::UInt => Values::UInt(Vec::with_capacity(capacity)),
            ScalarType::Float => Values::Float(Vec::with_capacity(capacity)),
            ScalarType::Double => Values::Double(Vec::with_capacity(capacity)),
        }
    }

    /// The PLY type of the stored values.
    pub fn ty(&self) -> ScalarType {
        match self {
            Values::Char(_) => ScalarType::Char,
            Values::UChar(_) => ScalarType::UChar,
            Values::Short(_) => ScalarType::Short,
            Values::UShort(_) => ScalarType::UShort,
            Values::Int(_) => ScalarType::Int,
            Values::UInt(_) => ScalarType::UInt,
            Values::Float(_) => ScalarType::Float,
            Values::Double(_) => ScalarType::Double,
        }
    }

    pub fn len(&self) -> usize {
        dispatch_values!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        dispatch_values!(self, v => v.get(idx).map(|&x| Value::from(x)))
    }

    /// Appends `value`, converted to the type of this vector.
    pub(crate) fn push(&mut self, value: Value) {
        dispatch_values!(self, v => v.push(value.to()))
    }

    /// Converts all values to `T`.
    pub fn to_vec<T: Scalar>(&self) -> Vec<T> {
        self.range_to_vec(0..self.len())
    }

    /// Converts the values in `range` to `T`.
    ///
    /// # Panics
    ///
    /// If `range` is out of bounds.
    pub fn range_to_vec<T: Scalar>(&self, range: Range<usize>) -> Vec<T> {
        dispatch_values!(self, v => v[range].iter().map(|&x| T::from_value(x.into())).collect())
    }
}


/// The values of a list property: all list entries of all elements
/// concatenated, plus the offsets where each element's list starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValues {
    pub(crate) values: Values,

    /// Always has one entry more than there are rows. Row `i` is
    /// `values[offsets[i]..offsets[i + 1]]`.
    pub(crate) offsets: Vec<usize>,
}

impl ListValues {
    pub(crate) fn with_capacity(ty: ScalarType, rows: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);

        Self {
            values: Values::new(ty),
            offsets,
        }
    }

    /// Marks the end of the current row.
    pub(crate) fn finish_row(&mut self) {
        self.offsets.push(self.values.len());
    }

    /// Number of rows (i.e. lists).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The concatenated values of all rows.
    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The range in `values()` holding the list of `row`.
    pub fn row_range(&self, row: usize) -> Option<Range<usize>> {
        if row >= self.len() {
            return None;
        }

        Some(self.offsets[row]..self.offsets[row + 1])
    }

    pub fn row<T: Scalar>(&self, row: usize) -> Option<Vec<T>> {
        self.row_range(row).map(|r| self.values.range_to_vec(r))
    }

    /// Converts all rows to `T`.
    pub fn to_vecs<T: Scalar>(&self) -> Vec<Vec<T>> {
        self.offsets.windows(2)
            .map(|w| self.values.range_to_vec(w[0]..w[1]))
            .collect()
    }
}


/// All values of one property of an element group.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(Values),
    List(ListValues),
}

impl Column {
    /// Creates an empty column for a property of type `ty`, reserving memory
    /// for `capacity` rows.
    pub(crate) fn with_capacity(ty: PropertyType, capacity: usize) -> Self {
        match ty {
            PropertyType::Scalar(ty) => Column::Scalar(Values::with_capacity(ty, capacity)),
            PropertyType::List { scalar_type, .. } => {
                Column::List(ListValues::with_capacity(scalar_type, capacity))
            }
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            Column::Scalar(_) => PropertyKind::Scalar,
            Column::List(_) => PropertyKind::List,
        }
    }

    /// The type of the stored values (for lists: the type of the entries).
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Column::Scalar(values) => values.ty(),
            Column::List(lists) => lists.values.ty(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Scalar(values) => values.len(),
            Column::List(lists) => lists.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dynamically typed entry of `row`.
    pub fn get(&self, row: usize) -> Option<Property> {
        match self {
            Column::Scalar(values) => values.get(row).map(Property::Scalar),
            Column::List(lists) => {
                let range = lists.row_range(row)?;
                let list = range.filter_map(|i| lists.values.get(i)).collect();
                Some(Property::List(list))
            }
        }
    }
}


/// One dynamically typed property entry of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Scalar(Value),
    List(SmallVec<[Value; 4]>),
}

impl fmt::Display for Property {
    /// Scalars are printed as is, lists as `(a, b, c)`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Property::Scalar(v) => v.fmt(f),
            Property::List(list) => {
                write!(f, "(")?;
                for (i, v) in list.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    v.fmt(f)?;
                }
                write!(f, ")")
            }
        }
    }
}


/// A decoded element group: its definition plus one column per property.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    def: ElementDef,
    columns: Vec<Column>,
}

impl Element {
    pub(crate) fn new(def: ElementDef, columns: Vec<Column>) -> Self {
        debug_assert_eq!(def.property_defs.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == def.count));

        Self { def, columns }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Number of elements in this group.
    pub fn count(&self) -> usize {
        self.def.count
    }

    pub fn def(&self) -> &ElementDef {
        &self.def
    }

    pub fn property_defs(&self) -> &[PropertyDef] {
        &self.def.property_defs
    }

    /// Names of all properties in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.def.property_defs.iter().map(|p| p.name.as_str())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.def.prop_pos(name).is_some()
    }

    fn prop_pos(&self, name: &str) -> Result<usize, Error> {
        self.def.prop_pos(name).ok_or_else(|| Error::UnknownProperty {
            element: self.def.name.clone(),
            property: name.to_string(),
        })
    }

    pub fn property_def(&self, name: &str) -> Result<&PropertyDef, Error> {
        self.prop_pos(name).map(|pos| &self.def.property_defs[pos])
    }

    pub fn column(&self, name: &str) -> Result<&Column, Error> {
        self.prop_pos(name).map(|pos| &self.columns[pos])
    }

    /// All columns in the order of `property_defs()`.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn mismatch(&self, name: &str, expected: PropertyKind) -> Error {
        Error::TypeMismatch {
            element: self.def.name.clone(),
            property: name.to_string(),
            expected,
        }
    }

    /// Returns all values of the scalar property `name` converted to `T`.
    ///
    /// Fails with a lookup error if there is no such property and with a type
    /// mismatch error if it's a list property.
    pub fn property<T: Scalar>(&self, name: &str) -> Result<Vec<T>, Error> {
        match self.column(name)? {
            Column::Scalar(values) => Ok(values.to_vec()),
            Column::List(_) => Err(self.mismatch(name, PropertyKind::Scalar)),
        }
    }

    /// Returns all lists of the list property `name` with entries converted
    /// to `T`.
    ///
    /// Fails with a lookup error if there is no such property and with a type
    /// mismatch error if it's a scalar property.
    pub fn list_property<T: Scalar>(&self, name: &str) -> Result<Vec<Vec<T>>, Error> {
        match self.column(name)? {
            Column::List(lists) => Ok(lists.to_vecs()),
            Column::Scalar(_) => Err(self.mismatch(name, PropertyKind::List)),
        }
    }

    /// Returns the entry of property `name` in element `row`, or `None` if
    /// `row` is out of bounds.
    pub fn get(&self, row: usize, name: &str) -> Result<Option<Property>, Error> {
        self.column(name).map(|c| c.get(row))
    }
}
