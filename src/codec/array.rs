//! Fixed-size array codec: [`Grid`] and `[T; N]`.
//!
//! The header carries the element type and every dimension size. Elements
//! follow in row-major order (last dimension fastest), each named by its
//! multi-index, e.g. `"1,2"`.

use std::borrow::Cow;
use std::ops::{Index, IndexMut};

use super::{expect_header, Decode, Encode, WireType};
use crate::format::{self, scan, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::util::{index_label, Dimensions, Error, Result};

/// A multi-dimensional array stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    dims: Dimensions,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Build from a shape and row-major data.
    pub fn new(dims: impl Into<Dimensions>, data: Vec<T>) -> Result<Self> {
        let dims = dims.into();
        if dims.is_scalar() {
            return Err(Error::ShapeMismatch {
                expected: "at least one dimension".into(),
                actual: "scalar".into(),
            });
        }
        let count = element_count(&dims)?;
        if count != data.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} elements for {}", count, dims),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { dims, data })
    }

    /// Build a grid with every element set to `value`.
    pub fn filled(dims: impl Into<Dimensions>, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let dims = dims.into();
        let data = vec![value; element_count(&dims)?];
        Self::new(dims, data)
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// Elements in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at a multi-index, or None when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.in_bounds(index)
            .then(|| self.data.get(self.dims.flat_index(index)))
            .flatten()
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        if !self.in_bounds(index) {
            return None;
        }
        let flat = self.dims.flat_index(index);
        self.data.get_mut(flat)
    }

    fn in_bounds(&self, index: &[usize]) -> bool {
        index.len() == self.dims.rank()
            && index.iter().zip(self.dims.sizes()).all(|(i, size)| i < size)
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            dims: Dimensions::d1(0),
            data: Vec::new(),
        }
    }
}

impl<T> Index<&[usize]> for Grid<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        assert!(self.in_bounds(index), "index {:?} out of bounds for {}", index, self.dims);
        &self.data[self.dims.flat_index(index)]
    }
}

impl<T> IndexMut<&[usize]> for Grid<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        assert!(self.in_bounds(index), "index {:?} out of bounds for {}", index, self.dims);
        let flat = self.dims.flat_index(index);
        &mut self.data[flat]
    }
}

/// Element count of a shape, failing when the product overflows.
fn element_count(dims: &Dimensions) -> Result<usize> {
    dims.num_points().ok_or_else(|| Error::ShapeMismatch {
        expected: "an addressable element count".into(),
        actual: format!("{} overflows", dims),
    })
}

/// Write an array header and its elements in row-major order.
fn encode_elements<T: Encode + WireType>(
    name_hash: i32,
    dims: &Dimensions,
    data: &[T],
    enc: &mut Encoder<'_>,
) -> Result<()> {
    let wire = dims.to_wire()?;
    let count = element_count(dims)?;
    let element = T::wire_type();
    let frame = enc
        .stream()
        .begin(Kind::ArrayStart, name_hash, &[element.as_ref()], Some(&wire[..]))?;

    if let Some(mut index) = dims.first_index() {
        loop {
            let label = index_label(&index);
            let value = data
                .get(dims.flat_index(&index))
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: format!("{} elements for {}", count, dims),
                    actual: format!("{} elements", data.len()),
                })?;
            if value.is_null() {
                return Err(Error::other(format!("array<{}> holds a null element at [{}]", element, label)));
            }
            enc.value(format::name_hash(&label), value)?;
            if !dims.advance(&mut index) {
                break;
            }
        }
    }
    enc.stream().finish(frame)
}

/// Read an array header and place its elements in row-major order.
fn decode_elements<T: Decode + WireType>(item: &Item, dec: &mut Decoder<'_>) -> Result<(Dimensions, Vec<T>)> {
    let header = expect_header(item, dec.bytes(), Kind::ArrayStart)?;
    dec.registry()
        .check_assignable(header.type_name(), &T::wire_type())?;

    let dims = header.dims;
    if dims.is_scalar() {
        return Err(Error::ShapeMismatch {
            expected: "at least one dimension".into(),
            actual: "scalar".into(),
        });
    }
    let count = element_count(&dims)?;
    let items = scan(dec.bytes(), header.body)?;
    if items.len() != count {
        return Err(Error::ShapeMismatch {
            expected: format!("{} elements for {}", count, dims),
            actual: format!("{} elements", items.len()),
        });
    }

    let mut data = Vec::with_capacity(items.len());
    if let Some(mut index) = dims.first_index() {
        for element in &items {
            if element.name_hash != format::name_hash(&index_label(&index)) {
                return Err(Error::malformed(format!(
                    "array element at offset {} is out of order, expected [{}]",
                    element.start,
                    index_label(&index)
                )));
            }
            data.push(dec.decode(element)?);
            dims.advance(&mut index);
        }
    }
    Ok((dims, data))
}

impl<T: WireType> WireType for Grid<T> {
    fn wire_type() -> Cow<'static, str> {
        Cow::Owned(format!("array<{}>", T::wire_type()))
    }

    fn wire_kind() -> Kind {
        Kind::ArrayStart
    }
}

impl<T: Encode + WireType> Encode for Grid<T> {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_elements(name_hash, &self.dims, &self.data, enc)
    }
}

impl<T: Decode + WireType> Decode for Grid<T> {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        let (dims, data) = decode_elements(item, dec)?;
        Ok(Self { dims, data })
    }
}

impl<T: WireType, const N: usize> WireType for [T; N] {
    fn wire_type() -> Cow<'static, str> {
        Cow::Owned(format!("array<{}>", T::wire_type()))
    }

    fn wire_kind() -> Kind {
        Kind::ArrayStart
    }
}

impl<T: Encode + WireType, const N: usize> Encode for [T; N] {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_elements(name_hash, &Dimensions::d1(N), self, enc)
    }
}

impl<T: Decode + WireType, const N: usize> Decode for [T; N] {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        let (dims, data) = decode_elements::<T>(item, dec)?;
        if dims.sizes() != [N] {
            return Err(Error::ShapeMismatch {
                expected: Dimensions::d1(N).to_string(),
                actual: dims.to_string(),
            });
        }
        data.try_into()
            .map_err(|_| Error::mismatch(format!("{} elements", N), "a different count"))
    }
}
