//! Multi-dimensional array shapes.
//!
//! A [`Dimensions`] value describes the shape of a fixed-size array field and
//! owns the element visiting order shared by the array encoder and decoder.

use smallvec::SmallVec;

use super::{Error, Result};

/// Largest rank and per-dimension size the array header can carry.
pub const MAX_WIRE_DIM: usize = u8::MAX as usize;

/// Shape of a multi-dimensional array.
///
/// Elements are stored row-major: the last dimension varies fastest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Size of each dimension. Empty means scalar (rank 0).
    dims: SmallVec<[usize; 4]>,
}

impl Dimensions {
    /// Create scalar dimensions (rank 0).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Create 1D dimensions.
    pub fn d1(size: usize) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Create 2D dimensions (rows, columns).
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of a specific dimension, or None when out of range.
    pub fn size(&self, dim: usize) -> Option<usize> {
        self.dims.get(dim).copied()
    }

    /// All dimension sizes.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements (product of all dimensions), or None when
    /// the product overflows `usize`.
    pub fn num_points(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &size| acc.checked_mul(size))
    }

    /// Check if this represents a scalar (rank 0).
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Add a new dimension at the end.
    pub fn push(&mut self, size: usize) {
        self.dims.push(size);
    }

    /// First multi-index in visiting order, or None for an empty shape.
    pub fn first_index(&self) -> Option<SmallVec<[usize; 4]>> {
        if self.dims.contains(&0) {
            return None;
        }
        Some(smallvec::smallvec![0; self.rank()])
    }

    /// Step `index` to the next element in row-major order.
    ///
    /// The last dimension increments first and carries into earlier ones on
    /// overflow. Returns false once every element has been visited.
    pub fn advance(&self, index: &mut [usize]) -> bool {
        debug_assert_eq!(index.len(), self.dims.len());
        for dim in (0..self.dims.len()).rev() {
            index[dim] += 1;
            if index[dim] < self.dims[dim] {
                return true;
            }
            index[dim] = 0;
        }
        false
    }

    /// Flat row-major offset of a multi-index.
    pub fn flat_index(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(self.dims.iter())
            .fold(0, |acc, (i, size)| acc * size + i)
    }

    /// Header form: rank and sizes as bytes, failing when either overflows.
    pub fn to_wire(&self) -> Result<SmallVec<[u8; 4]>> {
        if self.dims.len() > MAX_WIRE_DIM {
            return Err(Error::DimensionOverflow {
                dim: self.dims.len(),
                size: self.dims.len(),
            });
        }
        self.dims
            .iter()
            .enumerate()
            .map(|(dim, &size)| {
                u8::try_from(size).map_err(|_| Error::DimensionOverflow { dim, size })
            })
            .collect()
    }

    /// Rebuild dimensions from header bytes.
    pub fn from_wire(sizes: &[u8]) -> Self {
        Self {
            dims: sizes.iter().map(|&s| s as usize).collect(),
        }
    }
}

/// Render a multi-index as `"i,j,k"`, the name hashed for array elements.
pub fn index_label(index: &[usize]) -> String {
    let mut label = String::new();
    for (i, v) in index.iter().enumerate() {
        if i > 0 {
            label.push(',');
        }
        label.push_str(&v.to_string());
    }
    label
}

impl From<usize> for Dimensions {
    fn from(size: usize) -> Self {
        Self::d1(size)
    }
}

impl From<(usize, usize)> for Dimensions {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::d2(rows, cols)
    }
}

impl From<Vec<usize>> for Dimensions {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}
