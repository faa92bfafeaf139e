use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    mem::size_of,
    ops::{Index, IndexMut},
};

use bytemuck::{Pod, Zeroable};
use itertools::iproduct;
use num_traits::PrimInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    errors::{Axis, Result},
    flat::{FlatView, FlatViewMut},
    indexer::{check_axis, persist},
    Element, Shape2D,
};

/// Bounds-checked 2D view over inline storage of shape `S`.
///
/// Row-major with X fastest: element `(x, y)` lives at offset
/// `y * X_SIZE + x`. The view is exactly as large as its storage, so it can be
/// embedded in `#[repr(C)]` structs and copied byte for byte.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Array2D<T, S> {
    array: S,
    _t: PhantomData<T>,
}

// SAFETY: transparent over `S`; `PhantomData` is zero sized.
unsafe impl<T: Pod, S: Pod> Zeroable for Array2D<T, S> {}
unsafe impl<T: Pod, S: Pod> Pod for Array2D<T, S> {}

impl<T: Element, S: Shape2D<Element = T>> Array2D<T, S> {
    pub const X_SIZE: usize = S::X_SIZE;
    pub const Y_SIZE: usize = S::Y_SIZE;
    pub const LEN: usize = S::LEN;

    const LAYOUT: () = {
        assert!(S::LEN == S::X_SIZE * S::Y_SIZE, "storage length must be X_SIZE * Y_SIZE");
        assert!(
            size_of::<S>() == S::LEN * size_of::<T>(),
            "storage must hold exactly LEN elements"
        );
    };

    pub fn from_storage(array: S) -> Self {
        let () = Self::LAYOUT;
        Self {
            array,
            _t: PhantomData,
        }
    }

    pub fn zeroed() -> Self {
        Self::from_storage(S::zeroed())
    }

    pub fn filled(value: T) -> Self {
        let mut array = Self::zeroed();
        array.as_mut_slice().fill(value);
        array
    }

    /// Builds an array by calling `f(x, y)` for every coordinate in layout order.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut array = Self::zeroed();
        for ((x, y), slot) in Self::coords().zip(array.as_mut_slice()) {
            *slot = f(x, y);
        }
        array
    }

    /// Reads an array from its raw byte image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        persist::read_storage(bytes).map(Self::from_storage)
    }

    pub fn storage(&self) -> &S {
        &self.array
    }

    pub fn into_storage(self) -> S {
        self.array
    }

    pub fn x_size(&self) -> usize {
        S::X_SIZE
    }

    pub fn y_size(&self) -> usize {
        S::Y_SIZE
    }

    pub fn len(&self) -> usize {
        S::LEN
    }

    pub fn is_empty(&self) -> bool {
        S::LEN == 0
    }

    /// Linear offset of `(x, y)`. Does not check bounds.
    #[inline]
    pub fn get_index(&self, x: usize, y: usize) -> usize {
        y * S::X_SIZE + x
    }

    /// Linear offset of `(x, y)`, checking x then y.
    #[inline]
    pub fn checked_index(&self, x: impl PrimInt, y: impl PrimInt) -> Result<usize> {
        let x = check_axis(Axis::X, x, S::X_SIZE)?;
        let y = check_axis(Axis::Y, y, S::Y_SIZE)?;
        Ok(self.get_index(x, y))
    }

    /// Reads `(x, y)`. Coordinates may be any primitive integer; negative
    /// values are out of range. Fractional coordinates do not compile:
    ///
    /// ```compile_fail
    /// use inline_ndarray::{shape_2d, Array2D};
    ///
    /// shape_2d! {
    ///     struct Int4x4: i32 = [4, 4];
    /// }
    ///
    /// let grid = Array2D::<i32, Int4x4>::zeroed();
    /// let _ = grid.get(-0.5f64, 0);
    /// ```
    #[inline]
    pub fn get(&self, x: impl PrimInt, y: impl PrimInt) -> Result<T> {
        self.get_ref(x, y).copied()
    }

    #[inline]
    pub fn set(&mut self, x: impl PrimInt, y: impl PrimInt, value: T) -> Result<()> {
        *self.get_mut(x, y)? = value;
        Ok(())
    }

    #[inline]
    pub fn get_ref(&self, x: impl PrimInt, y: impl PrimInt) -> Result<&T> {
        let offset = self.checked_index(x, y)?;
        Ok(&self.as_slice()[offset])
    }

    #[inline]
    pub fn get_mut(&mut self, x: impl PrimInt, y: impl PrimInt) -> Result<&mut T> {
        let offset = self.checked_index(x, y)?;
        Ok(&mut self.as_mut_slice()[offset])
    }

    /// Contiguous run of `X_SIZE` elements at row `y`.
    pub fn row(&self, y: impl PrimInt) -> Result<&[T]> {
        let start = self.get_index(0, check_axis(Axis::Y, y, S::Y_SIZE)?);
        Ok(&self.as_slice()[start..start + S::X_SIZE])
    }

    pub fn row_mut(&mut self, y: impl PrimInt) -> Result<&mut [T]> {
        let start = self.get_index(0, check_axis(Axis::Y, y, S::Y_SIZE)?);
        Ok(&mut self.as_mut_slice()[start..start + S::X_SIZE])
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.array.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.array.as_mut_slice()
    }

    /// The whole storage as one linear view, `flat[get_index(x, y)] == get(x, y)`.
    pub fn as_flat_view(&self) -> FlatView<'_, T> {
        FlatView::new(self.as_slice())
    }

    pub fn as_flat_view_mut(&mut self) -> FlatViewMut<'_, T> {
        FlatViewMut::new(self.as_mut_slice())
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }

    /// Every `(x, y)` in layout order.
    pub fn coords() -> impl Iterator<Item = (usize, usize)> {
        iproduct!(0..S::Y_SIZE, 0..S::X_SIZE).map(|(y, x)| (x, y))
    }

    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        Self::coords().zip(self.as_slice())
    }
}

impl<T: Element, S: Shape2D<Element = T>> Default for Array2D<T, S> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Element, S: Shape2D<Element = T>> Debug for Array2D<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array2D")
            .field("element", &std::any::type_name::<T>())
            .field("x_size", &S::X_SIZE)
            .field("y_size", &S::Y_SIZE)
            .finish()
    }
}

impl<T: Element + PartialEq, S: Shape2D<Element = T>> PartialEq for Array2D<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + Eq, S: Shape2D<Element = T>> Eq for Array2D<T, S> {}

impl<T: Element, S: Shape2D<Element = T>> Index<(usize, usize)> for Array2D<T, S> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        match self.get_ref(x, y) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element, S: Shape2D<Element = T>> IndexMut<(usize, usize)> for Array2D<T, S> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        match self.get_mut(x, y) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element + Serialize, S: Shape2D<Element = T>> Serialize for Array2D<T, S> {
    fn serialize<Ser: Serializer>(
        &self,
        serializer: Ser,
    ) -> std::result::Result<Ser::Ok, Ser::Error> {
        persist::serialize_storage(&self.array, serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for Array2D<T, S>
where
    T: Element + Deserialize<'de>,
    S: Shape2D<Element = T>,
{
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        persist::deserialize_storage(deserializer).map(Self::from_storage)
    }
}
