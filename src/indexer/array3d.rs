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
    Element, Shape3D,
};

/// Bounds-checked 3D view over inline storage of shape `S`.
///
/// X varies fastest, then Y, then Z: element `(x, y, z)` lives at offset
/// `z * X_SIZE * Y_SIZE + y * X_SIZE + x`.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Array3D<T, S> {
    array: S,
    _t: PhantomData<T>,
}

// SAFETY: transparent over `S`; `PhantomData` is zero sized.
unsafe impl<T: Pod, S: Pod> Zeroable for Array3D<T, S> {}
unsafe impl<T: Pod, S: Pod> Pod for Array3D<T, S> {}

impl<T: Element, S: Shape3D<Element = T>> Array3D<T, S> {
    pub const X_SIZE: usize = S::X_SIZE;
    pub const Y_SIZE: usize = S::Y_SIZE;
    pub const Z_SIZE: usize = S::Z_SIZE;
    pub const LEN: usize = S::LEN;

    const PLANE: usize = S::X_SIZE * S::Y_SIZE;

    const LAYOUT: () = {
        assert!(
            S::LEN == S::X_SIZE * S::Y_SIZE * S::Z_SIZE,
            "storage length must be X_SIZE * Y_SIZE * Z_SIZE"
        );
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

    pub fn from_fn(mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut array = Self::zeroed();
        for ((x, y, z), slot) in Self::coords().zip(array.as_mut_slice()) {
            *slot = f(x, y, z);
        }
        array
    }

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

    pub fn z_size(&self) -> usize {
        S::Z_SIZE
    }

    pub fn len(&self) -> usize {
        S::LEN
    }

    pub fn is_empty(&self) -> bool {
        S::LEN == 0
    }

    /// Linear offset of `(x, y, z)`. Does not check bounds.
    #[inline]
    pub fn get_index(&self, x: usize, y: usize, z: usize) -> usize {
        z * Self::PLANE + y * S::X_SIZE + x
    }

    /// Linear offset of `(x, y, z)`, checking x, then y, then z.
    #[inline]
    pub fn checked_index(
        &self,
        x: impl PrimInt,
        y: impl PrimInt,
        z: impl PrimInt,
    ) -> Result<usize> {
        let x = check_axis(Axis::X, x, S::X_SIZE)?;
        let y = check_axis(Axis::Y, y, S::Y_SIZE)?;
        let z = check_axis(Axis::Z, z, S::Z_SIZE)?;
        Ok(self.get_index(x, y, z))
    }

    /// Reads `(x, y, z)`. Integer coordinates only:
    ///
    /// ```compile_fail
    /// use inline_ndarray::{shape_3d, Array3D};
    ///
    /// shape_3d! {
    ///     struct Bytes2x2x2: u8 = [2, 2, 2];
    /// }
    ///
    /// let cube = Array3D::<u8, Bytes2x2x2>::zeroed();
    /// let _ = cube.get(0, 1.7f32, 0);
    /// ```
    #[inline]
    pub fn get(&self, x: impl PrimInt, y: impl PrimInt, z: impl PrimInt) -> Result<T> {
        self.get_ref(x, y, z).copied()
    }

    #[inline]
    pub fn set(
        &mut self,
        x: impl PrimInt,
        y: impl PrimInt,
        z: impl PrimInt,
        value: T,
    ) -> Result<()> {
        *self.get_mut(x, y, z)? = value;
        Ok(())
    }

    #[inline]
    pub fn get_ref(
        &self,
        x: impl PrimInt,
        y: impl PrimInt,
        z: impl PrimInt,
    ) -> Result<&T> {
        let offset = self.checked_index(x, y, z)?;
        Ok(&self.as_slice()[offset])
    }

    #[inline]
    pub fn get_mut(
        &mut self,
        x: impl PrimInt,
        y: impl PrimInt,
        z: impl PrimInt,
    ) -> Result<&mut T> {
        let offset = self.checked_index(x, y, z)?;
        Ok(&mut self.as_mut_slice()[offset])
    }

    /// Contiguous run of `X_SIZE` elements at `(y, z)`.
    pub fn row(&self, y: impl PrimInt, z: impl PrimInt) -> Result<&[T]> {
        let y = check_axis(Axis::Y, y, S::Y_SIZE)?;
        let z = check_axis(Axis::Z, z, S::Z_SIZE)?;
        let start = self.get_index(0, y, z);
        Ok(&self.as_slice()[start..start + S::X_SIZE])
    }

    /// Contiguous XY plane at depth `z`, itself laid out X fastest.
    pub fn plane(&self, z: impl PrimInt) -> Result<&[T]> {
        let start = self.get_index(0, 0, check_axis(Axis::Z, z, S::Z_SIZE)?);
        Ok(&self.as_slice()[start..start + Self::PLANE])
    }

    pub fn plane_mut(&mut self, z: impl PrimInt) -> Result<&mut [T]> {
        let start = self.get_index(0, 0, check_axis(Axis::Z, z, S::Z_SIZE)?);
        Ok(&mut self.as_mut_slice()[start..start + Self::PLANE])
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.array.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.array.as_mut_slice()
    }

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

    pub fn coords() -> impl Iterator<Item = (usize, usize, usize)> {
        iproduct!(0..S::Z_SIZE, 0..S::Y_SIZE, 0..S::X_SIZE).map(|(z, y, x)| (x, y, z))
    }

    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> + '_ {
        Self::coords().zip(self.as_slice())
    }
}

impl<T: Element, S: Shape3D<Element = T>> Default for Array3D<T, S> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Element, S: Shape3D<Element = T>> Debug for Array3D<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array3D")
            .field("element", &std::any::type_name::<T>())
            .field("x_size", &S::X_SIZE)
            .field("y_size", &S::Y_SIZE)
            .field("z_size", &S::Z_SIZE)
            .finish()
    }
}

impl<T: Element + PartialEq, S: Shape3D<Element = T>> PartialEq for Array3D<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + Eq, S: Shape3D<Element = T>> Eq for Array3D<T, S> {}

impl<T: Element, S: Shape3D<Element = T>> Index<(usize, usize, usize)> for Array3D<T, S> {
    type Output = T;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        match self.get_ref(x, y, z) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element, S: Shape3D<Element = T>> IndexMut<(usize, usize, usize)> for Array3D<T, S> {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut T {
        match self.get_mut(x, y, z) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element + Serialize, S: Shape3D<Element = T>> Serialize for Array3D<T, S> {
    fn serialize<Ser: Serializer>(
        &self,
        serializer: Ser,
    ) -> std::result::Result<Ser::Ok, Ser::Error> {
        persist::serialize_storage(&self.array, serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for Array3D<T, S>
where
    T: Element + Deserialize<'de>,
    S: Shape3D<Element = T>,
{
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        persist::deserialize_storage(deserializer).map(Self::from_storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::IndexerError, shape_3d};
    use ndarray::ArrayView3;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    shape_3d! {
        struct Array10x10x10<T> = [10, 10, 10];
    }

    shape_3d! {
        struct Floats4x3x2: f32 = [4, 3, 2];
    }

    type Shorts = Array3D<u16, Array10x10x10<u16>>;

    #[fixture]
    fn shorts() -> Shorts {
        let mut shorts = Shorts::zeroed();
        shorts
            .as_flat_view_mut()
            .randomize(&mut StdRng::seed_from_u64(0x5eed));
        shorts
    }

    #[rstest]
    fn size_is_exactly_the_storage() {
        assert_eq!(size_of::<Shorts>(), 10 * 10 * 10 * size_of::<u16>());
        assert_eq!(size_of::<Array3D<f32, Floats4x3x2>>(), 4 * 3 * 2 * 4);
        assert_eq!(size_of::<Array3D<u64, Array10x10x10<u64>>>(), 8000);
    }

    #[rstest]
    fn dimensions(shorts: Shorts) {
        assert_eq!(shorts.x_size() * shorts.y_size() * shorts.z_size(), 1000);
        assert_eq!(shorts.as_flat_view().len(), 1000);
        assert_eq!(Shorts::Z_SIZE, 10);
    }

    #[rstest]
    fn index_formula(shorts: Shorts) {
        assert_eq!(shorts.get_index(2, 3, 4), 4 * 100 + 3 * 10 + 2);
        assert_eq!(shorts.get_index(2, 3, 4), 432);
        for (x, y, z) in Shorts::coords() {
            assert_eq!(shorts.get_index(x, y, z), z * 100 + y * 10 + x);
        }
    }

    #[rstest]
    fn first_and_last_elements(shorts: Shorts) {
        let flat = shorts.as_flat_view();
        assert_eq!(shorts.get(0, 0, 0), Ok(flat[0]));
        assert_eq!(shorts.get(9, 9, 9), Ok(flat[999]));
        assert_eq!(shorts.get(9, 9, 9), Ok(flat[shorts.get_index(9, 9, 9)]));
        assert_eq!(flat.last(), Some(&shorts[(9, 9, 9)]));
    }

    #[rstest]
    fn read_write_round_trip() {
        let mut shorts = Shorts::zeroed();
        shorts.set(2, 3, 4, 2).unwrap();
        assert_eq!(shorts.get(2, 3, 4), Ok(2));
        assert_eq!(shorts.as_flat_view().at(432), Ok(2));

        shorts.as_flat_view_mut().set(999, 77).unwrap();
        assert_eq!(shorts[(9, 9, 9)], 77);
    }

    #[rstest]
    #[case((-1, 0, 0), Axis::X, -1)]
    #[case((10, 0, 0), Axis::X, 10)]
    #[case((0, -1, 0), Axis::Y, -1)]
    #[case((0, 10, 0), Axis::Y, 10)]
    #[case((0, 0, -1), Axis::Z, -1)]
    #[case((0, 0, 10), Axis::Z, 10)]
    #[case((10, 10, 10), Axis::X, 10)]
    #[case((0, 10, -1), Axis::Y, 10)]
    fn bounds_checked_x_then_y_then_z(
        shorts: Shorts,
        #[case] coord: (i32, i32, i32),
        #[case] axis: Axis,
        #[case] index: i128,
    ) {
        let (x, y, z) = coord;
        let expected = IndexerError::OutOfRange {
            axis,
            index,
            size: 10,
        };
        assert_eq!(shorts.get(x, y, z), Err(expected.clone()));
        let mut copy = shorts;
        assert_eq!(copy.set(x, y, z, 1), Err(expected));
        assert_eq!(copy, shorts);
    }

    #[rstest]
    #[should_panic(expected = "z index 10 out of range")]
    fn index_operator_panics(shorts: Shorts) {
        let mut shorts = shorts;
        shorts[(0, 0, 10)] = 1;
    }

    #[rstest]
    fn bulk_fill(shorts: Shorts) {
        let mut shorts = shorts;
        shorts.as_flat_view_mut().fill(0xbeef);
        assert!(Shorts::coords().all(|(x, y, z)| shorts.get(x, y, z) == Ok(0xbeef)));
    }

    #[rstest]
    fn planes_and_rows_are_contiguous() {
        let floats = Array3D::<f32, Floats4x3x2>::from_fn(|x, y, z| (z * 100 + y * 10 + x) as f32);
        assert_eq!(floats.plane(1).unwrap().len(), 12);
        assert_eq!(floats.plane(1).unwrap()[0], 100.0);
        assert_eq!(floats.row(2, 1).unwrap(), &[120.0, 121.0, 122.0, 123.0]);
        assert_eq!(
            floats.row(3, 0),
            Err(IndexerError::OutOfRange {
                axis: Axis::Y,
                index: 3,
                size: 3
            })
        );
        assert!(floats.plane(2).is_err());

        let mut floats = floats;
        floats.plane_mut(0).unwrap().fill(-1.0);
        assert_eq!(floats.get(3, 2, 0), Ok(-1.0));
        assert_eq!(floats.get(0, 0, 1), Ok(100.0));
    }

    #[rstest]
    fn layout_matches_c_order_ndarray(shorts: Shorts) {
        let view = ArrayView3::from_shape((10, 10, 10), shorts.as_slice()).unwrap();
        for ((x, y, z), value) in shorts.indexed_iter() {
            assert_eq!(view[[z, y, x]], *value);
        }
    }

    #[rstest]
    fn byte_image_round_trip(shorts: Shorts) {
        let bytes = shorts.as_bytes().to_vec();
        assert_eq!(bytes.len(), 2000);
        assert_eq!(Shorts::from_bytes(&bytes), Ok(shorts));

        let mut restored = Shorts::zeroed();
        restored.as_flat_view_mut().copy_from_bytes(&bytes).unwrap();
        assert_eq!(restored, shorts);
        assert!(Shorts::from_bytes(&bytes[..1998]).is_err());
    }

    #[rstest]
    fn serde_round_trip(shorts: Shorts) {
        let json = serde_json::to_string(&shorts).unwrap();
        let back: Shorts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shorts);
    }
}
