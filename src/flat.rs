use log::trace;
use rand::RngCore;
use shrinkwraprs::Shrinkwrap;

use crate::{
    errors::{Axis, IndexerError, Result},
    Element,
};

/// Read-only linear view over the whole storage of an indexer view.
///
/// Dereferences to `[T]`; elements are in layout order (X fastest).
#[derive(Shrinkwrap, Debug, Clone, Copy)]
pub struct FlatView<'a, T>(&'a [T]);

/// Mutable linear view over the whole storage of an indexer view.
#[derive(Shrinkwrap, Debug)]
#[shrinkwrap(mutable, unsafe_ignore_visibility)]
pub struct FlatViewMut<'a, T>(&'a mut [T]);

fn check_offset(offset: usize, len: usize) -> Result<usize> {
    if offset < len {
        Ok(offset)
    } else {
        Err(IndexerError::OutOfRange {
            axis: Axis::Flat,
            index: offset as i128,
            size: len,
        })
    }
}

impl<'a, T: Element> FlatView<'a, T> {
    pub(crate) fn new(slice: &'a [T]) -> Self {
        Self(slice)
    }

    pub fn at(&self, offset: usize) -> Result<T> {
        check_offset(offset, self.0.len()).map(|offset| self.0[offset])
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.0)
    }

    pub fn into_slice(self) -> &'a [T] {
        self.0
    }
}

impl<'a, T: Element> FlatViewMut<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self(slice)
    }

    pub fn at(&self, offset: usize) -> Result<T> {
        check_offset(offset, self.0.len()).map(|offset| self.0[offset])
    }

    pub fn set(&mut self, offset: usize, value: T) -> Result<()> {
        let offset = check_offset(offset, self.0.len())?;
        self.0[offset] = value;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&*self.0)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut *self.0)
    }

    /// Overwrites the whole view with a raw byte image.
    ///
    /// `bytes` must be exactly as long as the view in bytes.
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let target = self.as_bytes_mut();
        if target.len() != bytes.len() {
            return Err(IndexerError::ByteLength {
                expected: target.len(),
                actual: bytes.len(),
            });
        }
        trace!("copying {} bytes into flat view", bytes.len());
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Fills every byte of the view with random data.
    pub fn randomize<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        let bytes = self.as_bytes_mut();
        trace!("randomizing {} bytes", bytes.len());
        rng.fill_bytes(bytes);
    }

    pub fn into_slice(self) -> &'a mut [T] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn data() -> [u16; 6] {
        [1, 2, 3, 4, 5, 6]
    }

    #[rstest]
    fn derefs_to_slice(data: [u16; 6]) {
        let view = FlatView::new(&data);
        assert_eq!(view.len(), 6);
        assert_eq!(view[5], 6);
        assert_eq!(view.iter().sum::<u16>(), 21);
        assert_eq!(&view[1..3], &[2, 3]);
    }

    #[rstest]
    #[case(0, Ok(1))]
    #[case(5, Ok(6))]
    #[case(6, Err(IndexerError::OutOfRange { axis: Axis::Flat, index: 6, size: 6 }))]
    #[case(usize::MAX, Err(IndexerError::OutOfRange { axis: Axis::Flat, index: usize::MAX as i128, size: 6 }))]
    fn checked_offsets(data: [u16; 6], #[case] offset: usize, #[case] expected: Result<u16>) {
        assert_eq!(FlatView::new(&data).at(offset), expected);
    }

    #[test_log::test]
    fn set_rejects_out_of_range_without_writing() {
        let mut data = [1u16, 2, 3, 4, 5, 6];
        let mut view = FlatViewMut::new(&mut data);
        assert!(view.set(6, 0).is_err());
        view.set(2, 30).unwrap();
        assert_eq!(data, [1, 2, 30, 4, 5, 6]);
    }

    #[rstest]
    fn fill_through_deref(data: [u16; 6]) {
        let mut data = data;
        let mut view = FlatViewMut::new(&mut data);
        view.fill(9);
        assert!(data.iter().all(|v| *v == 9));
    }

    #[test_log::test]
    fn copy_from_bytes_checks_length() {
        let mut data = [0u32; 2];
        let mut view = FlatViewMut::new(&mut data);
        assert_eq!(
            view.copy_from_bytes(&[0; 7]),
            Err(IndexerError::ByteLength {
                expected: 8,
                actual: 7
            })
        );

        let mut image = Vec::new();
        image.extend_from_slice(&11u32.to_ne_bytes());
        image.extend_from_slice(&22u32.to_ne_bytes());
        view.copy_from_bytes(&image).unwrap();
        assert_eq!(data, [11, 22]);
    }

    #[test_log::test]
    fn randomize_is_reproducible_with_seed() {
        let mut first = [0u64; 16];
        let mut second = [0u64; 16];
        FlatViewMut::new(&mut first).randomize(&mut StdRng::seed_from_u64(7));
        FlatViewMut::new(&mut second).randomize(&mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
        assert!(first.iter().any(|v| *v != 0));
    }

    #[rstest]
    fn bytes_follow_element_order(data: [u16; 6]) {
        let bytes = FlatView::new(&data).as_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes[2..4], 2u16.to_ne_bytes());
    }
}
