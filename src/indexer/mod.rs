mod array2d;
mod array3d;
mod persist;

pub use array2d::Array2D;
pub use array3d::Array3D;

use log::debug;
use num_traits::PrimInt;

use crate::errors::{Axis, IndexerError, Result};

/// Validates one coordinate against its axis size.
///
/// Negative or oversized indexes of any primitive integer type are rejected.
/// Only integer types are accepted, so fractional coordinates cannot be truncated.
pub(crate) fn check_axis<I: PrimInt>(axis: Axis, index: I, size: usize) -> Result<usize> {
    match index.to_usize() {
        Some(index) if index < size => Ok(index),
        _ => {
            let index = index.to_i128().unwrap_or(i128::MAX);
            debug!("rejecting {axis} index {index} for axis of size {size}");
            Err(IndexerError::OutOfRange { axis, index, size })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_any_primitive_integer() {
        assert_eq!(check_axis(Axis::X, 0i32, 10), Ok(0));
        assert_eq!(check_axis(Axis::X, 9u8, 10), Ok(9));
        assert_eq!(check_axis(Axis::X, 9usize, 10), Ok(9));
        assert!(check_axis(Axis::X, -1i64, 10).is_err());
        assert!(check_axis(Axis::X, 10i16, 10).is_err());
        assert!(check_axis(Axis::X, i128::MIN, 10).is_err());
    }

    #[test_log::test]
    fn reports_signed_index() {
        assert_eq!(
            check_axis(Axis::Z, -1, 10),
            Err(IndexerError::OutOfRange {
                axis: Axis::Z,
                index: -1,
                size: 10
            })
        );
    }

    #[rstest]
    fn oversized_unsigned_index_is_clamped_in_report() {
        let err = check_axis(Axis::X, u128::MAX, 4).unwrap_err();
        assert_eq!(
            err,
            IndexerError::OutOfRange {
                axis: Axis::X,
                index: i128::MAX,
                size: 4
            }
        );
    }
}
