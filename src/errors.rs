use std::fmt;

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Axis an index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    /// Linear offset into a flat view.
    Flat,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Flat => "flat",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    #[error("{axis} index {index} out of range for axis of size {size}")]
    OutOfRange { axis: Axis, index: i128, size: usize },
    #[error("expected {expected} bytes, got {actual}")]
    ByteLength { expected: usize, actual: usize },
}

impl IndexerError {
    pub fn axis(&self) -> Option<Axis> {
        match self {
            IndexerError::OutOfRange { axis, .. } => Some(*axis),
            IndexerError::ByteLength { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Axis::X, -1, 10, "x index -1 out of range for axis of size 10")]
    #[case(Axis::Z, 10, 10, "z index 10 out of range for axis of size 10")]
    #[case(Axis::Flat, 200, 200, "flat index 200 out of range for axis of size 200")]
    fn out_of_range_message(
        #[case] axis: Axis,
        #[case] index: i128,
        #[case] size: usize,
        #[case] expected: &str,
    ) {
        let err = IndexerError::OutOfRange { axis, index, size };
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.axis(), Some(axis));
    }

    #[rstest]
    fn byte_length_has_no_axis() {
        let err = IndexerError::ByteLength {
            expected: 800,
            actual: 4,
        };
        assert_eq!(err.axis(), None);
        assert_eq!(err.to_string(), "expected 800 bytes, got 4");
    }
}
