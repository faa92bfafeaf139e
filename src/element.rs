use bytemuck::Pod;

/// Plain-old-data value that can live in inline array storage.
///
/// Any `bytemuck::Pod` type qualifies: it is `Copy`, has no padding and no
/// indirection, and every bit pattern is a valid value, so the storage can be
/// viewed as raw bytes and filled from raw bytes.
pub trait Element: Pod {}

impl<T: Pod> Element for T {}
