//! Bounds-checked multidimensional views over fixed-size inline storage.
//!
//! A shape descriptor, declared with [`shape_2d!`] or [`shape_3d!`], is a
//! plain array of `X * Y (* Z)` elements whose dimensions are associated
//! constants. [`Array2D`] and [`Array3D`] wrap a shape and translate
//! coordinates to linear offsets, row-major with X fastest, then Y, then Z.
//! Neither adds any bytes: an `Array2D<T, S>` is exactly
//! `X_SIZE * Y_SIZE * size_of::<T>()` bytes, so it can be embedded in other
//! structs without allocation and its byte image is the flat element array.
//!
//! ```
//! use inline_ndarray::{shape_2d, Array2D};
//!
//! shape_2d! {
//!     pub struct Int10x20: i32 = [10, 20];
//! }
//!
//! let mut grid = Array2D::<i32, Int10x20>::zeroed();
//! grid.set(1, 1, 12345)?;
//! assert_eq!(grid.get_index(1, 1), 11);
//! assert_eq!(grid.as_flat_view()[11], 12345);
//! assert!(grid.get(10, 0).is_err());
//! # Ok::<(), inline_ndarray::IndexerError>(())
//! ```

mod element;
mod errors;
mod flat;
mod indexer;
mod shape;

pub use bytemuck;

pub use element::Element;
pub use errors::{Axis, IndexerError, Result};
pub use flat::{FlatView, FlatViewMut};
pub use indexer::{Array2D, Array3D};
pub use shape::{InlineStorage, Shape2D, Shape3D};
