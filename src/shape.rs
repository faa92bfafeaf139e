//! Shape descriptors: fixed-size inline storage with compile-time dimensions.
//!
//! A shape is a `#[repr(transparent)]` wrapper around `[T; LEN]` whose
//! dimensions are associated constants. Shapes are declared with
//! [`shape_2d!`](crate::shape_2d) and [`shape_3d!`](crate::shape_3d), and are
//! normally only named as the type parameter of an
//! [`Array2D`](crate::Array2D) or [`Array3D`](crate::Array3D).

use bytemuck::Pod;

use crate::Element;

/// Contiguous block of exactly `LEN` elements stored inline.
///
/// Implementations must be `#[repr(transparent)]` over `[Self::Element; LEN]`;
/// the declaration macros guarantee it.
pub trait InlineStorage: Pod {
    type Element: Element;

    const LEN: usize;

    fn as_slice(&self) -> &[Self::Element];

    fn as_mut_slice(&mut self) -> &mut [Self::Element];
}

/// Storage for an `X_SIZE` by `Y_SIZE` grid.
pub trait Shape2D: InlineStorage {
    const X_SIZE: usize;
    const Y_SIZE: usize;
}

/// Storage for an `X_SIZE` by `Y_SIZE` by `Z_SIZE` grid.
pub trait Shape3D: InlineStorage {
    const X_SIZE: usize;
    const Y_SIZE: usize;
    const Z_SIZE: usize;
}

#[doc(hidden)]
#[macro_export]
macro_rules! __inline_storage {
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $elem:ty = [$len:expr]) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[repr(transparent)]
        $vis struct $name([$elem; $len]);

        // SAFETY: transparent over an array of a `Pod` element, which the
        // `InlineStorage` bound below enforces.
        unsafe impl $crate::bytemuck::Zeroable for $name {}
        unsafe impl $crate::bytemuck::Pod for $name {}

        impl $crate::InlineStorage for $name {
            type Element = $elem;

            const LEN: usize = $len;

            #[inline]
            fn as_slice(&self) -> &[$elem] {
                &self.0
            }

            #[inline]
            fn as_mut_slice(&mut self) -> &mut [$elem] {
                &mut self.0
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis struct $name:ident <$t:ident> = [$len:expr]) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[repr(transparent)]
        $vis struct $name<$t>([$t; $len]);

        // SAFETY: transparent over `[T; LEN]`.
        unsafe impl<$t: $crate::bytemuck::Zeroable> $crate::bytemuck::Zeroable for $name<$t> {}
        unsafe impl<$t: $crate::bytemuck::Pod> $crate::bytemuck::Pod for $name<$t> {}

        impl<$t: $crate::Element> $crate::InlineStorage for $name<$t> {
            type Element = $t;

            const LEN: usize = $len;

            #[inline]
            fn as_slice(&self) -> &[$t] {
                &self.0
            }

            #[inline]
            fn as_mut_slice(&mut self) -> &mut [$t] {
                &mut self.0
            }
        }
    };
}

/// Declares a 2D shape descriptor.
///
/// Either bound to one element type, or generic over any [`Element`]:
///
/// ```
/// use inline_ndarray::shape_2d;
///
/// shape_2d! {
///     /// 10 by 20 grid of `i32`.
///     pub struct Int10x20: i32 = [10, 20];
/// }
///
/// shape_2d! {
///     pub struct Array50x50<T> = [50, 50];
/// }
///
/// use inline_ndarray::{InlineStorage, Shape2D};
/// assert_eq!(Int10x20::LEN, 200);
/// assert_eq!(<Array50x50<u16> as Shape2D>::Y_SIZE, 50);
/// ```
#[macro_export]
macro_rules! shape_2d {
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $elem:ty = [$x:expr, $y:expr] $(;)?) => {
        $crate::__inline_storage! {
            $(#[$meta])* $vis struct $name : $elem = [($x) * ($y)]
        }

        impl $crate::Shape2D for $name {
            const X_SIZE: usize = $x;
            const Y_SIZE: usize = $y;
        }
    };
    ($(#[$meta:meta])* $vis:vis struct $name:ident <$t:ident> = [$x:expr, $y:expr] $(;)?) => {
        $crate::__inline_storage! {
            $(#[$meta])* $vis struct $name<$t> = [($x) * ($y)]
        }

        impl<$t: $crate::Element> $crate::Shape2D for $name<$t> {
            const X_SIZE: usize = $x;
            const Y_SIZE: usize = $y;
        }
    };
}

/// Declares a 3D shape descriptor. Same forms as [`shape_2d!`](crate::shape_2d).
///
/// ```
/// use inline_ndarray::{shape_3d, InlineStorage, Shape3D};
///
/// shape_3d! {
///     pub struct Array10x10x10<T> = [10, 10, 10];
/// }
///
/// assert_eq!(<Array10x10x10<u16> as InlineStorage>::LEN, 1000);
/// assert_eq!(<Array10x10x10<u16> as Shape3D>::Z_SIZE, 10);
/// ```
#[macro_export]
macro_rules! shape_3d {
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $elem:ty = [$x:expr, $y:expr, $z:expr] $(;)?) => {
        $crate::__inline_storage! {
            $(#[$meta])* $vis struct $name : $elem = [($x) * ($y) * ($z)]
        }

        impl $crate::Shape3D for $name {
            const X_SIZE: usize = $x;
            const Y_SIZE: usize = $y;
            const Z_SIZE: usize = $z;
        }
    };
    ($(#[$meta:meta])* $vis:vis struct $name:ident <$t:ident> = [$x:expr, $y:expr, $z:expr] $(;)?) => {
        $crate::__inline_storage! {
            $(#[$meta])* $vis struct $name<$t> = [($x) * ($y) * ($z)]
        }

        impl<$t: $crate::Element> $crate::Shape3D for $name<$t> {
            const X_SIZE: usize = $x;
            const Y_SIZE: usize = $y;
            const Z_SIZE: usize = $z;
        }
    };
}
