//! # Common Types and Traits

use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::ops::{AddAssign, SubAssign};
use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a symbol id.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A type that can be used as an occurrence count.
pub trait CountType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + AddAssign
    + SubAssign
{
}

impl<T> CountType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
        + AddAssign
        + SubAssign
{
}

/// A type that can be used as a pretoken key.
pub trait StringChunkType:
    for<'a> From<&'a str> + AsRef<str> + Debug + Clone + Send + Sync + Eq + Hash + Ord
{
}

impl<T> StringChunkType for T where
    T: for<'a> From<&'a str> + AsRef<str> + Debug + Clone + Send + Sync + Eq + Hash + Ord
{
}

/// An ordered adjacency of two symbols.
pub type Pair<T> = (T, T);

/// The size of the u8 space; the number of reserved single-byte ids.
pub const U8_SIZE: usize = u8::MAX as usize + 1;

/// Type alias for hash maps in this crate.
pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

/// Type alias for hash sets in this crate.
pub type CommonHashSet<V> = ahash::AHashSet<V>;
