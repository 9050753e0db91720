//! The compile-time entities the generator macros resolve to.
//!
//! A sequence is the zero-sized type [`IntegerSequence<T, Vs>`] where `Vs`
//! is an inductive list of the values, carried entirely in the type's
//! identity. Two sequences with the same element type and values are the
//! same type.

use std::marker::PhantomData;

mod private {
    pub trait Sealed {}
}

/// Marker for the integer types a sequence can be generated over.
pub trait SequenceValue: private::Sealed + Copy {}

macro_rules! impl_sequence_value {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}
            impl SequenceValue for $ty {}
        )*
    };
}

impl_sequence_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// The empty value list. Terminal case of the generator.
pub struct Nil;

/// A value list carrying `V` followed by `Tail`.
pub struct Cons<const V: i128, Tail: ValueList>(PhantomData<Tail>);

/// Type-level list of integer constants.
///
/// Implemented exactly by [`Nil`] and [`Cons`]; the length is computed
/// inductively over the list structure.
pub trait ValueList: private::Sealed {
    /// Number of values in the list.
    const LEN: usize;
}

impl private::Sealed for Nil {}

impl ValueList for Nil {
    const LEN: usize = 0;
}

impl<const V: i128, Tail: ValueList> private::Sealed for Cons<V, Tail> {}

impl<const V: i128, Tail: ValueList> ValueList for Cons<V, Tail> {
    const LEN: usize = 1 + Tail::LEN;
}

/// An ordered, fixed-length list of integers of type `T`, resolved at
/// compile time.
///
/// Zero-sized; an instance is only ever a tag passed to code that
/// dispatches on the sequence type.
pub struct IntegerSequence<T: SequenceValue, Vs: ValueList> {
    _marker: PhantomData<(fn() -> T, Vs)>,
}

impl<T: SequenceValue, Vs: ValueList> IntegerSequence<T, Vs> {
    /// A zero-size stand-in value for passing the sequence as a tag.
    pub const fn new() -> Self {
        IntegerSequence {
            _marker: PhantomData,
        }
    }

    /// Number of values in the sequence.
    pub const fn len(&self) -> usize {
        Vs::LEN
    }

    pub const fn is_empty(&self) -> bool {
        Vs::LEN == 0
    }
}

impl<T: SequenceValue, Vs: ValueList> Clone for IntegerSequence<T, Vs> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SequenceValue, Vs: ValueList> Copy for IntegerSequence<T, Vs> {}

impl<T: SequenceValue, Vs: ValueList> Default for IntegerSequence<T, Vs> {
    fn default() -> Self {
        Self::new()
    }
}

/// Observes a resolved sequence: its element type and its length.
pub trait Sequence {
    /// The integer type the values are tagged with.
    type Value: SequenceValue;
    /// Number of values in the sequence.
    const LEN: usize;
}

impl<T: SequenceValue, Vs: ValueList> Sequence for IntegerSequence<T, Vs> {
    type Value = T;
    const LEN: usize = Vs::LEN;
}
