//! Compile-time integer sequence generation for tuple unpacking.
//!
//! `intseq` resolves an integer type `T` and a non-negative bound `N` into
//! the unique type-level list of the integers `0, 1, ..., N-1`. Resolution
//! happens entirely during macro expansion: the resulting
//! [`IntegerSequence`] is zero-sized and exists to drive further
//! compile-time code, such as unpacking a fixed-size tuple into function
//! arguments.
//!
//! # Generating sequences
//!
//! ```
//! use intseq::{index_sequence, integer_sequence, Sequence};
//!
//! type Five = integer_sequence!(u32, 5);
//! assert_eq!(<Five as Sequence>::LEN, 5);
//!
//! // `index_sequence!(N)` is shorthand for `integer_sequence!(usize, N)`.
//! type Indices = index_sequence!(3);
//! assert_eq!(<Indices as Sequence>::LEN, 3);
//! ```
//!
//! The same request always resolves to the same type, built from
//! [`sequence::Cons`] and [`sequence::Nil`]:
//!
//! ```
//! use intseq::sequence::{Cons, Nil};
//! use intseq::{integer_sequence, IntegerSequence};
//!
//! let seq: integer_sequence!(u8, 3) = IntegerSequence::new();
//! let _: IntegerSequence<u8, Cons<0, Cons<1, Cons<2, Nil>>>> = seq;
//! ```
//!
//! # Unpacking tuples
//!
//! [`for_indices!`] expands an expression once per index into a tuple,
//! rewriting `t[[i]]` into the field access `t.0`, `t.1`, ...:
//!
//! ```
//! use intseq::for_indices;
//!
//! let t = (1u32, 2u32, 3u32);
//! assert_eq!(for_indices!(i in 0..3 => t[[i]] * 2), (2, 4, 6));
//! ```
//!
//! Where a value-level index list is all that is needed,
//! [`sequence_values!`] materializes it as a const array:
//!
//! ```
//! use intseq::sequence_values;
//!
//! assert_eq!(sequence_values!(u16, 4), [0u16, 1, 2, 3]);
//! ```
//!
//! # Failure modes
//!
//! Resolution fails at compile time, producing no partial sequence, when
//! the bound is negative, is not a constant expression, does not fit in the
//! element type, or when the element type is not one of the primitive
//! integer types.

pub mod sequence;

pub use macros::{for_indices, index_sequence, integer_sequence, sequence_values};
pub use sequence::{IntegerSequence, Sequence, SequenceValue, ValueList};
