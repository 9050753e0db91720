//! Procedural macros for the `intseq` crate.
//!
//! The macros here resolve integer sequences during expansion and emit
//! either the sequence type, a const array of its values, or code expanded
//! once per index. See the `intseq` crate documentation for the full
//! contract; these entry points only convert token streams and surface
//! resolution failures as compile errors.

use proc_macro2::TokenStream;

mod constant;
mod expand;

/// Resolves to `IntegerSequence<T, _>` carrying the values `0..N` for a
/// request written as `integer_sequence!(T, N)`.
#[proc_macro]
pub fn integer_sequence(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand::integer_sequence(TokenStream::from(input))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Shorthand for `integer_sequence!(usize, N)`.
#[proc_macro]
pub fn index_sequence(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand::index_sequence(TokenStream::from(input))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Materializes the values `0..N` of type `T` as a const array for a
/// request written as `sequence_values!(T, N)`.
#[proc_macro]
pub fn sequence_values(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand::sequence_values(TokenStream::from(input))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Expands `for_indices!(i in 0..N => expr)` into a tuple expression with
/// one element per index, substituting `i` and rewriting `t[[i]]` into
/// tuple field access.
#[proc_macro]
pub fn for_indices(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand::for_indices(TokenStream::from(input))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
