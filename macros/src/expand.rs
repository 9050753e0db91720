use std::mem;

use proc_macro2::{Group, Ident, Literal, Span, TokenStream, TokenTree};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned as _;
use syn::{
    Block, Error, Expr, ExprField, ExprLit, ExprRange, GenericArgument, Index, LitInt, Macro,
    Member, Pat, PathArguments, RangeLimits, Result, Stmt, Token, Type,
};

use crate::constant::{evaluate_i128, evaluate_usize};

macro_rules! abort {
    ($spanned:expr, $message:expr) => {
        return Err(Error::new($spanned.span(), $message))
    };
}

// The integer types a sequence can be generated over, with the largest
// bound each can express as one of its constants.
#[derive(Clone, Copy)]
enum ElemKind {
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
}

impl ElemKind {
    fn max(self) -> i128 {
        match self {
            ElemKind::U8 => u8::MAX as i128,
            ElemKind::U16 => u16::MAX as i128,
            ElemKind::U32 => u32::MAX as i128,
            ElemKind::U64 => u64::MAX as i128,
            // Values are carried as `i128` const parameters, which caps the
            // expressible domain of the two widest types.
            ElemKind::U128 => i128::MAX,
            ElemKind::Usize => usize::MAX as i128,
            ElemKind::I8 => i8::MAX as i128,
            ElemKind::I16 => i16::MAX as i128,
            ElemKind::I32 => i32::MAX as i128,
            ElemKind::I64 => i64::MAX as i128,
            ElemKind::I128 => i128::MAX,
            ElemKind::Isize => isize::MAX as i128,
        }
    }

    fn literal(self, value: i128) -> Literal {
        match self {
            ElemKind::U8 => Literal::u8_suffixed(value as u8),
            ElemKind::U16 => Literal::u16_suffixed(value as u16),
            ElemKind::U32 => Literal::u32_suffixed(value as u32),
            ElemKind::U64 => Literal::u64_suffixed(value as u64),
            ElemKind::U128 => Literal::u128_suffixed(value as u128),
            ElemKind::Usize => Literal::usize_suffixed(value as usize),
            ElemKind::I8 => Literal::i8_suffixed(value as i8),
            ElemKind::I16 => Literal::i16_suffixed(value as i16),
            ElemKind::I32 => Literal::i32_suffixed(value as i32),
            ElemKind::I64 => Literal::i64_suffixed(value as i64),
            ElemKind::I128 => Literal::i128_suffixed(value),
            ElemKind::Isize => Literal::isize_suffixed(value as isize),
        }
    }
}

struct ElemType {
    ident: Ident,
    kind: ElemKind,
}

impl ElemType {
    fn new(ident: Ident) -> Result<Self> {
        let kind = match ident.to_string().as_str() {
            "u8" => ElemKind::U8,
            "u16" => ElemKind::U16,
            "u32" => ElemKind::U32,
            "u64" => ElemKind::U64,
            "u128" => ElemKind::U128,
            "usize" => ElemKind::Usize,
            "i8" => ElemKind::I8,
            "i16" => ElemKind::I16,
            "i32" => ElemKind::I32,
            "i64" => ElemKind::I64,
            "i128" => ElemKind::I128,
            "isize" => ElemKind::Isize,
            _ => abort!(ident, "expected an integer type"),
        };
        Ok(ElemType { ident, kind })
    }

    fn usize(span: Span) -> Self {
        ElemType {
            ident: Ident::new("usize", span),
            kind: ElemKind::Usize,
        }
    }
}

// integer_sequence!(u8, 5)
struct SequenceInput {
    elem: ElemType,
    bound: Expr,
}

impl Parse for SequenceInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let elem = ElemType::new(input.parse::<Ident>()?)?;
        input.parse::<Token![,]>()?;
        let bound = input.parse::<Expr>()?;
        Ok(SequenceInput { elem, bound })
    }
}

fn bound_value(elem: &ElemType, bound: &Expr) -> Result<i128> {
    let Some(value) = evaluate_i128(bound) else {
        abort!(bound, "sequence bound must be a constant integer expression");
    };
    if value < 0 {
        abort!(bound, "sequence bound cannot be negative");
    }
    if value > elem.kind.max() {
        abort!(
            bound,
            format!("sequence bound does not fit in `{}`", elem.ident)
        );
    }
    Ok(value)
}

pub fn integer_sequence(input: TokenStream) -> Result<TokenStream> {
    let SequenceInput { elem, bound } = syn::parse2(input)?;
    let limit = bound_value(&elem, &bound)?;
    Ok(sequence_type(&elem, limit))
}

pub fn index_sequence(input: TokenStream) -> Result<TokenStream> {
    let bound = syn::parse2::<Expr>(input)?;
    let elem = ElemType::usize(bound.span());
    let limit = bound_value(&elem, &bound)?;
    Ok(sequence_type(&elem, limit))
}

// Fold the accumulator from the limit back down to zero so that the
// outermost `Cons` carries the first value. The terminal case is the bare
// `Nil` emitted before the loop appends anything.
fn sequence_type(elem: &ElemType, limit: i128) -> TokenStream {
    let mut list = quote!(::intseq::sequence::Nil);
    let mut current = limit;
    while current > 0 {
        current -= 1;
        let value = Literal::i128_unsuffixed(current);
        list = quote!(::intseq::sequence::Cons<#value, #list>);
    }
    let ident = &elem.ident;
    quote!(::intseq::IntegerSequence<#ident, #list>)
}

pub fn sequence_values(input: TokenStream) -> Result<TokenStream> {
    let SequenceInput { elem, bound } = syn::parse2(input)?;
    let limit = bound_value(&elem, &bound)?;
    let values = (0..limit).map(|value| elem.kind.literal(value));
    Ok(quote!([#(#values),*]))
}

// for_indices!(i in 0..3 => t[[i]] * 2)
struct ForIndices {
    var: Ident,
    range: ExprRange,
    body: Expr,
}

impl Parse for ForIndices {
    fn parse(input: ParseStream) -> Result<Self> {
        let var = input.parse::<Ident>()?;
        input.parse::<Token![in]>()?;
        let range = input.parse::<ExprRange>()?;
        input.parse::<Token![=>]>()?;
        let body = input.parse::<Expr>()?;
        Ok(ForIndices { var, range, body })
    }
}

pub fn for_indices(input: TokenStream) -> Result<TokenStream> {
    let ForIndices { var, range, body } = syn::parse2(input)?;
    let indices = index_range(&range)?;
    let mut elems = Vec::with_capacity(indices.len());
    for value in indices {
        let mut expr = body.clone();
        let binding = IndexBinding { var: &var, value };
        binding.replace_expr(&mut expr)?;
        elems.push(expr);
    }
    Ok(quote!((#(#elems,)*)))
}

fn index_range(range: &ExprRange) -> Result<std::ops::Range<usize>> {
    let start = match &range.start {
        Some(expr) => {
            let Some(start) = evaluate_usize(expr) else {
                abort!(expr, "range start must be a non-negative constant");
            };
            start
        }
        None => 0,
    };
    let Some(end_expr) = &range.end else {
        abort!(range, "range cannot be unbounded at end");
    };
    let Some(end) = evaluate_usize(end_expr) else {
        abort!(end_expr, "range end must be a non-negative constant");
    };
    let end = match range.limits {
        RangeLimits::HalfOpen(_) => end,
        RangeLimits::Closed(_) => match end.checked_add(1) {
            Some(end) => end,
            None => abort!(end_expr, "range end is too large"),
        },
    };
    if end < start {
        abort!(range, "range end is before its start");
    }
    Ok(start..end)
}

// Substitutes one index binding through an expression tree: the bound ident
// becomes the index literal, and `t[[i]]` index expressions become tuple
// field accesses.
struct IndexBinding<'a> {
    var: &'a Ident,
    value: usize,
}

impl IndexBinding<'_> {
    fn replace_expr(&self, expr: &mut Expr) -> Result<()> {
        match expr {
            Expr::Array(array) => {
                for elem in &mut array.elems {
                    self.replace_expr(elem)?;
                }
            }
            Expr::Assign(assign) => {
                self.replace_expr(&mut assign.left)?;
                self.replace_expr(&mut assign.right)?;
            }
            Expr::Binary(binary) => {
                self.replace_expr(&mut binary.left)?;
                self.replace_expr(&mut binary.right)?;
            }
            Expr::Block(block) => {
                self.replace_block(&mut block.block)?;
            }
            Expr::Call(call) => {
                self.replace_expr(&mut call.func)?;
                for arg in &mut call.args {
                    self.replace_expr(arg)?;
                }
            }
            Expr::Cast(cast) => {
                self.replace_expr(&mut cast.expr)?;
                self.replace_type(&mut cast.ty)?;
            }
            Expr::Closure(closure) => {
                for pat in &mut closure.inputs {
                    self.replace_pat(pat)?;
                }
                if let syn::ReturnType::Type(_, ret_type) = &mut closure.output {
                    self.replace_type(ret_type)?;
                }
                self.replace_expr(&mut closure.body)?;
            }
            Expr::Field(field) => {
                self.replace_expr(&mut field.base)?;
            }
            Expr::ForLoop(for_loop) => {
                self.replace_pat(&mut for_loop.pat)?;
                self.replace_expr(&mut for_loop.expr)?;
                self.replace_block(&mut for_loop.body)?;
            }
            Expr::Group(group) => {
                self.replace_expr(&mut group.expr)?;
            }
            Expr::If(r#if) => {
                self.replace_expr(&mut r#if.cond)?;
                self.replace_block(&mut r#if.then_branch)?;
                if let Some((_, expr)) = &mut r#if.else_branch {
                    self.replace_expr(expr)?;
                }
            }
            Expr::Index(index) => {
                self.replace_expr(&mut index.expr)?;
                self.replace_expr(&mut index.index)?;
                if let Expr::Array(array) = &*index.index {
                    // t[[i]] selects a tuple field
                    if array.elems.len() != 1 {
                        abort!(index.index, "expected a single tuple index");
                    }
                    let Some(field) = evaluate_usize(&array.elems[0]) else {
                        abort!(index.index, "unsupported tuple index");
                    };
                    let Ok(field) = u32::try_from(field) else {
                        abort!(index.index, "unsupported tuple index");
                    };
                    *expr = Expr::Field(ExprField {
                        attrs: mem::take(&mut index.attrs),
                        base: index.expr.clone(),
                        dot_token: <Token![.]>::default(),
                        member: Member::Unnamed(Index {
                            index: field,
                            span: index.index.span(),
                        }),
                    });
                }
            }
            Expr::Let(r#let) => {
                self.replace_pat(&mut r#let.pat)?;
                self.replace_expr(&mut r#let.expr)?;
            }
            Expr::Loop(r#loop) => {
                self.replace_block(&mut r#loop.body)?;
            }
            Expr::Macro(r#macro) => {
                self.replace_macro(&mut r#macro.mac);
            }
            Expr::Match(r#match) => {
                self.replace_expr(&mut r#match.expr)?;
                for arm in &mut r#match.arms {
                    self.replace_pat(&mut arm.pat)?;
                    if let Some((_, guard)) = &mut arm.guard {
                        self.replace_expr(guard)?;
                    }
                    self.replace_expr(&mut arm.body)?;
                }
            }
            Expr::MethodCall(method_call) => {
                self.replace_expr(&mut method_call.receiver)?;
                if let Some(turbofish) = &mut method_call.turbofish {
                    self.replace_generic_arguments(&mut turbofish.args)?;
                }
                for arg in &mut method_call.args {
                    self.replace_expr(arg)?;
                }
            }
            Expr::Paren(paren) => {
                self.replace_expr(&mut paren.expr)?;
            }
            Expr::Path(path) => {
                if let Some(qself) = &mut path.qself {
                    self.replace_type(&mut qself.ty)?;
                }
                if path.path.leading_colon.is_none()
                    && path.path.segments.len() == 1
                    && path.path.segments[0].arguments.is_none()
                    && path.path.segments[0].ident == *self.var
                {
                    let span = path.path.segments[0].ident.span();
                    *expr = Expr::Lit(ExprLit {
                        attrs: mem::take(&mut path.attrs),
                        lit: syn::Lit::Int(LitInt::new(&self.value.to_string(), span)),
                    });
                } else {
                    for segment in &mut path.path.segments {
                        self.replace_path_arguments(&mut segment.arguments)?;
                    }
                }
            }
            Expr::Range(range) => {
                if let Some(start) = &mut range.start {
                    self.replace_expr(start)?;
                }
                if let Some(end) = &mut range.end {
                    self.replace_expr(end)?;
                }
            }
            Expr::Reference(reference) => {
                self.replace_expr(&mut reference.expr)?;
            }
            Expr::Repeat(repeat) => {
                self.replace_expr(&mut repeat.expr)?;
                self.replace_expr(&mut repeat.len)?;
            }
            Expr::Return(r#return) => {
                if let Some(expr) = &mut r#return.expr {
                    self.replace_expr(expr)?;
                }
            }
            Expr::Struct(r#struct) => {
                for field in &mut r#struct.fields {
                    self.replace_expr(&mut field.expr)?;
                }
                if let Some(rest) = &mut r#struct.rest {
                    self.replace_expr(rest)?;
                }
            }
            Expr::Try(r#try) => {
                self.replace_expr(&mut r#try.expr)?;
            }
            Expr::Tuple(tuple) => {
                for elem in &mut tuple.elems {
                    self.replace_expr(elem)?;
                }
            }
            Expr::Unary(unary) => {
                self.replace_expr(&mut unary.expr)?;
            }
            Expr::Unsafe(r#unsafe) => {
                self.replace_block(&mut r#unsafe.block)?;
            }
            Expr::While(r#while) => {
                self.replace_expr(&mut r#while.cond)?;
                self.replace_block(&mut r#while.body)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn replace_block(&self, block: &mut Block) -> Result<()> {
        for stmt in &mut block.stmts {
            match stmt {
                Stmt::Local(local) => {
                    self.replace_pat(&mut local.pat)?;
                    if let Some(init) = &mut local.init {
                        self.replace_expr(&mut init.expr)?;
                        if let Some((_, diverge)) = &mut init.diverge {
                            self.replace_expr(diverge)?;
                        }
                    }
                }
                Stmt::Item(_) => {}
                Stmt::Expr(expr, _) => self.replace_expr(expr)?,
                Stmt::Macro(stmt_macro) => self.replace_macro(&mut stmt_macro.mac),
            }
        }
        Ok(())
    }

    fn replace_pat(&self, pat: &mut Pat) -> Result<()> {
        match pat {
            Pat::Macro(pat_macro) => self.replace_macro(&mut pat_macro.mac),
            Pat::Paren(paren) => self.replace_pat(&mut paren.pat)?,
            Pat::Reference(reference) => self.replace_pat(&mut reference.pat)?,
            Pat::Tuple(tuple) => {
                for pat in &mut tuple.elems {
                    self.replace_pat(pat)?;
                }
            }
            Pat::Type(pat_type) => {
                self.replace_pat(&mut pat_type.pat)?;
                self.replace_type(&mut pat_type.ty)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn replace_type(&self, ty: &mut Type) -> Result<()> {
        match ty {
            Type::Array(array) => {
                self.replace_type(&mut array.elem)?;
                self.replace_expr(&mut array.len)?;
            }
            Type::Group(group) => {
                self.replace_type(&mut group.elem)?;
            }
            Type::Macro(type_macro) => self.replace_macro(&mut type_macro.mac),
            Type::Paren(paren) => {
                self.replace_type(&mut paren.elem)?;
            }
            Type::Path(path) => {
                if let Some(qself) = &mut path.qself {
                    self.replace_type(&mut qself.ty)?;
                }
                for segment in &mut path.path.segments {
                    self.replace_path_arguments(&mut segment.arguments)?;
                }
            }
            Type::Ptr(ptr) => {
                self.replace_type(&mut ptr.elem)?;
            }
            Type::Reference(reference) => {
                self.replace_type(&mut reference.elem)?;
            }
            Type::Slice(slice) => {
                self.replace_type(&mut slice.elem)?;
            }
            Type::Tuple(tuple) => {
                for elem in &mut tuple.elems {
                    self.replace_type(elem)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn replace_path_arguments(&self, arguments: &mut PathArguments) -> Result<()> {
        if let PathArguments::AngleBracketed(args) = arguments {
            self.replace_generic_arguments(&mut args.args)?;
        }
        Ok(())
    }

    fn replace_generic_arguments(
        &self,
        args: &mut Punctuated<GenericArgument, Token![,]>,
    ) -> Result<()> {
        for arg in args {
            match arg {
                GenericArgument::Type(ty) => self.replace_type(ty)?,
                GenericArgument::Const(expr) => self.replace_expr(expr)?,
                _ => {}
            }
        }
        Ok(())
    }

    // Nested macro invocations are substituted at the token level so that
    // the index is visible before the inner macro expands.
    fn replace_macro(&self, mac: &mut Macro) {
        mac.tokens = self.replace_tokens(mem::take(&mut mac.tokens));
    }

    fn replace_tokens(&self, tokens: TokenStream) -> TokenStream {
        tokens
            .into_iter()
            .map(|tree| match tree {
                TokenTree::Ident(ident) if ident == *self.var => {
                    let mut literal = Literal::usize_unsuffixed(self.value);
                    literal.set_span(ident.span());
                    TokenTree::Literal(literal)
                }
                TokenTree::Group(group) => {
                    let mut replaced =
                        Group::new(group.delimiter(), self.replace_tokens(group.stream()));
                    replaced.set_span(group.span());
                    TokenTree::Group(replaced)
                }
                tree => tree,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::quote;

    use super::{for_indices, index_sequence, integer_sequence, sequence_values};

    #[test]
    fn zero_bound_resolves_to_nil() {
        let tokens = integer_sequence(quote!(u8, 0)).unwrap();
        let expected = quote!(::intseq::IntegerSequence<u8, ::intseq::sequence::Nil>);
        assert_eq!(tokens.to_string(), expected.to_string());
    }

    #[test]
    fn one_bound_resolves_to_single_zero() {
        let tokens = integer_sequence(quote!(i16, 1)).unwrap();
        let expected = quote!(
            ::intseq::IntegerSequence<i16, ::intseq::sequence::Cons<0, ::intseq::sequence::Nil>>
        );
        assert_eq!(tokens.to_string(), expected.to_string());
    }

    #[test]
    fn five_bound_counts_up_from_zero() {
        let tokens = integer_sequence(quote!(u32, 5)).unwrap();
        let expected = quote!(
            ::intseq::IntegerSequence<
                u32,
                ::intseq::sequence::Cons<
                    0,
                    ::intseq::sequence::Cons<
                        1,
                        ::intseq::sequence::Cons<
                            2,
                            ::intseq::sequence::Cons<
                                3,
                                ::intseq::sequence::Cons<4, ::intseq::sequence::Nil>
                            >
                        >
                    >
                >
            >
        );
        assert_eq!(tokens.to_string(), expected.to_string());
    }

    #[test]
    fn bound_accepts_constant_arithmetic() {
        let tokens = integer_sequence(quote!(u8, 1 + 1)).unwrap();
        let expected = quote!(
            ::intseq::IntegerSequence<
                u8,
                ::intseq::sequence::Cons<0, ::intseq::sequence::Cons<1, ::intseq::sequence::Nil>>
            >
        );
        assert_eq!(tokens.to_string(), expected.to_string());
    }

    #[test]
    fn index_sequence_uses_usize() {
        let tokens = index_sequence(quote!(2)).unwrap();
        let expected = quote!(
            ::intseq::IntegerSequence<
                usize,
                ::intseq::sequence::Cons<0, ::intseq::sequence::Cons<1, ::intseq::sequence::Nil>>
            >
        );
        assert_eq!(tokens.to_string(), expected.to_string());
    }

    #[test]
    fn negative_bound_fails_resolution() {
        let error = integer_sequence(quote!(i32, -1)).unwrap_err();
        assert_eq!(error.to_string(), "sequence bound cannot be negative");
        let error = integer_sequence(quote!(i8, 2 - 5)).unwrap_err();
        assert_eq!(error.to_string(), "sequence bound cannot be negative");
    }

    #[test]
    fn non_constant_bound_fails_resolution() {
        let error = integer_sequence(quote!(u8, n)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "sequence bound must be a constant integer expression"
        );
    }

    #[test]
    fn non_integer_element_type_fails_resolution() {
        let error = integer_sequence(quote!(f32, 3)).unwrap_err();
        assert_eq!(error.to_string(), "expected an integer type");
        let error = integer_sequence(quote!(String, 3)).unwrap_err();
        assert_eq!(error.to_string(), "expected an integer type");
    }

    #[test]
    fn bound_must_fit_in_element_type() {
        let error = integer_sequence(quote!(u8, 300)).unwrap_err();
        assert_eq!(error.to_string(), "sequence bound does not fit in `u8`");
        let tokens = integer_sequence(quote!(u16, 300));
        assert!(tokens.is_ok());
    }

    #[test]
    fn values_are_suffixed_literals() {
        let tokens = sequence_values(quote!(u16, 3)).unwrap();
        assert_eq!(
            tokens.to_string(),
            quote!([0u16, 1u16, 2u16]).to_string()
        );
        let tokens = sequence_values(quote!(i64, 0)).unwrap();
        assert_eq!(tokens.to_string(), quote!([]).to_string());
    }

    #[test]
    fn for_indices_substitutes_the_binding() {
        let tokens = for_indices(quote!(i in 0..2 => i * 3)).unwrap();
        assert_eq!(tokens.to_string(), quote!((0 * 3, 1 * 3,)).to_string());
    }

    #[test]
    fn for_indices_rewrites_tuple_access() {
        let tokens = for_indices(quote!(i in 0..3 => t[[i]])).unwrap();
        assert_eq!(tokens.to_string(), quote!((t.0, t.1, t.2,)).to_string());
    }

    #[test]
    fn for_indices_accepts_closed_and_open_starts() {
        let tokens = for_indices(quote!(j in 1..=2 => j)).unwrap();
        assert_eq!(tokens.to_string(), quote!((1, 2,)).to_string());
        let tokens = for_indices(quote!(j in ..2 => j)).unwrap();
        assert_eq!(tokens.to_string(), quote!((0, 1,)).to_string());
    }

    #[test]
    fn for_indices_empty_range_is_unit() {
        let tokens = for_indices(quote!(i in 0..0 => i)).unwrap();
        assert_eq!(tokens.to_string(), quote!(()).to_string());
    }

    #[test]
    fn for_indices_substitutes_inside_nested_macros() {
        let tokens = for_indices(quote!(i in 0..2 => inner!(i + 1))).unwrap();
        assert_eq!(
            tokens.to_string(),
            quote!((inner!(0 + 1), inner!(1 + 1),)).to_string()
        );
    }

    #[test]
    fn for_indices_rejects_bad_ranges() {
        let error = for_indices(quote!(i in 0.. => i)).unwrap_err();
        assert_eq!(error.to_string(), "range cannot be unbounded at end");
        let error = for_indices(quote!(i in 3..1 => i)).unwrap_err();
        assert_eq!(error.to_string(), "range end is before its start");
        let error = for_indices(quote!(i in 0..n => i)).unwrap_err();
        assert_eq!(error.to_string(), "range end must be a non-negative constant");
    }
}
