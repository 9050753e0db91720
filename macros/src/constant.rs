use syn::{Expr, Stmt};

// Evaluate a constant integer expression. Bounds are evaluated at `i128`
// width so that a negative bound is detected rather than failing to parse.
pub fn evaluate_i128(expr: &Expr) -> Option<i128> {
    match expr {
        Expr::Block(block) => {
            if block.block.stmts.len() == 1 {
                if let Stmt::Expr(expr, _) = &block.block.stmts[0] {
                    return evaluate_i128(expr);
                }
            }
        }
        Expr::Group(group) => {
            return evaluate_i128(&group.expr);
        }
        Expr::Lit(literal) => {
            if let syn::Lit::Int(int) = &literal.lit {
                return int.base10_parse().ok();
            }
        }
        Expr::Paren(paren) => {
            return evaluate_i128(&paren.expr);
        }
        Expr::Unary(unary) => {
            if let syn::UnOp::Neg(_) = unary.op {
                if let Some(value) = evaluate_i128(&unary.expr) {
                    return value.checked_neg();
                }
            }
        }
        Expr::Binary(binary) => match binary.op {
            syn::BinOp::Add(_) => {
                if let Some(left) = evaluate_i128(&binary.left) {
                    if let Some(right) = evaluate_i128(&binary.right) {
                        return left.checked_add(right);
                    }
                }
            }
            syn::BinOp::Sub(_) => {
                if let Some(left) = evaluate_i128(&binary.left) {
                    if let Some(right) = evaluate_i128(&binary.right) {
                        return left.checked_sub(right);
                    }
                }
            }
            syn::BinOp::Mul(_) => {
                if let Some(left) = evaluate_i128(&binary.left) {
                    if let Some(right) = evaluate_i128(&binary.right) {
                        return left.checked_mul(right);
                    }
                }
            }
            syn::BinOp::Div(_) => {
                if let Some(left) = evaluate_i128(&binary.left) {
                    if let Some(right) = evaluate_i128(&binary.right) {
                        return left.checked_div(right);
                    }
                }
            }
            syn::BinOp::Rem(_) => {
                if let Some(left) = evaluate_i128(&binary.left) {
                    if let Some(right) = evaluate_i128(&binary.right) {
                        return left.checked_rem(right);
                    }
                }
            }
            _ => {}
        },
        _ => {}
    }
    None
}

pub fn evaluate_usize(expr: &Expr) -> Option<usize> {
    evaluate_i128(expr).and_then(|value| usize::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::quote;
    use syn::Expr;

    use super::{evaluate_i128, evaluate_usize};

    fn parse(tokens: proc_macro2::TokenStream) -> Expr {
        syn::parse2(tokens).unwrap()
    }

    #[test]
    fn literals_and_arithmetic() {
        assert_eq!(evaluate_i128(&parse(quote!(7))), Some(7));
        assert_eq!(evaluate_i128(&parse(quote!(2 + 3 * 4))), Some(14));
        assert_eq!(evaluate_i128(&parse(quote!((10 - 4) / 2))), Some(3));
        assert_eq!(evaluate_i128(&parse(quote!(9 % 4))), Some(1));
        assert_eq!(evaluate_i128(&parse(quote!({ 5 }))), Some(5));
    }

    #[test]
    fn negatives() {
        assert_eq!(evaluate_i128(&parse(quote!(-1))), Some(-1));
        assert_eq!(evaluate_i128(&parse(quote!(3 - 5))), Some(-2));
        assert_eq!(evaluate_usize(&parse(quote!(-1))), None);
    }

    #[test]
    fn non_constants() {
        assert_eq!(evaluate_i128(&parse(quote!(n))), None);
        assert_eq!(evaluate_i128(&parse(quote!(f(3)))), None);
        assert_eq!(evaluate_i128(&parse(quote!(1 / 0))), None);
    }
}
