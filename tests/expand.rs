#[test]
fn test_expand() {
    macrotest::expand("tests/expand/*.rs");
}
