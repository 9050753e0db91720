pub fn doubled(t: (u8, u8, u8)) -> (u8, u8, u8) {
    (t.0 * 2, t.1 * 2, t.2 * 2)
}
pub fn swap(t: (char, char)) -> (char, char) {
    (t.1, t.0)
}
