pub fn doubled(t: (u8, u8, u8)) -> (u8, u8, u8) {
    intseq::for_indices!(i in 0..3 => t[[i]] * 2)
}

pub fn swap(t: (char, char)) -> (char, char) {
    intseq::for_indices!(i in 0..2 => t[[1 - i]])
}
