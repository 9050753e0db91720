pub type Empty = intseq::integer_sequence!(u16, 0);

pub type Five = intseq::integer_sequence!(u8, 5);

pub type Indices = intseq::index_sequence!(2);

pub fn values() -> [u32; 3] {
    intseq::sequence_values!(u32, 3)
}
