pub type Empty = ::intseq::IntegerSequence<u16, ::intseq::sequence::Nil>;
pub type Five = ::intseq::IntegerSequence<
    u8,
    ::intseq::sequence::Cons<
        0,
        ::intseq::sequence::Cons<
            1,
            ::intseq::sequence::Cons<
                2,
                ::intseq::sequence::Cons<
                    3,
                    ::intseq::sequence::Cons<4, ::intseq::sequence::Nil>,
                >,
            >,
        >,
    >,
>;
pub type Indices = ::intseq::IntegerSequence<
    usize,
    ::intseq::sequence::Cons<0, ::intseq::sequence::Cons<1, ::intseq::sequence::Nil>>,
>;
pub fn values() -> [u32; 3] {
    [0u32, 1u32, 2u32]
}
