/// Narrowing conversion to `i16` with plain cast semantics.
///
/// Integers keep their low 16 bits. Floats are truncated toward zero and
/// the integer part then wraps like an integer would; NaN becomes 0.
pub trait NarrowToI16: Copy {
    fn narrow(self) -> i16;
}

impl NarrowToI16 for u16 {
    fn narrow(self) -> i16 {
        self as i16
    }
}

impl NarrowToI16 for u32 {
    fn narrow(self) -> i16 {
        self as i16
    }
}

impl NarrowToI16 for f64 {
    fn narrow(self) -> i16 {
        (self as i64) as i16
    }
}
