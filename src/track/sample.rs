//! Sample values that tracks render into.

use std::fmt::Debug;
use std::ops::{Add, AddAssign};

/// A single rendered signal value.
///
/// Mixing only needs an additive identity and summation; overflow and
/// clipping are left to the concrete type (integer samples panic on overflow
/// in debug builds, floats saturate to infinity).
pub trait Sample: Copy + Debug + PartialEq + Add<Output = Self> + AddAssign + 'static {
    const ZERO: Self;
}

macro_rules! impl_sample {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            impl Sample for $t {
                const ZERO: Self = $zero;
            }
        )*
    };
}

impl_sample!(
    f32 => 0.0,
    f64 => 0.0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sum<S: Sample>(values: &[S]) -> S {
        values.iter().fold(S::ZERO, |acc, &v| acc + v)
    }

    #[test]
    fn zero_is_additive_identity() {
        assert_eq!(sum::<f64>(&[]), 0.0);
        assert_eq!(sum(&[0.25f32, 0.5]), 0.75);
        assert_eq!(sum(&[100i16, -40, 2]), 62);
        assert_eq!(5i64 + i64::ZERO, 5);
    }
}
