use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the element type of derivative-structure arrays (`f32`, `f64`).
///
/// Bundles the numeric and utility traits the compiler kernels need, plus the
/// two primitives `num_traits` does not offer: lossless-enough conversion of
/// the integer table coefficients and the IEEE 754 remainder.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
    /// Convert a combinatorial coefficient or loop counter.
    ///
    /// Integers beyond the mantissa round to the nearest representable value.
    #[inline]
    fn from_count(n: u64) -> Self {
        Self::from_u64(n).unwrap_or_else(Self::infinity)
    }

    /// Convert a signed integer (exponents, root degrees).
    #[inline]
    fn from_int(n: i64) -> Self {
        Self::from_i64(n).unwrap_or_else(Self::nan)
    }

    /// IEEE 754 `remainder(self, rhs)`: `self - q·rhs` where `q` is the
    /// quotient rounded to nearest, ties to even.
    ///
    /// The result lies in `[-|rhs|/2, |rhs|/2]` and may differ in sign from
    /// `self`, unlike `%`.
    fn ieee_remainder(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() || self.is_infinite() || rhs.is_zero() {
            return Self::nan();
        }
        if rhs.is_infinite() {
            return self;
        }

        let p = rhs.abs();
        let two = Self::one() + Self::one();
        // Reduce to |x| < 2p first; the parity of the quotient is then
        // decided by which half of [0, 2p) the residue falls in.
        let mut x = if p <= Self::max_value() / two {
            self % (p + p)
        } else {
            self
        };
        if x.abs() == p {
            return Self::zero() * self;
        }
        let negative = x.is_sign_negative();
        x = x.abs();

        if p < Self::min_positive_value() * two {
            if x + x > p {
                x = x - p;
                if x + x >= p {
                    x = x - p;
                }
            }
        } else {
            let half = p / two;
            if x > half {
                x = x - p;
                if x >= half {
                    x = x - p;
                }
            }
        }

        if negative {
            -x
        } else {
            x
        }
    }
}

impl Float for f32 {}
impl Float for f64 {}
