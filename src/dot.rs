//! Accurate short dot products for linear combinations.
//!
//! Ogita, Rump & Oishi's `Dot2`: each product is split exactly into a rounded
//! value and its error with one fused multiply-add, the running sum is kept
//! with an error-free `TwoSum`, and all error terms are folded in at the end.
//! The result is as accurate as if computed in twice the working precision.

use crate::Float;

/// `a·b` as `(rounded product, exact error)`.
#[inline]
fn two_product<F: Float>(a: F, b: F) -> (F, F) {
    let p = a * b;
    (p, a.mul_add(b, -p))
}

/// `a + b` as `(rounded sum, exact error)`.
#[inline]
fn two_sum<F: Float>(a: F, b: F) -> (F, F) {
    let s = a + b;
    let z = s - a;
    (s, (a - (s - z)) + (b - z))
}

/// `Σ a[i]·b[i]` with compensated accumulation.
///
/// Falls back to the naive sum when the compensated one is NaN, so
/// infinite operands produce the IEEE 754 result rather than `∞ - ∞`.
#[inline]
pub(crate) fn dot<F: Float, const K: usize>(a: [F; K], b: [F; K]) -> F {
    if K == 0 {
        return F::zero();
    }

    let (mut sum, mut error) = two_product(a[0], b[0]);
    for i in 1..K {
        let (product, product_error) = two_product(a[i], b[i]);
        let (next, sum_error) = two_sum(sum, product);
        sum = next;
        error = error + (sum_error + product_error);
    }
    let result = sum + error;

    if result.is_nan() {
        a.iter().zip(b.iter()).fold(F::zero(), |acc, (&x, &y)| acc + x * y)
    } else {
        result
    }
}
