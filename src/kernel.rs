//! Arithmetic on derivative-structure slices.
//!
//! Every operand and result is a slice holding at least
//! [`size`](DsCompiler::size) elements; only that prefix is touched. To work
//! at an offset inside a larger buffer, pass `&buf[offset..]`. Short slices
//! panic before anything is written.

use crate::compiler::DsCompiler;
use crate::dot::dot;
use crate::Float;

impl DsCompiler {
    // ══════════════════════════════════════════════
    //  Slot-wise operations
    // ══════════════════════════════════════════════

    /// `result = lhs + rhs`
    pub fn add<F: Float>(&self, lhs: &[F], rhs: &[F], result: &mut [F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        self.expect_len("result", result);
        let n = self.size();
        for ((r, &a), &b) in result[..n].iter_mut().zip(lhs).zip(rhs) {
            *r = a + b;
        }
    }

    /// `lhs += rhs`
    pub fn add_assign<F: Float>(&self, lhs: &mut [F], rhs: &[F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        let n = self.size();
        for (a, &b) in lhs[..n].iter_mut().zip(rhs) {
            *a = *a + b;
        }
    }

    /// `result = lhs - rhs`
    pub fn subtract<F: Float>(&self, lhs: &[F], rhs: &[F], result: &mut [F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        self.expect_len("result", result);
        let n = self.size();
        for ((r, &a), &b) in result[..n].iter_mut().zip(lhs).zip(rhs) {
            *r = a - b;
        }
    }

    /// `lhs -= rhs`
    pub fn subtract_assign<F: Float>(&self, lhs: &mut [F], rhs: &[F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        let n = self.size();
        for (a, &b) in lhs[..n].iter_mut().zip(rhs) {
            *a = *a - b;
        }
    }

    /// `result = -operand`
    pub fn negate<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.expect_len("operand", operand);
        self.expect_len("result", result);
        let n = self.size();
        for (r, &a) in result[..n].iter_mut().zip(operand) {
            *r = -a;
        }
    }

    /// `operand = -operand`
    pub fn negate_in_place<F: Float>(&self, operand: &mut [F]) {
        self.expect_len("operand", operand);
        for a in operand[..self.size()].iter_mut() {
            *a = -*a;
        }
    }

    /// `result = a1·c1 + a2·c2` for scalar `a` and structures `c`.
    ///
    /// Each slot is accumulated with error-free transformations, so
    /// cancellation between the terms does not lose accuracy.
    pub fn linear_combination2<F: Float>(&self, a1: F, c1: &[F], a2: F, c2: &[F], result: &mut [F]) {
        self.expect_len("c1", c1);
        self.expect_len("c2", c2);
        self.expect_len("result", result);
        for i in 0..self.size() {
            result[i] = dot([a1, a2], [c1[i], c2[i]]);
        }
    }

    /// `result = a1·c1 + a2·c2 + a3·c3`; see
    /// [`linear_combination2`](Self::linear_combination2).
    #[allow(clippy::too_many_arguments)]
    pub fn linear_combination3<F: Float>(
        &self,
        a1: F,
        c1: &[F],
        a2: F,
        c2: &[F],
        a3: F,
        c3: &[F],
        result: &mut [F],
    ) {
        self.expect_len("c1", c1);
        self.expect_len("c2", c2);
        self.expect_len("c3", c3);
        self.expect_len("result", result);
        for i in 0..self.size() {
            result[i] = dot([a1, a2, a3], [c1[i], c2[i], c3[i]]);
        }
    }

    /// `result = a1·c1 + a2·c2 + a3·c3 + a4·c4`; see
    /// [`linear_combination2`](Self::linear_combination2).
    #[allow(clippy::too_many_arguments)]
    pub fn linear_combination4<F: Float>(
        &self,
        a1: F,
        c1: &[F],
        a2: F,
        c2: &[F],
        a3: F,
        c3: &[F],
        a4: F,
        c4: &[F],
        result: &mut [F],
    ) {
        self.expect_len("c1", c1);
        self.expect_len("c2", c2);
        self.expect_len("c3", c3);
        self.expect_len("c4", c4);
        self.expect_len("result", result);
        for i in 0..self.size() {
            result[i] = dot([a1, a2, a3, a4], [c1[i], c2[i], c3[i], c4[i]]);
        }
    }

    // ══════════════════════════════════════════════
    //  Product, quotient, remainder
    // ══════════════════════════════════════════════

    /// `result = lhs × rhs` by the generalized Leibniz rule.
    ///
    /// `result[i] = Σ c · lhs[l] · rhs[r]` over the precompiled terms of slot `i`.
    pub fn multiply<F: Float>(&self, lhs: &[F], rhs: &[F], result: &mut [F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        self.expect_len("result", result);
        for (r, terms) in result.iter_mut().zip(&self.mult_indirection) {
            let mut sum = F::zero();
            for term in terms {
                sum = sum
                    + F::from_count(term.coefficient) * lhs[term.lhs_index] * rhs[term.rhs_index];
            }
            *r = sum;
        }
    }

    /// `result = lhs / rhs`, computed as `lhs × rhs⁻¹`.
    pub fn divide<F: Float>(&self, lhs: &[F], rhs: &[F], result: &mut [F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        self.expect_len("result", result);
        let mut reciprocal = vec![F::zero(); self.size()];
        self.powi(rhs, -1, &mut reciprocal);
        self.multiply(lhs, &reciprocal, result);
    }

    /// IEEE 754 remainder of `lhs / rhs`.
    ///
    /// The quotient `k = round((lhs₀ - rem) / rhs₀)` is locally constant, so
    /// every derivative slot is `lhs[i] - k·rhs[i]`.
    pub fn remainder<F: Float>(&self, lhs: &[F], rhs: &[F], result: &mut [F]) {
        self.expect_len("lhs", lhs);
        self.expect_len("rhs", rhs);
        self.expect_len("result", result);
        let rem = lhs[0].ieee_remainder(rhs[0]);
        let k = ((lhs[0] - rem) / rhs[0]).round();
        result[0] = rem;
        for i in 1..self.size() {
            result[i] = lhs[i] - k * rhs[i];
        }
    }

    // ══════════════════════════════════════════════
    //  Composition
    // ══════════════════════════════════════════════

    /// `result = f ∘ operand` by Faà di Bruno's formula.
    ///
    /// `f[k]` must be the k-th derivative of the outer function at
    /// `operand[0]`, for `k = 0..=order`.
    /// `result[i] = Σ c · f[k] · Π operand[j]` over the precompiled terms of
    /// slot `i`.
    pub fn compose<F: Float>(&self, operand: &[F], f: &[F], result: &mut [F]) {
        self.expect_len("operand", operand);
        self.expect_len("result", result);
        assert!(
            f.len() > self.order,
            "outer function holds {} derivatives but order {} needs {}",
            f.len(),
            self.order,
            self.order + 1
        );
        for (r, terms) in result.iter_mut().zip(&self.comp_indirection) {
            let mut sum = F::zero();
            for term in terms {
                let mut product = F::from_count(term.coefficient) * f[term.order];
                for &j in &term.inner {
                    product = product * operand[j];
                }
                sum = sum + product;
            }
            *r = sum;
        }
    }
}
