//! Elementary functions of derivative structures.
//!
//! Each function builds the derivative vector of its outer function at the
//! operand's value (see [`univariate`](crate::univariate)) and hands it to
//! [`DsCompiler::compose`]. The two-argument functions are assembled from the
//! kernel primitives.

use crate::compiler::DsCompiler;
use crate::univariate;
use crate::Float;

impl DsCompiler {
    /// Apply a univariate derivative generator through Faà di Bruno.
    fn compose_with<F: Float>(
        &self,
        operand: &[F],
        result: &mut [F],
        derivatives: impl FnOnce(F, &mut [F]),
    ) {
        self.expect_len("operand", operand);
        self.expect_len("result", result);
        let mut function = vec![F::zero(); self.order + 1];
        derivatives(operand[0], &mut function);
        self.compose(operand, &function, result);
    }

    // ── Powers ──

    /// `result = a^operand` for a constant base `a`.
    pub fn pow_scalar_base<F: Float>(&self, a: F, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, |x, f| univariate::pow_scalar_base(a, x, f));
    }

    /// `result = operand^p` for a constant real exponent.
    pub fn powf<F: Float>(&self, operand: &[F], p: F, result: &mut [F]) {
        self.compose_with(operand, result, |x, f| univariate::powf(x, p, f));
    }

    /// `result = operand^n` for a constant integer exponent.
    pub fn powi<F: Float>(&self, operand: &[F], n: i32, result: &mut [F]) {
        self.compose_with(operand, result, |x, f| univariate::powi(x, n, f));
    }

    /// `result = x^y` for two structures, as `exp(y · ln(x))`.
    ///
    /// The value slot is taken from `powf` directly.
    pub fn pow<F: Float>(&self, x: &[F], y: &[F], result: &mut [F]) {
        self.expect_len("x", x);
        self.expect_len("y", y);
        self.expect_len("result", result);
        let n = self.size();
        let mut log_x = vec![F::zero(); n];
        self.ln(x, &mut log_x);
        let mut y_log_x = vec![F::zero(); n];
        self.multiply(&log_x, y, &mut y_log_x);
        self.exp(&y_log_x, result);
        result[0] = x[0].powf(y[0]);
    }

    /// `result = operand^(1/n)`. `n` must be positive.
    pub fn root_n<F: Float>(&self, operand: &[F], n: u32, result: &mut [F]) {
        self.compose_with(operand, result, |x, f| univariate::root_n(x, n, f));
    }

    /// `result = √operand`
    pub fn sqrt<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.root_n(operand, 2, result);
    }

    /// `result = ∛operand`
    pub fn cbrt<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.root_n(operand, 3, result);
    }

    // ── Exponential and logarithms ──

    pub fn exp<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::exp);
    }

    pub fn exp_m1<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::exp_m1);
    }

    /// Natural logarithm.
    pub fn ln<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::ln);
    }

    pub fn ln_1p<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::ln_1p);
    }

    pub fn log10<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::log10);
    }

    // ── Circular functions ──

    pub fn sin<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::sin);
    }

    pub fn cos<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::cos);
    }

    /// Sine and cosine sharing one `sin_cos` evaluation of the value.
    pub fn sin_cos<F: Float>(&self, operand: &[F], sin: &mut [F], cos: &mut [F]) {
        self.expect_len("operand", operand);
        self.expect_len("sin", sin);
        self.expect_len("cos", cos);
        let mut f_sin = vec![F::zero(); self.order + 1];
        let mut f_cos = vec![F::zero(); self.order + 1];
        univariate::sin_cos(operand[0], &mut f_sin, &mut f_cos);
        self.compose(operand, &f_sin, sin);
        self.compose(operand, &f_cos, cos);
    }

    pub fn tan<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::tan);
    }

    pub fn asin<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::asin);
    }

    pub fn acos<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::acos);
    }

    pub fn atan<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::atan);
    }

    /// Two-argument arctangent of structures `y` and `x`.
    ///
    /// Derivatives come from the half-angle forms
    /// `2·atan(y / (r + x))` for `x ≥ 0` and `±π - 2·atan(y / (r - x))`
    /// otherwise, with `r = √(x² + y²)`. The value slot is then replaced by
    /// the scalar `atan2`, which gets signed zeros and infinities right.
    pub fn atan2<F: Float>(&self, y: &[F], x: &[F], result: &mut [F]) {
        self.expect_len("y", y);
        self.expect_len("x", x);
        self.expect_len("result", result);
        let n = self.size();
        let mut tmp1 = vec![F::zero(); n];
        let mut tmp2 = vec![F::zero(); n];

        // r = √(x² + y²)
        self.multiply(x, x, &mut tmp1);
        self.multiply(y, y, &mut tmp2);
        self.add_assign(&mut tmp2, &tmp1);
        self.sqrt(&tmp2, &mut tmp1);

        let two = F::one() + F::one();
        if x[0] >= F::zero() {
            self.add(&tmp1, x, &mut tmp2);
            self.divide(y, &tmp2, &mut tmp1);
            self.atan(&tmp1, &mut tmp2);
            for (r, &t) in result[..n].iter_mut().zip(&tmp2) {
                *r = two * t;
            }
        } else {
            self.subtract(&tmp1, x, &mut tmp2);
            self.divide(y, &tmp2, &mut tmp1);
            self.atan(&tmp1, &mut tmp2);
            let pi = if tmp2[0] <= F::zero() { -F::PI() } else { F::PI() };
            result[0] = pi - two * tmp2[0];
            for (r, &t) in result[1..n].iter_mut().zip(&tmp2[1..]) {
                *r = -two * t;
            }
        }

        result[0] = y[0].atan2(x[0]);
    }

    // ── Hyperbolic functions ──

    pub fn sinh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::sinh);
    }

    pub fn cosh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::cosh);
    }

    /// Hyperbolic sine and cosine together.
    pub fn sinh_cosh<F: Float>(&self, operand: &[F], sinh: &mut [F], cosh: &mut [F]) {
        self.expect_len("operand", operand);
        self.expect_len("sinh", sinh);
        self.expect_len("cosh", cosh);
        let mut f_sinh = vec![F::zero(); self.order + 1];
        let mut f_cosh = vec![F::zero(); self.order + 1];
        univariate::sinh_cosh(operand[0], &mut f_sinh, &mut f_cosh);
        self.compose(operand, &f_sinh, sinh);
        self.compose(operand, &f_cosh, cosh);
    }

    pub fn tanh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::tanh);
    }

    pub fn asinh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::asinh);
    }

    pub fn acosh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::acosh);
    }

    pub fn atanh<F: Float>(&self, operand: &[F], result: &mut [F]) {
        self.compose_with(operand, result, univariate::atanh);
    }
}
