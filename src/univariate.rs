//! Derivative vectors of elementary functions of one variable.
//!
//! Convention: `f[k] = g⁽ᵏ⁾(x)`, the plain k-th derivative (not divided by
//! `k!`). The order is `f.len() - 1`, so `f` must hold at least one element.
//! These vectors are the outer-function input of
//! [`DsCompiler::compose`](crate::DsCompiler::compose).
//!
//! Closed forms are used throughout; functions whose derivatives are rational
//! in `g(x)` or in `x` evaluate a derivative polynomial that is updated in
//! place from one order to the next. Both the old and the new polynomial share
//! one buffer because consecutive orders have opposite parity.

use crate::Float;

#[inline]
fn count<F: Float>(n: usize) -> F {
    F::from_count(n as u64)
}

#[inline]
fn signed<F: Float>(n: i64) -> F {
    F::from_int(n)
}

/// Fill `f[start..]` with zeros.
#[inline]
fn clear_from<F: Float>(f: &mut [F], start: usize) {
    for fk in f.iter_mut().skip(start) {
        *fk = F::zero();
    }
}

// ══════════════════════════════════════════════
//  Exponential and logarithms
// ══════════════════════════════════════════════

/// `exp(x)`: every derivative equals the value.
#[inline]
pub fn exp<F: Float>(x: F, f: &mut [F]) {
    let e = x.exp();
    for fk in f.iter_mut() {
        *fk = e;
    }
}

/// `exp(x) - 1`, value computed without cancellation.
#[inline]
pub fn exp_m1<F: Float>(x: F, f: &mut [F]) {
    exp(x, f);
    f[0] = x.exp_m1();
}

/// Shared tail of the logarithms: `f[k] = (-1)^(k-1) (k-1)! · scale / u^k`.
#[inline]
fn log_tail<F: Float>(u: F, scale: F, f: &mut [F]) {
    let inv = F::one() / u;
    let mut xk = inv * scale;
    for k in 1..f.len() {
        f[k] = xk;
        xk = xk * (-count::<F>(k) * inv);
    }
}

/// `ln(x)`
#[inline]
pub fn ln<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.ln();
    log_tail(x, F::one(), f);
}

/// `ln(1 + x)`
#[inline]
pub fn ln_1p<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.ln_1p();
    log_tail(F::one() + x, F::one(), f);
}

/// `log10(x) = ln(x) / ln(10)`
#[inline]
pub fn log10<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.log10();
    log_tail(x, F::LN_10().recip(), f);
}

/// `a^x` for a constant base `a`: `f[k] = ln(a)^k · a^x`.
///
/// With `a = 0`: `0^0` gives value 1 and infinite derivatives of alternating
/// sign, `0^x` is NaN for `x < 0` and identically zero for `x > 0`.
pub fn pow_scalar_base<F: Float>(a: F, x: F, f: &mut [F]) {
    if a.is_zero() {
        if x.is_zero() {
            f[0] = F::one();
            let mut infinity = F::infinity();
            for fk in f.iter_mut().skip(1) {
                infinity = -infinity;
                *fk = infinity;
            }
        } else if x < F::zero() {
            for fk in f.iter_mut() {
                *fk = F::nan();
            }
        } else {
            clear_from(f, 0);
        }
        return;
    }

    f[0] = a.powf(x);
    let ln_a = a.ln();
    for k in 1..f.len() {
        f[k] = ln_a * f[k - 1];
    }
}

// ══════════════════════════════════════════════
//  Powers and roots
// ══════════════════════════════════════════════

/// `x^p` for a real exponent: `f[k] = p(p-1)⋯(p-k+1) · x^(p-k)`.
///
/// `p = 0` is the constant 1 everywhere. At `x = 0` each term is evaluated
/// on its own so vanishing falling factorials give exact zeros instead of
/// `0 · ∞`.
pub fn powf<F: Float>(x: F, p: F, f: &mut [F]) {
    let order = f.len() - 1;
    if p.is_zero() {
        f[0] = F::one();
        clear_from(f, 1);
        return;
    }

    if x.is_zero() {
        let mut coefficient = F::one();
        for k in 0..=order {
            f[k] = if coefficient.is_zero() {
                F::zero()
            } else {
                coefficient * x.powf(p - count(k))
            };
            coefficient = coefficient * (p - count(k));
        }
        return;
    }

    let mut xk = x.powf(p - count(order));
    for k in (1..=order).rev() {
        f[k] = xk;
        xk = xk * x;
    }
    f[0] = x.powf(p);

    let mut coefficient = p;
    for k in 1..=order {
        f[k] = f[k] * coefficient;
        coefficient = coefficient * (p - count(k));
    }
}

/// `x^n` for an integer exponent.
///
/// Positive powers have exactly zero derivatives beyond order `n`.
pub fn powi<F: Float>(x: F, n: i32, f: &mut [F]) {
    let order = f.len() - 1;
    if n == 0 {
        f[0] = F::one();
        clear_from(f, 1);
        return;
    }

    if n > 0 {
        let max_order = order.min(n as usize);
        let mut xk = x.powi(n - max_order as i32);
        for k in (1..=max_order).rev() {
            f[k] = xk;
            xk = xk * x;
        }
        f[0] = xk;
        clear_from(f, max_order + 1);
    } else {
        // x^(n - order), computed in i64 so n = i32::MIN does not overflow
        let exponent = order as i64 - n as i64;
        let inv = F::one() / x;
        let mut xk = match i32::try_from(exponent) {
            Ok(e) => inv.powi(e),
            Err(_) => inv.powf(signed(exponent)),
        };
        for k in (1..=order).rev() {
            f[k] = xk;
            xk = xk * x;
        }
        f[0] = xk;
    }

    let mut coefficient = signed::<F>(n as i64);
    for k in 1..=order {
        f[k] = f[k] * coefficient;
        coefficient = coefficient * signed::<F>(n as i64 - k as i64);
    }
}

/// `x^(1/n)`; `n = 2` and `n = 3` use `sqrt` and `cbrt` for the value.
///
/// `n` must be positive.
pub fn root_n<F: Float>(x: F, n: u32, f: &mut [F]) {
    let nf = count::<F>(n as usize);
    let mut xk = match n {
        2 => {
            f[0] = x.sqrt();
            (nf * f[0]).recip()
        }
        3 => {
            f[0] = x.cbrt();
            (nf * f[0] * f[0]).recip()
        }
        _ => {
            f[0] = x.powf(nf.recip());
            (nf * f[0].powi(n as i32 - 1)).recip()
        }
    };

    let n_recip = nf.recip();
    let x_recip = x.recip();
    for k in 1..f.len() {
        f[k] = xk;
        xk = xk * (x_recip * (n_recip - count(k)));
    }
}

// ══════════════════════════════════════════════
//  Circular functions
// ══════════════════════════════════════════════

/// Derivatives cycle with period four: `(s, c, -s, -c)`.
#[inline]
fn circular_cycle<F: Float>(first: F, second: F, f: &mut [F]) {
    f[0] = first;
    if f.len() > 1 {
        f[1] = second;
    }
    for k in 2..f.len() {
        f[k] = -f[k - 2];
    }
}

/// `sin(x)`
#[inline]
pub fn sin<F: Float>(x: F, f: &mut [F]) {
    let (s, c) = x.sin_cos();
    circular_cycle(s, c, f);
}

/// `cos(x)`
#[inline]
pub fn cos<F: Float>(x: F, f: &mut [F]) {
    let (s, c) = x.sin_cos();
    circular_cycle(c, -s, f);
}

/// `sin(x)` and `cos(x)` from one `sin_cos` evaluation.
#[inline]
pub fn sin_cos<F: Float>(x: F, sin: &mut [F], cos: &mut [F]) {
    let (s, c) = x.sin_cos();
    circular_cycle(s, c, sin);
    circular_cycle(c, -s, cos);
}

/// Derivatives of `tan` (`sign = 1`) or `tanh` (`sign = -1`) given `t = g(x)`.
///
/// `g⁽ⁿ⁾ = Pₙ(t)` with `P₀(t) = t` and `Pₙ(t) = (1 + sign·t²) P′ₙ₋₁(t)`,
/// a polynomial of degree `n + 1` with the parity of `n + 1`.
fn tangent_family<F: Float>(t: F, sign: i64, f: &mut [F]) {
    f[0] = t;
    let order = f.len() - 1;
    if order == 0 {
        return;
    }

    let mut p = vec![F::zero(); order + 2];
    p[1] = F::one();
    let t2 = t * t;
    for n in 1..=order {
        let mut v = F::zero();
        p[n + 1] = signed::<F>(sign * n as i64) * p[n];
        for k in (0..=n + 1).rev().step_by(2) {
            v = v * t2 + p[k];
            if k > 2 {
                p[k - 2] = count::<F>(k - 1) * p[k - 1] + signed::<F>(sign * (k as i64 - 3)) * p[k - 3];
            } else if k == 2 {
                p[0] = p[1];
            }
        }
        if n % 2 == 0 {
            v = v * t;
        }
        f[n] = v;
    }
}

/// `tan(x)`
pub fn tan<F: Float>(x: F, f: &mut [F]) {
    tangent_family(x.tan(), 1, f);
}

/// `asin(x)` (`sign = 1`) or `acos(x)` (`sign = -1`) derivatives of order ≥ 1.
///
/// `g⁽ⁿ⁾ = Pₙ(x) / (1 - x²)^((2n-1)/2)` with `P₁ = sign` and
/// `Pₙ(x) = (1 - x²) P′ₙ₋₁(x) + (2n - 3) x Pₙ₋₁(x)`.
fn inverse_sine_family<F: Float>(x: F, sign: F, f: &mut [F]) {
    let order = f.len() - 1;
    if order == 0 {
        return;
    }

    let mut p = vec![F::zero(); order];
    p[0] = sign;
    let x2 = x * x;
    let g = (F::one() - x2).recip();
    let mut coeff = g.sqrt();
    f[1] = coeff * p[0];
    for n in 2..=order {
        let mut v = F::zero();
        p[n - 1] = count::<F>(n - 1) * p[n - 2];
        for k in (0..n).rev().step_by(2) {
            v = v * x2 + p[k];
            if k > 2 {
                p[k - 2] = count::<F>(k - 1) * p[k - 1] + count::<F>(2 * n - k) * p[k - 3];
            } else if k == 2 {
                p[0] = p[1];
            }
        }
        if n % 2 == 0 {
            v = v * x;
        }
        coeff = coeff * g;
        f[n] = coeff * v;
    }
}

/// `asin(x)`
pub fn asin<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.asin();
    inverse_sine_family(x, F::one(), f);
}

/// `acos(x)`
pub fn acos<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.acos();
    inverse_sine_family(x, -F::one(), f);
}

/// `atan(x)` (`sign = -1`) or `atanh(x)` (`sign = 1`) derivatives of order ≥ 1.
///
/// `g⁽ⁿ⁾ = Qₙ(x) / (1 - sign·x²)ⁿ` with `Q₁ = 1` and
/// `Qₙ(x) = (1 - sign·x²) Q′ₙ₋₁(x) + 2 sign (n - 1) x Qₙ₋₁(x)`.
fn inverse_tangent_family<F: Float>(x: F, sign: i64, f: &mut [F]) {
    let order = f.len() - 1;
    if order == 0 {
        return;
    }

    let mut q = vec![F::zero(); order];
    q[0] = F::one();
    let x2 = x * x;
    let g = (F::one() - signed::<F>(sign) * x2).recip();
    let mut coeff = g;
    f[1] = coeff * q[0];
    for n in 2..=order {
        let mut v = F::zero();
        q[n - 1] = signed::<F>(sign * n as i64) * q[n - 2];
        for k in (0..n).rev().step_by(2) {
            v = v * x2 + q[k];
            if k > 2 {
                q[k - 2] = count::<F>(k - 1) * q[k - 1]
                    + signed::<F>(sign * (2 * n as i64 - k as i64 + 1)) * q[k - 3];
            } else if k == 2 {
                q[0] = q[1];
            }
        }
        if n % 2 == 0 {
            v = v * x;
        }
        coeff = coeff * g;
        f[n] = coeff * v;
    }
}

/// `atan(x)`
pub fn atan<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.atan();
    inverse_tangent_family(x, -1, f);
}

// ══════════════════════════════════════════════
//  Hyperbolic functions
// ══════════════════════════════════════════════

/// Derivatives alternate with period two: `(sh, ch)`.
#[inline]
fn hyperbolic_cycle<F: Float>(first: F, second: F, f: &mut [F]) {
    f[0] = first;
    if f.len() > 1 {
        f[1] = second;
    }
    for k in 2..f.len() {
        f[k] = f[k - 2];
    }
}

/// `sinh(x)`
#[inline]
pub fn sinh<F: Float>(x: F, f: &mut [F]) {
    hyperbolic_cycle(x.sinh(), x.cosh(), f);
}

/// `cosh(x)`
#[inline]
pub fn cosh<F: Float>(x: F, f: &mut [F]) {
    hyperbolic_cycle(x.cosh(), x.sinh(), f);
}

/// `sinh(x)` and `cosh(x)` together.
#[inline]
pub fn sinh_cosh<F: Float>(x: F, sinh: &mut [F], cosh: &mut [F]) {
    let (sh, ch) = (x.sinh(), x.cosh());
    hyperbolic_cycle(sh, ch, sinh);
    hyperbolic_cycle(ch, sh, cosh);
}

/// `tanh(x)`
pub fn tanh<F: Float>(x: F, f: &mut [F]) {
    tangent_family(x.tanh(), -1, f);
}

/// `asinh(x)` (`sign = 1`) or `acosh(x)` (`sign = -1`) derivatives of order ≥ 1.
///
/// `g⁽ⁿ⁾ = Pₙ(x) / (x² + sign)^((2n-1)/2)` with `P₁ = 1` and
/// `Pₙ(x) = (x² + sign) P′ₙ₋₁(x) - (2n - 3) x Pₙ₋₁(x)`.
fn inverse_hyperbolic_sine_family<F: Float>(x: F, sign: i64, f: &mut [F]) {
    let order = f.len() - 1;
    if order == 0 {
        return;
    }

    let s = signed::<F>(sign);
    let mut p = vec![F::zero(); order];
    p[0] = F::one();
    let x2 = x * x;
    let g = (x2 + s).recip();
    let mut coeff = g.sqrt();
    f[1] = coeff * p[0];
    for n in 2..=order {
        let mut v = F::zero();
        p[n - 1] = signed::<F>(1 - n as i64) * p[n - 2];
        for k in (0..n).rev().step_by(2) {
            v = v * x2 + p[k];
            if k > 2 {
                p[k - 2] = s * count::<F>(k - 1) * p[k - 1]
                    + signed::<F>(k as i64 - 2 * n as i64) * p[k - 3];
            } else if k == 2 {
                p[0] = s * p[1];
            }
        }
        if n % 2 == 0 {
            v = v * x;
        }
        coeff = coeff * g;
        f[n] = coeff * v;
    }
}

/// `asinh(x)`
pub fn asinh<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.asinh();
    inverse_hyperbolic_sine_family(x, 1, f);
}

/// `acosh(x)`, defined for `x ≥ 1`.
pub fn acosh<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.acosh();
    inverse_hyperbolic_sine_family(x, -1, f);
}

/// `atanh(x)`, defined for `|x| < 1`.
pub fn atanh<F: Float>(x: F, f: &mut [F]) {
    f[0] = x.atanh();
    inverse_tangent_family(x, 1, f);
}
