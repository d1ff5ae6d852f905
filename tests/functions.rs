mod common;

use std::f64::consts::{LN_10, PI};

use approx::assert_relative_eq;
use common::{assert_structures_eq, constant, generic, slot, variable};
use dscompiler::DsCompiler;

const TOL: f64 = 1e-10;

type Unary = fn(&DsCompiler, &[f64], &mut [f64]);

fn apply(c: &DsCompiler, g: Unary, a: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; c.size()];
    g(c, a, &mut out);
    out
}

fn product(c: &DsCompiler, a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; c.size()];
    c.multiply(a, b, &mut out);
    out
}

#[test]
fn pythagorean_identity() {
    let c = DsCompiler::get(2, 4);
    let a = generic(&c, 0.7);
    let mut s = vec![0.0; c.size()];
    let mut co = vec![0.0; c.size()];
    c.sin_cos(&a, &mut s, &mut co);
    let mut sum = product(&c, &s, &s);
    c.add_assign(&mut sum, &product(&c, &co, &co));
    assert_structures_eq(&sum, &constant(&c, 1.0), TOL);

    assert_eq!(s, apply(&c, DsCompiler::sin, &a));
    assert_eq!(co, apply(&c, DsCompiler::cos, &a));
}

#[test]
fn hyperbolic_identity() {
    let c = DsCompiler::get(2, 3);
    let a = generic(&c, -0.4);
    let mut sh = vec![0.0; c.size()];
    let mut ch = vec![0.0; c.size()];
    c.sinh_cosh(&a, &mut sh, &mut ch);
    let mut diff = product(&c, &ch, &ch);
    c.subtract_assign(&mut diff, &product(&c, &sh, &sh));
    assert_structures_eq(&diff, &constant(&c, 1.0), TOL);

    assert_eq!(sh, apply(&c, DsCompiler::sinh, &a));
    assert_eq!(ch, apply(&c, DsCompiler::cosh, &a));
}

#[test]
fn tan_is_sin_over_cos() {
    let c = DsCompiler::get(2, 4);
    let a = generic(&c, 0.9);
    let mut quotient = vec![0.0; c.size()];
    c.divide(
        &apply(&c, DsCompiler::sin, &a),
        &apply(&c, DsCompiler::cos, &a),
        &mut quotient,
    );
    assert_structures_eq(&apply(&c, DsCompiler::tan, &a), &quotient, TOL);
}

#[test]
fn tanh_is_sinh_over_cosh() {
    let c = DsCompiler::get(3, 3);
    let a = generic(&c, 0.6);
    let mut quotient = vec![0.0; c.size()];
    c.divide(
        &apply(&c, DsCompiler::sinh, &a),
        &apply(&c, DsCompiler::cosh, &a),
        &mut quotient,
    );
    assert_structures_eq(&apply(&c, DsCompiler::tanh, &a), &quotient, TOL);
}

#[test]
fn inverse_functions_round_trip() {
    let c = DsCompiler::get(2, 5);
    let pairs: [(Unary, Unary, f64); 7] = [
        (DsCompiler::sin, DsCompiler::asin, 0.3),
        (DsCompiler::cos, DsCompiler::acos, 1.2),
        (DsCompiler::tan, DsCompiler::atan, -0.8),
        (DsCompiler::sinh, DsCompiler::asinh, 0.5),
        (DsCompiler::cosh, DsCompiler::acosh, 1.1),
        (DsCompiler::tanh, DsCompiler::atanh, -0.7),
        (DsCompiler::exp, DsCompiler::ln, 1.3),
    ];
    for (forward, inverse, value) in pairs {
        let a = generic(&c, value);
        let back = apply(&c, inverse, &apply(&c, forward, &a));
        assert_structures_eq(&back, &a, TOL);
    }
}

#[test]
fn roots_undo_powers() {
    let c = DsCompiler::get(2, 4);
    let a = generic(&c, 1.8);

    let mut root = vec![0.0; c.size()];
    c.sqrt(&a, &mut root);
    assert_structures_eq(&product(&c, &root, &root), &a, TOL);

    c.cbrt(&a, &mut root);
    let mut cube = vec![0.0; c.size()];
    c.powi(&root, 3, &mut cube);
    assert_structures_eq(&cube, &a, TOL);

    c.root_n(&a, 5, &mut root);
    let mut fifth = vec![0.0; c.size()];
    c.powi(&root, 5, &mut fifth);
    assert_structures_eq(&fifth, &a, TOL);
}

#[test]
fn integer_powers_match_products() {
    let c = DsCompiler::get(3, 3);
    let a = generic(&c, -1.3);
    let a2 = product(&c, &a, &a);
    let a3 = product(&c, &a2, &a);

    let mut p = vec![0.0; c.size()];
    c.powi(&a, 3, &mut p);
    assert_structures_eq(&p, &a3, TOL);

    c.powi(&a, 0, &mut p);
    assert_eq!(p, constant(&c, 1.0));

    c.powi(&a, -2, &mut p);
    let mut reciprocal = vec![0.0; c.size()];
    c.divide(&constant(&c, 1.0), &a2, &mut reciprocal);
    assert_structures_eq(&p, &reciprocal, TOL);
}

#[test]
fn negative_integer_powers() {
    let c = DsCompiler::get(1, 3);
    let x = variable(&c, 0, 2.0);
    let mut p = vec![0.0; c.size()];
    c.powi(&x, -1, &mut p);
    assert_structures_eq(&p, &[0.5, -0.25, 0.25, -0.375], 1e-15);

    let c = DsCompiler::get(1, 1);
    let mut p = vec![0.0; c.size()];
    c.powi(&variable(&c, 0, 1.0), i32::MIN, &mut p);
    assert_eq!(p, [1.0, i32::MIN as f64]);
}

#[test]
fn real_powers_match_exp_ln() {
    let c = DsCompiler::get(2, 4);
    let x = generic(&c, 2.2);
    let mut ln_x = vec![0.0; c.size()];
    c.ln(&x, &mut ln_x);

    for p in [2.5, -0.75, 3.0] {
        let mut scaled = ln_x.clone();
        scaled.iter_mut().for_each(|v| *v *= p);
        let expected = apply(&c, DsCompiler::exp, &scaled);
        let mut actual = vec![0.0; c.size()];
        c.powf(&x, p, &mut actual);
        assert_structures_eq(&actual, &expected, TOL);
    }

    let mut one = vec![0.0; c.size()];
    c.powf(&x, 0.0, &mut one);
    assert_eq!(one, constant(&c, 1.0));
}

#[test]
fn real_power_of_zero_is_exact() {
    // x² through powf at x = 0
    let c = DsCompiler::get(1, 3);
    let x = variable(&c, 0, 0.0);
    let mut out = vec![0.0; c.size()];
    c.powf(&x, 2.0, &mut out);
    assert_eq!(out, [0.0, 0.0, 2.0, 0.0]);
}

#[test]
fn two_structure_power() {
    let c = DsCompiler::get(2, 3);
    let x = generic(&c, 1.6);
    let mut y = generic(&c, 0.8);
    y.reverse();
    y[0] = 0.8;

    let mut actual = vec![0.0; c.size()];
    c.pow(&x, &y, &mut actual);

    let mut ln_x = vec![0.0; c.size()];
    c.ln(&x, &mut ln_x);
    let expected = apply(&c, DsCompiler::exp, &product(&c, &y, &ln_x));
    assert_structures_eq(&actual, &expected, TOL);
    assert_eq!(actual[0], 1.6f64.powf(0.8));
}

#[test]
fn scalar_base_power() {
    let c = DsCompiler::get(2, 3);
    let x = generic(&c, 0.4);
    let mut actual = vec![0.0; c.size()];
    c.pow_scalar_base(3.0, &x, &mut actual);

    let mut scaled = x.clone();
    scaled.iter_mut().for_each(|v| *v *= 3.0f64.ln());
    assert_structures_eq(&actual, &apply(&c, DsCompiler::exp, &scaled), TOL);
}

#[test]
fn zero_base_power() {
    let c = DsCompiler::get(1, 2);
    let mut out = vec![0.0; c.size()];

    c.pow_scalar_base(0.0, &variable(&c, 0, 1.5), &mut out);
    assert_eq!(out, [0.0, 0.0, 0.0]);

    c.pow_scalar_base(0.0, &variable(&c, 0, -1.0), &mut out);
    assert!(out.iter().all(|v| v.is_nan()));

    c.pow_scalar_base(0.0, &variable(&c, 0, 0.0), &mut out);
    assert_eq!(out[0], 1.0);
    assert_eq!(out[1], f64::NEG_INFINITY);
}

#[test]
fn logarithm_variants() {
    let c = DsCompiler::get(2, 3);
    let a = generic(&c, 0.35);
    let ln_a = apply(&c, DsCompiler::ln, &a);

    let mut scaled = apply(&c, DsCompiler::log10, &a);
    scaled.iter_mut().for_each(|v| *v *= LN_10);
    assert_structures_eq(&scaled, &ln_a, TOL);

    let mut one_plus = a.clone();
    one_plus[0] += 1.0;
    assert_structures_eq(
        &apply(&c, DsCompiler::ln_1p, &a),
        &apply(&c, DsCompiler::ln, &one_plus),
        TOL,
    );

    let mut e = apply(&c, DsCompiler::exp_m1, &a);
    e[0] += 1.0;
    assert_structures_eq(&e, &apply(&c, DsCompiler::exp, &a), TOL);
}

#[test]
fn small_arguments_keep_precision() {
    let c = DsCompiler::get(1, 1);
    let tiny = [1e-18, 1.0];
    assert_eq!(apply(&c, DsCompiler::exp_m1, &tiny)[0], 1e-18);
    assert_eq!(apply(&c, DsCompiler::ln_1p, &tiny)[0], 1e-18);
}

#[test]
fn exponential_of_product_partials() {
    // f(x, y) = exp(x·y) at (0.5, 2)
    let c = DsCompiler::get(2, 3);
    let x = variable(&c, 0, 0.5);
    let y = variable(&c, 1, 2.0);
    let f = apply(&c, DsCompiler::exp, &product(&c, &x, &y));
    let e = 1.0f64.exp();

    assert_relative_eq!(slot(&c, &f, &[0, 0]), e, max_relative = 1e-14);
    assert_relative_eq!(slot(&c, &f, &[1, 0]), 2.0 * e, max_relative = 1e-14);
    assert_relative_eq!(slot(&c, &f, &[0, 1]), 0.5 * e, max_relative = 1e-14);
    assert_relative_eq!(slot(&c, &f, &[2, 0]), 4.0 * e, max_relative = 1e-14);
    assert_relative_eq!(slot(&c, &f, &[1, 1]), 2.0 * e, max_relative = 1e-14);
    // ∂²x∂y = (2y + x·y²)·e^(xy)
    assert_relative_eq!(slot(&c, &f, &[2, 1]), 6.0 * e, max_relative = 1e-14);
    assert_relative_eq!(slot(&c, &f, &[0, 3]), 0.125 * e, max_relative = 1e-14);
}

#[test]
fn atan2_matches_atan_of_ratio() {
    let c = DsCompiler::get(2, 3);
    let mut x = generic(&c, 1.4);
    x.reverse();
    x[0] = 1.4;
    let y = generic(&c, -0.6);

    let mut ratio = vec![0.0; c.size()];
    c.divide(&y, &x, &mut ratio);
    let expected = apply(&c, DsCompiler::atan, &ratio);
    let mut actual = vec![0.0; c.size()];
    c.atan2(&y, &x, &mut actual);
    assert_structures_eq(&actual, &expected, TOL);

    // left half-plane: same derivatives, value shifted by π
    x.iter_mut().for_each(|v| *v = -*v);
    let mut y_neg = y.clone();
    y_neg.iter_mut().for_each(|v| *v = -*v);
    c.atan2(&y_neg, &x, &mut actual);
    assert_relative_eq!(actual[0], expected[0] + PI, epsilon = 1e-14);
    assert_structures_eq(&actual[1..], &expected[1..], TOL);
}

#[test]
fn atan2_gradient() {
    let c = DsCompiler::get(2, 1);
    for (yv, xv) in [(2.0, 1.0), (2.0, -1.0), (-2.0, -1.0)] {
        let y = variable(&c, 0, yv);
        let x = variable(&c, 1, xv);
        let mut out = vec![0.0; c.size()];
        c.atan2(&y, &x, &mut out);
        let r2 = xv * xv + yv * yv;
        assert_eq!(out[0], f64::atan2(yv, xv));
        assert_relative_eq!(slot(&c, &out, &[1, 0]), xv / r2, epsilon = 1e-14);
        assert_relative_eq!(slot(&c, &out, &[0, 1]), -yv / r2, epsilon = 1e-14);
    }
}

#[test]
fn atan2_value_matches_scalar_special_cases() {
    let c = DsCompiler::get(1, 1);
    let specials = [0.0, -0.0, 1.0, -1.0, f64::INFINITY, f64::NEG_INFINITY];
    for &yv in &specials {
        for &xv in &specials {
            let mut out = [0.0; 2];
            c.atan2(&[yv, 0.0], &[xv, 0.0], &mut out);
            let expected = yv.atan2(xv);
            assert_eq!(
                out[0].to_bits(),
                expected.to_bits(),
                "atan2({yv}, {xv}) gave {} instead of {expected}",
                out[0]
            );
        }
    }
}

#[test]
fn order_zero_is_plain_evaluation() {
    let c = DsCompiler::get(3, 0);
    let a = [0.25];
    assert_eq!(apply(&c, DsCompiler::sin, &a), [0.25f64.sin()]);
    assert_eq!(apply(&c, DsCompiler::atan, &a), [0.25f64.atan()]);
    assert_eq!(apply(&c, DsCompiler::acosh, &[2.0]), [2.0f64.acosh()]);
}

#[test]
fn unary_results_land_at_slice_offset() {
    let c = DsCompiler::get(1, 2);
    let buffer = [7.0, 7.0, 0.5, 1.0, 0.0];
    let mut out = [0.0; 5];
    c.exp(&buffer[2..], &mut out[1..]);
    let e = 0.5f64.exp();
    assert_eq!(out, [0.0, e, e, e, 0.0]);
}
