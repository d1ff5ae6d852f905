#![allow(dead_code)]

use approx::assert_relative_eq;
use dscompiler::DsCompiler;

/// Structure of free parameter `k` taking `value`: value slot plus a unit
/// first derivative with respect to `k`.
pub fn variable(c: &DsCompiler, k: usize, value: f64) -> Vec<f64> {
    let mut v = vec![0.0; c.size()];
    v[0] = value;
    if c.order() > 0 {
        let mut orders = vec![0; c.free_parameters()];
        orders[k] = 1;
        v[c.partial_derivative_index(&orders).unwrap()] = 1.0;
    }
    v
}

/// Structure of a constant.
pub fn constant(c: &DsCompiler, value: f64) -> Vec<f64> {
    let mut v = vec![0.0; c.size()];
    v[0] = value;
    v
}

/// A fixed, non-trivial structure around `value`.
///
/// Every array is the jet of some polynomial, so identities hold slot by slot
/// for this one as well.
pub fn generic(c: &DsCompiler, value: f64) -> Vec<f64> {
    let mut v: Vec<f64> = (0..c.size())
        .map(|i| ((i * 7 % 5) as f64 - 2.0) * 0.15)
        .collect();
    v[0] = value;
    v
}

/// Slot for the given per-parameter orders.
pub fn slot(c: &DsCompiler, ds: &[f64], orders: &[usize]) -> f64 {
    ds[c.partial_derivative_index(orders).unwrap()]
}

pub fn assert_structures_eq(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = tol, max_relative = tol);
    }
}
