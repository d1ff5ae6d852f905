//! Construction of the `(P, N)` indirection tables from `(P-1, N)` and `(P, N-1)`.
//!
//! The "value compiler" `(P-1, N)` covers every slot that does not
//! differentiate the last parameter; its slots keep the same numbering in
//! `(P, N)`, so its tables are reused as they are. The "derivative compiler"
//! `(P, N-1)` describes the sub-structure that gets differentiated once more
//! with respect to the last parameter; its tables are differentiated term by
//! term and renumbered into `(P, N)`.

use crate::compiler::{convert_index, walk_index, CompTerm, DsCompiler, MultTerm};

impl DsCompiler {
    /// Build the tables for `(parameters, order)`.
    ///
    /// `value` must be the `(parameters - 1, order)` compiler when
    /// `parameters > 0`, and `derivative` the `(parameters, order - 1)`
    /// compiler when `order > 0`. With `parameters == 0` or `order == 0` the
    /// structure has a single slot and neither is consulted beyond sizes.
    pub(crate) fn compile(
        parameters: usize,
        order: usize,
        value: Option<&DsCompiler>,
        derivative: Option<&DsCompiler>,
    ) -> DsCompiler {
        debug_assert!(parameters == 0 || value.map(|v| (v.parameters, v.order)) == Some((parameters - 1, order)));
        debug_assert!(order == 0 || derivative.map(|d| (d.parameters, d.order)) == Some((parameters, order - 1)));

        let sizes = compile_sizes(parameters, order, value);

        match (value, derivative) {
            (Some(value), Some(derivative)) if parameters > 0 && order > 0 => {
                let derivatives_indirection =
                    compile_derivatives_indirection(parameters, value, derivative);
                let lower_indirection = compile_lower_indirection(order, value, derivative);
                let mult_indirection =
                    compile_multiplication_indirection(value, derivative, &lower_indirection);
                let comp_indirection = compile_composition_indirection(
                    parameters,
                    order,
                    value,
                    derivative,
                    &sizes,
                    &derivatives_indirection,
                );
                DsCompiler {
                    parameters,
                    order,
                    sizes,
                    derivatives_indirection,
                    lower_indirection,
                    mult_indirection,
                    comp_indirection,
                }
            }
            _ => DsCompiler {
                parameters,
                order,
                sizes,
                derivatives_indirection: vec![vec![0; parameters]],
                lower_indirection: vec![0],
                mult_indirection: vec![vec![MultTerm {
                    coefficient: 1,
                    lhs_index: 0,
                    rhs_index: 0,
                }]],
                comp_indirection: vec![vec![CompTerm {
                    coefficient: 1,
                    order: 0,
                    inner: Vec::new(),
                }]],
            },
        }
    }
}

/// `sizes[p][o]` for `p ≤ parameters`, `o ≤ order`.
///
/// Rows `0..parameters` come from the value compiler; the last row follows
/// `sizes[P][k] = sizes[P][k-1] + sizes[P-1][k]`.
fn compile_sizes(parameters: usize, order: usize, value: Option<&DsCompiler>) -> Vec<Vec<usize>> {
    let Some(value) = value else {
        return vec![vec![1; order + 1]];
    };

    let mut sizes = value.sizes.clone();
    let previous = &value.sizes[parameters - 1];
    let mut row = Vec::with_capacity(order + 1);
    row.push(1);
    for k in 1..=order {
        row.push(row[k - 1] + previous[k]);
    }
    sizes.push(row);
    sizes
}

/// Order vectors: value-part vectors with a trailing zero, then the
/// derivative-part vectors with the last parameter's order bumped.
fn compile_derivatives_indirection(
    parameters: usize,
    value: &DsCompiler,
    derivative: &DsCompiler,
) -> Vec<Vec<usize>> {
    let v_size = value.derivatives_indirection.len();
    let d_size = derivative.derivatives_indirection.len();
    let mut indirection = Vec::with_capacity(v_size + d_size);

    for orders in &value.derivatives_indirection {
        let mut row = Vec::with_capacity(parameters);
        row.extend_from_slice(orders);
        row.push(0);
        indirection.push(row);
    }
    for orders in &derivative.derivatives_indirection {
        let mut row = orders.clone();
        row[parameters - 1] += 1;
        indirection.push(row);
    }

    indirection
}

/// Embedding of the `(P, N-1)` structure inside `(P, N)`.
fn compile_lower_indirection(
    order: usize,
    value: &DsCompiler,
    derivative: &DsCompiler,
) -> Vec<usize> {
    if order <= 1 {
        return vec![0];
    }

    let v_size = value.size();
    let mut lower = Vec::with_capacity(value.lower_indirection.len() + derivative.lower_indirection.len());
    lower.extend_from_slice(&value.lower_indirection);
    lower.extend(derivative.lower_indirection.iter().map(|&i| v_size + i));
    lower
}

/// Leibniz tables.
///
/// A derivative-part slot `v_size + i` is `∂ₚ` of slot `i` of `(P, N-1)`, so
/// each of its terms `c·f[l]·g[r]` becomes `c·f[l]·∂ₚg[r] + c·∂ₚf[l]·g[r]`.
/// Undifferentiated factors move through `lower`; differentiated ones land
/// in the derivative part at `v_size + index`.
fn compile_multiplication_indirection(
    value: &DsCompiler,
    derivative: &DsCompiler,
    lower: &[usize],
) -> Vec<Vec<MultTerm>> {
    let v_size = value.mult_indirection.len();
    let mut indirection = Vec::with_capacity(v_size + derivative.mult_indirection.len());
    indirection.extend(value.mult_indirection.iter().cloned());

    for row in &derivative.mult_indirection {
        let mut combined: Vec<MultTerm> = Vec::with_capacity(2 * row.len());
        for term in row {
            merge_mult(
                &mut combined,
                MultTerm {
                    coefficient: term.coefficient,
                    lhs_index: lower[term.lhs_index],
                    rhs_index: v_size + term.rhs_index,
                },
            );
            merge_mult(
                &mut combined,
                MultTerm {
                    coefficient: term.coefficient,
                    lhs_index: v_size + term.lhs_index,
                    rhs_index: lower[term.rhs_index],
                },
            );
        }
        combined.retain(|t| t.coefficient != 0);
        indirection.push(combined);
    }

    indirection
}

fn merge_mult(terms: &mut Vec<MultTerm>, term: MultTerm) {
    match terms
        .iter_mut()
        .find(|t| t.lhs_index == term.lhs_index && t.rhs_index == term.rhs_index)
    {
        Some(existing) => existing.coefficient += term.coefficient,
        None => terms.push(term),
    }
}

/// Faà di Bruno tables.
///
/// Each term `c · f⁽ᵏ⁾(g) · g[l₁] ⋯ g[lₘ]` of a `(P, N-1)` slot is
/// differentiated with respect to the last parameter:
/// - the outer factor gives `c · f⁽ᵏ⁺¹⁾(g) · g[l₁] ⋯ g[lₘ] · ∂ₚg`,
/// - each inner factor `g[lⱼ]` gives the same product with `g[lⱼ]` replaced
///   by `∂ₚg[lⱼ]`.
///
/// Inner indices are renumbered from `(P, N-1)` to `(P, N)` and sorted.
fn compile_composition_indirection(
    parameters: usize,
    order: usize,
    value: &DsCompiler,
    derivative: &DsCompiler,
    sizes: &[Vec<usize>],
    derivatives_indirection: &[Vec<usize>],
) -> Vec<Vec<CompTerm>> {
    let v_size = value.comp_indirection.len();
    let mut indirection = Vec::with_capacity(v_size + derivative.comp_indirection.len());
    indirection.extend(value.comp_indirection.iter().cloned());

    // slot of ∂ₚg
    let mut unit = vec![0; parameters];
    unit[parameters - 1] = 1;
    let last_first_derivative = walk_index(order, sizes, &unit);

    let mut orders = vec![0; parameters];
    for row in &derivative.comp_indirection {
        let mut combined: Vec<CompTerm> = Vec::new();
        for term in row {
            let converted: Vec<usize> = term
                .inner
                .iter()
                .map(|&i| {
                    convert_index(
                        i,
                        &derivative.derivatives_indirection,
                        parameters,
                        order,
                        sizes,
                    )
                })
                .collect();

            let mut inner = Vec::with_capacity(converted.len() + 1);
            inner.extend_from_slice(&converted);
            inner.push(last_first_derivative);
            inner.sort_unstable();
            merge_comp(
                &mut combined,
                CompTerm {
                    coefficient: term.coefficient,
                    order: term.order + 1,
                    inner,
                },
            );

            for l in 0..converted.len() {
                let mut inner = converted.clone();
                orders.copy_from_slice(&derivatives_indirection[inner[l]]);
                orders[parameters - 1] += 1;
                inner[l] = walk_index(order, sizes, &orders);
                inner.sort_unstable();
                merge_comp(
                    &mut combined,
                    CompTerm {
                        coefficient: term.coefficient,
                        order: term.order,
                        inner,
                    },
                );
            }
        }
        combined.retain(|t| t.coefficient != 0);
        indirection.push(combined);
    }

    indirection
}

fn merge_comp(terms: &mut Vec<CompTerm>, term: CompTerm) {
    match terms
        .iter_mut()
        .find(|t| t.order == term.order && t.inner == term.inner)
    {
        Some(existing) => existing.coefficient += term.coefficient,
        None => terms.push(term),
    }
}
