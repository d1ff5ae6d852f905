//! The derivative-structure compiler: `DsCompiler`.
//!
//! A derivative structure for `P` free parameters truncated at order `N` is a
//! flat array whose slot 0 holds the function value and whose other slots hold
//! every mixed partial derivative of total order `1..=N`. The layout follows
//! Dan Kalman's recursive multivariate automatic differentiation: the
//! structure for `(P, N)` is the structure for `(P-1, N)` (all terms that do
//! not differentiate parameter `P`) followed by the derivative with respect
//! to parameter `P` of a `(P, N-1)` structure.
//!
//! `DsCompiler` precomputes, once per `(P, N)`, the tables that turn that
//! recursion into flat loops: slot ↔ order-vector translation, the embedding
//! of the order `N-1` sub-structure, and the expanded Leibniz and Faà di Bruno
//! sums used by [`multiply`](DsCompiler::multiply) and
//! [`compose`](DsCompiler::compose). Table construction lives in
//! `indirection.rs`, the arithmetic in `kernel.rs` and `functions.rs`.

use std::sync::Arc;

use crate::error::DsError;
use crate::registry;

/// One term of the generalized Leibniz rule for a product slot:
/// `coefficient · lhs[lhs_index] · rhs[rhs_index]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultTerm {
    pub coefficient: u64,
    pub lhs_index: usize,
    pub rhs_index: usize,
}

/// One term of Faà di Bruno's formula for a composition slot:
/// `coefficient · f⁽ᵒʳᵈᵉʳ⁾(g₀) · Π g[i] for i in inner`.
///
/// `inner` is kept sorted so equal products compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompTerm {
    pub coefficient: u64,
    pub order: usize,
    pub inner: Vec<usize>,
}

/// Precomputed indirection tables for one `(parameters, order)` signature.
///
/// Immutable once built. Obtain shared instances through [`DsCompiler::get`]
/// or a [`CompilerRegistry`](crate::CompilerRegistry); every kernel method
/// operates on caller-owned slices of at least [`size`](DsCompiler::size)
/// elements.
///
/// With the `serde` feature, deserialized tables are checked against a fresh
/// build for their `(parameters, order)` and rejected if they differ.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CompilerTables"))]
pub struct DsCompiler {
    pub(crate) parameters: usize,
    pub(crate) order: usize,
    /// `sizes[p][o]`: slot count for `p` parameters at order `o`.
    pub(crate) sizes: Vec<Vec<usize>>,
    /// Order vector of every slot.
    pub(crate) derivatives_indirection: Vec<Vec<usize>>,
    /// Slot of each order `N-1` sub-structure entry inside this structure.
    pub(crate) lower_indirection: Vec<usize>,
    pub(crate) mult_indirection: Vec<Vec<MultTerm>>,
    pub(crate) comp_indirection: Vec<Vec<CompTerm>>,
}

impl DsCompiler {
    /// Shared compiler for `parameters` free parameters at derivation `order`,
    /// from the process-wide registry.
    ///
    /// The first request for a signature builds it (and every smaller one it
    /// depends on); later requests are a table lookup.
    pub fn get(parameters: usize, order: usize) -> Arc<DsCompiler> {
        registry::global().get(parameters, order)
    }

    /// Number of free parameters `P`.
    #[inline]
    pub fn free_parameters(&self) -> usize {
        self.parameters
    }

    /// Derivation order `N`.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of slots in a derivative structure of this signature.
    #[inline]
    pub fn size(&self) -> usize {
        self.sizes[self.parameters][self.order]
    }

    /// The full size table: `sizes()[p][o]` for `p ≤ P`, `o ≤ N`.
    pub fn sizes(&self) -> &[Vec<usize>] {
        &self.sizes
    }

    /// Embedding of the order `N-1` structure: entry `i` is the slot, in this
    /// structure, of slot `i` of the `(P, N-1)` structure.
    pub fn lower_indirection(&self) -> &[usize] {
        &self.lower_indirection
    }

    /// Leibniz terms producing slot `index` of a product.
    pub fn mult_terms(&self, index: usize) -> &[MultTerm] {
        &self.mult_indirection[index]
    }

    /// Faà di Bruno terms producing slot `index` of a composition.
    pub fn comp_terms(&self, index: usize) -> &[CompTerm] {
        &self.comp_indirection[index]
    }

    /// Slot holding the partial derivative with the given per-parameter orders.
    ///
    /// `orders[k]` is the derivation order with respect to parameter `k`.
    /// `[0, .., 0]` is the value slot, always `0`.
    pub fn partial_derivative_index(&self, orders: &[usize]) -> Result<usize, DsError> {
        if orders.len() != self.parameters {
            return Err(DsError::ShapeMismatch {
                expected: self.parameters,
                actual: orders.len(),
            });
        }
        checked_index(self.order, &self.sizes, orders)
    }

    /// Per-parameter derivation orders of slot `index`; inverse of
    /// [`partial_derivative_index`](Self::partial_derivative_index).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    pub fn partial_derivative_orders(&self, index: usize) -> &[usize] {
        &self.derivatives_indirection[index]
    }

    /// Total derivation order of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    pub fn partial_derivative_orders_sum(&self, index: usize) -> usize {
        self.derivatives_indirection[index].iter().sum()
    }

    /// Check that `other` lays out derivative structures identically.
    pub fn check_compatibility(&self, other: &DsCompiler) -> Result<(), DsError> {
        if self.parameters != other.parameters || self.order != other.order {
            return Err(DsError::IncompatibleCompilers {
                expected: (self.parameters, self.order),
                actual: (other.parameters, other.order),
            });
        }
        Ok(())
    }

    /// Entry check for kernel slices.
    #[inline]
    #[track_caller]
    pub(crate) fn expect_len<F>(&self, name: &str, values: &[F]) {
        assert!(
            values.len() >= self.size(),
            "{name} holds {} values but a derivative structure with {} parameters at order {} needs {}",
            values.len(),
            self.parameters,
            self.order,
            self.size()
        );
    }
}

/// Unchecked wire form of [`DsCompiler`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CompilerTables {
    parameters: usize,
    order: usize,
    sizes: Vec<Vec<usize>>,
    derivatives_indirection: Vec<Vec<usize>>,
    lower_indirection: Vec<usize>,
    mult_indirection: Vec<Vec<MultTerm>>,
    comp_indirection: Vec<Vec<CompTerm>>,
}

#[cfg(feature = "serde")]
impl TryFrom<CompilerTables> for DsCompiler {
    type Error = DsError;

    fn try_from(tables: CompilerTables) -> Result<Self, DsError> {
        let invalid = DsError::InvalidTables {
            parameters: tables.parameters,
            order: tables.order,
        };
        // the slot count must be C(P + N, N) before anything gets built
        let size = tables.parameters.checked_add(tables.order).and_then(|total| {
            (0..tables.order)
                .try_fold(1usize, |acc, k| acc.checked_mul(total - k).map(|v| v / (k + 1)))
        });
        if size != Some(tables.derivatives_indirection.len()) {
            return Err(invalid);
        }

        let candidate = DsCompiler {
            parameters: tables.parameters,
            order: tables.order,
            sizes: tables.sizes,
            derivatives_indirection: tables.derivatives_indirection,
            lower_indirection: tables.lower_indirection,
            mult_indirection: tables.mult_indirection,
            comp_indirection: tables.comp_indirection,
        };
        if candidate != *DsCompiler::get(candidate.parameters, candidate.order) {
            return Err(invalid);
        }
        Ok(candidate)
    }
}

/// Validate the order sum, then walk the size table.
pub(crate) fn checked_index(
    order: usize,
    sizes: &[Vec<usize>],
    orders: &[usize],
) -> Result<usize, DsError> {
    let mut sum = 0usize;
    for &d in orders.iter().rev() {
        sum = sum.saturating_add(d);
        if sum > order {
            return Err(DsError::OrderExceeded { sum, order });
        }
    }
    Ok(walk_index(order, sizes, orders))
}

/// Slot of `orders` in a structure with the given size table.
///
/// Iterative form of Kalman's indexing theorem: every derivation with respect
/// to parameter `i` skips the value part of the current sub-structure (an
/// `(i, m)` block) and descends into its derivative part at order `m - 1`.
/// Callers guarantee `orders.iter().sum() <= order`.
pub(crate) fn walk_index(order: usize, sizes: &[Vec<usize>], orders: &[usize]) -> usize {
    let mut index = 0;
    let mut m = order;
    for (i, &d) in orders.iter().enumerate().rev() {
        for _ in 0..d {
            index += sizes[i][m];
            m -= 1;
        }
    }
    index
}

/// Move slot `index` from one numbering to another by way of its order
/// vector, truncated or zero-padded to `dest_parameters` entries.
pub(crate) fn convert_index(
    index: usize,
    src_orders: &[Vec<usize>],
    dest_parameters: usize,
    dest_order: usize,
    dest_sizes: &[Vec<usize>],
) -> usize {
    let src = &src_orders[index];
    let mut orders = vec![0; dest_parameters];
    let n = src.len().min(dest_parameters);
    orders[..n].copy_from_slice(&src[..n]);
    walk_index(dest_order, dest_sizes, &orders)
}
