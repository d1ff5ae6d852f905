//! Memoization of compilers by `(parameters, order)`.
//!
//! The cache is a 2-D table `compilers[p][o]` behind an `Arc`. Lookups clone
//! the current `Arc` and read it without holding any lock. A miss builds a
//! bigger copy of the table outside the lock and publishes it with a single
//! pointer swap, so a reader sees either the old table or the complete new one.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{debug, trace};

use crate::compiler::DsCompiler;

/// Process-wide registry behind [`DsCompiler::get`].
static GLOBAL: OnceLock<CompilerRegistry> = OnceLock::new();

pub(crate) fn global() -> &'static CompilerRegistry {
    GLOBAL.get_or_init(CompilerRegistry::new)
}

#[derive(Default)]
struct CompilerTable {
    /// `compilers[p][o]`; every row has the same length.
    compilers: Vec<Vec<Option<Arc<DsCompiler>>>>,
}

impl CompilerTable {
    fn lookup(&self, parameters: usize, order: usize) -> Option<&Arc<DsCompiler>> {
        self.compilers.get(parameters)?.get(order)?.as_ref()
    }

    fn shape(&self) -> (usize, usize) {
        (
            self.compilers.len(),
            self.compilers.first().map_or(0, Vec::len),
        )
    }

    /// Copy of `self` covering `(parameters, order)`, with every cell that
    /// `(parameters, order)` transitively depends on filled in.
    ///
    /// Cells are built by increasing `p + o`, so both `(p-1, o)` and
    /// `(p, o-1)` are present when `(p, o)` is compiled.
    fn grow(&self, parameters: usize, order: usize) -> (CompilerTable, Arc<DsCompiler>) {
        let (rows, cols) = self.shape();
        let rows = rows.max(parameters + 1);
        let cols = cols.max(order + 1);
        debug!("growing derivative structure compiler cache to {rows}x{cols} for ({parameters}, {order})");

        let mut compilers: Vec<Vec<Option<Arc<DsCompiler>>>> = vec![vec![None; cols]; rows];
        for (dest, src) in compilers.iter_mut().zip(&self.compilers) {
            dest[..src.len()].clone_from_slice(src);
        }

        for diag in 0..=parameters + order {
            for o in diag.saturating_sub(parameters)..=order.min(diag) {
                let p = diag - o;
                if compilers[p][o].is_some() {
                    continue;
                }
                let value = if p == 0 { None } else { compilers[p - 1][o].clone() };
                let derivative = if o == 0 { None } else { compilers[p][o - 1].clone() };
                let compiler = DsCompiler::compile(p, o, value.as_deref(), derivative.as_deref());
                trace!(
                    "compiled derivative structure ({p}, {o}): {} slots, {} product terms, {} composition terms",
                    compiler.size(),
                    compiler.mult_indirection.iter().map(Vec::len).sum::<usize>(),
                    compiler.comp_indirection.iter().map(Vec::len).sum::<usize>()
                );
                compilers[p][o] = Some(Arc::new(compiler));
            }
        }

        let target = match &compilers[parameters][order] {
            Some(compiler) => Arc::clone(compiler),
            None => unreachable!("({parameters}, {order}) lies on the last filled diagonal"),
        };
        (CompilerTable { compilers }, target)
    }
}

/// Cache of [`DsCompiler`] instances, one per `(parameters, order)`.
///
/// Entries are never evicted: tables are small and shared by every
/// derivative structure of their signature. Concurrent misses may build the
/// same cells twice; construction is deterministic, so whichever table is
/// published is correct, and the losing build is still returned to its
/// caller.
///
/// ```
/// use dscompiler::CompilerRegistry;
///
/// let registry = CompilerRegistry::new();
/// let compiler = registry.get(2, 2);
/// assert_eq!(compiler.size(), 6);
/// ```
pub struct CompilerRegistry {
    table: RwLock<Arc<CompilerTable>>,
}

impl Default for CompilerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        CompilerRegistry {
            table: RwLock::new(Arc::new(CompilerTable::default())),
        }
    }

    /// Compiler for `parameters` free parameters at derivation `order`,
    /// building it and its dependencies on first request.
    pub fn get(&self, parameters: usize, order: usize) -> Arc<DsCompiler> {
        let snapshot = self.snapshot();
        if let Some(compiler) = snapshot.lookup(parameters, order) {
            return Arc::clone(compiler);
        }

        let (grown, compiler) = snapshot.grow(parameters, order);
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if Arc::ptr_eq(&*table, &snapshot) {
            *table = Arc::new(grown);
        }
        compiler
    }

    /// Current extent of the cache as `(parameter rows, order columns)`.
    ///
    /// After `get(p, n)` this is at least `(p + 1, n + 1)`.
    pub fn cached_shape(&self) -> (usize, usize) {
        self.snapshot().shape()
    }

    fn snapshot(&self) -> Arc<CompilerTable> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*table)
    }
}
