//! Truncated multivariate Taylor expansion of a derivative structure.

use crate::compiler::DsCompiler;
use crate::error::DsError;
use crate::Float;

impl DsCompiler {
    /// Evaluate the Taylor expansion of `ds` at an offset `delta` from the
    /// point where it was computed:
    ///
    /// `Σᵢ ds[i] · Πₖ delta[k]^oᵢₖ / oᵢₖ!`
    ///
    /// where `oᵢ` is the order vector of slot `i`. Terms are summed from the
    /// highest slot down so the small high-order terms accumulate first.
    pub fn taylor<F: Float>(&self, ds: &[F], delta: &[F]) -> Result<F, DsError> {
        self.expect_len("ds", ds);
        if delta.len() != self.parameters {
            return Err(DsError::ShapeMismatch {
                expected: self.parameters,
                actual: delta.len(),
            });
        }
        if self.parameters == 0 {
            return Ok(ds[0]);
        }

        let factorials = factorials::<F>(self.order)?;
        let mut value = F::zero();
        for i in (0..self.size()).rev() {
            let mut term = ds[i];
            for (&d, &o) in delta.iter().zip(&self.derivatives_indirection[i]) {
                if o > 0 {
                    term = term * d.powi(o as i32) / factorials[o];
                }
            }
            value = value + term;
        }
        Ok(value)
    }
}

/// `[0!, 1!, ..., n!]` in the working precision.
fn factorials<F: Float>(n: usize) -> Result<Vec<F>, DsError> {
    let mut table = Vec::with_capacity(n + 1);
    let mut f = F::one();
    table.push(f);
    for k in 1..=n {
        f = f * F::from_count(k as u64);
        if !f.is_finite() {
            return Err(DsError::ArithmeticFailure(format!(
                "{k}! is not representable in the working precision"
            )));
        }
        table.push(f);
    }
    Ok(table)
}
