//! Errors reported by the compiler and its kernels.

/// Errors that can occur when addressing or combining derivative structures.
///
/// All of them are detected before anything is written to a result array.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DsError {
    /// An order vector or Taylor offset did not have one entry per free parameter.
    #[error("dimension mismatch: expected {expected} free parameters, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Two compilers with different `(parameters, order)` were combined.
    #[error(
        "incompatible derivative structures: expected {} parameters at order {}, got {} parameters at order {}",
        expected.0, expected.1, actual.0, actual.1
    )]
    IncompatibleCompilers {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The requested partial derivative orders add up to more than the
    /// compiler's derivation order.
    #[error("derivation order {sum} exceeds the maximum order {order}")]
    OrderExceeded { sum: usize, order: usize },

    /// Deserialized tables differ from the ones built for their signature.
    #[error("indirection tables do not match a compiler with {parameters} parameters at order {order}")]
    InvalidTables { parameters: usize, order: usize },

    /// A numeric step failed that cannot fail for valid inputs.
    #[error("internal arithmetic failure: {0}")]
    ArithmeticFailure(String),
}
