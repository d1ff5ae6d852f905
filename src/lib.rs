//! Multivariate, higher-order forward derivatives on flat arrays.
//!
//! A [`DsCompiler`] for `P` free parameters and derivation order `N`
//! precomputes the slot layout and the expanded product and chain rules once;
//! its methods then run arithmetic and elementary functions directly on
//! caller-owned `&[F]` slices of [`size`](DsCompiler::size) elements.
//!
//! ```
//! use dscompiler::DsCompiler;
//!
//! // f(x) = x² at x = 2, one parameter, derivatives up to order 3
//! let compiler = DsCompiler::get(1, 3);
//! let square = [4.0, 4.0, 2.0, 0.0];
//! let mut fourth = [0.0; 4];
//! compiler.multiply(&square, &square, &mut fourth);
//! assert_eq!(fourth, [16.0, 32.0, 48.0, 48.0]);
//! ```

pub mod compiler;
mod dot;
pub mod error;
pub mod float;
mod functions;
mod indirection;
mod kernel;
pub mod registry;
mod taylor;
pub mod univariate;

pub use compiler::{CompTerm, DsCompiler, MultTerm};
pub use error::DsError;
pub use float::Float;
pub use registry::CompilerRegistry;
