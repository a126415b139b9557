//! Semantic subtyping solver for the Myna type checker.
//!
//! The representation crate keeps types as sets; this crate answers the
//! questions about them. Subtyping is containment, containment is
//! emptiness of a difference, and emptiness of the list portion is the
//! interesting part: list atoms can reference each other (and
//! themselves) through the shared environment, so the decision procedure
//! memoizes per-diagram results and assumes a diagram inhabited when it
//! meets its own computation again.
//!
//! Everything runs through a [`TypeContext`] borrowing the environment:
//!
//! ```
//! use myna_core::{SemType, TypeEnv};
//! use myna_solver::TypeContext;
//!
//! let env = TypeEnv::new();
//! let pair = env.tuple_of(vec![SemType::INT, SemType::STRING]);
//! let loose = env.array_of(env.union(SemType::INT, SemType::STRING));
//!
//! let mut cx = TypeContext::new(&env);
//! assert!(cx.is_subtype(pair, loose));
//! assert!(!cx.is_subtype(loose, pair));
//! ```

pub mod context;
mod emptiness;
mod projection;

pub use context::TypeContext;
