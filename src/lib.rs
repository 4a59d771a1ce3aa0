//! # interval-expr: bounded integer expressions in Rust
//!
//! **`interval-expr`** builds arithmetic expression trees over integer literals and bounded variables,
//! evaluates them against concrete inputs, and statically infers a sound interval enclosing every
//! value the expression can produce.
//!
//! ## Key Features
//!
//! - **Static bounds**: Every node caches its [`Interval`][crate::interval::Interval], computed once at construction with interval arithmetic.
//! - **Sound division**: Division bounds go through the reciprocal of the divisor, with a case split on where zero lies (see [`DivCase`][crate::interval::DivCase]).
//! - **Positional inputs**: Variables are bound to a flat input slice in left-to-right, depth-first order.
//! - **Typed failures**: Out-of-range inputs, division by zero, wrong input counts and overflow are reported as [`EvalError`][crate::eval::EvalError].
//! - **Immutable trees**: Expressions are `Send + Sync` and can be evaluated concurrently.
//!
//! ## Basic Usage
//!
//! ```rust
//! use interval_expr::ast::Expr;
//! use interval_expr::interval::Interval;
//!
//! // 1. Declare variables with their legal ranges
//! let x = Expr::var(-5, 5);
//! let y = Expr::var(10, 30);
//! let z = Expr::var(45, 65);
//!
//! // 2. Build f(x, y, z) = (x + (y - 2) * (z - 3)) / 2
//! let f = (x + (y - Expr::lit(2)) * (z - Expr::lit(3))) / Expr::lit(2);
//!
//! // 3. Query the static bounds (no inputs needed)
//! assert_eq!(f.bounds(), Interval::new(165, 870));
//!
//! // 4. Evaluate: one input per variable, in order of appearance
//! assert_eq!(f.variable_count(), 3);
//! assert_eq!(f.eval(&[3, 29, 50]), Ok(636));
//! ```
//!
//! ## Core Components
//!
//! - **[`interval`]**: Closed integer intervals and their arithmetic.
//! - **[`ast`]**: The expression tree, its constructors and the generic [`fold`][crate::ast::Expr::fold].
//! - **[`eval`]**: Concrete evaluation and its error type.

pub mod ast;
pub mod eval;
pub mod interval;
pub mod types;

pub use ast::{bounds, variable_count};
pub use eval::evaluate;
