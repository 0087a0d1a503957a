//! Single-pass infix expression evaluator.
//!
//! Expressions are scanned character by character and evaluated as they are
//! parsed; no syntax tree is ever built. Nested constructs (parentheses,
//! function arguments, unary prefixes) are resolved eagerly by bounded
//! sub-scans, and the flat operator/operand sequence is folded to a scalar
//! by a priority-driven calculation chain.
//!
//! Variables and functions are resolved through an [`ExecutionEnv`], which
//! callers construct explicitly, either empty or pre-seeded with the
//! default catalogue:
//!
//! ```
//! use mathexpr::{eval, ExecutionEnv};
//!
//! let env = ExecutionEnv::with_builtins();
//! assert_eq!(eval("2 + 3 * 4", &env), Ok(14.0));
//! assert_eq!(eval("2cos(0)", &env), Ok(2.0));
//! assert_eq!(eval("max(-min(1, 3), 5)", &env), Ok(5.0));
//! ```
//!
//! Environments are extensible:
//!
//! ```
//! use mathexpr::{eval, ExecutionEnv};
//!
//! let mut env = ExecutionEnv::new();
//! env.insert_variable("x", 3.0)?;
//! env.insert_binary("hypot", f64::hypot)?;
//! assert_eq!(eval("hypot(x, 4)", &env), Ok(5.0));
//! # Ok::<(), mathexpr::Error>(())
//! ```
//!
//! Every operator is binary and left-associative, including `^`: `2^3^2`
//! is `(2^3)^2 = 64`. Unary `!` and `~` bind tightest and apply to the
//! whole remainder of their enclosing sub-expression.

pub mod builtins;
mod error;
pub mod function;
pub mod symbol;
pub mod token;
mod util;

pub use error::{Error, Result};
pub use symbol::{ExecutionEnv, Symbol, Variable};

use log::debug;
use token::Tokenizer;

/// Evaluates `input` against the symbols bound to `env`.
///
/// Returns the scalar result, or the first error encountered; a failing
/// sub-expression aborts the whole parse.
pub fn eval(input: &str, env: &ExecutionEnv) -> Result<f64> {
    if input.is_empty() {
        return Err(Error::EmptyExpression);
    }
    debug!("evaluating {input:?}");
    Tokenizer::new(input.as_bytes(), env).scan()?.solve()
}
