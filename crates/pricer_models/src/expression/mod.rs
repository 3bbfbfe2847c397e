//! Sandboxed payoff expressions.
//!
//! A payoff is a single expression over the terminal price `price` and the
//! simulated path `path`, written in a closed subset of Python expression
//! syntax. Compilation is the only place user text is interpreted; the result
//! is a pure function with no access to anything but its two inputs and a
//! fixed table of math functions.
//!
//! # Architecture
//!
//! ```text
//! text ──→ lexer ──→ parser ──→ raw syntax tree ──→ validate ──→ ExpressionTree
//!                                                                      │
//!                                    CompiledPayoff::evaluate(price, path) ←┘
//! ```
//!
//! # Examples
//!
//! ```
//! use pricer_models::expression::compile_payoff;
//!
//! let call = compile_payoff("max(price - 100, 0)").unwrap();
//! assert_eq!(call.evaluate(120.0, &[100.0, 120.0]), 20.0);
//!
//! let asian = compile_payoff("max(sum(path) / len(path) - 100, 0)").unwrap();
//! assert_eq!(asian.evaluate(130.0, &[100.0, 110.0, 120.0, 130.0]), 15.0);
//!
//! assert!(compile_payoff("__import__('os')").unwrap_err().is_unsafe());
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod tree;
pub mod validate;

use std::sync::Arc;

use pricer_core::traits::PathPayoff;
use tracing::debug;

pub use error::{PayoffError, Span};
pub use eval::Environment;
pub use registry::{Arity, Entry, Function};
pub use tree::{ExpressionTree, NumExpr, SeqExpr, Type};

/// Compiled payoff formula.
///
/// Immutable and cheap to clone (the tree is shared), `Send + Sync`, and safe
/// to evaluate concurrently from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPayoff {
    tree: Arc<ExpressionTree>,
}

impl CompiledPayoff {
    /// Evaluates the payoff for one simulated path.
    ///
    /// Never fails: invalid arithmetic produces `NaN`/`±Inf`.
    #[inline]
    pub fn evaluate(&self, price: f64, path: &[f64]) -> f64 {
        self.tree.root().evaluate(&Environment::new(price, path))
    }

    /// Expression text this payoff was compiled from.
    pub fn source(&self) -> &str {
        self.tree.source()
    }

    /// Validated tree.
    pub fn tree(&self) -> &ExpressionTree {
        &self.tree
    }
}

impl PathPayoff for CompiledPayoff {
    #[inline]
    fn evaluate(&self, terminal: f64, path: &[f64]) -> f64 {
        CompiledPayoff::evaluate(self, terminal, path)
    }
}

/// Parse, validate and type-check a payoff expression.
///
/// # Errors
///
/// - `InvalidExpression`: syntax errors, wrong argument counts, a sequence
///   where a number is required, or a root that is not a number
/// - `UnsafeExpression`: any construct outside the grammar (statements,
///   assignment, strings, attribute access other than `math.<name>`, unknown
///   names, calls to anything but registered functions)
///
/// Both name the offending fragment and its byte span.
pub fn compile_payoff(expression: &str) -> Result<CompiledPayoff, PayoffError> {
    let tree = parser::parse(expression).and_then(|node| validate::validate(&node, expression));
    match tree {
        Ok(tree) => {
            debug!(
                expression,
                uses_path = tree.uses_path(),
                "compiled payoff expression"
            );
            Ok(CompiledPayoff {
                tree: Arc::new(tree),
            })
        }
        Err(err) => {
            debug!(expression, error = %err, "rejected payoff expression");
            Err(err)
        }
    }
}
