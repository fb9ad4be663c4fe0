//! Sandboxed evaluation of JavaScript snippets.
//!
//! The resolver only needs three things from an engine: bind an empty namespace object, run a
//! statement for its side effects, and evaluate an expression to a string. [`Evaluator`] is a
//! thread-safe factory for [`EvalContext`]s that provide exactly that. [`BoaEvaluator`] is the
//! built-in engine: every context is a fresh Boa realm with loop and recursion limits applied.
//!
//! The sandbox is a convenience for deriving values from loader code. It is not a security
//! boundary.

mod boa;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use boa::{BoaContext, BoaEvaluator};

/// Default number of iterations a single loop may run.
pub const DEFAULT_FUEL: u64 = 1_000_000;

/// Default maximum nesting of function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Resource limits applied to every evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxLimits {
    /// Iterations any one loop may run before evaluation is aborted.
    pub fuel: u64,
    /// Maximum depth of nested function calls.
    pub max_call_depth: usize,
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            fuel: DEFAULT_FUEL,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Errors raised while evaluating a snippet.
///
/// Messages carry the engine's error name, e.g. `ReferenceError: ns is not defined`.
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum EvalError {
    #[error("{0}")]
    #[diagnostic(code(snoop::eval::syntax))]
    Syntax(String),

    #[error("{0}")]
    #[diagnostic(code(snoop::eval::reference))]
    Reference(String),

    #[error("{0}")]
    #[diagnostic(code(snoop::eval::type_error))]
    Type(String),

    /// A value thrown by the evaluated code, converted to a string.
    #[error("Uncaught {0}")]
    #[diagnostic(code(snoop::eval::thrown))]
    Thrown(String),

    #[error("{0}")]
    #[diagnostic(
        code(snoop::eval::limit_exceeded),
        help("raise the fuel or call depth limit if the loader legitimately needs more")
    )]
    LimitExceeded(String),
}

/// An isolated JavaScript global environment.
pub trait EvalContext {
    /// Bind `name` to a fresh empty object in the global scope.
    fn bind_namespace(&mut self, name: &str) -> Result<(), EvalError>;

    /// Run `source` as a script for its side effects.
    fn execute(&mut self, source: &str) -> Result<(), EvalError>;

    /// Run `source` as a script and convert its completion value to a string.
    fn evaluate(&mut self, source: &str) -> Result<String, EvalError>;
}

/// Creates isolated evaluation contexts.
pub trait Evaluator: Send + Sync {
    fn context(&self) -> Box<dyn EvalContext>;
}
