//! Typed expression tree.
//!
//! Produced only by the validator. Numbers and sequences are separate node
//! families, so a tree that type-checks here cannot fail when evaluated:
//! every operator, subscript and call receives operands of the right kind.

use super::registry::Function;

/// Static type of a validated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// Scalar `f64` (booleans included).
    Number,
    /// Ordered `f64` sequence (`path`, literals, slices).
    Sequence,
}

impl Type {
    /// Lowercase name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Type::Number => "number",
            Type::Sequence => "sequence",
        }
    }
}

/// Number-valued expression.
#[derive(Debug, Clone, PartialEq)]
pub enum NumExpr {
    /// Literal or resolved constant.
    Literal(f64),
    /// Terminal price.
    Price,
    /// `+x` / `-x`.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<NumExpr>,
    },
    /// Arithmetic.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<NumExpr>,
        /// Right operand.
        rhs: Box<NumExpr>,
    },
    /// Comparison chain, `1.0` when every link holds.
    Compare {
        /// First operand.
        first: Box<NumExpr>,
        /// Remaining links.
        rest: Vec<(CompareOp, NumExpr)>,
    },
    /// Short-circuit `and` / `or` returning the deciding operand.
    Logical {
        /// Operator.
        op: LogicalOp,
        /// Left operand.
        lhs: Box<NumExpr>,
        /// Right operand.
        rhs: Box<NumExpr>,
    },
    /// `then if condition else otherwise`.
    Conditional {
        /// Truth test (non-zero holds).
        condition: Box<NumExpr>,
        /// Value when the test holds.
        then: Box<NumExpr>,
        /// Value otherwise.
        otherwise: Box<NumExpr>,
    },
    /// `sequence[index]`.
    Index {
        /// Indexed sequence.
        sequence: Box<SeqExpr>,
        /// Position; negative counts from the end.
        index: Box<NumExpr>,
    },
    /// Function applied to numbers.
    Call {
        /// Registered function.
        function: Function,
        /// Arguments.
        args: Vec<NumExpr>,
    },
    /// Function consuming one sequence (`min`, `max`, `fsum`, `prod`, `sum`,
    /// `len`).
    Reduce {
        /// Registered function.
        function: Function,
        /// Argument.
        sequence: Box<SeqExpr>,
    },
}

/// Sequence-valued expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SeqExpr {
    /// Simulated path.
    Path,
    /// `[a, b]` or `(a, b)`.
    Literal(Vec<NumExpr>),
    /// `sequence[lower:upper:step]`.
    Slice {
        /// Sliced sequence.
        sequence: Box<SeqExpr>,
        /// Start bound.
        lower: Option<Box<NumExpr>>,
        /// End bound.
        upper: Option<Box<NumExpr>>,
        /// Stride.
        step: Option<Box<NumExpr>>,
    },
    /// Conditional choosing between two sequences.
    Conditional {
        /// Truth test.
        condition: Box<NumExpr>,
        /// Value when the test holds.
        then: Box<SeqExpr>,
        /// Value otherwise.
        otherwise: Box<SeqExpr>,
    },
}

/// Permitted prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Permitted arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Permitted comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// `and` / `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LogicalOp {
    And,
    Or,
}

/// Validated payoff formula: the source it was compiled from and its
/// number-valued root.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTree {
    source: String,
    root: NumExpr,
}

impl ExpressionTree {
    pub(crate) fn new(source: &str, root: NumExpr) -> Self {
        Self {
            source: source.to_string(),
            root,
        }
    }

    /// Expression text as supplied.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node.
    pub fn root(&self) -> &NumExpr {
        &self.root
    }

    /// Whether the formula reads the path (as opposed to the terminal price
    /// only).
    pub fn uses_path(&self) -> bool {
        self.root.uses_path()
    }
}

impl NumExpr {
    fn uses_path(&self) -> bool {
        match self {
            NumExpr::Literal(_) | NumExpr::Price => false,
            NumExpr::Unary { operand, .. } => operand.uses_path(),
            NumExpr::Binary { lhs, rhs, .. } | NumExpr::Logical { lhs, rhs, .. } => {
                lhs.uses_path() || rhs.uses_path()
            }
            NumExpr::Compare { first, rest } => {
                first.uses_path() || rest.iter().any(|(_, e)| e.uses_path())
            }
            NumExpr::Conditional {
                condition,
                then,
                otherwise,
            } => condition.uses_path() || then.uses_path() || otherwise.uses_path(),
            NumExpr::Index { sequence, index } => sequence.uses_path() || index.uses_path(),
            NumExpr::Call { args, .. } => args.iter().any(NumExpr::uses_path),
            NumExpr::Reduce { sequence, .. } => sequence.uses_path(),
        }
    }
}

impl SeqExpr {
    fn uses_path(&self) -> bool {
        match self {
            SeqExpr::Path => true,
            SeqExpr::Literal(items) => items.iter().any(NumExpr::uses_path),
            SeqExpr::Slice {
                sequence,
                lower,
                upper,
                step,
            } => {
                sequence.uses_path()
                    || [lower, upper, step]
                        .into_iter()
                        .flatten()
                        .any(|bound| bound.uses_path())
            }
            SeqExpr::Conditional {
                condition,
                then,
                otherwise,
            } => condition.uses_path() || then.uses_path() || otherwise.uses_path(),
        }
    }
}
