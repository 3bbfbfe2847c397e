//! Raw syntax tree produced by the parser.
//!
//! The tree covers the whole expression shape of the host syntax, not just the
//! permitted subset, so that [`validate`](super::validate) can reject
//! constructs node by node with a precise fragment. Each node carries its
//! source `Span` and the height of the subtree below it.

use super::error::Span;

/// Raw expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node kind and children.
    pub kind: NodeKind,
    /// Location in the source.
    pub span: Span,
    /// Height of this subtree (leaves are 1).
    pub depth: usize,
}

impl Node {
    /// Creates a node, computing its height from its children.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        let depth = 1 + kind.children().map(|c| c.depth).max().unwrap_or(0);
        Self { kind, span, depth }
    }
}

/// A `name=value` argument in a call.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordArg {
    /// Argument name.
    pub name: String,
    /// Argument value.
    pub value: Node,
    /// Location of the whole `name=value` text.
    pub span: Span,
}

/// Raw expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Numeric literal.
    Number(f64),
    /// `True` or `False`.
    Bool(bool),
    /// `None`.
    NoneLiteral,
    /// String literal.
    Str(String),
    /// Bare identifier.
    Name(String),
    /// `value.attr`.
    Attribute {
        /// Object being accessed.
        value: Box<Node>,
        /// Attribute name.
        attr: String,
    },
    /// `func(args, keywords)`.
    Call {
        /// Callee expression.
        func: Box<Node>,
        /// Positional arguments.
        args: Vec<Node>,
        /// Keyword arguments.
        keywords: Vec<KeywordArg>,
    },
    /// `value[index]`.
    Subscript {
        /// Indexed expression.
        value: Box<Node>,
        /// Index or `Slice` node.
        index: Box<Node>,
    },
    /// `lower:upper:step` inside a subscript.
    Slice {
        /// Start bound.
        lower: Option<Box<Node>>,
        /// End bound.
        upper: Option<Box<Node>>,
        /// Stride.
        step: Option<Box<Node>>,
    },
    /// `[a, b, ...]`.
    List(Vec<Node>),
    /// `(a, b, ...)` or a bare `a, b`.
    Tuple(Vec<Node>),
    /// `*value` in a call or display.
    Starred(Box<Node>),
    /// Prefix operator.
    Unary {
        /// Operator.
        op: UnaryOperator,
        /// Operand.
        operand: Box<Node>,
    },
    /// Infix arithmetic or bitwise operator.
    Binary {
        /// Operator.
        op: BinaryOperator,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
    },
    /// `a and b` / `a or b`.
    BoolOp {
        /// Operator.
        op: BoolOperator,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
    },
    /// Comparison chain `a < b <= c`.
    Compare {
        /// First operand.
        first: Box<Node>,
        /// Remaining `(operator, operand)` pairs, at least one.
        rest: Vec<(CompareOperator, Node)>,
    },
    /// `body if test else orelse`.
    IfExp {
        /// Condition.
        test: Box<Node>,
        /// Value when the condition holds.
        body: Box<Node>,
        /// Value otherwise.
        orelse: Box<Node>,
    },
}

impl NodeKind {
    /// Direct children in source order.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self {
            NodeKind::Number(_)
            | NodeKind::Bool(_)
            | NodeKind::NoneLiteral
            | NodeKind::Str(_)
            | NodeKind::Name(_) => Box::new(std::iter::empty()),
            NodeKind::Attribute { value, .. } | NodeKind::Starred(value) => {
                Box::new(std::iter::once(value.as_ref()))
            }
            NodeKind::Unary { operand, .. } => Box::new(std::iter::once(operand.as_ref())),
            NodeKind::Call {
                func,
                args,
                keywords,
            } => Box::new(
                std::iter::once(func.as_ref())
                    .chain(args.iter())
                    .chain(keywords.iter().map(|k| &k.value)),
            ),
            NodeKind::Subscript { value, index } => {
                Box::new([value.as_ref(), index.as_ref()].into_iter())
            }
            NodeKind::Slice { lower, upper, step } => Box::new(
                [lower, upper, step]
                    .into_iter()
                    .filter_map(|bound| bound.as_deref()),
            ),
            NodeKind::List(items) | NodeKind::Tuple(items) => Box::new(items.iter()),
            NodeKind::Binary { lhs, rhs, .. } | NodeKind::BoolOp { lhs, rhs, .. } => {
                Box::new([lhs.as_ref(), rhs.as_ref()].into_iter())
            }
            NodeKind::Compare { first, rest } => {
                Box::new(std::iter::once(first.as_ref()).chain(rest.iter().map(|(_, n)| n)))
            }
            NodeKind::IfExp { test, body, orelse } => {
                Box::new([body.as_ref(), test.as_ref(), orelse.as_ref()].into_iter())
            }
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `not x`
    Not,
    /// `~x`
    Invert,
}

impl UnaryOperator {
    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "not",
            UnaryOperator::Invert => "~",
        }
    }
}

/// Infix arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOperator {
    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::FloorDiv => "//",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "**",
            BinaryOperator::MatMul => "@",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
        }
    }
}

/// `and` / `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BoolOperator {
    And,
    Or,
}

/// Comparison operators, including membership and identity tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOperator {
    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Eq => "==",
            CompareOperator::NotEq => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::Le => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::Ge => ">=",
            CompareOperator::In => "in",
            CompareOperator::NotIn => "not in",
            CompareOperator::Is => "is",
            CompareOperator::IsNot => "is not",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: f64) -> Node {
        Node::new(NodeKind::Number(value), Span::new(0, 1))
    }

    #[test]
    fn depth_counts_longest_branch() {
        let inner = Node::new(
            NodeKind::Binary {
                op: BinaryOperator::Add,
                lhs: Box::new(leaf(1.0)),
                rhs: Box::new(leaf(2.0)),
            },
            Span::new(0, 5),
        );
        assert_eq!(inner.depth, 2);

        let outer = Node::new(
            NodeKind::Unary {
                op: UnaryOperator::Minus,
                operand: Box::new(inner),
            },
            Span::new(0, 6),
        );
        assert_eq!(outer.depth, 3);
        assert_eq!(leaf(0.0).depth, 1);
    }

    #[test]
    fn slice_children_skip_missing_bounds() {
        let slice = NodeKind::Slice {
            lower: None,
            upper: Some(Box::new(leaf(2.0))),
            step: None,
        };
        assert_eq!(slice.children().count(), 1);
    }
}
