//! Whitelist validation and type checking of the raw syntax tree.
//!
//! Walks the tree top-down, checking each node's own kind before its children,
//! so the outermost offending construct is the one reported. Output is the
//! typed [`ExpressionTree`].

use super::ast::{
    BinaryOperator, BoolOperator, CompareOperator, KeywordArg, Node, NodeKind, UnaryOperator,
};
use super::error::{PayoffError, Span};
use super::registry::{self, Arity, Entry, Function};
use super::tree::{
    BinaryOp, CompareOp, ExpressionTree, LogicalOp, NumExpr, SeqExpr, Type, UnaryOp,
};

/// Validated node of either type.
enum Typed {
    Num(NumExpr),
    Seq(SeqExpr),
}

impl Typed {
    fn ty(&self) -> Type {
        match self {
            Typed::Num(_) => Type::Number,
            Typed::Seq(_) => Type::Sequence,
        }
    }
}

/// Validate a raw tree parsed from `source`.
///
/// # Errors
///
/// `UnsafeExpression` for any construct outside the whitelist, unknown names
/// and disallowed callees; `InvalidExpression` for type and arity errors and
/// for a root that is not a number.
pub fn validate(node: &Node, source: &str) -> Result<ExpressionTree, PayoffError> {
    let validator = Validator { source };
    let root = validator.number(node, || "payoff result".to_string())?;
    Ok(ExpressionTree::new(source, root))
}

struct Validator<'s> {
    source: &'s str,
}

impl Validator<'_> {
    fn invalid(&self, message: impl Into<String>, span: Span) -> PayoffError {
        PayoffError::invalid(message, self.source, span)
    }

    fn reject(&self, reason: impl Into<String>, span: Span) -> PayoffError {
        PayoffError::unsafe_construct(reason, self.source, span)
    }

    /// Validates `node` and requires a number; `role` names it in the error.
    fn number(&self, node: &Node, role: impl FnOnce() -> String) -> Result<NumExpr, PayoffError> {
        match self.check(node)? {
            Typed::Num(expr) => Ok(expr),
            Typed::Seq(_) => Err(self.invalid(
                format!("{} must be a number, got a sequence", role()),
                node.span,
            )),
        }
    }

    fn check(&self, node: &Node) -> Result<Typed, PayoffError> {
        match &node.kind {
            NodeKind::Number(value) => Ok(Typed::Num(NumExpr::Literal(*value))),
            NodeKind::Bool(flag) => Ok(Typed::Num(NumExpr::Literal(if *flag {
                1.0
            } else {
                0.0
            }))),
            NodeKind::NoneLiteral => Err(self.invalid("`None` is not a number", node.span)),
            NodeKind::Str(_) => Err(self.reject("string literal", node.span)),
            NodeKind::Name(name) => self.name(name, node.span),
            NodeKind::Attribute { value, attr } => self.attribute(value, attr, node.span),
            NodeKind::Call {
                func,
                args,
                keywords,
            } => self.call(func, args, keywords, node.span),
            NodeKind::Subscript { value, index } => self.subscript(value, index),
            NodeKind::Slice { .. } => Err(self.invalid("slice outside a subscript", node.span)),
            NodeKind::List(items) | NodeKind::Tuple(items) => {
                let elements = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.number(item, || format!("sequence element {}", i + 1))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Typed::Seq(SeqExpr::Literal(elements)))
            }
            NodeKind::Starred(_) => Err(self.reject("starred expression", node.span)),
            NodeKind::Unary { op, operand } => self.unary(*op, operand, node.span),
            NodeKind::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, node.span),
            NodeKind::BoolOp { op, lhs, rhs } => {
                let op = match op {
                    BoolOperator::And => LogicalOp::And,
                    BoolOperator::Or => LogicalOp::Or,
                };
                let word = if op == LogicalOp::And { "and" } else { "or" };
                Ok(Typed::Num(NumExpr::Logical {
                    op,
                    lhs: Box::new(self.number(lhs, || format!("operand of `{word}`"))?),
                    rhs: Box::new(self.number(rhs, || format!("operand of `{word}`"))?),
                }))
            }
            NodeKind::Compare { first, rest } => self.compare(first, rest, node.span),
            NodeKind::IfExp { test, body, orelse } => self.conditional(test, body, orelse),
        }
    }

    fn name(&self, name: &str, span: Span) -> Result<Typed, PayoffError> {
        match name {
            "price" => return Ok(Typed::Num(NumExpr::Price)),
            "path" => return Ok(Typed::Seq(SeqExpr::Path)),
            _ => {}
        }
        match registry::lookup(name) {
            Some(Entry::Constant(value)) => Ok(Typed::Num(NumExpr::Literal(value))),
            Some(Entry::Function(_)) => {
                Err(self.invalid(format!("function `{name}` must be called"), span))
            }
            None => Err(self.reject(format!("unknown name `{name}`"), span)),
        }
    }

    fn attribute(&self, value: &Node, attr: &str, span: Span) -> Result<Typed, PayoffError> {
        if !is_math(value) {
            return Err(self.reject(format!("attribute access `.{attr}`"), span));
        }
        match registry::lookup_math(attr) {
            Some(Entry::Constant(value)) => Ok(Typed::Num(NumExpr::Literal(value))),
            Some(Entry::Function(_)) => {
                Err(self.invalid(format!("function `math.{attr}` must be called"), span))
            }
            None => Err(self.reject(format!("unknown member `math.{attr}`"), span)),
        }
    }

    fn resolve_callee(&self, func: &Node) -> Result<Function, PayoffError> {
        let (entry, display) = match &func.kind {
            NodeKind::Name(name) => (registry::lookup(name), name.clone()),
            NodeKind::Attribute { value, attr } if is_math(value) => {
                (registry::lookup_math(attr), format!("math.{attr}"))
            }
            NodeKind::Attribute { attr, .. } => {
                return Err(self.reject(format!("method call `.{attr}()`"), func.span));
            }
            _ => {
                return Err(self.reject(
                    "callee must be a registered function name",
                    func.span,
                ));
            }
        };
        match entry {
            Some(Entry::Function(function)) => Ok(function),
            Some(Entry::Constant(_)) => {
                Err(self.invalid(format!("constant `{display}` is not callable"), func.span))
            }
            None => Err(self.reject(
                format!("call to unregistered function `{display}`"),
                func.span,
            )),
        }
    }

    fn call(
        &self,
        func: &Node,
        args: &[Node],
        keywords: &[KeywordArg],
        span: Span,
    ) -> Result<Typed, PayoffError> {
        let function = self.resolve_callee(func)?;
        if let Some(keyword) = keywords.first() {
            return Err(self.reject(
                format!("keyword argument `{}`", keyword.name),
                keyword.span,
            ));
        }
        if let Some(starred) = args.iter().find(|a| matches!(a.kind, NodeKind::Starred(_))) {
            return Err(self.reject("starred argument", starred.span));
        }

        let name = function.name();
        let mut typed = args
            .iter()
            .map(|arg| self.check(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let count_error = |expected: &str| {
            self.invalid(
                format!(
                    "`{name}` takes {expected} ({} given)",
                    plural(args.len(), "argument")
                ),
                span,
            )
        };

        match function.arity() {
            Arity::Exact(n) if args.len() != n => {
                return Err(count_error(&format!("exactly {}", plural(n, "argument"))));
            }
            Arity::Range(lo, hi) if args.len() < lo || args.len() > hi => {
                return Err(count_error(&format!("{lo} to {hi} arguments")));
            }
            Arity::AtLeast(n) if args.len() < n => {
                return Err(count_error(&format!("at least {}", plural(n, "argument"))));
            }
            Arity::Sequence => {
                return match typed.pop() {
                    Some(Typed::Seq(sequence)) if args.len() == 1 => {
                        Ok(Typed::Num(NumExpr::Reduce {
                            function,
                            sequence: Box::new(sequence),
                        }))
                    }
                    _ => Err(count_error("one sequence")),
                };
            }
            Arity::Extremum if args.len() == 1 => {
                return match typed.pop() {
                    Some(Typed::Seq(sequence)) => Ok(Typed::Num(NumExpr::Reduce {
                        function,
                        sequence: Box::new(sequence),
                    })),
                    _ => Err(count_error("a sequence or at least two numbers")),
                };
            }
            Arity::Extremum if args.is_empty() => {
                return Err(count_error("a sequence or at least two numbers"));
            }
            _ => {}
        }

        let mut numbers = Vec::with_capacity(typed.len());
        for (i, (arg, node)) in typed.into_iter().zip(args).enumerate() {
            match arg {
                Typed::Num(expr) => numbers.push(expr),
                Typed::Seq(_) => {
                    return Err(self.invalid(
                        format!("argument {} of `{name}` must be a number, got a sequence", i + 1),
                        node.span,
                    ));
                }
            }
        }
        Ok(Typed::Num(NumExpr::Call {
            function,
            args: numbers,
        }))
    }

    fn subscript(&self, value: &Node, index: &Node) -> Result<Typed, PayoffError> {
        let sequence = match self.check(value)? {
            Typed::Seq(sequence) => Box::new(sequence),
            Typed::Num(_) => {
                return Err(self.invalid("only sequences can be subscripted", value.span));
            }
        };

        if let NodeKind::Slice { lower, upper, step } = &index.kind {
            let bound = |node: &Option<Box<Node>>, role: &'static str| {
                node.as_deref()
                    .map(|n| self.number(n, || format!("slice {role}")).map(Box::new))
                    .transpose()
            };
            return Ok(Typed::Seq(SeqExpr::Slice {
                sequence,
                lower: bound(lower, "start")?,
                upper: bound(upper, "stop")?,
                step: bound(step, "step")?,
            }));
        }

        let index = self.number(index, || "subscript index".to_string())?;
        Ok(Typed::Num(NumExpr::Index {
            sequence,
            index: Box::new(index),
        }))
    }

    fn unary(&self, op: UnaryOperator, operand: &Node, span: Span) -> Result<Typed, PayoffError> {
        let op = match op {
            UnaryOperator::Plus => UnaryOp::Plus,
            UnaryOperator::Minus => UnaryOp::Minus,
            UnaryOperator::Not => return Err(self.reject("`not` operator", span)),
            UnaryOperator::Invert => return Err(self.reject("bitwise operator `~`", span)),
        };
        let symbol = if op == UnaryOp::Plus { "+" } else { "-" };
        let operand = self.number(operand, || format!("operand of unary `{symbol}`"))?;
        Ok(Typed::Num(NumExpr::Unary {
            op,
            operand: Box::new(operand),
        }))
    }

    fn binary(
        &self,
        op: BinaryOperator,
        lhs: &Node,
        rhs: &Node,
        span: Span,
    ) -> Result<Typed, PayoffError> {
        let symbol = op.symbol();
        let op = match op {
            BinaryOperator::Add => BinaryOp::Add,
            BinaryOperator::Sub => BinaryOp::Sub,
            BinaryOperator::Mul => BinaryOp::Mul,
            BinaryOperator::Div => BinaryOp::Div,
            BinaryOperator::FloorDiv => BinaryOp::FloorDiv,
            BinaryOperator::Mod => BinaryOp::Mod,
            BinaryOperator::Pow => BinaryOp::Pow,
            BinaryOperator::MatMul => {
                return Err(self.reject("matrix multiplication `@`", span));
            }
            BinaryOperator::BitAnd
            | BinaryOperator::BitOr
            | BinaryOperator::BitXor
            | BinaryOperator::LeftShift
            | BinaryOperator::RightShift => {
                return Err(self.reject(format!("bitwise operator `{symbol}`"), span));
            }
        };
        Ok(Typed::Num(NumExpr::Binary {
            op,
            lhs: Box::new(self.number(lhs, || format!("left operand of `{symbol}`"))?),
            rhs: Box::new(self.number(rhs, || format!("right operand of `{symbol}`"))?),
        }))
    }

    fn compare(
        &self,
        first: &Node,
        rest: &[(CompareOperator, Node)],
        span: Span,
    ) -> Result<Typed, PayoffError> {
        let mut ops = Vec::with_capacity(rest.len());
        for (op, _) in rest {
            let op = match op {
                CompareOperator::Eq => CompareOp::Eq,
                CompareOperator::NotEq => CompareOp::NotEq,
                CompareOperator::Lt => CompareOp::Lt,
                CompareOperator::Le => CompareOp::Le,
                CompareOperator::Gt => CompareOp::Gt,
                CompareOperator::Ge => CompareOp::Ge,
                CompareOperator::In | CompareOperator::NotIn => {
                    return Err(self.reject(format!("membership test `{}`", op.symbol()), span));
                }
                CompareOperator::Is | CompareOperator::IsNot => {
                    return Err(self.reject(format!("identity test `{}`", op.symbol()), span));
                }
            };
            ops.push(op);
        }

        let first = self.number(first, || "comparison operand".to_string())?;
        let rest = ops
            .into_iter()
            .zip(rest)
            .map(|(op, (_, node))| {
                let operand = self.number(node, || "comparison operand".to_string())?;
                Ok::<_, PayoffError>((op, operand))
            })
            .collect::<Result<Vec<_>, PayoffError>>()?;
        Ok(Typed::Num(NumExpr::Compare {
            first: Box::new(first),
            rest,
        }))
    }

    fn conditional(&self, test: &Node, body: &Node, orelse: &Node) -> Result<Typed, PayoffError> {
        let condition = Box::new(self.number(test, || "condition".to_string())?);
        let then = self.check(body)?;
        let otherwise = self.check(orelse)?;
        match (then, otherwise) {
            (Typed::Num(then), Typed::Num(otherwise)) => Ok(Typed::Num(NumExpr::Conditional {
                condition,
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            })),
            (Typed::Seq(then), Typed::Seq(otherwise)) => Ok(Typed::Seq(SeqExpr::Conditional {
                condition,
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            })),
            (then, otherwise) => Err(self.invalid(
                format!(
                    "conditional branches must have the same type, got {} and {}",
                    then.ty().name(),
                    otherwise.ty().name()
                ),
                body.span.to(orelse.span),
            )),
        }
    }
}

fn is_math(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Name(name) if name == "math")
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
