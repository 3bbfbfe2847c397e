//! Recursive-descent parser producing the raw syntax tree.
//!
//! Follows the host expression grammar's precedence, lowest first:
//! conditional, `or`, `and`, `not`, comparisons, `|`, `^`, `&`, shifts,
//! `+ -`, `* / // % @`, unary `+ - ~`, `**`, then calls, subscripts and
//! attribute access. Statement-level tokens (keywords such as `import`,
//! assignment, `;`) are reported as unsafe here because they can never form
//! part of an expression tree.

use super::ast::{
    BinaryOperator, BoolOperator, CompareOperator, KeywordArg, Node, NodeKind, UnaryOperator,
};
use super::error::{PayoffError, Span};
use super::lexer::{tokenize, Keyword, Token, TokenKind};

/// Maximum bracket/prefix-operator nesting accepted by the parser.
pub const MAX_NESTING: usize = 64;

/// Maximum height of the syntax tree.
pub const MAX_DEPTH: usize = 200;

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> &Token {
        // `tokenize` always terminates the stream with `Eof`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_nth_kind(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, PayoffError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected()),
        }
    }

    fn enter(&mut self) -> Result<(), PayoffError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            let span = self.peek().span;
            return Err(PayoffError::invalid(
                format!("expression nested more than {MAX_NESTING} levels deep"),
                self.source,
                span,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Builds a composite node, enforcing the height limit.
    fn node(&self, kind: NodeKind, span: Span) -> Result<Node, PayoffError> {
        let node = Node::new(kind, span);
        if node.depth > MAX_DEPTH {
            return Err(PayoffError::invalid(
                format!("expression tree deeper than {MAX_DEPTH} levels"),
                self.source,
                span,
            ));
        }
        Ok(node)
    }

    /// Error for the current token in a position where it cannot appear.
    fn unexpected(&self) -> PayoffError {
        let token = self.peek();
        let to_end = Span::new(token.span.start, self.source.len());
        match &token.kind {
            TokenKind::Eof => {
                PayoffError::invalid("unexpected end of expression", self.source, token.span)
            }
            TokenKind::Assign => PayoffError::unsafe_construct("assignment", self.source, to_end),
            TokenKind::Walrus => PayoffError::unsafe_construct(
                "assignment expression `:=`",
                self.source,
                to_end,
            ),
            TokenKind::AugAssign(op) => PayoffError::unsafe_construct(
                format!("augmented assignment `{op}`"),
                self.source,
                to_end,
            ),
            TokenKind::Semicolon => PayoffError::unsafe_construct(
                "statement separator `;`",
                self.source,
                to_end,
            ),
            TokenKind::LBrace => {
                PayoffError::unsafe_construct("dict or set display", self.source, to_end)
            }
            TokenKind::Keyword(keyword) => match statement_reason(*keyword) {
                Some(reason) => PayoffError::unsafe_construct(reason, self.source, to_end),
                None => PayoffError::invalid(
                    format!("unexpected {}", token.kind.describe()),
                    self.source,
                    token.span,
                ),
            },
            other => PayoffError::invalid(
                format!("unexpected {}", other.describe()),
                self.source,
                token.span,
            ),
        }
    }
}

/// Keywords that only ever introduce statements, comprehensions or
/// function literals.
fn statement_reason(keyword: Keyword) -> Option<String> {
    let reason = match keyword {
        Keyword::Import | Keyword::From => "import statement".to_string(),
        Keyword::Lambda => "lambda expression".to_string(),
        Keyword::For | Keyword::Async => "comprehension or loop".to_string(),
        Keyword::Def | Keyword::Class => "definition".to_string(),
        Keyword::Yield | Keyword::Await => format!("`{}` expression", keyword.as_str()),
        Keyword::Assert
        | Keyword::Break
        | Keyword::Continue
        | Keyword::Del
        | Keyword::Elif
        | Keyword::Except
        | Keyword::Finally
        | Keyword::Global
        | Keyword::Nonlocal
        | Keyword::Pass
        | Keyword::Raise
        | Keyword::Return
        | Keyword::Try
        | Keyword::While
        | Keyword::With
        | Keyword::As => format!("`{}` statement", keyword.as_str()),
        Keyword::And
        | Keyword::Else
        | Keyword::If
        | Keyword::In
        | Keyword::Is
        | Keyword::Not
        | Keyword::Or => return None,
    };
    Some(reason)
}

/// Parse an expression into a raw syntax tree.
///
/// # Errors
///
/// `InvalidExpression` for lexical and syntax errors, `UnsafeExpression` for
/// statement-level constructs (keywords, assignment, `;`, dict/set displays).
pub fn parse(source: &str) -> Result<Node, PayoffError> {
    let tokens = tokenize(source)?;
    let mut p = Parser::new(source, tokens);

    if p.at(&TokenKind::Eof) {
        return Err(PayoffError::invalid(
            "empty expression",
            source,
            Span::new(0, source.len()),
        ));
    }

    let node = parse_expression_list(&mut p)?;
    if !p.at(&TokenKind::Eof) {
        return Err(p.unexpected());
    }
    Ok(node)
}

/// `test (',' test)* [',']`: a bare tuple when a comma is present.
fn parse_expression_list(p: &mut Parser) -> Result<Node, PayoffError> {
    let first = parse_star_or_test(p)?;
    if !p.at(&TokenKind::Comma) {
        return Ok(first);
    }

    let start = first.span;
    let mut items = vec![first];
    let mut end = start;
    while let Some(comma) = p.eat(&TokenKind::Comma) {
        end = comma.span;
        if !starts_expression(p.peek_kind()) {
            break;
        }
        let item = parse_star_or_test(p)?;
        end = item.span;
        items.push(item);
    }
    p.node(NodeKind::Tuple(items), start.to(end))
}

fn starts_expression(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Number(_)
        | TokenKind::Str(_)
        | TokenKind::True
        | TokenKind::False
        | TokenKind::None
        | TokenKind::Name(_)
        | TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Tilde
        | TokenKind::Star
        | TokenKind::LParen
        | TokenKind::LBracket
        | TokenKind::LBrace
        | TokenKind::Ellipsis => true,
        TokenKind::Keyword(k) => matches!(
            k,
            Keyword::Not | Keyword::Lambda | Keyword::Await | Keyword::Yield
        ),
        _ => false,
    }
}

fn parse_star_or_test(p: &mut Parser) -> Result<Node, PayoffError> {
    if let Some(star) = p.eat(&TokenKind::Star) {
        p.enter()?;
        let value = parse_or_test(p);
        p.leave();
        let value = value?;
        let span = star.span.to(value.span);
        return p.node(NodeKind::Starred(Box::new(value)), span);
    }
    parse_test(p)
}

/// `or_test ['if' or_test 'else' test]`
fn parse_test(p: &mut Parser) -> Result<Node, PayoffError> {
    p.enter()?;
    let result = parse_conditional(p);
    p.leave();
    result
}

fn parse_conditional(p: &mut Parser) -> Result<Node, PayoffError> {
    if p.at_keyword(Keyword::Lambda) {
        return Err(p.unexpected());
    }

    let body = parse_or_test(p)?;
    if !p.at_keyword(Keyword::If) {
        return Ok(body);
    }
    p.advance();
    let test = parse_or_test(p)?;
    if !p.at_keyword(Keyword::Else) {
        return Err(p.unexpected());
    }
    p.advance();
    let orelse = parse_test(p)?;
    let span = body.span.to(orelse.span);
    p.node(
        NodeKind::IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        },
        span,
    )
}

fn parse_or_test(p: &mut Parser) -> Result<Node, PayoffError> {
    let mut left = parse_and_test(p)?;
    while p.at_keyword(Keyword::Or) {
        p.advance();
        let right = parse_and_test(p)?;
        let span = left.span.to(right.span);
        left = p.node(
            NodeKind::BoolOp {
                op: BoolOperator::Or,
                lhs: Box::new(left),
                rhs: Box::new(right),
            },
            span,
        )?;
    }
    Ok(left)
}

fn parse_and_test(p: &mut Parser) -> Result<Node, PayoffError> {
    let mut left = parse_not_test(p)?;
    while p.at_keyword(Keyword::And) {
        p.advance();
        let right = parse_not_test(p)?;
        let span = left.span.to(right.span);
        left = p.node(
            NodeKind::BoolOp {
                op: BoolOperator::And,
                lhs: Box::new(left),
                rhs: Box::new(right),
            },
            span,
        )?;
    }
    Ok(left)
}

fn parse_not_test(p: &mut Parser) -> Result<Node, PayoffError> {
    if !p.at_keyword(Keyword::Not) {
        return parse_comparison(p);
    }
    let not = p.advance();
    p.enter()?;
    let operand = parse_not_test(p);
    p.leave();
    let operand = operand?;
    let span = not.span.to(operand.span);
    p.node(
        NodeKind::Unary {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        },
        span,
    )
}

fn comparison_operator(p: &Parser) -> Option<(CompareOperator, usize)> {
    let op = match p.peek_kind() {
        TokenKind::EqEq => (CompareOperator::Eq, 1),
        TokenKind::NotEq => (CompareOperator::NotEq, 1),
        TokenKind::Lt => (CompareOperator::Lt, 1),
        TokenKind::Le => (CompareOperator::Le, 1),
        TokenKind::Gt => (CompareOperator::Gt, 1),
        TokenKind::Ge => (CompareOperator::Ge, 1),
        TokenKind::Keyword(Keyword::In) => (CompareOperator::In, 1),
        TokenKind::Keyword(Keyword::Not)
            if matches!(p.peek_nth_kind(1), TokenKind::Keyword(Keyword::In)) =>
        {
            (CompareOperator::NotIn, 2)
        }
        TokenKind::Keyword(Keyword::Is) => {
            if matches!(p.peek_nth_kind(1), TokenKind::Keyword(Keyword::Not)) {
                (CompareOperator::IsNot, 2)
            } else {
                (CompareOperator::Is, 1)
            }
        }
        _ => return None,
    };
    Some(op)
}

/// Comparison chain `a < b <= c`, kept as a single node.
fn parse_comparison(p: &mut Parser) -> Result<Node, PayoffError> {
    let first = parse_bit_or(p)?;
    let mut rest = Vec::new();
    let mut end = first.span;

    while let Some((op, width)) = comparison_operator(p) {
        for _ in 0..width {
            p.advance();
        }
        let operand = parse_bit_or(p)?;
        end = operand.span;
        rest.push((op, operand));
    }

    if rest.is_empty() {
        return Ok(first);
    }
    let span = first.span.to(end);
    p.node(
        NodeKind::Compare {
            first: Box::new(first),
            rest,
        },
        span,
    )
}

/// Left-associative binary level: `next (op next)*`.
fn parse_binary_level(
    p: &mut Parser,
    next: fn(&mut Parser) -> Result<Node, PayoffError>,
    operator: fn(&TokenKind) -> Option<BinaryOperator>,
) -> Result<Node, PayoffError> {
    let mut left = next(p)?;
    while let Some(op) = operator(p.peek_kind()) {
        p.advance();
        let right = next(p)?;
        let span = left.span.to(right.span);
        left = p.node(
            NodeKind::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            },
            span,
        )?;
    }
    Ok(left)
}

fn parse_bit_or(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_bit_xor, |kind| match kind {
        TokenKind::Pipe => Some(BinaryOperator::BitOr),
        _ => None,
    })
}

fn parse_bit_xor(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_bit_and, |kind| match kind {
        TokenKind::Caret => Some(BinaryOperator::BitXor),
        _ => None,
    })
}

fn parse_bit_and(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_shift, |kind| match kind {
        TokenKind::Amper => Some(BinaryOperator::BitAnd),
        _ => None,
    })
}

fn parse_shift(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_additive, |kind| match kind {
        TokenKind::LeftShift => Some(BinaryOperator::LeftShift),
        TokenKind::RightShift => Some(BinaryOperator::RightShift),
        _ => None,
    })
}

fn parse_additive(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_multiplicative, |kind| match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        _ => None,
    })
}

fn parse_multiplicative(p: &mut Parser) -> Result<Node, PayoffError> {
    parse_binary_level(p, parse_unary, |kind| match kind {
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::DoubleSlash => Some(BinaryOperator::FloorDiv),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::At => Some(BinaryOperator::MatMul),
        _ => None,
    })
}

/// Prefix `+ - ~`, binding looser than `**` so that `-2 ** 2 == -4`.
fn parse_unary(p: &mut Parser) -> Result<Node, PayoffError> {
    let op = match p.peek_kind() {
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Minus => UnaryOperator::Minus,
        TokenKind::Tilde => UnaryOperator::Invert,
        _ => return parse_power(p),
    };
    let token = p.advance();
    p.enter()?;
    let operand = parse_unary(p);
    p.leave();
    let operand = operand?;
    let span = token.span.to(operand.span);
    p.node(
        NodeKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    )
}

/// `postfix ['**' unary]`, right-associative.
fn parse_power(p: &mut Parser) -> Result<Node, PayoffError> {
    let base = parse_postfix(p)?;
    if p.eat(&TokenKind::DoubleStar).is_none() {
        return Ok(base);
    }
    p.enter()?;
    let exponent = parse_unary(p);
    p.leave();
    let exponent = exponent?;
    let span = base.span.to(exponent.span);
    p.node(
        NodeKind::Binary {
            op: BinaryOperator::Pow,
            lhs: Box::new(base),
            rhs: Box::new(exponent),
        },
        span,
    )
}

/// Atom followed by any number of call, subscript and attribute trailers.
fn parse_postfix(p: &mut Parser) -> Result<Node, PayoffError> {
    let mut node = parse_atom(p)?;
    loop {
        match p.peek_kind() {
            TokenKind::LParen => {
                p.advance();
                let (args, keywords) = parse_arguments(p)?;
                let close = p.expect(&TokenKind::RParen)?;
                let span = node.span.to(close.span);
                node = p.node(
                    NodeKind::Call {
                        func: Box::new(node),
                        args,
                        keywords,
                    },
                    span,
                )?;
            }
            TokenKind::LBracket => {
                p.advance();
                let index = parse_subscript_list(p)?;
                let close = p.expect(&TokenKind::RBracket)?;
                let span = node.span.to(close.span);
                node = p.node(
                    NodeKind::Subscript {
                        value: Box::new(node),
                        index: Box::new(index),
                    },
                    span,
                )?;
            }
            TokenKind::Dot => {
                p.advance();
                let attr = match p.peek_kind() {
                    TokenKind::Name(name) => name.clone(),
                    _ => return Err(p.unexpected()),
                };
                let name = p.advance();
                let span = node.span.to(name.span);
                node = p.node(
                    NodeKind::Attribute {
                        value: Box::new(node),
                        attr,
                    },
                    span,
                )?;
            }
            _ => return Ok(node),
        }
    }
}

/// Call arguments up to (not including) the closing parenthesis.
fn parse_arguments(p: &mut Parser) -> Result<(Vec<Node>, Vec<KeywordArg>), PayoffError> {
    let mut args = Vec::new();
    let mut keywords = Vec::new();

    while !p.at(&TokenKind::RParen) {
        if let Some(stars) = p.eat(&TokenKind::DoubleStar) {
            let value = parse_test(p)?;
            return Err(PayoffError::unsafe_construct(
                "keyword argument unpacking",
                p.source,
                stars.span.to(value.span),
            ));
        }

        let is_keyword = matches!(p.peek_kind(), TokenKind::Name(_))
            && matches!(p.peek_nth_kind(1), TokenKind::Assign);
        if is_keyword {
            let name_token = p.advance();
            p.advance();
            let value = parse_test(p)?;
            let name = match name_token.kind {
                TokenKind::Name(name) => name,
                _ => String::new(),
            };
            let span = name_token.span.to(value.span);
            keywords.push(KeywordArg { name, value, span });
        } else {
            args.push(parse_star_or_test(p)?);
        }

        if p.eat(&TokenKind::Comma).is_none() {
            break;
        }
    }
    Ok((args, keywords))
}

/// Contents of `[...]` after a subscripted value: an index, a slice, or a
/// comma-separated tuple of them.
fn parse_subscript_list(p: &mut Parser) -> Result<Node, PayoffError> {
    let first = parse_subscript(p)?;
    if !p.at(&TokenKind::Comma) {
        return Ok(first);
    }

    let start = first.span;
    let mut end = start;
    let mut items = vec![first];
    while let Some(comma) = p.eat(&TokenKind::Comma) {
        end = comma.span;
        if p.at(&TokenKind::RBracket) {
            break;
        }
        let item = parse_subscript(p)?;
        end = item.span;
        items.push(item);
    }
    p.node(NodeKind::Tuple(items), start.to(end))
}

fn parse_subscript(p: &mut Parser) -> Result<Node, PayoffError> {
    let start = p.peek().span;
    let lower = if p.at(&TokenKind::Colon) {
        None
    } else {
        let index = parse_test(p)?;
        if !p.at(&TokenKind::Colon) {
            return Ok(index);
        }
        Some(Box::new(index))
    };

    let mut end = p.expect(&TokenKind::Colon)?.span;
    let upper = parse_slice_bound(p)?;
    let mut step = None;
    if let Some(colon) = p.eat(&TokenKind::Colon) {
        end = colon.span;
        step = parse_slice_bound(p)?;
    }
    if let Some(bound) = upper.iter().chain(step.iter()).last() {
        end = end.to(bound.span);
    }
    p.node(NodeKind::Slice { lower, upper, step }, start.to(end))
}

fn parse_slice_bound(p: &mut Parser) -> Result<Option<Box<Node>>, PayoffError> {
    match p.peek_kind() {
        TokenKind::Colon | TokenKind::Comma | TokenKind::RBracket => Ok(None),
        _ => Ok(Some(Box::new(parse_test(p)?))),
    }
}

fn parse_atom(p: &mut Parser) -> Result<Node, PayoffError> {
    let token = p.peek().clone();
    match token.kind {
        TokenKind::Number(value) => {
            p.advance();
            Ok(Node::new(NodeKind::Number(value), token.span))
        }
        TokenKind::True | TokenKind::False => {
            p.advance();
            Ok(Node::new(
                NodeKind::Bool(token.kind == TokenKind::True),
                token.span,
            ))
        }
        TokenKind::None => {
            p.advance();
            Ok(Node::new(NodeKind::NoneLiteral, token.span))
        }
        TokenKind::Name(name) => {
            p.advance();
            Ok(Node::new(NodeKind::Name(name), token.span))
        }
        TokenKind::Str(mut text) => {
            p.advance();
            let mut span = token.span;
            // Adjacent literals concatenate.
            while let TokenKind::Str(more) = p.peek_kind().clone() {
                span = span.to(p.advance().span);
                text.push_str(&more);
            }
            Ok(Node::new(NodeKind::Str(text), span))
        }
        TokenKind::LParen => {
            p.advance();
            if let Some(close) = p.eat(&TokenKind::RParen) {
                return p.node(NodeKind::Tuple(Vec::new()), token.span.to(close.span));
            }
            let mut inner = parse_expression_list(p)?;
            let close = p.expect(&TokenKind::RParen)?;
            inner.span = token.span.to(close.span);
            Ok(inner)
        }
        TokenKind::LBracket => {
            p.advance();
            let mut items = Vec::new();
            while !p.at(&TokenKind::RBracket) {
                items.push(parse_star_or_test(p)?);
                if p.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
            let close = p.expect(&TokenKind::RBracket)?;
            p.node(NodeKind::List(items), token.span.to(close.span))
        }
        _ => Err(p.unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Node {
        parse(source).unwrap_or_else(|e| panic!("{source}: {e}"))
    }

    #[test]
    fn parse_call_with_arguments() {
        let node = parse_ok("max(price - 100, 0)");
        let NodeKind::Call { func, args, keywords } = node.kind else {
            panic!("expected call");
        };
        assert_eq!(func.kind, NodeKind::Name("max".to_string()));
        assert_eq!(args.len(), 2);
        assert!(keywords.is_empty());
        assert!(matches!(
            args[0].kind,
            NodeKind::Binary {
                op: BinaryOperator::Sub,
                ..
            }
        ));
        assert_eq!(node.span, Span::new(0, 19));
    }

    #[test]
    fn parse_precedence() {
        // 1 + 2 * 3 -> Add(1, Mul(2, 3))
        let node = parse_ok("1 + 2 * 3");
        let NodeKind::Binary { op, rhs, .. } = node.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(
            rhs.kind,
            NodeKind::Binary {
                op: BinaryOperator::Mul,
                ..
            }
        ));
    }

    #[test]
    fn parse_unary_minus_binds_looser_than_power() {
        let node = parse_ok("-2 ** 2");
        let NodeKind::Unary { op, operand } = node.kind else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::Minus);
        assert!(matches!(
            operand.kind,
            NodeKind::Binary {
                op: BinaryOperator::Pow,
                ..
            }
        ));
    }

    #[test]
    fn parse_power_is_right_associative() {
        let node = parse_ok("2 ** 3 ** 2");
        let NodeKind::Binary { lhs, rhs, .. } = node.kind else {
            panic!("expected binary");
        };
        assert_eq!(lhs.kind, NodeKind::Number(2.0));
        assert!(matches!(rhs.kind, NodeKind::Binary { .. }));
    }

    #[test]
    fn parse_comparison_chain() {
        let node = parse_ok("90 < price <= 110");
        let NodeKind::Compare { rest, .. } = node.kind else {
            panic!("expected comparison");
        };
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].0, CompareOperator::Lt);
        assert_eq!(rest[1].0, CompareOperator::Le);
    }

    #[test]
    fn parse_membership_and_identity() {
        let node = parse_ok("price not in path");
        assert!(matches!(
            node.kind,
            NodeKind::Compare { ref rest, .. } if rest[0].0 == CompareOperator::NotIn
        ));
        let node = parse_ok("price is not None");
        assert!(matches!(
            node.kind,
            NodeKind::Compare { ref rest, .. } if rest[0].0 == CompareOperator::IsNot
        ));
    }

    #[test]
    fn parse_conditional() {
        let node = parse_ok("price - 100 if price > 100 else 0");
        assert!(matches!(node.kind, NodeKind::IfExp { .. }));
    }

    #[test]
    fn parse_subscripts_and_slices() {
        let node = parse_ok("path[-1]");
        let NodeKind::Subscript { index, .. } = node.kind else {
            panic!("expected subscript");
        };
        assert!(matches!(index.kind, NodeKind::Unary { .. }));

        let node = parse_ok("path[1:-1:2]");
        let NodeKind::Subscript { index, .. } = node.kind else {
            panic!("expected subscript");
        };
        let NodeKind::Slice { lower, upper, step } = index.kind else {
            panic!("expected slice");
        };
        assert!(lower.is_some() && upper.is_some() && step.is_some());

        let node = parse_ok("path[::]");
        let NodeKind::Subscript { index, .. } = node.kind else {
            panic!("expected subscript");
        };
        assert_eq!(
            index.kind,
            NodeKind::Slice {
                lower: None,
                upper: None,
                step: None
            }
        );
    }

    #[test]
    fn parse_attribute_and_keyword_arguments() {
        let node = parse_ok("math.log(price, base=2)");
        let NodeKind::Call { func, keywords, .. } = node.kind else {
            panic!("expected call");
        };
        assert!(matches!(func.kind, NodeKind::Attribute { ref attr, .. } if attr == "log"));
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "base");
    }

    #[test]
    fn parse_tuples_and_lists() {
        assert!(matches!(parse_ok("(1, 2)").kind, NodeKind::Tuple(ref v) if v.len() == 2));
        assert!(matches!(parse_ok("1, 2,").kind, NodeKind::Tuple(ref v) if v.len() == 2));
        assert!(matches!(parse_ok("()").kind, NodeKind::Tuple(ref v) if v.is_empty()));
        assert!(matches!(parse_ok("[1, 2, 3,]").kind, NodeKind::List(ref v) if v.len() == 3));
        assert!(matches!(parse_ok("(price)").kind, NodeKind::Name(_)));
    }

    #[test]
    fn parse_statement_keywords_are_unsafe() {
        for source in ["import os", "from os import path", "lambda: 1", "yield 1"] {
            let err = parse(source).unwrap_err();
            assert!(err.is_unsafe(), "{source}: {err}");
        }
        let err = parse("import os").unwrap_err();
        assert_eq!(err.fragment(), "import os");
        assert_eq!(err.span(), Span::new(0, 9));
    }

    #[test]
    fn parse_assignment_forms_are_unsafe() {
        for source in [
            "x = 1",
            "(x := 1)",
            "price += 1",
            "price; 1",
            "{1: 2}",
            "[x for x in path]",
        ] {
            let err = parse(source).unwrap_err();
            assert!(err.is_unsafe(), "{source}: {err}");
        }
    }

    #[test]
    fn parse_syntax_errors_are_invalid() {
        for source in ["", "   ", "1 +", "max(1,", "(1", "price price", "path[]", "1 if 2"] {
            let err = parse(source).unwrap_err();
            assert!(!err.is_unsafe(), "{source}: {err}");
        }
    }

    #[test]
    fn parse_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        let err = parse(&deep).unwrap_err();
        assert!(err.to_string().contains("nested"), "{err}");

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse(&shallow).is_ok());
    }

    #[test]
    fn parse_nesting_limit_through_starred_items() {
        let levels = 50_000;
        let cases = [
            format!("{}1{}", "(*".repeat(levels), ")".repeat(levels)),
            format!("{}1{}", "[*".repeat(levels), "]".repeat(levels)),
            format!("{}1{}", "f(*".repeat(levels), ")".repeat(levels)),
            format!("{}1{}", "path[".repeat(levels), "]".repeat(levels)),
            format!("{}1{}", "f(".repeat(levels), ")".repeat(levels)),
        ];
        for source in &cases {
            let err = parse(source).unwrap_err();
            assert!(err.to_string().contains("nested"), "{err}");
        }

        let levels = MAX_NESTING + 1;
        let starred = format!("{}1{}", "(*".repeat(levels), ")".repeat(levels));
        assert!(parse(&starred).is_err());
        assert!(parse("(*path, 1)").is_ok());
    }

    #[test]
    fn parse_depth_limit_on_long_chains() {
        let long = vec!["1"; MAX_DEPTH + 5].join(" + ");
        let err = parse(&long).unwrap_err();
        assert!(err.to_string().contains("deeper"), "{err}");
    }
}
