//! Expressions.

use rowan::NodeOrToken;

use crate::Result;
use crate::ast::{
    ArrayExpr, BinaryExpr, BinaryOp, CallExpr, Expr, Identifier, IndexExpr, MemberExpr,
    ObjectExpr, ObjectField, TernaryExpr, TupleExpr, TypeExpr, UnaryExpr, UnaryOp,
};
use crate::diagnostics::AnalysisCode;
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode, kind_sets};

use super::literals::token_text;
use super::{AstBuilder, PositionalSlot, SeparatedList, Slot, significant_children};

const ARGS: SeparatedList = SeparatedList::delimited(
    SyntaxKind::ParenOpen,
    SyntaxKind::ParenClose,
    kind_sets::EXPR,
    AnalysisCode::ExpectedExpression,
);

const ARRAY: SeparatedList = SeparatedList::delimited(
    SyntaxKind::BracketOpen,
    SyntaxKind::BracketClose,
    kind_sets::EXPR,
    AnalysisCode::ExpectedExpression,
);

const OBJECT: SeparatedList = SeparatedList::delimited(
    SyntaxKind::BraceOpen,
    SyntaxKind::BraceClose,
    KindSet::single(SyntaxKind::ObjectField),
    AnalysisCode::ExpectedObjectKey,
);

const EXPR_LIST: SeparatedList =
    SeparatedList::bare(kind_sets::EXPR, AnalysisCode::ExpectedExpression);

/// Children of an operator, call, member or index expression.
#[derive(Default)]
struct Operands {
    exprs: Vec<Expr>,
    op: Option<SyntaxKind>,
    member: Option<Identifier>,
    type_args: Vec<TypeExpr>,
    args: Vec<Expr>,
    /// Already built left operand of a left-nested binary chain.
    chained: Option<Expr>,
}

fn push_operand(b: &mut AstBuilder<'_>, parts: &mut Operands, expr: &SyntaxElement) -> Result<()> {
    parts.exprs.push(b.expr(expr)?);
    Ok(())
}

fn take_lhs(b: &mut AstBuilder<'_>, parts: &mut Operands, expr: &SyntaxElement) -> Result<()> {
    let lhs = match parts.chained.take() {
        Some(built) => built,
        None => b.expr(expr)?,
    };
    parts.exprs.push(lhs);
    Ok(())
}

fn take_op(_: &mut AstBuilder<'_>, parts: &mut Operands, op: &SyntaxElement) -> Result<()> {
    parts.op = Some(op.kind());
    Ok(())
}

fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    let op = match kind {
        SyntaxKind::OrOr => BinaryOp::Or,
        SyntaxKind::AndAnd => BinaryOp::And,
        SyntaxKind::EqEq => BinaryOp::Eq,
        SyntaxKind::NotEq => BinaryOp::NotEq,
        SyntaxKind::Lt => BinaryOp::Lt,
        SyntaxKind::LtEq => BinaryOp::LtEq,
        SyntaxKind::Gt => BinaryOp::Gt,
        SyntaxKind::GtEq => BinaryOp::GtEq,
        SyntaxKind::Plus => BinaryOp::Add,
        SyntaxKind::Minus => BinaryOp::Sub,
        SyntaxKind::Star => BinaryOp::Mul,
        SyntaxKind::Slash => BinaryOp::Div,
        SyntaxKind::Percent => BinaryOp::Rem,
        SyntaxKind::Exp => BinaryOp::Exp,
        _ => return None,
    };
    Some(op)
}

fn unary_op(kind: SyntaxKind) -> Option<UnaryOp> {
    let op = match kind {
        SyntaxKind::Bang => UnaryOp::Not,
        SyntaxKind::Minus => UnaryOp::Neg,
        SyntaxKind::PlusPlus => UnaryOp::Inc,
        SyntaxKind::MinusMinus => UnaryOp::Dec,
        _ => return None,
    };
    Some(op)
}

impl AstBuilder<'_> {
    /// Exactly `N` operands, as the slots already guaranteed.
    fn operands<const N: usize>(
        &self,
        exprs: Vec<Expr>,
        element: &SyntaxElement,
    ) -> Result<[Expr; N]> {
        <[Expr; N]>::try_from(exprs).map_err(|_| self.unexpected(element))
    }

    pub(super) fn ternary_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedCondition, push_operand),
            Slot::token(SyntaxKind::Question, AnalysisCode::ExpectedDelimiter),
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_operand),
            Slot::token(SyntaxKind::Colon, AnalysisCode::ExpectedDelimiter),
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_operand),
        ];
        let mut parts = Operands::default();
        self.match_record(node, &slots, &mut parts)?;
        let [condition, consequent, alternate] = self.operands(parts.exprs, &element)?;
        let mut expr = TernaryExpr {
            meta,
            condition,
            consequent,
            alternate,
        };
        expr.meta.own(&mut expr.condition);
        expr.meta.own(&mut expr.consequent);
        expr.meta.own(&mut expr.alternate);
        Ok(Expr::Ternary(Box::new(expr)))
    }

    /// Left-nested chains such as `a + b + c` are walked down the left
    /// spine first and then built innermost-out, so their length does not
    /// count against the recursion fuel.
    pub(super) fn binary_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let mut spine = Vec::new();
        let mut current = node.clone();
        loop {
            let element: SyntaxElement = current.clone().into();
            let meta = self.meta(&element);
            let lhs = significant_children(&current).into_iter().next();
            spine.push((current, meta));
            match lhs {
                Some(NodeOrToken::Node(inner)) if inner.kind() == SyntaxKind::BinaryExpr => {
                    current = inner;
                }
                _ => break,
            }
        }

        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedOperand, take_lhs),
            Slot::required(kind_sets::BINARY_OPS, AnalysisCode::ExpectedOperator, take_op),
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedOperand, push_operand),
        ];
        let mut built = None;
        for (link, meta) in spine.into_iter().rev() {
            let element: SyntaxElement = link.clone().into();
            let mut parts = Operands {
                chained: built.take(),
                ..Operands::default()
            };
            self.match_record(&link, &slots, &mut parts)?;
            let op = self.filled(parts.op.and_then(binary_op), &element)?;
            let [lhs, rhs] = self.operands(parts.exprs, &element)?;
            let mut expr = BinaryExpr { meta, op, lhs, rhs };
            expr.meta.own(&mut expr.lhs);
            expr.meta.own(&mut expr.rhs);
            built = Some(Expr::Binary(Box::new(expr)));
        }
        let element: SyntaxElement = node.clone().into();
        self.filled(built, &element)
    }

    pub(super) fn unary_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::UNARY_OPS, AnalysisCode::ExpectedOperator, take_op),
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedOperand, push_operand),
        ];
        let mut parts = Operands::default();
        self.match_record(node, &slots, &mut parts)?;
        let op = self.filled(parts.op.and_then(unary_op), &element)?;
        let [operand] = self.operands(parts.exprs, &element)?;
        let mut expr = UnaryExpr { meta, op, operand };
        expr.meta.own(&mut expr.operand);
        Ok(Expr::Unary(Box::new(expr)))
    }

    /// `callee(args)` or `callee<|T|>(args)`.
    pub(super) fn call_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_operand),
            Slot::optional(KindSet::single(SyntaxKind::TypeArgList), |b, parts, list| {
                parts.type_args = b.type_args(b.node(list)?)?;
                Ok(())
            }),
            Slot::required(
                KindSet::single(SyntaxKind::ArgList),
                AnalysisCode::ExpectedArguments,
                |b, parts, list| {
                    let list = b.node(list)?;
                    parts.args = b.match_list(list, &ARGS, |b, arg| b.expr(arg))?;
                    Ok(())
                },
            ),
        ];
        let mut parts = Operands::default();
        self.match_record(node, &slots, &mut parts)?;
        let [callee] = self.operands(parts.exprs, &element)?;
        let mut expr = CallExpr {
            meta,
            callee,
            type_args: parts.type_args,
            args: parts.args,
        };
        expr.meta.own(&mut expr.callee);
        expr.meta.own_all(expr.type_args.iter_mut());
        expr.meta.own_all(expr.args.iter_mut());
        Ok(Expr::Call(Box::new(expr)))
    }

    pub(super) fn member_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_operand),
            Slot::token(SyntaxKind::Dot, AnalysisCode::ExpectedDelimiter),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedMemberName,
                |b, parts: &mut Operands, name| {
                    parts.member = Some(b.identifier(name));
                    Ok(())
                },
            ),
        ];
        let mut parts = Operands::default();
        self.match_record(node, &slots, &mut parts)?;
        let [object] = self.operands(parts.exprs, &element)?;
        let mut expr = MemberExpr {
            meta,
            object,
            member: self.filled(parts.member, &element)?,
        };
        expr.meta.own(&mut expr.object);
        expr.meta.own(&mut expr.member);
        Ok(Expr::Member(Box::new(expr)))
    }

    pub(super) fn index_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_operand),
            Slot::token(SyntaxKind::BracketOpen, AnalysisCode::ExpectedDelimiter),
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedIndex, push_operand),
            Slot::token(SyntaxKind::BracketClose, AnalysisCode::ExpectedDelimiter),
        ];
        let mut parts = Operands::default();
        self.match_record(node, &slots, &mut parts)?;
        let [object, index] = self.operands(parts.exprs, &element)?;
        let mut expr = IndexExpr { meta, object, index };
        expr.meta.own(&mut expr.object);
        expr.meta.own(&mut expr.index);
        Ok(Expr::Index(Box::new(expr)))
    }

    /// Parentheses leave no trace in the AST.
    pub(super) fn paren_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let slots = [
            PositionalSlot::required(
                KindSet::single(SyntaxKind::ParenOpen),
                AnalysisCode::ExpectedDelimiter,
                |_, _| Ok(None),
            ),
            PositionalSlot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, |b, e| {
                b.expr(e).map(Some)
            }),
            PositionalSlot::required(
                KindSet::single(SyntaxKind::ParenClose),
                AnalysisCode::ExpectedDelimiter,
                |_, _| Ok(None),
            ),
        ];
        let inner = self
            .match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .flatten()
            .next();
        self.filled(inner, &node.clone().into())
    }

    pub(super) fn tuple_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let meta = self.meta(&node.clone().into());
        let elements = self.match_list(node, &ARGS, |b, e| b.expr(e))?;
        let mut expr = TupleExpr { meta, elements };
        expr.meta.own_all(expr.elements.iter_mut());
        Ok(Expr::Tuple(expr))
    }

    pub(super) fn array_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let meta = self.meta(&node.clone().into());
        let elements = self.match_list(node, &ARRAY, |b, e| b.expr(e))?;
        let mut expr = ArrayExpr { meta, elements };
        expr.meta.own_all(expr.elements.iter_mut());
        Ok(Expr::Array(expr))
    }

    pub(super) fn object_expr(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let meta = self.meta(&node.clone().into());
        let fields = self.match_list(node, &OBJECT, |b, field| b.object_field(b.node(field)?))?;
        let mut expr = ObjectExpr { meta, fields };
        expr.meta.own_all(expr.fields.iter_mut());
        Ok(Expr::Object(expr))
    }

    /// `key: value`
    fn object_field(&mut self, node: &SyntaxNode) -> Result<ObjectField> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            PositionalSlot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedObjectKey,
                |_, key| Ok((Some(token_text(key)), None)),
            ),
            PositionalSlot::required(
                KindSet::single(SyntaxKind::Colon),
                AnalysisCode::ExpectedDelimiter,
                |_, _| Ok((None, None)),
            ),
            PositionalSlot::required(
                kind_sets::EXPR,
                AnalysisCode::ExpectedExpression,
                |b, value| Ok((None, Some(b.expr(value)?))),
            ),
        ];
        let mut key = None;
        let mut value = None;
        for (k, v) in self.match_positional(node, &slots)?.into_iter().flatten() {
            key = key.or(k);
            value = value.or(v);
        }
        let mut field = ObjectField {
            meta,
            key: self.filled(key, &element)?,
            value: self.filled(value, &element)?,
        };
        field.meta.own(&mut field.value);
        Ok(field)
    }

    /// `a, b, c` as used by `return`, `print` and `when` cases.
    pub(super) fn expr_list(&mut self, node: &SyntaxNode) -> Result<Vec<Expr>> {
        self.match_list(node, &EXPR_LIST, |b, e| b.expr(e))
    }
}
