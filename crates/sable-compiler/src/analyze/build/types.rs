//! Type annotations.

use sable_core::NumberSize;

use crate::Result;
use crate::ast::{
    ArrayTypeExpr, FunctionTypeExpr, InstanceTypeExpr, NamedTypeExpr, NumberTypeExpr, Primitive,
    PrimitiveTypeExpr, TypeExpr,
};
use crate::diagnostics::AnalysisCode;
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode, kind_sets};

use super::literals::token_text;
use super::{AstBuilder, PositionalSlot, SeparatedList, Slot};

const TYPE_ARGS: SeparatedList = SeparatedList::delimited(
    SyntaxKind::TypeArgsOpen,
    SyntaxKind::TypeArgsClose,
    kind_sets::TYPE,
    AnalysisCode::ExpectedType,
);

const TYPE_LIST: SeparatedList = SeparatedList::delimited(
    SyntaxKind::ParenOpen,
    SyntaxKind::ParenClose,
    kind_sets::TYPE,
    AnalysisCode::ExpectedType,
);

const RETURN_TYPES: SeparatedList =
    SeparatedList::bare(kind_sets::TYPE, AnalysisCode::ExpectedReturnType)
        .opened_by(SyntaxKind::Arrow);

#[derive(Default)]
struct InstanceParts {
    name: String,
    args: Vec<TypeExpr>,
}

#[derive(Default)]
struct FunctionTypeParts {
    params: Vec<TypeExpr>,
    returns: Vec<TypeExpr>,
}

impl AstBuilder<'_> {
    pub(super) fn primitive_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let name = self.single_token(node, SyntaxKind::PrimitiveName)?;
        let primitive = Primitive::from_name(&name.1)
            .ok_or_else(|| self.analysis_error(AnalysisCode::ExpectedType, &name.0, &name.1))?;
        Ok(TypeExpr::Primitive(PrimitiveTypeExpr { meta, primitive }))
    }

    pub(super) fn number_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let name = self.single_token(node, SyntaxKind::NumberName)?;
        let size = NumberSize::from_name(&name.1)
            .ok_or_else(|| self.analysis_error(AnalysisCode::ExpectedType, &name.0, &name.1))?;
        Ok(TypeExpr::Number(NumberTypeExpr { meta, size }))
    }

    pub(super) fn named_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let (_, name) = self.single_token(node, SyntaxKind::Id)?;
        let is_type_param = self.is_type_param(&name);
        Ok(TypeExpr::Named(NamedTypeExpr {
            meta,
            name,
            is_type_param,
        }))
    }

    pub(super) fn instance_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let slots = [
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedType,
                |_, parts: &mut InstanceParts, token| {
                    parts.name = token_text(token);
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::TypeArgList),
                AnalysisCode::ExpectedTypeArguments,
                |b, parts, list| {
                    parts.args = b.type_args(b.node(list)?)?;
                    Ok(())
                },
            ),
        ];
        let mut parts = InstanceParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut ty = InstanceTypeExpr {
            meta,
            name: parts.name,
            args: parts.args,
        };
        ty.meta.own_all(ty.args.iter_mut());
        Ok(TypeExpr::Instance(ty))
    }

    pub(super) fn function_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let slots = [
            Slot::token(SyntaxKind::KwF, AnalysisCode::ExpectedFunctionKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::TypeList),
                AnalysisCode::ExpectedParameterList,
                |b, parts: &mut FunctionTypeParts, list| {
                    let list = b.node(list)?;
                    parts.params = b.match_list(list, &TYPE_LIST, |b, ty| b.type_expr(ty))?;
                    Ok(())
                },
            ),
            Slot::optional(
                KindSet::single(SyntaxKind::ReturnTypes),
                |b, parts, returns| {
                    parts.returns = b.return_types(b.node(returns)?)?;
                    Ok(())
                },
            ),
        ];
        let mut parts = FunctionTypeParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut ty = FunctionTypeExpr {
            meta,
            params: parts.params,
            returns: parts.returns,
        };
        ty.meta.own_all(ty.params.iter_mut());
        ty.meta.own_all(ty.returns.iter_mut());
        Ok(TypeExpr::Function(ty))
    }

    pub(super) fn array_type(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        let meta = self.meta(&node.clone().into());
        let slots = [
            PositionalSlot::required(kind_sets::TYPE, AnalysisCode::ExpectedType, |b, ty| {
                b.type_expr(ty).map(Some)
            }),
            PositionalSlot::required(
                KindSet::single(SyntaxKind::BracketOpen),
                AnalysisCode::ExpectedDelimiter,
                |_, _| Ok(None),
            ),
            PositionalSlot::required(
                KindSet::single(SyntaxKind::BracketClose),
                AnalysisCode::ExpectedDelimiter,
                |_, _| Ok(None),
            ),
        ];
        let element = self
            .match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .flatten()
            .next();
        let element = element.ok_or_else(|| self.unexpected(&node.clone().into()))?;
        let mut ty = ArrayTypeExpr { meta, element };
        ty.meta.own(&mut ty.element);
        Ok(TypeExpr::Array(Box::new(ty)))
    }

    /// `<| T, U |>`
    pub(super) fn type_args(&mut self, list: &SyntaxNode) -> Result<Vec<TypeExpr>> {
        self.match_list(list, &TYPE_ARGS, |b, ty| b.type_expr(ty))
    }

    /// `-> T, U`. At least one type is required.
    pub(super) fn return_types(&mut self, node: &SyntaxNode) -> Result<Vec<TypeExpr>> {
        let types = self.match_list(node, &RETURN_TYPES, |b, ty| b.type_expr(ty))?;
        if types.is_empty() {
            let found = format!("end of {}", node.kind().describe());
            return Err(self.analysis_error(
                AnalysisCode::ExpectedReturnType,
                &node.clone().into(),
                found,
            ));
        }
        Ok(types)
    }

    /// The only child of `node`, which must be a `kind` token, with its text.
    fn single_token(
        &mut self,
        node: &SyntaxNode,
        kind: SyntaxKind,
    ) -> Result<(SyntaxElement, String)> {
        let slots = [PositionalSlot::required(
            KindSet::single(kind),
            AnalysisCode::ExpectedType,
            |_, token| Ok((token.clone(), token_text(token))),
        )];
        self.match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| self.unexpected(&node.clone().into()))
    }
}
