//! Symbols stored in scopes.
//!
//! Only functions, parameters and variables are symbols. Classes, enums and
//! interfaces are represented by their scopes; enum members and interface
//! members are variables inside those scopes.

use std::fmt;

use serde::Serialize;

use sable_core::Position;

use super::types::{FunctionType, Type};
use crate::ast::{Expr, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Function,
    Parameter,
    Variable,
}

impl SymbolKind {
    pub const ANY: &'static [SymbolKind] = &[Self::Function, Self::Parameter, Self::Variable];
    pub const VALUES: &'static [SymbolKind] = &[Self::Parameter, Self::Variable];

    pub fn name(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Parameter => "parameter",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Symbol {
    Function(FunctionSymbol),
    Parameter(ParameterSymbol),
    Variable(VariableSymbol),
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Function(_) => SymbolKind::Function,
            Self::Parameter(_) => SymbolKind::Parameter,
            Self::Variable(_) => SymbolKind::Variable,
        }
    }

    pub fn pos(&self) -> Position {
        match self {
            Self::Function(s) => s.pos,
            Self::Parameter(s) => s.pos,
            Self::Variable(s) => s.pos,
        }
    }

    pub fn node(&self) -> NodeId {
        match self {
            Self::Function(s) => s.node,
            Self::Parameter(s) => s.node,
            Self::Variable(s) => s.node,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Self::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Variables declared with `let` are the only reassignable symbols.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Variable(var) if var.mutable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParamSig {
    pub name: String,
    pub constraint: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSig {
    pub name: String,
    pub ty: Option<Type>,
    pub has_default: bool,
    pub is_rest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSymbol {
    pub pos: Position,
    pub node: NodeId,
    pub type_params: Vec<TypeParamSig>,
    pub params: Vec<ParamSig>,
    pub return_types: Vec<Type>,
    /// Set when `return_types` came from the body rather than the signature.
    pub returns_inferred: bool,
}

impl FunctionSymbol {
    /// The signature as a function type, when every parameter type is known.
    pub fn as_type(&self) -> Option<Type> {
        let params = self
            .params
            .iter()
            .map(|param| param.ty.clone())
            .collect::<Option<Vec<_>>>()?;
        Some(Type::Function(FunctionType {
            params,
            returns: self.return_types.clone(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSymbol {
    pub pos: Position,
    pub node: NodeId,
    pub declared_type: Option<Type>,
    pub default: Option<Expr>,
    pub is_rest: bool,
}

/// What a variable was initialized from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VariableValue {
    Expr(Expr),
    /// The `index`-th value of a multi-value source, for `const a, b = f();`.
    Destructured { source: Expr, index: usize },
    /// The element type of an iterable, for `for` loop variables.
    Iterated(Expr),
}

impl VariableValue {
    /// What the `index`-th of `targets` targets is initialized from, given
    /// all the values of its declaration.
    pub fn for_target(values: &[Expr], targets: usize, index: usize) -> Option<Self> {
        match values {
            [] => None,
            [source] if targets > 1 => Some(Self::Destructured {
                source: source.clone(),
                index,
            }),
            _ if values.len() == targets => values.get(index).cloned().map(Self::Expr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSymbol {
    pub pos: Position,
    pub node: NodeId,
    pub mutable: bool,
    pub declared_type: Option<Type>,
    pub value: Option<VariableValue>,
}
