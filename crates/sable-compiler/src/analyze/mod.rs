//! Semantic analysis.
//!
//! Turns a parsed CST into a typed AST plus a scope tree:
//! - Building (build): structural matching of CST nodes, scopes and symbols
//! - Type inference (infer): candidate types of expressions
//! - Semantic validation (validate): whole-program rules

mod build;
pub mod infer;
pub mod scope;
pub mod symbols;
pub mod types;
mod validate;

#[cfg(test)]
mod infer_tests;
#[cfg(test)]
mod scope_tests;
#[cfg(test)]
mod types_tests;

pub use build::{AstBuilder, BuildOptions, DEFAULT_RECURSION_FUEL};
pub use infer::{
    CalleeSignature, Inference, MemberTarget, ResolveError, infer_possible_types, is_assignable,
};
pub use scope::{GLOBAL_SCOPE, Scope, ScopeId, ScopeKind, ScopeTree, SymbolError};
pub use symbols::{
    FunctionSymbol, ParamSig, ParameterSymbol, Symbol, SymbolKind, TypeParamSig, VariableSymbol,
    VariableValue,
};
pub use types::{FunctionType, Type, TypeSet};
pub use validate::{ValidateOptions, validate};
