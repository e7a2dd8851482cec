//! Semantic types and inferred type sets.
//!
//! Two types are the same type exactly when their rendered forms match, so
//! [`TypeSet`] keys its members by [`Type::key`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use sable_core::NumberSize;

use crate::ast::{Primitive, TypeExpr};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Bool,
    String,
    Path,
    Regex,
    Number(NumberSize),
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Object(BTreeMap<String, Type>),
    Function(FunctionType),
    /// A class, enum or interface, with type arguments for instances.
    Named { name: String, args: Vec<Type> },
    /// A type parameter of the enclosing generic declaration.
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn array(element: Type) -> Self {
        Self::Array(Box::new(element))
    }

    /// Identity of the type for set membership and equality checks.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn as_number(&self) -> Option<NumberSize> {
        match self {
            Self::Number(size) => Some(*size),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Converts a written annotation.
    pub fn from_expr(expr: &TypeExpr) -> Self {
        match expr {
            TypeExpr::Primitive(t) => match t.primitive {
                Primitive::Bool => Self::Bool,
                Primitive::String => Self::String,
                Primitive::Path => Self::Path,
                Primitive::Regex => Self::Regex,
            },
            TypeExpr::Number(t) => Self::Number(t.size),
            TypeExpr::Array(t) => Self::array(Self::from_expr(&t.element)),
            TypeExpr::Function(t) => Self::Function(FunctionType {
                params: t.params.iter().map(Self::from_expr).collect(),
                returns: t.returns.iter().map(Self::from_expr).collect(),
            }),
            TypeExpr::Instance(t) => Self::Named {
                name: t.name.clone(),
                args: t.args.iter().map(Self::from_expr).collect(),
            },
            TypeExpr::Named(t) if t.is_type_param => Self::Param(t.name.clone()),
            TypeExpr::Named(t) => Self::named(t.name.clone()),
        }
    }

    /// Replaces type parameters bound in `bindings`.
    pub fn substitute(&self, bindings: &HashMap<String, Type>) -> Type {
        match self {
            Self::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Array(element) => Self::array(element.substitute(bindings)),
            Self::Tuple(items) => {
                Self::Tuple(items.iter().map(|t| t.substitute(bindings)).collect())
            }
            Self::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(key, t)| (key.clone(), t.substitute(bindings)))
                    .collect(),
            ),
            Self::Function(func) => Self::Function(FunctionType {
                params: func.params.iter().map(|t| t.substitute(bindings)).collect(),
                returns: func.returns.iter().map(|t| t.substitute(bindings)).collect(),
            }),
            Self::Named { name, args } => Self::Named {
                name: name.clone(),
                args: args.iter().map(|t| t.substitute(bindings)).collect(),
            },
            Self::Bool | Self::String | Self::Path | Self::Regex | Self::Number(_) => self.clone(),
        }
    }

    /// Whether a value of type `self` may be stored where `target` is
    /// expected: same type, or a number of the same category that is no
    /// wider than the target.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if let (Some(from), Some(to)) = (self.as_number(), target.as_number()) {
            return from.widens_to(to);
        }
        self.key() == target.key()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Path => f.write_str("path"),
            Self::Regex => f.write_str("regex"),
            Self::Number(size) => f.write_str(size.name()),
            Self::Array(element) if matches!(**element, Self::Function(_)) => {
                write!(f, "({element})[]")
            }
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {ty}")?;
                }
                f.write_str("}")
            }
            Self::Function(func) => {
                f.write_str("f(")?;
                write_list(f, &func.params)?;
                f.write_str(")")?;
                if !func.returns.is_empty() {
                    f.write_str(" -> ")?;
                    write_list(f, &func.returns)?;
                }
                Ok(())
            }
            Self::Named { name, args } if args.is_empty() => f.write_str(name),
            Self::Named { name, args } => {
                write!(f, "{name}<|")?;
                write_list(f, args)?;
                f.write_str("|>")
            }
            Self::Param(name) => f.write_str(name),
        }
    }
}

/// Insertion-ordered set of candidate types for an expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypeSet {
    types: IndexMap<String, Type>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(ty: Type) -> Self {
        let mut set = Self::new();
        set.insert(ty);
        set
    }

    pub fn insert(&mut self, ty: Type) {
        self.types.entry(ty.key()).or_insert(ty);
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.types.contains_key(&ty.key())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// The only member, if there is exactly one.
    pub fn only(&self) -> Option<&Type> {
        match self.types.len() {
            1 => self.types.values().next(),
            _ => None,
        }
    }

    /// Members of `self` that are also in `other`, in `self`'s order.
    pub fn intersection(&self, other: &TypeSet) -> TypeSet {
        self.iter().filter(|ty| other.contains(ty)).cloned().collect()
    }

    pub fn same_members(&self, other: &TypeSet) -> bool {
        self.len() == other.len() && self.keys().all(|key| other.types.contains_key(key))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Type) -> bool) {
        self.types.retain(|_, ty| keep(ty));
    }

    /// Whether an expression with these candidate types fits `declared`.
    ///
    /// An empty set (nothing could be inferred) never fits. Otherwise the
    /// declared type must be a candidate, or every candidate must be a
    /// number that widens to the declared number type.
    pub fn is_assignable_to(&self, declared: &Type) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.contains(declared) {
            return true;
        }
        match declared.as_number() {
            Some(target) => self
                .iter()
                .all(|ty| ty.as_number().is_some_and(|size| size.widens_to(target))),
            None => false,
        }
    }
}

impl FromIterator<Type> for TypeSet {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        let mut set = Self::new();
        for ty in iter {
            set.insert(ty);
        }
        set
    }
}

impl Extend<Type> for TypeSet {
    fn extend<I: IntoIterator<Item = Type>>(&mut self, iter: I) {
        for ty in iter {
            self.insert(ty);
        }
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, key) in self.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key)?;
        }
        f.write_str("}")
    }
}
