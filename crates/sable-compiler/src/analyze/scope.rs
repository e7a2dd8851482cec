//! Scope tree: symbols per lexical nesting level.
//!
//! Scopes live in an arena and point to their parent by id. A cursor
//! (`current`) moves down on [`ScopeTree::create_child`] and
//! [`ScopeTree::enter`] and up on [`ScopeTree::exit`]; lookups start at the
//! cursor and walk outward.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use sable_core::Position;

use super::symbols::{Symbol, SymbolKind};

pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Global,
    Function,
    Class,
    Enum,
    Interface,
    Block,
    Loop,
}

impl ScopeKind {
    /// Scopes that give a name to a type.
    pub fn is_type(self) -> bool {
        matches!(self, Self::Class | Self::Enum | Self::Interface)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    pub pos: Position,
    #[serde(skip)]
    pub parent: Option<ScopeId>,
    #[serde(skip)]
    pub children: IndexMap<String, ScopeId>,
    pub symbols: IndexMap<String, Symbol>,
}

impl Scope {
    pub fn symbol(&self, name: &str, kinds: &[SymbolKind]) -> Option<&Symbol> {
        self.symbols
            .get(name)
            .filter(|symbol| kinds.contains(&symbol.kind()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("scope `{0}` not found")]
    ScopeNotFound(String),
    #[error("cannot exit the global scope")]
    AtRoot,
    #[error("`{0}` is already defined in this scope")]
    DuplicateIdentifier(String),
    #[error("symbol `{0}` not found")]
    SymbolNotFound(String),
    #[error("`{name}` is a {found}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: SymbolKind,
        found: SymbolKind,
    },
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                name: GLOBAL_SCOPE.to_owned(),
                kind: ScopeKind::Global,
                pos: Position::default(),
                parent: None,
                children: IndexMap::new(),
                symbols: IndexMap::new(),
            }],
            current: ScopeId::ROOT,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn current_scope(&self) -> &Scope {
        self.scope(self.current)
    }

    pub fn root(&self) -> &Scope {
        self.scope(ScopeId::ROOT)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Number of scopes between the cursor and the root.
    pub fn depth(&self) -> usize {
        self.ancestors(self.current).count() - 1
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), |&id| self.scope(id).parent)
    }

    /// Scope names from the root down to `id`, joined with `.`.
    pub fn path(&self, id: ScopeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|id| self.scope(id).name.as_str())
            .collect();
        names.reverse();
        names.join(".")
    }

    /// Creates a child of the current scope and moves into it. An existing
    /// child with the same name is replaced.
    pub fn create_child(
        &mut self,
        name: impl Into<String>,
        kind: ScopeKind,
        pos: Position,
    ) -> ScopeId {
        let name = name.into();
        let id = ScopeId(self.scopes.len());
        trace!(parent = %self.path(self.current), scope = %name, "create scope");
        self.scopes.push(Scope {
            name: name.clone(),
            kind,
            pos,
            parent: Some(self.current),
            children: IndexMap::new(),
            symbols: IndexMap::new(),
        });
        self.scopes[self.current.0].children.insert(name, id);
        self.current = id;
        id
    }

    pub fn child(&self, parent: ScopeId, name: &str) -> Option<ScopeId> {
        self.scope(parent).children.get(name).copied()
    }

    pub fn enter(&mut self, name: &str) -> Result<ScopeId, SymbolError> {
        let id = self
            .child(self.current, name)
            .ok_or_else(|| SymbolError::ScopeNotFound(name.to_owned()))?;
        trace!(scope = %name, "enter scope");
        self.current = id;
        Ok(id)
    }

    pub fn exit(&mut self) -> Result<ScopeId, SymbolError> {
        let parent = self.current_scope().parent.ok_or(SymbolError::AtRoot)?;
        trace!(scope = %self.current_scope().name, "exit scope");
        self.current = parent;
        Ok(parent)
    }

    /// Adds a symbol to the current scope. Names are unique per scope
    /// across all symbol kinds.
    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) -> Result<(), SymbolError> {
        self.insert_in(self.current, name, symbol)
    }

    /// Like [`Self::insert`], into `scope` instead of the cursor's scope.
    pub fn insert_in(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        symbol: Symbol,
    ) -> Result<(), SymbolError> {
        let name = name.into();
        let scope = &mut self.scopes[scope.0];
        if scope.symbols.contains_key(&name) {
            return Err(SymbolError::DuplicateIdentifier(name));
        }
        trace!(scope = %scope.name, symbol = %name, kind = %symbol.kind(), "insert symbol");
        scope.symbols.insert(name, symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str, kinds: &[SymbolKind]) -> Option<&Symbol> {
        self.resolve(name, kinds).map(|(_, symbol)| symbol)
    }

    /// Like [`Self::lookup`], also returning the scope that defines the symbol.
    pub fn resolve(&self, name: &str, kinds: &[SymbolKind]) -> Option<(ScopeId, &Symbol)> {
        self.resolve_from(self.current, name, kinds)
    }

    pub fn resolve_from(
        &self,
        from: ScopeId,
        name: &str,
        kinds: &[SymbolKind],
    ) -> Option<(ScopeId, &Symbol)> {
        self.ancestors(from)
            .find_map(|id| Some((id, self.scope(id).symbol(name, kinds)?)))
    }

    /// Applies `update` to the nearest symbol named `name`.
    pub fn update_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        update: impl FnOnce(&mut Symbol),
    ) -> Result<(), SymbolError> {
        let (scope, found) = self
            .resolve(name, SymbolKind::ANY)
            .map(|(scope, symbol)| (scope, symbol.kind()))
            .ok_or_else(|| SymbolError::SymbolNotFound(name.to_owned()))?;
        if found != kind {
            return Err(SymbolError::KindMismatch {
                name: name.to_owned(),
                expected: kind,
                found,
            });
        }
        if let Some(symbol) = self.scopes[scope.0].symbols.get_mut(name) {
            update(symbol);
        }
        Ok(())
    }

    /// Re-keys `id` under its parent.
    pub fn rename(&mut self, id: ScopeId, new_name: impl Into<String>) -> Result<(), SymbolError> {
        let new_name = new_name.into();
        let scope = self.scope(id);
        let parent = scope
            .parent
            .ok_or_else(|| SymbolError::ScopeNotFound(scope.name.clone()))?;
        let old_name = scope.name.clone();
        let children = &mut self.scopes[parent.0].children;
        if children.get(&old_name) == Some(&id) {
            children.shift_remove(&old_name);
        }
        trace!(from = %old_name, to = %new_name, "rename scope");
        children.insert(new_name.clone(), id);
        self.scopes[id.0].name = new_name;
        Ok(())
    }

    /// Searches the children of `from` and then of each ancestor.
    pub fn find_scope_from(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        self.ancestors(from).find_map(|id| self.child(id, name))
    }

    pub fn find_scope(&self, name: &str) -> Option<ScopeId> {
        self.find_scope_from(self.current, name)
    }

    /// A class, enum or interface scope visible from `from`.
    pub fn find_type_scope(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        self.ancestors(from)
            .filter_map(|id| self.child(id, name))
            .find(|&id| self.scope(id).kind.is_type())
    }
}

impl Serialize for ScopeTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScopeView {
            tree: self,
            id: ScopeId::ROOT,
        }
        .serialize(serializer)
    }
}

/// Nested view of one scope for serialization.
struct ScopeView<'t> {
    tree: &'t ScopeTree,
    id: ScopeId,
}

impl Serialize for ScopeView<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let scope = self.tree.scope(self.id);
        let children: IndexMap<&str, ScopeView<'_>> = scope
            .children
            .iter()
            .map(|(name, &id)| {
                (
                    name.as_str(),
                    ScopeView {
                        tree: self.tree,
                        id,
                    },
                )
            })
            .collect();
        let mut state = serializer.serialize_struct("Scope", 4)?;
        state.serialize_field("name", &scope.name)?;
        state.serialize_field("kind", &scope.kind)?;
        state.serialize_field("symbols", &scope.symbols)?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}
