use sable_core::Position;

use crate::ast::NodeId;

use super::scope::{GLOBAL_SCOPE, ScopeId, ScopeKind, ScopeTree, SymbolError};
use super::symbols::{FunctionSymbol, Symbol, SymbolKind, VariableSymbol};
use super::types::Type;

fn variable(mutable: bool) -> Symbol {
    Symbol::Variable(VariableSymbol {
        pos: Position::default(),
        node: NodeId(0),
        mutable,
        declared_type: Some(Type::Bool),
        value: None,
    })
}

fn function() -> Symbol {
    Symbol::Function(FunctionSymbol {
        pos: Position::default(),
        node: NodeId(0),
        type_params: Vec::new(),
        params: Vec::new(),
        return_types: Vec::new(),
        returns_inferred: false,
    })
}

#[test]
fn starts_at_global_scope() {
    let tree = ScopeTree::new();

    assert_eq!(tree.current(), ScopeId::ROOT);
    assert_eq!(tree.root().name, GLOBAL_SCOPE);
    assert_eq!(tree.root().kind, ScopeKind::Global);
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.len(), 1);
}

#[test]
fn create_child_moves_cursor_down() {
    let mut tree = ScopeTree::new();

    let main = tree.create_child("main", ScopeKind::Function, Position::default());
    let block = tree.create_child("$block@12", ScopeKind::Block, Position::default());

    assert_eq!(tree.current(), block);
    assert_eq!(tree.depth(), 2);
    assert_eq!(tree.path(block), "global.main.$block@12");
    assert_eq!(tree.exit(), Ok(main));
    assert_eq!(tree.exit(), Ok(ScopeId::ROOT));
}

#[test]
fn exit_at_root_fails() {
    let mut tree = ScopeTree::new();

    assert_eq!(tree.exit(), Err(SymbolError::AtRoot));
    assert_eq!(tree.current(), ScopeId::ROOT);
}

#[test]
fn enter_existing_child() {
    let mut tree = ScopeTree::new();
    let main = tree.create_child("main", ScopeKind::Function, Position::default());
    tree.exit().unwrap();

    assert_eq!(tree.enter("main"), Ok(main));
    assert_eq!(
        tree.enter("nope"),
        Err(SymbolError::ScopeNotFound("nope".to_owned()))
    );
    assert_eq!(tree.current(), main);
}

#[test]
fn names_are_unique_across_kinds() {
    let mut tree = ScopeTree::new();
    tree.insert("x", variable(false)).unwrap();

    let err = tree.insert("x", function()).unwrap_err();

    assert_eq!(err, SymbolError::DuplicateIdentifier("x".to_owned()));
    insta::assert_snapshot!(err, @"`x` is already defined in this scope");
}

#[test]
fn inner_scope_may_shadow() {
    let mut tree = ScopeTree::new();
    tree.insert("x", variable(false)).unwrap();
    tree.create_child("main", ScopeKind::Function, Position::default());

    tree.insert("x", variable(true)).unwrap();

    let (scope, symbol) = tree.resolve("x", SymbolKind::ANY).unwrap();
    assert_eq!(tree.scope(scope).name, "main");
    assert!(symbol.is_mutable());
}

#[test]
fn lookup_walks_outward_and_filters_kinds() {
    let mut tree = ScopeTree::new();
    tree.insert("helper", function()).unwrap();
    tree.create_child("main", ScopeKind::Function, Position::default());
    tree.create_child("$block@3", ScopeKind::Block, Position::default());

    assert!(tree.lookup("helper", SymbolKind::ANY).is_some());
    assert!(tree.lookup("helper", SymbolKind::VALUES).is_none());
    assert!(tree.lookup("missing", SymbolKind::ANY).is_none());
}

#[test]
fn update_symbol_checks_kind() {
    let mut tree = ScopeTree::new();
    tree.insert("x", variable(false)).unwrap();

    let err = tree
        .update_symbol("x", SymbolKind::Function, |_| {})
        .unwrap_err();
    insta::assert_snapshot!(err, @"`x` is a variable, not a function");

    let err = tree
        .update_symbol("y", SymbolKind::Variable, |_| {})
        .unwrap_err();
    assert_eq!(err, SymbolError::SymbolNotFound("y".to_owned()));

    tree.update_symbol("x", SymbolKind::Variable, |symbol| {
        if let Symbol::Variable(var) = symbol {
            var.mutable = true;
        }
    })
    .unwrap();
    assert!(tree.lookup("x", SymbolKind::ANY).unwrap().is_mutable());
}

#[test]
fn rename_rekeys_child() {
    let mut tree = ScopeTree::new();
    let anon = tree.create_child("$anon:0", ScopeKind::Function, Position::default());
    tree.exit().unwrap();

    tree.rename(anon, "callback").unwrap();

    assert_eq!(tree.child(ScopeId::ROOT, "callback"), Some(anon));
    assert_eq!(tree.child(ScopeId::ROOT, "$anon:0"), None);
    assert_eq!(tree.scope(anon).name, "callback");
    assert_eq!(
        tree.rename(ScopeId::ROOT, "x"),
        Err(SymbolError::ScopeNotFound(GLOBAL_SCOPE.to_owned()))
    );
}

#[test]
fn find_type_scope_skips_other_kinds() {
    let mut tree = ScopeTree::new();
    tree.create_child("Point", ScopeKind::Function, Position::default());
    tree.exit().unwrap();
    tree.create_child("Color", ScopeKind::Enum, Position::default());
    tree.exit().unwrap();
    let main = tree.create_child("main", ScopeKind::Function, Position::default());

    assert!(tree.find_type_scope(main, "Color").is_some());
    assert!(tree.find_type_scope(main, "Point").is_none());
    assert!(tree.find_scope("Point").is_some());
}

#[test]
fn serializes_nested() {
    let mut tree = ScopeTree::new();
    tree.create_child("main", ScopeKind::Function, Position::default());
    tree.exit().unwrap();

    let json = serde_json::to_string(&tree).unwrap();

    insta::assert_snapshot!(json, @r#"{"name":"global","kind":"global","symbols":{},"children":{"main":{"name":"main","kind":"function","symbols":{},"children":{}}}}"#);
}
