//! Scoped symbol table
//!
//! Scopes form a tree addressed by stable [`ScopeId`]s. Scopes are never
//! removed: [`SymbolTable::leave_scope`] only moves the cursor to the parent,
//! so [`SymbolTable::go_to_scope`] can revisit any scope later with the same
//! bindings. The analyser relies on this to register parameters during
//! signature collection and re-enter the function scope when checking bodies.

use crate::ast::Line;
use crate::types::Type;
use rustc_hash::{FxHashMap, FxHashSet};

/// Stable scope identifier, assigned in creation order
pub type ScopeId = usize;

/// The global scope always has id 0
pub const GLOBAL_SCOPE: ScopeId = 0;

/// Declared (or inferred) shape of a function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub line: Line,
    pub parameters: Vec<Type>,
    pub return_type: Type,
}

/// A binding in one scope
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Type),
    Function(FunctionSignature),
}

impl Symbol {
    pub fn ty(&self) -> &Type {
        match self {
            Symbol::Variable(ty) => ty,
            Symbol::Function(signature) => &signature.return_type,
        }
    }
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: FxHashMap<String, Symbol>,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
    variable_names: FxHashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope {
                parent: None,
                bindings: FxHashMap::default(),
            }],
            current: GLOBAL_SCOPE,
            variable_names: FxHashSet::default(),
        }
    }

    /// Create a child of the current scope and descend into it
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            parent: Some(self.current),
            bindings: FxHashMap::default(),
        });
        self.current = id;
        id
    }

    /// Move to the parent scope; the global scope has no parent and is kept
    pub fn leave_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Re-enter a previously created scope. Returns false for unknown ids.
    pub fn go_to_scope(&mut self, id: ScopeId) -> bool {
        if id < self.scopes.len() {
            self.current = id;
            true
        } else {
            false
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn add_variable(&mut self, name: &str, ty: Type) {
        self.variable_names.insert(name.to_string());
        self.scopes[self.current]
            .bindings
            .insert(name.to_string(), Symbol::Variable(ty));
    }

    pub fn add_function(&mut self, name: &str, signature: FunctionSignature) {
        self.scopes[self.current]
            .bindings
            .insert(name.to_string(), Symbol::Function(signature));
    }

    /// Chain lookup from the current scope outwards
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let entry = &self.scopes[id];
            if let Some(symbol) = entry.bindings.get(name) {
                return Some(symbol);
            }
            scope = entry.parent;
        }
        None
    }

    /// Type bound to `name`, or [`Type::Error`] when it is not visible
    pub fn get_type_of(&self, name: &str) -> Type {
        self.lookup(name)
            .map(|symbol| symbol.ty().clone())
            .unwrap_or(Type::Error)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        match self.scopes[GLOBAL_SCOPE].bindings.get(name) {
            Some(Symbol::Function(signature)) => Some(signature),
            _ => None,
        }
    }

    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes[self.current].bindings.contains_key(name)
    }

    /// Every variable name declared anywhere in the program
    pub fn variable_names(&self) -> &FxHashSet<String> {
        &self.variable_names
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_lookup_falls_through_to_parent() {
        let mut table = SymbolTable::new();
        table.add_variable("x", Type::Number);
        table.enter_scope();
        assert_eq!(table.get_type_of("x"), Type::Number);
        assert!(!table.is_declared_in_current_scope("x"));
    }

    #[test]
    fn shadowing_prefers_innermost() {
        let mut table = SymbolTable::new();
        table.add_variable("x", Type::Number);
        table.enter_scope();
        table.add_variable("x", Type::Bool);
        assert_eq!(table.get_type_of("x"), Type::Bool);
        table.leave_scope();
        assert_eq!(table.get_type_of("x"), Type::Number);
    }

    #[test]
    fn leaving_global_scope_stays_global() {
        let mut table = SymbolTable::new();
        table.leave_scope();
        assert_eq!(table.current_scope(), GLOBAL_SCOPE);
    }

    #[test]
    fn go_to_unknown_scope_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(!table.go_to_scope(3));
        assert_eq!(table.current_scope(), GLOBAL_SCOPE);
    }

    #[test]
    fn returning_to_a_left_scope_restores_its_variables() {
        let mut table = SymbolTable::new();
        let child = table.enter_scope();
        table.add_variable("local", Type::stack(Type::Char));
        table.leave_scope();
        assert!(table.lookup("local").is_none());

        assert!(table.go_to_scope(child));
        assert_eq!(table.current_scope(), child);
        assert_eq!(
            table.lookup("local").map(Symbol::ty),
            Some(&Type::stack(Type::Char))
        );
        assert!(table.is_declared_in_current_scope("local"));
    }

    #[test]
    fn scope_ids_are_sequential() {
        let mut table = SymbolTable::new();
        assert_eq!(table.enter_scope(), 1);
        table.leave_scope();
        assert_eq!(table.enter_scope(), 2);
        assert_eq!(table.scope_count(), 3);
    }
}
