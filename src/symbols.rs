//! Symbol table and scope manager. Scope levels increase monotonically as
//! scopes are entered; each name keeps a stack of bindings so that exiting
//! a scope restores whatever the name was shadowing.

use crate::runtime::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub value: Value,
    pub scope_level: usize,
    pub line: Option<usize>,
}

pub struct SymbolTable {
    bindings: HashMap<String, Vec<Symbol>>,
    scope_stack: Vec<usize>,
    highest_level: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            // Global scope is level 0 and is never popped.
            scope_stack: vec![0],
            highest_level: 0,
        }
    }

    pub fn current_scope(&self) -> usize {
        *self.scope_stack.last().unwrap_or(&0)
    }

    pub fn enter_scope(&mut self) {
        self.highest_level += 1;
        self.scope_stack.push(self.highest_level);
    }

    /// Pops the active scope and bulk-removes every symbol defined at that
    /// level. Shadowed outer bindings become visible again because they
    /// were never removed. A no-op at the global scope.
    pub fn exit_scope(&mut self) {
        if self.scope_stack.len() <= 1 {
            return;
        }
        let exited = self.scope_stack.pop().unwrap_or(0);
        for stack in self.bindings.values_mut() {
            while stack.last().map_or(false, |s| s.scope_level == exited) {
                stack.pop();
            }
        }
        self.bindings.retain(|_, stack| !stack.is_empty());
    }

    /// Defines `name` in the active scope. Returns false if the name is
    /// already defined at this exact level; shadowing an outer binding is
    /// allowed.
    pub fn define(
        &mut self,
        name: &str,
        kind: SymbolKind,
        value: Value,
        line: Option<usize>,
    ) -> bool {
        let scope_level = self.current_scope();
        let stack = self.bindings.entry(name.to_string()).or_default();
        if stack.last().map_or(false, |s| s.scope_level == scope_level) {
            return false;
        }
        stack.push(Symbol {
            name: name.to_string(),
            kind,
            value,
            scope_level,
            line,
        });
        true
    }

    /// Resolves `name` to its innermost currently active binding.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.bindings.get(name).and_then(|stack| stack.last())
    }

    /// Rebinds an existing resolvable symbol in place. Returns false if the
    /// name does not resolve.
    pub fn update(&mut self, name: &str, value: Value) -> bool {
        match self.bindings.get_mut(name).and_then(|stack| stack.last_mut()) {
            Some(symbol) => {
                symbol.value = value;
                true
            }
            None => false,
        }
    }

    /// The currently visible bindings, name to value.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.bindings
            .iter()
            .filter_map(|(name, stack)| {
                stack.last().map(|s| (name.clone(), s.value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn define_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", SymbolKind::Variable, num(1.0), Some(1)));
        let symbol = table.lookup("x").unwrap();
        assert_eq!(symbol.value, num(1.0));
        assert_eq!(symbol.scope_level, 0);
        assert!(table.lookup("y").is_none());
    }

    #[test]
    fn redefinition_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", SymbolKind::Variable, num(1.0), None));
        assert!(!table.define("x", SymbolKind::Variable, num(2.0), None));
        assert_eq!(table.lookup("x").unwrap().value, num(1.0));
    }

    #[test]
    fn outer_binding_visible_in_nested_scope() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        table.enter_scope();
        assert_eq!(table.lookup("x").unwrap().value, num(1.0));
    }

    #[test]
    fn shadow_then_restore() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        table.enter_scope();
        assert!(table.define("x", SymbolKind::Variable, num(2.0), None));
        assert_eq!(table.lookup("x").unwrap().value, num(2.0));
        table.exit_scope();
        assert_eq!(table.lookup("x").unwrap().value, num(1.0));
        assert_eq!(table.lookup("x").unwrap().scope_level, 0);
    }

    #[test]
    fn exit_scope_removes_all_symbols_of_that_level() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.define("a", SymbolKind::Variable, num(1.0), None);
        table.define("b", SymbolKind::Constant, num(2.0), None);
        table.exit_scope();
        assert!(table.lookup("a").is_none());
        assert!(table.lookup("b").is_none());
    }

    #[test]
    fn exit_scope_is_guarded_at_global_level() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.current_scope(), 0);
        assert_eq!(table.lookup("x").unwrap().value, num(1.0));
    }

    #[test]
    fn scope_levels_increase_monotonically() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        assert_eq!(table.current_scope(), 1);
        table.exit_scope();
        table.enter_scope();
        // A fresh scope never reuses an exited level.
        assert_eq!(table.current_scope(), 2);
    }

    #[test]
    fn update_rebinds_in_place() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        assert!(table.update("x", num(5.0)));
        assert_eq!(table.lookup("x").unwrap().value, num(5.0));
        assert!(!table.update("missing", num(0.0)));
    }

    #[test]
    fn update_targets_the_innermost_binding() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        table.enter_scope();
        table.define("x", SymbolKind::Variable, num(2.0), None);
        table.update("x", num(9.0));
        table.exit_scope();
        assert_eq!(table.lookup("x").unwrap().value, num(1.0));
    }

    #[test]
    fn snapshot_reflects_visible_bindings() {
        let mut table = SymbolTable::new();
        table.define("x", SymbolKind::Variable, num(1.0), None);
        table.enter_scope();
        table.define("x", SymbolKind::Variable, num(2.0), None);
        table.define("y", SymbolKind::Variable, Value::Str("cheese".to_string()), None);
        let env = table.snapshot();
        assert_eq!(env.len(), 2);
        assert_eq!(env["x"], num(2.0));
        assert_eq!(env["y"], Value::Str("cheese".to_string()));
    }
}
