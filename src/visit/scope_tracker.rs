//! Lexically nested name bindings.
//!
//! Attribution keeps one scope per method body, block, catch clause and
//! resource list; a lookup searches from the innermost scope outward so a
//! local shadows a parameter of the same name.
//!
//! ```rust
//! use jrewrite::typeck::types::{ClassType, JavaType, Primitive};
//! use jrewrite::visit::scope_tracker::ScopeTracker;
//!
//! let mut locals = ScopeTracker::<JavaType>::with_initial_scope();
//! locals.insert("count", JavaType::Primitive(Primitive::Int));
//!
//! locals.push_scope();
//! locals.insert("e", JavaType::class(ClassType::shallow("java.io.IOException")));
//! assert!(locals.contains("count"));
//! assert_eq!(locals.lookup("e").and_then(JavaType::fqn), Some("java.io.IOException"));
//!
//! locals.pop_scope();
//! assert!(locals.lookup("e").is_none());
//! ```

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScopeTracker<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> ScopeTracker<T> {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn with_initial_scope() -> Self {
        let mut tracker = Self::new();
        tracker.push_scope();
        tracker
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope, returning its bindings.
    pub fn pop_scope(&mut self) -> Option<HashMap<String, T>> {
        self.scopes.pop()
    }

    /// Bind `name` in the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics if no scope is active.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        self.scopes
            .last_mut()
            .expect("ScopeTracker::insert called with no active scope")
            .insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Like `lookup`, also returning the scope index (0 = outermost).
    pub fn lookup_with_depth(&self, name: &str) -> Option<(&T, usize)> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, scope)| scope.get(name).map(|value| (value, depth)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Run `f` inside a fresh scope that is popped afterwards.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_scope();
        let result = f(self);
        self.pop_scope();
        result
    }
}

impl<T> Default for ScopeTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
