/// Composition helpers for common visitor patterns.
///
/// Each helper drives a small local visitor over any `Node` root, so a
/// caller asks "does this try body invoke X" without writing a visitor:
///
/// ```ignore
/// let io_calls = collect_exprs(&try_stmt.body, |e| match e {
///     Expression::MethodInvocation { method_type: Some(m), .. } if m.throws_assignable_to(IO) => Some(e),
///     _ => None,
/// });
/// ```

use crate::parser::ast::*;
use crate::visit::{walk_expression, walk_statement, Node, Visitor};

// ============================================================================
// Detection
// ============================================================================

/// True if any expression under `root` matches. Stops at the first match.
pub fn contains_expr<N, F>(root: &N, predicate: F) -> bool
where
    N: Node,
    F: Fn(&Expression) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<'ast, F> Visitor<'ast> for Detector<F>
    where
        F: Fn(&Expression) -> bool,
    {
        fn visit_expression(&mut self, expr: &'ast Expression) {
            if self.found {
                return;
            }
            if (self.predicate)(expr) {
                self.found = true;
                return;
            }
            walk_expression(self, expr);
        }
    }

    let mut detector = Detector { predicate, found: false };
    root.accept(&mut detector);
    detector.found
}

/// True if any statement under `root` matches. Stops at the first match.
pub fn contains_stmt<N, F>(root: &N, predicate: F) -> bool
where
    N: Node,
    F: Fn(&Statement) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<'ast, F> Visitor<'ast> for Detector<F>
    where
        F: Fn(&Statement) -> bool,
    {
        fn visit_statement(&mut self, stmt: &'ast Statement) {
            if self.found {
                return;
            }
            if (self.predicate)(stmt) {
                self.found = true;
                return;
            }
            walk_statement(self, stmt);
        }
    }

    let mut detector = Detector { predicate, found: false };
    root.accept(&mut detector);
    detector.found
}

// ============================================================================
// Counting
// ============================================================================

pub fn count_exprs<N, F>(root: &N, predicate: F) -> usize
where
    N: Node,
    F: Fn(&Expression) -> bool,
{
    struct Counter<F> {
        predicate: F,
        count: usize,
    }

    impl<'ast, F> Visitor<'ast> for Counter<F>
    where
        F: Fn(&Expression) -> bool,
    {
        fn visit_expression(&mut self, expr: &'ast Expression) {
            if (self.predicate)(expr) {
                self.count += 1;
            }
            walk_expression(self, expr);
        }
    }

    let mut counter = Counter { predicate, count: 0 };
    root.accept(&mut counter);
    counter.count
}

// ============================================================================
// Collection
// ============================================================================

/// Collect the `Some` results of `mapper` over every expression, in
/// source order. The mapper may return references into the tree.
pub fn collect_exprs<'ast, N, F, T>(root: &'ast N, mapper: F) -> Vec<T>
where
    N: Node,
    F: Fn(&'ast Expression) -> Option<T>,
{
    struct Collector<F, T> {
        mapper: F,
        items: Vec<T>,
    }

    impl<'ast, F, T> Visitor<'ast> for Collector<F, T>
    where
        F: Fn(&'ast Expression) -> Option<T>,
    {
        fn visit_expression(&mut self, expr: &'ast Expression) {
            if let Some(item) = (self.mapper)(expr) {
                self.items.push(item);
            }
            walk_expression(self, expr);
        }
    }

    let mut collector = Collector { mapper, items: Vec::new() };
    root.accept(&mut collector);
    collector.items
}

/// Collect the `Some` results of `mapper` over every simple name used as a
/// type or value reference.
pub fn collect_idents<'ast, N, F, T>(root: &'ast N, mapper: F) -> Vec<T>
where
    N: Node,
    F: Fn(&'ast Ident) -> Option<T>,
{
    struct Collector<F, T> {
        mapper: F,
        items: Vec<T>,
    }

    impl<'ast, F, T> Visitor<'ast> for Collector<F, T>
    where
        F: Fn(&'ast Ident) -> Option<T>,
    {
        fn visit_ident(&mut self, ident: &'ast Ident) {
            if let Some(item) = (self.mapper)(ident) {
                self.items.push(item);
            }
        }
    }

    let mut collector = Collector { mapper, items: Vec::new() };
    root.accept(&mut collector);
    collector.items
}
