//! Tree visitor infrastructure
//!
//! Two visitor traits with matching walk functions:
//!
//! - `Visitor` walks shared references (search and analysis passes)
//! - `VisitMut` walks mutable references (in-place rewrites)
//!
//! Override the methods for the nodes you care about and call the matching
//! `walk_*` function to keep recursing; omit the call to prune the subtree.
//!
//! ```ignore
//! struct NameCollector<'ast> {
//!     names: Vec<&'ast str>,
//! }
//!
//! impl<'ast> Visitor<'ast> for NameCollector<'ast> {
//!     fn visit_ident(&mut self, ident: &'ast Ident) {
//!         self.names.push(&ident.name);
//!     }
//! }
//! ```
//!
//! Imports and the package declaration are not walked by default: the names
//! they contain are declarations of visibility, not references.

pub mod composers;
pub mod preorder;
pub mod scope_tracker;

use crate::parser::ast::*;

// ============================================================================
// Visitor Trait (Read-Only)
// ============================================================================

pub trait Visitor<'ast>: Sized {
    fn visit_compilation_unit(&mut self, cu: &'ast CompilationUnit) {
        walk_compilation_unit(self, cu);
    }

    fn visit_import(&mut self, _import: &'ast Import) {}

    fn visit_class(&mut self, class: &'ast ClassDecl) {
        walk_class(self, class);
    }

    fn visit_method(&mut self, method: &'ast MethodDecl) {
        walk_method(self, method);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_statement(&mut self, stmt: &'ast Statement) {
        walk_statement(self, stmt);
    }

    fn visit_try(&mut self, t: &'ast Try) {
        walk_try(self, t);
    }

    fn visit_catch(&mut self, catch: &'ast Catch) {
        walk_catch(self, catch);
    }

    fn visit_variable_declarations(&mut self, decl: &'ast VariableDeclarations) {
        walk_variable_declarations(self, decl);
    }

    fn visit_expression(&mut self, expr: &'ast Expression) {
        walk_expression(self, expr);
    }

    fn visit_type_tree(&mut self, tree: &'ast TypeTree) {
        walk_type_tree(self, tree);
    }

    /// A simple name used as a type or value reference.
    fn visit_ident(&mut self, _ident: &'ast Ident) {}
}

pub fn walk_compilation_unit<'ast, V: Visitor<'ast>>(v: &mut V, cu: &'ast CompilationUnit) {
    for import in &cu.imports {
        v.visit_import(&import.element);
    }
    for class in &cu.classes {
        v.visit_class(class);
    }
}

fn walk_modifiers<'ast, V: Visitor<'ast>>(v: &mut V, modifiers: &'ast [Modifier]) {
    for modifier in modifiers {
        if let Modifier::Annotation(a) = modifier {
            v.visit_type_tree(&a.name);
            for arg in a.args.iter().flat_map(|args| args.iter()) {
                v.visit_expression(arg);
            }
        }
    }
}

pub fn walk_class<'ast, V: Visitor<'ast>>(v: &mut V, class: &'ast ClassDecl) {
    walk_modifiers(v, &class.modifiers);
    for clause in class.extends.iter().chain(&class.implements) {
        for tree in &clause.element {
            v.visit_type_tree(&tree.element);
        }
    }
    for member in &class.body.members {
        match &member.element {
            Member::Field(field) => v.visit_variable_declarations(field),
            Member::Method(method) => v.visit_method(method),
        }
    }
}

pub fn walk_method<'ast, V: Visitor<'ast>>(v: &mut V, method: &'ast MethodDecl) {
    walk_modifiers(v, &method.modifiers);
    if let Some(ret) = &method.return_type {
        v.visit_type_tree(ret);
    }
    for param in method.params.iter() {
        v.visit_variable_declarations(param);
    }
    for thrown in method.throws.iter().flat_map(|t| t.element.iter()) {
        v.visit_type_tree(&thrown.element);
    }
    if let Some(body) = &method.body {
        v.visit_block(body);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast>>(v: &mut V, block: &'ast Block) {
    for stmt in &block.statements {
        v.visit_statement(&stmt.element);
    }
}

pub fn walk_statement<'ast, V: Visitor<'ast>>(v: &mut V, stmt: &'ast Statement) {
    match stmt {
        Statement::Block(block) => v.visit_block(block),
        Statement::VariableDeclarations(decl) => v.visit_variable_declarations(decl),
        Statement::Expression(expr) => v.visit_expression(expr),
        Statement::Return { expr, .. } => {
            if let Some(expr) = expr {
                v.visit_expression(expr);
            }
        }
        Statement::Throw { exception, .. } => v.visit_expression(exception),
        Statement::If { condition, then_part, else_part, .. } => {
            v.visit_expression(&condition.tree.element);
            v.visit_statement(&then_part.element);
            if let Some(else_part) = else_part {
                v.visit_statement(&else_part.body.element);
            }
        }
        Statement::While { condition, body, .. } => {
            v.visit_expression(&condition.tree.element);
            v.visit_statement(&body.element);
        }
        Statement::ForEach { control, body, .. } => {
            v.visit_variable_declarations(&control.variable.element);
            v.visit_expression(&control.iterable.element);
            v.visit_statement(&body.element);
        }
        Statement::Try(t) => v.visit_try(t),
        Statement::Empty { .. } => {}
    }
}

pub fn walk_try<'ast, V: Visitor<'ast>>(v: &mut V, t: &'ast Try) {
    for resource in t.resources.iter().flat_map(|r| &r.elements) {
        match &resource.element.kind {
            ResourceKind::Declaration(decl) => v.visit_variable_declarations(decl),
            ResourceKind::Expression(expr) => v.visit_expression(expr),
        }
    }
    v.visit_block(&t.body);
    for catch in &t.catches {
        v.visit_catch(catch);
    }
    if let Some(finally) = &t.finally {
        v.visit_block(&finally.element);
    }
}

pub fn walk_catch<'ast, V: Visitor<'ast>>(v: &mut V, catch: &'ast Catch) {
    v.visit_variable_declarations(&catch.parameter.tree.element);
    v.visit_block(&catch.body);
}

pub fn walk_variable_declarations<'ast, V: Visitor<'ast>>(v: &mut V, decl: &'ast VariableDeclarations) {
    walk_modifiers(v, &decl.modifiers);
    v.visit_type_tree(&decl.type_expr);
    for var in &decl.variables {
        if let Some(init) = &var.element.initializer {
            v.visit_expression(&init.element);
        }
    }
}

pub fn walk_expression<'ast, V: Visitor<'ast>>(v: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Ident(id) => v.visit_ident(id),
        Expression::FieldAccess { target, .. } => v.visit_expression(target),
        Expression::Literal { .. } => {}
        Expression::MethodInvocation { select, args, .. } => {
            if let Some(select) = select {
                v.visit_expression(&select.element);
            }
            for arg in args.iter() {
                v.visit_expression(arg);
            }
        }
        Expression::NewClass { clazz, args, .. } => {
            v.visit_type_tree(clazz);
            for arg in args.iter() {
                v.visit_expression(arg);
            }
        }
        Expression::Assignment { variable, value, .. } => {
            v.visit_expression(variable);
            v.visit_expression(value);
        }
        Expression::Binary { left, right, .. } => {
            v.visit_expression(left);
            v.visit_expression(right);
        }
        Expression::Unary { expr, .. } => v.visit_expression(expr),
        Expression::Ternary { condition, true_part, false_part, .. } => {
            v.visit_expression(condition);
            v.visit_expression(&true_part.element);
            v.visit_expression(&false_part.element);
        }
        Expression::Parens { inner, .. } => v.visit_expression(&inner.element),
    }
}

pub fn walk_type_tree<'ast, V: Visitor<'ast>>(v: &mut V, tree: &'ast TypeTree) {
    match tree {
        TypeTree::Ident(id) => v.visit_ident(id),
        TypeTree::Qualified { target, .. } => v.visit_type_tree(target),
        TypeTree::Parameterized { clazz, type_args, .. } => {
            v.visit_type_tree(clazz);
            for arg in type_args.iter() {
                v.visit_type_tree(arg);
            }
        }
        TypeTree::Array { element, .. } => v.visit_type_tree(element),
        TypeTree::Wildcard { bound, .. } => {
            if let Some(bound) = bound {
                v.visit_type_tree(&bound.tree);
            }
        }
        TypeTree::MultiCatch { alternatives, .. } => {
            for alt in alternatives {
                v.visit_type_tree(&alt.element);
            }
        }
    }
}

// ============================================================================
// VisitMut Trait (Mutable)
// ============================================================================

pub trait VisitMut: Sized {
    fn visit_compilation_unit_mut(&mut self, cu: &mut CompilationUnit) {
        walk_compilation_unit_mut(self, cu);
    }

    fn visit_class_mut(&mut self, class: &mut ClassDecl) {
        walk_class_mut(self, class);
    }

    fn visit_method_mut(&mut self, method: &mut MethodDecl) {
        walk_method_mut(self, method);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_statement_mut(&mut self, stmt: &mut Statement) {
        walk_statement_mut(self, stmt);
    }

    fn visit_try_mut(&mut self, t: &mut Try) {
        walk_try_mut(self, t);
    }

    fn visit_catch_mut(&mut self, catch: &mut Catch) {
        walk_catch_mut(self, catch);
    }

    fn visit_variable_declarations_mut(&mut self, decl: &mut VariableDeclarations) {
        walk_variable_declarations_mut(self, decl);
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }

    fn visit_type_tree_mut(&mut self, tree: &mut TypeTree) {
        walk_type_tree_mut(self, tree);
    }

    fn visit_ident_mut(&mut self, _ident: &mut Ident) {}
}

pub fn walk_compilation_unit_mut<V: VisitMut>(v: &mut V, cu: &mut CompilationUnit) {
    for class in &mut cu.classes {
        v.visit_class_mut(class);
    }
}

fn walk_modifiers_mut<V: VisitMut>(v: &mut V, modifiers: &mut [Modifier]) {
    for modifier in modifiers {
        if let Modifier::Annotation(a) = modifier {
            v.visit_type_tree_mut(&mut a.name);
            for arg in a.args.iter_mut().flat_map(|args| args.iter_mut()) {
                v.visit_expression_mut(arg);
            }
        }
    }
}

pub fn walk_class_mut<V: VisitMut>(v: &mut V, class: &mut ClassDecl) {
    walk_modifiers_mut(v, &mut class.modifiers);
    for clause in class.extends.iter_mut().chain(class.implements.iter_mut()) {
        for tree in &mut clause.element {
            v.visit_type_tree_mut(&mut tree.element);
        }
    }
    for member in &mut class.body.members {
        match &mut member.element {
            Member::Field(field) => v.visit_variable_declarations_mut(field),
            Member::Method(method) => v.visit_method_mut(method),
        }
    }
}

pub fn walk_method_mut<V: VisitMut>(v: &mut V, method: &mut MethodDecl) {
    walk_modifiers_mut(v, &mut method.modifiers);
    if let Some(ret) = &mut method.return_type {
        v.visit_type_tree_mut(ret);
    }
    for param in method.params.iter_mut() {
        v.visit_variable_declarations_mut(param);
    }
    for thrown in method.throws.iter_mut().flat_map(|t| t.element.iter_mut()) {
        v.visit_type_tree_mut(&mut thrown.element);
    }
    if let Some(body) = &mut method.body {
        v.visit_block_mut(body);
    }
}

pub fn walk_block_mut<V: VisitMut>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        v.visit_statement_mut(&mut stmt.element);
    }
}

pub fn walk_statement_mut<V: VisitMut>(v: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Block(block) => v.visit_block_mut(block),
        Statement::VariableDeclarations(decl) => v.visit_variable_declarations_mut(decl),
        Statement::Expression(expr) => v.visit_expression_mut(expr),
        Statement::Return { expr, .. } => {
            if let Some(expr) = expr {
                v.visit_expression_mut(expr);
            }
        }
        Statement::Throw { exception, .. } => v.visit_expression_mut(exception),
        Statement::If { condition, then_part, else_part, .. } => {
            v.visit_expression_mut(&mut condition.tree.element);
            v.visit_statement_mut(&mut then_part.element);
            if let Some(else_part) = else_part {
                v.visit_statement_mut(&mut else_part.body.element);
            }
        }
        Statement::While { condition, body, .. } => {
            v.visit_expression_mut(&mut condition.tree.element);
            v.visit_statement_mut(&mut body.element);
        }
        Statement::ForEach { control, body, .. } => {
            v.visit_variable_declarations_mut(&mut control.variable.element);
            v.visit_expression_mut(&mut control.iterable.element);
            v.visit_statement_mut(&mut body.element);
        }
        Statement::Try(t) => v.visit_try_mut(t),
        Statement::Empty { .. } => {}
    }
}

pub fn walk_try_mut<V: VisitMut>(v: &mut V, t: &mut Try) {
    for resource in t.resources.iter_mut().flat_map(|r| r.elements.iter_mut()) {
        match &mut resource.element.kind {
            ResourceKind::Declaration(decl) => v.visit_variable_declarations_mut(decl),
            ResourceKind::Expression(expr) => v.visit_expression_mut(expr),
        }
    }
    v.visit_block_mut(&mut t.body);
    for catch in &mut t.catches {
        v.visit_catch_mut(catch);
    }
    if let Some(finally) = &mut t.finally {
        v.visit_block_mut(&mut finally.element);
    }
}

pub fn walk_catch_mut<V: VisitMut>(v: &mut V, catch: &mut Catch) {
    v.visit_variable_declarations_mut(&mut catch.parameter.tree.element);
    v.visit_block_mut(&mut catch.body);
}

pub fn walk_variable_declarations_mut<V: VisitMut>(v: &mut V, decl: &mut VariableDeclarations) {
    walk_modifiers_mut(v, &mut decl.modifiers);
    v.visit_type_tree_mut(&mut decl.type_expr);
    for var in &mut decl.variables {
        if let Some(init) = &mut var.element.initializer {
            v.visit_expression_mut(&mut init.element);
        }
    }
}

pub fn walk_expression_mut<V: VisitMut>(v: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Ident(id) => v.visit_ident_mut(id),
        Expression::FieldAccess { target, .. } => v.visit_expression_mut(target),
        Expression::Literal { .. } => {}
        Expression::MethodInvocation { select, args, .. } => {
            if let Some(select) = select {
                v.visit_expression_mut(&mut select.element);
            }
            for arg in args.iter_mut() {
                v.visit_expression_mut(arg);
            }
        }
        Expression::NewClass { clazz, args, .. } => {
            v.visit_type_tree_mut(clazz);
            for arg in args.iter_mut() {
                v.visit_expression_mut(arg);
            }
        }
        Expression::Assignment { variable, value, .. } => {
            v.visit_expression_mut(variable);
            v.visit_expression_mut(value);
        }
        Expression::Binary { left, right, .. } => {
            v.visit_expression_mut(left);
            v.visit_expression_mut(right);
        }
        Expression::Unary { expr, .. } => v.visit_expression_mut(expr),
        Expression::Ternary { condition, true_part, false_part, .. } => {
            v.visit_expression_mut(condition);
            v.visit_expression_mut(&mut true_part.element);
            v.visit_expression_mut(&mut false_part.element);
        }
        Expression::Parens { inner, .. } => v.visit_expression_mut(&mut inner.element),
    }
}

pub fn walk_type_tree_mut<V: VisitMut>(v: &mut V, tree: &mut TypeTree) {
    match tree {
        TypeTree::Ident(id) => v.visit_ident_mut(id),
        TypeTree::Qualified { target, .. } => v.visit_type_tree_mut(target),
        TypeTree::Parameterized { clazz, type_args, .. } => {
            v.visit_type_tree_mut(clazz);
            for arg in type_args.iter_mut() {
                v.visit_type_tree_mut(arg);
            }
        }
        TypeTree::Array { element, .. } => v.visit_type_tree_mut(element),
        TypeTree::Wildcard { bound, .. } => {
            if let Some(bound) = bound {
                v.visit_type_tree_mut(&mut bound.tree);
            }
        }
        TypeTree::MultiCatch { alternatives, .. } => {
            for alt in alternatives {
                v.visit_type_tree_mut(&mut alt.element);
            }
        }
    }
}

// ============================================================================
// Node: dispatch a visitor at any tree root
// ============================================================================

pub trait Node {
    fn accept<'ast, V: Visitor<'ast>>(&'ast self, v: &mut V);
    fn accept_mut<V: VisitMut>(&mut self, v: &mut V);
}

macro_rules! impl_node {
    ($ty:ty, $visit:ident, $visit_mut:ident) => {
        impl Node for $ty {
            fn accept<'ast, V: Visitor<'ast>>(&'ast self, v: &mut V) {
                v.$visit(self);
            }

            fn accept_mut<V: VisitMut>(&mut self, v: &mut V) {
                v.$visit_mut(self);
            }
        }
    };
}

impl_node!(CompilationUnit, visit_compilation_unit, visit_compilation_unit_mut);
impl_node!(ClassDecl, visit_class, visit_class_mut);
impl_node!(MethodDecl, visit_method, visit_method_mut);
impl_node!(Block, visit_block, visit_block_mut);
impl_node!(Statement, visit_statement, visit_statement_mut);
impl_node!(Try, visit_try, visit_try_mut);
impl_node!(Catch, visit_catch, visit_catch_mut);
impl_node!(VariableDeclarations, visit_variable_declarations, visit_variable_declarations_mut);
impl_node!(Expression, visit_expression, visit_expression_mut);
impl_node!(TypeTree, visit_type_tree, visit_type_tree_mut);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn parse(src: &str) -> CompilationUnit {
        let tokens = lex(src).unwrap();
        Parser::new(&tokens, src).parse_compilation_unit().unwrap()
    }

    struct IdentNames<'ast> {
        names: Vec<&'ast str>,
    }

    impl<'ast> Visitor<'ast> for IdentNames<'ast> {
        fn visit_ident(&mut self, ident: &'ast Ident) {
            self.names.push(&ident.name);
        }
    }

    #[test]
    fn visitor_skips_imports_and_member_names() {
        let cu = parse(
            "import java.io.IOException;\nclass A { void f() { try { x.run(y); } catch (IOException e) { log(e); } } }",
        );
        let mut names = IdentNames { names: Vec::new() };
        cu.accept(&mut names);
        assert_eq!(names.names, vec!["void", "x", "y", "IOException", "e"]);
    }

    struct TryCounter(usize);

    impl<'ast> Visitor<'ast> for TryCounter {
        fn visit_try(&mut self, t: &'ast Try) {
            self.0 += 1;
            walk_try(self, t);
        }
    }

    #[test]
    fn visitor_reaches_nested_tries() {
        let cu = parse(
            "class A { void f() { try { try { a(); } finally { } } catch (E e) { try { b(); } catch (F f) { } } } }",
        );
        let mut counter = TryCounter(0);
        cu.accept(&mut counter);
        assert_eq!(counter.0, 3);
    }

    struct Renamer;

    impl VisitMut for Renamer {
        fn visit_ident_mut(&mut self, ident: &mut Ident) {
            if ident.name == "Old" {
                ident.name = "New".to_string();
            }
        }
    }

    #[test]
    fn visit_mut_rewrites_type_references() {
        let mut cu = parse("class A { Old f(List<Old> xs) throws Old { Old o = new Old(); return o; } }");
        cu.accept_mut(&mut Renamer);
        assert_eq!(
            crate::pretty::print(&cu),
            "class A { New f(List<New> xs) throws New { New o = new New(); return o; } }"
        );
    }
}
