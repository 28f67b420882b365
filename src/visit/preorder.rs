//! Lazy pre-order traversal.
//!
//! `Visitor` pushes every node through callbacks; `Preorder` is a pull-based
//! iterator over the same nodes, which lets a scan stop at its first hit and
//! compose with ordinary iterator adapters. It keeps an explicit stack so
//! deeply nested sources cannot overflow the call stack.

use crate::parser::ast::*;

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
    /// A try-with-resources element; its implicit `close()` is part of the try.
    Resource(&'a Resource),
}

pub struct Preorder<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Preorder<'a> {
    /// Traverse `roots` left to right, each with its whole subtree.
    pub fn new(roots: impl IntoIterator<Item = NodeRef<'a>>) -> Self {
        let mut stack: Vec<NodeRef<'a>> = roots.into_iter().collect();
        stack.reverse();
        Preorder { stack }
    }

    pub fn of_block(block: &'a Block) -> Self {
        Self::new(block_children(block))
    }

    /// The resources and body of a try statement, but not its catch clauses
    /// or finally block.
    pub fn of_try_body(t: &'a Try) -> Self {
        let resources = t.resources.iter().flat_map(|r| &r.elements).map(|r| NodeRef::Resource(&r.element));
        Self::new(resources.chain(block_children(&t.body)))
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let node = self.stack.pop()?;
        let mark = self.stack.len();
        push_children(node, &mut self.stack);
        self.stack[mark..].reverse();
        Some(node)
    }
}

fn block_children(block: &Block) -> impl Iterator<Item = NodeRef<'_>> {
    block.statements.iter().map(|s| NodeRef::Statement(&s.element))
}

fn push_declarations<'a>(decl: &'a VariableDeclarations, out: &mut Vec<NodeRef<'a>>) {
    for var in &decl.variables {
        if let Some(init) = &var.element.initializer {
            out.push(NodeRef::Expression(&init.element));
        }
    }
}

/// Push the children of `node` in source order.
fn push_children<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    match node {
        NodeRef::Statement(stmt) => match stmt {
            Statement::Block(block) => out.extend(block_children(block)),
            Statement::VariableDeclarations(decl) => push_declarations(decl, out),
            Statement::Expression(expr) => out.push(NodeRef::Expression(expr)),
            Statement::Return { expr, .. } => out.extend(expr.iter().map(NodeRef::Expression)),
            Statement::Throw { exception, .. } => out.push(NodeRef::Expression(exception)),
            Statement::If { condition, then_part, else_part, .. } => {
                out.push(NodeRef::Expression(&condition.tree.element));
                out.push(NodeRef::Statement(&then_part.element));
                if let Some(else_part) = else_part {
                    out.push(NodeRef::Statement(&else_part.body.element));
                }
            }
            Statement::While { condition, body, .. } => {
                out.push(NodeRef::Expression(&condition.tree.element));
                out.push(NodeRef::Statement(&body.element));
            }
            Statement::ForEach { control, body, .. } => {
                out.push(NodeRef::Expression(&control.iterable.element));
                out.push(NodeRef::Statement(&body.element));
            }
            Statement::Try(t) => {
                for resource in t.resources.iter().flat_map(|r| &r.elements) {
                    out.push(NodeRef::Resource(&resource.element));
                }
                out.extend(block_children(&t.body));
                for catch in &t.catches {
                    out.extend(block_children(&catch.body));
                }
                if let Some(finally) = &t.finally {
                    out.extend(block_children(&finally.element));
                }
            }
            Statement::Empty { .. } => {}
        },
        NodeRef::Resource(resource) => match &resource.kind {
            ResourceKind::Declaration(decl) => push_declarations(decl, out),
            ResourceKind::Expression(expr) => out.push(NodeRef::Expression(expr)),
        },
        NodeRef::Expression(expr) => match expr {
            Expression::Ident(_) | Expression::Literal { .. } => {}
            Expression::FieldAccess { target, .. } => out.push(NodeRef::Expression(target)),
            Expression::MethodInvocation { select, args, .. } => {
                if let Some(select) = select {
                    out.push(NodeRef::Expression(&select.element));
                }
                out.extend(args.iter().map(NodeRef::Expression));
            }
            Expression::NewClass { args, .. } => out.extend(args.iter().map(NodeRef::Expression)),
            Expression::Assignment { variable, value, .. } => {
                out.push(NodeRef::Expression(variable));
                out.push(NodeRef::Expression(value));
            }
            Expression::Binary { left, right, .. } => {
                out.push(NodeRef::Expression(left));
                out.push(NodeRef::Expression(right));
            }
            Expression::Unary { expr, .. } => out.push(NodeRef::Expression(expr)),
            Expression::Ternary { condition, true_part, false_part, .. } => {
                out.push(NodeRef::Expression(condition));
                out.push(NodeRef::Expression(&true_part.element));
                out.push(NodeRef::Expression(&false_part.element));
            }
            Expression::Parens { inner, .. } => out.push(NodeRef::Expression(&inner.element)),
        },
    }
}
