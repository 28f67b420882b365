use crate::parser::ast::{Expression, Statement};
use crate::search::MethodMatcher;
use crate::typeck::types::MethodType;
use crate::visit::preorder::NodeRef;

/// How a site inside a try body relates to the legacy exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// A call into the API whose exception type is migrating.
    IsDesignatedApi,
    /// Anything else that can raise the legacy exception.
    ThrowsLegacy,
    Neither,
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    pub api: &'r [MethodMatcher],
    pub legacy: &'r str,
}

impl Classifier<'_> {
    pub fn classify(&self, node: NodeRef<'_>) -> CallKind {
        match node {
            NodeRef::Expression(expr @ (Expression::MethodInvocation { .. } | Expression::NewClass { .. })) => {
                self.classify_method(expr.method_type())
            }
            NodeRef::Statement(Statement::Throw { exception, .. }) => {
                if exception.ty().is_some_and(|t| t.is_assignable_to(self.legacy)) {
                    CallKind::ThrowsLegacy
                } else {
                    CallKind::Neither
                }
            }
            NodeRef::Resource(resource) => self.classify_method(resource.close_method.as_ref()),
            _ => CallKind::Neither,
        }
    }

    /// The designated API wins over its declared throws.
    pub fn classify_method(&self, method: Option<&MethodType>) -> CallKind {
        let Some(method) = method else {
            return CallKind::Neither;
        };
        if self.api.iter().any(|m| m.matches(method)) {
            CallKind::IsDesignatedApi
        } else if method.throws_assignable_to(self.legacy) {
            CallKind::ThrowsLegacy
        } else {
            CallKind::Neither
        }
    }
}
