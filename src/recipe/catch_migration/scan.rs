use tracing::trace;

use super::classify::{CallKind, Classifier};
use crate::parser::ast::Try;
use crate::visit::preorder::{NodeRef, Preorder};

/// Whether the try body (with its resources) contains a call to the
/// designated API.
pub fn has_designated_call(t: &Try, classifier: &Classifier<'_>) -> bool {
    Preorder::of_try_body(t).any(|node| classifier.classify(node) == CallKind::IsDesignatedApi)
}

/// Whether something other than the designated API can raise the legacy
/// exception inside the try body. Stops at the first such site.
pub fn has_non_designated_legacy_source(t: &Try, classifier: &Classifier<'_>) -> bool {
    let first = Preorder::of_try_body(t).find(|node| classifier.classify(*node) == CallKind::ThrowsLegacy);
    if let Some(site) = first {
        trace!(site = describe(site), "legacy exception source");
    }
    first.is_some()
}

fn describe(node: NodeRef<'_>) -> String {
    match node {
        NodeRef::Expression(expr) => match expr.method_type() {
            Some(method) => method.to_string(),
            None => "expression".to_string(),
        },
        NodeRef::Statement(_) => "throw".to_string(),
        NodeRef::Resource(resource) => match &resource.close_method {
            Some(close) => format!("resource {close}"),
            None => "resource".to_string(),
        },
    }
}
