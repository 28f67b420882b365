//! Catch clause surgery.
//!
//! Both paths work on a copy of the try statement and hand it back for the
//! caller to splice in; `None` means the statement stays as it was.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::catches::{catches, catches_assignable};
use crate::change_type::{change_type_with, Naming};
use crate::imports::ImportDelta;
use crate::parser::ast::*;
use crate::recipe::ChangeKind;
use crate::typeck::types::{ClassType, JavaType};
use crate::visit::{Node, VisitMut};

/// A rewritten try statement and the imports it may affect.
#[derive(Debug)]
pub struct Rewritten {
    pub tree: Try,
    pub kind: ChangeKind,
    pub clauses: usize,
    pub imports: ImportDelta,
}

#[derive(Debug, Clone, Copy)]
pub struct CatchRewriter<'r> {
    pub legacy: &'r str,
    pub replacement: &'r Arc<ClassType>,
    /// How renamed simple references are spelled.
    pub naming: Naming,
}

impl CatchRewriter<'_> {
    /// Replace the legacy type with the replacement in every clause that
    /// names it.
    pub fn substitute(&self, t: &Try) -> Option<Rewritten> {
        let mut tree = t.clone();
        let mut clauses = 0;
        for catch in tree.catches.iter_mut().filter(|c| catches(c, self.legacy)) {
            if self.substitute_clause(catch) {
                clauses += 1;
            }
        }
        if clauses == 0 {
            return None;
        }
        let mut imports = ImportDelta::default();
        imports.remove(self.legacy);
        imports.add(&self.replacement.fqn);
        Some(Rewritten { tree, kind: ChangeKind::Substituted, clauses, imports })
    }

    /// Catch the replacement alongside the legacy type. Nothing changes when
    /// some clause already handles the replacement or a subtype of it.
    pub fn augment(&self, t: &Try) -> Option<Rewritten> {
        if t.catches.iter().any(|c| catches_assignable(c, &self.replacement.fqn)) {
            debug!(replacement = %self.replacement.fqn, "replacement already caught");
            return None;
        }
        let mut tree = t.clone();
        let mut clauses = 0;
        for catch in tree.catches.iter_mut().filter(|c| catches(c, self.legacy)) {
            if self.augment_clause(catch) {
                clauses += 1;
            }
        }
        if clauses == 0 {
            return None;
        }
        let mut imports = ImportDelta::default();
        imports.add(&self.replacement.fqn);
        Some(Rewritten { tree, kind: ChangeKind::Augmented, clauses, imports })
    }

    fn substitute_clause(&self, catch: &mut Catch) -> bool {
        let already_caught = catches(catch, &self.replacement.fqn);
        let param = &mut catch.parameter.tree.element;
        let old_ty = param.type_expr.ty().cloned();
        let changed = if already_caught {
            drop_alternatives(&mut param.type_expr, self.legacy)
        } else {
            change_type_with(param, self.legacy, self.replacement, self.naming)
        };
        if changed {
            self.finish_parameter(catch, old_ty);
        }
        changed
    }

    fn augment_clause(&self, catch: &mut Catch) -> bool {
        let param = &mut catch.parameter.tree.element;
        let old_ty = param.type_expr.ty().cloned();
        let changed = match &mut param.type_expr {
            TypeTree::MultiCatch { alternatives, ty, .. } => {
                let inserted = self.insert_before_legacy(alternatives);
                if inserted {
                    *ty = union_of(alternatives);
                }
                inserted
            }
            single => self.split_single(single),
        };
        if changed {
            self.finish_parameter(catch, old_ty);
        }
        changed
    }

    /// Insert a replacement alternative directly in front of each legacy
    /// alternative. The new alternative takes the legacy one's position.
    fn insert_before_legacy(&self, alternatives: &mut Vec<RightPadded<TypeTree>>) -> bool {
        let mut inserted = false;
        let mut i = 0;
        while i < alternatives.len() {
            if self.is_legacy(&alternatives[i].element) {
                if let Some(alt) = self.replacement_for(&alternatives[i].element) {
                    let prefix = alternatives[i].element.prefix().clone();
                    if let Some(p) = alternatives[i].element.prefix_mut() {
                        *p = Space::single();
                    }
                    alternatives.insert(i, RightPadded::new(alt.with_prefix(prefix)).with_after(Space::single()));
                    inserted = true;
                    i += 1;
                }
            }
            i += 1;
        }
        inserted
    }

    /// `Legacy e` becomes `Replacement | Legacy e`.
    fn split_single(&self, tree: &mut TypeTree) -> bool {
        if !self.is_legacy(tree) {
            return false;
        }
        let Some(alt) = self.replacement_for(tree) else {
            return false;
        };
        let prefix = tree.prefix().clone();
        let legacy = std::mem::replace(tree, TypeTree::Ident(Ident::new(Space::EMPTY, "")));
        let alternatives = vec![
            RightPadded::new(alt.with_prefix(prefix)).with_after(Space::single()),
            RightPadded::new(legacy.with_prefix(Space::single())),
        ];
        let ty = union_of(&alternatives);
        *tree = TypeTree::MultiCatch { id: Uuid::new_v4(), alternatives, ty };
        true
    }

    fn is_legacy(&self, tree: &TypeTree) -> bool {
        tree.ty().is_some_and(|t| t.is_of_class_type(self.legacy))
    }

    /// The legacy alternative rewritten to name the replacement, if the
    /// rewrite took.
    fn replacement_for(&self, legacy: &TypeTree) -> Option<TypeTree> {
        let mut alt = legacy.clone();
        change_type_with(&mut alt, self.legacy, self.replacement, self.naming);
        alt.ty().is_some_and(|t| t.is_of_class_type(&self.replacement.fqn)).then_some(alt)
    }

    /// Give the parameter variable, and its uses in the handler body, the
    /// parameter's new type.
    fn finish_parameter(&self, catch: &mut Catch, old_ty: Option<JavaType>) {
        let param = &mut catch.parameter.tree.element;
        let new_ty = param.type_expr.ty().cloned();
        let mut names = Vec::new();
        for var in &mut param.variables {
            var.element.name.ty = new_ty.clone();
            names.push(var.element.name.name.clone());
        }
        if let (Some(old), Some(new)) = (old_ty, new_ty) {
            for name in &names {
                let mut retype = RetypeReferences { name, old: &old, new: &new };
                catch.body.accept_mut(&mut retype);
            }
        }
    }
}

/// Remove the alternatives naming `fqn` from a multi-catch, collapsing it
/// to a single type when one alternative is left.
fn drop_alternatives(tree: &mut TypeTree, fqn: &str) -> bool {
    let prefix = tree.prefix().clone();
    let TypeTree::MultiCatch { alternatives, ty, .. } = tree else {
        return false;
    };
    let before = alternatives.len();
    let mut i = 0;
    while i < alternatives.len() {
        if alternatives[i].element.ty().is_some_and(|t| t.is_of_class_type(fqn)) {
            let removed = alternatives.remove(i);
            if i == alternatives.len() && i > 0 {
                alternatives[i - 1].after = removed.after;
            }
        } else {
            i += 1;
        }
    }
    if alternatives.len() == before || alternatives.is_empty() {
        return false;
    }
    if alternatives.len() == 1 {
        let only = alternatives.remove(0).element;
        *tree = only.with_prefix(prefix);
    } else {
        let first = alternatives.remove(0);
        alternatives.insert(0, RightPadded { element: first.element.with_prefix(prefix), after: first.after });
        *ty = union_of(alternatives);
    }
    true
}

fn union_of(alternatives: &[RightPadded<TypeTree>]) -> Option<JavaType> {
    alternatives.iter().map(|alt| alt.element.ty().cloned()).collect::<Option<Vec<_>>>().map(JavaType::Union)
}

/// Retype references to a catch parameter.
struct RetypeReferences<'a> {
    name: &'a str,
    old: &'a JavaType,
    new: &'a JavaType,
}

impl VisitMut for RetypeReferences<'_> {
    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        if ident.name == self.name && ident.ty.as_ref() == Some(self.old) {
            ident.ty = Some(self.new.clone());
        }
    }
}
