//! Import bookkeeping after a rewrite.
//!
//! A rule signals which types it may have made unused and which it may have
//! introduced; `apply` reconciles those signals with what the tree actually
//! references. An import is removed only once nothing refers to the type by
//! its simple name, and added only when something does and the type is not
//! already visible.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::parser::ast::*;
use crate::typeck::resolve::NameScope;
use crate::typeck::types::simple_name;
use crate::visit::composers::collect_idents;

/// Types a rewrite may have stopped or started referencing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDelta {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl ImportDelta {
    pub fn add(&mut self, fqn: &str) {
        self.added.insert(fqn.to_string());
    }

    pub fn remove(&mut self, fqn: &str) {
        self.removed.insert(fqn.to_string());
    }

    pub fn merge(&mut self, other: ImportDelta) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Imports actually added to or removed from a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ImportChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn apply(cu: &mut CompilationUnit, delta: &ImportDelta) -> ImportChanges {
    let mut changes = ImportChanges::default();
    for fqn in &delta.removed {
        if !is_referenced(cu, fqn) && remove_import(cu, fqn) {
            changes.removed.push(fqn.clone());
        }
    }
    for fqn in &delta.added {
        if is_referenced(cu, fqn) && add_import(cu, fqn) {
            changes.added.push(fqn.clone());
        }
    }
    changes
}

/// True if some simple-name reference in the unit resolves to `fqn`.
/// Imports themselves are not references.
pub fn is_referenced(cu: &CompilationUnit, fqn: &str) -> bool {
    let simple = simple_name(fqn);
    !collect_idents(cu, |id| {
        (id.name == simple && id.ty.as_ref().is_some_and(|t| t.is_of_class_type(fqn))).then_some(())
    })
    .is_empty()
}

/// Whether a reference to `fqn` introduced into `cu` may be written by its
/// simple name: either the name already resolves to `fqn`, or importing it
/// would not hide a different type known by the same name. `known` says
/// which fully qualified names exist.
pub fn simple_name_usable(cu: &CompilationUnit, fqn: &str, known: impl Fn(&str) -> bool) -> bool {
    let simple = simple_name(fqn);
    let scope = NameScope::for_unit(cu);
    if cu.classes.iter().any(|c| c.name.name == simple) {
        return scope.qualify(simple) == fqn;
    }
    if let Some(imported) = scope.single_import(simple) {
        return imported == fqn;
    }
    match scope.resolve(simple, |name| name == fqn || known(name)) {
        None => true,
        Some(resolved) if resolved != fqn => false,
        // Another on-demand import supplying the name makes it ambiguous.
        Some(_) => !scope.on_demand_packages().iter().any(|pkg| {
            let other = format!("{pkg}.{simple}");
            other != fqn && known(&other)
        }),
    }
}

/// Remove a single-type import of `fqn`. On-demand imports are kept: an
/// unresolved name may still depend on them.
fn remove_import(cu: &mut CompilationUnit, fqn: &str) -> bool {
    let Some(index) = cu
        .imports
        .iter()
        .position(|i| !i.element.is_static() && !i.element.is_wildcard() && i.element.type_name() == fqn)
    else {
        return false;
    };
    let removed = cu.imports.remove(index);
    if index == 0 {
        // The first import's prefix separates it from the package (or opens
        // the file); its successor inherits that position.
        match cu.imports.first_mut() {
            Some(next) => next.element.prefix = removed.element.prefix,
            None if cu.package.is_none() => {
                if let Some(class) = cu.classes.first_mut() {
                    let rest = class.prefix().as_str().trim_start_matches(['\n', '\r']);
                    *class.prefix_mut() = Space::new(format!("{}{rest}", removed.element.prefix.as_str()));
                }
            }
            None => {}
        }
    }
    true
}

fn add_import(cu: &mut CompilationUnit, fqn: &str) -> bool {
    let scope = NameScope::for_unit(cu);
    if scope.is_visible(fqn) {
        return false;
    }
    // Another type is already imported under this simple name.
    let simple = simple_name(fqn);
    if cu.imports.iter().any(|i| !i.element.is_static() && i.element.simple_name() == simple) {
        return false;
    }

    let mut import = Import::new(fqn);
    if cu.imports.is_empty() {
        import.prefix = if cu.package.is_some() { Space::new("\n\n") } else { Space::EMPTY };
        if let Some(class) = cu.classes.first_mut() {
            if !class.prefix().has_blank_line() {
                let rest = class.prefix().as_str().trim_start_matches(['\n', '\r']).to_string();
                *class.prefix_mut() = Space::new(format!("\n\n{rest}"));
            }
        }
        cu.imports.push(RightPadded::new(import));
        return true;
    }

    let index = cu
        .imports
        .iter()
        .position(|i| !i.element.is_static() && i.element.type_name().as_str() > fqn)
        .unwrap_or(cu.imports.len());
    if index == 0 {
        import.prefix = std::mem::replace(&mut cu.imports[0].element.prefix, Space::new("\n"));
    }
    cu.imports.insert(index, RightPadded::new(import));
    true
}
