//! Type attribution.
//!
//! `attribute` walks a parsed unit and fills in the optional type slots of
//! its tree: type references, expression types, invoked method types and
//! the implicit `close()` of try resources. Attribution never fails. A name
//! that cannot be resolved keeps `None`, and everything downstream treats an
//! unresolved type as matching nothing.

pub mod check;
pub mod classpath;
pub mod env;
pub mod infer;
pub mod resolve;
pub mod types;

pub use classpath::Classpath;

use crate::parser::ast::CompilationUnit;
use crate::visit::scope_tracker::ScopeTracker;
use resolve::NameScope;
use types::JavaType;

/// Attribute `cu` against `classpath` plus the classes `cu` itself declares.
pub fn attribute(cu: &mut CompilationUnit, classpath: &Classpath) {
    let classpath = classpath.with_unit(cu);
    let mut attributor = Attributor::new(&classpath, NameScope::for_unit(cu));
    for class in &mut cu.classes {
        attributor.attribute_class(class);
    }
}

/// Attribution state for one compilation unit.
pub(crate) struct Attributor<'cp> {
    pub(crate) classpath: &'cp Classpath,
    pub(crate) names: NameScope,
    pub(crate) locals: ScopeTracker<JavaType>,
    /// Type of the class whose members are being attributed.
    pub(crate) this_class: Option<JavaType>,
    /// Type parameters in scope (class, then method).
    pub(crate) type_vars: Vec<String>,
}

impl<'cp> Attributor<'cp> {
    pub(crate) fn new(classpath: &'cp Classpath, names: NameScope) -> Self {
        Attributor { classpath, names, locals: ScopeTracker::new(), this_class: None, type_vars: Vec::new() }
    }

    /// Resolve a simple or dotted type name to a fully qualified one.
    pub(crate) fn resolve_type_name(&self, name: &str) -> Option<String> {
        self.names.resolve(name, |fqn| self.classpath.contains(fqn))
    }
}
