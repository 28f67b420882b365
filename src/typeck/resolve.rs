use std::collections::HashMap;

use crate::parser::ast::{CompilationUnit, TypeTree};
use super::env::TypeSig;
use super::types::Primitive;

const JAVA_LANG: &str = "java.lang";

/// Type names visible in one compilation unit.
///
/// Simple names resolve in Java's order: single-type imports, then types of
/// the unit's own package, then `java.lang`, then on-demand imports.
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    pub package: String,
    single: HashMap<String, String>,
    on_demand: Vec<String>,
}

impl NameScope {
    pub fn for_unit(cu: &CompilationUnit) -> Self {
        let mut scope = NameScope { package: cu.package_name().unwrap_or_default(), ..Default::default() };
        for import in cu.imports.iter().map(|i| &i.element).filter(|i| !i.is_static()) {
            if import.is_wildcard() {
                scope.on_demand.push(import.package_name());
            } else {
                scope.single.insert(import.simple_name().to_string(), import.type_name());
            }
        }
        scope
    }

    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() { simple.to_string() } else { format!("{}.{simple}", self.package) }
    }

    /// Resolve a simple or dotted type name. Explicit single-type imports
    /// resolve even when the class itself is not known.
    pub fn resolve(&self, name: &str, known: impl Fn(&str) -> bool) -> Option<String> {
        if name.contains('.') {
            return known(name).then(|| name.to_string());
        }
        if let Some(fqn) = self.single.get(name) {
            return Some(fqn.clone());
        }
        let local = self.qualify(name);
        if known(&local) {
            return Some(local);
        }
        let lang = format!("{JAVA_LANG}.{name}");
        if known(&lang) {
            return Some(lang);
        }
        self.on_demand.iter().map(|pkg| format!("{pkg}.{name}")).find(|fqn| known(fqn))
    }

    /// The type a single-type import binds to `simple`, if any.
    pub fn single_import(&self, simple: &str) -> Option<&str> {
        self.single.get(simple).map(String::as_str)
    }

    pub fn on_demand_packages(&self) -> &[String] {
        &self.on_demand
    }

    /// True if `fqn` can be written by its simple name without a new import.
    pub fn is_visible(&self, fqn: &str) -> bool {
        let (pkg, simple) = match fqn.rfind('.') {
            Some(idx) => (&fqn[..idx], &fqn[idx + 1..]),
            None => ("", fqn),
        };
        self.single.get(simple).is_some_and(|f| f == fqn)
            || pkg == self.package
            || pkg == JAVA_LANG
            || self.on_demand.iter().any(|p| p == pkg)
    }

    /// Signature of a type tree as written in a declaration. Unresolved
    /// names are kept verbatim so they link to name-only types.
    pub fn signature(&self, tree: &TypeTree, type_vars: &[String], known: &impl Fn(&str) -> bool) -> TypeSig {
        match tree {
            TypeTree::Ident(id) => {
                if let Some(p) = Primitive::from_keyword(&id.name) {
                    TypeSig::Primitive(p)
                } else if type_vars.iter().any(|v| v == &id.name) {
                    TypeSig::TypeVariable(id.name.clone())
                } else {
                    let fqn = self.resolve(&id.name, known).unwrap_or_else(|| id.name.clone());
                    TypeSig::Class { fqn, args: Vec::new() }
                }
            }
            TypeTree::Qualified { .. } => {
                let name = tree.qualified_name();
                let fqn = self.resolve(&name, known).unwrap_or(name);
                TypeSig::Class { fqn, args: Vec::new() }
            }
            TypeTree::Parameterized { clazz, type_args, .. } => match self.signature(clazz, type_vars, known) {
                TypeSig::Class { fqn, .. } => TypeSig::Class {
                    fqn,
                    args: type_args.iter().map(|a| self.signature(a, type_vars, known)).collect(),
                },
                other => other,
            },
            TypeTree::Array { element, dims, .. } => {
                let mut sig = self.signature(element, type_vars, known);
                for _ in dims {
                    sig = TypeSig::Array(Box::new(sig));
                }
                sig
            }
            TypeTree::Wildcard { .. } | TypeTree::MultiCatch { .. } => TypeSig::Wildcard,
        }
    }
}
