use crate::parser::ast::{Catch, TypeTree};
use crate::typeck::types::JavaType;

/// The declared alternatives of a catch parameter, one for a single type.
pub fn alternatives(clause: &Catch) -> impl Iterator<Item = &TypeTree> {
    let (multi, single) = match clause.parameter_type() {
        TypeTree::MultiCatch { alternatives, .. } => (Some(alternatives), None),
        single => (None, Some(single)),
    };
    multi.into_iter().flatten().map(|alt| &alt.element).chain(single)
}

fn any_alternative(clause: &Catch, test: impl Fn(&JavaType) -> bool) -> bool {
    alternatives(clause).any(|alt| alt.ty().is_some_and(&test))
}

/// Whether the clause names exactly `fqn`, alone or as an alternative.
pub fn catches(clause: &Catch, fqn: &str) -> bool {
    any_alternative(clause, |t| t.is_of_class_type(fqn))
}

/// Whether some alternative of the clause is `fqn` or one of its subtypes.
pub fn catches_assignable(clause: &Catch, fqn: &str) -> bool {
    any_alternative(clause, |t| t.is_assignable_to(fqn))
}
