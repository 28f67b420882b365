//! Retarget type references from one class to another.
//!
//! Simple names are renamed to the new simple name, or written fully
//! qualified when [`Naming::Qualified`] is asked for because the simple name
//! would denote another type. Fully qualified references are replaced by the
//! new fully qualified name. Resolved types
//! anywhere in the visited tree are rewritten too, including inside type
//! arguments and multi-catch unions. Trivia is kept as it was.

use std::sync::Arc;

use crate::parser::ast::*;
use crate::typeck::types::{simple_name, ClassType, JavaType};
use crate::visit::{walk_expression_mut, walk_type_tree_mut, walk_variable_declarations_mut, Node, VisitMut};

/// How a simple-name reference to the old type is written after the change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Naming {
    #[default]
    Simple,
    Qualified,
}

/// Replace references to `old_fqn` under `root` with `new_type`.
/// Returns true if anything changed.
pub fn change_type<N: Node>(root: &mut N, old_fqn: &str, new_type: &Arc<ClassType>) -> bool {
    change_type_with(root, old_fqn, new_type, Naming::Simple)
}

pub fn change_type_with<N: Node>(root: &mut N, old_fqn: &str, new_type: &Arc<ClassType>, naming: Naming) -> bool {
    let mut visitor = ChangeType { old_fqn, new_type, naming, changed: false };
    root.accept_mut(&mut visitor);
    visitor.changed
}

struct ChangeType<'a> {
    old_fqn: &'a str,
    new_type: &'a Arc<ClassType>,
    naming: Naming,
    changed: bool,
}

impl ChangeType<'_> {
    fn is_old(&self, ty: Option<&JavaType>) -> bool {
        ty.is_some_and(|t| t.is_of_class_type(self.old_fqn))
    }

    fn retype(&mut self, ty: &mut Option<JavaType>) {
        if let Some(t) = ty.as_mut().filter(|t| t.mentions_class(self.old_fqn)) {
            *t = t.replace_class(self.old_fqn, self.new_type);
            self.changed = true;
        }
    }

    fn qualified_tree(&self, prefix: Space) -> TypeTree {
        let ty = Some(JavaType::Class(Arc::clone(self.new_type)));
        let mut tree = TypeTree::from_qualified_name(&self.new_type.fqn, prefix);
        if let TypeTree::Qualified { name, .. } = &mut tree {
            name.element.ty = ty.clone();
        }
        tree.set_ty(ty);
        tree
    }
}

impl VisitMut for ChangeType<'_> {
    fn visit_type_tree_mut(&mut self, tree: &mut TypeTree) {
        let rename = match tree {
            TypeTree::Qualified { .. } => true,
            TypeTree::Ident(id) => self.naming == Naming::Qualified && id.name == simple_name(self.old_fqn),
            _ => false,
        };
        if rename && self.is_old(tree.ty()) {
            let prefix = tree.prefix().clone();
            *tree = self.qualified_tree(prefix);
            self.changed = true;
            return;
        }
        walk_type_tree_mut(self, tree);
        let replaced = tree
            .ty()
            .filter(|t| t.mentions_class(self.old_fqn))
            .map(|t| t.replace_class(self.old_fqn, self.new_type));
        if let Some(ty) = replaced {
            tree.set_ty(Some(ty));
            self.changed = true;
        }
    }

    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        if self.is_old(ident.ty.as_ref()) && ident.name == simple_name(self.old_fqn) {
            ident.name = self.new_type.simple_name().to_string();
        }
        self.retype(&mut ident.ty);
    }

    fn visit_variable_declarations_mut(&mut self, decl: &mut VariableDeclarations) {
        walk_variable_declarations_mut(self, decl);
        for var in &mut decl.variables {
            self.retype(&mut var.element.name.ty);
        }
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
        if let Expression::FieldAccess { name, ty, .. } = expr {
            self.retype(ty);
            self.retype(&mut name.element.ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;
    use crate::pretty::print;
    use crate::typeck::{attribute, Classpath};

    const IO: &str = "java.io.IOException";

    fn attributed(src: &str) -> CompilationUnit {
        let tokens = lex(src).unwrap();
        let mut cu = Parser::new(&tokens, src).parse_compilation_unit().unwrap();
        attribute(&mut cu, Classpath::standard());
        cu
    }

    fn jackson() -> Arc<ClassType> {
        Classpath::standard().type_named("tools.jackson.core.JacksonException")
    }

    #[test]
    fn renames_simple_and_qualified_references() {
        let mut cu = attributed(
            "import java.io.*;\nclass A { void f() throws IOException, java.io.IOException { } }",
        );
        assert!(change_type(&mut cu, IO, &jackson()));
        assert_eq!(
            print(&cu),
            "import java.io.*;\nclass A { void f() throws JacksonException, tools.jackson.core.JacksonException { } }"
        );
    }

    #[test]
    fn retypes_union_and_variable() {
        let mut cu = attributed(
            "import java.io.*;\nclass A { void f() { try { } catch (IllegalStateException | IOException e) { } } }",
        );
        let Member::Method(method) = &mut cu.classes[0].body.members[0].element else { panic!("expected method") };
        let body = method.body.as_mut().unwrap();
        let Statement::Try(t) = &mut body.statements[0].element else { panic!("expected try") };
        let param = &mut t.catches[0].parameter.tree.element;
        assert!(change_type(param, IO, &jackson()));
        assert_eq!(
            param.type_expr.ty().map(|t| t.to_string()).as_deref(),
            Some("java.lang.IllegalStateException | tools.jackson.core.JacksonException")
        );
        let var_ty = param.variables[0].element.name.ty.as_ref().unwrap();
        assert!(!var_ty.mentions_class(IO));
    }

    #[test]
    fn unrelated_trees_are_untouched() {
        let mut cu = attributed("import java.util.List;\nclass A { List<String> names; }");
        let before = print(&cu);
        assert!(!change_type(&mut cu, IO, &jackson()));
        assert_eq!(print(&cu), before);
    }

    #[test]
    fn qualified_naming_spells_out_simple_references() {
        let mut cu = attributed("import java.io.*;\nclass A { void f() throws IOException, java.io.IOException { } }");
        assert!(change_type_with(&mut cu, IO, &jackson(), Naming::Qualified));
        assert_eq!(
            print(&cu),
            "import java.io.*;\nclass A { void f() throws tools.jackson.core.JacksonException, tools.jackson.core.JacksonException { } }"
        );
    }

    #[test]
    fn type_arguments_are_rewritten() {
        let mut cu = attributed("import java.io.*;\nimport java.util.*;\nclass A { List<IOException> errors; }");
        assert!(change_type(&mut cu, IO, &jackson()));
        assert!(print(&cu).contains("List<JacksonException> errors"));
    }
}
