//! Visitor, preorder and scope utilities over real sources.

use jrewrite::lexer::lex;
use jrewrite::parser::ast::{CompilationUnit, Expression, Statement, Try};
use jrewrite::parser::Parser;
use jrewrite::visit::composers::{contains_stmt, count_exprs};
use jrewrite::visit::preorder::{NodeRef, Preorder};
use jrewrite::visit::scope_tracker::ScopeTracker;
use jrewrite::visit::{walk_try, Node, Visitor};

fn parse(src: &str) -> CompilationUnit {
    let tokens = lex(src).unwrap();
    Parser::new(&tokens, src).parse_compilation_unit().unwrap()
}

const SRC: &str = "class A {\n\
    void f() {\n\
      try (R r = open()) {\n\
        a(b(), c());\n\
        try { d(); } catch (E e) { e(); } finally { f(); }\n\
      } catch (X x) { g(); }\n\
      h();\n\
    }\n\
  }";

#[test]
fn try_depths() {
    struct Depths {
        depth: usize,
        seen: Vec<usize>,
    }

    impl<'ast> Visitor<'ast> for Depths {
        fn visit_try(&mut self, t: &'ast Try) {
            self.depth += 1;
            self.seen.push(self.depth);
            walk_try(self, t);
            self.depth -= 1;
        }
    }

    let cu = parse(SRC);
    let mut v = Depths { depth: 0, seen: Vec::new() };
    cu.accept(&mut v);
    assert_eq!(v.seen, vec![1, 2]);
}

#[test]
fn preorder_of_outer_try_body() {
    let cu = parse(SRC);
    let body = cu.classes[0].methods().next().unwrap().body.as_ref().unwrap();
    let Statement::Try(outer) = &body.statements[0].element else { panic!("expected try") };
    let names: Vec<String> = Preorder::of_try_body(outer)
        .filter_map(|n| match n {
            NodeRef::Expression(Expression::MethodInvocation { name, .. }) => Some(name.name.clone()),
            _ => None,
        })
        .collect();
    // The outer handler `g()` and the statement after the try are excluded;
    // the nested try's handlers are part of the body.
    assert_eq!(names, vec!["open", "a", "b", "c", "d", "e", "f"]);
}

#[test]
fn composers_over_units() {
    let cu = parse(SRC);
    assert_eq!(count_exprs(&cu, |e| matches!(e, Expression::MethodInvocation { .. })), 9);
    assert!(contains_stmt(&cu, |s| matches!(s, Statement::Try(t) if t.finally.is_some())));
}

#[test]
fn scope_tracker_shadowing() {
    let mut scopes: ScopeTracker<&str> = ScopeTracker::new();
    scopes.push_scope();
    scopes.insert("e", "outer");
    let inner = scopes.scoped(|s| {
        s.insert("e", "inner");
        s.lookup("e").copied()
    });
    assert_eq!(inner, Some("inner"));
    assert_eq!(scopes.lookup("e"), Some(&"outer"));
}
