//! Finding invocations by method signature pattern.

pub mod matcher;

pub use matcher::MethodMatcher;

use crate::parser::ast::Expression;
use crate::typeck::types::MethodType;
use crate::visit::composers::{collect_exprs, contains_expr};
use crate::visit::Node;

/// An invocation or constructor call whose resolved method matched.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub expr: &'a Expression,
    pub method: &'a MethodType,
}

/// Every call under `root` matching `matcher`, in source order.
pub fn find_methods<'a, N: Node>(root: &'a N, matcher: &MethodMatcher) -> Vec<CallSite<'a>> {
    collect_exprs(root, |expr| {
        expr.method_type().filter(|m| matcher.matches(m)).map(|method| CallSite { expr, method })
    })
}

/// Whether `root` contains any call matching `matcher`.
pub fn uses_method<N: Node>(root: &N, matcher: &MethodMatcher) -> bool {
    contains_expr(root, |expr| expr.method_type().is_some_and(|m| matcher.matches(m)))
}

/// Whether `root` contains a call matching any of `matchers`.
pub fn uses_any_method<N: Node>(root: &N, matchers: &[MethodMatcher]) -> bool {
    contains_expr(root, |expr| expr.method_type().is_some_and(|m| matchers.iter().any(|p| p.matches(m))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::ast::CompilationUnit;
    use crate::parser::Parser;
    use crate::typeck::{attribute, Classpath};

    fn attributed(src: &str) -> CompilationUnit {
        let tokens = lex(src).unwrap();
        let mut cu = Parser::new(&tokens, src).parse_compilation_unit().unwrap();
        attribute(&mut cu, Classpath::standard());
        cu
    }

    const SRC: &str = "import com.fasterxml.jackson.databind.*;\n\
        class A {\n\
          void f(ObjectMapper m, ObjectWriter w, String s) throws Exception {\n\
            m.readTree(s);\n\
            w.writeValueAsString(new ObjectMapper());\n\
            s.length();\n\
          }\n\
        }";

    #[test]
    fn finds_calls_and_constructions() {
        let cu = attributed(SRC);
        let mapper = MethodMatcher::parse("com.fasterxml.jackson.databind.ObjectMapper *(..)", true).unwrap();
        let found: Vec<String> = find_methods(&cu, &mapper).iter().map(|c| c.method.to_string()).collect();
        assert_eq!(
            found,
            vec![
                "com.fasterxml.jackson.databind.ObjectMapper#readTree(java.lang.String)",
                "com.fasterxml.jackson.databind.ObjectMapper#<constructor>()",
            ]
        );
    }

    #[test]
    fn uses_method_gate() {
        let cu = attributed(SRC);
        let writer = MethodMatcher::parse("com.fasterxml.jackson.databind.ObjectWriter *(..)", true).unwrap();
        let reader = MethodMatcher::parse("com.fasterxml.jackson.databind.ObjectReader *(..)", true).unwrap();
        assert!(uses_method(&cu, &writer));
        assert!(!uses_method(&cu, &reader));
        assert!(uses_any_method(&cu, &[reader.clone(), writer]));
        assert!(!uses_any_method(&cu, &[reader]));
    }

    #[test]
    fn unresolved_calls_never_match() {
        let cu = attributed("class A { void f() { mapper.readTree(s); } }");
        let any = MethodMatcher::parse("*..* *(..)", true).unwrap();
        assert!(find_methods(&cu, &any).is_empty());
    }
}
