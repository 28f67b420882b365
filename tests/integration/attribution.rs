//! Type attribution against the built-in classpath.

use jrewrite::lexer::lex;
use jrewrite::parser::ast::{CompilationUnit, Expression};
use jrewrite::parser::Parser;
use jrewrite::search::{find_methods, MethodMatcher};
use jrewrite::typeck::{attribute, Classpath};
use jrewrite::visit::composers::collect_exprs;

fn attributed(src: &str) -> CompilationUnit {
    let tokens = lex(src).unwrap();
    let mut cu = Parser::new(&tokens, src).parse_compilation_unit().unwrap();
    attribute(&mut cu, Classpath::standard());
    cu
}

/// Every resolved call in the unit, as `Owner#name(params)`.
fn calls(cu: &CompilationUnit) -> Vec<String> {
    collect_exprs(cu, |e| e.method_type().map(|m| m.to_string()))
}

#[test]
fn chained_jackson_calls_resolve() {
    let cu = attributed(
        "import com.fasterxml.jackson.databind.*;\n\
         class A { ObjectMapper mapper; String f(String json) { return mapper.readTree(json).get(\"a\").asText(); } }",
    );
    assert_eq!(
        calls(&cu),
        vec![
            "com.fasterxml.jackson.databind.JsonNode#asText()",
            "com.fasterxml.jackson.databind.JsonNode#get(java.lang.String)",
            "com.fasterxml.jackson.databind.ObjectMapper#readTree(java.lang.String)",
        ]
    );
}

#[test]
fn generic_method_binds_its_type_parameter() {
    let cu = attributed(
        "import com.fasterxml.jackson.databind.ObjectMapper;\n\
         class A { int f(ObjectMapper m, String s) { return m.readValue(s, String.class).length(); } }",
    );
    let found = calls(&cu);
    assert!(found.contains(&"java.lang.String#length()".to_string()), "{found:?}");
}

#[test]
fn classes_of_the_unit_are_known() {
    let cu = attributed(
        "package app;\nimport java.io.*;\n\
         class Repo { String load(String id) throws IOException { return id; } }\n\
         class User { Repo repo; String f() throws IOException { return repo.load(\"x\"); } }",
    );
    let load = collect_exprs(&cu, |e| match e {
        Expression::MethodInvocation { method_type: Some(m), .. } => Some(m.clone()),
        _ => None,
    });
    assert_eq!(load.len(), 1);
    assert!(load[0].throws_assignable_to("java.io.IOException"));
    assert_eq!(load[0].declaring_type.fqn, "app.Repo");
}

#[test]
fn overridden_pattern_matches_subclass_receiver() {
    let cu = attributed(
        "import com.fasterxml.jackson.databind.json.JsonMapper;\n\
         class A { Object f(JsonMapper m, String s) throws Exception { return m.readTree(s); } }",
    );
    let with = MethodMatcher::parse("com.fasterxml.jackson.databind.ObjectMapper *(..)", true).unwrap();
    assert_eq!(find_methods(&cu, &with).len(), 1);
}

#[test]
fn unknown_names_stay_unresolved() {
    let cu = attributed("class A { void f() { thing.doIt(other); } }");
    assert!(calls(&cu).is_empty());
}
