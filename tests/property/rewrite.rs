//! Properties of the catch migration over generated try statements.

use proptest::prelude::*;

use jrewrite::config::Config;
use jrewrite::rewrite_source;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    /// `mapper.readTree(s)`: the designated API.
    Api,
    /// `reader.readLine()`: throws IOException.
    Legacy,
    /// `s.trim()`: throws nothing.
    Neutral,
}

impl Call {
    fn render(self) -> &'static str {
        match self {
            Call::Api => "mapper.readTree(s);",
            Call::Legacy => "reader.readLine();",
            Call::Neutral => "s.trim();",
        }
    }
}

fn call() -> impl Strategy<Value = Call> {
    prop_oneof![Just(Call::Api), Just(Call::Legacy), Just(Call::Neutral)]
}

const OTHER_ALTERNATIVES: &[&str] = &["IllegalArgumentException", "IllegalStateException", "NullPointerException"];

/// A multi-catch alternative list that always contains `IOException`.
fn alternatives() -> impl Strategy<Value = Vec<&'static str>> {
    (proptest::sample::subsequence(OTHER_ALTERNATIVES, 0..=2), any::<prop::sample::Index>()).prop_map(
        |(mut others, at)| {
            let at = at.index(others.len() + 1);
            others.insert(at, "IOException");
            others
        },
    )
}

fn unit(calls: &[Call], alternatives: &[&str]) -> String {
    let body: String = calls.iter().map(|c| format!("            {}\n", c.render())).collect();
    format!(
        "import com.fasterxml.jackson.databind.ObjectMapper;\n\
         import java.io.BufferedReader;\n\
         import java.io.IOException;\n\
         \n\
         class A {{\n\
         \x20   void f(ObjectMapper mapper, BufferedReader reader, String s) {{\n\
         \x20       try {{\n\
         {body}\
         \x20       }} catch ({} e) {{\n\
         \x20           return;\n\
         \x20       }}\n\
         \x20   }}\n\
         }}\n",
        alternatives.join(" | ")
    )
}

/// The alternatives of the single catch clause in a rewritten unit.
fn caught(source: &str) -> Vec<String> {
    let start = source.find("catch (").expect("catch clause") + "catch (".len();
    let end = start + source[start..].find(" e)").expect("catch parameter");
    source[start..end].split(" | ").map(str::to_string).collect()
}

proptest! {
    #[test]
    fn rewriting_is_idempotent(calls in prop::collection::vec(call(), 0..5), alts in alternatives()) {
        let config = Config::default();
        let once = rewrite_source(&unit(&calls, &alts), &config).unwrap();
        let twice = rewrite_source(&once.source, &config).unwrap();
        prop_assert!(!twice.changed);
        prop_assert_eq!(twice.source, once.source);
    }

    #[test]
    fn try_without_api_is_unchanged(
        calls in prop::collection::vec(prop_oneof![Just(Call::Legacy), Just(Call::Neutral)], 0..5),
        alts in alternatives(),
    ) {
        let source = unit(&calls, &alts);
        let outcome = rewrite_source(&source, &Config::default()).unwrap();
        prop_assert!(!outcome.changed);
        prop_assert_eq!(outcome.source, source);
    }

    #[test]
    fn augmentation_inserts_before_legacy(
        mut calls in prop::collection::vec(call(), 0..4),
        alts in alternatives(),
    ) {
        calls.push(Call::Api);
        calls.push(Call::Legacy);
        let outcome = rewrite_source(&unit(&calls, &alts), &Config::default()).unwrap();
        let after = caught(&outcome.source);
        prop_assert_eq!(after.len(), alts.len() + 1);
        let legacy = after.iter().position(|a| a == "IOException").unwrap();
        prop_assert!(legacy > 0);
        prop_assert_eq!(&after[legacy - 1], "JacksonException");
        let without: Vec<&str> = after.iter().map(String::as_str).filter(|a| *a != "JacksonException").collect();
        prop_assert_eq!(without, alts);
    }

    #[test]
    fn substitution_replaces_legacy_in_place(
        neutral in 0usize..3,
        alts in alternatives(),
    ) {
        let mut calls = vec![Call::Neutral; neutral];
        calls.push(Call::Api);
        let outcome = rewrite_source(&unit(&calls, &alts), &Config::default()).unwrap();
        let after = caught(&outcome.source);
        let expected: Vec<String> = alts
            .iter()
            .map(|a| if *a == "IOException" { "JacksonException".to_string() } else { a.to_string() })
            .collect();
        prop_assert_eq!(after, expected);
        prop_assert!(!outcome.source.contains("import java.io.IOException;"));
    }

    #[test]
    fn print_parse_round_trip(calls in prop::collection::vec(call(), 0..5), alts in alternatives()) {
        let source = unit(&calls, &alts);
        let tokens = jrewrite::lexer::lex(&source).unwrap();
        let cu = jrewrite::parser::Parser::new(&tokens, &source).parse_compilation_unit().unwrap();
        prop_assert_eq!(jrewrite::pretty::print(&cu), source);
    }
}
