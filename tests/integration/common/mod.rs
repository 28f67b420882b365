#![allow(dead_code)]

use std::process::Command;

use jrewrite::config::Config;
use jrewrite::RewriteOutcome;

pub fn jrewrite() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jrewrite"))
}

pub fn rewrite(source: &str) -> RewriteOutcome {
    rewrite_with_config(source, &Config::default())
}

pub fn rewrite_with_config(source: &str, config: &Config) -> RewriteOutcome {
    match jrewrite::rewrite_source(source, config) {
        Ok(outcome) => outcome,
        Err(err) => panic!("rewrite failed: {err}\n{source}"),
    }
}

/// Assert that `before` rewrites to `after`, and that `after` is a fixed point.
pub fn rewrite_run(before: &str, after: &str) -> RewriteOutcome {
    let outcome = rewrite(before);
    assert!(outcome.changed, "expected a change:\n{before}");
    assert_eq!(outcome.source, after);
    let again = rewrite(after);
    assert!(!again.changed, "second run changed the source:\n{}", again.source);
    outcome
}

/// Assert that `source` is left byte-for-byte as it is.
pub fn rewrite_unchanged(source: &str) -> RewriteOutcome {
    let outcome = rewrite(source);
    assert!(!outcome.changed, "expected no change, got:\n{}", outcome.source);
    assert_eq!(outcome.source, source);
    outcome
}
