//! Configuration files driving whole-file rewrites.

mod common;

use std::path::Path;

use common::rewrite_with_config;
use jrewrite::config::Config;
use jrewrite::diagnostics::RewriteError;

const SOURCE: &str = "import com.acme.Client;\nimport java.io.IOException;\n\nclass A {\n    String f(Client c) {\n        try {\n            return c.fetch(\"x\");\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n";

#[test]
fn config_file_with_stub_classpath() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("stubs")).unwrap();
    std::fs::write(
        dir.path().join("stubs/acme.java"),
        "package com.acme;\n\
         public class AcmeException extends RuntimeException { }\n\
         public class Client { public String fetch(String id) throws java.io.IOException; }\n",
    )
    .unwrap();
    let path = dir.path().join("jrewrite.toml");
    std::fs::write(
        &path,
        r#"[catch-migration]
legacy-exception = "java.io.IOException"
replacement-exception = "com.acme.AcmeException"
api-patterns = ["com.acme.Client *(..)"]

[classpath]
stubs = ["stubs/acme.java"]
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    let outcome = rewrite_with_config(SOURCE, &config);
    assert!(outcome.source.contains("catch (AcmeException e)"));
    assert!(outcome.source.starts_with("import com.acme.AcmeException;\nimport com.acme.Client;\n\nclass A"));
}

#[test]
fn default_config_ignores_unrelated_api() {
    let outcome = rewrite_with_config(SOURCE, &Config::default());
    assert!(!outcome.changed);
}

#[test]
fn missing_stub_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jrewrite.toml");
    std::fs::write(&path, "[classpath]\nstubs = [\"nope.java\"]\n").unwrap();
    let config = Config::load(&path).unwrap();
    let err = jrewrite::rewrite_source(SOURCE, &config).unwrap_err();
    assert!(matches!(err, RewriteError::Config { .. }));
}

#[test]
fn bad_pattern_is_reported() {
    let err = Config::from_toml_str("[catch-migration]\napi-patterns = [\"Client fetch\"]\n", Path::new("x.toml")).unwrap_err();
    assert!(matches!(err, RewriteError::Pattern { .. }));
}

#[test]
fn config_serializes_back_to_toml() {
    let text = toml::to_string(&Config::default()).unwrap();
    assert!(text.contains("[catch-migration]"));
    assert!(text.contains("replacement-exception = \"tools.jackson.core.JacksonException\""));
    let back = Config::from_toml_str(&text, Path::new("x.toml")).unwrap();
    assert_eq!(back, Config::default());
}
