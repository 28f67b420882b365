//! End-to-end catch migration over Java sources.

mod common;

use common::{rewrite, rewrite_run, rewrite_unchanged, rewrite_with_config};
use insta::assert_snapshot;
use jrewrite::config::{CatchMigrationConfig, Config};
use jrewrite::recipe::catch_migration::CatchMigration;
use jrewrite::recipe::ChangeKind;
use jrewrite::typeck::Classpath;

const JACKSON: &str = "tools.jackson.core.JacksonException";
const IO: &str = "java.io.IOException";

#[test]
fn api_only_try_substitutes_the_caught_type() {
    let outcome = rewrite_run(
        r#"package app;

import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.IOException;

class Names {
    private final ObjectMapper mapper = new ObjectMapper();

    String name(String json) {
        try {
            return mapper.readTree(json).get("name").asText();
        } catch (IOException e) {
            throw new IllegalStateException("bad json", e);
        }
    }
}
"#,
        r#"package app;

import com.fasterxml.jackson.databind.ObjectMapper;
import tools.jackson.core.JacksonException;

class Names {
    private final ObjectMapper mapper = new ObjectMapper();

    String name(String json) {
        try {
            return mapper.readTree(json).get("name").asText();
        } catch (JacksonException e) {
            throw new IllegalStateException("bad json", e);
        }
    }
}
"#,
    );
    assert_eq!(outcome.run.changes.len(), 1);
    assert_eq!(outcome.run.changes[0].kind, ChangeKind::Substituted);
    assert_eq!(outcome.run.imports.added, vec![JACKSON]);
    assert_eq!(outcome.run.imports.removed, vec![IO]);
}

const LOADER_BEFORE: &str = r#"package app;

import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.BufferedReader;
import java.io.IOException;

class Loader {
    private final ObjectMapper mapper = new ObjectMapper();

    Object load(BufferedReader reader) {
        try {
            String line = reader.readLine();
            return mapper.readTree(line);
        } catch (IOException e) {
            return null;
        }
    }
}
"#;

const LOADER_AFTER: &str = r#"package app;

import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.BufferedReader;
import java.io.IOException;
import tools.jackson.core.JacksonException;

class Loader {
    private final ObjectMapper mapper = new ObjectMapper();

    Object load(BufferedReader reader) {
        try {
            String line = reader.readLine();
            return mapper.readTree(line);
        } catch (JacksonException | IOException e) {
            return null;
        }
    }
}
"#;

#[test]
fn other_legacy_source_adds_an_alternative() {
    let outcome = rewrite_run(LOADER_BEFORE, LOADER_AFTER);
    assert_eq!(outcome.run.changes[0].kind, ChangeKind::Augmented);
    assert_eq!(outcome.run.imports.added, vec![JACKSON]);
    assert!(outcome.run.imports.removed.is_empty());
}

#[test]
fn existing_replacement_alternative_is_left_alone() {
    rewrite_unchanged(LOADER_AFTER);
}

#[test]
fn alternative_is_inserted_directly_before_legacy() {
    let before = LOADER_BEFORE.replace("catch (IOException e)", "catch (IllegalArgumentException | IOException e)");
    let after = LOADER_AFTER.replace(
        "catch (JacksonException | IOException e)",
        "catch (IllegalArgumentException | JacksonException | IOException e)",
    );
    rewrite_run(&before, &after);
}

#[test]
fn try_without_api_call_is_unchanged() {
    rewrite_unchanged(
        r#"package app;

import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.BufferedReader;
import java.io.IOException;

class Lines {
    private final ObjectMapper mapper = new ObjectMapper();

    String first(BufferedReader reader) {
        try {
            return reader.readLine();
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
    );
}

#[test]
fn unit_without_api_is_unchanged() {
    rewrite_unchanged(
        "import java.io.*;\n\nclass A {\n    int f(Reader r) {\n        try {\n            return r.read();\n        } catch (IOException e) {\n            return -1;\n        }\n    }\n}\n",
    );
}

#[test]
fn subtype_clauses_are_not_substituted() {
    rewrite_unchanged(
        "import com.fasterxml.jackson.databind.ObjectMapper;\nimport com.fasterxml.jackson.core.JsonProcessingException;\n\n\
         class A {\n    String f(ObjectMapper m, Object o) {\n        try {\n            return m.writeValueAsString(o);\n        } catch (JsonProcessingException e) {\n            return null;\n        }\n    }\n}\n",
    );
}

#[test]
fn qualified_catch_needs_no_import() {
    let outcome = rewrite_run(
        "import com.fasterxml.jackson.databind.ObjectMapper;\n\nclass A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (java.io.IOException e) {\n            return null;\n        }\n    }\n}\n",
        "import com.fasterxml.jackson.databind.ObjectMapper;\n\nclass A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (tools.jackson.core.JacksonException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert!(outcome.run.imports.added.is_empty());
}

#[test]
fn subclass_receiver_inherits_the_api() {
    let outcome = rewrite(
        "import com.fasterxml.jackson.databind.json.JsonMapper;\nimport java.io.IOException;\n\n\
         class A {\n    Object f(String s) {\n        try {\n            return new JsonMapper().readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert!(outcome.changed);
    assert!(outcome.source.contains("catch (JacksonException e)"));
}

#[test]
fn resources_are_legacy_sources() {
    let outcome = rewrite(
        r#"import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.*;

class Files {
    Object read(ObjectMapper mapper, String path) {
        try (InputStream in = new FileInputStream(path)) {
            return mapper.readTree(in);
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
    );
    assert_eq!(outcome.run.changes[0].kind, ChangeKind::Augmented);
    assert!(outcome.source.contains("} catch (JacksonException | IOException e) {"));
    assert!(outcome.source.contains("import java.io.*;\nimport tools.jackson.core.JacksonException;"));
}

#[test]
fn throw_statement_is_a_legacy_source() {
    let outcome = rewrite(
        r#"import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.EOFException;
import java.io.IOException;

class A {
    Object f(ObjectMapper mapper, String s) {
        try {
            if (s.isEmpty()) {
                throw new EOFException("empty");
            }
            return mapper.readTree(s);
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
    );
    assert!(outcome.source.contains("catch (JacksonException | IOException e)"));
}

#[test]
fn catch_parameter_uses_follow_the_new_type() {
    let outcome = rewrite(
        "import com.fasterxml.jackson.databind.ObjectMapper;\nimport java.io.IOException;\n\nclass A {\n    String f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s).asText();\n        } catch (IOException e) {\n            return e.getMessage();\n        }\n    }\n}\n",
    );
    assert_snapshot!(outcome.source, @r###"
    import com.fasterxml.jackson.databind.ObjectMapper;
    import tools.jackson.core.JacksonException;

    class A {
        String f(ObjectMapper m, String s) {
            try {
                return m.readTree(s).asText();
            } catch (JacksonException e) {
                return e.getMessage();
            }
        }
    }
    "###);
}

#[test]
fn several_tries_in_one_unit() {
    let outcome = rewrite(
        r#"import com.fasterxml.jackson.databind.ObjectMapper;
import com.fasterxml.jackson.databind.ObjectWriter;
import java.io.*;

class Both {
    String a(ObjectWriter w, Object o) {
        try {
            return w.writeValueAsString(o);
        } catch (IOException e) {
            return null;
        }
    }

    Object b(ObjectMapper m, Reader r) {
        try {
            r.read();
            return m.readTree(r);
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
    );
    let kinds: Vec<ChangeKind> = outcome.run.changes.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ChangeKind::Substituted, ChangeKind::Augmented]);
    // The wildcard import stays; the unit still uses java.io.
    assert!(outcome.source.contains("import java.io.*;"));
}

#[test]
fn custom_configuration_drives_the_same_rule() {
    const STUB: &str = "package com.acme;\n\
        public class AcmeException extends RuntimeException { public AcmeException(String m); }\n\
        public class Client { public String fetch(String id) throws java.io.IOException; }\n";
    let mut classpath = Classpath::standard().clone();
    classpath.add_sources(&[STUB]).unwrap();
    let rule = CatchMigration::new(&CatchMigrationConfig {
        replacement_exception: "com.acme.AcmeException".to_string(),
        api_patterns: vec!["com.acme.Client fetch(String)".to_string()],
        ..CatchMigrationConfig::default()
    })
    .unwrap();

    let source = "import com.acme.Client;\nimport java.io.IOException;\n\nclass A {\n    String f(Client c) {\n        try {\n            return c.fetch(\"x\");\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n";
    let outcome = jrewrite::rewrite_with(source, &rule, &classpath).unwrap();
    assert_eq!(
        outcome.source,
        "import com.acme.AcmeException;\nimport com.acme.Client;\n\nclass A {\n    String f(Client c) {\n        try {\n            return c.fetch(\"x\");\n        } catch (AcmeException e) {\n            return null;\n        }\n    }\n}\n"
    );
}

#[test]
fn unknown_replacement_type_still_rewrites() {
    let config = Config {
        catch_migration: CatchMigrationConfig {
            replacement_exception: "org.example.Unlisted".to_string(),
            ..CatchMigrationConfig::default()
        },
        ..Config::default()
    };
    let outcome = rewrite_with_config(LOADER_BEFORE, &config);
    assert!(outcome.source.contains("catch (Unlisted | IOException e)"));
    assert!(outcome.source.contains("import org.example.Unlisted;"));
}

#[test]
fn replacement_name_taken_by_single_import_is_written_qualified() {
    let outcome = rewrite_run(
        r#"import com.fasterxml.jackson.core.JacksonException;
import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.IOException;

class A {
    JacksonException last;

    Object f(ObjectMapper mapper, String s) {
        try {
            return mapper.readTree(s);
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
        r#"import com.fasterxml.jackson.core.JacksonException;
import com.fasterxml.jackson.databind.ObjectMapper;

class A {
    JacksonException last;

    Object f(ObjectMapper mapper, String s) {
        try {
            return mapper.readTree(s);
        } catch (tools.jackson.core.JacksonException e) {
            return null;
        }
    }
}
"#,
    );
    assert!(outcome.run.imports.added.is_empty());
    assert_eq!(outcome.run.imports.removed, vec![IO]);
}

#[test]
fn replacement_name_supplied_by_on_demand_import_is_written_qualified() {
    let outcome = rewrite_run(
        r#"import com.fasterxml.jackson.core.*;
import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.BufferedReader;
import java.io.IOException;

class A {
    Object f(ObjectMapper mapper, BufferedReader reader) {
        try {
            return mapper.readTree(reader.readLine());
        } catch (IOException e) {
            return null;
        }
    }
}
"#,
        r#"import com.fasterxml.jackson.core.*;
import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.BufferedReader;
import java.io.IOException;

class A {
    Object f(ObjectMapper mapper, BufferedReader reader) {
        try {
            return mapper.readTree(reader.readLine());
        } catch (tools.jackson.core.JacksonException | IOException e) {
            return null;
        }
    }
}
"#,
    );
    assert_eq!(outcome.run.changes[0].kind, ChangeKind::Augmented);
    assert!(outcome.run.imports.is_empty());
}

/// A mapper subclass that redeclares `readTree`, so its calls resolve to the
/// subclass rather than `ObjectMapper`.
const ACME_MAPPER: &str = "package com.acme;\n\
    import com.fasterxml.jackson.databind.JsonNode;\n\
    import com.fasterxml.jackson.databind.ObjectMapper;\n\
    public class AcmeMapper extends ObjectMapper { public JsonNode readTree(String content) throws java.io.IOException; }\n";

fn rewrite_with_acme(source: &str) -> jrewrite::RewriteOutcome {
    let mut classpath = Classpath::standard().clone();
    classpath.add_sources(&[ACME_MAPPER]).unwrap();
    let rule = CatchMigration::new(&CatchMigrationConfig::default()).unwrap();
    jrewrite::rewrite_with(source, &rule, &classpath).unwrap()
}

#[test]
fn overriding_calls_alone_do_not_trigger_the_rewrite() {
    let source = "import com.acme.AcmeMapper;\nimport java.io.IOException;\n\nclass A {\n    Object f(AcmeMapper acme, String s) {\n        try {\n            return acme.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n";
    let outcome = rewrite_with_acme(source);
    assert!(!outcome.run.applicable);
    assert_eq!(outcome.source, source);
}

#[test]
fn overriding_calls_are_not_other_legacy_sources() {
    let outcome = rewrite_with_acme(
        "import com.acme.AcmeMapper;\nimport com.fasterxml.jackson.databind.ObjectMapper;\nimport java.io.IOException;\n\n\
         class A {\n    Object f(ObjectMapper mapper, AcmeMapper acme, String s) {\n        try {\n            acme.readTree(s);\n            return mapper.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert_eq!(outcome.run.changes[0].kind, ChangeKind::Substituted);
    assert!(outcome.source.contains("catch (JacksonException e)"));
}
