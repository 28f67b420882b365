//! Import bookkeeping as seen through whole-file rewrites.

mod common;

use common::rewrite;

const JACKSON: &str = "tools.jackson.core.JacksonException";
const IO: &str = "java.io.IOException";

#[test]
fn legacy_import_kept_while_still_referenced() {
    let outcome = rewrite(
        r#"import com.fasterxml.jackson.databind.ObjectMapper;
import java.io.IOException;

class A {
    Object parse(ObjectMapper m, String s) {
        try {
            return m.readTree(s);
        } catch (IOException e) {
            return null;
        }
    }

    void close() throws IOException {
    }
}
"#,
    );
    assert!(outcome.source.contains("catch (JacksonException e)"));
    assert!(outcome.source.contains("import java.io.IOException;"));
    assert!(outcome.run.imports.removed.is_empty());
    assert_eq!(outcome.run.imports.added, vec![JACKSON]);
}

#[test]
fn first_import_removal_keeps_the_blank_line() {
    let outcome = rewrite(
        "package app;\n\nimport java.io.IOException;\nimport com.fasterxml.jackson.databind.ObjectMapper;\n\n\
         class A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert!(outcome.source.starts_with(
        "package app;\n\nimport com.fasterxml.jackson.databind.ObjectMapper;\nimport tools.jackson.core.JacksonException;\n\nclass A {"
    ));
    assert_eq!(outcome.run.imports.removed, vec![IO]);
}

#[test]
fn existing_replacement_import_is_not_duplicated() {
    let outcome = rewrite(
        "import com.fasterxml.jackson.databind.ObjectMapper;\nimport java.io.IOException;\nimport tools.jackson.core.JacksonException;\n\n\
         class A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert_eq!(outcome.source.matches("import tools.jackson.core.JacksonException;").count(), 1);
    assert!(outcome.run.imports.added.is_empty());
    assert_eq!(outcome.run.imports.removed, vec![IO]);
}

#[test]
fn on_demand_import_of_replacement_package_suffices() {
    let outcome = rewrite(
        "import com.fasterxml.jackson.databind.ObjectMapper;\nimport java.io.IOException;\nimport tools.jackson.core.*;\n\n\
         class A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert!(outcome.source.contains("catch (JacksonException e)"));
    assert!(outcome.run.imports.added.is_empty());
    assert!(!outcome.source.contains("import java.io.IOException;"));
}

#[test]
fn unit_without_imports_of_either_type() {
    let outcome = rewrite(
        "class A {\n    Object f(com.fasterxml.jackson.databind.ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (java.io.IOException e) {\n            return null;\n        }\n    }\n}\n",
    );
    assert!(outcome.source.starts_with("class A {"));
    assert!(outcome.source.contains("catch (tools.jackson.core.JacksonException e)"));
    assert!(outcome.run.imports.added.is_empty());
}
