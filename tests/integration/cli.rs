//! The `jrewrite` binary.

mod common;

use common::jrewrite;

const SOURCE: &str = "import com.fasterxml.jackson.databind.ObjectMapper;\nimport java.io.IOException;\n\nclass A {\n    Object f(ObjectMapper m, String s) {\n        try {\n            return m.readTree(s);\n        } catch (IOException e) {\n            return null;\n        }\n    }\n}\n";

#[test]
fn prints_rewritten_source() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("A.java");
    std::fs::write(&file, SOURCE).unwrap();

    let output = jrewrite().arg(&file).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("catch (JacksonException e)"));
    // The file itself is untouched.
    assert_eq!(std::fs::read_to_string(&file).unwrap(), SOURCE);
}

#[test]
fn in_place_with_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("A.java");
    std::fs::write(&file, SOURCE).unwrap();

    let output = jrewrite().args(["--in-place", "--report", "json"]).arg(&file).output().unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(std::fs::read_to_string(&file).unwrap().contains("import tools.jackson.core.JacksonException;"));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let line = stderr.lines().find(|l| l.starts_with('{')).expect("json report line");
    let report: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(report["changed"], true);
    assert_eq!(report["recipe"], "catch-migration");
    assert_eq!(report["tags"][0], "jackson-3");
    assert_eq!(report["display_name"], "Replace `IOException` with `JacksonException` in catch clauses");
    assert_eq!(report["changes"][0]["kind"], "substituted");
    assert_eq!(report["imports"]["added"][0], "tools.jackson.core.JacksonException");
    assert_eq!(report["imports"]["removed"][0], "java.io.IOException");
}

#[test]
fn syntax_error_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("Bad.java");
    std::fs::write(&bad, "class A { void f( }").unwrap();
    let good = dir.path().join("A.java");
    std::fs::write(&good, SOURCE).unwrap();

    let output = jrewrite().arg("--in-place").arg(&bad).arg(&good).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    // Other files are still processed.
    assert!(std::fs::read_to_string(&good).unwrap().contains("JacksonException"));
}

#[test]
fn invalid_config_exits_early() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("jrewrite.toml");
    std::fs::write(&config, "[catch-migration]\napi-patterns = []\n").unwrap();
    let file = dir.path().join("A.java");
    std::fs::write(&file, SOURCE).unwrap();

    let output = jrewrite().arg("--config").arg(&config).arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("api-patterns must not be empty"));
}

#[test]
fn text_report_for_unchanged_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("B.java");
    std::fs::write(&file, "class B { }\n").unwrap();
    let output = jrewrite().args(["--report", "text"]).arg(&file).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "class B { }\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("B.java: unchanged"));
}
