//! Printing a freshly parsed unit reproduces the source exactly.

use jrewrite::lexer::lex;
use jrewrite::parser::Parser;
use jrewrite::pretty::print;

fn roundtrip(src: &str) {
    let tokens = lex(src).unwrap();
    let cu = Parser::new(&tokens, src).parse_compilation_unit().unwrap();
    assert_eq!(print(&cu), src);
}

#[test]
fn declarations_and_comments() {
    roundtrip(
        r#"/*
 * License header.
 */
package com.example.app;

import java.io.*;
import java.util.List;
import static java.util.Objects.requireNonNull;

/** Loads things. */
@Deprecated
public final class Loader<T extends Comparable<T>> extends Base implements Runnable, AutoCloseable {
    private static final String NAME = "loader"; // trailing
    protected List<? extends T> items, more;
    int[] counts;

    public Loader() {
        super();
    }

    @Override
    public <R> R map(final java.util.Map<String, ? super R> m) throws IOException, java.lang.InterruptedException {
        return null;
    }

    abstract void stub();
}

interface Named {
    String name();
}
"#,
    );
}

#[test]
fn statements_and_expressions() {
    roundtrip(
        r#"class A {
    void f(String s, int n) {
        int x = n * 2 + 1, y;
        x += 3;
        y = x-- - ++n;
        boolean ok = !s.isEmpty() && (x > 0 || y <= -1);
        String t = ok ? s : "none";
        Class<?> c = String.class;
        for (String part : parts) {
            if (part == null) continue_(); else if (x != 0) { x = 0; }
        }
        while (x < 10) x++;
        ;
        Object o = new java.util.ArrayList<>();
        return;
    }
}
"#,
    );
}

#[test]
fn try_forms() {
    roundtrip(
        r#"class A {
    void f() {
        try (Reader r = open(); Writer w = out() ;) {
            r.read();
        } catch (FileNotFoundException | java.io.EOFException e) {
            throw e;
        } catch (final IOException  e) {
            // ignored
        } finally {
            done();
        }
        try {
        } finally {
        }
        try (r) { } catch (Exception e) { }
    }
}
"#,
    );
}

#[test]
fn rejected_constructs_are_syntax_errors() {
    for src in [
        "class A { void f() { for (int i = 0; i < 3; i++) { } } }",
        "class A { Runnable r = () -> { }; }",
        "enum E { A, B }",
        "class A { void f(int x) { switch (x) { } } }",
    ] {
        let err = lex(src).and_then(|tokens| Parser::new(&tokens, src).parse_compilation_unit().map(|_| ()));
        assert!(matches!(err, Err(jrewrite::diagnostics::RewriteError::Syntax { .. })), "{src}");
    }
}
