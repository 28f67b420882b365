use std::borrow::Borrow;

use crate::parser::ast::*;

/// Print a `CompilationUnit` back into Java source.
///
/// Every token is written after the trivia the parser recorded in front of
/// it, so an unmodified tree prints as the exact text it was parsed from.
pub fn print(cu: &CompilationUnit) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_compilation_unit(cu);
    pp.buf
}

pub fn print_type_tree(tree: &TypeTree) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_type_tree(tree);
    pp.buf
}

pub fn print_statement(stmt: &Statement) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_statement(stmt);
    pp.buf
}

pub fn print_expression(expr: &Expression) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_expr(expr);
    pp.buf
}

struct PrettyPrinter {
    buf: String,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn space(&mut self, space: &Space) {
        self.buf.push_str(space.as_str());
    }

    /// Trivia followed by a token.
    fn token(&mut self, before: &Space, text: &str) {
        self.space(before);
        self.write(text);
    }

    fn emit_container<T>(
        &mut self,
        container: &Container<T>,
        open: &str,
        close: &str,
        mut emit: impl FnMut(&mut Self, &T),
    ) {
        self.token(&container.before, open);
        if container.elements.is_empty() {
            self.space(&container.end);
        }
        for (i, el) in container.elements.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            emit(self, &el.element);
            self.space(&el.after);
        }
        self.write(close);
    }

    /// Comma-separated list whose last `after` is printed before the next token.
    fn emit_list<T>(&mut self, list: &[RightPadded<T>], mut emit: impl FnMut(&mut Self, &T)) {
        for (i, el) in list.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            emit(self, &el.element);
            self.space(&el.after);
        }
    }

    // ── Compilation unit ─────────────────────────────────────────────

    fn emit_compilation_unit(&mut self, cu: &CompilationUnit) {
        if let Some(pkg) = &cu.package {
            self.token(&pkg.element.prefix, "package");
            self.emit_type_tree(&pkg.element.name);
            self.token(&pkg.after, ";");
        }
        for import in &cu.imports {
            self.token(&import.element.prefix, "import");
            if let Some(static_kw) = &import.element.static_kw {
                self.token(static_kw, "static");
            }
            self.emit_type_tree(&import.element.qualid);
            self.token(&import.after, ";");
        }
        for class in &cu.classes {
            self.emit_class(class);
        }
        self.space(&cu.eof);
    }

    fn emit_modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            match modifier {
                Modifier::Keyword { prefix, kind } => self.token(prefix, kind.keyword()),
                Modifier::Annotation(a) => {
                    self.token(&a.prefix, "@");
                    self.emit_type_tree(&a.name);
                    if let Some(args) = &a.args {
                        self.emit_container(args, "(", ")", Self::emit_expr);
                    }
                }
            }
        }
    }

    fn emit_class(&mut self, class: &ClassDecl) {
        self.emit_modifiers(&class.modifiers);
        let keyword = match class.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        };
        self.token(&class.kind_prefix, keyword);
        self.emit_ident(&class.name);
        if let Some(tp) = &class.type_params {
            self.emit_container(tp, "<", ">", Self::emit_ident);
        }
        if let Some(extends) = &class.extends {
            self.token(&extends.before, "extends");
            self.emit_list(&extends.element, Self::emit_type_tree);
        }
        if let Some(implements) = &class.implements {
            self.token(&implements.before, "implements");
            self.emit_list(&implements.element, Self::emit_type_tree);
        }
        self.token(&class.body.prefix, "{");
        for member in &class.body.members {
            match &member.element {
                Member::Field(field) => self.emit_variable_declarations(field),
                Member::Method(method) => self.emit_method(method),
            }
            if member.element.needs_semicolon() {
                self.token(&member.after, ";");
            }
        }
        self.token(&class.body.end, "}");
    }

    fn emit_method(&mut self, method: &MethodDecl) {
        self.emit_modifiers(&method.modifiers);
        if let Some(tp) = &method.type_params {
            self.emit_container(tp, "<", ">", Self::emit_ident);
        }
        if let Some(ret) = &method.return_type {
            self.emit_type_tree(ret);
        }
        self.emit_ident(&method.name);
        self.emit_container(&method.params, "(", ")", Self::emit_variable_declarations);
        if let Some(throws) = &method.throws {
            self.token(&throws.before, "throws");
            self.emit_list(&throws.element, Self::emit_type_tree);
        }
        if let Some(body) = &method.body {
            self.emit_block(body);
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    fn emit_ident(&mut self, ident: &Ident) {
        self.token(&ident.prefix, &ident.name);
    }

    fn emit_type_tree(&mut self, tree: &TypeTree) {
        match tree {
            TypeTree::Ident(id) => self.emit_ident(id),
            TypeTree::Qualified { target, name, .. } => {
                self.emit_type_tree(target);
                self.token(&name.before, ".");
                self.emit_ident(&name.element);
            }
            TypeTree::Parameterized { clazz, type_args, .. } => {
                self.emit_type_tree(clazz);
                self.emit_container(type_args, "<", ">", Self::emit_type_tree);
            }
            TypeTree::Array { element, dims, .. } => {
                self.emit_type_tree(element);
                for dim in dims {
                    self.token(&dim.before, "[");
                    self.token(&dim.inner, "]");
                }
            }
            TypeTree::Wildcard { prefix, bound } => {
                self.token(prefix, "?");
                if let Some(bound) = bound {
                    let keyword = match bound.kind.element {
                        BoundKind::Extends => "extends",
                        BoundKind::Super => "super",
                    };
                    self.token(&bound.kind.before, keyword);
                    self.emit_type_tree(&bound.tree);
                }
            }
            TypeTree::MultiCatch { alternatives, .. } => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        self.write("|");
                    }
                    self.emit_type_tree(&alt.element);
                    self.space(&alt.after);
                }
            }
        }
    }

    // ── Statements ───────────────────────────────────────────────────

    fn emit_block(&mut self, block: &Block) {
        self.token(&block.prefix, "{");
        for stmt in &block.statements {
            self.emit_padded_statement(stmt);
        }
        self.token(&block.end, "}");
    }

    fn emit_padded_statement(&mut self, stmt: &RightPadded<impl Borrow<Statement>>) {
        let inner: &Statement = stmt.element.borrow();
        self.emit_statement(inner);
        if inner.needs_semicolon() {
            self.token(&stmt.after, ";");
        }
    }

    fn emit_variable_declarations(&mut self, decl: &VariableDeclarations) {
        self.emit_modifiers(&decl.modifiers);
        self.emit_type_tree(&decl.type_expr);
        self.emit_list(&decl.variables, |pp, var| {
            pp.emit_ident(&var.name);
            if let Some(init) = &var.initializer {
                pp.token(&init.before, "=");
                pp.emit_expr(&init.element);
            }
        });
    }

    fn emit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.emit_block(block),
            Statement::VariableDeclarations(decl) => self.emit_variable_declarations(decl),
            Statement::Expression(expr) => self.emit_expr(expr),
            Statement::Return { prefix, expr } => {
                self.token(prefix, "return");
                if let Some(expr) = expr {
                    self.emit_expr(expr);
                }
            }
            Statement::Throw { prefix, exception } => {
                self.token(prefix, "throw");
                self.emit_expr(exception);
            }
            Statement::If { prefix, condition, then_part, else_part } => {
                self.token(prefix, "if");
                self.emit_control_parens(condition);
                self.emit_padded_statement(then_part);
                if let Some(else_part) = else_part {
                    self.token(&else_part.prefix, "else");
                    self.emit_padded_statement(&else_part.body);
                }
            }
            Statement::While { prefix, condition, body } => {
                self.token(prefix, "while");
                self.emit_control_parens(condition);
                self.emit_padded_statement(body);
            }
            Statement::ForEach { prefix, control, body } => {
                self.token(prefix, "for");
                self.token(&control.prefix, "(");
                self.emit_variable_declarations(&control.variable.element);
                self.token(&control.variable.after, ":");
                self.emit_expr(&control.iterable.element);
                self.token(&control.iterable.after, ")");
                self.emit_padded_statement(body);
            }
            Statement::Try(t) => self.emit_try(t),
            Statement::Empty { prefix } => self.space(prefix),
        }
    }

    fn emit_control_parens(&mut self, parens: &ControlParens<Expression>) {
        self.token(&parens.prefix, "(");
        self.emit_expr(&parens.tree.element);
        self.token(&parens.tree.after, ")");
    }

    fn emit_try(&mut self, t: &Try) {
        self.token(&t.prefix, "try");
        if let Some(resources) = &t.resources {
            self.token(&resources.before, "(");
            let last = resources.elements.len().saturating_sub(1);
            for (i, res) in resources.elements.iter().enumerate() {
                match &res.element.kind {
                    ResourceKind::Declaration(decl) => self.emit_variable_declarations(decl),
                    ResourceKind::Expression(expr) => self.emit_expr(expr),
                }
                self.space(&res.after);
                if i < last || resources.trailing_semicolon {
                    self.write(";");
                }
            }
            if resources.trailing_semicolon {
                self.space(&resources.end);
            }
            self.write(")");
        }
        self.emit_block(&t.body);
        for catch in &t.catches {
            self.token(&catch.prefix, "catch");
            self.token(&catch.parameter.prefix, "(");
            self.emit_variable_declarations(&catch.parameter.tree.element);
            self.token(&catch.parameter.tree.after, ")");
            self.emit_block(&catch.body);
        }
        if let Some(finally) = &t.finally {
            self.token(&finally.before, "finally");
            self.emit_block(&finally.element);
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn emit_expr(&mut self, expr: &Expression) {
        match expr {
            Expression::Ident(id) => self.emit_ident(id),
            Expression::FieldAccess { target, name, .. } => {
                self.emit_expr(target);
                self.token(&name.before, ".");
                self.emit_ident(&name.element);
            }
            Expression::Literal { prefix, source, .. } => self.token(prefix, source),
            Expression::MethodInvocation { select, name, args, .. } => {
                if let Some(select) = select {
                    self.emit_expr(&select.element);
                    self.token(&select.after, ".");
                }
                self.emit_ident(name);
                self.emit_container(args, "(", ")", Self::emit_expr);
            }
            Expression::NewClass { prefix, clazz, args, .. } => {
                self.token(prefix, "new");
                self.emit_type_tree(clazz);
                self.emit_container(args, "(", ")", Self::emit_expr);
            }
            Expression::Assignment { variable, op, value, .. } => {
                self.emit_expr(variable);
                self.token(&op.before, op.element.symbol());
                self.emit_expr(value);
            }
            Expression::Binary { left, op, right, .. } => {
                self.emit_expr(left);
                self.token(&op.before, op.element.symbol());
                self.emit_expr(right);
            }
            Expression::Unary { op, op_prefix, expr, .. } => {
                if op.is_postfix() {
                    self.emit_expr(expr);
                    self.token(op_prefix, op.symbol());
                } else {
                    self.token(op_prefix, op.symbol());
                    self.emit_expr(expr);
                }
            }
            Expression::Ternary { condition, true_part, false_part, .. } => {
                self.emit_expr(condition);
                self.token(&true_part.before, "?");
                self.emit_expr(&true_part.element);
                self.token(&false_part.before, ":");
                self.emit_expr(&false_part.element);
            }
            Expression::Parens { prefix, inner, .. } => {
                self.token(prefix, "(");
                self.emit_expr(&inner.element);
                self.token(&inner.after, ")");
            }
        }
    }
}
