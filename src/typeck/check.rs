use crate::parser::ast::*;
use super::types::JavaType;
use super::Attributor;

impl Attributor<'_> {
    pub(crate) fn attribute_class(&mut self, class: &mut ClassDecl) {
        let fqn = self.names.qualify(&class.name.name);
        let this = JavaType::Class(self.classpath.type_named(&fqn));
        class.ty = Some(this.clone());
        class.name.ty = Some(this.clone());

        let prev_this = self.this_class.replace(this);
        let prev_vars = std::mem::take(&mut self.type_vars);
        if let Some(params) = &class.type_params {
            self.type_vars.extend(params.iter().map(|p| p.name.clone()));
        }

        self.attribute_modifiers(&mut class.modifiers);
        for clause in class.extends.iter_mut().chain(class.implements.iter_mut()) {
            for tree in &mut clause.element {
                self.attribute_type_tree(&mut tree.element);
            }
        }
        for member in &mut class.body.members {
            match &mut member.element {
                Member::Field(field) => {
                    self.locals.push_scope();
                    self.attribute_declarations(field);
                    self.locals.pop_scope();
                }
                Member::Method(method) => self.attribute_method(method),
            }
        }

        self.type_vars = prev_vars;
        self.this_class = prev_this;
    }

    fn attribute_method(&mut self, method: &mut MethodDecl) {
        let depth = self.type_vars.len();
        if let Some(params) = &method.type_params {
            self.type_vars.extend(params.iter().map(|p| p.name.clone()));
        }
        self.locals.push_scope();

        self.attribute_modifiers(&mut method.modifiers);
        if let Some(ret) = &mut method.return_type {
            self.attribute_type_tree(ret);
        }
        let mut param_types = Vec::with_capacity(method.params.len());
        for param in method.params.iter_mut() {
            self.attribute_declarations(param);
            param_types.push(param.type_expr.ty().cloned());
        }
        for thrown in method.throws.iter_mut().flat_map(|t| t.element.iter_mut()) {
            self.attribute_type_tree(&mut thrown.element);
        }
        method.method_type = self.this_class.as_ref().and_then(|this| {
            if method.is_constructor() {
                self.classpath.find_constructor(this, &param_types)
            } else {
                self.classpath.find_method(this, &method.name.name, &param_types)
            }
        });
        if let Some(body) = &mut method.body {
            self.attribute_block(body);
        }

        self.locals.pop_scope();
        self.type_vars.truncate(depth);
    }

    fn attribute_modifiers(&mut self, modifiers: &mut [Modifier]) {
        for modifier in modifiers {
            if let Modifier::Annotation(a) = modifier {
                self.attribute_type_tree(&mut a.name);
                for arg in a.args.iter_mut().flat_map(|args| args.iter_mut()) {
                    self.attribute_expr(arg);
                }
            }
        }
    }

    /// Attribute a declaration and bind its variables in the current scope.
    fn attribute_declarations(&mut self, decl: &mut VariableDeclarations) {
        self.attribute_modifiers(&mut decl.modifiers);
        let declared = self.attribute_type_tree(&mut decl.type_expr);
        for var in &mut decl.variables {
            let init = var.element.initializer.as_mut().and_then(|init| self.attribute_expr(&mut init.element));
            // `var x = ...` takes the initializer's type.
            let ty = match (&declared, &decl.type_expr) {
                (None, TypeTree::Ident(id)) if id.name == "var" => init,
                _ => declared.clone(),
            };
            var.element.name.ty = ty.clone();
            if let Some(ty) = ty {
                self.locals.insert(var.element.name.name.clone(), ty);
            }
        }
    }

    pub(crate) fn attribute_block(&mut self, block: &mut Block) {
        self.locals.push_scope();
        for stmt in &mut block.statements {
            self.attribute_stmt(&mut stmt.element);
        }
        self.locals.pop_scope();
    }

    fn attribute_stmt(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::Block(block) => self.attribute_block(block),
            Statement::VariableDeclarations(decl) => self.attribute_declarations(decl),
            Statement::Expression(expr) => {
                self.attribute_expr(expr);
            }
            Statement::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.attribute_expr(expr);
                }
            }
            Statement::Throw { exception, .. } => {
                self.attribute_expr(exception);
            }
            Statement::If { condition, then_part, else_part, .. } => {
                self.attribute_expr(&mut condition.tree.element);
                self.attribute_nested(&mut then_part.element);
                if let Some(else_part) = else_part {
                    self.attribute_nested(&mut else_part.body.element);
                }
            }
            Statement::While { condition, body, .. } => {
                self.attribute_expr(&mut condition.tree.element);
                self.attribute_nested(&mut body.element);
            }
            Statement::ForEach { control, body, .. } => {
                self.locals.push_scope();
                self.attribute_expr(&mut control.iterable.element);
                self.attribute_declarations(&mut control.variable.element);
                self.attribute_nested(&mut body.element);
                self.locals.pop_scope();
            }
            Statement::Try(t) => self.attribute_try(t),
            Statement::Empty { .. } => {}
        }
    }

    /// A statement in the body of `if`/`while`/`for` gets its own scope.
    fn attribute_nested(&mut self, stmt: &mut Statement) {
        self.locals.push_scope();
        self.attribute_stmt(stmt);
        self.locals.pop_scope();
    }

    fn attribute_try(&mut self, t: &mut Try) {
        // Resource variables are visible in the body only.
        self.locals.push_scope();
        for resource in t.resources.iter_mut().flat_map(|r| r.elements.iter_mut()) {
            let resource = &mut resource.element;
            let ty = match &mut resource.kind {
                ResourceKind::Declaration(decl) => {
                    self.attribute_declarations(decl);
                    decl.variables.first().and_then(|v| v.element.name.ty.clone())
                }
                ResourceKind::Expression(expr) => self.attribute_expr(expr),
            };
            resource.close_method = ty.and_then(|ty| self.classpath.find_method(&ty, "close", &[]));
        }
        self.attribute_block(&mut t.body);
        self.locals.pop_scope();

        for catch in &mut t.catches {
            self.locals.push_scope();
            self.attribute_declarations(&mut catch.parameter.tree.element);
            self.attribute_block(&mut catch.body);
            self.locals.pop_scope();
        }
        if let Some(finally) = &mut t.finally {
            self.attribute_block(&mut finally.element);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;
    use crate::parser::ast::*;
    use crate::parser::Parser;
    use crate::typeck::{attribute, Classpath};

    fn attributed(src: &str) -> CompilationUnit {
        let tokens = lex(src).unwrap();
        let mut cu = Parser::new(&tokens, src).parse_compilation_unit().unwrap();
        attribute(&mut cu, Classpath::standard());
        cu
    }

    fn first_try(cu: &CompilationUnit) -> &Try {
        let body = cu.classes[0].methods().next().unwrap().body.as_ref().unwrap();
        body.statements
            .iter()
            .find_map(|s| match &s.element {
                Statement::Try(t) => Some(t.as_ref()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn catch_parameter_types() {
        let cu = attributed(
            "import java.io.*;\nclass A { void f() { try { } catch (IOException e) { } catch (IllegalStateException | Unknown e) { } } }",
        );
        let t = first_try(&cu);
        let single = t.catches[0].parameter_type().ty().unwrap();
        assert!(single.is_of_class_type("java.io.IOException"));
        // An unresolved alternative leaves the union unresolved.
        assert!(t.catches[1].parameter_type().ty().is_none());
    }

    #[test]
    fn multi_catch_parameter_is_union() {
        let cu = attributed(
            "import java.io.*;\nclass A { void f() { try { } catch (FileNotFoundException | EOFException e) { } } }",
        );
        let ty = first_try(&cu).catches[0].parameter_type().ty().cloned();
        assert_eq!(ty.map(|t| t.to_string()).as_deref(), Some("java.io.FileNotFoundException | java.io.EOFException"));
    }

    #[test]
    fn resources_record_implicit_close() {
        let cu = attributed(
            "import java.io.*;\nclass A { void f() { try (StringWriter w = new StringWriter(); Custom c = make()) { w.write(\"x\"); } } }",
        );
        let resources = &first_try(&cu).resources.as_ref().unwrap().elements;
        let close = resources[0].element.close_method.as_ref().unwrap();
        assert!(close.throws_assignable_to("java.io.IOException"));
        assert!(resources[1].element.close_method.is_none());
    }

    #[test]
    fn var_takes_initializer_type() {
        let cu = attributed(
            "import java.io.*;\nclass A { void f() { var r = new StringReader(\"x\"); r.read(); } }",
        );
        let body = cu.classes[0].methods().next().unwrap().body.as_ref().unwrap();
        let Statement::VariableDeclarations(decl) = &body.statements[0].element else { panic!() };
        assert!(decl.variables[0].element.name.ty.as_ref().unwrap().is_of_class_type("java.io.StringReader"));
    }

    #[test]
    fn declared_methods_get_method_types() {
        let cu = attributed("package app;\nclass A { A() { } int size(String s) { return s.length(); } }");
        let mut methods = cu.classes[0].methods();
        let ctor = methods.next().unwrap().method_type.as_ref().unwrap();
        assert!(ctor.is_constructor());
        assert_eq!(ctor.declaring_type.fqn, "app.A");
        let size = methods.next().unwrap().method_type.as_ref().unwrap();
        assert_eq!(size.to_string(), "app.A#size(java.lang.String)");
    }
}
