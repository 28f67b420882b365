use std::sync::Arc;

use crate::parser::ast::*;
use super::types::{ClassType, JavaType, Primitive, OBJECT};
use super::Attributor;

const STRING: &str = "java.lang.String";
const CLASS: &str = "java.lang.Class";

impl Attributor<'_> {
    /// Resolve a type reference, recording the result on the tree.
    pub(crate) fn attribute_type_tree(&mut self, tree: &mut TypeTree) -> Option<JavaType> {
        let ty = match tree {
            TypeTree::Ident(id) => {
                let ty = if let Some(p) = Primitive::from_keyword(&id.name) {
                    Some(JavaType::Primitive(p))
                } else if self.type_vars.contains(&id.name) {
                    Some(JavaType::TypeVariable(id.name.clone()))
                } else {
                    self.resolve_type_name(&id.name).map(|fqn| JavaType::Class(self.classpath.type_named(&fqn)))
                };
                id.ty = ty.clone();
                return ty;
            }
            TypeTree::Qualified { target, name, .. } => {
                let fqn = format!("{}.{}", target.qualified_name(), name.element.name);
                let ty = self.resolve_type_name(&fqn).map(|f| JavaType::Class(self.classpath.type_named(&f)));
                name.element.ty = ty.clone();
                ty
            }
            TypeTree::Parameterized { clazz, type_args, .. } => {
                let base = self.attribute_type_tree(clazz).and_then(|t| t.class_type().cloned());
                let args: Vec<Option<JavaType>> = type_args.iter_mut().map(|a| self.attribute_type_tree(a)).collect();
                match base {
                    // Diamond: arguments are inferred from context, which we do not model.
                    Some(base) if args.is_empty() => Some(JavaType::Class(base)),
                    Some(base) => match args.into_iter().collect::<Option<Vec<_>>>() {
                        Some(args) => Some(JavaType::Parameterized { base, args }),
                        None => Some(JavaType::Class(base)),
                    },
                    None => None,
                }
            }
            TypeTree::Array { element, dims, .. } => {
                let depth = dims.len();
                self.attribute_type_tree(element).map(|mut ty| {
                    for _ in 0..depth {
                        ty = JavaType::Array(Box::new(ty));
                    }
                    ty
                })
            }
            TypeTree::Wildcard { bound, .. } => {
                if let Some(bound) = bound {
                    self.attribute_type_tree(&mut bound.tree);
                }
                return None;
            }
            TypeTree::MultiCatch { alternatives, .. } => {
                let alts: Vec<Option<JavaType>> =
                    alternatives.iter_mut().map(|alt| self.attribute_type_tree(&mut alt.element)).collect();
                alts.into_iter().collect::<Option<Vec<_>>>().map(JavaType::Union)
            }
        };
        tree.set_ty(ty.clone());
        ty
    }

    /// Attribute an expression and its subexpressions, returning its type.
    pub(crate) fn attribute_expr(&mut self, expr: &mut Expression) -> Option<JavaType> {
        match expr {
            Expression::Ident(id) => {
                id.ty = self.resolve_value_name(&id.name);
                id.ty.clone()
            }
            Expression::FieldAccess { target, name, ty } => {
                *ty = if name.element.name == "class" {
                    self.attribute_expr(target).map(|t| JavaType::Parameterized {
                        base: self.classpath.type_named(CLASS),
                        args: vec![t],
                    })
                } else {
                    match self.attribute_expr(target) {
                        Some(JavaType::Array(_)) if name.element.name == "length" => {
                            Some(JavaType::Primitive(Primitive::Int))
                        }
                        Some(owner) => self.classpath.find_field(&owner, &name.element.name),
                        // `java.io.File` written out in expression position.
                        None => target
                            .as_qualified_name()
                            .map(|t| format!("{t}.{}", name.element.name))
                            .and_then(|fqn| self.classpath.class_type(&fqn))
                            .map(JavaType::Class),
                    }
                };
                name.element.ty = ty.clone();
                ty.clone()
            }
            Expression::Literal { kind, ty, .. } => {
                *ty = Some(self.literal_type(*kind));
                ty.clone()
            }
            Expression::MethodInvocation { select, name, args, method_type } => {
                let receiver = match select.as_mut() {
                    Some(select) => self.attribute_expr(&mut select.element).map(|t| receiver_type(&t, self)),
                    None => None,
                };
                let arg_types: Vec<Option<JavaType>> = args.iter_mut().map(|a| self.attribute_expr(a)).collect();
                *method_type = match (select.is_some(), name.name.as_str()) {
                    (false, "this") => self.this_class.clone().and_then(|t| self.classpath.find_constructor(&t, &arg_types)),
                    (false, "super") => self
                        .super_class()
                        .and_then(|t| self.classpath.find_constructor(&t, &arg_types)),
                    (false, method) => self
                        .this_class
                        .clone()
                        .and_then(|t| self.classpath.find_method(&t, method, &arg_types)),
                    (true, method) => receiver.and_then(|r| self.classpath.find_method(&r, method, &arg_types)),
                };
                method_type.as_ref().map(|m| m.return_type.clone())
            }
            Expression::NewClass { clazz, args, method_type, ty, .. } => {
                let class = self.attribute_type_tree(clazz);
                let arg_types: Vec<Option<JavaType>> = args.iter_mut().map(|a| self.attribute_expr(a)).collect();
                *method_type = class.as_ref().and_then(|c| self.classpath.find_constructor(c, &arg_types));
                *ty = class;
                ty.clone()
            }
            Expression::Assignment { variable, value, ty, .. } => {
                *ty = self.attribute_expr(variable);
                self.attribute_expr(value);
                ty.clone()
            }
            Expression::Binary { left, op, right, ty } => {
                let l = self.attribute_expr(left);
                let r = self.attribute_expr(right);
                *ty = self.binary_type(op.element, l, r);
                ty.clone()
            }
            Expression::Unary { op, expr, ty, .. } => {
                let operand = self.attribute_expr(expr);
                *ty = match op {
                    UnaryOp::Not => Some(JavaType::Primitive(Primitive::Boolean)),
                    _ => operand,
                };
                ty.clone()
            }
            Expression::Ternary { condition, true_part, false_part, ty } => {
                self.attribute_expr(condition);
                let t = self.attribute_expr(&mut true_part.element);
                let f = self.attribute_expr(&mut false_part.element);
                *ty = match t {
                    Some(JavaType::Null) | None => f.or(t),
                    t => t,
                };
                ty.clone()
            }
            Expression::Parens { inner, ty, .. } => {
                *ty = self.attribute_expr(&mut inner.element);
                ty.clone()
            }
        }
    }

    /// A simple name in expression position: a local, then a field of the
    /// enclosing class, then a type (for static member access).
    fn resolve_value_name(&self, name: &str) -> Option<JavaType> {
        match name {
            "this" => return self.this_class.clone(),
            "super" => return self.super_class(),
            _ => {}
        }
        if let Some(local) = self.locals.lookup(name) {
            return Some(local.clone());
        }
        if let Some(field) = self.this_class.as_ref().and_then(|t| self.classpath.find_field(t, name)) {
            return Some(field);
        }
        self.resolve_type_name(name).map(|fqn| JavaType::Class(self.classpath.type_named(&fqn)))
    }

    fn super_class(&self) -> Option<JavaType> {
        let this = self.this_class.as_ref()?.class_type()?;
        this.supertype.as_ref().map(|s| JavaType::Class(Arc::clone(s)))
    }

    fn literal_type(&self, kind: LiteralKind) -> JavaType {
        match kind {
            LiteralKind::Int => JavaType::Primitive(Primitive::Int),
            LiteralKind::Long => JavaType::Primitive(Primitive::Long),
            LiteralKind::Float => JavaType::Primitive(Primitive::Float),
            LiteralKind::Double => JavaType::Primitive(Primitive::Double),
            LiteralKind::Char => JavaType::Primitive(Primitive::Char),
            LiteralKind::Boolean => JavaType::Primitive(Primitive::Boolean),
            LiteralKind::String => JavaType::Class(self.classpath.type_named(STRING)),
            LiteralKind::Null => JavaType::Null,
        }
    }

    fn binary_type(&self, op: BinaryOp, left: Option<JavaType>, right: Option<JavaType>) -> Option<JavaType> {
        match op {
            BinaryOp::Or
            | BinaryOp::And
            | BinaryOp::Eq
            | BinaryOp::Neq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq => Some(JavaType::Primitive(Primitive::Boolean)),
            BinaryOp::Add
                if [&left, &right].iter().any(|t| t.as_ref().is_some_and(|t| t.is_of_class_type(STRING))) =>
            {
                Some(JavaType::Class(self.classpath.type_named(STRING)))
            }
            _ => match (left?, right?) {
                (JavaType::Primitive(l), JavaType::Primitive(r)) => Some(JavaType::Primitive(widen(l, r))),
                (l, _) => Some(l),
            },
        }
    }
}

/// Binary numeric promotion.
fn widen(l: Primitive, r: Primitive) -> Primitive {
    const ORDER: [Primitive; 4] = [Primitive::Double, Primitive::Float, Primitive::Long, Primitive::Int];
    ORDER.into_iter().find(|p| *p == l || *p == r).unwrap_or(Primitive::Int)
}

/// Invocations on a multi-catch parameter use the nearest class every
/// alternative extends.
fn receiver_type(ty: &JavaType, attributor: &Attributor<'_>) -> JavaType {
    let JavaType::Union(alts) = ty else { return ty.clone() };
    let classes: Vec<&Arc<ClassType>> = alts.iter().filter_map(JavaType::class_type).collect();
    let common = classes
        .first()
        .and_then(|first| first.ancestors().into_iter().find(|a| classes.iter().all(|c| c.is_subtype_of(&a.fqn))));
    JavaType::Class(common.unwrap_or_else(|| attributor.classpath.type_named(OBJECT)))
}
