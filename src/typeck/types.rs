use std::fmt;
use std::sync::Arc;

pub const OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// A nominal class or interface type with its resolved supertypes.
///
/// Equality is nominal: two `ClassType`s are equal when their fully
/// qualified names are.
#[derive(Debug)]
pub struct ClassType {
    pub fqn: String,
    pub kind: TypeKind,
    pub supertype: Option<Arc<ClassType>>,
    pub interfaces: Vec<Arc<ClassType>>,
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.fqn == other.fqn
    }
}

impl Eq for ClassType {}

impl ClassType {
    /// A type known only by name. It has no supertypes, so it is assignable
    /// to nothing but itself.
    pub fn shallow(fqn: impl Into<String>) -> Arc<ClassType> {
        Arc::new(ClassType { fqn: fqn.into(), kind: TypeKind::Class, supertype: None, interfaces: Vec::new() })
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.fqn)
    }

    pub fn package_name(&self) -> &str {
        match self.fqn.rfind('.') {
            Some(idx) => &self.fqn[..idx],
            None => "",
        }
    }

    /// Reflexive supertype reachability by fully qualified name.
    pub fn is_subtype_of(&self, fqn: &str) -> bool {
        if self.fqn == fqn {
            return true;
        }
        if let Some(sup) = &self.supertype {
            if sup.is_subtype_of(fqn) {
                return true;
            }
        }
        self.interfaces.iter().any(|i| i.is_subtype_of(fqn))
    }

    /// Self followed by every transitive supertype, superclasses before interfaces.
    pub fn ancestors(self: &Arc<Self>) -> Vec<Arc<ClassType>> {
        let mut out: Vec<Arc<ClassType>> = Vec::new();
        let mut stack = vec![Arc::clone(self)];
        while let Some(next) = stack.pop() {
            if out.iter().any(|seen| seen.fqn == next.fqn) {
                continue;
            }
            for iface in next.interfaces.iter().rev() {
                stack.push(Arc::clone(iface));
            }
            if let Some(sup) = &next.supertype {
                stack.push(Arc::clone(sup));
            }
            out.push(next);
        }
        out
    }
}

pub fn simple_name(fqn: &str) -> &str {
    match fqn.rfind('.') {
        Some(idx) => &fqn[idx + 1..],
        None => fqn,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JavaType {
    Class(Arc<ClassType>),
    Parameterized { base: Arc<ClassType>, args: Vec<JavaType> },
    Array(Box<JavaType>),
    Primitive(Primitive),
    TypeVariable(String),
    /// The alternatives of a multi-catch parameter.
    Union(Vec<JavaType>),
    Null,
}

impl JavaType {
    pub fn class(ty: Arc<ClassType>) -> Self {
        JavaType::Class(ty)
    }

    /// The nominal class behind a class or parameterized type.
    pub fn class_type(&self) -> Option<&Arc<ClassType>> {
        match self {
            JavaType::Class(c) => Some(c),
            JavaType::Parameterized { base, .. } => Some(base),
            _ => None,
        }
    }

    pub fn fqn(&self) -> Option<&str> {
        self.class_type().map(|c| c.fqn.as_str())
    }

    /// Nominal equality with the named class, ignoring type arguments.
    pub fn is_of_class_type(&self, fqn: &str) -> bool {
        self.fqn() == Some(fqn)
    }

    /// Whether a value of this type can be assigned to a variable of the
    /// named class type. Unions require every alternative to be assignable;
    /// `null`, primitives and type variables never are.
    pub fn is_assignable_to(&self, fqn: &str) -> bool {
        match self {
            JavaType::Class(c) | JavaType::Parameterized { base: c, .. } => {
                fqn == OBJECT || c.is_subtype_of(fqn)
            }
            JavaType::Union(alts) => !alts.is_empty() && alts.iter().all(|a| a.is_assignable_to(fqn)),
            JavaType::Array(_) => fqn == OBJECT,
            JavaType::Primitive(_) | JavaType::TypeVariable(_) | JavaType::Null => false,
        }
    }

    /// Replace every occurrence of the named class with `replacement`,
    /// including inside type arguments, array components and unions.
    pub fn replace_class(&self, old_fqn: &str, replacement: &Arc<ClassType>) -> JavaType {
        match self {
            JavaType::Class(c) if c.fqn == old_fqn => JavaType::Class(Arc::clone(replacement)),
            JavaType::Parameterized { base, args } => JavaType::Parameterized {
                base: if base.fqn == old_fqn { Arc::clone(replacement) } else { Arc::clone(base) },
                args: args.iter().map(|a| a.replace_class(old_fqn, replacement)).collect(),
            },
            JavaType::Array(inner) => JavaType::Array(Box::new(inner.replace_class(old_fqn, replacement))),
            JavaType::Union(alts) => {
                JavaType::Union(alts.iter().map(|a| a.replace_class(old_fqn, replacement)).collect())
            }
            other => other.clone(),
        }
    }

    /// True if the named class appears anywhere in this type.
    pub fn mentions_class(&self, fqn: &str) -> bool {
        match self {
            JavaType::Class(c) => c.fqn == fqn,
            JavaType::Parameterized { base, args } => {
                base.fqn == fqn || args.iter().any(|a| a.mentions_class(fqn))
            }
            JavaType::Array(inner) => inner.mentions_class(fqn),
            JavaType::Union(alts) => alts.iter().any(|a| a.mentions_class(fqn)),
            _ => false,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Class(c) => write!(f, "{}", c.fqn),
            JavaType::Parameterized { base, args } => {
                write!(f, "{}<", base.fqn)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            JavaType::Array(inner) => write!(f, "{inner}[]"),
            JavaType::Primitive(p) => write!(f, "{}", p.keyword()),
            JavaType::TypeVariable(name) => write!(f, "{name}"),
            JavaType::Union(alts) => {
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                Ok(())
            }
            JavaType::Null => write!(f, "null"),
        }
    }
}

pub const CONSTRUCTOR_NAME: &str = "<constructor>";

/// Resolved signature of an invoked method or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodType {
    pub declaring_type: Arc<ClassType>,
    pub name: String,
    pub parameter_types: Vec<JavaType>,
    pub return_type: JavaType,
    pub thrown_exceptions: Vec<JavaType>,
}

impl MethodType {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// True if any declared thrown type is assignable to the named exception.
    pub fn throws_assignable_to(&self, fqn: &str) -> bool {
        self.thrown_exceptions.iter().any(|t| t.is_assignable_to(fqn))
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}(", self.declaring_type.fqn, self.name)?;
        for (i, p) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (Arc<ClassType>, Arc<ClassType>, Arc<ClassType>) {
        let object = ClassType::shallow(OBJECT);
        let throwable = Arc::new(ClassType {
            fqn: "java.lang.Exception".into(),
            kind: TypeKind::Class,
            supertype: Some(Arc::clone(&object)),
            interfaces: vec![],
        });
        let io = Arc::new(ClassType {
            fqn: "java.io.IOException".into(),
            kind: TypeKind::Class,
            supertype: Some(Arc::clone(&throwable)),
            interfaces: vec![],
        });
        let fnf = Arc::new(ClassType {
            fqn: "java.io.FileNotFoundException".into(),
            kind: TypeKind::Class,
            supertype: Some(Arc::clone(&io)),
            interfaces: vec![],
        });
        (throwable, io, fnf)
    }

    #[test]
    fn assignability_is_reflexive_and_transitive() {
        let (_, io, fnf) = hierarchy();
        let fnf = JavaType::Class(fnf);
        assert!(fnf.is_assignable_to("java.io.FileNotFoundException"));
        assert!(fnf.is_assignable_to("java.io.IOException"));
        assert!(fnf.is_assignable_to("java.lang.Exception"));
        assert!(!JavaType::Class(io).is_assignable_to("java.io.FileNotFoundException"));
    }

    #[test]
    fn null_and_primitives_are_not_assignable() {
        assert!(!JavaType::Null.is_assignable_to("java.io.IOException"));
        assert!(!JavaType::Primitive(Primitive::Int).is_assignable_to(OBJECT));
        assert!(!JavaType::TypeVariable("T".into()).is_assignable_to(OBJECT));
    }

    #[test]
    fn union_requires_all_alternatives() {
        let (exception, io, fnf) = hierarchy();
        let both_io = JavaType::Union(vec![JavaType::Class(io.clone()), JavaType::Class(fnf)]);
        assert!(both_io.is_assignable_to("java.io.IOException"));
        let mixed = JavaType::Union(vec![JavaType::Class(io), JavaType::Class(exception)]);
        assert!(!mixed.is_assignable_to("java.io.IOException"));
        assert!(mixed.is_assignable_to("java.lang.Exception"));
    }

    #[test]
    fn class_type_equality_is_nominal() {
        let (_, io, _) = hierarchy();
        assert_eq!(*io, *ClassType::shallow("java.io.IOException"));
        assert!(JavaType::Class(io).is_of_class_type("java.io.IOException"));
    }

    #[test]
    fn replace_class_reaches_type_arguments() {
        let (_, io, _) = hierarchy();
        let list = ClassType::shallow("java.util.List");
        let ty = JavaType::Parameterized { base: list, args: vec![JavaType::Class(io)] };
        let replaced = ty.replace_class("java.io.IOException", &ClassType::shallow("x.Y"));
        assert_eq!(replaced.to_string(), "java.util.List<x.Y>");
        assert!(!replaced.mentions_class("java.io.IOException"));
    }

    #[test]
    fn ancestors_walk_in_order() {
        let (_, _, fnf) = hierarchy();
        let names: Vec<String> = fnf.ancestors().iter().map(|c| c.fqn.clone()).collect();
        assert_eq!(
            names,
            vec![
                "java.io.FileNotFoundException",
                "java.io.IOException",
                "java.lang.Exception",
                "java.lang.Object",
            ]
        );
    }
}
