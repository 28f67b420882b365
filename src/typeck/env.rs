use super::types::{Primitive, TypeKind};

/// A type as written in a declaration, with names already resolved.
/// Type variables stay symbolic until a use site binds them.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSig {
    Class { fqn: String, args: Vec<TypeSig> },
    Array(Box<TypeSig>),
    Primitive(Primitive),
    TypeVariable(String),
    Wildcard,
}

impl TypeSig {
    pub fn class(fqn: impl Into<String>) -> Self {
        TypeSig::Class { fqn: fqn.into(), args: Vec::new() }
    }

    pub fn fqn(&self) -> Option<&str> {
        match self {
            TypeSig::Class { fqn, .. } => Some(fqn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<TypeSig>,
    pub return_type: TypeSig,
    pub throws: Vec<TypeSig>,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct FieldSig {
    pub name: String,
    pub ty: TypeSig,
    pub is_static: bool,
}

/// Declared shape of one class or interface.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub fqn: String,
    pub kind: TypeKind,
    pub type_params: Vec<String>,
    pub supertype: Option<TypeSig>,
    pub interfaces: Vec<TypeSig>,
    pub fields: Vec<FieldSig>,
    pub methods: Vec<MethodSig>,
    pub constructors: Vec<MethodSig>,
}

impl ClassInfo {
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSig> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSig> {
        self.fields.iter().find(|f| f.name == name)
    }
}
