use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use crate::diagnostics::RewriteError;
use crate::lexer::lex;
use crate::parser::Parser;
use crate::parser::ast::{ClassDecl, ClassKind, CompilationUnit, Member, MethodDecl, Modifier, ModifierKind};
use super::env::{ClassInfo, FieldSig, MethodSig, TypeSig};
use super::resolve::NameScope;
use super::types::{CONSTRUCTOR_NAME, ClassType, JavaType, MethodType, OBJECT, TypeKind};

/// Declaration-only Java sources describing the library types the rewriter
/// knows about. Bodies are omitted; constructors and methods end in `;`.
const STUBS: &[(&str, &str)] = &[
    ("java.lang", include_str!("../../stdlib/java.lang.java")),
    ("java.io", include_str!("../../stdlib/java.io.java")),
    ("java.nio.file", include_str!("../../stdlib/java.nio.file.java")),
    ("java.util", include_str!("../../stdlib/java.util.java")),
    ("com.fasterxml.jackson.core", include_str!("../../stdlib/com.fasterxml.jackson.core.java")),
    ("com.fasterxml.jackson.databind", include_str!("../../stdlib/com.fasterxml.jackson.databind.java")),
    ("com.fasterxml.jackson.databind.json", include_str!("../../stdlib/com.fasterxml.jackson.databind.json.java")),
    ("tools.jackson.core", include_str!("../../stdlib/tools.jackson.core.java")),
    ("tools.jackson.databind", include_str!("../../stdlib/tools.jackson.databind.java")),
];

static STANDARD: OnceLock<Classpath> = OnceLock::new();

/// Known classes, their members, and their linked supertype graphs.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    classes: HashMap<String, ClassInfo>,
    linked: HashMap<String, Arc<ClassType>>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in JDK and Jackson stubs. Parsed once, shared by all callers.
    pub fn standard() -> &'static Classpath {
        STANDARD.get_or_init(|| {
            let mut classpath = Classpath::new();
            let sources: Vec<&str> = STUBS.iter().map(|(_, src)| *src).collect();
            classpath.add_sources(&sources).expect("built-in classpath stubs must parse");
            classpath
        })
    }

    pub fn stub_packages() -> impl Iterator<Item = &'static str> {
        STUBS.iter().map(|(pkg, _)| *pkg)
    }

    /// Parse and declare Java stub sources. All sources are declared before
    /// any signature is resolved, so they may reference each other freely.
    pub fn add_sources(&mut self, sources: &[&str]) -> Result<(), RewriteError> {
        let mut units = Vec::with_capacity(sources.len());
        for source in sources {
            let tokens = lex(source)?;
            units.push(Parser::new(&tokens, source).parse_compilation_unit()?);
        }
        let refs: Vec<&CompilationUnit> = units.iter().collect();
        self.add_units(&refs);
        Ok(())
    }

    /// A copy of this classpath that also knows the classes declared in `cu`.
    pub fn with_unit(&self, cu: &CompilationUnit) -> Classpath {
        let mut classpath = self.clone();
        classpath.add_units(&[cu]);
        classpath
    }

    pub fn add_units(&mut self, units: &[&CompilationUnit]) {
        let scopes: Vec<NameScope> = units.iter().map(|u| NameScope::for_unit(u)).collect();
        let declared: HashSet<String> = units
            .iter()
            .zip(&scopes)
            .flat_map(|(unit, scope)| unit.classes.iter().map(move |c| scope.qualify(&c.name.name)))
            .collect();

        let infos: Vec<ClassInfo> = {
            let known = |fqn: &str| self.classes.contains_key(fqn) || declared.contains(fqn);
            units
                .iter()
                .zip(&scopes)
                .flat_map(|(unit, scope)| unit.classes.iter().map(move |c| (c, scope)))
                .map(|(class, scope)| class_info(class, scope, &known))
                .collect()
        };
        for info in infos {
            self.classes.insert(info.fqn.clone(), info);
        }
        self.relink();
    }

    fn relink(&mut self) {
        let mut linked = HashMap::new();
        for fqn in self.classes.keys() {
            link_class(fqn, &self.classes, &mut linked, &mut Vec::new());
        }
        self.linked = linked;
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.classes.contains_key(fqn)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_info(&self, fqn: &str) -> Option<&ClassInfo> {
        self.classes.get(fqn)
    }

    pub fn class_type(&self, fqn: &str) -> Option<Arc<ClassType>> {
        self.linked.get(fqn).cloned()
    }

    /// The linked type for `fqn`, or a name-only type if it is unknown.
    pub fn type_named(&self, fqn: &str) -> Arc<ClassType> {
        self.class_type(fqn).unwrap_or_else(|| ClassType::shallow(fqn))
    }

    pub fn java_type(&self, sig: &TypeSig, bindings: &HashMap<String, JavaType>) -> JavaType {
        match sig {
            TypeSig::Class { fqn, args } if args.is_empty() => JavaType::Class(self.type_named(fqn)),
            TypeSig::Class { fqn, args } => JavaType::Parameterized {
                base: self.type_named(fqn),
                args: args.iter().map(|a| self.java_type(a, bindings)).collect(),
            },
            TypeSig::Array(inner) => JavaType::Array(Box::new(self.java_type(inner, bindings))),
            TypeSig::Primitive(p) => JavaType::Primitive(*p),
            TypeSig::TypeVariable(v) => bindings.get(v).cloned().unwrap_or_else(|| JavaType::TypeVariable(v.clone())),
            TypeSig::Wildcard => JavaType::Class(self.type_named(OBJECT)),
        }
    }

    /// Resolve `receiver.name(args)`. Overloads are chosen by arity, then by
    /// argument compatibility; methods declared nearer the receiver win.
    pub fn find_method(&self, receiver: &JavaType, name: &str, args: &[Option<JavaType>]) -> Option<MethodType> {
        let owner = receiver.class_type()?;
        let mut candidates: Vec<(Arc<ClassType>, &MethodSig)> = Vec::new();
        for ancestor in owner.ancestors() {
            let Some(info) = self.class_info(&ancestor.fqn) else { continue };
            for sig in info.methods_named(name).filter(|m| m.params.len() == args.len()) {
                candidates.push((Arc::clone(&ancestor), sig));
            }
        }
        let (declaring, sig) = self.pick_overload(&candidates, args)?;
        let mut bindings = self.bindings_for(receiver, &declaring.fqn);
        self.infer_method_type_params(sig, args, &mut bindings);
        Some(self.method_type(declaring, sig, &bindings, None))
    }

    /// Resolve `new class(args)`. A class that declares no constructors gets
    /// the implicit no-argument one.
    pub fn find_constructor(&self, class: &JavaType, args: &[Option<JavaType>]) -> Option<MethodType> {
        let declaring = class.class_type()?;
        let info = self.class_info(&declaring.fqn)?;
        let bindings = self.bindings_for(class, &declaring.fqn);
        if info.constructors.is_empty() {
            return args.is_empty().then(|| MethodType {
                declaring_type: Arc::clone(declaring),
                name: CONSTRUCTOR_NAME.to_string(),
                parameter_types: Vec::new(),
                return_type: class.clone(),
                thrown_exceptions: Vec::new(),
            });
        }
        let candidates: Vec<(Arc<ClassType>, &MethodSig)> = info
            .constructors
            .iter()
            .filter(|c| c.params.len() == args.len())
            .map(|c| (Arc::clone(declaring), c))
            .collect();
        let (declaring, sig) = self.pick_overload(&candidates, args)?;
        Some(self.method_type(declaring, sig, &bindings, Some(class.clone())))
    }

    pub fn find_field(&self, owner: &JavaType, name: &str) -> Option<JavaType> {
        let class = owner.class_type()?;
        for ancestor in class.ancestors() {
            if let Some(field) = self.class_info(&ancestor.fqn).and_then(|info| info.field(name)) {
                let bindings = self.bindings_for(owner, &ancestor.fqn);
                return Some(self.java_type(&field.ty, &bindings));
            }
        }
        None
    }

    fn pick_overload<'s>(
        &self,
        candidates: &[(Arc<ClassType>, &'s MethodSig)],
        args: &[Option<JavaType>],
    ) -> Option<(Arc<ClassType>, &'s MethodSig)> {
        let best = candidates
            .iter()
            .find(|(_, sig)| sig.params.iter().zip(args).all(|(p, a)| self.accepts(p, a.as_ref())))
            .or_else(|| candidates.first())?;
        Some((Arc::clone(&best.0), best.1))
    }

    /// Whether an argument of type `arg` can be passed for parameter `param`.
    /// Unknown argument types are accepted.
    fn accepts(&self, param: &TypeSig, arg: Option<&JavaType>) -> bool {
        let Some(arg) = arg else { return true };
        match (param, arg) {
            (TypeSig::TypeVariable(_) | TypeSig::Wildcard, _) => true,
            (TypeSig::Primitive(_), JavaType::Primitive(_)) => true,
            (TypeSig::Class { fqn, .. }, JavaType::Null) => !fqn.is_empty(),
            (TypeSig::Class { fqn, .. }, JavaType::Primitive(_)) => fqn == OBJECT,
            (TypeSig::Class { fqn, .. }, other) => other.is_assignable_to(fqn),
            (TypeSig::Array(_), JavaType::Array(_) | JavaType::Null) => true,
            _ => false,
        }
    }

    /// Type-variable bindings of `target`, seen from a receiver of type
    /// `receiver`, following type arguments through the supertype chain.
    fn bindings_for(&self, receiver: &JavaType, target: &str) -> HashMap<String, JavaType> {
        let Some(base) = receiver.class_type() else { return HashMap::new() };
        let args = match receiver {
            JavaType::Parameterized { args, .. } => args.clone(),
            _ => Vec::new(),
        };
        self.walk_bindings(&base.fqn, &args, target, 0).unwrap_or_default()
    }

    fn walk_bindings(
        &self,
        fqn: &str,
        args: &[JavaType],
        target: &str,
        depth: usize,
    ) -> Option<HashMap<String, JavaType>> {
        let info = self.class_info(fqn)?;
        let bindings: HashMap<String, JavaType> = info.type_params.iter().cloned().zip(args.iter().cloned()).collect();
        if fqn == target {
            return Some(bindings);
        }
        if depth > 32 {
            return None;
        }
        for sup in info.supertype.iter().chain(&info.interfaces) {
            if let TypeSig::Class { fqn: sup_fqn, args: sup_args } = sup {
                let resolved: Vec<JavaType> = sup_args.iter().map(|a| self.java_type(a, &bindings)).collect();
                if let Some(found) = self.walk_bindings(sup_fqn, &resolved, target, depth + 1) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn infer_method_type_params(
        &self,
        sig: &MethodSig,
        args: &[Option<JavaType>],
        bindings: &mut HashMap<String, JavaType>,
    ) {
        for (param, arg) in sig.params.iter().zip(args) {
            if let Some(arg) = arg {
                unify(param, arg, &sig.type_params, bindings);
            }
        }
    }

    fn method_type(
        &self,
        declaring: Arc<ClassType>,
        sig: &MethodSig,
        bindings: &HashMap<String, JavaType>,
        constructed: Option<JavaType>,
    ) -> MethodType {
        MethodType {
            name: sig.name.clone(),
            parameter_types: sig.params.iter().map(|p| self.java_type(p, bindings)).collect(),
            return_type: constructed.unwrap_or_else(|| self.java_type(&sig.return_type, bindings)),
            thrown_exceptions: sig.throws.iter().map(|t| self.java_type(t, bindings)).collect(),
            declaring_type: declaring,
        }
    }
}

/// Bind method type variables in `param` against a concrete argument type.
fn unify(param: &TypeSig, arg: &JavaType, type_params: &[String], bindings: &mut HashMap<String, JavaType>) {
    match (param, arg) {
        (TypeSig::TypeVariable(v), _) if type_params.contains(v) && !matches!(arg, JavaType::Null) => {
            bindings.entry(v.clone()).or_insert_with(|| arg.clone());
        }
        (TypeSig::Class { args: params, .. }, JavaType::Parameterized { args, .. }) => {
            for (p, a) in params.iter().zip(args) {
                unify(p, a, type_params, bindings);
            }
        }
        (TypeSig::Array(p), JavaType::Array(a)) => unify(p, a, type_params, bindings),
        _ => {}
    }
}

fn link_class(
    fqn: &str,
    classes: &HashMap<String, ClassInfo>,
    linked: &mut HashMap<String, Arc<ClassType>>,
    visiting: &mut Vec<String>,
) -> Arc<ClassType> {
    if let Some(ty) = linked.get(fqn) {
        return Arc::clone(ty);
    }
    let Some(info) = classes.get(fqn) else {
        return ClassType::shallow(fqn);
    };
    // Cyclic hierarchies are cut at the repeated class.
    if visiting.iter().any(|v| v == fqn) {
        return ClassType::shallow(fqn);
    }
    visiting.push(fqn.to_string());
    let supertype = match &info.supertype {
        Some(sig) => sig.fqn().map(|s| link_class(s, classes, linked, visiting)),
        None if info.kind == TypeKind::Class && fqn != OBJECT => Some(link_class(OBJECT, classes, linked, visiting)),
        None => None,
    };
    let interfaces = info
        .interfaces
        .iter()
        .filter_map(TypeSig::fqn)
        .map(|s| link_class(s, classes, linked, visiting))
        .collect();
    visiting.pop();

    let ty = Arc::new(ClassType { fqn: fqn.to_string(), kind: info.kind, supertype, interfaces });
    linked.insert(fqn.to_string(), Arc::clone(&ty));
    ty
}

fn has_modifier(modifiers: &[Modifier], kind: ModifierKind) -> bool {
    modifiers.iter().any(|m| matches!(m, Modifier::Keyword { kind: k, .. } if *k == kind))
}

fn class_info(class: &ClassDecl, scope: &NameScope, known: &impl Fn(&str) -> bool) -> ClassInfo {
    let fqn = scope.qualify(&class.name.name);
    let kind = match class.kind {
        ClassKind::Class => TypeKind::Class,
        ClassKind::Interface => TypeKind::Interface,
    };
    let type_params: Vec<String> = class
        .type_params
        .as_ref()
        .map(|tp| tp.iter().map(|id| id.name.clone()).collect())
        .unwrap_or_default();

    let extends: Vec<TypeSig> = class
        .extends
        .iter()
        .flat_map(|e| e.element.iter())
        .map(|t| scope.signature(&t.element, &type_params, known))
        .collect();
    let mut interfaces: Vec<TypeSig> = class
        .implements
        .iter()
        .flat_map(|i| i.element.iter())
        .map(|t| scope.signature(&t.element, &type_params, known))
        .collect();
    let supertype = match kind {
        TypeKind::Class => extends.into_iter().next(),
        TypeKind::Interface => {
            interfaces.extend(extends);
            None
        }
    };

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut constructors = Vec::new();
    for member in &class.body.members {
        match &member.element {
            Member::Field(decl) => {
                let ty = scope.signature(&decl.type_expr, &type_params, known);
                let is_static = kind == TypeKind::Interface || has_modifier(&decl.modifiers, ModifierKind::Static);
                for var in &decl.variables {
                    fields.push(FieldSig { name: var.element.name.name.clone(), ty: ty.clone(), is_static });
                }
            }
            Member::Method(method) => {
                let sig = method_sig(method, &fqn, &type_params, scope, known);
                if method.is_constructor() {
                    constructors.push(sig);
                } else {
                    methods.push(sig);
                }
            }
        }
    }

    ClassInfo { fqn, kind, type_params, supertype, interfaces, fields, methods, constructors }
}

fn method_sig(
    method: &MethodDecl,
    owner: &str,
    class_type_params: &[String],
    scope: &NameScope,
    known: &impl Fn(&str) -> bool,
) -> MethodSig {
    let type_params: Vec<String> = method
        .type_params
        .as_ref()
        .map(|tp| tp.iter().map(|id| id.name.clone()).collect())
        .unwrap_or_default();
    let vars: Vec<String> = class_type_params.iter().chain(&type_params).cloned().collect();
    let params = method.params.iter().map(|p| scope.signature(&p.type_expr, &vars, known)).collect();
    let throws = method
        .throws
        .iter()
        .flat_map(|t| t.element.iter())
        .map(|t| scope.signature(&t.element, &vars, known))
        .collect();
    let (name, return_type) = match &method.return_type {
        Some(ret) => (method.name.name.clone(), scope.signature(ret, &vars, known)),
        None => (CONSTRUCTOR_NAME.to_string(), TypeSig::class(owner)),
    };
    MethodSig { name, type_params, params, return_type, throws, is_static: method.is_static() }
}
