//! Lossless Java syntax tree.
//!
//! Every node owns the whitespace and comments that precede it (its prefix),
//! so printing a tree reproduces the parsed source byte for byte. Composite
//! trees whose first token belongs to a child (qualified names, invocations
//! with a receiver, binary expressions, multi-catch unions) have no prefix of
//! their own; the prefix lives on the leftmost child.

use uuid::Uuid;

use crate::typeck::types::{JavaType, MethodType};

/// Whitespace and comments between two tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Space(String);

impl Space {
    pub const EMPTY: Space = Space(String::new());

    pub fn new(text: impl Into<String>) -> Self {
        Space(text.into())
    }

    pub fn single() -> Self {
        Space(" ".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the trivia contains an empty line.
    pub fn has_blank_line(&self) -> bool {
        self.0.matches('\n').count() >= 2
    }
}

static NO_SPACE: Space = Space::EMPTY;

/// An element followed by the trivia before its trailing delimiter.
#[derive(Debug, Clone)]
pub struct RightPadded<T> {
    pub element: T,
    pub after: Space,
}

impl<T> RightPadded<T> {
    pub fn new(element: T) -> Self {
        Self { element, after: Space::EMPTY }
    }

    pub fn with_after(mut self, after: Space) -> Self {
        self.after = after;
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RightPadded<U> {
        RightPadded { element: f(self.element), after: self.after }
    }
}

/// An element preceded by a keyword or operator; `before` is the trivia in
/// front of that keyword.
#[derive(Debug, Clone)]
pub struct LeftPadded<T> {
    pub before: Space,
    pub element: T,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, element: T) -> Self {
        Self { before, element }
    }
}

/// A delimited, comma-separated list such as `(a, b)` or `<K, V>`.
///
/// `before` precedes the opening delimiter. Each element's `after` is the
/// trivia before the following comma or the closing delimiter. `end` is only
/// printed when the list is empty.
#[derive(Debug, Clone)]
pub struct Container<T> {
    pub before: Space,
    pub elements: Vec<RightPadded<T>>,
    pub end: Space,
}

impl<T> Container<T> {
    pub fn empty() -> Self {
        Self { before: Space::EMPTY, elements: Vec::new(), end: Space::EMPTY }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().map(|rp| &rp.element)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.elements.iter_mut().map(|rp| &mut rp.element)
    }
}

/// `( tree )` of a control statement or catch clause.
#[derive(Debug, Clone)]
pub struct ControlParens<T> {
    pub prefix: Space,
    pub tree: RightPadded<T>,
}

// ── Compilation unit ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// `after` is the trivia before the package declaration's `;`.
    pub package: Option<RightPadded<Package>>,
    pub imports: Vec<RightPadded<Import>>,
    pub classes: Vec<ClassDecl>,
    pub eof: Space,
}

impl CompilationUnit {
    pub fn package_name(&self) -> Option<String> {
        self.package.as_ref().map(|p| p.element.name.qualified_name())
    }
}

#[derive(Debug, Clone)]
pub struct Package {
    pub prefix: Space,
    pub name: TypeTree,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub prefix: Space,
    /// Trivia before `static`, when this is a static import.
    pub static_kw: Option<Space>,
    /// Dotted name; the last segment is `*` for on-demand imports.
    pub qualid: TypeTree,
}

impl Import {
    pub fn new(fqn: &str) -> Self {
        Import {
            prefix: Space::new("\n"),
            static_kw: None,
            qualid: TypeTree::from_qualified_name(fqn, Space::single()),
        }
    }

    pub fn is_static(&self) -> bool {
        self.static_kw.is_some()
    }

    pub fn type_name(&self) -> String {
        self.qualid.qualified_name()
    }

    pub fn is_wildcard(&self) -> bool {
        self.qualid.simple_name() == "*"
    }

    /// The imported name without its last segment.
    pub fn package_name(&self) -> String {
        let full = self.type_name();
        match full.rfind('.') {
            Some(idx) => full[..idx].to_string(),
            None => String::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.qualid.simple_name()
    }
}

// ── Declarations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub id: Uuid,
    pub modifiers: Vec<Modifier>,
    /// Trivia before the `class`/`interface` keyword.
    pub kind_prefix: Space,
    pub kind: ClassKind,
    pub name: Ident,
    pub type_params: Option<Container<Ident>>,
    pub extends: Option<LeftPadded<Vec<RightPadded<TypeTree>>>>,
    pub implements: Option<LeftPadded<Vec<RightPadded<TypeTree>>>>,
    pub body: ClassBody,
    pub ty: Option<JavaType>,
}

impl ClassDecl {
    pub fn prefix(&self) -> &Space {
        match self.modifiers.first() {
            Some(m) => m.prefix(),
            None => &self.kind_prefix,
        }
    }

    pub fn prefix_mut(&mut self) -> &mut Space {
        match self.modifiers.first_mut() {
            Some(m) => m.prefix_mut(),
            None => &mut self.kind_prefix,
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.body.members.iter().filter_map(|m| match &m.element {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassBody {
    pub prefix: Space,
    /// `after` is the trivia before a member's terminating `;`.
    pub members: Vec<RightPadded<Member>>,
    pub end: Space,
}

#[derive(Debug, Clone)]
pub enum Member {
    Field(VariableDeclarations),
    Method(MethodDecl),
}

impl Member {
    pub fn needs_semicolon(&self) -> bool {
        match self {
            Member::Field(_) => true,
            Member::Method(m) => m.body.is_none(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub id: Uuid,
    pub modifiers: Vec<Modifier>,
    pub type_params: Option<Container<Ident>>,
    /// `None` for constructors.
    pub return_type: Option<TypeTree>,
    pub name: Ident,
    pub params: Container<VariableDeclarations>,
    pub throws: Option<LeftPadded<Vec<RightPadded<TypeTree>>>>,
    pub body: Option<Block>,
    pub method_type: Option<MethodType>,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| matches!(m, Modifier::Keyword { kind: ModifierKind::Static, .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Default,
}

impl ModifierKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Protected => "protected",
            ModifierKind::Private => "private",
            ModifierKind::Static => "static",
            ModifierKind::Final => "final",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Native => "native",
            ModifierKind::Synchronized => "synchronized",
            ModifierKind::Transient => "transient",
            ModifierKind::Volatile => "volatile",
            ModifierKind::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Modifier {
    Keyword { prefix: Space, kind: ModifierKind },
    Annotation(Annotation),
}

impl Modifier {
    pub fn prefix(&self) -> &Space {
        match self {
            Modifier::Keyword { prefix, .. } => prefix,
            Modifier::Annotation(a) => &a.prefix,
        }
    }

    pub fn prefix_mut(&mut self) -> &mut Space {
        match self {
            Modifier::Keyword { prefix, .. } => prefix,
            Modifier::Annotation(a) => &mut a.prefix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Annotation {
    /// Trivia before `@`.
    pub prefix: Space,
    pub name: TypeTree,
    pub args: Option<Container<Expression>>,
}

// ── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Ident {
    pub prefix: Space,
    pub name: String,
    pub ty: Option<JavaType>,
}

impl Ident {
    pub fn new(prefix: Space, name: impl Into<String>) -> Self {
        Ident { prefix, name: name.into(), ty: None }
    }
}

#[derive(Debug, Clone)]
pub struct ArrayDim {
    /// Trivia before `[`.
    pub before: Space,
    /// Trivia before `]`.
    pub inner: Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone)]
pub struct WildcardBound {
    pub kind: LeftPadded<BoundKind>,
    pub tree: Box<TypeTree>,
}

#[derive(Debug, Clone)]
pub enum TypeTree {
    Ident(Ident),
    Qualified {
        target: Box<TypeTree>,
        /// `before` is the trivia before the `.`.
        name: LeftPadded<Ident>,
        ty: Option<JavaType>,
    },
    Parameterized {
        clazz: Box<TypeTree>,
        type_args: Container<TypeTree>,
        ty: Option<JavaType>,
    },
    Array {
        element: Box<TypeTree>,
        dims: Vec<ArrayDim>,
        ty: Option<JavaType>,
    },
    Wildcard {
        prefix: Space,
        bound: Option<WildcardBound>,
    },
    /// Alternatives of a multi-catch parameter; each `after` is the trivia
    /// before the following `|`.
    MultiCatch {
        id: Uuid,
        alternatives: Vec<RightPadded<TypeTree>>,
        ty: Option<JavaType>,
    },
}

impl TypeTree {
    /// Build a simple or dotted name tree from a fully qualified name.
    pub fn from_qualified_name(fqn: &str, prefix: Space) -> TypeTree {
        let mut parts = fqn.split('.');
        let first = parts.next().unwrap_or_default();
        let mut tree = TypeTree::Ident(Ident::new(prefix, first));
        for part in parts {
            tree = TypeTree::Qualified {
                target: Box::new(tree),
                name: LeftPadded::new(Space::EMPTY, Ident::new(Space::EMPTY, part)),
                ty: None,
            };
        }
        tree
    }

    pub fn ty(&self) -> Option<&JavaType> {
        match self {
            TypeTree::Ident(id) => id.ty.as_ref(),
            TypeTree::Qualified { ty, .. }
            | TypeTree::Parameterized { ty, .. }
            | TypeTree::Array { ty, .. }
            | TypeTree::MultiCatch { ty, .. } => ty.as_ref(),
            TypeTree::Wildcard { .. } => None,
        }
    }

    pub fn set_ty(&mut self, new_ty: Option<JavaType>) {
        match self {
            TypeTree::Ident(id) => id.ty = new_ty,
            TypeTree::Qualified { ty, .. }
            | TypeTree::Parameterized { ty, .. }
            | TypeTree::Array { ty, .. }
            | TypeTree::MultiCatch { ty, .. } => *ty = new_ty,
            TypeTree::Wildcard { .. } => {}
        }
    }

    pub fn prefix(&self) -> &Space {
        match self {
            TypeTree::Ident(id) => &id.prefix,
            TypeTree::Qualified { target, .. } => target.prefix(),
            TypeTree::Parameterized { clazz, .. } => clazz.prefix(),
            TypeTree::Array { element, .. } => element.prefix(),
            TypeTree::Wildcard { prefix, .. } => prefix,
            TypeTree::MultiCatch { alternatives, .. } => {
                alternatives.first().map_or(&NO_SPACE, |alt| alt.element.prefix())
            }
        }
    }

    pub fn prefix_mut(&mut self) -> Option<&mut Space> {
        match self {
            TypeTree::Ident(id) => Some(&mut id.prefix),
            TypeTree::Qualified { target, .. } => target.prefix_mut(),
            TypeTree::Parameterized { clazz, .. } => clazz.prefix_mut(),
            TypeTree::Array { element, .. } => element.prefix_mut(),
            TypeTree::Wildcard { prefix, .. } => Some(prefix),
            TypeTree::MultiCatch { alternatives, .. } => {
                alternatives.first_mut().and_then(|alt| alt.element.prefix_mut())
            }
        }
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        if let Some(p) = self.prefix_mut() {
            *p = prefix;
        }
        self
    }

    /// The last name segment (`Map` for `java.util.Map<K, V>`).
    pub fn simple_name(&self) -> &str {
        match self {
            TypeTree::Ident(id) => &id.name,
            TypeTree::Qualified { name, .. } => &name.element.name,
            TypeTree::Parameterized { clazz, .. } => clazz.simple_name(),
            TypeTree::Array { element, .. } => element.simple_name(),
            TypeTree::Wildcard { .. } => "?",
            TypeTree::MultiCatch { .. } => "",
        }
    }

    /// Dotted name as written, without type arguments or dimensions.
    pub fn qualified_name(&self) -> String {
        match self {
            TypeTree::Ident(id) => id.name.clone(),
            TypeTree::Qualified { target, name, .. } => {
                format!("{}.{}", target.qualified_name(), name.element.name)
            }
            TypeTree::Parameterized { clazz, .. } => clazz.qualified_name(),
            TypeTree::Array { element, .. } => element.qualified_name(),
            TypeTree::Wildcard { .. } => "?".to_string(),
            TypeTree::MultiCatch { alternatives, .. } => alternatives
                .iter()
                .map(|a| a.element.qualified_name())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

// ── Statements ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Block {
    pub prefix: Space,
    /// `after` is the trivia before a statement's terminating `;`.
    pub statements: Vec<RightPadded<Statement>>,
    pub end: Space,
}

#[derive(Debug, Clone)]
pub struct NamedVariable {
    pub name: Ident,
    /// `before` is the trivia before `=`.
    pub initializer: Option<LeftPadded<Expression>>,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarations {
    pub modifiers: Vec<Modifier>,
    pub type_expr: TypeTree,
    /// `after` is the trivia before the following `,`.
    pub variables: Vec<RightPadded<NamedVariable>>,
}

impl VariableDeclarations {
    pub fn prefix(&self) -> &Space {
        match self.modifiers.first() {
            Some(m) => m.prefix(),
            None => self.type_expr.prefix(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Else {
    pub prefix: Space,
    pub body: RightPadded<Box<Statement>>,
}

#[derive(Debug, Clone)]
pub struct ForEachControl {
    pub prefix: Space,
    /// `after` is the trivia before `:`.
    pub variable: RightPadded<VariableDeclarations>,
    /// `after` is the trivia before `)`.
    pub iterable: RightPadded<Expression>,
}

#[derive(Debug, Clone)]
pub enum ResourceKind {
    Declaration(VariableDeclarations),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub kind: ResourceKind,
    /// The implicit `close()` invoked when the try exits.
    pub close_method: Option<MethodType>,
}

#[derive(Debug, Clone)]
pub struct Resources {
    /// Trivia before `(`.
    pub before: Space,
    /// `after` is the trivia before the `;` or `)` that follows a resource.
    pub elements: Vec<RightPadded<Resource>>,
    pub trailing_semicolon: bool,
    /// Trivia before `)` after a trailing `;`.
    pub end: Space,
}

#[derive(Debug, Clone)]
pub struct Catch {
    pub id: Uuid,
    /// Trivia before `catch`.
    pub prefix: Space,
    pub parameter: ControlParens<VariableDeclarations>,
    pub body: Block,
}

impl Catch {
    pub fn parameter_type(&self) -> &TypeTree {
        &self.parameter.tree.element.type_expr
    }
}

#[derive(Debug, Clone)]
pub struct Try {
    pub id: Uuid,
    pub prefix: Space,
    pub resources: Option<Resources>,
    pub body: Block,
    pub catches: Vec<Catch>,
    /// `before` is the trivia before `finally`.
    pub finally: Option<LeftPadded<Block>>,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Block(Block),
    VariableDeclarations(VariableDeclarations),
    Expression(Expression),
    Return {
        prefix: Space,
        expr: Option<Expression>,
    },
    Throw {
        prefix: Space,
        exception: Expression,
    },
    If {
        prefix: Space,
        condition: ControlParens<Expression>,
        then_part: RightPadded<Box<Statement>>,
        else_part: Option<Else>,
    },
    While {
        prefix: Space,
        condition: ControlParens<Expression>,
        body: RightPadded<Box<Statement>>,
    },
    ForEach {
        prefix: Space,
        control: ForEachControl,
        body: RightPadded<Box<Statement>>,
    },
    Try(Box<Try>),
    Empty {
        prefix: Space,
    },
}

impl Statement {
    /// Whether the statement is terminated by `;` when it appears in a block.
    pub fn needs_semicolon(&self) -> bool {
        matches!(
            self,
            Statement::VariableDeclarations(_)
                | Statement::Expression(_)
                | Statement::Return { .. }
                | Statement::Throw { .. }
                | Statement::Empty { .. }
        )
    }

    pub fn prefix(&self) -> &Space {
        match self {
            Statement::Block(b) => &b.prefix,
            Statement::VariableDeclarations(v) => v.prefix(),
            Statement::Expression(e) => e.prefix(),
            Statement::Try(t) => &t.prefix,
            Statement::Return { prefix, .. }
            | Statement::Throw { prefix, .. }
            | Statement::If { prefix, .. }
            | Statement::While { prefix, .. }
            | Statement::ForEach { prefix, .. }
            | Statement::Empty { prefix } => prefix,
        }
    }
}

// ── Expressions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    String,
    Char,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostIncrement | UnaryOp::PostDecrement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    Ident(Ident),
    FieldAccess {
        target: Box<Expression>,
        name: LeftPadded<Ident>,
        ty: Option<JavaType>,
    },
    Literal {
        prefix: Space,
        source: String,
        kind: LiteralKind,
        ty: Option<JavaType>,
    },
    MethodInvocation {
        /// Receiver; `after` is the trivia before the `.`.
        select: Option<RightPadded<Box<Expression>>>,
        name: Ident,
        args: Container<Expression>,
        method_type: Option<MethodType>,
    },
    NewClass {
        /// Trivia before `new`.
        prefix: Space,
        clazz: TypeTree,
        args: Container<Expression>,
        method_type: Option<MethodType>,
        ty: Option<JavaType>,
    },
    Assignment {
        variable: Box<Expression>,
        op: LeftPadded<AssignOp>,
        value: Box<Expression>,
        ty: Option<JavaType>,
    },
    Binary {
        left: Box<Expression>,
        op: LeftPadded<BinaryOp>,
        right: Box<Expression>,
        ty: Option<JavaType>,
    },
    Unary {
        op: UnaryOp,
        /// Trivia before the operator token.
        op_prefix: Space,
        expr: Box<Expression>,
        ty: Option<JavaType>,
    },
    Ternary {
        condition: Box<Expression>,
        /// `before` is the trivia before `?`.
        true_part: LeftPadded<Box<Expression>>,
        /// `before` is the trivia before `:`.
        false_part: LeftPadded<Box<Expression>>,
        ty: Option<JavaType>,
    },
    Parens {
        prefix: Space,
        inner: RightPadded<Box<Expression>>,
        ty: Option<JavaType>,
    },
}

impl Expression {
    pub fn prefix(&self) -> &Space {
        match self {
            Expression::Ident(id) => &id.prefix,
            Expression::FieldAccess { target, .. } => target.prefix(),
            Expression::Literal { prefix, .. }
            | Expression::NewClass { prefix, .. }
            | Expression::Parens { prefix, .. } => prefix,
            Expression::MethodInvocation { select, name, .. } => match select {
                Some(sel) => sel.element.prefix(),
                None => &name.prefix,
            },
            Expression::Assignment { variable, .. } => variable.prefix(),
            Expression::Binary { left, .. } => left.prefix(),
            Expression::Unary { op, op_prefix, expr, .. } => {
                if op.is_postfix() {
                    expr.prefix()
                } else {
                    op_prefix
                }
            }
            Expression::Ternary { condition, .. } => condition.prefix(),
        }
    }

    /// Static type of the expression, if attribution resolved one.
    pub fn ty(&self) -> Option<&JavaType> {
        match self {
            Expression::Ident(id) => id.ty.as_ref(),
            Expression::MethodInvocation { method_type, .. } => {
                method_type.as_ref().map(|m| &m.return_type)
            }
            Expression::FieldAccess { ty, .. }
            | Expression::Literal { ty, .. }
            | Expression::NewClass { ty, .. }
            | Expression::Assignment { ty, .. }
            | Expression::Binary { ty, .. }
            | Expression::Unary { ty, .. }
            | Expression::Ternary { ty, .. }
            | Expression::Parens { ty, .. } => ty.as_ref(),
        }
    }

    /// Resolved method of an invocation or constructor call.
    pub fn method_type(&self) -> Option<&MethodType> {
        match self {
            Expression::MethodInvocation { method_type, .. } | Expression::NewClass { method_type, .. } => {
                method_type.as_ref()
            }
            _ => None,
        }
    }

    /// Dotted name for `a.b.c` chains of plain identifiers.
    pub fn as_qualified_name(&self) -> Option<String> {
        match self {
            Expression::Ident(id) => Some(id.name.clone()),
            Expression::FieldAccess { target, name, .. } => {
                target.as_qualified_name().map(|t| format!("{t}.{}", name.element.name))
            }
            _ => None,
        }
    }
}
