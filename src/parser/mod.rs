pub mod ast;

use uuid::Uuid;

use crate::diagnostics::RewriteError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

/// Recursive-descent parser producing a lossless tree.
///
/// The lexer drops whitespace and comments; the parser recovers them as the
/// source text between the end of the last consumed token (`cursor`) and the
/// start of the next one, and attaches that text as the prefix of whatever
/// node the next token begins.
pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, cursor: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<Token> {
        self.peek().map(|t| t.node)
    }

    fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|t| t.node)
    }

    fn at(&self, kind: Token) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Trivia in front of the next token, without consuming anything.
    fn pending_space(&self) -> Space {
        let end = self.peek().map_or(self.source.len(), |t| t.span.start);
        Space::new(&self.source[self.cursor..end])
    }

    /// Consume the trivia in front of the next token.
    fn take_space(&mut self) -> Space {
        let space = self.pending_space();
        if let Some(tok) = self.peek() {
            self.cursor = tok.span.start;
        }
        space
    }

    fn advance(&mut self) -> Option<(Space, Token, Span)> {
        let tok = self.tokens.get(self.pos)?;
        let prefix = Space::new(&self.source[self.cursor..tok.span.start]);
        self.pos += 1;
        self.cursor = tok.span.end;
        Some((prefix, tok.node, tok.span))
    }

    /// Consume `expected`, returning the trivia that preceded it.
    fn expect(&mut self, expected: Token) -> Result<Space, RewriteError> {
        match self.peek() {
            Some(tok) if tok.node == expected => {
                let (prefix, _, _) = self.advance().ok_or_else(|| self.unexpected_eof(&expected))?;
                Ok(prefix)
            }
            Some(tok) => Err(RewriteError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(self.unexpected_eof(&expected)),
        }
    }

    fn eat(&mut self, kind: Token) -> Option<Space> {
        if self.at(kind) {
            self.advance().map(|(prefix, _, _)| prefix)
        } else {
            None
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, RewriteError> {
        match self.peek() {
            Some(tok) if tok.node == Token::Ident => {
                let name = self.text(tok.span).to_string();
                let (prefix, _, _) = self.advance().ok_or_else(|| self.unexpected_eof(&"identifier"))?;
                Ok(Ident::new(prefix, name))
            }
            Some(tok) => Err(RewriteError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(self.unexpected_eof(&"identifier")),
        }
    }

    fn text(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn unexpected_eof(&self, expected: &dyn std::fmt::Display) -> RewriteError {
        RewriteError::syntax(format!("expected {expected}, found end of file"), self.eof_span())
    }

    fn error_here(&self, msg: impl Into<String>) -> RewriteError {
        let span = self.peek().map_or_else(|| self.eof_span(), |t| t.span);
        RewriteError::syntax(msg, span)
    }

    // ── Compilation unit ─────────────────────────────────────────────────────

    pub fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, RewriteError> {
        let package = if self.at(Token::Package) {
            let prefix = self.expect(Token::Package)?;
            let name = self.parse_qualified_name(false)?;
            let after = self.expect(Token::Semi)?;
            Some(RightPadded { element: Package { prefix, name }, after })
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.at(Token::Import) {
            let prefix = self.expect(Token::Import)?;
            let static_kw = self.eat(Token::Static);
            let qualid = self.parse_qualified_name(true)?;
            let after = self.expect(Token::Semi)?;
            imports.push(RightPadded { element: Import { prefix, static_kw, qualid }, after });
        }

        let mut classes = Vec::new();
        while self.peek().is_some() {
            let modifiers = self.parse_modifiers()?;
            classes.push(self.parse_class_decl(modifiers)?);
        }

        let eof = Space::new(&self.source[self.cursor..]);
        Ok(CompilationUnit { package, imports, classes, eof })
    }

    /// `a.b.C`, optionally ending in `.*` for on-demand imports.
    fn parse_qualified_name(&mut self, allow_star: bool) -> Result<TypeTree, RewriteError> {
        let mut tree = TypeTree::Ident(self.expect_ident()?);
        while self.at(Token::Dot) {
            let before = self.expect(Token::Dot)?;
            let name = if allow_star && self.at(Token::Star) {
                let prefix = self.expect(Token::Star)?;
                Ident::new(prefix, "*")
            } else {
                self.expect_ident()?
            };
            let is_star = name.name == "*";
            tree = TypeTree::Qualified { target: Box::new(tree), name: LeftPadded::new(before, name), ty: None };
            if is_star {
                break;
            }
        }
        Ok(tree)
    }

    // ── Declarations ─────────────────────────────────────────────────────────

    fn parse_modifiers(&mut self) -> Result<Vec<Modifier>, RewriteError> {
        let mut modifiers = Vec::new();
        loop {
            match self.peek_kind() {
                Some(tok) if tok.is_modifier() => {
                    let Some((prefix, tok, _)) = self.advance() else { break };
                    modifiers.push(Modifier::Keyword { prefix, kind: modifier_kind(tok) });
                }
                Some(Token::At) if self.peek_nth(1) != Some(Token::Interface) => {
                    modifiers.push(Modifier::Annotation(self.parse_annotation()?));
                }
                _ => break,
            }
        }
        Ok(modifiers)
    }

    fn parse_annotation(&mut self) -> Result<Annotation, RewriteError> {
        let prefix = self.expect(Token::At)?;
        let name = self.parse_qualified_name(false)?;
        let args = if self.at(Token::LParen) {
            Some(self.parse_container(Token::LParen, Token::RParen, Self::parse_expr)?)
        } else {
            None
        };
        Ok(Annotation { prefix, name, args })
    }

    fn parse_class_decl(&mut self, modifiers: Vec<Modifier>) -> Result<ClassDecl, RewriteError> {
        let kind = match self.peek_kind() {
            Some(Token::Class) => ClassKind::Class,
            Some(Token::Interface) => ClassKind::Interface,
            Some(other) => {
                return Err(self.error_here(format!("expected class or interface declaration, found {other}")));
            }
            None => return Err(self.unexpected_eof(&"class or interface declaration")),
        };
        let (kind_prefix, _, _) = self.advance().ok_or_else(|| self.unexpected_eof(&"class"))?;
        let name = self.expect_ident()?;
        let type_params = if self.at(Token::Lt) {
            Some(self.parse_container(Token::Lt, Token::Gt, Self::expect_ident)?)
        } else {
            None
        };
        let extends = match self.eat(Token::Extends) {
            Some(before) => Some(LeftPadded::new(before, self.parse_type_list()?)),
            None => None,
        };
        let implements = match self.eat(Token::Implements) {
            Some(before) => Some(LeftPadded::new(before, self.parse_type_list()?)),
            None => None,
        };

        let body_prefix = self.expect(Token::LBrace)?;
        let mut members = Vec::new();
        while !self.at(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected_eof(&Token::RBrace));
            }
            let member = self.parse_member()?;
            let after = if member.needs_semicolon() { self.expect(Token::Semi)? } else { Space::EMPTY };
            members.push(RightPadded { element: member, after });
        }
        let end = self.expect(Token::RBrace)?;

        Ok(ClassDecl {
            id: Uuid::new_v4(),
            modifiers,
            kind_prefix,
            kind,
            name,
            type_params,
            extends,
            implements,
            body: ClassBody { prefix: body_prefix, members, end },
            ty: None,
        })
    }

    fn parse_type_list(&mut self) -> Result<Vec<RightPadded<TypeTree>>, RewriteError> {
        let mut list = Vec::new();
        loop {
            let tree = self.parse_type()?;
            match self.eat(Token::Comma) {
                Some(after) => list.push(RightPadded { element: tree, after }),
                None => {
                    list.push(RightPadded::new(tree));
                    return Ok(list);
                }
            }
        }
    }

    fn parse_member(&mut self) -> Result<Member, RewriteError> {
        let modifiers = self.parse_modifiers()?;
        let type_params = if self.at(Token::Lt) {
            Some(self.parse_container(Token::Lt, Token::Gt, Self::expect_ident)?)
        } else {
            None
        };

        // Constructor: `Name(`
        if self.at(Token::Ident) && self.peek_nth(1) == Some(Token::LParen) {
            let name = self.expect_ident()?;
            return self.parse_method_rest(modifiers, type_params, None, name).map(Member::Method);
        }

        let type_expr = self.parse_type()?;
        let name = self.expect_ident()?;
        if self.at(Token::LParen) {
            return self.parse_method_rest(modifiers, type_params, Some(type_expr), name).map(Member::Method);
        }
        if type_params.is_some() {
            return Err(self.error_here("type parameters are only allowed on methods"));
        }
        self.parse_variables_rest(modifiers, type_expr, name).map(Member::Field)
    }

    fn parse_method_rest(
        &mut self,
        modifiers: Vec<Modifier>,
        type_params: Option<Container<Ident>>,
        return_type: Option<TypeTree>,
        name: Ident,
    ) -> Result<MethodDecl, RewriteError> {
        let params = self.parse_container(Token::LParen, Token::RParen, Self::parse_parameter)?;
        let throws = match self.eat(Token::Throws) {
            Some(before) => Some(LeftPadded::new(before, self.parse_type_list()?)),
            None => None,
        };
        let body = if self.at(Token::LBrace) { Some(self.parse_block()?) } else { None };
        Ok(MethodDecl {
            id: Uuid::new_v4(),
            modifiers,
            type_params,
            return_type,
            name,
            params,
            throws,
            body,
            method_type: None,
        })
    }

    fn parse_parameter(&mut self) -> Result<VariableDeclarations, RewriteError> {
        let modifiers = self.parse_modifiers()?;
        let type_expr = self.parse_type()?;
        let name = self.expect_ident()?;
        Ok(VariableDeclarations {
            modifiers,
            type_expr,
            variables: vec![RightPadded::new(NamedVariable { name, initializer: None })],
        })
    }

    /// Declarators after the type and first name: `= init, b, c = d`.
    fn parse_variables_rest(
        &mut self,
        modifiers: Vec<Modifier>,
        type_expr: TypeTree,
        first: Ident,
    ) -> Result<VariableDeclarations, RewriteError> {
        let mut variables = Vec::new();
        let mut name = first;
        loop {
            let initializer = match self.eat(Token::Eq) {
                Some(before) => Some(LeftPadded::new(before, self.parse_expr()?)),
                None => None,
            };
            let var = NamedVariable { name, initializer };
            match self.eat(Token::Comma) {
                Some(after) => {
                    variables.push(RightPadded { element: var, after });
                    name = self.expect_ident()?;
                }
                None => {
                    variables.push(RightPadded::new(var));
                    break;
                }
            }
        }
        Ok(VariableDeclarations { modifiers, type_expr, variables })
    }

    fn parse_local_variables(&mut self) -> Result<VariableDeclarations, RewriteError> {
        let modifiers = self.parse_modifiers()?;
        let type_expr = self.parse_type()?;
        let name = self.expect_ident()?;
        self.parse_variables_rest(modifiers, type_expr, name)
    }

    /// `open elem, elem close`, keeping the trivia around every delimiter.
    fn parse_container<T>(
        &mut self,
        open: Token,
        close: Token,
        mut element: impl FnMut(&mut Self) -> Result<T, RewriteError>,
    ) -> Result<Container<T>, RewriteError> {
        let before = self.expect(open)?;
        let mut elements = Vec::new();
        if self.at(close) {
            let end = self.expect(close)?;
            return Ok(Container { before, elements, end });
        }
        loop {
            let el = element(self)?;
            match self.eat(Token::Comma) {
                Some(after) => elements.push(RightPadded { element: el, after }),
                None => {
                    let after = self.expect(close)?;
                    elements.push(RightPadded { element: el, after });
                    return Ok(Container { before, elements, end: Space::EMPTY });
                }
            }
        }
    }

    // ── Types ────────────────────────────────────────────────────────────────

    fn parse_type(&mut self) -> Result<TypeTree, RewriteError> {
        if self.at(Token::Question) {
            let prefix = self.expect(Token::Question)?;
            let bound = match self.peek_kind() {
                Some(Token::Extends) | Some(Token::Super) => {
                    let Some((before, tok, _)) = self.advance() else {
                        return Err(self.unexpected_eof(&"type bound"));
                    };
                    let kind = if tok == Token::Extends { BoundKind::Extends } else { BoundKind::Super };
                    Some(WildcardBound { kind: LeftPadded::new(before, kind), tree: Box::new(self.parse_type()?) })
                }
                _ => None,
            };
            return Ok(TypeTree::Wildcard { prefix, bound });
        }

        let mut tree = TypeTree::Ident(self.expect_ident()?);
        while self.at(Token::Dot) && self.peek_nth(1) == Some(Token::Ident) {
            let before = self.expect(Token::Dot)?;
            let name = self.expect_ident()?;
            tree = TypeTree::Qualified { target: Box::new(tree), name: LeftPadded::new(before, name), ty: None };
        }
        if self.at(Token::Lt) {
            let type_args = self.parse_container(Token::Lt, Token::Gt, Self::parse_type)?;
            tree = TypeTree::Parameterized { clazz: Box::new(tree), type_args, ty: None };
        }
        let mut dims = Vec::new();
        while self.at(Token::LBracket) && self.peek_nth(1) == Some(Token::RBracket) {
            let before = self.expect(Token::LBracket)?;
            let inner = self.expect(Token::RBracket)?;
            dims.push(ArrayDim { before, inner });
        }
        if !dims.is_empty() {
            tree = TypeTree::Array { element: Box::new(tree), dims, ty: None };
        }
        Ok(tree)
    }

    /// Speculatively checks for `Type name` followed by `=`, `;`, `,` or `:`.
    fn is_local_variable_ahead(&mut self) -> bool {
        match self.peek_kind() {
            Some(tok) if tok.is_modifier() => return true,
            Some(Token::At) => return true,
            Some(Token::Ident) => {}
            _ => return false,
        }
        let saved = (self.pos, self.cursor);
        let is_decl = self.parse_type().is_ok()
            && self.at(Token::Ident)
            && matches!(
                self.peek_nth(1),
                Some(Token::Eq) | Some(Token::Semi) | Some(Token::Comma) | Some(Token::Colon)
            );
        (self.pos, self.cursor) = saved;
        is_decl
    }

    // ── Statements ───────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Block, RewriteError> {
        let prefix = self.expect(Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected_eof(&Token::RBrace));
            }
            statements.push(self.parse_statement()?);
        }
        let end = self.expect(Token::RBrace)?;
        Ok(Block { prefix, statements, end })
    }

    /// A statement together with the trivia before its `;`, if it takes one.
    fn parse_statement(&mut self) -> Result<RightPadded<Statement>, RewriteError> {
        let stmt = self.parse_statement_inner()?;
        let after = if stmt.needs_semicolon() { self.expect(Token::Semi)? } else { Space::EMPTY };
        Ok(RightPadded { element: stmt, after })
    }

    fn parse_boxed_statement(&mut self) -> Result<RightPadded<Box<Statement>>, RewriteError> {
        Ok(self.parse_statement()?.map(Box::new))
    }

    fn parse_statement_inner(&mut self) -> Result<Statement, RewriteError> {
        match self.peek_kind() {
            Some(Token::LBrace) => Ok(Statement::Block(self.parse_block()?)),
            Some(Token::Semi) => Ok(Statement::Empty { prefix: self.take_space() }),
            Some(Token::Return) => {
                let prefix = self.expect(Token::Return)?;
                let expr = if self.at(Token::Semi) { None } else { Some(self.parse_expr()?) };
                Ok(Statement::Return { prefix, expr })
            }
            Some(Token::Throw) => {
                let prefix = self.expect(Token::Throw)?;
                let exception = self.parse_expr()?;
                Ok(Statement::Throw { prefix, exception })
            }
            Some(Token::If) => {
                let prefix = self.expect(Token::If)?;
                let condition = self.parse_control_parens()?;
                let then_part = self.parse_boxed_statement()?;
                let else_part = match self.eat(Token::Else) {
                    Some(prefix) => Some(Else { prefix, body: self.parse_boxed_statement()? }),
                    None => None,
                };
                Ok(Statement::If { prefix, condition, then_part, else_part })
            }
            Some(Token::While) => {
                let prefix = self.expect(Token::While)?;
                let condition = self.parse_control_parens()?;
                let body = self.parse_boxed_statement()?;
                Ok(Statement::While { prefix, condition, body })
            }
            Some(Token::For) => self.parse_for_each(),
            Some(Token::Try) => Ok(Statement::Try(Box::new(self.parse_try()?))),
            Some(Token::Class) | Some(Token::Interface) => {
                Err(self.error_here("local class declarations are not supported"))
            }
            Some(_) if self.is_local_variable_ahead() => {
                Ok(Statement::VariableDeclarations(self.parse_local_variables()?))
            }
            Some(_) => Ok(Statement::Expression(self.parse_expr()?)),
            None => Err(self.unexpected_eof(&"statement")),
        }
    }

    fn parse_control_parens(&mut self) -> Result<ControlParens<Expression>, RewriteError> {
        let prefix = self.expect(Token::LParen)?;
        let expr = self.parse_expr()?;
        let after = self.expect(Token::RParen)?;
        Ok(ControlParens { prefix, tree: RightPadded { element: expr, after } })
    }

    fn parse_for_each(&mut self) -> Result<Statement, RewriteError> {
        let prefix = self.expect(Token::For)?;
        let paren_prefix = self.expect(Token::LParen)?;
        if !self.is_local_variable_ahead() {
            return Err(self.error_here("only enhanced for loops are supported"));
        }
        let modifiers = self.parse_modifiers()?;
        let type_expr = self.parse_type()?;
        let name = self.expect_ident()?;
        if !self.at(Token::Colon) {
            return Err(self.error_here("only enhanced for loops are supported"));
        }
        let variable = VariableDeclarations {
            modifiers,
            type_expr,
            variables: vec![RightPadded::new(NamedVariable { name, initializer: None })],
        };
        let colon = self.expect(Token::Colon)?;
        let iterable = self.parse_expr()?;
        let close = self.expect(Token::RParen)?;
        let body = self.parse_boxed_statement()?;
        Ok(Statement::ForEach {
            prefix,
            control: ForEachControl {
                prefix: paren_prefix,
                variable: RightPadded { element: variable, after: colon },
                iterable: RightPadded { element: iterable, after: close },
            },
            body,
        })
    }

    fn parse_try(&mut self) -> Result<Try, RewriteError> {
        let try_span = self.peek().map(|t| t.span);
        let prefix = self.expect(Token::Try)?;

        let resources = if self.at(Token::LParen) {
            let before = self.expect(Token::LParen)?;
            let mut elements = Vec::new();
            let mut trailing_semicolon = false;
            let mut end = Space::EMPTY;
            loop {
                let resource = self.parse_resource()?;
                match self.eat(Token::Semi) {
                    Some(after) => {
                        elements.push(RightPadded { element: resource, after });
                        if self.at(Token::RParen) {
                            trailing_semicolon = true;
                            end = self.expect(Token::RParen)?;
                            break;
                        }
                    }
                    None => {
                        let after = self.expect(Token::RParen)?;
                        elements.push(RightPadded { element: resource, after });
                        break;
                    }
                }
            }
            Some(Resources { before, elements, trailing_semicolon, end })
        } else {
            None
        };

        let body = self.parse_block()?;

        let mut catches = Vec::new();
        while self.at(Token::Catch) {
            catches.push(self.parse_catch()?);
        }
        let finally = match self.eat(Token::Finally) {
            Some(before) => Some(LeftPadded::new(before, self.parse_block()?)),
            None => None,
        };

        if catches.is_empty() && finally.is_none() && resources.is_none() {
            return Err(RewriteError::syntax(
                "try without catch, finally or resources",
                try_span.unwrap_or_else(|| self.eof_span()),
            ));
        }
        Ok(Try { id: Uuid::new_v4(), prefix, resources, body, catches, finally })
    }

    fn parse_resource(&mut self) -> Result<Resource, RewriteError> {
        let kind = if self.is_local_variable_ahead() {
            ResourceKind::Declaration(self.parse_local_variables()?)
        } else {
            ResourceKind::Expression(self.parse_expr()?)
        };
        Ok(Resource { kind, close_method: None })
    }

    fn parse_catch(&mut self) -> Result<Catch, RewriteError> {
        let prefix = self.expect(Token::Catch)?;
        let paren_prefix = self.expect(Token::LParen)?;
        let modifiers = self.parse_modifiers()?;

        let first = self.parse_type()?;
        let type_expr = if self.at(Token::Pipe) {
            let mut alternatives = Vec::new();
            let mut current = first;
            while let Some(after) = self.eat(Token::Pipe) {
                alternatives.push(RightPadded { element: current, after });
                current = self.parse_type()?;
            }
            alternatives.push(RightPadded::new(current));
            TypeTree::MultiCatch { id: Uuid::new_v4(), alternatives, ty: None }
        } else {
            first
        };

        let name = self.expect_ident()?;
        let close = self.expect(Token::RParen)?;
        let parameter = VariableDeclarations {
            modifiers,
            type_expr,
            variables: vec![RightPadded::new(NamedVariable { name, initializer: None })],
        };
        let body = self.parse_block()?;
        Ok(Catch {
            id: Uuid::new_v4(),
            prefix,
            parameter: ControlParens { prefix: paren_prefix, tree: RightPadded { element: parameter, after: close } },
            body,
        })
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    pub fn parse_expr(&mut self) -> Result<Expression, RewriteError> {
        let lhs = self.parse_ternary()?;
        let op = match self.peek_kind() {
            Some(Token::Eq) => AssignOp::Assign,
            Some(Token::PlusEq) => AssignOp::AddAssign,
            Some(Token::MinusEq) => AssignOp::SubAssign,
            _ => return Ok(lhs),
        };
        let Some((before, _, _)) = self.advance() else { return Ok(lhs) };
        let value = self.parse_expr()?;
        Ok(Expression::Assignment {
            variable: Box::new(lhs),
            op: LeftPadded::new(before, op),
            value: Box::new(value),
            ty: None,
        })
    }

    fn parse_ternary(&mut self) -> Result<Expression, RewriteError> {
        let condition = self.parse_binary(0)?;
        let Some(question) = self.eat(Token::Question) else { return Ok(condition) };
        let true_part = self.parse_expr()?;
        let colon = self.expect(Token::Colon)?;
        let false_part = self.parse_ternary()?;
        Ok(Expression::Ternary {
            condition: Box::new(condition),
            true_part: LeftPadded::new(question, Box::new(true_part)),
            false_part: LeftPadded::new(colon, Box::new(false_part)),
            ty: None,
        })
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expression, RewriteError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some(op) = self.peek_kind().and_then(binary_op) else { break };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            let Some((before, _, _)) = self.advance() else { break };
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expression::Binary {
                left: Box::new(lhs),
                op: LeftPadded::new(before, op),
                right: Box::new(rhs),
                ty: None,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expression, RewriteError> {
        let op = match self.peek_kind() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::PlusPlus) => UnaryOp::PreIncrement,
            Some(Token::MinusMinus) => UnaryOp::PreDecrement,
            _ => return self.parse_postfix(),
        };
        let Some((op_prefix, _, _)) = self.advance() else { return self.parse_postfix() };
        let expr = self.parse_unary()?;
        Ok(Expression::Unary { op, op_prefix, expr: Box::new(expr), ty: None })
    }

    fn parse_postfix(&mut self) -> Result<Expression, RewriteError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                Some(Token::Dot) => {
                    let before = self.expect(Token::Dot)?;
                    let name = if self.at(Token::Class) {
                        let prefix = self.expect(Token::Class)?;
                        Ident::new(prefix, "class")
                    } else {
                        self.expect_ident()?
                    };
                    if self.at(Token::LParen) {
                        let args = self.parse_container(Token::LParen, Token::RParen, Self::parse_expr)?;
                        expr = Expression::MethodInvocation {
                            select: Some(RightPadded { element: Box::new(expr), after: before }),
                            name,
                            args,
                            method_type: None,
                        };
                    } else {
                        expr = Expression::FieldAccess {
                            target: Box::new(expr),
                            name: LeftPadded::new(before, name),
                            ty: None,
                        };
                    }
                }
                Some(Token::PlusPlus) | Some(Token::MinusMinus) => {
                    let Some((op_prefix, tok, _)) = self.advance() else { break };
                    let op = if tok == Token::PlusPlus { UnaryOp::PostIncrement } else { UnaryOp::PostDecrement };
                    expr = Expression::Unary { op, op_prefix, expr: Box::new(expr), ty: None };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, RewriteError> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected_eof(&"expression"));
        };
        let (kind, span) = (tok.node, tok.span);
        match kind {
            Token::Ident | Token::Super => {
                let (prefix, _, _) = self.advance().ok_or_else(|| self.unexpected_eof(&"identifier"))?;
                let name = Ident::new(prefix, self.text(span));
                if self.at(Token::LParen) {
                    let args = self.parse_container(Token::LParen, Token::RParen, Self::parse_expr)?;
                    Ok(Expression::MethodInvocation { select: None, name, args, method_type: None })
                } else {
                    Ok(Expression::Ident(name))
                }
            }
            Token::IntLit | Token::FloatLit | Token::StringLit | Token::CharLit | Token::True
            | Token::False | Token::Null => {
                let (prefix, _, _) = self.advance().ok_or_else(|| self.unexpected_eof(&"literal"))?;
                let source = self.text(span).to_string();
                let kind = literal_kind(kind, &source);
                Ok(Expression::Literal { prefix, source, kind, ty: None })
            }
            Token::LParen => {
                let prefix = self.expect(Token::LParen)?;
                let inner = self.parse_expr()?;
                let after = self.expect(Token::RParen)?;
                Ok(Expression::Parens { prefix, inner: RightPadded { element: Box::new(inner), after }, ty: None })
            }
            Token::New => {
                let prefix = self.expect(Token::New)?;
                let clazz = self.parse_type()?;
                let args = self.parse_container(Token::LParen, Token::RParen, Self::parse_expr)?;
                if self.at(Token::LBrace) {
                    return Err(self.error_here("anonymous classes are not supported"));
                }
                Ok(Expression::NewClass { prefix, clazz, args, method_type: None, ty: None })
            }
            other => Err(RewriteError::syntax(format!("expected expression, found {other}"), span)),
        }
    }
}

fn modifier_kind(tok: Token) -> ModifierKind {
    match tok {
        Token::Public => ModifierKind::Public,
        Token::Protected => ModifierKind::Protected,
        Token::Private => ModifierKind::Private,
        Token::Static => ModifierKind::Static,
        Token::Final => ModifierKind::Final,
        Token::Abstract => ModifierKind::Abstract,
        Token::Native => ModifierKind::Native,
        Token::Synchronized => ModifierKind::Synchronized,
        Token::Transient => ModifierKind::Transient,
        Token::Volatile => ModifierKind::Volatile,
        _ => ModifierKind::Default,
    }
}

fn literal_kind(tok: Token, source: &str) -> LiteralKind {
    match tok {
        Token::IntLit if source.ends_with(['l', 'L']) => LiteralKind::Long,
        Token::IntLit => LiteralKind::Int,
        Token::FloatLit if source.ends_with(['f', 'F']) => LiteralKind::Float,
        Token::FloatLit => LiteralKind::Double,
        Token::StringLit => LiteralKind::String,
        Token::CharLit => LiteralKind::Char,
        Token::Null => LiteralKind::Null,
        _ => LiteralKind::Boolean,
    }
}

fn binary_op(tok: Token) -> Option<BinaryOp> {
    Some(match tok {
        Token::PipePipe => BinaryOp::Or,
        Token::AmpAmp => BinaryOp::And,
        Token::EqEq => BinaryOp::Eq,
        Token::BangEq => BinaryOp::Neq,
        Token::Lt => BinaryOp::Lt,
        Token::Gt => BinaryOp::Gt,
        Token::LtEq => BinaryOp::LtEq,
        Token::GtEq => BinaryOp::GtEq,
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Mod,
        _ => return None,
    })
}

fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (1, 2),
        BinaryOp::And => (3, 4),
        BinaryOp::Eq | BinaryOp::Neq => (5, 6),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => (7, 8),
        BinaryOp::Add | BinaryOp::Sub => (9, 10),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (11, 12),
    }
}
