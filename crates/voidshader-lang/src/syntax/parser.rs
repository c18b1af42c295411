use crate::error::{Error, ErrorCode};
use crate::syntax::ast::*;
use crate::syntax::token::{Token, TokenKind};

/// Recursive-descent parser over a lexed token stream.
///
/// Each top-level declaration parses inside its own catch point: a failed
/// declaration records a diagnostic, skips to the next safe boundary via
/// `synchronize`, and parsing continues. One bad declaration never suppresses
/// its siblings, and all diagnostics from a pass are collected.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<Error>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    /// Parse the whole token stream into a best-effort AST. Resets cursor and
    /// diagnostics first, so a parser instance can be reused sequentially.
    pub fn parse(&mut self) -> ShaderAst {
        self.pos = 0;
        self.errors.clear();

        let mut ast = ShaderAst::default();
        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.parse_declaration() {
                Ok(Some(decl)) => ast.add(decl),
                // token opens no known declaration: tolerated, not an error
                Ok(None) => {}
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }

            // guarantee progress: if nothing was consumed, force-advance
            // to prevent an infinite loop on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }
        ast
    }

    /// Diagnostics collected by the most recent `parse` call.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    // ─── Declarations ────────────────────────────────────────────────────────

    fn parse_declaration(&mut self) -> Result<Option<Decl>, Error> {
        match self.peek_kind() {
            TokenKind::Hash       => self.parse_include().map(Some),
            TokenKind::ShaderType => self.parse_shader_type().map(Some),
            TokenKind::RenderMode => self.parse_render_mode().map(Some),
            TokenKind::Uniform    => self.parse_uniform().map(Some),
            TokenKind::Varying    => self.parse_varying().map(Some),
            _ if self.is_function_start() => self.parse_function().map(Some),
            _ => Ok(None),
        }
    }

    /// `#include "snippets/common.vsl"`
    fn parse_include(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        self.expect(TokenKind::Hash)?;
        let tok = self.advance();
        let (line, column) = (tok.line(), tok.column());
        let directive = match tok.kind {
            TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected directive name after `#`")),
        };
        if directive != "include" {
            return Err(Error::new(ErrorCode::P005, line, column,
                format!("unknown directive `#{directive}`")));
        }
        let path = self.expect_string()?;
        Ok(Decl::Include(IncludeDirective { path, span: self.span_from(start) }))
    }

    /// `shader_type spatial;`. The name must be a known shader kind.
    fn parse_shader_type(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        self.expect(TokenKind::ShaderType)?;
        let tok = self.advance();
        let (line, column) = (tok.line(), tok.column());
        let name = match tok.kind {
            TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected shader type name")),
        };
        let kind = match ShaderKind::from_name(&name) {
            Some(kind) => kind,
            None => return Err(Error::new(ErrorCode::P003, line, column,
                format!("unknown shader type `{name}`"))),
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Decl::ShaderType(ShaderTypeDecl { kind, span: self.span_from(start) }))
    }

    /// `render_mode blend_mix, unshaded;`
    fn parse_render_mode(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        self.expect(TokenKind::RenderMode)?;
        let mut modes = vec![self.expect_ident()?];
        while self.matches(TokenKind::Comma) {
            modes.push(self.expect_ident()?);
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(Decl::RenderMode(RenderModeDecl { modes, span: self.span_from(start) }))
    }

    /// `uniform float amount : hint_range(0.0, 1.0) = 0.5;`
    fn parse_uniform(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        self.expect(TokenKind::Uniform)?;
        let uniform_type = self.expect_type()?;
        let name = self.expect_ident()?;
        let hint = if self.matches(TokenKind::Colon) {
            Some(self.parse_hint()?)
        } else {
            None
        };
        let default = if self.matches(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Uniform(UniformDecl { uniform_type, name, hint, default, span: self.span_from(start) }))
    }

    /// Hint name validated against the fixed vocabulary, then an optional
    /// parenthesized list of numeric arguments.
    fn parse_hint(&mut self) -> Result<UniformHint, Error> {
        let tok = self.advance();
        let (line, column) = (tok.line(), tok.column());
        let name = match tok.kind {
            TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected uniform hint")),
        };
        let kind = match HintKind::from_name(&name) {
            Some(kind) => kind,
            None => return Err(Error::new(ErrorCode::P004, line, column,
                format!("unknown uniform hint `{name}`"))),
        };
        let mut params = Vec::new();
        if self.matches(TokenKind::LParen) {
            while !self.check(TokenKind::RParen) && !self.is_at_end() {
                params.push(self.parse_hint_param()?);
                if !self.matches(TokenKind::Comma) { break; }
            }
            self.expect(TokenKind::RParen)?;
        }
        Ok(UniformHint { kind, params })
    }

    /// Numeric literal with optional unary minus. Hint arguments never nest.
    fn parse_hint_param(&mut self) -> Result<f64, Error> {
        let negative = self.matches(TokenKind::Minus);
        let tok = self.advance();
        let value = match tok.kind {
            TokenKind::Int(v)   => v as f64,
            TokenKind::Float(v) => v,
            _ => return Err(self.error_at(&tok, "expected numeric hint argument")),
        };
        Ok(if negative { -value } else { value })
    }

    /// `varying vec2 world_pos;`
    fn parse_varying(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        self.expect(TokenKind::Varying)?;
        let varying_type = self.expect_type()?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Varying(VaryingDecl { varying_type, name, span: self.span_from(start) }))
    }

    /// Returns true when the cursor starts a function definition:
    /// `(Type | Ident) Ident (`. This is a heuristic: a global initialized
    /// with a call-like expression can be misread as a function, and that
    /// tradeoff is accepted.
    fn is_function_start(&self) -> bool {
        if !matches!(self.tokens[self.pos].kind, TokenKind::Type(_) | TokenKind::Ident(_)) {
            return false;
        }
        self.pos + 2 < self.tokens.len()
            && matches!(self.tokens[self.pos + 1].kind, TokenKind::Ident(_))
            && self.tokens[self.pos + 2].kind == TokenKind::LParen
    }

    /// `vec4 blend(vec4 a, vec4 b) { ... }`
    fn parse_function(&mut self) -> Result<Decl, Error> {
        let start = self.start();
        let tok = self.advance();
        let return_type = match tok.kind {
            TokenKind::Type(s) | TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected return type")),
        };
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Decl::Function(FnDecl { name, return_type, params, body, span: self.span_from(start) }))
    }

    /// Zero or more comma-separated `[in|out|inout] TYPE name` entries.
    fn parse_param_list(&mut self) -> Result<Vec<Param>, Error> {
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            let qualifier = match self.peek_kind() {
                TokenKind::In    => { self.advance(); Some(ParamQualifier::In) }
                TokenKind::Out   => { self.advance(); Some(ParamQualifier::Out) }
                TokenKind::InOut => { self.advance(); Some(ParamQualifier::InOut) }
                _ => None,
            };
            let param_type = self.expect_type()?;
            let name = self.expect_ident()?;
            params.push(Param { param_type, name, qualifier });
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(params)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Error> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        match self.peek_kind() {
            TokenKind::LBrace => {
                let start = self.start();
                let stmts = self.parse_block()?;
                Ok(Stmt::Block(stmts, self.span_from(start)))
            }
            TokenKind::If     => self.parse_if(),
            TokenKind::For    => self.parse_for(),
            TokenKind::While  => self.parse_while(),
            TokenKind::Do     => self.parse_do_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let start = self.start();
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Break(self.span_from(start)))
            }
            TokenKind::Continue => {
                let start = self.start();
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Continue(self.span_from(start)))
            }
            TokenKind::Discard => {
                let start = self.start();
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Discard(self.span_from(start)))
            }

            TokenKind::Const => self.parse_var_decl(),
            // `vec3 v …` declares; `vec3(…)` is a constructor expression
            TokenKind::Type(_) if self.next_is_ident() => self.parse_var_decl(),

            _ => self.parse_expr_stmt(),
        }
    }

    /// `[const] TYPE name [= expr];`
    fn parse_var_decl(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        let is_const = self.matches(TokenKind::Const);
        let var_type = self.expect_type()?;
        let name = self.expect_ident()?;
        let init = if self.matches(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl(VarDecl { var_type, name, init, is_const, span: self.span_from(start) }))
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, Error> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Expr(expr))
    }

    /// `if (cond) stmt [else stmt]`. The else binds to the nearest `if`.
    fn parse_if(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch, span: self.span_from(start) }))
    }

    /// `for (init; cond; update) stmt`. All three slots are optional; a
    /// declaration or expression-statement init consumes its own `;`.
    fn parse_for(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = if self.matches(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Const) || (self.peek_kind().is_type() && self.next_is_ident()) {
            Some(Box::new(self.parse_var_decl()?))
        } else {
            Some(Box::new(self.parse_expr_stmt()?))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For(ForStmt { init, condition, update, body, span: self.span_from(start) }))
    }

    fn parse_while(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While(WhileStmt { condition, body, span: self.span_from(start) }))
    }

    fn parse_do_while(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        self.expect(TokenKind::Do)?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile(DoWhileStmt { body, condition, span: self.span_from(start) }))
    }

    fn parse_return(&mut self) -> Result<Stmt, Error> {
        let start = self.start();
        self.expect(TokenKind::Return)?;
        let argument = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(argument, self.span_from(start)))
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.parse_assignment()
    }

    /// Right-associative: `a = b = c` nests rightward.
    fn parse_assignment(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_ternary()?;
        let op = match self.peek_kind() {
            TokenKind::Eq        => AssignOp::Assign,
            TokenKind::PlusEq    => AssignOp::Add,
            TokenKind::MinusEq   => AssignOp::Sub,
            TokenKind::StarEq    => AssignOp::Mul,
            TokenKind::SlashEq   => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::AmpEq     => AssignOp::BitAnd,
            TokenKind::PipeEq    => AssignOp::BitOr,
            TokenKind::CaretEq   => AssignOp::BitXor,
            _ => return Ok(expr),
        };
        self.advance();
        let value = self.parse_assignment()?;
        let span = expr.span().to(value.span());
        Ok(Expr::Assign { op, target: Box::new(expr), value: Box::new(value), span })
    }

    fn parse_ternary(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_or()?;
        if self.matches(TokenKind::Question) {
            let then_expr = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let else_expr = self.parse_ternary()?;
            let span = expr.span().to(else_expr.span());
            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_and()?;
        while self.matches(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op: BinOp::Or, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_bit_or()?;
        while self.matches(TokenKind::AmpAmp) {
            let right = self.parse_bit_or()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op: BinOp::And, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_bit_xor()?;
        while self.matches(TokenKind::Pipe) {
            let right = self.parse_bit_xor()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op: BinOp::BitOr, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_bit_and()?;
        while self.matches(TokenKind::Caret) {
            let right = self.parse_bit_and()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op: BinOp::BitXor, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_equality()?;
        while self.matches(TokenKind::Amp) {
            let right = self.parse_equality()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op: BinOp::BitAnd, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq   => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_shift()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt   => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt   => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_shift()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::LtLt => BinOp::Shl,
                TokenKind::GtGt => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus  => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star    => BinOp::Mul,
                TokenKind::Slash   => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span().to(right.span());
            left = Expr::BinOp { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let op = match self.peek_kind() {
            TokenKind::Minus      => Some(UnOp::Neg),
            TokenKind::Plus       => Some(UnOp::Plus),
            TokenKind::Bang       => Some(UnOp::Not),
            TokenKind::Tilde      => Some(UnOp::BitNot),
            TokenKind::PlusPlus   => Some(UnOp::Inc),
            TokenKind::MinusMinus => Some(UnOp::Dec),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.start();
            self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::UnOp { op, operand: Box::new(operand), prefix: true, span });
        }
        self.parse_postfix()
    }

    /// Trailing `++`/`--`, member access, indexing, and calls, all
    /// left-associative and chainable in one loop.
    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_ident()?;
                    let span = expr.span().to(self.previous().span);
                    expr = Expr::Member { object: Box::new(expr), property, span };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    let span = expr.span().to(self.previous().span);
                    expr = Expr::Index { object: Box::new(expr), index: Box::new(index), span };
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_arg_list()?;
                    self.expect(TokenKind::RParen)?;
                    let span = expr.span().to(self.previous().span);
                    expr = Expr::Call { callee: Box::new(expr), args, span };
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    let span = expr.span().to(self.previous().span);
                    expr = Expr::UnOp { op: UnOp::Inc, operand: Box::new(expr), prefix: false, span };
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    let span = expr.span().to(self.previous().span);
                    expr = Expr::UnOp { op: UnOp::Dec, operand: Box::new(expr), prefix: false, span };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Expr>, Error> {
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            args.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let tok = self.advance();
        let span = tok.span;

        match tok.kind {
            TokenKind::Int(v)   => Ok(Expr::Int(v, span)),
            TokenKind::Float(v) => Ok(Expr::Float(v, span)),
            TokenKind::Bool(v)  => Ok(Expr::Bool(v, span)),
            TokenKind::Ident(name) => Ok(Expr::Ident(name, span)),

            // `vec*` constructors become vector literals; any other type
            // name called like a function is an ordinary call
            TokenKind::Type(name) => {
                self.expect(TokenKind::LParen)?;
                let args = self.parse_arg_list()?;
                self.expect(TokenKind::RParen)?;
                let full = span.to(self.previous().span);
                if name.starts_with("vec") {
                    Ok(Expr::VectorLiteral { vector_type: name, components: args, span: full })
                } else {
                    Ok(Expr::Call {
                        callee: Box::new(Expr::Ident(name, span)),
                        args,
                        span: full,
                    })
                }
            }

            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            _ => Err(self.error_at(&tok, "expected expression")),
        }
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn next_is_ident(&self) -> bool {
        self.pos + 1 < self.tokens.len()
            && matches!(self.tokens[self.pos + 1].kind, TokenKind::Ident(_))
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line(),
                tok.column(),
                format!("expected {:?}, found {:?}", kind, tok.kind),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            _ => Err(self.error_at(&tok, "expected identifier")),
        }
    }

    fn expect_type(&mut self) -> Result<String, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Type(s) => Ok(s),
            _ => Err(self.error_at(&tok, "expected type name")),
        }
    }

    fn expect_string(&mut self) -> Result<String, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::StringLit(s) => Ok(s),
            _ => Err(self.error_at(&tok, "expected string literal")),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn start(&self) -> Position {
        self.peek().span.start
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous().span.end)
    }

    fn error_at(&self, tok: &Token, msg: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line(), tok.column(), msg)
    }

    /// Skip tokens until a declaration boundary: just past a `;` or `}`, or
    /// right before a keyword or type name that can open a fresh declaration
    /// or statement.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if matches!(self.previous().kind, TokenKind::Semicolon | TokenKind::RBrace) {
                return;
            }
            let kind = self.peek_kind();
            if kind.is_decl_keyword() || kind.is_control_keyword() || kind.is_type() {
                return;
            }
            self.advance();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
