//! # VoidShader Language front end
//!
//! VoidShader (VSL) is a GLSL-like shading DSL. This crate is its front end:
//! it turns shader source text into a structured [`ShaderAst`] plus a list of
//! located diagnostics, and nothing more. Code generation, uniform binding,
//! and the editor that renders uniform hints as property widgets all live
//! downstream and only consume what this crate produces.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → ShaderAst + Vec<Error>
//!     ↓
//! (external) codegen / editor
//! ```
//!
//! Parsing is best-effort: each top-level declaration is its own recovery
//! unit, so one malformed declaration is reported and skipped while its
//! siblings still land in the AST. [`parse`] never fails outright; callers
//! decide whether a non-empty error list blocks downstream compilation.
//!
//! The parser is purely syntactic. It happily builds trees that a semantic
//! pass would reject (unknown identifiers, type mismatches); those checks
//! are not its job.

pub mod error;
pub mod syntax;

pub use error::{Error, ErrorCode};
pub use syntax::ast::{
    HintKind, ShaderAst, ShaderKind, Span, UniformDecl, UniformHint, VaryingDecl,
};
pub use syntax::token::{Token, TokenKind};

use syntax::lexer::Lexer;
use syntax::parser::Parser;

/// Best-effort front-end output: the AST built from everything that parsed,
/// plus every diagnostic collected along the way.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub ast: ShaderAst,
    pub errors: Vec<Error>,
}

impl ParseOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize and parse shader source.
///
/// Lexical errors abort before parsing and come back with an empty AST;
/// syntactic errors come back alongside whatever parsed cleanly.
pub fn parse(source: &str) -> ParseOutput {
    let tokens = match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(errors) => return ParseOutput { ast: ShaderAst::default(), errors },
    };
    let mut parser = Parser::new(tokens);
    let ast = parser.parse();
    ParseOutput { ast, errors: parser.take_errors() }
}
