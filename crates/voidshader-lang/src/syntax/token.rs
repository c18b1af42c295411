use crate::syntax::ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(String),
    StringLit(String),
    /// GLSL type name: `float`, `vec3`, `mat4`, `sampler2D`, …
    Type(String),

    // Keywords
    ShaderType,
    RenderMode,
    Uniform,
    Varying,
    In,
    Out,
    InOut,
    Const,
    If,
    Else,
    For,
    While,
    Do,
    Return,
    Break,
    Continue,
    Discard,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    PlusPlus,   // ++
    MinusMinus, // --
    Eq,         // =
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    LtLt,       // <<
    GtGt,       // >>
    AmpAmp,     // &&
    PipePipe,   // ||
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    Bang,       // !
    Question,   // ?

    // Punctuation
    Colon,      // :
    Comma,      // ,
    Semicolon,  // ;
    Dot,        // .
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Hash,       // #

    Eof,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Bool(_) | Self::StringLit(_))
    }

    /// Keywords that open a top-level declaration.
    pub fn is_decl_keyword(&self) -> bool {
        matches!(self, Self::ShaderType | Self::RenderMode | Self::Uniform | Self::Varying)
    }

    pub fn is_control_keyword(&self) -> bool {
        matches!(
            self,
            Self::If | Self::Else | Self::For | Self::While | Self::Do
            | Self::Return | Self::Break | Self::Continue | Self::Discard
        )
    }

    pub fn is_assign_op(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::PlusEq | Self::MinusEq | Self::StarEq | Self::SlashEq
            | Self::PercentEq | Self::AmpEq | Self::PipeEq | Self::CaretEq
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}

/// Maps an identifier string to its keyword or type token, or returns `Ident`.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "shader_type" => TokenKind::ShaderType,
        "render_mode" => TokenKind::RenderMode,
        "uniform"     => TokenKind::Uniform,
        "varying"     => TokenKind::Varying,
        "in"          => TokenKind::In,
        "out"         => TokenKind::Out,
        "inout"       => TokenKind::InOut,
        "const"       => TokenKind::Const,
        "if"          => TokenKind::If,
        "else"        => TokenKind::Else,
        "for"         => TokenKind::For,
        "while"       => TokenKind::While,
        "do"          => TokenKind::Do,
        "return"      => TokenKind::Return,
        "break"       => TokenKind::Break,
        "continue"    => TokenKind::Continue,
        "discard"     => TokenKind::Discard,
        "true"        => TokenKind::Bool(true),
        "false"       => TokenKind::Bool(false),
        _ if is_type_name(&s) => TokenKind::Type(s),
        _             => TokenKind::Ident(s),
    }
}

/// The GLSL type names the lexer classifies as `Type` tokens.
pub fn is_type_name(s: &str) -> bool {
    matches!(
        s,
        "void" | "bool" | "int" | "uint" | "float"
        | "vec2" | "vec3" | "vec4"
        | "ivec2" | "ivec3" | "ivec4"
        | "uvec2" | "uvec3" | "uvec4"
        | "bvec2" | "bvec3" | "bvec4"
        | "mat2" | "mat3" | "mat4"
        | "sampler2D" | "sampler2DArray" | "sampler3D" | "samplerCube"
    )
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Range of the lexeme in the source.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn column(&self) -> usize {
        self.span.start.column
    }
}
