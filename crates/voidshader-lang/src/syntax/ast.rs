use serde::Serialize;

/// A single point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// Source range attached to every node for error reporting and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering both spans.
    pub fn to(self, end: Span) -> Span {
        Span { start: self.start, end: end.end }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// The kind of pipeline a shader targets. `shader_type` declarations pick one;
/// the last declaration in the file wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderKind {
    #[default]
    CanvasItem,
    Spatial,
    Particles,
}

impl ShaderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "canvas_item" => Some(Self::CanvasItem),
            "spatial"     => Some(Self::Spatial),
            "particles"   => Some(Self::Particles),
            _             => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanvasItem => "canvas_item",
            Self::Spatial    => "spatial",
            Self::Particles  => "particles",
        }
    }
}

/// The parse result. Declaration buckets are append-only and preserve source
/// order; downstream codegen relies on that ordering for uniform layout and
/// the editor relies on it for property ordering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShaderAst {
    pub shader_type: ShaderKind,
    pub render_modes: Vec<String>,
    pub uniforms: Vec<UniformDecl>,
    pub varyings: Vec<VaryingDecl>,
    pub includes: Vec<IncludeDirective>,
    pub functions: Vec<FnDecl>,
}

impl ShaderAst {
    /// Folds one parsed declaration into the aggregate. This is the only
    /// place the AST is mutated.
    pub fn add(&mut self, decl: Decl) {
        match decl {
            Decl::ShaderType(d) => self.shader_type = d.kind,
            Decl::RenderMode(d) => self.render_modes.extend(d.modes),
            Decl::Uniform(d)    => self.uniforms.push(d),
            Decl::Varying(d)    => self.varyings.push(d),
            Decl::Include(d)    => self.includes.push(d),
            Decl::Function(d)   => self.functions.push(d),
        }
    }
}

// ─── Declarations ────────────────────────────────────────────────────────────

/// One successfully parsed top-level declaration.
#[derive(Debug, Clone, Serialize)]
pub enum Decl {
    ShaderType(ShaderTypeDecl),
    RenderMode(RenderModeDecl),
    Uniform(UniformDecl),
    Varying(VaryingDecl),
    Include(IncludeDirective),
    Function(FnDecl),
}

/// `shader_type spatial;`
#[derive(Debug, Clone, Serialize)]
pub struct ShaderTypeDecl {
    pub kind: ShaderKind,
    pub span: Span,
}

/// `render_mode blend_mix, unshaded;`; modes accumulate across statements.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModeDecl {
    pub modes: Vec<String>,
    pub span: Span,
}

/// `uniform float amount : hint_range(0.0, 1.0) = 0.5;`
#[derive(Debug, Clone, Serialize)]
pub struct UniformDecl {
    pub uniform_type: String,
    pub name: String,
    pub hint: Option<UniformHint>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// Editor metadata on a uniform. Purely presentational; the hint name picks
/// the property widget, the params parameterize it (e.g. range bounds).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniformHint {
    pub kind: HintKind,
    pub params: Vec<f64>,
}

/// The fixed hint vocabulary. Unknown hint names are a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HintKind {
    #[serde(rename = "hint_range")]
    Range,
    #[serde(rename = "hint_color")]
    Color,
    #[serde(rename = "hint_enum")]
    Enum,
    #[serde(rename = "hint_albedo")]
    Albedo,
    #[serde(rename = "hint_normal")]
    Normal,
    #[serde(rename = "hint_default_white")]
    DefaultWhite,
    #[serde(rename = "hint_default_black")]
    DefaultBlack,
}

impl HintKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hint_range"         => Some(Self::Range),
            "hint_color"         => Some(Self::Color),
            "hint_enum"          => Some(Self::Enum),
            "hint_albedo"        => Some(Self::Albedo),
            "hint_normal"        => Some(Self::Normal),
            "hint_default_white" => Some(Self::DefaultWhite),
            "hint_default_black" => Some(Self::DefaultBlack),
            _                    => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Range        => "hint_range",
            Self::Color        => "hint_color",
            Self::Enum         => "hint_enum",
            Self::Albedo       => "hint_albedo",
            Self::Normal       => "hint_normal",
            Self::DefaultWhite => "hint_default_white",
            Self::DefaultBlack => "hint_default_black",
        }
    }
}

/// `varying vec2 world_pos;`
#[derive(Debug, Clone, Serialize)]
pub struct VaryingDecl {
    pub varying_type: String,
    pub name: String,
    pub span: Span,
}

/// `#include "common.vsl"`
#[derive(Debug, Clone, Serialize)]
pub struct IncludeDirective {
    pub path: String,
    pub span: Span,
}

// ─── Functions ───────────────────────────────────────────────────────────────

/// `vec4 blend(vec4 a, vec4 b) { ... }`
#[derive(Debug, Clone, Serialize)]
pub struct FnDecl {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub param_type: String,
    pub name: String,
    pub qualifier: Option<ParamQualifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamQualifier {
    In,
    Out,
    InOut,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    /// `{ ... }`
    Block(Vec<Stmt>, Span),
    /// `[const] float x = 1.0;`
    VarDecl(VarDecl),
    /// A standalone expression used as a statement (e.g. a call or assignment).
    Expr(Expr),
    /// `if (cond) stmt [else stmt]`
    If(IfStmt),
    /// `for (init; cond; update) stmt`
    For(ForStmt),
    /// `while (cond) stmt`
    While(WhileStmt),
    /// `do stmt while (cond);`
    DoWhile(DoWhileStmt),
    /// `return expr;` or bare `return;`
    Return(Option<Expr>, Span),
    /// `break;`
    Break(Span),
    /// `continue;`
    Continue(Span),
    /// `discard;` (fragment-stage only, but that check is not the parser's)
    Discard(Span),
}

#[derive(Debug, Clone, Serialize)]
pub struct VarDecl {
    pub var_type: String,
    pub name: String,
    pub init: Option<Expr>,
    pub is_const: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForStmt {
    /// Either a `VarDecl` or an expression statement; both consume their `;`.
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    Ident(String, Span),

    /// `vec3(1.0, 0.0, 0.0)`. Only `vec*` constructors; other type
    /// constructors parse as plain calls.
    VectorLiteral {
        vector_type: String,
        components: Vec<Expr>,
        span: Span,
    },

    /// `a + b`, `a << b`, `a == b`, …
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// `-x`, `!x`, `~x`, `++x` / `x++`
    UnOp {
        op: UnOp,
        operand: Box<Expr>,
        prefix: bool,
        span: Span,
    },

    /// `x = v`, `x += v`, …
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    /// `cond ? then : else`
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },

    /// `texture(tex, uv)`; the callee is an arbitrary postfix expression.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    /// `color.rgb`; property access is never computed, `[]` is `Index`.
    Member {
        object: Box<Expr>,
        property: String,
        span: Span,
    },

    /// `points[i]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)    => *s,
            Expr::Float(_, s)  => *s,
            Expr::Bool(_, s)   => *s,
            Expr::Ident(_, s)  => *s,
            Expr::VectorLiteral { span, .. } => *span,
            Expr::BinOp { span, .. }   => *span,
            Expr::UnOp { span, .. }    => *span,
            Expr::Assign { span, .. }  => *span,
            Expr::Ternary { span, .. } => *span,
            Expr::Call { span, .. }    => *span,
            Expr::Member { span, .. }  => *span,
            Expr::Index { span, .. }   => *span,
        }
    }
}

// ─── Operators ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    Add, Sub, Mul, Div, Mod,
    Eq, NotEq,
    Lt, LtEq, Gt, GtEq,
    And, Or,
    BitAnd, BitOr, BitXor,
    Shl, Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnOp {
    Neg,
    Plus,
    Not,
    BitNot,
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add, Sub, Mul, Div, Mod,
    BitAnd, BitOr, BitXor,
}
