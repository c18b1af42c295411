use crate::error::{Error, ErrorCode};
use crate::syntax::ast::{Position, Span};
use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                let here = self.position();
                tokens.push(Token::new(TokenKind::Eof, Span::new(here, here)));
                break;
            }

            let start = self.position();
            match self.next_token() {
                Ok(Some(kind)) => tokens.push(Token::new(kind, Span::new(start, self.position()))),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    fn next_token(&mut self) -> Result<Option<TokenKind>, Error> {
        let line = self.line;
        let col = self.column;
        let ch = self.advance();

        let kind = match ch {
            b'+' => {
                if self.peek() == b'+' { self.advance(); TokenKind::PlusPlus }
                else if self.peek() == b'=' { self.advance(); TokenKind::PlusEq }
                else { TokenKind::Plus }
            }
            b'-' => {
                if self.peek() == b'-' { self.advance(); TokenKind::MinusMinus }
                else if self.peek() == b'=' { self.advance(); TokenKind::MinusEq }
                else { TokenKind::Minus }
            }
            b'*' => {
                if self.peek() == b'=' { self.advance(); TokenKind::StarEq }
                else { TokenKind::Star }
            }
            b'/' => {
                if self.peek() == b'/' { self.skip_line(); return Ok(None); }
                else if self.peek() == b'*' { self.skip_block_comment(); return Ok(None); }
                else if self.peek() == b'=' { self.advance(); TokenKind::SlashEq }
                else { TokenKind::Slash }
            }
            b'%' => {
                if self.peek() == b'=' { self.advance(); TokenKind::PercentEq }
                else { TokenKind::Percent }
            }
            b'&' => {
                if self.peek() == b'&' { self.advance(); TokenKind::AmpAmp }
                else if self.peek() == b'=' { self.advance(); TokenKind::AmpEq }
                else { TokenKind::Amp }
            }
            b'|' => {
                if self.peek() == b'|' { self.advance(); TokenKind::PipePipe }
                else if self.peek() == b'=' { self.advance(); TokenKind::PipeEq }
                else { TokenKind::Pipe }
            }
            b'^' => {
                if self.peek() == b'=' { self.advance(); TokenKind::CaretEq }
                else { TokenKind::Caret }
            }
            b'=' => {
                if self.peek() == b'=' { self.advance(); TokenKind::EqEq }
                else { TokenKind::Eq }
            }
            b'!' => {
                if self.peek() == b'=' { self.advance(); TokenKind::BangEq }
                else { TokenKind::Bang }
            }
            b'<' => {
                if self.peek() == b'<' { self.advance(); TokenKind::LtLt }
                else if self.peek() == b'=' { self.advance(); TokenKind::LtEq }
                else { TokenKind::Lt }
            }
            b'>' => {
                if self.peek() == b'>' { self.advance(); TokenKind::GtGt }
                else if self.peek() == b'=' { self.advance(); TokenKind::GtEq }
                else { TokenKind::Gt }
            }

            b'~' => TokenKind::Tilde,
            b'?' => TokenKind::Question,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'.' => TokenKind::Dot,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'#' => TokenKind::Hash,

            b'"' => TokenKind::StringLit(self.read_string(line, col)?),
            b'0'..=b'9' => self.read_number(ch, line, col)?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => keyword_or_ident(self.read_ident(ch)),

            other => {
                return Err(Error::new(ErrorCode::L001, line, col,
                    format!("unexpected character `{}`", other as char)));
            }
        };

        Ok(Some(kind))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.source.len() { 0 } else { self.source[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // consume *
        while !self.is_at_end() {
            if self.peek() == b'*' && self.peek_next() == b'/' {
                self.advance(); // *
                self.advance(); // /
                break;
            }
            self.advance();
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<String, Error> {
        let mut s = String::new();
        let mut error: Option<Error> = None;
        loop {
            if self.is_at_end() || self.peek() == b'\n' {
                return Err(Error::new(ErrorCode::L002, start_line, start_col,
                    "unterminated string literal"));
            }
            let ch = self.advance();
            if ch == b'"' { break; }
            if ch == b'\\' {
                let esc_line = self.line;
                let esc_col  = self.column;
                match self.advance() {
                    b'n'  => s.push('\n'),
                    b't'  => s.push('\t'),
                    b'"'  => s.push('"'),
                    b'\\' => s.push('\\'),
                    other => {
                        // Record the first escape error but keep consuming so we
                        // don't produce cascading errors from the remainder of the string.
                        if error.is_none() {
                            error = Some(Error::new(ErrorCode::L003, esc_line, esc_col,
                                format!("unknown escape sequence `\\{}`", other as char)));
                        }
                    }
                }
            } else {
                s.push(ch as char);
            }
        }
        if let Some(e) = error { return Err(e); }
        Ok(s)
    }

    /// Integer (decimal or `0x` hex) or float literal. The decimal point is
    /// consumed only when followed by a digit, so `v.x` after a number still
    /// lexes as a member access.
    fn read_number(&mut self, first: u8, line: usize, col: usize) -> Result<TokenKind, Error> {
        if first == b'0' && (self.peek() == b'x' || self.peek() == b'X') {
            self.advance(); // consume x
            let mut digits = String::new();
            while !self.is_at_end() && self.peek().is_ascii_hexdigit() {
                digits.push(self.advance() as char);
            }
            return i64::from_str_radix(&digits, 16)
                .map(TokenKind::Int)
                .map_err(|_| Error::new(ErrorCode::L004, line, col,
                    format!("malformed hex literal `0x{digits}`")));
        }

        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance() as char);
        }

        if !self.is_at_end() && self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            s.push(self.advance() as char);
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance() as char);
            }
            return Ok(TokenKind::Float(s.parse().unwrap_or(0.0)));
        }

        s.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| Error::new(ErrorCode::L004, line, col,
                format!("malformed integer literal `{s}`")))
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            s.push(self.advance() as char);
        }
        s
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(src: &str) -> Vec<Error> {
        Lexer::new(src).tokenize().unwrap_err()
    }

    #[test]
    fn empty() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn int_literal() {
        assert_eq!(lex("42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn hex_literal() {
        assert_eq!(lex("0xff"), vec![TokenKind::Int(255), TokenKind::Eof]);
        assert_eq!(lex("0XFF"), vec![TokenKind::Int(255), TokenKind::Eof]);
    }

    #[test]
    fn float_literal() {
        assert_eq!(lex("3.14"), vec![TokenKind::Float(3.14), TokenKind::Eof]);
    }

    #[test]
    fn dot_not_consumed_by_number() {
        assert_eq!(
            lex("v.x"),
            vec![TokenKind::Ident("v".into()), TokenKind::Dot, TokenKind::Ident("x".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(lex("shader_type"), vec![TokenKind::ShaderType, TokenKind::Eof]);
        assert_eq!(lex("render_mode"), vec![TokenKind::RenderMode, TokenKind::Eof]);
        assert_eq!(lex("uniform"),     vec![TokenKind::Uniform,    TokenKind::Eof]);
        assert_eq!(lex("varying"),     vec![TokenKind::Varying,    TokenKind::Eof]);
        assert_eq!(lex("discard"),     vec![TokenKind::Discard,    TokenKind::Eof]);
        assert_eq!(lex("inout"),       vec![TokenKind::InOut,      TokenKind::Eof]);
    }

    #[test]
    fn bool_literals() {
        assert_eq!(lex("true"),  vec![TokenKind::Bool(true),  TokenKind::Eof]);
        assert_eq!(lex("false"), vec![TokenKind::Bool(false), TokenKind::Eof]);
    }

    #[test]
    fn type_names() {
        assert_eq!(lex("float"),     vec![TokenKind::Type("float".into()),     TokenKind::Eof]);
        assert_eq!(lex("vec3"),      vec![TokenKind::Type("vec3".into()),      TokenKind::Eof]);
        assert_eq!(lex("mat4"),      vec![TokenKind::Type("mat4".into()),      TokenKind::Eof]);
        assert_eq!(lex("sampler2D"), vec![TokenKind::Type("sampler2D".into()), TokenKind::Eof]);
        // unknown names stay plain identifiers
        assert_eq!(lex("vec5"), vec![TokenKind::Ident("vec5".into()), TokenKind::Eof]);
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(lex("=="), vec![TokenKind::EqEq,     TokenKind::Eof]);
        assert_eq!(lex("!="), vec![TokenKind::BangEq,   TokenKind::Eof]);
        assert_eq!(lex("<="), vec![TokenKind::LtEq,     TokenKind::Eof]);
        assert_eq!(lex(">="), vec![TokenKind::GtEq,     TokenKind::Eof]);
        assert_eq!(lex("<<"), vec![TokenKind::LtLt,     TokenKind::Eof]);
        assert_eq!(lex(">>"), vec![TokenKind::GtGt,     TokenKind::Eof]);
        assert_eq!(lex("&&"), vec![TokenKind::AmpAmp,   TokenKind::Eof]);
        assert_eq!(lex("||"), vec![TokenKind::PipePipe, TokenKind::Eof]);
    }

    #[test]
    fn compound_assignment_operators() {
        assert_eq!(lex("+="), vec![TokenKind::PlusEq,    TokenKind::Eof]);
        assert_eq!(lex("-="), vec![TokenKind::MinusEq,   TokenKind::Eof]);
        assert_eq!(lex("*="), vec![TokenKind::StarEq,    TokenKind::Eof]);
        assert_eq!(lex("/="), vec![TokenKind::SlashEq,   TokenKind::Eof]);
        assert_eq!(lex("%="), vec![TokenKind::PercentEq, TokenKind::Eof]);
        assert_eq!(lex("&="), vec![TokenKind::AmpEq,     TokenKind::Eof]);
        assert_eq!(lex("|="), vec![TokenKind::PipeEq,    TokenKind::Eof]);
        assert_eq!(lex("^="), vec![TokenKind::CaretEq,   TokenKind::Eof]);
    }

    #[test]
    fn inc_dec_tokens() {
        assert_eq!(lex("++"), vec![TokenKind::PlusPlus,   TokenKind::Eof]);
        assert_eq!(lex("--"), vec![TokenKind::MinusMinus, TokenKind::Eof]);
    }

    #[test]
    fn single_char_bitwise_and_unary() {
        assert_eq!(lex("&"), vec![TokenKind::Amp,   TokenKind::Eof]);
        assert_eq!(lex("|"), vec![TokenKind::Pipe,  TokenKind::Eof]);
        assert_eq!(lex("^"), vec![TokenKind::Caret, TokenKind::Eof]);
        assert_eq!(lex("~"), vec![TokenKind::Tilde, TokenKind::Eof]);
        assert_eq!(lex("!"), vec![TokenKind::Bang,  TokenKind::Eof]);
    }

    #[test]
    fn line_comment_skipped() {
        assert_eq!(lex("// comment\n42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn block_comment_skipped() {
        assert_eq!(lex("/* comment */42"), vec![TokenKind::Int(42), TokenKind::Eof]);
        assert_eq!(lex("/* a\nb */42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn include_directive_tokens() {
        assert_eq!(
            lex("#include \"common.vsl\""),
            vec![
                TokenKind::Hash,
                TokenKind::Ident("include".into()),
                TokenKind::StringLit("common.vsl".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_error() {
        let errs = lex_err(r#""oops"#);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L002);
    }

    #[test]
    fn invalid_escape_error() {
        let errs = lex_err(r#""\q""#);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L003);
    }

    #[test]
    fn bare_hex_prefix_error() {
        let errs = lex_err("0x");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L004);
    }

    #[test]
    fn unexpected_character_error() {
        let errs = lex_err("$");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L001);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::new("a\nb").tokenize().unwrap();
        assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
        assert_eq!((tokens[1].line(), tokens[1].column()), (2, 1));
    }

    #[test]
    fn token_spans_cover_lexeme() {
        let tokens = Lexer::new("uniform").tokenize().unwrap();
        assert_eq!(tokens[0].span.start.offset, 0);
        assert_eq!(tokens[0].span.end.offset, 7);
    }

    #[test]
    fn uniform_declaration_tokens() {
        assert_eq!(
            lex("uniform float amount : hint_range(0.0, 1.0) = 0.5;"),
            vec![
                TokenKind::Uniform,
                TokenKind::Type("float".into()),
                TokenKind::Ident("amount".into()),
                TokenKind::Colon,
                TokenKind::Ident("hint_range".into()),
                TokenKind::LParen,
                TokenKind::Float(0.0), TokenKind::Comma, TokenKind::Float(1.0),
                TokenKind::RParen,
                TokenKind::Eq,
                TokenKind::Float(0.5),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn function_signature_tokens() {
        assert_eq!(
            lex("void main() {}"),
            vec![
                TokenKind::Type("void".into()),
                TokenKind::Ident("main".into()),
                TokenKind::LParen, TokenKind::RParen,
                TokenKind::LBrace, TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn token_kind_helpers() {
        assert!(TokenKind::Int(1).is_literal());
        assert!(TokenKind::Uniform.is_decl_keyword());
        assert!(TokenKind::Discard.is_control_keyword());
        assert!(TokenKind::PlusEq.is_assign_op());
        assert!(TokenKind::Type("vec2".into()).is_type());
        assert!(!TokenKind::Ident("x".into()).is_type());
    }
}
