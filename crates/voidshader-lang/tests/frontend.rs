//! Front-end tests through the public `parse()` API.
//!
//! Each test feeds whole shader source in at the top and inspects the
//! returned AST and diagnostics, the same way the downstream code generator
//! and editor consume them. Error codes: L001–L004, P001–P005.

use voidshader_lang::{parse, Error, ErrorCode, HintKind, ShaderKind};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn clean(src: &str) -> voidshader_lang::ShaderAst {
    let out = parse(src);
    assert!(out.is_clean(), "expected a clean parse, got errors: {:#?}", out.errors);
    out.ast
}

fn has(errs: &[Error], code: ErrorCode) -> bool {
    errs.iter().any(|e| e.code == code)
}

// ─── Clean parses ────────────────────────────────────────────────────────────

#[test]
fn empty_source_yields_default_ast() {
    let ast = clean("");
    assert_eq!(ast.shader_type, ShaderKind::CanvasItem);
    assert!(ast.render_modes.is_empty());
    assert!(ast.uniforms.is_empty());
    assert!(ast.varyings.is_empty());
    assert!(ast.includes.is_empty());
    assert!(ast.functions.is_empty());
}

#[test]
fn representative_shader_round_trip() {
    let ast = clean(
        r#"
shader_type spatial;
render_mode cull_back, depth_draw_opaque;

#include "lib/lighting.vsl"

uniform float roughness : hint_range(0.0, 1.0) = 0.4;
uniform vec4 albedo : hint_color;
uniform sampler2D normal_map : hint_normal;

varying vec3 view_dir;

void vertex() {
    view_dir = normalize(VERTEX - CAMERA_POS);
}

void fragment() {
    float glint = pow(1.0 - dot(NORMAL, view_dir), 4.0);
    ALBEDO = albedo.rgb * (1.0 - roughness) + vec3(glint);
}
"#,
    );
    assert_eq!(ast.shader_type, ShaderKind::Spatial);
    assert_eq!(ast.render_modes, vec!["cull_back", "depth_draw_opaque"]);
    assert_eq!(ast.includes[0].path, "lib/lighting.vsl");
    assert_eq!(ast.uniforms.len(), 3);
    assert_eq!(ast.uniforms[2].hint.as_ref().unwrap().kind, HintKind::Normal);
    assert_eq!(ast.varyings[0].name, "view_dir");
    assert_eq!(ast.functions.len(), 2);
}

#[test]
fn declaration_order_is_preserved_per_bucket() {
    let ast = clean(
        "uniform float a;\nvarying vec2 va;\nuniform float b;\nvarying vec2 vb;",
    );
    let uniforms: Vec<&str> = ast.uniforms.iter().map(|u| u.name.as_str()).collect();
    let varyings: Vec<&str> = ast.varyings.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(uniforms, vec!["a", "b"]);
    assert_eq!(varyings, vec!["va", "vb"]);
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[test]
fn lexical_error_aborts_with_empty_ast() {
    let out = parse("uniform float x;\n@\nuniform float y;");
    assert!(has(&out.errors, ErrorCode::L001));
    assert!(out.ast.uniforms.is_empty());
}

#[test]
fn one_bad_declaration_is_isolated() {
    let out = parse("uniform float glow : hint_sparkle;\nvoid main() { COLOR = vec4(1.0); }");
    assert_eq!(out.errors.len(), 1);
    assert!(has(&out.errors, ErrorCode::P004));
    assert_eq!(out.ast.functions.len(), 1);
}

#[test]
fn errors_carry_locations_for_the_editor() {
    let out = parse("shader_type nope;");
    assert_eq!(out.errors.len(), 1);
    let e = &out.errors[0];
    assert_eq!((e.line, e.column), (1, 13));
    assert_eq!(e.to_string(), "[P003] 1:13: unknown shader type `nope`");
}

#[test]
fn caller_decides_whether_errors_block() {
    // a partial AST is still returned for tooling even when errors exist
    let out = parse("render_mode glow;\nuniform bad;");
    assert!(!out.is_clean());
    assert_eq!(out.ast.render_modes, vec!["glow"]);
}

// ─── Serialization (editor IPC) ──────────────────────────────────────────────

#[test]
fn ast_serializes_for_the_editor() {
    let ast = clean("uniform float speed : hint_range(0.0, 8.0) = 1.0;");
    let json = serde_json::to_value(&ast).expect("serialize failed");
    assert_eq!(json["shader_type"], "canvas_item");
    let uniform = &json["uniforms"][0];
    assert_eq!(uniform["name"], "speed");
    assert_eq!(uniform["uniform_type"], "float");
    assert_eq!(uniform["hint"]["kind"], "hint_range");
    assert_eq!(uniform["hint"]["params"][1], 8.0);
}

#[test]
fn errors_serialize_with_codes_and_locations() {
    let out = parse("shader_type nope;");
    let json = serde_json::to_value(&out.errors).expect("serialize failed");
    assert_eq!(json[0]["code"], "P003");
    assert_eq!(json[0]["line"], 1);
}
