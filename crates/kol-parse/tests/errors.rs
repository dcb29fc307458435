use kol_ast::ast::Definition;
use kol_parse::{parse_str, parse_with, DiagnosticKind, LexError, ParseLimits};

fn diags(src: &str) -> Vec<kol_parse::Diagnostic> {
    parse_with(src, &ParseLimits::default()).diagnostics
}

#[test]
fn missing_colon_in_field_then_second_error_still_reported() {
    let src = "struct Point { x int, y: int }\nfun broken(a int) { }\n";
    let ds = diags(src);
    assert_eq!(ds.len(), 2, "got: {:?}", ds);
    assert!(ds.iter().all(|d| d.is_syntax()));

    assert_eq!((ds[0].line, ds[0].column), (1, 18));
    assert_eq!(ds[0].to_string(), "1:18: expected `:`, found `int`");

    assert_eq!((ds[1].line, ds[1].column), (2, 14));
    assert_eq!(ds[1].to_string(), "2:14: expected `:`, found `int`");
}

#[test]
fn recovery_inside_block_keeps_later_definitions() {
    let src = "fun f() {\n    let = 1;\n    let y = 2;\n    return y;\n}\n";
    let out = parse_with(src, &ParseLimits::default());
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(
        out.diagnostics[0].to_string(),
        "2:9: expected identifier, found `=`"
    );
    let Definition::Function(f) = &out.file.definitions[0] else {
        panic!("expected function in partial tree");
    };
    assert_eq!(f.body.definitions.len(), 2);
}

#[test]
fn invalid_character_reported_once() {
    let ds = diags("let x = @;\nlet y = 2;");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].kind,
        DiagnosticKind::Lexical(LexError::UnexpectedChar('@'))
    );
    assert_eq!((ds[0].line, ds[0].column), (1, 9));
}

#[test]
fn invalid_character_skipped_during_recovery_is_reported() {
    let ds = diags("let = 1 # 2;\nlet y = 3;");
    assert_eq!(ds.len(), 2, "got: {:?}", ds);
    assert!(ds[0].is_syntax());
    assert!(ds[1].is_lexical());
    assert_eq!((ds[1].line, ds[1].column), (1, 9));
}

#[test]
fn unterminated_string_and_block_comment() {
    let ds = diags("let s = \"abc");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].kind,
        DiagnosticKind::Lexical(LexError::UnterminatedString)
    );

    let ds = diags("let a = 1; /* open");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].kind,
        DiagnosticKind::Lexical(LexError::UnterminatedBlockComment)
    );
}

#[test]
fn number_out_of_range() {
    let err = parse_str("let x = 99999999999999999999999;")
        .unwrap_err()
        .to_string();
    assert!(err.contains("number literal out of range"), "got: {err}");
}

#[test]
fn unclosed_blocks_report_once_at_end_of_input() {
    let ds = diags("fun f() {\n    if x {\n        return 1;\n");
    assert_eq!(ds.len(), 1, "got: {:?}", ds);
    assert_eq!(ds[0].to_string(), "4:1: expected `}`, found end of input");
}

#[test]
fn missing_required_parts() {
    let ds = diags("struct P");
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].to_string(), "1:9: expected `{`, found end of input");

    let ds = diags("fun f()");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].to_string(),
        "1:8: expected one of type, `{`, found end of input"
    );

    let ds = diags("fun f(a: int b: int) {}");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].to_string(),
        "1:14: expected one of `,`, `)`, found identifier `b`"
    );
}

#[test]
fn stray_closing_brace_at_top_level() {
    let out = parse_with("} let a = 1;", &ParseLimits::default());
    assert_eq!(out.diagnostics.len(), 1);
    assert!(out.diagnostics[0].to_string().starts_with("1:1: expected one of `fun`"));
    assert_eq!(out.file.definitions.len(), 1);
}

#[test]
fn bad_type_name() {
    let ds = diags("fun f(a: Point) {}");
    assert_eq!(ds.len(), 1);
    assert_eq!(
        ds[0].to_string(),
        "1:10: expected type, found identifier `Point`"
    );
}

#[test]
fn diagnostics_render_one_per_line() {
    let err = parse_str("let = 1;\nlet = 2;").unwrap_err();
    assert_eq!((&err).into_iter().count(), 2);
    assert_eq!(
        err.to_string(),
        "1:5: expected identifier, found `=`\n2:5: expected identifier, found `=`"
    );
}

#[test]
fn valid_source_has_no_diagnostics() {
    let out = parse_with("fun f() { return 1; }", &ParseLimits::default());
    assert!(out.is_ok());
    assert!(out.into_result().is_ok());
}

fn rendered(src: &str) -> Vec<String> {
    diags(src).iter().map(|d| d.to_string()).collect()
}

#[test]
fn unclosed_struct_declaration_does_not_swallow_later_definitions() {
    let src = "struct P { x: int\nfun f() { let = 1; }\nlet = 2;\n";
    assert_eq!(
        rendered(src),
        vec![
            "2:1: expected one of `,`, `}`, found `fun`",
            "2:15: expected identifier, found `=`",
            "3:5: expected identifier, found `=`",
        ]
    );
    let out = parse_with(src, &ParseLimits::default());
    assert_eq!(out.file.definitions.len(), 1);
    assert!(matches!(out.file.definitions[0], Definition::Function(_)));
}

#[test]
fn unclosed_struct_literal_does_not_swallow_later_definitions() {
    let src = "let p = P { x: 1\nlet = 2;\nfun g( { }\n";
    assert_eq!(
        rendered(src),
        vec![
            "2:1: expected one of `,`, `}`, found `let`",
            "2:5: expected identifier, found `=`",
            "3:8: expected identifier, found `{`",
        ]
    );
}

#[test]
fn unclosed_struct_literal_inside_block() {
    let src = "fun f() {\n    let p = P { x: 1\n    let y = 2;\n}\nlet = 3;\n";
    let out = parse_with(src, &ParseLimits::default());
    let lines: Vec<String> = out.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(lines[0], "3:5: expected one of `,`, `}`, found `let`");
    assert!(
        lines.iter().any(|l| l == "5:5: expected identifier, found `=`"),
        "got: {:?}",
        lines
    );
}
