use kol_ast::ast::{Definition, Expr, Stmt};
use kol_ast::print::{expr_to_sexpr, to_sexpr};
use kol_parse::{parse_str, parse_with, ParseLimits};

fn sexpr(src: &str) -> String {
    to_sexpr(&parse_str(src).expect("parse ok"))
}

#[test]
fn struct_literal_in_let() {
    let file = parse_str("let p = Point { x: 1, y: 2 };").expect("parse ok");
    let Definition::Stmt(Stmt::Let { value, .. }) = &file.definitions[0] else {
        panic!("expected let statement");
    };
    let Expr::StructInit { ty, fields, .. } = value else {
        panic!("expected struct literal");
    };
    assert_eq!(ty.text, "Point");
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name.text, "x");
    assert_eq!(fields[1].name.text, "y");
    assert_eq!(
        expr_to_sexpr(value),
        "(struct_init Point (x (int 1)) (y (int 2)))"
    );
}

#[test]
fn struct_literal_shapes() {
    assert_eq!(sexpr("P {}"), "(source_file\n  (struct_init P))");
    assert_eq!(
        sexpr("P { a: 1, }"),
        "(source_file\n  (struct_init P (a (int 1))))"
    );
    assert_eq!(
        sexpr("Line { a: Point { x: 1 }, b: p }"),
        "(source_file\n  (struct_init Line (a (struct_init Point (x (int 1)))) (b (ident p))))"
    );
    assert_eq!(
        sexpr("P { x: 1 }.x"),
        "(source_file\n  (. (struct_init P (x (int 1))) x))"
    );
}

#[test]
fn struct_literal_only_after_bare_identifier() {
    // `a.b {` is not a struct literal; the brace then starts nothing valid
    assert!(parse_str("a.b { x: 1 }").is_err());
    assert!(parse_str("f() { x: 1 }").is_err());
}

#[test]
fn struct_literal_in_return_and_arguments() {
    assert_eq!(
        sexpr("fun mk() { return P { x: f(Q { y: 2 }) }; }"),
        "(source_file\n  (fun mk (params) (block (return (struct_init P (x (call (ident f) (struct_init Q (y (int 2))))))))))"
    );
}

#[test]
fn if_condition_identifier_is_not_a_struct_literal() {
    let file = parse_str("if x { return 1; }").expect("parse ok");
    let Definition::Expr(Expr::If {
        cond, then_, else_, ..
    }) = &file.definitions[0]
    else {
        panic!("expected if expression");
    };
    assert!(matches!(cond.as_ref(), Expr::Ident(id) if id.text == "x"));
    assert_eq!(then_.definitions.len(), 1);
    assert!(matches!(
        then_.definitions[0],
        Definition::Stmt(Stmt::Return { .. })
    ));
    assert!(else_.is_none());
}

#[test]
fn for_condition_identifier_is_not_a_struct_literal() {
    assert_eq!(
        sexpr("for running { break 0; }"),
        "(source_file\n  (for (ident running) (block (break (int 0)))))"
    );
    assert_eq!(
        sexpr("for i < n { i = i + 1; }"),
        "(source_file\n  (for (< (ident i) (ident n)) (block (set i (+ (ident i) (int 1))))))"
    );
}

#[test]
fn restriction_covers_whole_condition_expression() {
    assert_eq!(
        sexpr("if a == b { }"),
        "(source_file\n  (if (== (ident a) (ident b)) (block)))"
    );
    assert_eq!(
        sexpr("if !done { }"),
        "(source_file\n  (if (not (ident done)) (block)))"
    );
}

#[test]
fn delimited_parts_of_condition_allow_struct_literals() {
    assert_eq!(
        sexpr("if valid(P { x: 1 }) { }"),
        "(source_file\n  (if (call (ident valid) (struct_init P (x (int 1)))) (block)))"
    );
}

#[test]
fn blocks_after_condition_allow_struct_literals() {
    assert_eq!(
        sexpr("if c { let p = P { x: 1 }; } else { return Q { y: 2 }; }"),
        "(source_file\n  (if (ident c) (block (let p (struct_init P (x (int 1))))) (block (return (struct_init Q (y (int 2)))))))"
    );
}

#[test]
fn struct_literal_in_condition_needs_restructuring() {
    // the brace after `P` opens the consequence block, which then fails on `:`
    let out = parse_with("if P { x: 1 } { }", &ParseLimits::default());
    assert!(!out.diagnostics.is_empty());
    let Definition::Expr(Expr::If { cond, .. }) = &out.file.definitions[0] else {
        panic!("expected if expression");
    };
    assert!(matches!(cond.as_ref(), Expr::Ident(id) if id.text == "P"));

    // binding first is the supported form
    assert!(parse_str("let p = P { x: 1 }; if p.x { }").is_ok());
}
