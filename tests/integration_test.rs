// Integration tests for scope-resolving parsing

use std::rc::Rc;
use sysy_parse::driver::parse_source;
use sysy_parse::parser::ast::{BinOp, Expr, ParameterList, Stmt};
use sysy_parse::parser::{ErrorKind, ParseError, Parser};
use sysy_parse::symbols::Symbol;
use sysy_parse::types::Type;

fn function_body(stmt: &Stmt) -> &Stmt {
    match stmt {
        Stmt::FunctionDef { body, .. } => body,
        other => panic!("Expected function definition, got {other:?}"),
    }
}

fn block_statements(stmt: &Stmt) -> Vec<&Stmt> {
    match stmt {
        Stmt::Block { inner, .. } => inner.statements(),
        other => panic!("Expected block, got {other:?}"),
    }
}

fn ident_symbol(expr: &Expr) -> &Symbol {
    match expr {
        Expr::Identifier { symbol, .. } => symbol,
        other => panic!("Expected identifier, got {other:?}"),
    }
}

/// Collect every identifier use under an expression
fn identifiers<'a>(expr: &'a Expr, out: &mut Vec<&'a Symbol>) {
    match expr {
        Expr::BinaryOp { left, right, .. } => {
            identifiers(left, out);
            identifiers(right, out);
        }
        Expr::UnaryOp { operand, .. } => identifiers(operand, out),
        Expr::Identifier { symbol, .. } => out.push(symbol),
        Expr::FunctionCall { args, .. } => {
            if let Some(ParameterList::Arguments(args)) = args {
                for arg in args {
                    identifiers(arg, out);
                }
            }
        }
        Expr::Literal { .. } => {}
    }
}

#[test]
fn test_main_with_if_else() {
    let source = "int main(){ int a = 1, b = 2; if (a < b) return a; else return b; }";
    let ast = parse_source(source).expect("Parsing failed");
    let root = ast.root.as_ref().unwrap();

    match root {
        Stmt::FunctionDef { symbol, params, .. } => {
            assert_eq!(symbol.name(), Some("main"));
            assert_eq!(symbol.ty(), &Type::function(Type::Int, vec![]));
            assert!(params.is_none());
        }
        _ => panic!("Expected a single function definition"),
    }

    let stmts = block_statements(function_body(root));
    assert_eq!(stmts.len(), 2);

    match stmts[0] {
        Stmt::Declaration { decls, .. } => {
            assert_eq!(decls.len(), 2);
            assert_eq!(ident_symbol(&decls[0].0).name(), Some("a"));
            assert_eq!(ident_symbol(&decls[1].0).name(), Some("b"));
            assert!(matches!(&decls[0].1, Some(Expr::Literal { symbol, .. }) if symbol.value() == Some(1)));
            assert!(matches!(&decls[1].1, Some(Expr::Literal { symbol, .. }) if symbol.value() == Some(2)));
        }
        other => panic!("Expected declaration, got {other:?}"),
    }

    match stmts[1] {
        Stmt::IfElse {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            match condition {
                Expr::BinaryOp { op, left, right, .. } => {
                    assert_eq!(*op, BinOp::Lt);
                    assert_eq!(ident_symbol(left).name(), Some("a"));
                    assert_eq!(ident_symbol(right).name(), Some("b"));
                }
                other => panic!("Expected comparison, got {other:?}"),
            }
            assert!(matches!(&**then_branch, Stmt::Return { expr, .. } if ident_symbol(expr).name() == Some("a")));
            assert!(matches!(&**else_branch, Stmt::Return { expr, .. } if ident_symbol(expr).name() == Some("b")));
        }
        other => panic!("Expected if/else, got {other:?}"),
    }
}

#[test]
fn test_undeclared_name_aborts() {
    let err = parse_source("int main(){ return c; }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedIdentifier);
    match err {
        ParseError::UndefinedIdentifier { name, .. } => assert_eq!(name, "c"),
        other => panic!("Expected undefined identifier, got {other:?}"),
    }
}

#[test]
fn test_use_before_declaration_aborts() {
    let err = parse_source("int main(){ x = 1; int x; return 0; }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedIdentifier);
}

#[test]
fn test_resolved_identifiers_carry_scope_and_type() {
    let source = r#"
        int g = 1;
        const int k = 2;
        int main() {
            int a = g + k;
            return a;
        }
    "#;
    let ast = parse_source(source).expect("Parsing failed");
    let stmts = ast.root.as_ref().unwrap().statements();
    assert_eq!(stmts.len(), 3);

    let body = block_statements(function_body(stmts[2]));
    match body[0] {
        Stmt::Declaration { decls, .. } => {
            let a = ident_symbol(&decls[0].0);
            assert_eq!(a.scope(), Some(2));
            assert_eq!(a.ty(), &Type::Int);

            let mut uses = Vec::new();
            identifiers(decls[0].1.as_ref().unwrap(), &mut uses);
            assert_eq!(uses[0].name(), Some("g"));
            assert_eq!(uses[0].scope(), Some(0));
            assert_eq!(uses[1].name(), Some("k"));
            assert_eq!(uses[1].ty(), &Type::Const);
        }
        other => panic!("Expected declaration, got {other:?}"),
    }
}

#[test]
fn test_shadowing_and_restore() {
    let source = r#"
        int x = 1;
        int main() {
            int x = 2;
            {
                int x = 3;
                putint(x);
            }
            putint(x);
            return x;
        }
    "#;
    let ast = parse_source(source).expect("Parsing failed");
    let stmts = ast.root.as_ref().unwrap().statements();
    let body = block_statements(function_body(stmts[1]));

    let outer_x = match body[0] {
        Stmt::Declaration { decls, .. } => Rc::clone(ident_symbol(&decls[0].0)),
        other => panic!("Expected declaration, got {other:?}"),
    };

    let inner = block_statements(body[1]);
    let inner_x = match inner[0] {
        Stmt::Declaration { decls, .. } => Rc::clone(ident_symbol(&decls[0].0)),
        other => panic!("Expected declaration, got {other:?}"),
    };
    assert_eq!(inner_x.scope(), Some(3));

    let mut uses = Vec::new();
    match inner[1] {
        Stmt::Expression { expr, .. } => identifiers(expr, &mut uses),
        other => panic!("Expected call statement, got {other:?}"),
    }
    assert!(Rc::ptr_eq(uses[0], &inner_x));

    uses.clear();
    match body[2] {
        Stmt::Expression { expr, .. } => identifiers(expr, &mut uses),
        other => panic!("Expected call statement, got {other:?}"),
    }
    assert!(Rc::ptr_eq(uses[0], &outer_x));
    assert_eq!(uses[0].scope(), Some(2));
}

#[test]
fn test_recursive_self_call() {
    let source = r#"
        int fact(int n) {
            if (n < 2) return 1;
            return n * fact(n - 1);
        }
    "#;
    let ast = parse_source(source).expect("Recursive call should resolve");
    let root = ast.root.as_ref().unwrap();
    let fact = match root {
        Stmt::FunctionDef { symbol, .. } => Rc::clone(symbol),
        other => panic!("Expected function definition, got {other:?}"),
    };
    assert_eq!(fact.ty().to_string(), "int(int)");

    let body = block_statements(function_body(root));
    match body[1] {
        Stmt::Return {
            expr: Expr::BinaryOp { right, .. },
            ..
        } => match &**right {
            Expr::FunctionCall { callee, .. } => assert!(Rc::ptr_eq(callee, &fact)),
            other => panic!("Expected recursive call, got {other:?}"),
        },
        other => panic!("Expected return, got {other:?}"),
    }
}

#[test]
fn test_recursive_call_without_parameters() {
    assert!(parse_source("void spin() { spin(); }").is_ok());
}

#[test]
fn test_function_callable_after_definition() {
    let source = r#"
        int add(int a, int b) { return a + b; }
        int main() { return add(1, 2); }
    "#;
    assert!(parse_source(source).is_ok());
    assert!(parse_source("int main() { return add(1, 2); }").is_err());
}

#[test]
fn test_parameters_not_visible_after_function() {
    let err = parse_source("int f(int p) { return p; } int main() { return p; }").unwrap_err();
    assert!(matches!(err, ParseError::UndefinedIdentifier { ref name, .. } if name == "p"));
}

#[test]
fn test_temporary_labels_unique() {
    let source = r#"
        int main() {
            int a = 1, b = 2;
            int c = -a + b * (a - b) % 3;
            while (!(a >= b) && a != b || ++a) a = a + 1;
            return --c;
        }
    "#;
    let ast = parse_source(source).expect("Parsing failed");

    fn collect_expr(expr: &Expr, labels: &mut Vec<usize>) {
        match expr {
            Expr::BinaryOp {
                left,
                right,
                result,
                ..
            } => {
                collect_expr(left, labels);
                collect_expr(right, labels);
                labels.push(result.label().unwrap());
            }
            Expr::UnaryOp {
                operand, result, ..
            } => {
                collect_expr(operand, labels);
                labels.push(result.label().unwrap());
            }
            _ => {}
        }
    }

    fn collect_stmt(stmt: &Stmt, labels: &mut Vec<usize>) {
        match stmt {
            Stmt::Sequence { first, next, .. } => {
                collect_stmt(first, labels);
                collect_stmt(next, labels);
            }
            Stmt::Block { inner, .. } => collect_stmt(inner, labels),
            Stmt::FunctionDef { body, .. } => collect_stmt(body, labels),
            Stmt::Declaration { decls, .. } => {
                for (_, init) in decls {
                    if let Some(init) = init {
                        collect_expr(init, labels);
                    }
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                collect_expr(condition, labels);
                collect_stmt(body, labels);
            }
            Stmt::Assign { expr, .. } | Stmt::Return { expr, .. } => collect_expr(expr, labels),
            _ => {}
        }
    }

    let mut labels = Vec::new();
    collect_stmt(ast.root.as_ref().unwrap(), &mut labels);
    assert_eq!(labels.len(), 13);

    let mut unique = labels.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn test_labels_unique_across_parses() {
    let first = parse_source("int a; int b = -a;").unwrap();
    let second = parse_source("int a; int b = -a;").unwrap();

    let label = |ast: &sysy_parse::parser::Ast| match ast.root.as_ref().unwrap().statements()[1] {
        Stmt::Declaration { decls, .. } => decls[0].1.as_ref().unwrap().symbol().label().unwrap(),
        other => panic!("Expected declaration, got {other:?}"),
    };
    assert_ne!(label(&first), label(&second));
}

#[test]
fn test_declarations_ordered_by_name() {
    let mut parser = Parser::new("int b, a;").unwrap();
    let ast = parser.parse_program().unwrap();

    match ast.root.as_ref().unwrap() {
        Stmt::Declaration { decls, .. } => {
            let names: Vec<_> = decls
                .iter()
                .map(|(ident, _)| ident_symbol(ident).name().unwrap())
                .collect();
            assert_eq!(names, vec!["a", "b"]);
        }
        other => panic!("Expected declaration, got {other:?}"),
    }
    assert!(parser.symbols().lookup("a").is_some());
    assert!(parser.symbols().lookup("b").is_some());

    let text = ast.to_text();
    let a = text.find("name: a").unwrap();
    let b = text.find("name: b").unwrap();
    assert!(a < b);
}

#[test]
fn test_same_statement_redeclaration_keeps_last_initializer() {
    let ast = parse_source("int x = 1, x = 2;").unwrap();
    match ast.root.as_ref().unwrap() {
        Stmt::Declaration { decls, .. } => {
            assert_eq!(decls.len(), 1);
            assert_eq!(decls[0].1.as_ref().unwrap().symbol().value(), Some(2));
        }
        other => panic!("Expected declaration, got {other:?}"),
    }
}

#[test]
fn test_syntax_errors_abort() {
    for source in [
        "",
        "int main() { return 0; ",
        "int main() { int ; }",
        "int x = (1 + 2;",
        "int a[3];",
        "if 1 { }",
    ] {
        let err = parse_source(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "source: {source:?}");
    }
}
