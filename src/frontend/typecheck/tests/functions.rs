//! 函数、应用与运算符推断测试

use super::{infer_err, infer_str};
use crate::frontend::core::ast::build::*;
use crate::frontend::core::ast::{BinOp, ExprKind};
use crate::frontend::typecheck::TypeError;

/// 测试 lambda：参数产生新变量，箭头右嵌套
#[test]
fn test_lambdas() {
    assert_eq!(infer_str(lambda(vec![pvar("x")], int(1))), "a -> number");
    assert_eq!(
        infer_str(lambda(vec![pvar("x"), pvar("y")], int(1))),
        "a -> b -> number"
    );
    assert_eq!(infer_str(lambda(vec![punit()], int(1))), "() -> number");
    assert_eq!(infer_str(lambda(vec![pvar("x")], var("x"))), "a -> a");
    assert_eq!(
        infer_str(lambda(vec![pvar("x"), pvar("y")], var("y"))),
        "a -> b -> b"
    );
}

/// 测试结构化参数模式
#[test]
fn test_lambda_patterns() {
    assert_eq!(
        infer_str(lambda(vec![ptuple(pvar("a"), pwild())], var("a"))),
        "( a, b ) -> a"
    );
    assert_eq!(
        infer_str(lambda(vec![pcons(pvar("h"), pwild())], var("h"))),
        "List a -> a"
    );
}

/// 测试函数应用
#[test]
fn test_application() {
    assert_eq!(infer_str(apply(var("identity"), vec![int(1)])), "number");
    assert_eq!(
        infer_str(apply(var("always"), vec![int(1), string("s")])),
        "number"
    );
    assert_eq!(
        infer_str(apply(var("always"), vec![string("s")])),
        "a -> String"
    );
    let twice = lambda(
        vec![pvar("f"), pvar("x")],
        apply(var("f"), vec![apply(var("f"), vec![var("x")])]),
    );
    assert_eq!(infer_str(twice), "(a -> a) -> a -> a");
}

/// 测试应用参数类型不符
#[test]
fn test_application_mismatch() {
    let err = infer_err(apply(var("not"), vec![int(1)]));
    assert_eq!(err.to_string(), "type mismatch: expected Bool, found number");

    let err = infer_err(apply(var("toFloat"), vec![float(1.5)]));
    assert_eq!(err.to_string(), "type mismatch: expected Int, found Float");
}

/// 测试未绑定变量
#[test]
fn test_unbound_function() {
    let err = infer_err(apply(var("fn"), vec![int(1)]));
    assert_eq!(
        err,
        TypeError::UnboundVariable {
            name: "fn".into(),
            span: crate::util::span::Span::dummy()
        }
    );
}

/// 测试算术与数值收窄
#[test]
fn test_arithmetic() {
    assert_eq!(infer_str(op(BinOp::Add, int(1), int(2))), "number");
    assert_eq!(infer_str(op(BinOp::Mul, int(1), float(2.0))), "Float");
    assert_eq!(infer_str(op(BinOp::Div, int(1), int(2))), "Float");
    assert_eq!(infer_str(op(BinOp::IntDiv, int(7), int(2))), "Int");
    assert_eq!(infer_str(negate(float(2.5))), "Float");
    assert_eq!(infer_str(negate(int(3))), "number");
    assert_eq!(
        infer_str(lambda(vec![pvar("x")], op(BinOp::Add, var("x"), int(1)))),
        "number -> number"
    );
}

/// 测试整除要求 Int
#[test]
fn test_int_division_rejects_float() {
    let err = infer_err(op(BinOp::IntDiv, float(1.0), int(2)));
    assert_eq!(err.to_string(), "type mismatch: expected Int, found Float");
}

/// 测试比较、逻辑与拼接运算符
#[test]
fn test_operators() {
    assert_eq!(infer_str(op(BinOp::Eq, int(1), int(2))), "Bool");
    assert_eq!(infer_str(op(BinOp::Lt, string("a"), string("b"))), "Bool");
    assert_eq!(infer_str(op(BinOp::And, var("True"), var("False"))), "Bool");
    assert_eq!(infer_str(op(BinOp::Append, string("a"), string("b"))), "String");
    assert_eq!(
        infer_str(op(BinOp::Append, list(vec![int(1)]), list(vec![]))),
        "List number"
    );
    assert_eq!(infer_str(op(BinOp::Cons, int(1), list(vec![]))), "List number");
}

/// 测试拼接不接受数字
#[test]
fn test_append_rejects_numbers() {
    let err = infer_err(op(BinOp::Append, int(1), int(2)));
    assert!(matches!(err, TypeError::TypeMismatch { .. }), "{:?}", err);
}

/// 测试比较两侧类型一致
#[test]
fn test_comparison_mismatch() {
    let err = infer_err(op(BinOp::Eq, string("a"), chr('b')));
    assert_eq!(err.to_string(), "type mismatch: expected String, found Char");
}

/// 测试管道与组合
#[test]
fn test_pipes_and_composition() {
    assert_eq!(infer_str(op(BinOp::PipeRight, int(1), var("negate"))), "number");
    assert_eq!(infer_str(op(BinOp::PipeLeft, var("not"), var("True"))), "Bool");
    assert_eq!(
        infer_str(op(BinOp::ComposeRight, var("toFloat"), var("round"))),
        "Int -> Int"
    );
    assert_eq!(
        infer_str(op(BinOp::ComposeLeft, var("not"), var("not"))),
        "Bool -> Bool"
    );
}

/// 测试运算符函数
#[test]
fn test_operator_function() {
    assert_eq!(
        infer_str(expr(ExprKind::OperatorFunction(BinOp::Add))),
        "number -> number -> number"
    );
    assert_eq!(
        infer_str(apply(expr(ExprKind::OperatorFunction(BinOp::Cons)), vec![chr('x')])),
        "List Char -> List Char"
    );
}

/// 测试 occurs check：自应用不会无限循环
#[test]
fn test_self_application_is_infinite() {
    let err = infer_err(lambda(vec![pvar("x")], apply(var("x"), vec![var("x")])));
    assert!(matches!(err, TypeError::OccursCheckFailed { .. }), "{:?}", err);
    assert_eq!(err.to_string(), "infinite type: a occurs in a -> b");
}
