//! 前置定义
//!
//! 每个模块默认可见的值与运算符的类型方案

use super::environment::TypeEnvironment;
use crate::frontend::core::ast::BinOp;
use crate::frontend::core::type_system::{MonoType, PolyType, SuperType, TypeVar};

fn named(name: &str) -> MonoType {
    MonoType::Var(TypeVar::named(name))
}

fn constrained(
    name: &str,
    constraint: SuperType,
) -> MonoType {
    MonoType::Var(TypeVar::named(name).with_constraint(constraint))
}

fn fun(
    params: Vec<MonoType>,
    result: MonoType,
) -> PolyType {
    PolyType::closed(MonoType::curried(params, result))
}

/// 二元运算符的类型方案
pub fn operator_scheme(op: BinOp) -> PolyType {
    let a = named("a");
    let b = named("b");
    let c = named("c");
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Pow => {
            let n = constrained("number", SuperType::Number);
            fun(vec![n.clone(), n.clone()], n)
        }
        BinOp::Div => fun(vec![MonoType::Float, MonoType::Float], MonoType::Float),
        BinOp::IntDiv => fun(vec![MonoType::Int, MonoType::Int], MonoType::Int),
        BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            fun(vec![a.clone(), a], MonoType::Bool)
        }
        BinOp::And | BinOp::Or => fun(vec![MonoType::Bool, MonoType::Bool], MonoType::Bool),
        BinOp::Append => {
            let x = constrained("appendable", SuperType::Appendable);
            fun(vec![x.clone(), x.clone()], x)
        }
        BinOp::Cons => fun(vec![a.clone(), MonoType::list(a.clone())], MonoType::list(a)),
        // a |> f
        BinOp::PipeRight => fun(vec![a.clone(), MonoType::function(a, b.clone())], b),
        // f <| a
        BinOp::PipeLeft => fun(vec![MonoType::function(a.clone(), b.clone()), a], b),
        // f >> g
        BinOp::ComposeRight => fun(
            vec![
                MonoType::function(a.clone(), b.clone()),
                MonoType::function(b, c.clone()),
            ],
            MonoType::function(a, c),
        ),
        // g << f
        BinOp::ComposeLeft => fun(
            vec![
                MonoType::function(b.clone(), c.clone()),
                MonoType::function(a.clone(), b),
            ],
            MonoType::function(a, c),
        ),
    }
}

/// 前置值定义
pub fn values() -> Vec<(&'static str, PolyType)> {
    let a = named("a");
    let b = named("b");
    let n = constrained("number", SuperType::Number);
    let float_to_int = || fun(vec![MonoType::Float], MonoType::Int);
    vec![
        ("True", PolyType::mono(MonoType::Bool)),
        ("False", PolyType::mono(MonoType::Bool)),
        ("not", fun(vec![MonoType::Bool], MonoType::Bool)),
        ("identity", fun(vec![a.clone()], a.clone())),
        ("always", fun(vec![a.clone(), b], a)),
        ("toFloat", fun(vec![MonoType::Int], MonoType::Float)),
        ("round", float_to_int()),
        ("floor", float_to_int()),
        ("ceiling", float_to_int()),
        ("truncate", float_to_int()),
        ("negate", fun(vec![n.clone()], n)),
    ]
}

/// 创建含前置定义的环境
pub fn environment() -> TypeEnvironment {
    let mut env = TypeEnvironment::new();
    for (name, scheme) in values() {
        env.add_var(name, scheme);
    }
    env
}
