//! 类型检查器测试模块

mod functions;

use crate::frontend::core::ast::{Expr, Module};
use crate::frontend::typecheck::{TypeChecker, TypeError, Typed};
use crate::util::span::Span;
use indexmap::IndexMap;

/// 推断独立表达式并渲染类型
pub(super) fn infer_str(expr: Expr<Span>) -> String {
    match TypeChecker::new().check_expr(&expr) {
        Ok(typed) => typed.meta.ty.to_string(),
        Err(err) => panic!("unexpected type error: {}", err),
    }
}

/// 推断独立表达式，期望失败
pub(super) fn infer_err(expr: Expr<Span>) -> TypeError {
    match TypeChecker::new().check_expr(&expr) {
        Ok(typed) => panic!("expected a type error, got {}", typed.meta.ty),
        Err(err) => err,
    }
}

/// 推断一组模块
pub(super) fn check(modules: Vec<Module<Span>>) -> Result<IndexMap<String, Module<Typed>>, crate::frontend::Error> {
    let map: IndexMap<String, Module<Span>> = modules.into_iter().map(|m| (m.name.clone(), m)).collect();
    TypeChecker::new().check_modules(&map)
}

/// 渲染模块中某个声明的类型
pub(super) fn decl_type(
    modules: &IndexMap<String, Module<Typed>>,
    module: &str,
    name: &str,
) -> String {
    match crate::frontend::type_of(modules, module, name) {
        Ok(scheme) => scheme.to_string(),
        Err(err) => panic!("{}", err),
    }
}
