//! 类型推断模块
//!
//! 显式替换线程化的 Hindley-Milner 推断：
//! - expressions: 表达式推断
//! - patterns: 模式推断与名称绑定
//! - declarations: 顶层声明推断与泛化
//!
//! 推断器在遍历过程中累积替换，每个节点先记录未解析的类型，
//! 声明推断结束后用最终替换统一改写整棵树。

pub mod declarations;
pub mod expressions;
pub mod patterns;

use super::environment::TypeEnvironment;
use super::errors::{TypeError, TypeResult};
use super::typed::Typed;
use crate::frontend::core::type_system::{
    instantiate, MonoType, PolyType, Substitution, SuperType, TypeVarSupply, Unifier,
};
use crate::util::span::Span;
use tracing::trace;

pub use patterns::PatternBindings;

/// 默认嵌套上限
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// 推断器
///
/// 持有环境与累积替换；新变量来源由推断运行拥有，推断器只借用
pub struct Inferrer<'a> {
    env: TypeEnvironment,
    subst: Substitution,
    supply: &'a mut TypeVarSupply,
    depth: usize,
    max_depth: usize,
}

impl<'a> Inferrer<'a> {
    /// 创建推断器
    pub fn new(
        env: TypeEnvironment,
        supply: &'a mut TypeVarSupply,
    ) -> Self {
        Self {
            env,
            subst: Substitution::new(),
            supply,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// 设置嵌套上限
    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn env(&self) -> &TypeEnvironment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut TypeEnvironment {
        &mut self.env
    }

    /// 当前累积替换
    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    /// 交还环境
    pub fn into_env(self) -> TypeEnvironment {
        self.env
    }

    fn fresh(&mut self) -> MonoType {
        MonoType::Var(self.supply.fresh())
    }

    fn fresh_constrained(
        &mut self,
        constraint: SuperType,
    ) -> MonoType {
        MonoType::Var(self.supply.fresh_constrained(Some(constraint)))
    }

    /// 在当前替换下合一，并把结果并入累积替换
    ///
    /// 合一的输入已完全应用过累积替换，新绑定的变量不在其定义域内
    fn unify(
        &mut self,
        expected: &MonoType,
        actual: &MonoType,
        span: Span,
    ) -> TypeResult<()> {
        let expected = self.subst.apply(expected);
        let actual = self.subst.apply(actual);
        let s = Unifier::new(&mut *self.supply)
            .unify(&expected, &actual)
            .map_err(|err| TypeError::from_unify(err, span))?;
        if !s.is_empty() {
            trace!("unify {} ~ {} => {}", expected, actual, s);
            self.subst.extend(s);
        }
        Ok(())
    }

    /// 按名称查找并实例化
    fn lookup(
        &mut self,
        name: &str,
        span: Span,
    ) -> TypeResult<MonoType> {
        match self.env.get_var(name) {
            Some(poly) => {
                let poly = poly.clone();
                Ok(instantiate(&poly, &mut *self.supply))
            }
            None => Err(TypeError::unbound_variable(name, span)),
        }
    }

    /// 嵌套守卫：超过上限时报错而不是继续递归
    fn nested<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> TypeResult<T>,
    ) -> TypeResult<T> {
        if self.depth >= self.max_depth {
            return Err(TypeError::NestingTooDeep {
                limit: self.max_depth,
                span,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// 在新作用域中执行
    fn scoped<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> TypeResult<T>,
    ) -> TypeResult<T> {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    /// 把模式绑定的名称以单态方式加入当前作用域
    fn bind_all(
        &mut self,
        bindings: PatternBindings,
    ) {
        for (name, ty) in bindings.into_names() {
            self.env.add_var(name, PolyType::mono(ty));
        }
    }

    /// 用最终替换解析一个节点的元数据
    fn resolve(
        subst: &Substitution,
        meta: Typed,
    ) -> Typed {
        Typed::new(meta.span, subst.apply_poly(&meta.ty))
    }
}
