//! 顶层声明推断
//!
//! 每个声明使用独立的累积替换：推断完成后把替换应用到整棵子树，
//! 泛化出方案写入模块级作用域，然后丢弃替换。

use super::patterns::PatternBindings;
use super::Inferrer;
use crate::frontend::core::ast::{Declaration, Expr};
use crate::frontend::core::type_system::{generalize, MonoType, PolyType, Substitution};
use crate::frontend::typecheck::errors::TypeResult;
use crate::frontend::typecheck::typed::Typed;
use crate::util::span::Span;
use tracing::debug;

impl Inferrer<'_> {
    /// 推断顶层声明，并把泛化后的方案加入模块作用域
    ///
    /// 声明在自身体内以单态方式可见（单态递归）
    pub fn infer_declaration(
        &mut self,
        decl: &Declaration<Span>,
    ) -> TypeResult<Declaration<Typed>> {
        self.subst = Substitution::new();
        let self_ty = self.fresh();

        let (args, body) = self.scoped(|this| {
            this.env.add_var(decl.name.clone(), PolyType::mono(self_ty.clone()));
            let mut bindings = PatternBindings::new();
            let args = this.infer_patterns(&decl.args, &mut bindings)?;
            this.bind_all(bindings);
            let body = this.infer_expr(&decl.body)?;
            let fn_ty = MonoType::curried(
                args.iter().map(|p| p.meta.mono_type().clone()).collect(),
                body.meta.mono_type().clone(),
            );
            this.unify(&self_ty, &fn_ty, decl.meta)?;
            Ok((args, body))
        })?;

        let subst = std::mem::take(&mut self.subst);
        let resolved = subst.apply(&self_ty);
        let env_vars = self.env.free_type_vars(&subst);
        let scheme = generalize(&env_vars, &resolved);
        debug!("{} : {}", decl.name, scheme);

        let typed = Declaration {
            name: decl.name.clone(),
            args: args
                .into_iter()
                .map(|p| p.map_meta(&mut |m| Self::resolve(&subst, m)))
                .collect(),
            body: body.map_meta(&mut |m| Self::resolve(&subst, m)),
            meta: Typed::new(decl.meta, scheme.clone()),
        };
        self.env.add_var(decl.name.clone(), scheme);
        Ok(typed)
    }

    /// 推断独立表达式，返回已解析的带类型树
    pub fn infer_closed_expr(
        &mut self,
        expr: &Expr<Span>,
    ) -> TypeResult<Expr<Typed>> {
        self.subst = Substitution::new();
        let typed = self.infer_expr(expr)?;
        let subst = std::mem::take(&mut self.subst);
        Ok(typed.map_meta(&mut |m| Self::resolve(&subst, m)))
    }
}
