//! 表达式类型推断
//!
//! 每种表达式形式：先推断子表达式，再合一用法所隐含的约束，
//! 返回带类型标注的节点。

use super::patterns::PatternBindings;
use super::Inferrer;
use crate::frontend::core::ast::{BinOp, Expr, ExprKind, LetBinding, Pattern};
use crate::frontend::core::type_system::{instantiate, MonoType, SuperType};
use crate::frontend::typecheck::errors::{TypeError, TypeResult};
use crate::frontend::typecheck::prelude;
use crate::frontend::typecheck::typed::Typed;
use crate::util::span::Span;
use std::collections::{BTreeMap, HashSet};

fn type_of(expr: &Expr<Typed>) -> MonoType {
    expr.meta.mono_type().clone()
}

impl Inferrer<'_> {
    /// 推断表达式
    pub fn infer_expr(
        &mut self,
        expr: &Expr<Span>,
    ) -> TypeResult<Expr<Typed>> {
        self.nested(expr.meta, |this| this.infer_expr_kind(expr))
    }

    /// 逐形式分派；较大的规则放在各自的方法里，保持每层递归的栈帧较小
    fn infer_expr_kind(
        &mut self,
        expr: &Expr<Span>,
    ) -> TypeResult<Expr<Typed>> {
        let span = expr.meta;
        let (kind, ty) = match &expr.kind {
            ExprKind::Unit => (ExprKind::Unit, MonoType::Unit),
            ExprKind::Integer(n) => (
                ExprKind::Integer(*n),
                self.fresh_constrained(SuperType::Number),
            ),
            ExprKind::Hex(n) => (
                ExprKind::Hex(*n),
                self.fresh_constrained(SuperType::Number),
            ),
            ExprKind::Float(x) => (ExprKind::Float(*x), MonoType::Float),
            ExprKind::String(s) => (ExprKind::String(s.clone()), MonoType::String),
            ExprKind::Char(c) => (ExprKind::Char(*c), MonoType::Char),
            ExprKind::Var(name) => {
                let ty = self.lookup(name, span)?;
                (ExprKind::Var(name.clone()), ty)
            }
            ExprKind::Tuple(a, b) => self.infer_tuple(a, b)?,
            ExprKind::Tuple3(a, b, c) => self.infer_tuple3(a, b, c)?,
            ExprKind::List(items) => self.infer_list(items)?,
            ExprKind::Lambda { args, body } => self.infer_lambda(args, body)?,
            ExprKind::Record(fields) => self.infer_record(fields)?,
            ExprKind::RecordAccessFunction(field) => {
                let base = self.fresh();
                let field_ty = self.fresh();
                let record = MonoType::extensible_record(base, [(field.clone(), field_ty.clone())]);
                (
                    ExprKind::RecordAccessFunction(field.clone()),
                    MonoType::function(record, field_ty),
                )
            }
            ExprKind::RecordAccess { record, field } => self.infer_record_access(record, field)?,
            ExprKind::RecordUpdate { record, updates } => {
                self.infer_record_update(record, updates, span)?
            }
            ExprKind::Parenthesized(inner) => {
                let inner = self.infer_expr(inner)?;
                let ty = type_of(&inner);
                (ExprKind::Parenthesized(Box::new(inner)), ty)
            }
            ExprKind::Application { function, args } => self.infer_application(function, args)?,
            ExprKind::Operator { op, left, right } => self.infer_operator(*op, left, right)?,
            ExprKind::OperatorFunction(op) => {
                (ExprKind::OperatorFunction(*op), self.operator_type(*op))
            }
            ExprKind::Negate(inner) => {
                let inner = self.infer_expr(inner)?;
                let number = self.fresh_constrained(SuperType::Number);
                self.unify(&number, &type_of(&inner), inner.meta.span)?;
                (ExprKind::Negate(Box::new(inner)), number)
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.infer_if(condition, then_branch, else_branch)?,
            ExprKind::Let { bindings, body } => self.infer_let(bindings, body)?,
            ExprKind::Case { subject, branches } => self.infer_case(subject, branches)?,
            ExprKind::Glsl(_) => return Err(TypeError::unsupported("glsl", span)),
        };
        Ok(Expr::new(kind, Typed::mono(span, ty)))
    }

    fn infer_tuple(
        &mut self,
        a: &Expr<Span>,
        b: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let a = self.infer_expr(a)?;
        let b = self.infer_expr(b)?;
        let ty = MonoType::tuple(type_of(&a), type_of(&b));
        Ok((ExprKind::Tuple(Box::new(a), Box::new(b)), ty))
    }

    fn infer_tuple3(
        &mut self,
        a: &Expr<Span>,
        b: &Expr<Span>,
        c: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let a = self.infer_expr(a)?;
        let b = self.infer_expr(b)?;
        let c = self.infer_expr(c)?;
        let ty = MonoType::tuple3(type_of(&a), type_of(&b), type_of(&c));
        Ok((
            ExprKind::Tuple3(Box::new(a), Box::new(b), Box::new(c)),
            ty,
        ))
    }

    fn infer_lambda(
        &mut self,
        args: &[Pattern<Span>],
        body: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        self.scoped(|this| {
            let mut bindings = PatternBindings::new();
            let args = this.infer_patterns(args, &mut bindings)?;
            this.bind_all(bindings);
            let body = this.infer_expr(body)?;
            let ty = MonoType::curried(
                args.iter().map(|p| p.meta.mono_type().clone()).collect(),
                type_of(&body),
            );
            Ok((
                ExprKind::Lambda {
                    args,
                    body: Box::new(body),
                },
                ty,
            ))
        })
    }

    /// 记录字面量；重复字段时后者覆盖前者
    fn infer_record(
        &mut self,
        fields: &[(String, Expr<Span>)],
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let mut typed = Vec::with_capacity(fields.len());
        let mut row = BTreeMap::new();
        for (name, value) in fields {
            let value = self.infer_expr(value)?;
            row.insert(name.clone(), type_of(&value));
            typed.push((name.clone(), value));
        }
        Ok((ExprKind::Record(typed), MonoType::Record(row)))
    }

    fn infer_record_access(
        &mut self,
        record: &Expr<Span>,
        field: &str,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let record = self.infer_expr(record)?;
        let base = self.fresh();
        let field_ty = self.fresh();
        let row = MonoType::extensible_record(base, [(field, field_ty.clone())]);
        self.unify(&row, &type_of(&record), record.meta.span)?;
        Ok((
            ExprKind::RecordAccess {
                record: Box::new(record),
                field: field.to_string(),
            },
            field_ty,
        ))
    }

    fn infer_record_update(
        &mut self,
        record: &str,
        updates: &[(String, Expr<Span>)],
        span: Span,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let record_ty = self.lookup(record, span)?;
        let mut typed = Vec::with_capacity(updates.len());
        let mut row = BTreeMap::new();
        for (name, value) in updates {
            let value = self.infer_expr(value)?;
            row.insert(name.clone(), type_of(&value));
            typed.push((name.clone(), value));
        }
        let base = self.fresh();
        self.unify(&MonoType::extensible_record(base, row), &record_ty, span)?;
        Ok((
            ExprKind::RecordUpdate {
                record: record.to_string(),
                updates: typed,
            },
            record_ty,
        ))
    }

    fn infer_application(
        &mut self,
        function: &Expr<Span>,
        args: &[Expr<Span>],
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let function = self.infer_expr(function)?;
        let (args, ty) = self.apply_args(type_of(&function), args)?;
        Ok((
            ExprKind::Application {
                function: Box::new(function),
                args,
            },
            ty,
        ))
    }

    fn infer_operator(
        &mut self,
        op: BinOp,
        left: &Expr<Span>,
        right: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let op_ty = self.operator_type(op);
        let (left, partial) = self.apply_arg(op_ty, left)?;
        let (right, ty) = self.apply_arg(partial, right)?;
        Ok((
            ExprKind::Operator {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        ))
    }

    fn infer_if(
        &mut self,
        condition: &Expr<Span>,
        then_branch: &Expr<Span>,
        else_branch: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let condition = self.infer_expr(condition)?;
        self.unify(&MonoType::Bool, &type_of(&condition), condition.meta.span)?;
        let then_branch = self.infer_expr(then_branch)?;
        let else_branch = self.infer_expr(else_branch)?;
        let ty = type_of(&then_branch);
        self.unify(&ty, &type_of(&else_branch), else_branch.meta.span)?;
        Ok((
            ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            ty,
        ))
    }

    fn infer_let(
        &mut self,
        bindings: &[LetBinding<Span>],
        body: &Expr<Span>,
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        self.scoped(|this| {
            let bindings = this.infer_let_bindings(bindings)?;
            let body = this.infer_expr(body)?;
            let ty = type_of(&body);
            Ok((
                ExprKind::Let {
                    bindings,
                    body: Box::new(body),
                },
                ty,
            ))
        })
    }

    /// 每个分支的模式与被匹配值合一，分支体与结果合一
    fn infer_case(
        &mut self,
        subject: &Expr<Span>,
        branches: &[(Pattern<Span>, Expr<Span>)],
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let subject = self.infer_expr(subject)?;
        let subject_ty = type_of(&subject);
        let result = self.fresh();
        let mut typed = Vec::with_capacity(branches.len());
        for (pattern, body) in branches {
            let branch = self.scoped(|this| {
                let mut bindings = PatternBindings::new();
                let pattern = this.infer_pattern(pattern, &mut bindings)?;
                this.unify(&subject_ty, pattern.meta.mono_type(), pattern.meta.span)?;
                this.bind_all(bindings);
                let body = this.infer_expr(body)?;
                this.unify(&result, &type_of(&body), body.meta.span)?;
                Ok((pattern, body))
            })?;
            typed.push(branch);
        }
        Ok((
            ExprKind::Case {
                subject: Box::new(subject),
                branches: typed,
            },
            result,
        ))
    }

    /// 列表：元素类型依次与同一个新变量合一
    fn infer_list(
        &mut self,
        items: &[Expr<Span>],
    ) -> TypeResult<(ExprKind<Typed>, MonoType)> {
        let elem = self.fresh();
        let mut typed = Vec::with_capacity(items.len());
        for item in items {
            let item = self.infer_expr(item)?;
            self.unify(&elem, &type_of(&item), item.meta.span)?;
            typed.push(item);
        }
        Ok((ExprKind::List(typed), MonoType::list(elem)))
    }

    /// 逐个应用参数
    fn apply_args(
        &mut self,
        function_ty: MonoType,
        args: &[Expr<Span>],
    ) -> TypeResult<(Vec<Expr<Typed>>, MonoType)> {
        let mut current = function_ty;
        let mut typed = Vec::with_capacity(args.len());
        for arg in args {
            let (arg, result) = self.apply_arg(current, arg)?;
            current = result;
            typed.push(arg);
        }
        Ok((typed, current))
    }

    /// 应用一个参数：`f` 的当前类型与 `arg -> β` 合一，结果为 β
    fn apply_arg(
        &mut self,
        function_ty: MonoType,
        arg: &Expr<Span>,
    ) -> TypeResult<(Expr<Typed>, MonoType)> {
        let arg = self.infer_expr(arg)?;
        let result = self.fresh();
        let expected = MonoType::function(type_of(&arg), result.clone());
        self.unify(&function_ty, &expected, arg.meta.span)?;
        Ok((arg, result))
    }

    fn operator_type(
        &mut self,
        op: BinOp,
    ) -> MonoType {
        instantiate(&prelude::operator_scheme(op), &mut *self.supply)
    }

    /// let 绑定：按顺序推断，每个函数绑定对自身与后续绑定可见，不做泛化
    fn infer_let_bindings(
        &mut self,
        bindings: &[LetBinding<Span>],
    ) -> TypeResult<Vec<LetBinding<Typed>>> {
        let mut seen = HashSet::new();
        let mut typed = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding {
                LetBinding::Function { name, args, body } => {
                    if !seen.insert(name.clone()) {
                        return Err(TypeError::duplicate_binding(name, body.meta));
                    }
                    let self_ty = self.fresh();
                    self.env.add_var(name.clone(), self_ty.clone().into());
                    let (args, body) = self.scoped(|this| {
                        let mut arg_bindings = PatternBindings::new();
                        let args = this.infer_patterns(args, &mut arg_bindings)?;
                        this.bind_all(arg_bindings);
                        let body = this.infer_expr(body)?;
                        Ok((args, body))
                    })?;
                    let fn_ty = MonoType::curried(
                        args.iter().map(|p| p.meta.mono_type().clone()).collect(),
                        type_of(&body),
                    );
                    self.unify(&self_ty, &fn_ty, body.meta.span)?;
                    typed.push(LetBinding::Function {
                        name: name.clone(),
                        args,
                        body,
                    });
                }
                LetBinding::Destructuring { pattern, body } => {
                    let body = self.infer_expr(body)?;
                    let mut pattern_bindings = PatternBindings::new();
                    let pattern = self.infer_pattern(pattern, &mut pattern_bindings)?;
                    self.unify(pattern.meta.mono_type(), &type_of(&body), body.meta.span)?;
                    for name in pattern_bindings.names() {
                        if !seen.insert(name.clone()) {
                            return Err(TypeError::duplicate_binding(name, pattern.meta.span));
                        }
                    }
                    self.bind_all(pattern_bindings);
                    typed.push(LetBinding::Destructuring { pattern, body });
                }
            }
        }
        Ok(typed)
    }
}
