//! 模式推断
//!
//! 模式既产生类型，也产生名称绑定。绑定先收集到 [`PatternBindings`]，
//! 由调用方决定何时放入作用域。

use super::Inferrer;
use crate::frontend::core::ast::{Pattern, PatternKind};
use crate::frontend::core::type_system::{MonoType, SuperType};
use crate::frontend::typecheck::errors::{TypeError, TypeResult};
use crate::frontend::typecheck::typed::Typed;
use crate::util::span::Span;
use std::collections::BTreeMap;

/// 模式绑定的名称
///
/// 同一组绑定内名称必须唯一
#[derive(Debug, Default)]
pub struct PatternBindings {
    names: Vec<(String, MonoType)>,
}

impl PatternBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定名称，重复时报错
    pub fn bind(
        &mut self,
        name: &str,
        ty: MonoType,
        span: Span,
    ) -> TypeResult<()> {
        if self.contains(name) {
            return Err(TypeError::duplicate_binding(name, span));
        }
        self.names.push((name.to_string(), ty));
        Ok(())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.names.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.names.iter().map(|(name, _)| name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<(String, MonoType)> {
        self.names
    }
}

impl Inferrer<'_> {
    /// 推断模式类型并收集绑定
    pub fn infer_pattern(
        &mut self,
        pattern: &Pattern<Span>,
        bindings: &mut PatternBindings,
    ) -> TypeResult<Pattern<Typed>> {
        let span = pattern.meta;
        self.nested(span, |this| this.infer_pattern_kind(pattern, bindings))
    }

    /// 推断一组模式（lambda 或函数参数），名称在整组内唯一
    pub fn infer_patterns(
        &mut self,
        patterns: &[Pattern<Span>],
        bindings: &mut PatternBindings,
    ) -> TypeResult<Vec<Pattern<Typed>>> {
        patterns
            .iter()
            .map(|p| self.infer_pattern(p, bindings))
            .collect()
    }

    fn infer_pattern_kind(
        &mut self,
        pattern: &Pattern<Span>,
        bindings: &mut PatternBindings,
    ) -> TypeResult<Pattern<Typed>> {
        let span = pattern.meta;
        let (kind, ty) = match &pattern.kind {
            PatternKind::Unit => (PatternKind::Unit, MonoType::Unit),
            PatternKind::Wildcard => (PatternKind::Wildcard, self.fresh()),
            PatternKind::Var(name) => {
                let ty = self.fresh();
                bindings.bind(name, ty.clone(), span)?;
                (PatternKind::Var(name.clone()), ty)
            }
            PatternKind::Integer(n) => (
                PatternKind::Integer(*n),
                self.fresh_constrained(SuperType::Number),
            ),
            PatternKind::Hex(n) => (
                PatternKind::Hex(*n),
                self.fresh_constrained(SuperType::Number),
            ),
            PatternKind::Float(x) => (PatternKind::Float(*x), MonoType::Float),
            PatternKind::String(s) => (PatternKind::String(s.clone()), MonoType::String),
            PatternKind::Char(c) => (PatternKind::Char(*c), MonoType::Char),
            PatternKind::Tuple(a, b) => {
                let a = self.infer_pattern(a, bindings)?;
                let b = self.infer_pattern(b, bindings)?;
                let ty = MonoType::tuple(a.meta.mono_type().clone(), b.meta.mono_type().clone());
                (PatternKind::Tuple(Box::new(a), Box::new(b)), ty)
            }
            PatternKind::Tuple3(a, b, c) => {
                let a = self.infer_pattern(a, bindings)?;
                let b = self.infer_pattern(b, bindings)?;
                let c = self.infer_pattern(c, bindings)?;
                let ty = MonoType::tuple3(
                    a.meta.mono_type().clone(),
                    b.meta.mono_type().clone(),
                    c.meta.mono_type().clone(),
                );
                (
                    PatternKind::Tuple3(Box::new(a), Box::new(b), Box::new(c)),
                    ty,
                )
            }
            PatternKind::List(items) => {
                let elem = self.fresh();
                let mut typed = Vec::with_capacity(items.len());
                for item in items {
                    let item = self.infer_pattern(item, bindings)?;
                    self.unify(&elem, item.meta.mono_type(), item.meta.span)?;
                    typed.push(item);
                }
                (PatternKind::List(typed), MonoType::list(elem))
            }
            PatternKind::Cons { head, tail } => {
                let head = self.infer_pattern(head, bindings)?;
                let tail = self.infer_pattern(tail, bindings)?;
                let list = MonoType::list(head.meta.mono_type().clone());
                self.unify(&list, tail.meta.mono_type(), tail.meta.span)?;
                (
                    PatternKind::Cons {
                        head: Box::new(head),
                        tail: Box::new(tail),
                    },
                    list,
                )
            }
            PatternKind::Record(fields) => {
                let base = self.fresh();
                let mut row = BTreeMap::new();
                for field in fields {
                    let ty = self.fresh();
                    bindings.bind(field, ty.clone(), span)?;
                    row.insert(field.clone(), ty);
                }
                (
                    PatternKind::Record(fields.clone()),
                    MonoType::extensible_record(base, row),
                )
            }
            PatternKind::Alias { pattern, name } => {
                let inner = self.infer_pattern(pattern, bindings)?;
                let ty = inner.meta.mono_type().clone();
                bindings.bind(name, ty.clone(), span)?;
                (
                    PatternKind::Alias {
                        pattern: Box::new(inner),
                        name: name.clone(),
                    },
                    ty,
                )
            }
            PatternKind::Parenthesized(inner) => {
                let inner = self.infer_pattern(inner, bindings)?;
                let ty = inner.meta.mono_type().clone();
                (PatternKind::Parenthesized(Box::new(inner)), ty)
            }
        };
        Ok(Pattern::new(kind, Typed::mono(span, ty)))
    }
}
