//! 统一的类型替换模块
//!
//! 替换是从类型变量标识到单态类型的有限映射。应用替换时沿绑定链继续改写，
//! 并跳过正在展开的变量，保证任意映射下都能终止。

use super::mono::{Fields, MonoType, PolyType};
use super::var::{TypeVar, TypeVarId};
use std::collections::HashMap;
use std::fmt;

/// 类型替换映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: HashMap<TypeVarId, MonoType>,
}

impl Substitution {
    /// 空替换
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// 单个绑定
    pub fn singleton(
        var: &TypeVar,
        ty: MonoType,
    ) -> Self {
        let mut sub = Self::new();
        sub.bind(var, ty);
        sub
    }

    /// 添加绑定
    pub fn bind(
        &mut self,
        var: &TypeVar,
        ty: MonoType,
    ) {
        self.bindings.insert(var.id.clone(), ty);
    }

    /// 获取绑定
    pub fn get(
        &self,
        id: &TypeVarId,
    ) -> Option<&MonoType> {
        self.bindings.get(id)
    }

    /// 检查是否包含变量
    pub fn contains_var(
        &self,
        id: &TypeVarId,
    ) -> bool {
        self.bindings.contains_key(id)
    }

    /// 获取绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 应用替换到单态类型
    pub fn apply(
        &self,
        ty: &MonoType,
    ) -> MonoType {
        if self.bindings.is_empty() {
            return ty.clone();
        }
        let mut active = Vec::new();
        self.apply_chained(ty, &mut active)
    }

    fn apply_chained(
        &self,
        ty: &MonoType,
        active: &mut Vec<TypeVarId>,
    ) -> MonoType {
        match ty {
            MonoType::Var(v) => match self.bindings.get(&v.id) {
                Some(replacement) if !active.contains(&v.id) => {
                    active.push(v.id.clone());
                    let resolved = self.apply_chained(replacement, active);
                    active.pop();
                    resolved
                }
                _ => ty.clone(),
            },
            MonoType::Tuple(a, b) => MonoType::tuple(
                self.apply_chained(a, active),
                self.apply_chained(b, active),
            ),
            MonoType::Tuple3(a, b, c) => MonoType::tuple3(
                self.apply_chained(a, active),
                self.apply_chained(b, active),
                self.apply_chained(c, active),
            ),
            MonoType::List(t) => MonoType::list(self.apply_chained(t, active)),
            MonoType::Function { from, to } => MonoType::function(
                self.apply_chained(from, active),
                self.apply_chained(to, active),
            ),
            MonoType::Record(fields) => MonoType::Record(
                fields
                    .iter()
                    .map(|(name, t)| (name.clone(), self.apply_chained(t, active)))
                    .collect(),
            ),
            MonoType::ExtensibleRecord { base, fields } => {
                let base = self.apply_chained(base, active);
                let fields = fields
                    .iter()
                    .map(|(name, t)| (name.clone(), self.apply_chained(t, active)))
                    .collect();
                flatten_row(base, fields)
            }
            _ => ty.clone(),
        }
    }

    /// 应用替换到多态类型，不触碰方案自身的量化变量
    pub fn apply_poly(
        &self,
        poly: &PolyType,
    ) -> PolyType {
        if !poly
            .type_binders
            .iter()
            .any(|v| self.bindings.contains_key(&v.id))
        {
            return PolyType::new(poly.type_binders.clone(), self.apply(&poly.body));
        }
        let mut restricted = self.clone();
        for v in &poly.type_binders {
            restricted.bindings.remove(&v.id);
        }
        PolyType::new(poly.type_binders.clone(), restricted.apply(&poly.body))
    }

    /// 组合替换：结果等价于先应用 `other` 再应用 `self`
    ///
    /// 两边都有的键保留 `other` 的绑定（再经 `self` 改写）
    pub fn compose(
        &self,
        other: &Substitution,
    ) -> Substitution {
        let mut bindings: HashMap<TypeVarId, MonoType> = other
            .bindings
            .iter()
            .map(|(id, ty)| (id.clone(), self.apply(ty)))
            .collect();
        for (id, ty) in &self.bindings {
            bindings.entry(id.clone()).or_insert_with(|| ty.clone());
        }
        Substitution { bindings }
    }

    /// 就地并入定义域不相交的替换，不改写已有绑定
    ///
    /// `apply` 沿绑定链解析，因此当 `other` 是在 `self` 应用之后求得时，
    /// 结果与 `other.compose(self)` 等价。已有的键保持不变
    pub fn extend(
        &mut self,
        other: Substitution,
    ) {
        for (id, ty) in other.bindings {
            self.bindings.entry(id).or_insert(ty);
        }
    }

    /// 遍历绑定
    pub fn iter(&self) -> impl Iterator<Item = (&TypeVarId, &MonoType)> {
        self.bindings.iter()
    }
}

impl fmt::Display for Substitution {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "[")?;
        for (i, (id, ty)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} := {:?}", id, ty)?;
        }
        write!(f, "]")
    }
}

/// 合并可扩展记录的基类型
///
/// 基类型为记录时，字段并入；为可扩展记录时，字段合并并保留其基类型
pub(crate) fn flatten_row(
    base: MonoType,
    fields: Fields,
) -> MonoType {
    match base {
        MonoType::Record(mut inner) => {
            inner.extend(fields);
            MonoType::Record(inner)
        }
        MonoType::ExtensibleRecord {
            base,
            fields: mut inner,
        } => {
            inner.extend(fields);
            MonoType::ExtensibleRecord { base, fields: inner }
        }
        base => MonoType::ExtensibleRecord {
            base: Box::new(base),
            fields,
        },
    }
}

/// 单遍改写类型变量（不追踪绑定链）
///
/// 实例化和规范化都通过它完成变量重命名
pub(crate) fn map_vars<F>(
    ty: &MonoType,
    lookup: &mut F,
) -> MonoType
where
    F: FnMut(&TypeVar) -> Option<MonoType>,
{
    match ty {
        MonoType::Var(v) => lookup(v).unwrap_or_else(|| ty.clone()),
        MonoType::Tuple(a, b) => MonoType::tuple(map_vars(a, lookup), map_vars(b, lookup)),
        MonoType::Tuple3(a, b, c) => MonoType::tuple3(
            map_vars(a, lookup),
            map_vars(b, lookup),
            map_vars(c, lookup),
        ),
        MonoType::List(t) => MonoType::list(map_vars(t, lookup)),
        MonoType::Function { from, to } => {
            MonoType::function(map_vars(from, lookup), map_vars(to, lookup))
        }
        MonoType::Record(fields) => MonoType::Record(
            fields
                .iter()
                .map(|(name, t)| (name.clone(), map_vars(t, lookup)))
                .collect(),
        ),
        MonoType::ExtensibleRecord { base, fields } => {
            let base = map_vars(base, lookup);
            let fields = fields
                .iter()
                .map(|(name, t)| (name.clone(), map_vars(t, lookup)))
                .collect();
            flatten_row(base, fields)
        }
        _ => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn var(n: u32) -> TypeVar {
        TypeVar::new(n)
    }

    #[test]
    fn test_empty_substitution() {
        let sub = Substitution::new();
        assert_eq!(sub.apply(&MonoType::Int), MonoType::Int);
        assert!(sub.is_empty());
    }

    #[test]
    fn test_apply_to_function() {
        let a = var(0);
        let sub = Substitution::singleton(&a, MonoType::Int);
        let ty = MonoType::function(MonoType::Var(a), MonoType::String);
        assert_eq!(
            sub.apply(&ty),
            MonoType::function(MonoType::Int, MonoType::String)
        );
    }

    #[test]
    fn test_apply_follows_chains() {
        let a = var(0);
        let b = var(1);
        let mut sub = Substitution::new();
        sub.bind(&a, MonoType::Var(b.clone()));
        sub.bind(&b, MonoType::Int);
        assert_eq!(sub.apply(&MonoType::list(MonoType::Var(a))), MonoType::list(MonoType::Int));
    }

    #[test]
    fn test_apply_terminates_on_cycle() {
        let a = var(0);
        let b = var(1);
        let mut sub = Substitution::new();
        sub.bind(&a, MonoType::Var(b.clone()));
        sub.bind(&b, MonoType::Var(a.clone()));
        // 环上的变量展开一圈后停下
        assert_eq!(sub.apply(&MonoType::Var(a.clone())), MonoType::Var(a));
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let sub = Substitution::singleton(&var(0), MonoType::Int);
        assert_eq!(sub.apply(&MonoType::Var(var(1))), MonoType::Var(var(1)));
    }

    #[test]
    fn test_compose_applies_other_first() {
        let a = var(0);
        let b = var(1);
        let s1 = Substitution::singleton(&b, MonoType::Int);
        let s2 = Substitution::singleton(&a, MonoType::Var(b.clone()));
        let composed = s1.compose(&s2);
        assert_eq!(composed.apply(&MonoType::Var(a)), MonoType::Int);
        assert_eq!(composed.apply(&MonoType::Var(b)), MonoType::Int);
    }

    #[test]
    fn test_compose_keeps_shared_key_from_other() {
        let a = var(0);
        let s1 = Substitution::singleton(&a, MonoType::Int);
        let s2 = Substitution::singleton(&a, MonoType::String);
        let composed = s1.compose(&s2);
        assert_eq!(composed.len(), 1);
        assert_eq!(composed.apply(&MonoType::Var(a)), MonoType::String);
    }

    #[test]
    fn test_substitution_idempotent() {
        let a = var(0);
        let b = var(1);
        let s1 = Substitution::singleton(&b, MonoType::Float);
        let s2 = Substitution::singleton(&a, MonoType::list(MonoType::Var(b)));
        let composed = s1.compose(&s2);
        let ty = MonoType::tuple(MonoType::Var(a), MonoType::Char);
        let once = composed.apply(&ty);
        assert_eq!(composed.apply(&once), once);
    }

    #[test]
    fn test_apply_poly_skips_binders() {
        let a = var(0);
        let b = var(1);
        let mut sub = Substitution::new();
        sub.bind(&a, MonoType::Int);
        sub.bind(&b, MonoType::Char);
        let scheme = PolyType::new(
            vec![a.clone()],
            MonoType::function(MonoType::Var(a.clone()), MonoType::Var(b)),
        );
        let applied = sub.apply_poly(&scheme);
        assert_eq!(
            applied.body,
            MonoType::function(MonoType::Var(a), MonoType::Char)
        );
    }

    #[test]
    fn test_row_base_flattens() {
        let r = var(0);
        let row = MonoType::extensible_record(MonoType::Var(r.clone()), [("x", MonoType::Int)]);
        let closed = Substitution::singleton(&r, MonoType::record([("y", MonoType::Char)]));
        assert_eq!(
            closed.apply(&row),
            MonoType::record([("x", MonoType::Int), ("y", MonoType::Char)])
        );

        let s = var(1);
        let open = Substitution::singleton(
            &r,
            MonoType::extensible_record(MonoType::Var(s.clone()), [("y", MonoType::Char)]),
        );
        assert_eq!(
            open.apply(&row),
            MonoType::extensible_record(
                MonoType::Var(s),
                [("x", MonoType::Int), ("y", MonoType::Char)]
            )
        );
    }

    #[test]
    fn test_extend_resolves_through_chains() {
        let a = var(0);
        let b = var(1);
        let mut sub = Substitution::singleton(&a, MonoType::list(MonoType::Var(b.clone())));
        sub.extend(Substitution::singleton(&b, MonoType::Char));
        assert_eq!(sub.len(), 2);
        assert_eq!(
            sub.apply(&MonoType::Var(a)),
            MonoType::list(MonoType::Char)
        );
    }

    #[test]
    fn test_extend_keeps_existing_binding() {
        let a = var(0);
        let mut sub = Substitution::singleton(&a, MonoType::Int);
        sub.extend(Substitution::singleton(&a, MonoType::String));
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.apply(&MonoType::Var(a)), MonoType::Int);
    }

    /// 只含编号 >= `min` 的变量的类型
    fn type_strategy(min: u32) -> impl Strategy<Value = MonoType> {
        let leaf = prop_oneof![
            Just(MonoType::Int),
            Just(MonoType::Char),
            Just(MonoType::Bool),
            (min..min + 6).prop_map(|n| MonoType::Var(var(n))),
        ];
        leaf.prop_recursive(3, 16, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(MonoType::list),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| MonoType::tuple(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| MonoType::function(a, b)),
                inner.prop_map(|t| MonoType::record([("x", t)])),
            ]
        })
    }

    proptest! {
        /// 无环替换应用一次后再应用不再变化
        #[test]
        fn test_apply_is_idempotent(
            ty in type_strategy(0),
            b0 in type_strategy(1),
            b1 in type_strategy(2),
            b2 in type_strategy(3),
        ) {
            let mut sub = Substitution::new();
            sub.bind(&var(0), b0);
            sub.bind(&var(1), b1);
            sub.bind(&var(2), b2);
            let once = sub.apply(&ty);
            prop_assert_eq!(sub.apply(&once), once);
        }

        /// 组合等价于依次应用
        #[test]
        fn test_compose_matches_sequential_apply(
            ty in type_strategy(0),
            first in type_strategy(1),
            second in type_strategy(2),
        ) {
            let s_first = Substitution::singleton(&var(0), first);
            let s_second = Substitution::singleton(&var(1), second);
            let composed = s_second.compose(&s_first);
            prop_assert_eq!(composed.apply(&ty), s_second.apply(&s_first.apply(&ty)));
        }

        /// 并入与组合在解析结果上一致
        #[test]
        fn test_extend_matches_compose(
            ty in type_strategy(0),
            first in type_strategy(1),
            second in type_strategy(2),
        ) {
            let s_first = Substitution::singleton(&var(0), first);
            let s_second = Substitution::singleton(&var(1), second);
            let composed = s_second.compose(&s_first);
            let mut extended = s_first.clone();
            extended.extend(s_second);
            prop_assert_eq!(extended.apply(&ty), composed.apply(&ty));
        }
    }
}
