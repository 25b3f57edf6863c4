//! 单态类型与多态类型定义
//!
//! - MonoType: 单态类型（可包含自由类型变量）
//! - PolyType: 多态类型（类型方案，量化变量 + 类型体）

use super::var::{SuperType, TypeVar, TypeVarId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 记录字段表（字段名唯一，按名称排序以保证遍历顺序确定）
pub type Fields = BTreeMap<String, MonoType>;

/// 单态类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonoType {
    /// 单元类型 `()`
    Unit,
    /// 布尔类型
    Bool,
    /// 字符类型
    Char,
    /// 字符串类型
    String,
    /// 整数类型
    Int,
    /// 浮点类型
    Float,
    /// 类型变量
    Var(TypeVar),
    /// 二元组
    Tuple(Box<MonoType>, Box<MonoType>),
    /// 三元组
    Tuple3(Box<MonoType>, Box<MonoType>, Box<MonoType>),
    /// 列表
    List(Box<MonoType>),
    /// 柯里化函数，多参数函数向右嵌套
    Function {
        from: Box<MonoType>,
        to: Box<MonoType>,
    },
    /// 封闭记录
    Record(Fields),
    /// 可扩展记录：至少包含 `fields`，`base` 为类型变量或具体记录
    ExtensibleRecord {
        base: Box<MonoType>,
        fields: Fields,
    },
}

impl MonoType {
    pub fn var(var: TypeVar) -> Self {
        MonoType::Var(var)
    }

    pub fn list(elem: MonoType) -> Self {
        MonoType::List(Box::new(elem))
    }

    pub fn tuple(
        first: MonoType,
        second: MonoType,
    ) -> Self {
        MonoType::Tuple(Box::new(first), Box::new(second))
    }

    pub fn tuple3(
        first: MonoType,
        second: MonoType,
        third: MonoType,
    ) -> Self {
        MonoType::Tuple3(Box::new(first), Box::new(second), Box::new(third))
    }

    /// 函数箭头 `from -> to`
    pub fn function(
        from: MonoType,
        to: MonoType,
    ) -> Self {
        MonoType::Function {
            from: Box::new(from),
            to: Box::new(to),
        }
    }

    /// 由参数列表构造右嵌套的柯里化函数
    pub fn curried(
        params: Vec<MonoType>,
        result: MonoType,
    ) -> Self {
        params
            .into_iter()
            .rev()
            .fold(result, |acc, param| MonoType::function(param, acc))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, MonoType)>) -> Self {
        MonoType::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn extensible_record<K: Into<String>>(
        base: MonoType,
        fields: impl IntoIterator<Item = (K, MonoType)>,
    ) -> Self {
        MonoType::ExtensibleRecord {
            base: Box::new(base),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 如果是 Var 变体，返回内部 TypeVar
    pub fn type_var(&self) -> Option<&TypeVar> {
        match self {
            MonoType::Var(v) => Some(v),
            _ => None,
        }
    }

    /// 是否为带指定约束的类型变量
    pub fn is_constrained_by(
        &self,
        constraint: SuperType,
    ) -> bool {
        matches!(self, MonoType::Var(v) if v.constraint == Some(constraint))
    }

    /// 是否为内建的原子类型
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            MonoType::Unit
                | MonoType::Bool
                | MonoType::Char
                | MonoType::String
                | MonoType::Int
                | MonoType::Float
        )
    }

    /// 判断类型是否满足超类约束（只看最外层构造器）
    pub fn satisfies(
        &self,
        constraint: SuperType,
    ) -> bool {
        match constraint {
            SuperType::Number => matches!(self, MonoType::Int | MonoType::Float),
            SuperType::Appendable => matches!(self, MonoType::String | MonoType::List(_)),
        }
    }

    /// 自由类型变量，按首次出现的顺序
    pub fn free_type_vars(&self) -> IndexSet<TypeVar> {
        let mut vars = IndexSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    pub(crate) fn collect_vars(
        &self,
        out: &mut IndexSet<TypeVar>,
    ) {
        match self {
            MonoType::Var(v) => {
                out.insert(v.clone());
            }
            MonoType::Tuple(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            MonoType::Tuple3(a, b, c) => {
                a.collect_vars(out);
                b.collect_vars(out);
                c.collect_vars(out);
            }
            MonoType::List(t) => t.collect_vars(out),
            MonoType::Function { from, to } => {
                from.collect_vars(out);
                to.collect_vars(out);
            }
            MonoType::Record(fields) => {
                for ty in fields.values() {
                    ty.collect_vars(out);
                }
            }
            MonoType::ExtensibleRecord { base, fields } => {
                base.collect_vars(out);
                for ty in fields.values() {
                    ty.collect_vars(out);
                }
            }
            _ => {}
        }
    }

    /// occurs check：变量是否出现在类型中
    pub fn occurs(
        &self,
        id: &TypeVarId,
    ) -> bool {
        match self {
            MonoType::Var(v) => &v.id == id,
            MonoType::Tuple(a, b) => a.occurs(id) || b.occurs(id),
            MonoType::Tuple3(a, b, c) => a.occurs(id) || b.occurs(id) || c.occurs(id),
            MonoType::List(t) => t.occurs(id),
            MonoType::Function { from, to } => from.occurs(id) || to.occurs(id),
            MonoType::Record(fields) => fields.values().any(|t| t.occurs(id)),
            MonoType::ExtensibleRecord { base, fields } => {
                base.occurs(id) || fields.values().any(|t| t.occurs(id))
            }
            _ => false,
        }
    }

    /// 函数参数个数（沿右嵌套箭头计数）
    pub fn arity(&self) -> usize {
        match self {
            MonoType::Function { to, .. } => 1 + to.arity(),
            _ => 0,
        }
    }
}

/// 多态类型（类型方案）
///
/// `type_binders` 中的变量在 `body` 中被全称量化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolyType {
    /// 量化变量（按首次出现顺序）
    pub type_binders: Vec<TypeVar>,
    /// 类型体
    pub body: MonoType,
}

impl PolyType {
    /// 创建新的多态类型
    pub fn new(
        type_binders: Vec<TypeVar>,
        body: MonoType,
    ) -> Self {
        PolyType { type_binders, body }
    }

    /// 创建单态类型（无量化变量）
    pub fn mono(body: MonoType) -> Self {
        PolyType {
            type_binders: Vec::new(),
            body,
        }
    }

    /// 对类型体中所有自由变量量化
    pub fn closed(body: MonoType) -> Self {
        let type_binders = body.free_type_vars().into_iter().collect();
        PolyType { type_binders, body }
    }

    /// 检查是否为空泛型（无类型参数）
    pub fn is_mono(&self) -> bool {
        self.type_binders.is_empty()
    }

    /// 是否量化了给定变量
    pub fn binds(
        &self,
        id: &TypeVarId,
    ) -> bool {
        self.type_binders.iter().any(|v| &v.id == id)
    }

    /// 方案中的自由变量（未被量化的变量）
    pub fn free_type_vars(&self) -> IndexSet<TypeVar> {
        self.body
            .free_type_vars()
            .into_iter()
            .filter(|v| !self.binds(&v.id))
            .collect()
    }
}

impl Default for PolyType {
    fn default() -> Self {
        PolyType::mono(MonoType::Unit)
    }
}

impl From<MonoType> for PolyType {
    fn from(body: MonoType) -> Self {
        PolyType::mono(body)
    }
}
