//! 类型变量定义
//!
//! 实现 Hindley-Milner 类型系统中的变量：
//! - TypeVarId: 类型变量标识（推断生成 / 源码命名）
//! - SuperType: 类型变量的超类约束
//! - TypeVar: 标识 + 约束
//! - TypeVarSupply: 单次推断内的新变量计数器

use serde::{Deserialize, Serialize};
use std::fmt;

/// 类型变量标识
///
/// `Generated` 由推断过程产生，`Named` 来自源码中显式写出的类型变量
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeVarId {
    /// 推断生成的变量
    Generated(u32),
    /// 源码命名的变量
    Named(String),
}

impl fmt::Display for TypeVarId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TypeVarId::Generated(n) => write!(f, "t{}", n),
            TypeVarId::Named(name) => write!(f, "{}", name),
        }
    }
}

/// 超类约束
///
/// 限制类型变量可以统一的具体类型集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SuperType {
    /// Int 或 Float
    Number,
    /// String 或 List a
    Appendable,
}

impl SuperType {
    /// 渲染时使用的名称前缀
    pub fn name(&self) -> &'static str {
        match self {
            SuperType::Number => "number",
            SuperType::Appendable => "appendable",
        }
    }
}

impl fmt::Display for SuperType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 类型变量（用于类型推断）
///
/// 替换只看 `id`；约束随变量一起移动，实例化时保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVar {
    pub id: TypeVarId,
    #[serde(default)]
    pub constraint: Option<SuperType>,
}

impl TypeVar {
    /// 创建无约束的生成变量
    pub fn new(index: u32) -> Self {
        TypeVar {
            id: TypeVarId::Generated(index),
            constraint: None,
        }
    }

    /// 创建源码命名的变量
    pub fn named(name: impl Into<String>) -> Self {
        TypeVar {
            id: TypeVarId::Named(name.into()),
            constraint: None,
        }
    }

    /// 附加约束
    pub fn with_constraint(
        mut self,
        constraint: SuperType,
    ) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// 是否带有约束
    pub fn is_constrained(&self) -> bool {
        self.constraint.is_some()
    }
}

impl fmt::Display for TypeVar {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.constraint {
            Some(c) => write!(f, "{}:{}", self.id, c),
            None => write!(f, "{}", self.id),
        }
    }
}

/// 新类型变量的来源
///
/// 由一次推断运行独占，保证同一次运行内变量标识唯一
#[derive(Debug, Clone, Default)]
pub struct TypeVarSupply {
    next: u32,
}

impl TypeVarSupply {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成新的无约束变量
    pub fn fresh(&mut self) -> TypeVar {
        let var = TypeVar::new(self.next);
        self.next += 1;
        var
    }

    /// 生成带约束的新变量
    pub fn fresh_constrained(
        &mut self,
        constraint: Option<SuperType>,
    ) -> TypeVar {
        let mut var = self.fresh();
        var.constraint = constraint;
        var
    }

    /// 已分配的变量数量
    pub fn issued(&self) -> u32 {
        self.next
    }
}
