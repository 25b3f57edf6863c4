//! 推断后的节点元数据

use crate::frontend::core::type_system::{MonoType, PolyType};
use crate::util::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 类型标注
///
/// 表达式与模式节点持有无量化变量的方案；声明节点持有泛化后的方案
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Typed {
    pub span: Span,
    pub ty: PolyType,
}

impl Typed {
    pub fn new(
        span: Span,
        ty: PolyType,
    ) -> Self {
        Self { span, ty }
    }

    pub fn mono(
        span: Span,
        ty: MonoType,
    ) -> Self {
        Self {
            span,
            ty: PolyType::mono(ty),
        }
    }

    /// 节点的单态类型（忽略量化变量）
    pub fn mono_type(&self) -> &MonoType {
        &self.ty.body
    }
}

impl fmt::Display for Typed {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}
