//! 合一错误定义

use super::mono::MonoType;
use super::var::TypeVar;
use thiserror::Error;

/// 合一失败
///
/// 不带源码位置；推断器在向上传递时补充位置
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// 构造器不兼容，或具体类型不满足变量的约束
    #[error("type mismatch: expected {expected}, found {actual}")]
    Mismatch {
        expected: MonoType,
        actual: MonoType,
    },

    /// 变量出现在要绑定的类型中（无限类型）
    #[error("infinite type: {var} occurs in {ty}")]
    OccursCheck { var: TypeVar, ty: MonoType },
}

impl UnifyError {
    pub fn mismatch(
        expected: &MonoType,
        actual: &MonoType,
    ) -> Self {
        UnifyError::Mismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }
}
