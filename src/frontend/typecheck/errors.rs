//! 类型检查错误
//!
//! - TypeError: 推断过程中的类型错误，携带出错节点的位置
//! - InputError: 输入本身的问题（模块、声明、导入）

use crate::frontend::core::type_system::{MonoType, TypePrinter, TypeVar, UnifyError};
use crate::util::span::Span;
use thiserror::Error;

/// 类型错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// 类型不匹配
    #[error("{}", mismatch_message(expected, actual))]
    TypeMismatch {
        expected: MonoType,
        actual: MonoType,
        span: Span,
    },

    /// 无限类型
    #[error("{}", occurs_message(var, ty))]
    OccursCheckFailed {
        var: TypeVar,
        ty: MonoType,
        span: Span,
    },

    /// 未绑定的变量
    #[error("unbound variable `{name}`")]
    UnboundVariable { name: String, span: Span },

    /// 不支持的表达式形式
    #[error("unsupported expression: {form}")]
    UnsupportedExpression { form: String, span: Span },

    /// 嵌套过深
    #[error("expression nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize, span: Span },

    /// 同一模式或 let 块中重复绑定
    #[error("`{name}` is bound more than once")]
    DuplicateBinding { name: String, span: Span },
}

/// 两侧共用一个打印器，变量名在两侧之间保持一致
fn mismatch_message(
    expected: &MonoType,
    actual: &MonoType,
) -> String {
    let mut printer = TypePrinter::new();
    let expected = printer.print(expected);
    let actual = printer.print(actual);
    format!("type mismatch: expected {}, found {}", expected, actual)
}

fn occurs_message(
    var: &TypeVar,
    ty: &MonoType,
) -> String {
    let mut printer = TypePrinter::new();
    let ty = printer.print(ty);
    let var = printer.print(&MonoType::Var(var.clone()));
    format!("infinite type: {} occurs in {}", var, ty)
}

impl TypeError {
    /// 获取错误位置
    pub fn span(&self) -> Span {
        match self {
            TypeError::TypeMismatch { span, .. } => *span,
            TypeError::OccursCheckFailed { span, .. } => *span,
            TypeError::UnboundVariable { span, .. } => *span,
            TypeError::UnsupportedExpression { span, .. } => *span,
            TypeError::NestingTooDeep { span, .. } => *span,
            TypeError::DuplicateBinding { span, .. } => *span,
        }
    }

    /// 为合一错误补充位置
    pub fn from_unify(
        err: UnifyError,
        span: Span,
    ) -> Self {
        match err {
            UnifyError::Mismatch { expected, actual } => TypeError::TypeMismatch {
                expected,
                actual,
                span,
            },
            UnifyError::OccursCheck { var, ty } => TypeError::OccursCheckFailed { var, ty, span },
        }
    }

    pub fn unbound_variable(
        name: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::UnboundVariable {
            name: name.into(),
            span,
        }
    }

    pub fn unsupported(
        form: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::UnsupportedExpression {
            form: form.into(),
            span,
        }
    }

    pub fn duplicate_binding(
        name: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::DuplicateBinding {
            name: name.into(),
            span,
        }
    }

    /// 错误类别名，用于日志与 JSON 输出
    pub fn kind(&self) -> &'static str {
        match self {
            TypeError::TypeMismatch { .. } => "TypeMismatch",
            TypeError::OccursCheckFailed { .. } => "OccursCheckFailed",
            TypeError::UnboundVariable { .. } => "UnboundVariable",
            TypeError::UnsupportedExpression { .. } => "UnsupportedExpression",
            TypeError::NestingTooDeep { .. } => "NestingTooDeep",
            TypeError::DuplicateBinding { .. } => "DuplicateBinding",
        }
    }
}

/// 输入错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// 查询的模块不存在
    #[error("module `{module}` not found")]
    ModuleNotFound { module: String },

    /// 查询的声明不存在
    #[error("declaration `{declaration}` not found in module `{module}`")]
    DeclarationNotFound { module: String, declaration: String },

    /// 同一模块内重复的顶层声明
    #[error("declaration `{declaration}` is defined more than once in module `{module}`")]
    DuplicateDeclaration {
        module: String,
        declaration: String,
        span: Span,
    },

    /// 导入形成环
    #[error("import cycle: {}", cycle.join(" -> "))]
    ImportCycle { cycle: Vec<String> },

    /// 导入了输入中不存在的模块
    #[error("module `{module}` imports unknown module `{import}`")]
    UnknownImport { module: String, import: String },
}

impl InputError {
    pub fn span(&self) -> Option<Span> {
        match self {
            InputError::DuplicateDeclaration { span, .. } => Some(*span),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InputError::ModuleNotFound { .. } => "ModuleNotFound",
            InputError::DeclarationNotFound { .. } => "DeclarationNotFound",
            InputError::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            InputError::ImportCycle { .. } => "ImportCycle",
            InputError::UnknownImport { .. } => "UnknownImport",
        }
    }
}

/// 类型检查结果
pub type TypeResult<T> = Result<T, TypeError>;
