//! 类型系统子模块
//!
//! - var: 类型变量、超类约束、新变量来源
//! - mono: 单态类型与多态类型
//! - substitute: 替换代数
//! - unify: 合一（含行合一）
//! - scheme: 泛化与实例化
//! - normalize: 规范化与 alpha 等价
//! - display: 类型渲染
//! - error: 合一错误

pub mod display;
pub mod error;
pub mod mono;
pub mod normalize;
pub mod scheme;
pub mod substitute;
pub mod unify;
pub mod var;

// 重新导出主要类型
pub use var::{SuperType, TypeVar, TypeVarId, TypeVarSupply};
pub use mono::{Fields, MonoType, PolyType};
pub use substitute::Substitution;
pub use unify::{unify, Unifier};
pub use scheme::{generalize, instantiate};
pub use normalize::{alpha_eq, letter_name, normalize, normalize_mono};
pub use display::TypePrinter;
pub use error::UnifyError;
