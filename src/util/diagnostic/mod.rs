//! 统一诊断系统
//!
//! - [`error`] - 诊断数据结构 (Diagnostic, Severity)
//! - [`codes`] - 错误码注册表
//! - [`conversion`] - 推断错误到诊断的转换
//! - [`emitter`] - 文本与 JSON 渲染

pub mod codes;
pub mod conversion;
pub mod emitter;
pub mod error;

// 重新导出
pub use codes::{ErrorCategory, ErrorCodeDefinition};
pub use emitter::{EmitterConfig, JsonEmitter, TextEmitter};
pub use emitter::text::Source;
pub use error::{Diagnostic, Severity};
