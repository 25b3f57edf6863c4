//! 错误转换
//!
//! 推断错误到诊断的映射

use super::codes::ErrorCodeDefinition;
use super::error::Diagnostic;
use crate::frontend::typecheck::{InputError, TypeError};
use crate::frontend::Error;

impl From<&TypeError> for Diagnostic {
    fn from(err: &TypeError) -> Self {
        build(err.kind(), err.to_string(), Some(err.span()))
    }
}

impl From<&InputError> for Diagnostic {
    fn from(err: &InputError) -> Self {
        build(err.kind(), err.to_string(), err.span())
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        match err {
            Error::Type(err) => err.into(),
            Error::Input(err) => err.into(),
            Error::Resource(_) => build("Resource", err.to_string(), None),
        }
    }
}

fn build(
    kind: &str,
    message: String,
    span: Option<crate::util::span::Span>,
) -> Diagnostic {
    let (code, help) = ErrorCodeDefinition::for_kind(kind)
        .map(|def| (def.code, def.help))
        .unwrap_or(("E0000", ""));
    Diagnostic::error(code, message)
        .with_help(help)
        .at(span)
}
