//! JSON 诊断渲染器
//!
//! 输出与 Language Server Protocol 诊断结构兼容的 JSON（行列从 0 开始）

use crate::util::diagnostic::{Diagnostic, Severity};
use crate::util::span::Span;
use serde::Serialize;
use serde_json::to_string_pretty;

/// LSP 位置
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LspPosition {
    pub line: u32,
    pub character: u32,
}

/// LSP 位置范围
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LspRange {
    pub start: LspPosition,
    pub end: LspPosition,
}

/// LSP 诊断结构
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LspDiagnostic {
    pub range: Option<LspRange>,
    /// 1 = Error, 2 = Warning, 3 = Information, 4 = Hint
    pub severity: u8,
    pub code: String,
    pub source: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// JSON 诊断渲染器
#[derive(Debug, Clone)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// 渲染诊断为 JSON 字符串
    pub fn render(diagnostic: &Diagnostic) -> String {
        to_string_pretty(&Self::to_lsp_diagnostic(diagnostic)).unwrap_or_else(|_| "{}".to_string())
    }

    /// 渲染多个诊断
    pub fn render_all(diagnostics: &[Diagnostic]) -> String {
        let lsp: Vec<LspDiagnostic> = diagnostics.iter().map(Self::to_lsp_diagnostic).collect();
        to_string_pretty(&lsp).unwrap_or_else(|_| "[]".to_string())
    }

    /// 转换为 LSP 诊断结构
    pub fn to_lsp_diagnostic(diagnostic: &Diagnostic) -> LspDiagnostic {
        LspDiagnostic {
            range: diagnostic.span.as_ref().map(Self::span_to_range),
            severity: match diagnostic.severity {
                Severity::Error => 1,
                Severity::Warning => 2,
                Severity::Info => 3,
                Severity::Hint => 4,
            },
            code: diagnostic.code.clone(),
            source: "elm-infer",
            message: diagnostic.message.clone(),
            help: Some(diagnostic.help.clone()).filter(|h| !h.is_empty()),
        }
    }

    fn span_to_range(span: &Span) -> LspRange {
        let position = |line: usize, column: usize| LspPosition {
            line: line.saturating_sub(1) as u32,
            character: column.saturating_sub(1) as u32,
        };
        LspRange {
            start: position(span.start.line, span.start.column),
            end: position(span.end.line, span.end.column),
        }
    }
}
