//! 文本诊断渲染器
//!
//! ```text
//! error [E1002] type mismatch: expected Bool, found number
//!  --> Main.elm:3:8
//!    3 | if 1 then a else b
//!      |    ^
//! help: ...
//! ```

use crate::util::diagnostic::{Diagnostic, Severity};

/// 渲染器配置
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// 是否启用颜色输出
    pub use_colors: bool,
    /// 是否显示源码片段
    pub show_source: bool,
    /// 是否显示帮助信息
    pub show_help: bool,
    /// 指示字符
    pub indicator: char,
    /// 最大显示行数
    pub max_lines: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_source: true,
            show_help: true,
            indicator: '^',
            max_lines: 6,
        }
    }
}

/// 渲染时可用的源码
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub name: &'a str,
    pub content: Option<&'a str>,
}

/// 文本诊断渲染器
#[derive(Debug, Clone, Default)]
pub struct TextEmitter {
    config: EmitterConfig,
}

impl TextEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// 不带源码渲染
    pub fn render(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        self.render_with_source(diagnostic, None)
    }

    /// 渲染诊断；有源码时附带片段
    pub fn render_with_source(
        &self,
        diagnostic: &Diagnostic,
        source: Option<Source<'_>>,
    ) -> String {
        let mut output = self.render_header(diagnostic);
        output.push_str(&self.render_location(diagnostic, source));
        if self.config.show_source {
            if let Some(snippet) = self.render_source_snippet(diagnostic, source) {
                output.push_str(&snippet);
            }
        }
        if self.config.show_help && !diagnostic.help.is_empty() {
            output.push_str(&self.color("bold", "help"));
            output.push_str(": ");
            output.push_str(&diagnostic.help);
            output.push('\n');
        }
        output
    }

    fn render_header(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        let severity = diagnostic.severity.to_string();
        let style = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        };
        if diagnostic.code.is_empty() {
            format!("{}: {}\n", self.color(style, &severity), diagnostic.message)
        } else {
            format!(
                "{} [{}] {}\n",
                self.color(style, &severity),
                self.color("bold", &diagnostic.code),
                diagnostic.message
            )
        }
    }

    fn render_location(
        &self,
        diagnostic: &Diagnostic,
        source: Option<Source<'_>>,
    ) -> String {
        match &diagnostic.span {
            Some(span) if !span.is_dummy() => {
                let name = source.map(|s| s.name).unwrap_or("<unknown>");
                format!(" --> {}:{}:{}\n", name, span.start.line, span.start.column)
            }
            _ => String::new(),
        }
    }

    fn render_source_snippet(
        &self,
        diagnostic: &Diagnostic,
        source: Option<Source<'_>>,
    ) -> Option<String> {
        let span = diagnostic.span.as_ref().filter(|s| !s.is_dummy())?;
        let content = source?.content?;
        let lines: Vec<&str> = content.lines().collect();

        let start_line = span.start.line;
        let end_line = span.end.line.max(start_line);
        let lines_to_show = (end_line - start_line + 1).min(self.config.max_lines);
        let mut output = String::new();

        for i in 0..lines_to_show {
            let line_num = start_line + i;
            let Some(line) = lines.get(line_num - 1) else {
                break;
            };
            output.push_str(&format!("{:>4} | {}\n", line_num, line));
            if i == 0 {
                let start_col = span.start.column.max(1);
                let width = if start_line == end_line {
                    span.end.column.saturating_sub(start_col).max(1)
                } else {
                    line.len().saturating_sub(start_col - 1).max(1)
                };
                let indicators = self.config.indicator.to_string().repeat(width);
                output.push_str(&format!(
                    "     | {}{}\n",
                    " ".repeat(start_col - 1),
                    self.color("error", &indicators)
                ));
            }
        }
        Some(output)
    }

    fn color(
        &self,
        style: &str,
        text: &str,
    ) -> String {
        if !self.config.use_colors {
            return text.to_string();
        }
        match style {
            "error" => format!("\x1b[31m{}\x1b[0m", text),
            "warning" => format!("\x1b[33m{}\x1b[0m", text),
            "info" => format!("\x1b[34m{}\x1b[0m", text),
            "hint" => format!("\x1b[36m{}\x1b[0m", text),
            "bold" => format!("\x1b[1m{}\x1b[0m", text),
            _ => text.to_string(),
        }
    }
}
