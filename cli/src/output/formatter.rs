//! Terminal formatting for tools and tool results

use dialtone_core::config::ParameterSpec;
use dialtone_core::tools::{Tool, ToolFailureKind};
use dialtone_core::ToolResult;

// ANSI color codes
pub const GRAY: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[97m";
pub const GREEN: &str = "\x1b[92m";
pub const RED: &str = "\x1b[91m";
pub const YELLOW: &str = "\x1b[93m";
pub const RESET: &str = "\x1b[0m";

const MAX_DISPLAY_CHARS: usize = 200;

/// Status of tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Executing,
    Success,
    Error,
}

/// Formatter for tool output, optionally without colors
#[derive(Debug, Clone, Copy)]
pub struct ToolOutputFormatter {
    color: bool,
    truncate: bool,
}

impl ToolOutputFormatter {
    pub fn new() -> Self {
        Self {
            color: true,
            truncate: true,
        }
    }

    /// Plain text output, for pipes and tests
    pub fn plain() -> Self {
        Self {
            color: false,
            truncate: true,
        }
    }

    /// Print whole results instead of a preview
    pub fn full(mut self) -> Self {
        self.truncate = false;
        self
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Format tool execution status with colored dot
    pub fn format_tool_status(&self, tool_name: &str, arguments: &str, status: ToolStatus) -> String {
        let dot_color = match status {
            ToolStatus::Executing => WHITE,
            ToolStatus::Success => GREEN,
            ToolStatus::Error => RED,
        };

        format!("{} {}({})", self.paint(dot_color, "⏺"), tool_name, arguments)
    }

    /// Format a finished invocation as a status line plus the result body
    pub fn format_tool_result(&self, tool_name: &str, arguments: &str, result: &ToolResult) -> String {
        let status = if result.success {
            ToolStatus::Success
        } else {
            ToolStatus::Error
        };
        let mut output = self.format_tool_status(tool_name, arguments, status);

        let mut details = Vec::new();
        if let Some(code) = result.status {
            details.push(format!("HTTP {}", code));
        }
        if let Some(kind) = result.failure {
            details.push(failure_label(kind).to_string());
        }
        if let Some(ms) = result.duration_ms {
            details.push(format!("{}ms", ms));
        }
        if !details.is_empty() {
            output.push(' ');
            output.push_str(&self.paint(GRAY, &format!("[{}]", details.join(", "))));
        }

        let content = result.content.trim();
        if !content.is_empty() {
            let display = if self.truncate {
                truncate_chars(content, MAX_DISPLAY_CHARS)
            } else {
                content.to_string()
            };
            output.push_str(&format!("\n  ⎿  {}", display.replace('\n', "\n     ")));
        }

        output
    }

    /// Format a tool as `name(param: type, ...)` followed by its description
    pub fn format_tool_signature(&self, tool: &dyn Tool) -> String {
        let parameters = tool
            .signature()
            .iter()
            .map(format_parameter)
            .collect::<Vec<_>>()
            .join(", ");

        let marker = if tool.is_builtin() {
            self.paint(YELLOW, " (built-in)")
        } else {
            String::new()
        };
        format!(
            "📦 {}({}){}\n   {}",
            tool.name(),
            parameters,
            marker,
            self.paint(GRAY, tool.description())
        )
    }
}

impl Default for ToolOutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_parameter(parameter: &ParameterSpec) -> String {
    let mut text = format!(
        "{}{}: {}",
        parameter.name,
        if parameter.required { "" } else { "?" },
        parameter.param_type
    );
    if let Some(default) = &parameter.default_value {
        text.push_str(&format!(" = {}", default));
    }
    text
}

fn failure_label(kind: ToolFailureKind) -> &'static str {
    match kind {
        ToolFailureKind::MissingRequiredParameter => "missing parameter",
        ToolFailureKind::ParameterCoercion => "bad parameter",
        ToolFailureKind::InvalidArguments => "invalid arguments",
        ToolFailureKind::Http => "http error",
        ToolFailureKind::Transport => "transport error",
        ToolFailureKind::Execution => "execution error",
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
