//! Output rendering abstraction for corral.
//!
//! Defines the [`Renderer`] trait that decouples the agent loop from the
//! display layer. [`StdoutRenderer`] prints to the terminal; tests substitute
//! a recorder.

use colored::Colorize;
use serde_json::Value;

use crate::provider::TokenUsage;
use crate::tools::ToolResult;

/// Trait for rendering agent progress and results.
pub trait Renderer {
    /// Called just before a tool runs.
    fn tool_call(&mut self, name: &str, arguments: &Value);

    /// Called once a tool has produced its result.
    fn tool_result(&mut self, name: &str, result: &ToolResult);

    /// Called with the model's final answer.
    fn answer(&mut self, text: &str);

    /// Called when the run stops because the round-trip ceiling was hit.
    fn budget_exhausted(&mut self, round_trips: usize);
}

/// Renders agent output to stdout.
///
/// A one-line trace is always printed per tool call; verbose mode adds the
/// raw arguments and the tool's result.
pub struct StdoutRenderer {
    verbose: bool,
}

impl StdoutRenderer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Prints the verbose run summary.
    pub fn summary(&self, prompt: &str, round_trips: usize, usage: &TokenUsage) {
        println!("{} {}", "User prompt:".dimmed(), prompt);
        println!("{} {}", "Model calls:".dimmed(), round_trips);
        println!(
            "{} {}",
            "Prompt tokens:".dimmed(),
            format_number(usage.input_tokens)
        );
        println!(
            "{} {}",
            "Response tokens:".dimmed(),
            format_number(usage.output_tokens)
        );
    }
}

impl Renderer for StdoutRenderer {
    fn tool_call(&mut self, name: &str, arguments: &Value) {
        println!("{}", call_line(name, arguments, self.verbose));
    }

    fn tool_result(&mut self, _name: &str, result: &ToolResult) {
        if self.verbose {
            println!("{}", result_line(result));
        }
    }

    fn answer(&mut self, text: &str) {
        println!("{}", text);
    }

    fn budget_exhausted(&mut self, round_trips: usize) {
        eprintln!(
            "{}",
            format!("Stopped after {round_trips} model calls without a final answer.").dimmed()
        );
    }
}

/// The trace line printed before a tool runs.
fn call_line(name: &str, arguments: &Value, verbose: bool) -> String {
    if verbose {
        format!("Calling function: {}({})", name.cyan(), arguments)
    } else {
        format!(" - Calling function: {}", name.cyan())
    }
}

fn result_line(result: &ToolResult) -> String {
    let arrow = if result.is_error {
        "->".red()
    } else {
        "->".green()
    };
    format!("{} {}", arrow, result.content)
}

/// Formats a count with thousands separators. Example: `1,234`.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_line() {
        colored::control::set_override(false);
        let args = json!({"directory": "pkg"});
        assert_eq!(
            call_line("get_files_info", &args, false),
            " - Calling function: get_files_info"
        );
        assert_eq!(
            call_line("get_files_info", &args, true),
            "Calling function: get_files_info({\"directory\":\"pkg\"})"
        );
    }

    #[test]
    fn test_result_line() {
        colored::control::set_override(false);
        assert_eq!(
            result_line(&ToolResult::success("- a.py".into())),
            "-> - a.py"
        );
        assert_eq!(
            result_line(&ToolResult::error("Error: Unknown function: x".into())),
            "-> Error: Unknown function: x"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_234), "1,234");
        assert_eq!(format_number(128_000), "128,000");
    }
}
