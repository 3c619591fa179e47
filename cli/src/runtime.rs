//! Console conversation runtime
//!
//! Stands in for a speech runtime: prints the greeting, then reads one
//! command per line. `<tool> [json]` invokes a tool on its own task; results
//! are printed as they complete, so slow tools do not block the prompt.

use crate::output::{ToolOutputFormatter, ToolStatus};
use async_trait::async_trait;
use dialtone_core::error::{AgentError, Result};
use dialtone_core::tools::ToolFailureKind;
use dialtone_core::{AgentSetup, ConversationRuntime, ToolCall, ToolResult};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, warn};

const HELP: &str = "Commands: <tool> [json arguments], /tools, /instructions, /quit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
enum ConsoleCommand {
    Invoke { tool: String, arguments: Value },
    Tools,
    Instructions,
    Help,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> std::result::Result<ConsoleCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleCommand::Empty);
    }

    if let Some(command) = line.strip_prefix('/') {
        return match command.trim() {
            "tools" => Ok(ConsoleCommand::Tools),
            "instructions" => Ok(ConsoleCommand::Instructions),
            "help" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(format!("Unknown command: /{}", other)),
        };
    }

    let (tool, raw_arguments) = match line.split_once(char::is_whitespace) {
        Some((tool, rest)) => (tool, rest.trim()),
        None => (line, ""),
    };
    let arguments = if raw_arguments.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(raw_arguments)
            .map_err(|e| format!("Arguments for '{}' are not valid JSON: {}", tool, e))?
    };

    Ok(ConsoleCommand::Invoke {
        tool: tool.to_string(),
        arguments,
    })
}

/// Line-oriented runtime over any async reader and writer
pub struct ConsoleRuntime<R, W> {
    input: R,
    output: W,
    formatter: ToolOutputFormatter,
}

impl ConsoleRuntime<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Runtime attached to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            ToolOutputFormatter::new(),
        )
    }
}

impl<R, W> ConsoleRuntime<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W, formatter: ToolOutputFormatter) -> Self {
        Self {
            input,
            output,
            formatter,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

type Finished = (String, String, ToolResult);

enum Event {
    Line(Option<String>),
    Finished(std::result::Result<Finished, tokio::task::JoinError>),
}

#[async_trait]
impl<R, W> ConversationRuntime for ConsoleRuntime<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn run(&mut self, setup: AgentSetup) -> Result<()> {
        let AgentSetup {
            begin_message,
            instructions,
            toolset,
            ..
        } = setup;
        let Self {
            input,
            output,
            formatter,
        } = self;
        let formatter = *formatter;

        write_line(output, &format!("🤖 {}", begin_message)).await?;
        write_line(output, HELP).await?;

        let mut tasks: JoinSet<Finished> = JoinSet::new();
        let mut lines = input.lines();

        loop {
            let event = tokio::select! {
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => Event::Finished(joined),
                line = lines.next_line() => Event::Line(line?),
            };

            let line = match event {
                Event::Finished(Ok((tool, arguments, result))) => {
                    write_line(output, &formatter.format_tool_result(&tool, &arguments, &result))
                        .await?;
                    continue;
                }
                Event::Finished(Err(e)) => {
                    warn!("Tool task failed to complete: {}", e);
                    continue;
                }
                Event::Line(None) => {
                    debug!("Console input closed");
                    break;
                }
                Event::Line(Some(line)) => line,
            };

            match parse_line(&line) {
                Ok(ConsoleCommand::Empty) => {}
                Ok(ConsoleCommand::Quit) => break,
                Ok(ConsoleCommand::Help) => write_line(output, HELP).await?,
                Ok(ConsoleCommand::Instructions) => write_line(output, &instructions).await?,
                Ok(ConsoleCommand::Tools) => {
                    let listing = toolset
                        .iter()
                        .map(|tool| formatter.format_tool_signature(tool.as_ref()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    write_line(output, &listing).await?;
                }
                Ok(ConsoleCommand::Invoke { tool, arguments }) => {
                    if !toolset.contains(&tool) {
                        let message = format!(
                            "Unknown tool: {} (available: {})",
                            tool,
                            toolset.names().join(", ")
                        );
                        write_line(output, &message).await?;
                        continue;
                    }

                    let rendered = arguments.to_string();
                    write_line(
                        output,
                        &formatter.format_tool_status(&tool, &rendered, ToolStatus::Executing),
                    )
                    .await?;

                    let toolset = toolset.clone();
                    tasks.spawn(async move {
                        let call = ToolCall::new(tool.clone(), arguments);
                        let result = match toolset.execute(call).await {
                            Ok(result) => result,
                            Err(e) => ToolResult::error(ToolFailureKind::Execution, e.to_string()),
                        };
                        (tool, rendered, result)
                    });
                }
                Err(message) => write_line(output, &message).await?,
            }
        }

        // Let in-flight calls finish before the session ends
        while let Some(joined) = tasks.join_next().await {
            let (tool, arguments, result) = joined.map_err(|e| AgentError::RuntimeFailed {
                message: e.to_string(),
            })?;
            write_line(output, &formatter.format_tool_result(&tool, &arguments, &result)).await?;
        }

        write_line(output, "👋 Goodbye!").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialtone_core::store::MemoryDocumentStore;
    use dialtone_core::AgentBuilder;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ").unwrap(), ConsoleCommand::Empty);
        assert_eq!(parse_line("/quit").unwrap(), ConsoleCommand::Quit);
        assert_eq!(parse_line("/tools").unwrap(), ConsoleCommand::Tools);
        assert_eq!(
            parse_line(r#"get_weather {"city": "Paris"}"#).unwrap(),
            ConsoleCommand::Invoke {
                tool: "get_weather".to_string(),
                arguments: json!({"city": "Paris"}),
            }
        );
        assert_eq!(
            parse_line("search_web").unwrap(),
            ConsoleCommand::Invoke {
                tool: "search_web".to_string(),
                arguments: json!({}),
            }
        );
        assert!(parse_line("get_weather {city}").is_err());
        assert!(parse_line("/dance").is_err());
    }

    async fn run_script(script: &str) -> String {
        let setup = AgentBuilder::new(Arc::new(MemoryDocumentStore::new()))
            .prepare()
            .await
            .unwrap();
        let mut runtime = ConsoleRuntime::new(
            tokio::io::BufReader::new(script.as_bytes()),
            Vec::new(),
            ToolOutputFormatter::plain(),
        );
        runtime.run(setup).await.unwrap();
        String::from_utf8(runtime.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_session_greets_and_lists_tools() {
        let output = run_script("/tools\n/instructions\n/quit\n").await;
        assert!(output.starts_with("🤖 Hello! I'm your AI assistant."));
        assert!(output.contains("📦 search_web(query: string) (built-in)"));
        assert!(output.contains("IMPORTANT - YOU HAVE ACCESS TO THESE TOOLS:"));
        assert!(output.trim_end().ends_with("👋 Goodbye!"));
    }

    #[tokio::test]
    async fn test_failed_invocation_is_reported_without_network() {
        let output = run_script("search_web {}\nnope {}\n").await;
        assert!(output.contains("⏺ search_web({})"));
        assert!(output.contains("Error: Missing required parameter: query"));
        assert!(output.contains("Unknown tool: nope (available: search_web)"));
    }
}
