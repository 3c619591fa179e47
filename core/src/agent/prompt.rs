//! Instruction text handed to the conversation runtime

use crate::config::SEARCH_WEB_TOOL_NAME;
use crate::tools::Toolset;

const GENERAL_GUIDELINES: &[&str] = &[
    "- When users ask for specific data or APIs, USE the appropriate custom tools",
    "- Always try to use relevant tools rather than saying you cannot help",
    "- Be proactive in using tools to provide accurate and helpful responses",
    "- If you don't have a tool for a specific task, clearly tell the user you cannot perform that action",
];

const SEARCH_WEB_GUIDELINE: &str =
    "- When users ask questions that require external information, USE the search_web tool";

/// Build the full agent instructions: personality, tool reference and guidelines
pub fn build_instructions(base: &str, toolset: &Toolset) -> String {
    let tools_reference = toolset
        .iter()
        .map(|tool| format!("- {}: {}", tool.name(), tool.description()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut guidelines = Vec::new();
    if toolset.contains(SEARCH_WEB_TOOL_NAME) {
        guidelines.push(SEARCH_WEB_GUIDELINE);
    }
    guidelines.extend_from_slice(GENERAL_GUIDELINES);

    format!(
        "{base}\n\n\
         IMPORTANT - YOU HAVE ACCESS TO THESE TOOLS:\n\
         {tools_reference}\n\n\
         TOOL USAGE GUIDELINES:\n\
         {guidelines}\n\n\
         Use these tools actively and appropriately to assist users effectively.",
        base = base,
        tools_reference = tools_reference,
        guidelines = guidelines.join("\n"),
    )
}

/// Build the opening task prompt for a session
pub fn build_session_instruction(begin_message: &str) -> String {
    format!(
        "# Task\n\
         Provide assistance by using the tools that you have access to when needed.\n\
         Begin the conversation by saying: \"{}\"\n",
        begin_message
    )
}
