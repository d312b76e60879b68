//! System prompt for the agent.

use crate::tools::ToolRegistry;

/// Build the fixed system instruction sent with every model call.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:
{tool_descriptions}

All paths you provide should be relative to the working directory. You do not need to specify the working directory in your function calls as it is automatically injected for security reasons.

When the task is complete, respond with plain text summarizing what you found or did instead of another function call."#,
        tool_descriptions = tool_descriptions
    )
}
