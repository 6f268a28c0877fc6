use assistant_tools::ToolRegistry;

const TOOL_CONTRACT: &str = r#"You are a personal finance chat assistant running locally. You can ask the host app to call TOOLS to fetch data from Lunch Money and compute aggregates.

When you NEED data, emit exactly one XML-style block with the tag tool_call containing a single JSON object. Example:
<tool_call>{"tool": "get_transactions", "args": {"start_date": "2025-07-01", "end_date": "2025-07-31"}}</tool_call>"#;

const TOOL_RULES: &str = r#"Rules:
- Never ask to create, update, delete, split, unsplit, or group transactions.
- If the user asks for changes, explain you're read-only and suggest the Lunch Money UI instead."#;

/// The system turn inserted at position 0 when the caller's transcript
/// lacks one: the tool-use contract plus the registered tool names.
pub fn system_prompt(registry: &ToolRegistry) -> String {
    let mut prompt = String::from(TOOL_CONTRACT);
    prompt.push_str("\n\nAvailable tools (read-only):\n");
    for name in registry.list_tool_names() {
        prompt.push_str("- ");
        prompt.push_str(&name);
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(TOOL_RULES);
    prompt
}
