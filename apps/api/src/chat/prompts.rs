// Per-turn task prompts. All escalation policy lives here as instructions to the model.

/// Turn task template.
/// Replace: {name}, {message}
pub const TURN_TASK_TEMPLATE: &str = r#"Current user message: {message}
Respond naturally as yourself, {name}.

IMPORTANT TOOL USAGE:
- Try to encourage users to share their email if they seem interested in connecting or hiring or in getting in touch in any way.
- If the user shares their email or wants to connect, use the send_email tool with subject 'New Contact: <Name>' and a message including their name, email, and a summary of the whole conversation.
- If you cannot answer a question, use the send_email tool with subject 'Unanswered Question' and a message including the exact user question and a short summary of the whole conversation.
- Do not expose tool calls to the user, just answer naturally."#;

/// Prepended when there is prior history. Replace: {transcript}
pub const CONTEXT_SECTION_TEMPLATE: &str = "Conversation so far:\n{transcript}\n";

/// Replace: {name}
pub const EXPECTED_OUTPUT_TEMPLATE: &str = "A short, natural first-person reply from {name}.";
