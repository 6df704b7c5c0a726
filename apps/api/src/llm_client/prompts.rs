// Shared prompt fragments used when framing a task for the reasoning engine.
// Feature-specific templates live in the prompts.rs next to the feature.

/// Appended to every task so the model knows what a finished answer looks like.
/// Replace `{expected_output}`.
pub const EXPECTED_OUTPUT_INSTRUCTION: &str = "\
    This is the expected criteria for your final answer: {expected_output}\n\
    You MUST return the actual complete reply as the final answer. \
    Never include tool names, tool arguments, or tool results in the final answer.";

/// Sent in place of a tool result when the tool budget for the turn is spent.
pub const FINAL_ANSWER_NUDGE: &str =
    "No more tools are available for this turn. Give your final answer now.";
