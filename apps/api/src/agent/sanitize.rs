//! Keeps tool-call syntax out of the text shown to the visitor.

const TOOL_CALL_OPEN: &str = "<tool_call>";
const TOOL_CALL_CLOSE: &str = "</tool_call>";
const TRACE_PREFIXES: [&str; 4] = ["Action:", "Action Input:", "Observation:", "Thought:"];
const FINAL_ANSWER_PREFIX: &str = "Final Answer:";

/// Removes `<tool_call>` blocks, then trims.
///
/// ReAct trace lines (`Thought:`, `Action:`, ...) are dropped only when the text
/// carries a `Final Answer:` line; otherwise such lines are ordinary reply text.
/// An unterminated `<tool_call>` swallows the rest of the text.
pub fn strip_tool_markup(text: &str) -> String {
    let mut visible = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(TOOL_CALL_OPEN) {
        visible.push_str(&rest[..start]);
        rest = match rest[start..].find(TOOL_CALL_CLOSE) {
            Some(end) => &rest[start + end + TOOL_CALL_CLOSE.len()..],
            None => "",
        };
    }
    visible.push_str(rest);

    let is_trace = visible
        .lines()
        .any(|line| line.trim_start().starts_with(FINAL_ANSWER_PREFIX));
    if !is_trace {
        return visible.trim().to_string();
    }

    let kept: Vec<&str> = visible
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !TRACE_PREFIXES.iter().any(|p| line.starts_with(p))
        })
        .map(|line| {
            line.trim_start()
                .strip_prefix(FINAL_ANSWER_PREFIX)
                .map(str::trim_start)
                .unwrap_or(line)
        })
        .collect();

    kept.join("\n").trim().to_string()
}
