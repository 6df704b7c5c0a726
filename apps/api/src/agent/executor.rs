//! PersonaAgent execution loop.
//!
//! Flow per execution: Planning → (ToolDispatch → Planning)* → Final.
//! Tool rounds are capped at `max_tool_rounds`; the round after the cap is
//! planned with no tools offered, forcing a final answer.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::agent::engine::{AgentMessage, ReasoningEngine, ReasoningRequest, Step, ToolCall};
use crate::agent::sanitize::strip_tool_markup;
use crate::agent::tools::Tool;
use crate::llm_client::prompts::{EXPECTED_OUTPUT_INSTRUCTION, FINAL_ANSWER_NUDGE};
use crate::llm_client::LlmError;
use crate::models::profile::Profile;
use crate::profile::prompts::{
    PERSONA_BACKSTORY_TEMPLATE, PERSONA_GOAL_TEMPLATE, PERSONA_ROLE_TEMPLATE,
};

const ALREADY_NOTIFIED: &str =
    "A notification was already sent during this turn; not sending again.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Reasoning engine failed: {0}")]
    Engine(#[from] LlmError),

    #[error("Agent still requested tools after {0} tool rounds")]
    ToolRoundsExceeded(usize),

    #[error("Agent produced an empty answer")]
    EmptyAnswer,
}

/// Identity the agent impersonates.
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Persona {
    pub fn from_profile(profile: &Profile) -> Self {
        let name = profile.display_name.as_str();
        Self {
            name: name.to_string(),
            role: PERSONA_ROLE_TEMPLATE.replace("{name}", name),
            goal: PERSONA_GOAL_TEMPLATE.replace("{name}", name),
            backstory: PERSONA_BACKSTORY_TEMPLATE
                .replace("{name}", name)
                .replace("{biography}", &profile.biography),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// One unit of work for the agent. Built fresh per turn.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub instructions: String,
    pub expected_output: String,
}

impl TaskRequest {
    fn render(&self) -> String {
        format!(
            "{}\n\n{}",
            self.instructions.trim(),
            EXPECTED_OUTPUT_INSTRUCTION.replace("{expected_output}", &self.expected_output)
        )
    }
}

/// A persona-configured agent with a fixed toolset.
pub struct PersonaAgent {
    persona: Persona,
    tools: Vec<Arc<dyn Tool>>,
    engine: Arc<dyn ReasoningEngine>,
    max_tool_rounds: usize,
}

impl PersonaAgent {
    pub fn new(
        persona: Persona,
        tools: Vec<Arc<dyn Tool>>,
        engine: Arc<dyn ReasoningEngine>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            persona,
            tools,
            engine,
            max_tool_rounds,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Runs one task to completion and returns the visitor-facing text.
    pub async fn execute(&self, task: &TaskRequest) -> Result<String, AgentError> {
        let mut request = ReasoningRequest {
            system: self.persona.system_prompt(),
            messages: vec![AgentMessage::User(task.render())],
            tools: self.tools.iter().map(|t| t.spec()).collect(),
        };
        let mut spent: HashSet<String> = HashSet::new();

        for round in 0..=self.max_tool_rounds {
            let tools_allowed = round < self.max_tool_rounds;
            if !tools_allowed {
                request.tools.clear();
                if round > 0 {
                    request
                        .messages
                        .push(AgentMessage::User(FINAL_ANSWER_NUDGE.to_string()));
                }
            }

            debug!("Planning round {round} (tools allowed: {tools_allowed})");
            match self.engine.next_step(&request).await? {
                Step::Final(text) => {
                    let answer = strip_tool_markup(&text);
                    if answer.is_empty() {
                        return Err(AgentError::EmptyAnswer);
                    }
                    return Ok(answer);
                }
                Step::CallTools { content, calls } => {
                    if !tools_allowed {
                        return Err(AgentError::ToolRoundsExceeded(self.max_tool_rounds));
                    }
                    request.messages.push(AgentMessage::Assistant {
                        content,
                        tool_calls: calls.clone(),
                    });
                    for call in calls {
                        let result = self.dispatch(&call, &mut spent).await;
                        request.messages.push(AgentMessage::ToolResult {
                            call_id: call.id,
                            content: result,
                        });
                    }
                }
            }
        }

        Err(AgentError::ToolRoundsExceeded(self.max_tool_rounds))
    }

    async fn dispatch(&self, call: &ToolCall, spent: &mut HashSet<String>) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!("Agent requested unknown tool '{}'", call.name);
            return format!("Unknown tool: {}", call.name);
        };

        if tool.once_per_execution() && !spent.insert(call.name.clone()) {
            info!("Suppressed repeat call to '{}' in the same turn", call.name);
            return ALREADY_NOTIFIED.to_string();
        }

        info!("Dispatching tool '{}'", call.name);
        tool.invoke(call.arguments.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::agent::engine::testing::{tool_call, ScriptedEngine};
    use crate::agent::tools::{NotificationTool, EMAIL_SENT, SEND_EMAIL_TOOL};
    use crate::notification::testing::RecordingNotifier;

    fn profile() -> Profile {
        Profile::new("Ada Lovelace", "Analyst at Babbage & Co.", "Writes the first programs.")
    }

    fn task() -> TaskRequest {
        TaskRequest {
            instructions: "Current user message: Hi".to_string(),
            expected_output: "A short reply".to_string(),
        }
    }

    fn agent(engine: Arc<dyn ReasoningEngine>, notifier: Arc<RecordingNotifier>) -> PersonaAgent {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(NotificationTool::new(notifier))];
        PersonaAgent::new(Persona::from_profile(&profile()), tools, engine, 3)
    }

    /// Calls the email tool whenever tools are offered; otherwise answers from the last tool result.
    struct AlwaysNotify;

    #[async_trait]
    impl ReasoningEngine for AlwaysNotify {
        async fn next_step(&self, request: &ReasoningRequest) -> Result<Step, LlmError> {
            if request.tools.is_empty() {
                let last = request.tool_results().last().unwrap_or("nothing");
                return Ok(Step::Final(format!("All done ({last})")));
            }
            Ok(Step::CallTools {
                content: None,
                calls: vec![tool_call(
                    "call",
                    SEND_EMAIL_TOOL,
                    json!({"subject": "Fixed subject", "message": "Fixed body"}),
                )],
            })
        }
    }

    #[test]
    fn test_persona_prompts_embed_profile() {
        let persona = Persona::from_profile(&profile());
        assert_eq!(persona.role, "Ada Lovelace - Career Representative");
        assert!(persona.goal.contains("Represent Ada Lovelace professionally"));
        assert!(persona.backstory.starts_with("You are Ada Lovelace. Speak in first person."));
        assert!(persona.backstory.contains("Analyst at Babbage & Co."));
        assert!(persona.system_prompt().contains("Your personal goal is:"));
    }

    #[test]
    fn test_braces_in_profile_text_are_kept_verbatim() {
        let profile = Profile::new("Ada", "Career {goal} section {role}", "Summary {backstory}");
        let prompt = Persona::from_profile(&profile).system_prompt();

        assert!(prompt.contains("Career {goal} section {role}"));
        assert!(prompt.contains("Summary {backstory}"));
        assert_eq!(prompt.matches("Represent Ada professionally").count(), 1);
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tools() {
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(Step::Final(
            "Hello there!".to_string(),
        ))]));
        let notifier = Arc::new(RecordingNotifier::default());

        let answer = agent(engine.clone(), notifier.clone()).execute(&task()).await.unwrap();

        assert_eq!(answer, "Hello there!");
        assert!(notifier.sent().is_empty());
        let requests = engine.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[0].task_text().contains("expected criteria for your final answer: A short reply"));
    }

    #[tokio::test]
    async fn test_tool_result_feeds_back_into_planning() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            Ok(Step::CallTools {
                content: None,
                calls: vec![tool_call(
                    "call_1",
                    SEND_EMAIL_TOOL,
                    json!({"subject": "Unanswered Question", "message": "Q"}),
                )],
            }),
            Ok(Step::Final("I'll find out and get back to you.".to_string())),
        ]));
        let notifier = Arc::new(RecordingNotifier::default());

        let answer = agent(engine.clone(), notifier.clone()).execute(&task()).await.unwrap();

        assert_eq!(answer, "I'll find out and get back to you.");
        assert_eq!(notifier.sent().len(), 1);
        let second = &engine.requests()[1];
        assert_eq!(second.tool_results().collect::<Vec<_>>(), vec![EMAIL_SENT]);
    }

    #[tokio::test]
    async fn test_always_calling_engine_notifies_exactly_once() {
        let notifier = Arc::new(RecordingNotifier::default());

        let answer = agent(Arc::new(AlwaysNotify), notifier.clone())
            .execute(&task())
            .await
            .unwrap();

        assert_eq!(
            notifier.sent(),
            vec![("Fixed subject".to_string(), "Fixed body".to_string())]
        );
        assert!(answer.starts_with("All done"));
        assert!(!answer.contains(SEND_EMAIL_TOOL));
    }

    #[tokio::test]
    async fn test_tools_requested_past_cap_is_error() {
        let calls = || {
            Ok(Step::CallTools {
                content: None,
                calls: vec![tool_call("c", "lookup", json!({}))],
            })
        };
        let engine = Arc::new(ScriptedEngine::new(vec![calls(), calls(), calls(), calls()]));
        let notifier = Arc::new(RecordingNotifier::default());

        let err = agent(engine.clone(), notifier).execute(&task()).await.unwrap_err();

        assert!(matches!(err, AgentError::ToolRoundsExceeded(3)));
        let requests = engine.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests[3].tools.is_empty());
        assert!(requests[0]
            .tool_results()
            .chain(requests[3].tool_results())
            .any(|r| r == "Unknown tool: lookup"));
    }

    #[tokio::test]
    async fn test_zero_round_cap_offers_no_tools() {
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(Step::Final("Hi!".to_string()))]));
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(NotificationTool::new(Arc::new(
            RecordingNotifier::default(),
        )))];
        let agent = PersonaAgent::new(Persona::from_profile(&profile()), tools, engine.clone(), 0);

        assert_eq!(agent.execute(&task()).await.unwrap(), "Hi!");
        assert!(engine.requests()[0].tools.is_empty());
    }

    #[tokio::test]
    async fn test_final_answer_is_stripped_of_tool_markup() {
        let engine = Arc::new(ScriptedEngine::new(vec![Ok(Step::Final(
            "Action: send_email\nAction Input: {}\nFinal Answer: Thanks, talk soon!".to_string(),
        ))]));

        let answer = agent(engine, Arc::new(RecordingNotifier::default()))
            .execute(&task())
            .await
            .unwrap();
        assert_eq!(answer, "Thanks, talk soon!");
    }

    #[tokio::test]
    async fn test_engine_failure_and_empty_answer_are_errors() {
        let engine = Arc::new(ScriptedEngine::new(vec![Err(LlmError::MissingCredentials)]));
        let err = agent(engine, Arc::new(RecordingNotifier::default()))
            .execute(&task())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Engine(LlmError::MissingCredentials)));

        let engine = Arc::new(ScriptedEngine::new(vec![Ok(Step::Final(
            "<tool_call>{}</tool_call>".to_string(),
        ))]));
        let err = agent(engine, Arc::new(RecordingNotifier::default()))
            .execute(&task())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EmptyAnswer));
    }
}
