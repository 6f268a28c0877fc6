use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

use assistant_tools::dates::default_range;
use assistant_tools::{dispatch, ToolRegistry};
use chat_core::{Message, Role};
use ollama_client::{ModelClient, ModelError};

use crate::config::ChatLoopConfig;
use crate::extract::extract_tool_call;
use crate::prompt::system_prompt;

#[derive(Debug, Error)]
pub enum LoopError {
    /// A failed model call is fatal for the run; there is no retry.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, LoopError>;

/// Terminal outcome of one loop run. `reply` is `None` exactly when the
/// guard tripped; the last tool fields describe the most recent
/// dispatch, useful for debugging a tripped run.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub reply: Option<String>,
    pub steps: usize,
    pub guard_tripped: bool,
    pub last_tool: Option<String>,
    pub last_args: Option<Value>,
    pub last_result: Option<Value>,
}

/// Drives repeated (model turn → maybe tool → result injection) cycles
/// over the caller's transcript until the model answers in plain text or
/// the step budget runs out. The transcript is mutated in place so a
/// caller can carry it across user turns.
pub async fn run_chat_loop(
    messages: &mut Vec<Message>,
    model: &dyn ModelClient,
    registry: &ToolRegistry,
    config: &ChatLoopConfig,
) -> Result<LoopOutcome> {
    run_chat_loop_at(messages, model, registry, config, Local::now().date_naive()).await
}

/// Same as [`run_chat_loop`] with an explicit "today" for the date
/// defaulting policy.
pub async fn run_chat_loop_at(
    messages: &mut Vec<Message>,
    model: &dyn ModelClient,
    registry: &ToolRegistry,
    config: &ChatLoopConfig,
    today: NaiveDate,
) -> Result<LoopOutcome> {
    ensure_system_turn(messages, registry);

    let mut steps = 0usize;
    let mut last_tool: Option<String> = None;
    let mut last_args: Option<Value> = None;
    let mut last_result: Option<Value> = None;

    while steps <= config.max_steps {
        let turn = model.send(messages, config.temperature).await?;
        messages.push(turn.clone());

        let Some(mut request) = extract_tool_call(&turn.content) else {
            log::debug!("final answer after {steps} tool step(s)");
            return Ok(LoopOutcome {
                reply: Some(turn.content),
                steps,
                guard_tripped: false,
                last_tool,
                last_args,
                last_result,
            });
        };

        // Budget exhausted while a tool is still being requested: record
        // the turn but never execute the request.
        if steps == config.max_steps {
            log::warn!(
                "step budget ({}) exhausted; {:?} not executed",
                config.max_steps,
                request.tool
            );
            return Ok(LoopOutcome {
                reply: None,
                steps,
                guard_tripped: true,
                last_tool,
                last_args,
                last_result,
            });
        }

        apply_default_dates(&mut request.args, config.months_back, today);

        log::info!(
            "dispatching {} (step {}/{})",
            request.tool,
            steps + 1,
            config.max_steps
        );
        let result = dispatch(registry, &request).await;

        last_tool = Some(request.tool.clone());
        last_args = Some(Value::Object(request.args.clone()));
        last_result = Some(result.clone());

        messages.push(Message::user(format_tool_result(&request.tool, &result)));
        steps += 1;
    }

    // Unreachable given the guard above; treat as a trip anyway.
    Ok(LoopOutcome {
        reply: None,
        steps,
        guard_tripped: true,
        last_tool,
        last_args,
        last_result,
    })
}

fn ensure_system_turn(messages: &mut Vec<Message>, registry: &ToolRegistry) {
    if messages.iter().any(|turn| turn.role == Role::System) {
        return;
    }
    messages.insert(0, Message::system(system_prompt(registry)));
}

/// Date-range backfill: when either bound is missing, compute the
/// default range and fill only the absent key(s). A caller-supplied
/// bound is never overwritten.
fn apply_default_dates(args: &mut Map<String, Value>, months_back: u32, today: NaiveDate) {
    if args.contains_key("start_date") && args.contains_key("end_date") {
        return;
    }
    let (start, end) = default_range(today, months_back);
    args.entry("start_date".to_string())
        .or_insert_with(|| Value::String(start.to_string()));
    args.entry("end_date".to_string())
        .or_insert_with(|| Value::String(end.to_string()));
}

/// Wire form the result travels back in, as the next user turn.
fn format_tool_result(tool: &str, result: &Value) -> String {
    let payload = serde_json::to_string(result).unwrap_or_else(|_| "null".to_string());
    format!("Tool result for {tool}:\n<tool_result>{payload}</tool_result>")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use assistant_tools::{Tool, ToolError};

    use super::*;

    /// Replays a fixed sequence of assistant turns and counts calls.
    struct ScriptedModel {
        turns: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(turns: &[&str]) -> Self {
            let mut scripted: Vec<String> = turns.iter().map(|turn| turn.to_string()).collect();
            scripted.reverse();
            Self {
                turns: Mutex::new(scripted),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn send(&self, _messages: &[Message], _temperature: f32) -> ollama_client::Result<Message> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let content = self
                .turns
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "out of scripted turns".to_string());
            Ok(Message::assistant(content))
        }
    }

    /// Records every args map it is executed with.
    struct RecordingTool {
        name: &'static str,
        executions: Arc<Mutex<Vec<Map<String, Value>>>>,
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "records executions"
        }

        fn args_schema(&self) -> Value {
            json!({})
        }

        async fn execute(&self, args: Map<String, Value>) -> std::result::Result<Value, ToolError> {
            self.executions.lock().unwrap().push(args);
            Ok(json!({"rows": [1, 2, 3]}))
        }
    }

    fn registry_with_recorders(
        names: &[&'static str],
    ) -> (ToolRegistry, Arc<Mutex<Vec<Map<String, Value>>>>) {
        let executions = Arc::new(Mutex::new(Vec::new()));
        let registry = ToolRegistry::new();
        for name in names {
            registry
                .register(RecordingTool {
                    name,
                    executions: executions.clone(),
                })
                .unwrap();
        }
        (registry, executions)
    }

    fn call(tool: &str) -> String {
        format!("<tool_call>{{\"tool\": \"{tool}\", \"args\": {{}}}}</tool_call>")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 15).unwrap()
    }

    #[tokio::test]
    async fn plain_answer_terminates_immediately() {
        let model = ScriptedModel::new(&["You spent $215.40 on groceries."]);
        let (registry, executions) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::user("groceries last month?")];

        let outcome = run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.reply.as_deref(), Some("You spent $215.40 on groceries."));
        assert_eq!(outcome.steps, 0);
        assert!(!outcome.guard_tripped);
        assert!(outcome.last_tool.is_none());
        assert_eq!(model.call_count(), 1);
        assert!(executions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn two_tool_steps_then_answer() {
        let model = ScriptedModel::new(&[
            &call("tool_a"),
            &call("tool_b"),
            "total is $42",
        ]);
        let (registry, executions) = registry_with_recorders(&["tool_a", "tool_b"]);
        let mut messages = vec![Message::user("how much?")];

        let outcome = run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.reply.as_deref(), Some("total is $42"));
        assert_eq!(outcome.steps, 2);
        assert!(!outcome.guard_tripped);
        assert_eq!(outcome.last_tool.as_deref(), Some("tool_b"));
        assert_eq!(model.call_count(), 3);
        assert_eq!(executions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn third_tool_request_trips_the_guard_without_executing() {
        let model = ScriptedModel::new(&[
            &call("tool_a"),
            &call("tool_b"),
            &call("tool_c"),
        ]);
        let (registry, executions) = registry_with_recorders(&["tool_a", "tool_b", "tool_c"]);
        let mut messages = vec![Message::user("dig deeper")];

        let outcome = run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert!(outcome.guard_tripped);
        assert!(outcome.reply.is_none());
        assert_eq!(outcome.steps, 2);
        assert_eq!(outcome.last_tool.as_deref(), Some("tool_b"));
        assert_eq!(model.call_count(), 3, "at most max_steps + 1 model calls");

        let executed = executions.lock().unwrap();
        assert_eq!(executed.len(), 2, "tool_c must never run");
        // The over-budget assistant turn is still recorded.
        assert!(messages
            .last()
            .map(|turn| turn.content.contains("tool_c"))
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn tool_results_are_injected_as_user_turns() {
        let model = ScriptedModel::new(&[&call("tool_a"), "done"]);
        let (registry, _) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::user("q")];

        run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        let injected = messages
            .iter()
            .find(|turn| turn.content.starts_with("Tool result for tool_a:"))
            .expect("result turn present");
        assert_eq!(injected.role, Role::User);
        assert!(injected
            .content
            .contains("<tool_result>{\"rows\":[1,2,3]}</tool_result>"));

        // Order: system, user, assistant request, result, final answer.
        let roles: Vec<Role> = messages.iter().map(|turn| turn.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
    }

    #[tokio::test]
    async fn missing_dates_are_backfilled_from_months_back() {
        let model = ScriptedModel::new(&[&call("tool_a"), "ok"]);
        let (registry, executions) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::user("spending?")];

        run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        let executed = executions.lock().unwrap();
        assert_eq!(executed[0].get("start_date"), Some(&json!("2025-08-01")));
        assert_eq!(executed[0].get("end_date"), Some(&json!("2025-11-15")));
    }

    #[tokio::test]
    async fn unknown_tool_result_feeds_back_and_loop_continues() {
        let model = ScriptedModel::new(&[&call("no_such_tool"), "sorry, wrong tool"]);
        let (registry, _) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::user("q")];

        let outcome = run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.reply.as_deref(), Some("sorry, wrong tool"));
        assert!(messages
            .iter()
            .any(|turn| turn.content.contains("Unknown tool: no_such_tool")));
    }

    #[tokio::test]
    async fn system_turn_is_inserted_when_absent() {
        let model = ScriptedModel::new(&["hello"]);
        let (registry, _) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::user("hi")];

        run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("tool_call"));
    }

    #[tokio::test]
    async fn existing_system_turn_is_left_alone() {
        let model = ScriptedModel::new(&["hello"]);
        let (registry, _) = registry_with_recorders(&["tool_a"]);
        let mut messages = vec![Message::system("custom contract"), Message::user("hi")];

        run_chat_loop_at(
            &mut messages,
            &model,
            &registry,
            &ChatLoopConfig::default(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(messages[0].content, "custom contract");
    }

    #[test]
    fn apply_default_dates_fills_only_missing_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();

        let mut args = Map::new();
        apply_default_dates(&mut args, 3, today);
        assert_eq!(args.get("start_date"), Some(&json!("2025-08-01")));
        assert_eq!(args.get("end_date"), Some(&json!("2025-11-15")));

        let mut partial = Map::new();
        partial.insert("start_date".to_string(), json!("2025-01-01"));
        apply_default_dates(&mut partial, 3, today);
        assert_eq!(
            partial.get("start_date"),
            Some(&json!("2025-01-01")),
            "caller-supplied bound survives"
        );
        assert_eq!(partial.get("end_date"), Some(&json!("2025-11-15")));

        let mut complete = Map::new();
        complete.insert("start_date".to_string(), json!("2025-01-01"));
        complete.insert("end_date".to_string(), json!("2025-02-01"));
        apply_default_dates(&mut complete, 3, today);
        assert_eq!(complete.get("end_date"), Some(&json!("2025-02-01")));
    }
}
