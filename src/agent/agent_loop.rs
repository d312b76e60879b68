//! Core agent loop implementation.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::llm::{GeminiClient, LlmClient, Message, Part};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// Errors that terminate the conversation loop.
///
/// Tool failures never appear here; they are folded into function
/// responses at the dispatch boundary. Only a failed model call or a
/// malformed reply ends the run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model request failed: {0}")]
    Model(#[source] anyhow::Error),

    #[error("model returned neither text nor function calls")]
    EmptyResponse,

    #[error("no function responses generated")]
    NoFunctionResponses,
}

/// How a run ended, short of a fatal error.
#[derive(Debug)]
pub enum RunOutcome {
    /// The model produced a final textual answer.
    Completed(String),

    /// The iteration budget ran out before a final answer.
    BudgetExhausted { iterations: usize },
}

/// The conversation-driving agent.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(GeminiClient::new(config.api_key.clone()));
        Self::with_client(config, llm)
    }

    /// Create an agent with a custom model client (useful for testing).
    pub fn with_client(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            llm,
            tools: ToolRegistry::new(),
        }
    }

    /// Run the conversation loop for one prompt.
    ///
    /// The history is owned by this call and discarded when it returns;
    /// nothing persists across runs.
    pub async fn run(&self, prompt: &str, verbose: bool) -> Result<RunOutcome, AgentError> {
        let declarations = self.tools.declarations();
        let system_prompt = build_system_prompt(&self.tools);
        let mut history = vec![Message::user_text(prompt)];

        for iteration in 0..self.config.max_iterations {
            tracing::debug!("agent iteration {}", iteration + 1);

            let response = self
                .llm
                .generate_content(&self.config.model, &history, &declarations, &system_prompt)
                .await
                .map_err(AgentError::Model)?;

            if verbose {
                if let Some(usage) = &response.usage {
                    println!("Prompt tokens: {}", usage.prompt_tokens);
                    println!("Response tokens: {}", usage.response_tokens);
                }
            }

            // Model turns are recorded before the reply is inspected, so
            // the history stays auditable even if the run fails below.
            history.extend(response.candidates.iter().cloned());

            if let Some(text) = response.final_text() {
                return Ok(RunOutcome::Completed(text));
            }

            let calls = response.function_calls();
            if calls.is_empty() {
                return Err(AgentError::EmptyResponse);
            }

            let mut responses = Vec::new();
            for call in calls {
                let part = self
                    .tools
                    .dispatch(call, &self.config.workspace_path, verbose)
                    .await;
                if verbose {
                    if let Part::FunctionResponse(fr) = &part {
                        println!("-> {}", fr.response);
                    }
                }
                responses.push(part);
            }

            if responses.is_empty() {
                return Err(AgentError::NoFunctionResponses);
            }
            history.push(Message::function_responses(responses));
        }

        Ok(RunOutcome::BudgetExhausted {
            iterations: self.config.max_iterations,
        })
    }
}
