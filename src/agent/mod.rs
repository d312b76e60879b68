//! Agent module - the core conversation loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Seed the conversation with the user's prompt
//! 2. Call the model with the available tool declarations
//! 3. If the model requests function calls, dispatch them in order and
//!    feed the responses back as one user turn
//! 4. Repeat until the model produces final text or the iteration budget
//!    is exhausted

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError, RunOutcome};
pub use prompt::build_system_prompt;
