//! # Corral
//!
//! A sandboxed command-line coding agent.
//!
//! This library provides:
//! - A tool-based agent loop driven by the Gemini API
//! - Four file/process tools confined to a working-directory sandbox
//! - A registry that advertises tool schemas to the model and dispatches
//!   the model's function calls locally
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Seed the conversation with the user's prompt
//! 2. Call the model with the conversation and available tools
//! 3. If the model requests function calls, execute them inside the
//!    sandbox and feed the results back
//! 4. Repeat until the model produces final text or the iteration
//!    budget runs out
//!
//! ## Example
//!
//! ```rust,ignore
//! use corral::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let outcome = agent.run("How do I fix the calculator?", false).await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
