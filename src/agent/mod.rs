//! Agent module - the tool-calling session around the project tool.
//!
//! The session follows a "tools in a loop" pattern:
//! 1. Seed context with system prompt and user prompt
//! 2. Call LLM with available tools
//! 3. If LLM requests tool call, execute it and feed result back
//! 4. Repeat until LLM produces final response or max iterations reached

mod prompt;
mod session;

pub use prompt::build_system_prompt;
pub use session::AgentSession;
