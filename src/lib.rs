//! # Shipwright
//!
//! A small web backend that turns a one-line goal into a ready-to-deploy
//! project repository.
//!
//! This library provides:
//! - An HTTP API with a throttled login gate and an agent endpoint
//! - A tool-calling agent session around a single project tool
//! - A four-step pipeline: provision a repository, pick a stack,
//!   generate the code, commit and push
//! - A process-wide word budget that caps how much model output the
//!   agent may spend
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a prompt via the API
//! 2. Seed context with the system prompt and the single project tool
//! 3. Call LLM, parse response, execute any tool calls
//! 4. Feed results back to LLM, repeat until it answers in plain text
//!
//! ## Example
//!
//! ```rust,ignore
//! use shipwright::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod budget;
pub mod config;
pub mod git;
pub mod github;
pub mod llm;
pub mod project;
pub mod throttle;
pub mod tools;

pub use config::Config;
