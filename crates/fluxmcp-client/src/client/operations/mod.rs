//! MCP client operations modules
//!
//! This module contains focused operation modules for CLIENT-INITIATED MCP operations:
//!
//! - `tools`: Tool operations (list, call)
//! - `resources`: Resource operations (list, read, templates, subscribe/unsubscribe)
//! - `prompts`: Prompt operations (list, get)
//! - `completion`: Argument autocompletion operations
//! - `sampling`: LLM sampling handler registration (SERVER->CLIENT)
//! - `connection`: Connection utilities (ping, set_log_level)
//! - `handlers`: Event handler registration for SERVER->CLIENT requests
//! - `tasks`: Task polling operations (`tasks/list`, `tasks/get`, `tasks/result`, `tasks/cancel`)
//! - `auth`: OAuth 2.1 session configuration and 401/403 challenge handling
//!
//! Note: `roots/list` is a SERVER->CLIENT request (not a client operation).
//! The client should implement a roots handler to respond to server requests.

pub mod auth;
pub mod completion;
pub mod connection;
pub mod handlers;
pub mod prompts;
pub mod resources;
pub mod sampling;
pub mod tasks;
pub mod tools;
