//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no process or HTTP implementation details.

pub mod agent_runner;

pub use agent_runner::{AgentReply, AgentRequest, AgentRunner, resolve_session_id};
