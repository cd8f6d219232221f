//! Process runtime for agentgate.
//!
//! Owns everything OS-facing: building the agent's command line, spawning it
//! with piped standard streams, bounding its lifetime, and terminating it.

#![deny(unsafe_code)]

pub mod command;
pub mod probe;
mod runner;
pub mod session;
pub mod shutdown;

pub use command::{AgentCommand, DEFAULT_AGENT_PROGRAM, DEFAULT_AGENT_TIMEOUT};
pub use probe::check_agent_available;
pub use runner::CliAgentRunner;
pub use session::run_session;
pub use shutdown::terminate_agent;
