//! Library half of the `agentgate` binary, split out so it can be tested.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod parser;

pub use parser::Cli;
