//! Advisory rule payloads and their tool integrations
//!
//! Provides the fixed CrewAI guidance content exposed over the MCP protocol

pub mod rules;
pub mod tools;
