//! Fixed advisory payloads returned by the rules tools
//!
//! The instruction text is configuration data reproduced verbatim from the
//! upstream rule set, embedded indentation and all. Handlers are pure and
//! argument-independent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ToolSummary;

pub const SERVER_NAME: &str = "CrewaiMcpServer";

/// Guidance on when and why a rules tool should be consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleUsage {
    pub workflow: String,
    pub purpose: String,
    pub when_to_use: String,
}

/// Envelope returned by every advisory tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesEnvelope {
    pub success: bool,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_usage: Option<ExampleUsage>,
}

/// Envelope returned by the catalog tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEnvelope {
    pub success: bool,
    pub server_name: String,
    pub total_tools: usize,
    pub tools: Vec<ToolSummary>,
}

pub const ENVIRONMENT_SETUP_INSTRUCTIONS: [&str; 2] = [
    // Upstream emits these two sentences as one string, without a separator.
    concat!(
        "To access environment variables always use the load_dotenv() function from the dotenv library.",
        "Never hardcode API keys.",
    ),
    "Do not check whether environment variables are available.",
];

pub const AGENT_DEFINITION_INSTRUCTIONS: [&str; 3] = [
    "Input variables must be listed in the agent's role field.",
    "Example:\n        role: {input variable 1} {input variable 2} <definition of role>",
    "Add critical behavioral instructions (like no-hallucination rules) to both agent backstories AND task descriptions for reinforcement.",
];

pub const TASK_DEFINITION_INSTRUCTIONS: [&str; 6] = [
    "If the requested output is JSON, always specify the following fields:\n        expected_output=<definition of the expected output>,\n        output_json=<Pydantic class that provides the schema for the JSON output>,\n        output_format=\"json\"\n        ",
    "If Serper is specified as the tool, make sure to explicitly instruct CrewAI how to interface Serper:\n        \u{2705} Formulate the desired queries (e.g., \"cybersecurity startup industry benchmarks cash burn rate venture debt 2024\")\n        \u{2705} Ensure that the input for the tool is a key/value dictionary",
    "When adding validation rules, integrate them directly into existing task descriptions rather than restructuring.",
    "Add critical behavioral instructions (like no-hallucination rules) to both agent backstories AND task descriptions for reinforcement.",
    "Keep instruction additions focused and specific rather than comprehensive rewrites.",
    "Prioritize data integrity and accuracy features over user experience or maintainability improvements.",
];

pub const CREW_SETUP_INSTRUCTIONS: [&str; 5] = [
    "All functionalities must be executed by the CrewAI agents, tasks and their tools. No processing code is needed besides CrewAI components.",
    "The output of the kick0ff() function is not a string, but rather an instance of the CrewOutput class.",
    "If the intended output is JSON, use the .json property of the CrewOutput class to obtain a JSON-formatted string and then convert it to a dictionary using the json Python library.",
    "Do not parse JSON output. If you specify a Pydantic class for output, the output will be guaranteed valid JSON.",
    "If agents use a Model Context Protocol (MCP) server, always use StdioServerParameters and MCPServerAdapter classes:\n    \n    server_params=StdioServerParameters(\n        command=\"\",\n        args=[\"\"],\n        env={\"\"},\n    )\n    \n    with MCPServerAdapter(server_params) as mcp_tools:\n        agent = self._create_some_agent(mcp_tools)\n        ...\n        \n        ",
];

pub const GENERAL_INSTRUCTIONS: [&str; 12] = [
    "Keep the code as simple as possible and as readable as possible.",
    "Avoid all interaction with the user. The input data should be hardcoded in the main() function for testing and passed as arguments to the kickoff() function of the Crew class.",
    "Do not code any fallback simulated outputs as an alternative for the crew output.",
    "Always code a single crew and never split the code into separate crews.",
    "Never code any RegEx.",
    "Do not include any logging. Do not print anything to stdout. CrewaAI is sufficiently verbose.",
    "Remove all unused imports from the code.",
    "Keep code structure minimal and focused - avoid adding main() functions, extensive documentation, or example usage unless explicitly requested.",
    "Preserve existing method names and class structure - **only modify what's specifically requested**.",
    "Do not generate mockup data for testing.",
    "Don't add comprehensive docstrings or comments unless the user asks for documentation improvements.",
    "Avoid suggesting 'best practices' that add complexity like retry logic, configuration management, or extensive error handling unless the user identifies these as problems.",
];

pub const ENVIRONMENT_SETUP_PURPOSE: &str = "Returns comprehensive guidelines for setting up environment variables, API keys, and configuration management.";
pub const AGENT_DEFINITION_PURPOSE: &str = "Returns guidelines for creating well-defined agents with clear responsibilities and characteristics.";
pub const TASK_DEFINITION_PURPOSE: &str = "Returns guidelines for creating structured tasks with proper specifications and agent assignments.";
pub const CREW_SETUP_PURPOSE: &str = "Returns guidelines for orchestrating multi-agent crews and managing workflows effectively.";
pub const GENERAL_RULES_PURPOSE: &str = "Returns guidelines for writing Python applications based on the CrewAI crews, agents, tasks and tools.";
pub const LIST_SERVER_TOOLS_PURPOSE: &str =
    "Returns the catalog of advisory tools exposed by this server.";

fn rules_payload(instructions: &[&str], example_usage: ExampleUsage) -> Value {
    let envelope = RulesEnvelope {
        success: true,
        instructions: instructions.iter().map(|line| (*line).to_string()).collect(),
        example_usage: Some(example_usage),
    };

    serde_json::to_value(envelope).expect("rules envelope serialization")
}

pub fn environment_setup_rules() -> Value {
    rules_payload(
        &ENVIRONMENT_SETUP_INSTRUCTIONS,
        ExampleUsage {
            workflow: "Claude should call this tool before writing CrewAI Python scripts"
                .to_string(),
            purpose: "Get coding guidelines and best practices for CrewAI development".to_string(),
            when_to_use:
                "Before starting any CrewAI project or when setting up environment variables"
                    .to_string(),
        },
    )
}

pub fn agent_definition_rules() -> Value {
    rules_payload(
        &AGENT_DEFINITION_INSTRUCTIONS,
        ExampleUsage {
            workflow: "Claude should call this tool before creating CrewAI agents".to_string(),
            purpose: "Get guidelines for agent role definition, goal setting, and backstory creation"
                .to_string(),
            when_to_use: "Before defining Agent objects in CrewAI scripts".to_string(),
        },
    )
}

pub fn task_definition_rules() -> Value {
    rules_payload(
        &TASK_DEFINITION_INSTRUCTIONS,
        ExampleUsage {
            workflow: "Claude should call this tool before creating CrewAI tasks".to_string(),
            purpose: "Get guidelines for task description, output specification, and agent assignment"
                .to_string(),
            when_to_use: "Before defining Task objects in CrewAI scripts".to_string(),
        },
    )
}

pub fn crew_setup_rules() -> Value {
    rules_payload(
        &CREW_SETUP_INSTRUCTIONS,
        ExampleUsage {
            workflow: "Claude should call this tool before creating CrewAI crews".to_string(),
            purpose: "Get guidelines for crew composition, agent coordination, and workflow setup"
                .to_string(),
            when_to_use: "Before defining Crew objects and orchestrating multi-agent workflows"
                .to_string(),
        },
    )
}

pub fn general_rules() -> Value {
    rules_payload(
        &GENERAL_INSTRUCTIONS,
        ExampleUsage {
            workflow: "Claude should call this tool before integrating external tools with CrewAI"
                .to_string(),
            purpose: "Get guidelines for tool integration, API connections, and custom tool creation"
                .to_string(),
            when_to_use: "Before adding external tools or APIs to CrewAI agents".to_string(),
        },
    )
}

/// Catalog payload over a fixed tool-metadata snapshot.
pub fn server_tools_catalog(tools: &[ToolSummary]) -> Value {
    let envelope = CatalogEnvelope {
        success: true,
        server_name: SERVER_NAME.to_string(),
        total_tools: tools.len(),
        tools: tools.to_vec(),
    };

    serde_json::to_value(envelope).expect("catalog envelope serialization")
}
