//! Tools exposed via Model Context Protocol
//!
//! Provides the wire definitions for the six rules tools and the registry
//! construction that binds each name to its fixed-payload handler.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::rules;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};
use crate::registry::{ToolHandler, ToolRegistry};
use crate::{errors::AppError, AppState};

#[macros::mcp_tool(
    name = "get_environment_setup_rules",
    description = "Provide simple instructions for environment setup and best practices."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetEnvironmentSetupRulesTool {}

#[macros::mcp_tool(
    name = "get_agent_definition_rules",
    description = "Provide guidelines for defining CrewAI agents with proper roles, goals, and backstories."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAgentDefinitionRulesTool {}

#[macros::mcp_tool(
    name = "get_task_definition_rules",
    description = "Provide guidelines for defining CrewAI tasks with clear descriptions, expected outputs, and agent assignments."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTaskDefinitionRulesTool {}

#[macros::mcp_tool(
    name = "get_crew_setup_rules",
    description = "Provide guidelines for setting up CrewAI crews, including agent coordination and workflow management."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCrewSetupRulesTool {}

#[macros::mcp_tool(
    name = "get_general_rules",
    description = "Provide guidelines for integrating external tools and APIs with CrewAI agents."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetGeneralRulesTool {}

#[macros::mcp_tool(
    name = "list_server_tools",
    description = "List all available tools provided by this CrewAI MCP server."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListServerToolsTool {}

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        GetEnvironmentSetupRulesTool::tool(),
        GetAgentDefinitionRulesTool::tool(),
        GetTaskDefinitionRulesTool::tool(),
        GetCrewSetupRulesTool::tool(),
        GetGeneralRulesTool::tool(),
        ListServerToolsTool::tool(),
    ]
}

/// Build the tool registry. The catalog tool is registered last, over a
/// snapshot of the advisory entries, so it does not enumerate itself.
pub fn build_registry() -> Result<ToolRegistry, AppError> {
    let mut registry = ToolRegistry::new();

    register(
        &mut registry,
        GetEnvironmentSetupRulesTool::tool(),
        rules::ENVIRONMENT_SETUP_PURPOSE,
        Box::new(rules::environment_setup_rules),
    )?;
    register(
        &mut registry,
        GetAgentDefinitionRulesTool::tool(),
        rules::AGENT_DEFINITION_PURPOSE,
        Box::new(rules::agent_definition_rules),
    )?;
    register(
        &mut registry,
        GetTaskDefinitionRulesTool::tool(),
        rules::TASK_DEFINITION_PURPOSE,
        Box::new(rules::task_definition_rules),
    )?;
    register(
        &mut registry,
        GetCrewSetupRulesTool::tool(),
        rules::CREW_SETUP_PURPOSE,
        Box::new(rules::crew_setup_rules),
    )?;
    register(
        &mut registry,
        GetGeneralRulesTool::tool(),
        rules::GENERAL_RULES_PURPOSE,
        Box::new(rules::general_rules),
    )?;

    let advisory_catalog = registry.catalog();
    register(
        &mut registry,
        ListServerToolsTool::tool(),
        rules::LIST_SERVER_TOOLS_PURPOSE,
        Box::new(move || rules::server_tools_catalog(&advisory_catalog)),
    )?;

    Ok(registry)
}

fn register(
    registry: &mut ToolRegistry,
    tool: Tool,
    purpose: &str,
    handler: ToolHandler,
) -> Result<(), AppError> {
    registry.register(
        tool.name,
        tool.description.unwrap_or_default(),
        purpose,
        handler,
    )
}

pub fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match state
        .registry
        .invoke(&tool_call.name, tool_call.arguments.as_ref())
    {
        Ok(payload) => json_rpc_result(
            id,
            serde_json::to_value(CallToolResult {
                content: vec![ContentBlock::from(TextContent::new(
                    payload.to_string(),
                    None,
                    None,
                ))],
                is_error: None,
                meta: None,
                structured_content: payload.as_object().cloned(),
            })
            .expect("tool call result serialization"),
        ),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::from_value;

    use crate::domain::rules::CatalogEnvelope;

    use super::*;

    const EXPECTED_TOOL_NAMES: [&str; 6] = [
        "get_environment_setup_rules",
        "get_agent_definition_rules",
        "get_task_definition_rules",
        "get_crew_setup_rules",
        "get_general_rules",
        "list_server_tools",
    ];

    #[test]
    fn registry_holds_all_tools_in_registration_order() {
        let registry = build_registry().expect("registry should build");

        assert_eq!(registry.len(), EXPECTED_TOOL_NAMES.len());
        let names: Vec<String> = registry
            .catalog()
            .into_iter()
            .map(|summary| summary.name)
            .collect();
        assert_eq!(names, EXPECTED_TOOL_NAMES);
    }

    #[test]
    fn wire_tool_list_matches_registry() {
        let registry = build_registry().expect("registry should build");

        for tool in build_tools_list() {
            assert!(registry.contains(&tool.name), "unregistered tool {}", tool.name);
        }
        assert_eq!(build_tools_list().len(), registry.len());
    }

    #[test]
    fn catalog_tool_excludes_itself() {
        let registry = build_registry().expect("registry should build");

        let payload = registry
            .invoke("list_server_tools", None)
            .expect("catalog tool invocation");
        let envelope: CatalogEnvelope = from_value(payload).expect("valid catalog envelope");

        assert_eq!(envelope.total_tools, 5);
        assert_eq!(envelope.tools.len(), 5);
        let names: Vec<&str> = envelope
            .tools
            .iter()
            .map(|summary| summary.name.as_str())
            .collect();
        assert_eq!(names, EXPECTED_TOOL_NAMES[..5].to_vec());
    }

    #[test]
    fn every_registered_tool_reports_success() {
        let registry = build_registry().expect("registry should build");

        for summary in registry.catalog() {
            let payload = registry
                .invoke(&summary.name, None)
                .expect("registered tool invocation");
            assert_eq!(payload["success"], serde_json::json!(true));
        }
    }
}
