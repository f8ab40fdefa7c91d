use std::sync::LazyLock;

use rmcp::Error as McpError;
use rmcp::model::{CallToolRequestParam, CallToolResult, ListToolsResult};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::ads_api::AdsApi;
use crate::error::{Error, Result};
use crate::support::response::success_json_response;
use crate::tool_generator::{RegisteredTool, generate_tool_registration};
use crate::tools;

static REGISTRY: LazyLock<ToolRegistry> = LazyLock::new(ToolRegistry::new);

/// Static set of tools, built once at process start
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: tools::all_tools(),
        }
    }

    pub fn global() -> &'static Self {
        &REGISTRY
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            next_cursor: None,
            tools:       self
                .tools
                .iter()
                .map(|tool| generate_tool_registration(tool.definition()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Route a call by name through the tool's pipeline
    pub async fn dispatch(
        &self,
        api: &dyn AdsApi,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        tool.invoke(api, arguments).await
    }
}

pub async fn handle_tool_call(
    api: &dyn AdsApi,
    request: CallToolRequestParam,
) -> std::result::Result<CallToolResult, McpError> {
    info!(tool = %request.name, "Tool call");
    match ToolRegistry::global()
        .dispatch(api, &request.name, request.arguments.as_ref())
        .await
    {
        Ok(value) => Ok(success_json_response(&value)),
        Err(e) => {
            warn!(tool = %request.name, error = %e, "Tool call failed");
            Err(McpError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::collections::HashSet;

    use rmcp::model::ErrorCode;
    use serde_json::json;

    use super::*;
    use crate::test_support::MockAdsApi;
    use crate::tool_definitions::{ParamDef, ParamType};

    // Smallest value that satisfies a declared parameter type
    fn sample_value(param_type: &ParamType) -> Value {
        match param_type {
            ParamType::String { .. } => json!("sample"),
            ParamType::Date => json!("2024-01-15"),
            ParamType::Id => json!("123"),
            ParamType::Integer { min, .. } => json!(min),
            ParamType::Number { .. } | ParamType::Money => json!(1.5),
            ParamType::Boolean { .. } => json!(false),
            ParamType::Enum { values, .. } => json!(values[0]),
            ParamType::StringArray { min_items, .. } => {
                json!(vec!["sample"; (*min_items).max(1)])
            }
            ParamType::ObjectArray { fields, min_items } => {
                json!(vec![sample_object(fields); (*min_items).max(1)])
            }
            ParamType::Object { fields } => sample_object(fields),
        }
    }

    fn sample_object(params: &[ParamDef]) -> Value {
        Value::Object(
            params
                .iter()
                .filter(|param| param.required)
                .map(|param| (param.name.to_string(), sample_value(&param.param_type)))
                .collect(),
        )
    }

    #[test]
    fn test_every_tool_listed_exactly_once() {
        let listed = ToolRegistry::new().list_tools().tools;
        let names: HashSet<_> = listed.iter().map(|tool| tool.name.to_string()).collect();

        assert_eq!(listed.len(), 32);
        assert_eq!(names.len(), listed.len());
    }

    #[test]
    fn test_published_required_fields_match_registry_definitions() {
        let registry = ToolRegistry::new();
        for tool in registry.list_tools().tools {
            let def = registry.get(&tool.name).unwrap().definition();
            let published = tool
                .input_schema
                .get("required")
                .cloned()
                .unwrap_or_else(|| json!([]));
            assert_eq!(published, json!(def.required_params()), "{}", def.name);
        }
    }

    #[tokio::test]
    async fn test_each_required_field_is_rejected_when_absent() {
        let registry = ToolRegistry::new();
        for tool in &registry.tools {
            let def = tool.definition();
            let complete = sample_object(&def.params);
            for required in def.required_params() {
                let mut args = complete.as_object().cloned().unwrap();
                args.remove(required);

                let api = MockAdsApi::new();
                let err = tool.invoke(&api, Some(&args)).await.unwrap_err();

                assert!(
                    matches!(err, Error::Validation { ref field, .. } if field == required),
                    "{}: expected rejection of {required}, got {err}",
                    def.name
                );
                assert_eq!(api.calls(), 0, "{}", def.name);
            }
        }
    }

    #[tokio::test]
    async fn test_required_only_arguments_deserialize_for_every_tool() {
        let registry = ToolRegistry::new();
        for tool in &registry.tools {
            let args = sample_object(&tool.definition().params);
            let api = MockAdsApi::new();

            // Cross-field rules and empty lookups may still fail, but never as internal errors
            if let Err(err) = tool.invoke(&api, args.as_object()).await {
                assert!(
                    !matches!(err, Error::Internal(_)),
                    "{}: {err}",
                    tool.name()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_method_not_found_without_calls() {
        let api = MockAdsApi::new();
        let request = CallToolRequestParam {
            name:      "delete_everything".into(),
            arguments: None,
        };

        let err = handle_tool_call(&api, request).await.unwrap_err();

        assert_eq!(err.code.0, ErrorCode::METHOD_NOT_FOUND.0);
        assert!(err.message.contains("delete_everything"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_call_is_wrapped_as_text() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "customer": { "id": "1234567890", "descriptiveName": "Shop" }
        })]);
        let request = CallToolRequestParam {
            name:      "get_account_info".into(),
            arguments: None,
        };

        let result = handle_tool_call(&api, request).await.unwrap();

        assert_eq!(result.content.len(), 1);
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_other_failures_are_internal_errors() {
        let api = MockAdsApi::new();
        let request = CallToolRequestParam {
            name:      "get_campaign".into(),
            arguments: None,
        };

        let err = handle_tool_call(&api, request).await.unwrap_err();

        assert_eq!(err.code.0, ErrorCode::INTERNAL_ERROR.0);
        assert!(err.message.contains("campaignId"));
    }
}
