//! MCP server exposing a Google Ads account as a set of agent tools.
//!
//! The server speaks MCP over stdio. Every tool call is validated, turned into a query or a
//! mutate request against the configured account, and answered with pretty-printed JSON.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{Error as McpError, RoleServer, ServerHandler, ServiceExt};
use tracing::info;

mod ads_api;
mod config;
mod constants;
mod error;
mod registry;
mod support;
#[cfg(test)]
mod test_support;
mod tool_definitions;
mod tool_generator;
mod tools;

use ads_api::{AdsApi, GoogleAdsClient};
use config::Config;
use constants::{SERVER_INSTRUCTIONS, SERVER_NAME};
use registry::ToolRegistry;
use support::logging::init_logging;

/// MCP handler bound to one Ads account
#[derive(Clone)]
pub struct AdsMcpService {
    api: Arc<dyn AdsApi>,
}

impl AdsMcpService {
    fn new(api: Arc<dyn AdsApi>) -> Self {
        Self { api }
    }
}

impl ServerHandler for AdsMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name:    SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ToolRegistry::global().list_tools())
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        registry::handle_tool_call(self.api.as_ref(), request).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = init_logging();

    let config = Config::from_env()?;
    info!(customer_id = %config.customer_id, api_version = %config.api_version, "Starting server");

    let service = AdsMcpService::new(Arc::new(GoogleAdsClient::new(config)));
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    info!("Server stopped");
    Ok(())
}
