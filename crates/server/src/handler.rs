//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::tools::{
    GetMessageParams, ListMailingListsParams, ListMessagesParams, SearchMessagesParams, get_message,
    list_mailing_lists, list_messages, search_messages,
};
use marc_client::Archive;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for marc-mcp.
#[derive(Clone)]
pub struct MarcServer {
    archive: Arc<Archive>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MarcServer {
    /// Create a new server handler around an archive client.
    pub fn new(archive: Archive) -> Self {
        Self { archive: Arc::new(archive), tool_router: Self::tool_router() }
    }

    #[tool(description = "List all available mailing lists from marc.info, optionally filtered by category.")]
    async fn list_mailing_lists(&self, params: Parameters<ListMailingListsParams>) -> Result<CallToolResult, McpError> {
        list_mailing_lists::list_impl(self.archive.as_ref(), params.0).await
    }

    /// List messages for one month of a mailing list.
    ///
    /// Pages hold about 30 messages; only the first page is served from cache.
    #[tool(
        description = "List messages from a mailing list. Defaults to the current month. Each page has about 30 messages."
    )]
    async fn list_messages(&self, params: Parameters<ListMessagesParams>) -> Result<CallToolResult, McpError> {
        list_messages::list_impl(self.archive.as_ref(), params.0).await
    }

    #[tool(description = "Get the full content (headers and body) of a specific message.")]
    async fn get_message(&self, params: Parameters<GetMessageParams>) -> Result<CallToolResult, McpError> {
        get_message::get_impl(self.archive.as_ref(), params.0).await
    }

    /// Search messages already retrieved with get_message.
    ///
    /// Purely local: nothing is fetched, so only previously opened messages
    /// can match.
    #[tool(
        description = "Search previously retrieved messages. Optionally restrict to one list and to a field: 's' subject, 'a' author, 'b' body."
    )]
    async fn search_messages(&self, params: Parameters<SearchMessagesParams>) -> Result<CallToolResult, McpError> {
        search_messages::search_impl(self.archive.as_ref(), params.0).await
    }
}

impl ServerHandler for MarcServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "marc-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Browse the marc.info mailing-list archive: list mailing lists, list a month of messages, \
                 read a message, and search messages already read."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
