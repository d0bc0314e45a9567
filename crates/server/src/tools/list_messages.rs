//! list_messages tool implementation.
//!
//! Lists one page of a mailing list's messages for a month.

use marc_client::{Archive, Fetcher};
use marc_core::Month;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, non_blank};

/// Input parameters for list_messages tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListMessagesParams {
    /// Name of the mailing list (e.g. "git", "linux-kernel").
    pub list: String,

    /// Month in YYYYMM format (e.g. "202602"). Defaults to the current month.
    #[serde(default)]
    pub month: Option<String>,

    /// Page number, 1-based (default: 1). Each page has about 30 messages.
    #[serde(default)]
    pub page: Option<u32>,

    /// Maximum number of messages to return from this page (default: all).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Implementation of the list_messages tool.
pub async fn list_impl<F: Fetcher>(archive: &Archive<F>, params: ListMessagesParams) -> Result<CallToolResult, McpError> {
    let month = non_blank(params.month).map(|m| m.parse::<Month>()).transpose()?;

    let stubs = archive
        .list_messages(&params.list, month, params.page, params.limit)
        .await?;

    json_result(&stubs)
}
