//! search_messages tool implementation.
//!
//! Searches only messages previously fetched with get_message; nothing is
//! requested from the archive.

use marc_client::{Archive, Fetcher};
use marc_core::SearchField;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, non_blank};

/// Input parameters for search_messages tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchMessagesParams {
    /// Restrict results to this mailing list.
    #[serde(default)]
    pub list: Option<String>,

    /// Free-text query. Every word must match.
    pub query: String,

    /// Field to search: "s" subject, "a" author, "b" body. Omit to search all three.
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Implementation of the search_messages tool.
pub async fn search_impl<F: Fetcher>(
    archive: &Archive<F>, params: SearchMessagesParams,
) -> Result<CallToolResult, McpError> {
    let field = non_blank(params.search_type)
        .map(|code| SearchField::from_code(&code))
        .transpose()?;
    let list = non_blank(params.list);

    let hits = archive.search(&params.query, list.as_deref(), field).await?;
    json_result(&hits)
}
