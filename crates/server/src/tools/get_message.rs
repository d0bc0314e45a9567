//! get_message tool implementation.

use marc_client::{Archive, Fetcher};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for get_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetMessageParams {
    /// Name of the mailing list.
    pub list: String,

    /// Message id from list_messages results.
    pub message_id: String,
}

/// Implementation of the get_message tool.
pub async fn get_impl<F: Fetcher>(archive: &Archive<F>, params: GetMessageParams) -> Result<CallToolResult, McpError> {
    let message = archive.get_message(&params.list, &params.message_id).await?;
    json_result(&message)
}
