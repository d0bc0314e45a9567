//! MCP tool implementations.
//!
//! This module contains all tools exposed by the marc-mcp server. Each tool
//! takes an [`Archive`](marc_client::Archive) and its parameters and returns
//! pretty-printed JSON text.

pub mod get_message;
pub mod list_mailing_lists;
pub mod list_messages;
pub mod search_messages;

pub use get_message::GetMessageParams;
pub use list_mailing_lists::ListMailingListsParams;
pub use list_messages::ListMessagesParams;
pub use search_messages::SearchMessagesParams;

use marc_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Wrap a value as a successful tool result of pretty JSON.
pub(crate) fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Treat blank optional strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    #[test]
    fn test_json_result_pretty_text() {
        let result = json_result(&serde_json::json!({ "name": "git" })).unwrap();
        assert_eq!(testing::json(&result)["name"], "git");
    }

    #[test]
    fn test_encoding_failure_is_internal() {
        let err = json_result(&Unencodable).unwrap_err();
        assert_eq!(err.code, ErrorCode(-32603));
        assert!(err.message.starts_with("INTERNAL_ERROR"));
        assert!(err.message.contains("unsupported value"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  git ".into())).as_deref(), Some("git"));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
