//! list_mailing_lists tool implementation.
//!
//! Returns the archive catalog, optionally narrowed to one category.

use marc_client::{Archive, Fetcher};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, non_blank};

/// Input parameters for list_mailing_lists tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListMailingListsParams {
    /// Only return lists in this category, matched exactly (e.g. "Development", "Security").
    #[serde(default)]
    pub category: Option<String>,
}

/// Implementation of the list_mailing_lists tool.
pub async fn list_impl<F: Fetcher>(
    archive: &Archive<F>, params: ListMailingListsParams,
) -> Result<CallToolResult, McpError> {
    let mut lists = archive.list_mailing_lists().await?;

    if let Some(category) = non_blank(params.category) {
        lists.retain(|list| list.category == category);
    }

    json_result(&lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{CannedPages, archive, json};
    use marc_client::fetch::catalog_path;

    const CATALOG: &str = r#"<dl>
        <dt><b><img alt="Group: "> Development</b></dt>
        <dd><a href="?l=git&w=2">git</a></dd>
        <dd><a href="?l=linux-kernel&w=2">linux-kernel</a></dd>
        <dt><b><img alt="Group: "> Security</b></dt>
        <dd><a href="?l=openssh-unix-dev&w=2">openssh-unix-dev</a></dd>
        </dl>"#;

    #[tokio::test]
    async fn test_list_all() {
        let archive = archive(CannedPages::default().page(catalog_path(), CATALOG)).await;

        let result = list_impl(&archive, ListMailingListsParams::default()).await.unwrap();
        let value = json(&result);
        let lists = value.as_array().unwrap();
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[0]["name"], "git");
        assert_eq!(lists[0]["category"], "Development");
    }

    #[tokio::test]
    async fn test_filter_by_category() {
        let archive = archive(CannedPages::default().page(catalog_path(), CATALOG)).await;

        let params = ListMailingListsParams { category: Some("Security".into()) };
        let value = json(&list_impl(&archive, params).await.unwrap());
        assert_eq!(value, serde_json::json!([{ "name": "openssh-unix-dev", "category": "Security" }]));

        let params = ListMailingListsParams { category: Some("security".into()) };
        let value = json(&list_impl(&archive, params).await.unwrap());
        assert_eq!(value, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_blank_category_is_no_filter() {
        let archive = archive(CannedPages::default().page(catalog_path(), CATALOG)).await;

        let params = ListMailingListsParams { category: Some("  ".into()) };
        let value = json(&list_impl(&archive, params).await.unwrap());
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_error() {
        let archive = archive(CannedPages::default()).await;

        let err = list_impl(&archive, ListMailingListsParams::default()).await.unwrap_err();
        assert!(err.message.contains("HTTP_ERROR"));
    }
}
