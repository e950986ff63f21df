//! Search capability stubs.
//!
//! Deterministic placeholder formatters standing in for web and file search
//! integrations: they synthesize a descriptive string from the query and
//! never touch the network or filesystem. Kept as literal placeholders on
//! purpose — do not wire in real search backends here.

/// Placeholder search capability owned by a specialist agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTool {
    /// Simulated web search.
    Web,
    /// Simulated file search over the configured vector stores.
    File { store_ids: Vec<String> },
}

impl SearchTool {
    /// Synthesize the search result string for a query.
    pub fn lookup(&self, query: &str) -> String {
        match self {
            SearchTool::Web => format!("Web search results for: {}", query),
            SearchTool::File { store_ids } => format!(
                "File search results for: {} in stores: {}",
                query,
                store_ids.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_lookup_embeds_query() {
        assert_eq!(
            SearchTool::Web.lookup("rust news"),
            "Web search results for: rust news"
        );
    }

    #[test]
    fn file_lookup_joins_store_ids_in_order() {
        let tool = SearchTool::File {
            store_ids: vec!["vs_2".to_string(), "vs_1".to_string()],
        };
        assert_eq!(
            tool.lookup("quarterly report"),
            "File search results for: quarterly report in stores: vs_2, vs_1"
        );
    }

    #[test]
    fn file_lookup_with_no_stores() {
        let tool = SearchTool::File { store_ids: vec![] };
        assert_eq!(
            tool.lookup("notes"),
            "File search results for: notes in stores: "
        );
    }
}
