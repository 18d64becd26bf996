//! Paged list envelope.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
///
/// ```json
/// { "count": 3, "next": "https://.../?page=2", "previous": null, "results": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiList<T> {
    /// Total number of results across all pages.
    #[serde(default)]
    pub count: u64,
    /// Absolute link to the next page; `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute link to the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> ApiList<T> {
    /// A single, final page holding `results`.
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_page() {
        let json = r#"{"count":1,"next":null,"previous":null,"results":[{"id":1}]}"#;
        let page: ApiList<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 1);
        assert!(!page.has_next());
        assert_eq!(page.results[0]["id"], 1);
    }

    #[test]
    fn test_parse_missing_fields() {
        let page: ApiList<u32> = serde_json::from_str(r#"{"results":[1,2]}"#).unwrap();
        assert_eq!(page.results, vec![1, 2]);
        assert!(page.next.is_none());
    }
}
