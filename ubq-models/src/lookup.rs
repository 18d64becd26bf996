//! Public content lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read-only view of a published content item, as served by `content-lookup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentLookup<P> {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub content: LookupContent<P>,
}

/// The published version's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupContent<P> {
    pub number: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub payload: P,
}
