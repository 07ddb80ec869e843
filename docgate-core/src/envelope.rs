//! The list-read response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::links::PageLinks;

/// The wrapper around one page of list-read results.
///
/// `count` is the number of items in this page; `total` is the size of the
/// full matching set ignoring pagination. Field names carry a leading
/// underscore on the wire (`_links`, `_count`, `_total`, `_result`), which
/// keeps them clear of the documents' own field namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "_links")]
    pub links: PageLinks,
    #[serde(rename = "_count")]
    pub count: usize,
    #[serde(rename = "_total")]
    pub total: u64,
    #[serde(rename = "_result")]
    pub result: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conform::ConformedQuery;
    use crate::links::build_links;
    use serde_json::json;

    #[test]
    fn envelope_serializes_with_underscored_keys() {
        let query = ConformedQuery {
            limit: 20,
            ..ConformedQuery::default()
        };
        let envelope = Envelope {
            links: build_links("http://host/api/resources/skills", &query, 0, 1, 20),
            count: 1,
            total: 1,
            result: vec![json!({ "title": "rust" })],
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("_links").is_some());
        assert_eq!(value["_count"], json!(1));
        assert_eq!(value["_total"], json!(1));
        assert_eq!(value["_result"][0]["title"], json!("rust"));
        assert_eq!(
            value["_links"]["self"],
            json!("http://host/api/resources/skills?limit=20&page=0")
        );
    }
}
