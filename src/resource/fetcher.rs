//! Resource Fetcher
//!
//! Fetches one resource listing for one project based on a resource
//! definition, following pagination until the listing is complete.

use super::registry::ResourceDef;
use crate::gcp::client::GcpClient;
use crate::gcp::http::QueryError;
use serde_json::Value;

/// Fetch the complete listing for one resource type in one project
/// (auto-paginate via `nextPageToken`)
pub async fn fetch_listing(
    client: &GcpClient,
    def: &ResourceDef,
    project: &str,
) -> Result<Vec<Value>, QueryError> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let url = client.listing_url(def, project, page_token.as_deref())?;
        let response = client.get(&url).await?;

        all_items.extend(extract_items(&response, def));

        match response.get("nextPageToken").and_then(|v| v.as_str()) {
            Some(token) => page_token = Some(token.to_string()),
            None => break,
        }
    }

    Ok(all_items)
}

/// Extract the record array from a listing response using the response_path
///
/// Aggregated listings (compute) return a map of scope name to a per-scope
/// object; the records live under the definition's `aggregated` key inside
/// each scope. Scopes without records carry only a warning and are skipped.
fn extract_items(response: &Value, def: &ResourceDef) -> Vec<Value> {
    let node = match walk_path(response, &def.response_path) {
        Some(node) => node,
        None => return Vec::new(),
    };

    match &def.aggregated {
        Some(scope_key) => {
            let Some(scopes) = node.as_object() else {
                return Vec::new();
            };
            scopes
                .values()
                .filter_map(|scope| scope.get(scope_key).and_then(|v| v.as_array()))
                .flatten()
                .cloned()
                .collect()
        }
        None => node.as_array().cloned().unwrap_or_default(),
    }
}

/// Walk a dot-notation path into a JSON value
fn walk_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Count the records in a listing that carry the given name field
///
/// Only the count is consumed; the names themselves are never inspected.
pub fn count_named(items: &[Value], name_field: &str) -> u64 {
    items
        .iter()
        .filter(|item| item.get(name_field).is_some())
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::get_resource;
    use serde_json::json;

    #[test]
    fn test_extract_items_from_flat_listing() {
        let def = get_resource("sql-instances").unwrap();
        let response = json!({
            "items": [
                {"name": "primary-db"},
                {"name": "replica-db"}
            ]
        });

        let items = extract_items(&response, def);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_extract_items_missing_path_is_empty() {
        let def = get_resource("sql-instances").unwrap();
        let response = json!({"kind": "sql#instancesList"});

        assert!(extract_items(&response, def).is_empty());
    }

    #[test]
    fn test_extract_items_flattens_aggregated_scopes() {
        let def = get_resource("compute-instances").unwrap();
        let response = json!({
            "items": {
                "zones/us-central1-a": {
                    "instances": [{"name": "vm-1"}, {"name": "vm-2"}]
                },
                "zones/europe-west1-b": {
                    "instances": [{"name": "vm-3"}]
                },
                "zones/asia-east1-a": {
                    "warning": {"code": "NO_RESULTS_ON_PAGE"}
                }
            }
        });

        let items = extract_items(&response, def);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_count_named_skips_unnamed_records() {
        let items = vec![
            json!({"name": "bucket-a"}),
            json!({"id": "anonymous"}),
            json!({"name": "bucket-b"}),
        ];

        assert_eq!(count_named(&items, "name"), 2);
        assert_eq!(count_named(&items, "id"), 1);
    }

    #[test]
    fn test_count_named_empty_listing_is_zero() {
        assert_eq!(count_named(&[], "name"), 0);
    }

    #[test]
    fn test_walk_path_nested() {
        let value = json!({"a": {"b": {"c": [1, 2]}}});
        assert_eq!(
            walk_path(&value, "a.b.c"),
            Some(&json!([1, 2]))
        );
        assert!(walk_path(&value, "a.x").is_none());
    }
}
