//! Resource Registry - Load billable resource definitions from JSON
//!
//! This module loads the definitions of every billable resource type from an
//! embedded JSON file and exposes them in report order. The registry drives
//! both the listing layer and the report layout, so the order of entries in
//! the JSON file is the order counts are printed in.

use serde::Deserialize;
use std::sync::OnceLock;

/// Embedded resource definitions (compiled into the binary)
const RESOURCE_FILE: &str = include_str!("../resources/billable.json");

/// One billable resource type, as defined in JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    /// Stable key, also the accumulator name in [`crate::count::Tally`]
    pub key: String,
    /// Human-readable name used in the report
    pub display_name: String,
    /// API host serving the listing
    pub service: String,
    /// List path template; `{project}` is replaced with the project ID
    pub list_path: String,
    /// Dot-notation path to the record array in the response
    pub response_path: String,
    /// Field counted on each record
    pub name_field: String,
    /// Optional server-side filter expression
    #[serde(default)]
    pub filter: Option<String>,
    /// For aggregated listings: the per-scope key holding the record array
    #[serde(default)]
    pub aggregated: Option<String>,
}

/// Root structure of resources/billable.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceFile {
    resources: Vec<ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<Vec<ResourceDef>> = OnceLock::new();

/// Get all billable resource definitions, in report order
/// (loads from embedded JSON on first access)
pub fn billable_resources() -> &'static [ResourceDef] {
    REGISTRY.get_or_init(|| {
        let file: ResourceFile = serde_json::from_str(RESOURCE_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
        file.resources
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    billable_resources().iter().find(|r| r.key == key)
}
