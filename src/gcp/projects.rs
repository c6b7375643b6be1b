//! GCP Projects
//!
//! Lists the projects visible to the current credentials. The run walks
//! projects in the order the API returns them.

use super::client::GcpClient;
use anyhow::Result;
use serde_json::Value;

/// Project information from the Resource Manager listing
#[derive(Debug, Clone)]
pub struct Project {
    pub project_id: String,
    pub lifecycle_state: String,
}

impl From<&Value> for Project {
    fn from(value: &Value) -> Self {
        Self {
            project_id: value
                .get("projectId")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            lifecycle_state: value
                .get("lifecycleState")
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
        }
    }
}

impl Project {
    /// Whether this project should be counted
    ///
    /// Only active projects participate, and the identifier must look like a
    /// project ID before it is substituted into listing URL paths.
    fn is_countable(&self) -> bool {
        if self.lifecycle_state != "ACTIVE" {
            return false;
        }
        if !validate_project_id(&self.project_id) {
            tracing::warn!("Skipping malformed project ID: {}", self.project_id);
            return false;
        }
        true
    }
}

/// Validate a GCP project ID format
/// Project IDs must be 6-30 characters, lowercase letters, digits, and hyphens
/// Must start with a letter and cannot end with a hyphen
fn validate_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }

    match project.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    if project.ends_with('-') {
        return false;
    }

    project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// List the IDs of all countable projects, in listing order
/// (auto-paginate via `nextPageToken`)
pub async fn list_project_ids(client: &GcpClient) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let url = client.projects_url(page_token.as_deref())?;
        let response = client.get(&url).await?;

        if let Some(records) = response.get("projects").and_then(|v| v.as_array()) {
            ids.extend(
                records
                    .iter()
                    .map(Project::from)
                    .filter(Project::is_countable)
                    .map(|p| p.project_id),
            );
        }

        match response.get("nextPageToken").and_then(|v| v.as_str()) {
            Some(token) => page_token = Some(token.to_string()),
            None => break,
        }
    }

    tracing::info!("Found {} projects", ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_from_listing_record() {
        let record = json!({
            "projectId": "audit-demo",
            "name": "Audit Demo",
            "projectNumber": "123456789",
            "lifecycleState": "ACTIVE"
        });

        let project = Project::from(&record);
        assert_eq!(project.project_id, "audit-demo");
        assert_eq!(project.lifecycle_state, "ACTIVE");
    }

    #[test]
    fn test_inactive_projects_are_not_countable() {
        let project = Project {
            project_id: "doomed-project".to_string(),
            lifecycle_state: "DELETE_REQUESTED".to_string(),
        };
        assert!(!project.is_countable());
    }

    #[test]
    fn test_malformed_ids_are_not_countable() {
        let project = Project {
            project_id: "../escape".to_string(),
            lifecycle_state: "ACTIVE".to_string(),
        };
        assert!(!project.is_countable());
    }

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("my-project-123"));
        assert!(!validate_project_id("short"));
        assert!(!validate_project_id("9starts-with-digit"));
        assert!(!validate_project_id("ends-with-hyphen-"));
        assert!(!validate_project_id("Has-Uppercase"));
    }
}
