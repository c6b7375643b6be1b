//! GCP Client
//!
//! Combines authentication and HTTP into the single read-only surface the
//! counter needs: build a listing URL, GET it as JSON.

use super::auth::Credentials;
use super::http::{HttpClient, QueryError};
use crate::resource::ResourceDef;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Host serving the project listing
const RESOURCEMANAGER_HOST: &str = "cloudresourcemanager.googleapis.com";

/// Read-only GCP client
#[derive(Clone)]
pub struct GcpClient {
    credentials: Credentials,
    http: HttpClient,
    /// Replaces `https://<host>` on every request; used to point the client
    /// at a mock server
    endpoint_override: Option<String>,
}

impl GcpClient {
    /// Create a client from ambient credentials
    pub async fn new() -> Result<Self> {
        let credentials = Credentials::new().await?;
        Self::with_credentials(credentials, None)
    }

    /// Create a client with explicit credentials and an optional endpoint
    pub fn with_credentials(
        credentials: Credentials,
        endpoint_override: Option<String>,
    ) -> Result<Self> {
        let http = HttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            endpoint_override,
        })
    }

    /// GET a JSON document, authenticating with the current token
    pub async fn get(&self, url: &str) -> Result<Value, QueryError> {
        let token = self.credentials.token().await?;
        self.http.get_json(url, &token).await
    }

    /// Build the listing URL for one resource type in one project
    pub fn listing_url(
        &self,
        def: &ResourceDef,
        project: &str,
        page_token: Option<&str>,
    ) -> Result<String> {
        let path = def.list_path.replace("{project}", project);
        let mut url = Url::parse(&format!("{}{}", self.base_for(&def.service), path))
            .with_context(|| format!("Bad listing URL for {}", def.key))?;

        // query_pairs_mut leaves a dangling '?' when nothing is appended
        if def.filter.is_some() || page_token.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(filter) = &def.filter {
                query.append_pair("filter", filter);
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url.into())
    }

    /// Build the Resource Manager project listing URL
    pub fn projects_url(&self, page_token: Option<&str>) -> Result<String> {
        let mut url = Url::parse(&format!("{}/v1/projects", self.base_for(RESOURCEMANAGER_HOST)))
            .context("Bad project listing URL")?;

        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        Ok(url.into())
    }

    fn base_for(&self, host: &str) -> String {
        match &self.endpoint_override {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", host),
        }
    }
}
