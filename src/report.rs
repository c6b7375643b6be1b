//! Report Orchestration
//!
//! Walks every visible project, counts each billable resource type, and
//! prints the per-project and global totals. Queries run strictly one at a
//! time; a failed query contributes a zero count and never stops the run.
//!
//! The listing side sits behind the [`Inventory`] trait so the report logic
//! can be exercised against canned listings.

use crate::count::Tally;
use crate::gcp::client::GcpClient;
use crate::gcp::http::QueryError;
use crate::gcp::projects;
use crate::resource::{billable_resources, count_named, fetch_listing, ResourceDef};
use anyhow::Result;
use serde_json::Value;
use std::io::Write;

/// Width of the resource name column in the report
const NAME_COLUMN_WIDTH: usize = 24;

/// Source of projects and resource listings
#[allow(async_fn_in_trait)]
pub trait Inventory {
    /// All project IDs visible to the account, in listing order
    async fn project_ids(&self) -> Result<Vec<String>>;

    /// The complete listing for one resource type in one project
    async fn list_resource(
        &self,
        project: &str,
        def: &ResourceDef,
    ) -> Result<Vec<Value>, QueryError>;
}

/// The real inventory, backed by the GCP listing APIs
pub struct GcpInventory {
    client: GcpClient,
}

impl GcpInventory {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }
}

impl Inventory for GcpInventory {
    async fn project_ids(&self) -> Result<Vec<String>> {
        projects::list_project_ids(&self.client).await
    }

    async fn list_resource(
        &self,
        project: &str,
        def: &ResourceDef,
    ) -> Result<Vec<Value>, QueryError> {
        fetch_listing(&self.client, def, project).await
    }
}

/// Run the full report against an inventory, writing it to `out`
///
/// A failure to list projects produces a zero-valued report rather than an
/// error; only write failures propagate.
pub async fn run<I: Inventory, W: Write>(inventory: &I, out: &mut W) -> Result<()> {
    let projects = match inventory.project_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Failed to list projects, reporting zero: {:#}", e);
            Vec::new()
        }
    };

    let mut global = Tally::default();
    let mut project_tally = Tally::default();

    for project in &projects {
        project_tally.reset();

        writeln!(out, "Project: {}", project)?;

        for def in billable_resources() {
            let count = match inventory.list_resource(project, def).await {
                Ok(items) => count_named(&items, &def.name_field),
                Err(e) => {
                    tracing::warn!("{}: {} query failed: {}", project, def.key, e);
                    0
                }
            };

            project_tally.record(&def.key, count);
            writeln!(
                out,
                "  {:<width$} {:>5}   subtotal {}",
                def.display_name,
                count,
                project_tally.total(),
                width = NAME_COLUMN_WIDTH
            )?;
        }

        writeln!(out, "  Project total: {}", project_tally.total())?;
        writeln!(out)?;

        global.absorb(&project_tally);
    }

    writeln!(out, "All projects ({} scanned)", projects.len())?;
    for def in billable_resources() {
        writeln!(
            out,
            "  {:<width$} {:>5}",
            def.display_name,
            global.get(&def.key).unwrap_or(0),
            width = NAME_COLUMN_WIDTH
        )?;
    }
    writeln!(out, "  Grand total: {}", global.total())?;

    Ok(())
}
