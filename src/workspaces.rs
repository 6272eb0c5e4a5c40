use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::error::MondayError;
use crate::graphql::MondayClient;

const LIST_WORKSPACES: &str = "query ($limit: Int) { workspaces (limit: $limit) { id name kind description } }";

const CREATE_WORKSPACE: &str = "mutation ($name: String!, $kind: WorkspaceKind!, $description: String) { \
    create_workspace (name: $name, kind: $kind, description: $description) { id name kind description } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceKind {
    Open,
    Closed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<WorkspaceKind>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct WorkspaceService {
    client: Arc<MondayClient>,
}

impl WorkspaceService {
    pub fn new(client: Arc<MondayClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, limit: u32) -> Result<Vec<Workspace>, MondayError> {
        #[derive(Deserialize)]
        struct Workspaces {
            workspaces: Vec<Workspace>,
        }

        let data: Workspaces = self
            .client
            .execute(LIST_WORKSPACES, json!({ "limit": limit }))
            .await?;
        Ok(data.workspaces)
    }

    pub async fn create(
        &self,
        name: &str,
        kind: WorkspaceKind,
        description: Option<&str>,
    ) -> Result<Workspace, MondayError> {
        if name.trim().is_empty() {
            return Err(MondayError::Validation("Workspace name must not be empty".into()));
        }

        #[derive(Deserialize)]
        struct CreateWorkspace {
            create_workspace: Workspace,
        }

        let data: CreateWorkspace = self
            .client
            .execute(
                CREATE_WORKSPACE,
                json!({ "name": name, "kind": kind, "description": description }),
            )
            .await?;
        info!(workspace_id = %data.create_workspace.id, "Workspace created");
        Ok(data.create_workspace)
    }
}
