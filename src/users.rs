use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::MondayError;
use crate::graphql::MondayClient;

const ME: &str = "query { me { id name email enabled is_admin account { id name } } }";

const LIST_USERS: &str = "query ($limit: Int) { users (limit: $limit) { id name email enabled is_admin } }";

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub account: Option<Account>,
}

pub struct UserService {
    client: Arc<MondayClient>,
}

impl UserService {
    pub fn new(client: Arc<MondayClient>) -> Self {
        Self { client }
    }

    /// The user the API token belongs to.
    pub async fn me(&self) -> Result<User, MondayError> {
        #[derive(Deserialize)]
        struct Me {
            me: User,
        }

        let data: Me = self.client.query(ME).await?;
        Ok(data.me)
    }

    pub async fn list(&self, limit: u32) -> Result<Vec<User>, MondayError> {
        #[derive(Deserialize)]
        struct Users {
            users: Vec<User>,
        }

        let data: Users = self.client.execute(LIST_USERS, json!({ "limit": limit })).await?;
        Ok(data.users)
    }
}
