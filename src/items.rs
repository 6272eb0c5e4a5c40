use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::columns::ColumnValues;
use crate::error::MondayError;
use crate::graphql::MondayClient;
use crate::validator::validate_id;

const ITEM_FIELDS: &str = "id name state created_at updated_at \
    board { id } group { id title } column_values { id type text value }";

#[derive(Debug, Clone, Deserialize)]
pub struct ItemColumnValue {
    pub id: String,
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Raw JSON-encoded value as stored by the API.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemGroup {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub board: Option<IdRef>,
    #[serde(default)]
    pub group: Option<ItemGroup>,
    #[serde(default)]
    pub column_values: Vec<ItemColumnValue>,
}

impl Item {
    pub fn column(&self, column_id: &str) -> Option<&ItemColumnValue> {
        self.column_values.iter().find(|c| c.id == column_id)
    }
}

#[derive(Deserialize)]
struct ItemsData {
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct ItemsPage {
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct BoardItems {
    items_page: ItemsPage,
}

#[derive(Deserialize)]
struct BoardItemsData {
    boards: Vec<BoardItems>,
}

pub struct ItemService {
    client: Arc<MondayClient>,
}

impl ItemService {
    pub fn new(client: Arc<MondayClient>) -> Self {
        Self { client }
    }

    pub async fn get(&self, item_id: &str) -> Result<Option<Item>, MondayError> {
        validate_id(item_id)?;
        let query = format!("query ($ids: [ID!]) {{ items (ids: $ids) {{ {} }} }}", ITEM_FIELDS);
        let data: ItemsData = self.client.execute(&query, json!({ "ids": [item_id] })).await?;
        Ok(data.items.into_iter().next())
    }

    /// First page of a board's items.
    pub async fn list_by_board(&self, board_id: &str, limit: u32) -> Result<Vec<Item>, MondayError> {
        validate_id(board_id)?;
        let query = format!(
            "query ($ids: [ID!], $limit: Int) {{ boards (ids: $ids) {{ items_page (limit: $limit) {{ items {{ {} }} }} }} }}",
            ITEM_FIELDS
        );
        let data: BoardItemsData = self
            .client
            .execute(&query, json!({ "ids": [board_id], "limit": limit }))
            .await?;
        Ok(data
            .boards
            .into_iter()
            .next()
            .map(|b| b.items_page.items)
            .unwrap_or_default())
    }

    pub async fn create(
        &self,
        board_id: &str,
        name: &str,
        group_id: Option<&str>,
        column_values: &ColumnValues,
    ) -> Result<Item, MondayError> {
        validate_id(board_id)?;
        if name.trim().is_empty() {
            return Err(MondayError::Validation("Item name must not be empty".into()));
        }

        #[derive(Deserialize)]
        struct CreateItem {
            create_item: Item,
        }

        let query = format!(
            "mutation ($board_id: ID!, $group_id: String, $name: String!, $column_values: JSON) {{ \
             create_item (board_id: $board_id, group_id: $group_id, item_name: $name, column_values: $column_values) {{ {} }} }}",
            ITEM_FIELDS
        );
        let column_values = (!column_values.is_empty()).then(|| column_values.to_json_string());
        let data: CreateItem = self
            .client
            .execute(
                &query,
                json!({
                    "board_id": board_id,
                    "group_id": group_id,
                    "name": name,
                    "column_values": column_values,
                }),
            )
            .await?;
        info!(item_id = %data.create_item.id, board_id, "Item created");
        Ok(data.create_item)
    }

    pub async fn change_column_values(
        &self,
        board_id: &str,
        item_id: &str,
        column_values: &ColumnValues,
    ) -> Result<Item, MondayError> {
        validate_id(board_id)?;
        validate_id(item_id)?;
        if column_values.is_empty() {
            return Err(MondayError::Validation("No column values to change".into()));
        }

        #[derive(Deserialize)]
        struct ChangeValues {
            change_multiple_column_values: Item,
        }

        let query = format!(
            "mutation ($board_id: ID!, $item_id: ID!, $column_values: JSON!) {{ \
             change_multiple_column_values (board_id: $board_id, item_id: $item_id, column_values: $column_values) {{ {} }} }}",
            ITEM_FIELDS
        );
        let data: ChangeValues = self
            .client
            .execute(
                &query,
                json!({
                    "board_id": board_id,
                    "item_id": item_id,
                    "column_values": column_values.to_json_string(),
                }),
            )
            .await?;
        Ok(data.change_multiple_column_values)
    }

    pub async fn delete(&self, item_id: &str) -> Result<String, MondayError> {
        validate_id(item_id)?;

        #[derive(Deserialize)]
        struct DeleteItem {
            delete_item: IdRef,
        }

        let data: DeleteItem = self
            .client
            .execute("mutation ($id: ID!) { delete_item (item_id: $id) { id } }", json!({ "id": item_id }))
            .await?;
        Ok(data.delete_item.id)
    }
}
