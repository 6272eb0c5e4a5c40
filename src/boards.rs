use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::error::MondayError;
use crate::graphql::MondayClient;
use crate::validator::validate_id;

const LIST_BOARDS: &str = "query ($limit: Int, $page: Int) { \
    boards (limit: $limit, page: $page) { id name description state board_kind workspace_id } }";

const GET_BOARD: &str = "query ($ids: [ID!]) { \
    boards (ids: $ids) { id name description state board_kind workspace_id \
    columns { id title type settings_str } groups { id title color } } }";

const CREATE_BOARD: &str = "mutation ($name: String!, $kind: BoardKind!, $workspace_id: ID) { \
    create_board (board_name: $name, board_kind: $kind, workspace_id: $workspace_id) { \
    id name description state board_kind workspace_id } }";

const ARCHIVE_BOARD: &str = "mutation ($id: ID!) { archive_board (board_id: $id) { id state } }";

const LIST_COLUMNS: &str = "query ($ids: [ID!]) { boards (ids: $ids) { columns { id title type settings_str } } }";

const CREATE_COLUMN: &str = "mutation ($board_id: ID!, $title: String!, $column_type: ColumnType!) { \
    create_column (board_id: $board_id, title: $title, column_type: $column_type) { id title type settings_str } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    Public,
    Private,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    LongText,
    Numbers,
    Status,
    Date,
    Email,
    Phone,
    Location,
    Checkbox,
    Link,
    Dropdown,
    People,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub settings_str: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub board_kind: Option<BoardKind>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedBoard {
    pub id: String,
    pub state: String,
}

#[derive(Deserialize)]
struct BoardsData<T> {
    boards: Vec<T>,
}

#[derive(Deserialize)]
struct BoardColumns {
    columns: Vec<Column>,
}

pub struct BoardService {
    client: Arc<MondayClient>,
}

impl BoardService {
    pub fn new(client: Arc<MondayClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, limit: u32, page: u32) -> Result<Vec<Board>, MondayError> {
        let data: BoardsData<Board> = self
            .client
            .execute(LIST_BOARDS, json!({ "limit": limit, "page": page.max(1) }))
            .await?;
        Ok(data.boards)
    }

    pub async fn get(&self, board_id: &str) -> Result<Option<Board>, MondayError> {
        validate_id(board_id)?;
        let data: BoardsData<Board> = self
            .client
            .execute(GET_BOARD, json!({ "ids": [board_id] }))
            .await?;
        Ok(data.boards.into_iter().next())
    }

    pub async fn create(
        &self,
        name: &str,
        kind: BoardKind,
        workspace_id: Option<&str>,
    ) -> Result<Board, MondayError> {
        if name.trim().is_empty() {
            return Err(MondayError::Validation("Board name must not be empty".into()));
        }
        if let Some(id) = workspace_id {
            validate_id(id)?;
        }

        #[derive(Deserialize)]
        struct CreateBoard {
            create_board: Board,
        }

        let data: CreateBoard = self
            .client
            .execute(
                CREATE_BOARD,
                json!({ "name": name, "kind": kind, "workspace_id": workspace_id }),
            )
            .await?;
        info!(board_id = %data.create_board.id, "Board created");
        Ok(data.create_board)
    }

    pub async fn archive(&self, board_id: &str) -> Result<ArchivedBoard, MondayError> {
        validate_id(board_id)?;

        #[derive(Deserialize)]
        struct ArchiveBoard {
            archive_board: ArchivedBoard,
        }

        let data: ArchiveBoard = self
            .client
            .execute(ARCHIVE_BOARD, json!({ "id": board_id }))
            .await?;
        Ok(data.archive_board)
    }
}

pub struct ColumnService {
    client: Arc<MondayClient>,
}

impl ColumnService {
    pub fn new(client: Arc<MondayClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, board_id: &str) -> Result<Vec<Column>, MondayError> {
        validate_id(board_id)?;
        let data: BoardsData<BoardColumns> = self
            .client
            .execute(LIST_COLUMNS, json!({ "ids": [board_id] }))
            .await?;
        data.boards
            .into_iter()
            .next()
            .map(|b| b.columns)
            .ok_or_else(|| MondayError::InvalidResponse(format!("Board {} not found", board_id)))
    }

    pub async fn create(
        &self,
        board_id: &str,
        title: &str,
        column_type: ColumnType,
    ) -> Result<Column, MondayError> {
        validate_id(board_id)?;
        if title.trim().is_empty() {
            return Err(MondayError::Validation("Column title must not be empty".into()));
        }

        #[derive(Deserialize)]
        struct CreateColumn {
            create_column: Column,
        }

        let data: CreateColumn = self
            .client
            .execute(
                CREATE_COLUMN,
                json!({ "board_id": board_id, "title": title, "column_type": column_type }),
            )
            .await?;
        Ok(data.create_column)
    }
}
