use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Board, BoardId, Card, CardStatus, Project, ProjectId, UserId};

#[derive(Debug, Serialize)]
pub struct CreateProjectRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateBoardRequest<'a> {
    pub title: &'a str,
    pub project_id: ProjectId,
}

#[derive(Debug, Serialize)]
pub struct UpdateBoardRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub board_id: BoardId,
    pub title: String,
    #[serde(rename = "about", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief_about: Option<String>,
    #[serde(rename = "sell_by", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: CardStatus,
    pub priority: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl NewCard {
    pub fn new(board_id: BoardId, title: impl Into<String>) -> Self {
        Self {
            board_id,
            title: title.into(),
            description: None,
            brief_about: None,
            due_date: None,
            status: CardStatus::default(),
            priority: 0,
            assignees: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Partial card update; only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "about", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "sell_by", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl CardPatch {
    /// The move request body: board membership and nothing else.
    pub fn move_to(board_id: BoardId) -> Self {
        Self {
            board_id: Some(board_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardRecord {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl From<BoardRecord> for Board {
    fn from(record: BoardRecord) -> Self {
        Board::new(record.id, record.title)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub boards: Vec<BoardRecord>,
    #[serde(default)]
    pub cards: Vec<Card>,
}
