use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BoardId, CardId, CardStatus, ProjectId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub title: String,
    #[serde(rename = "about", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brief_about: Option<String>,
    #[serde(rename = "sell_by", default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub assignees: Vec<UserId>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Card {
    pub fn new(id: CardId, board_id: BoardId, title: impl Into<String>) -> Self {
        Self {
            id,
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

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < today)
    }
}

/// A named column; `cards` is display order only; the server keeps membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub cards: Vec<CardId>,
}

impl Board {
    pub fn new(id: BoardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn position_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|&id| id == card_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_project_status")]
    pub status: String,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

fn default_project_status() -> String {
    "active".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_from_wire_names() {
        let card: Card = serde_json::from_value(json!({
            "id": 7,
            "board_id": 2,
            "title": "Write report",
            "about": "Chapter 3",
            "sell_by": "2026-10-20",
            "labels": ["research"]
        }))
        .unwrap();

        assert_eq!(card.description.as_deref(), Some("Chapter 3"));
        assert_eq!(card.due_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(card.status, CardStatus::Todo);
        assert_eq!(card.labels, vec!["research".to_string()]);
        assert!(card.assignees.is_empty());
    }

    #[test]
    fn test_overdue_ignores_done_cards() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let mut card = Card::new(1, 1, "Logo");
        card.due_date = NaiveDate::from_ymd_opt(2026, 10, 8);
        assert!(card.is_overdue(today));

        card.status = CardStatus::Done;
        assert!(!card.is_overdue(today));
    }
}
