#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use kanban_client::api::{BoardApi, BoardRecord, CardPatch, NewCard, ProjectResponse};
use kanban_client::auth::Session;
use kanban_client::domain::{
    Board, BoardId, BoardState, Card, CardId, KanbanError, Project, ProjectId,
};

pub fn test_session() -> Session {
    Session::new("test-token")
}

/// Board 1 = [10, 11], Board 2 = [].
pub fn two_board_state() -> BoardState {
    BoardState::from_parts(
        1,
        vec![Board::new(1, "Planned"), Board::new(2, "Doing")],
        vec![Card::new(10, 1, "Market"), Card::new(11, 1, "Mockups")],
    )
}

pub fn membership(state: &BoardState, board_id: BoardId) -> Vec<CardId> {
    let mut ids = state.board(board_id).unwrap().cards.clone();
    ids.sort_unstable();
    ids
}

/// In-memory backend with scripted failures. Each queued status code fails
/// the next mutating call with that status.
#[derive(Default)]
pub struct FakeApi {
    pub project: RefCell<Option<ProjectResponse>>,
    pub cards: RefCell<HashMap<CardId, Card>>,
    pub failures: RefCell<VecDeque<u16>>,
    pub calls: RefCell<Vec<String>>,
    /// When set, created cards land on this board whatever was asked for.
    pub place_new_cards_on: RefCell<Option<BoardId>>,
    next_id: RefCell<i64>,
}

impl FakeApi {
    pub fn with_cards(cards: &[Card]) -> Self {
        let api = Self::default();
        for card in cards {
            api.cards.borrow_mut().insert(card.id, card.clone());
        }
        *api.next_id.borrow_mut() = 100;
        api
    }

    pub fn seeded() -> Self {
        Self::with_cards(&[Card::new(10, 1, "Market"), Card::new(11, 1, "Mockups")])
    }

    pub fn fail_next(&self, status: u16) {
        self.failures.borrow_mut().push_back(status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), KanbanError> {
        self.calls.borrow_mut().push(call);
        match self.failures.borrow_mut().pop_front() {
            Some(status) => Err(KanbanError::from_status(status, None)),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        let mut id = self.next_id.borrow_mut();
        *id += 1;
        *id
    }
}

impl BoardApi for FakeApi {
    async fn move_card(
        &self,
        _session: &Session,
        card_id: CardId,
        board_id: BoardId,
    ) -> Result<Card, KanbanError> {
        self.record(format!("move {card_id} -> {board_id}"))?;
        let mut cards = self.cards.borrow_mut();
        let card = cards
            .get_mut(&card_id)
            .ok_or_else(|| KanbanError::from_status(404, None))?;
        card.board_id = board_id;
        Ok(card.clone())
    }

    async fn fetch_project(
        &self,
        _session: &Session,
        project_id: ProjectId,
    ) -> Result<ProjectResponse, KanbanError> {
        self.record(format!("fetch project {project_id}"))?;
        let mut response = self
            .project
            .borrow()
            .clone()
            .ok_or_else(|| KanbanError::from_status(404, None))?;
        let mut stored: Vec<Card> = self
            .cards
            .borrow()
            .values()
            .filter(|card| response.cards.iter().all(|c| c.id != card.id))
            .cloned()
            .collect();
        stored.sort_by_key(|card| card.id);
        response.cards.extend(stored);
        Ok(response)
    }

    async fn create_project(
        &self,
        _session: &Session,
        title: &str,
        description: &str,
    ) -> Result<Project, KanbanError> {
        self.record(format!("create project {title}"))?;
        Ok(Project {
            id: self.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            status: "active".into(),
        })
    }

    async fn create_board(
        &self,
        _session: &Session,
        project_id: ProjectId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError> {
        self.record(format!("create board {title}"))?;
        Ok(BoardRecord {
            id: self.next_id(),
            title: title.to_string(),
            project_id: Some(project_id),
        })
    }

    async fn rename_board(
        &self,
        _session: &Session,
        board_id: BoardId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError> {
        self.record(format!("rename board {board_id}"))?;
        Ok(BoardRecord {
            id: board_id,
            title: title.to_string(),
            project_id: None,
        })
    }

    async fn delete_board(&self, _session: &Session, board_id: BoardId) -> Result<(), KanbanError> {
        self.record(format!("delete board {board_id}"))
    }

    async fn create_card(&self, _session: &Session, card: &NewCard) -> Result<Card, KanbanError> {
        self.record(format!("create card {}", card.title))?;
        let board_id = self.place_new_cards_on.borrow().unwrap_or(card.board_id);
        let mut created = Card::new(self.next_id(), board_id, card.title.clone());
        created.description = card.description.clone();
        created.labels = card.labels.clone();
        self.cards.borrow_mut().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_card(
        &self,
        _session: &Session,
        card_id: CardId,
        patch: &CardPatch,
    ) -> Result<Card, KanbanError> {
        self.record(format!("update card {card_id}"))?;
        let mut cards = self.cards.borrow_mut();
        let card = cards
            .get_mut(&card_id)
            .ok_or_else(|| KanbanError::from_status(404, None))?;
        if let Some(title) = &patch.title {
            card.title = title.clone();
        }
        if let Some(description) = &patch.description {
            card.description = Some(description.clone());
        }
        if let Some(board_id) = patch.board_id {
            card.board_id = board_id;
        }
        Ok(card.clone())
    }

    async fn delete_card(&self, _session: &Session, card_id: CardId) -> Result<(), KanbanError> {
        self.record(format!("delete card {card_id}"))?;
        self.cards.borrow_mut().remove(&card_id);
        Ok(())
    }
}

// ── Mock HTTP backend ──────────────────────────────────────────

pub fn ok_envelope(body: Value) -> Value {
    json!({
        "meta": { "status": "OK", "http_code": 200, "method": "GET" },
        "data": { "body": body }
    })
}

pub fn error_envelope(code: u16, message: &str) -> Value {
    json!({
        "meta": {
            "status": "Error",
            "http_code": code,
            "http_message": "Error",
            "method": "PATCH",
            "message": message
        },
        "data": { "body": null }
    })
}

/// Serves `app` on an ephemeral port and returns its `/api/v1` base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Mock backend has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });

    format!("http://{}/api/v1", addr)
}
