//! Backend persistence seam.
//!
//! `BoardApi` is what the reconciler and the board service talk to;
//! `HttpBoardApi` implements it over the `/api/v1` REST endpoints.

#![allow(async_fn_in_trait)]

pub mod client;
pub mod dto;

pub use client::HttpBoardApi;
pub use dto::{BoardRecord, CardPatch, NewCard, ProjectListing, ProjectResponse, Registration, User};

use crate::auth::Session;
use crate::domain::{BoardId, Card, CardId, KanbanError, Project, ProjectId};

pub trait BoardApi {
    /// Persists board membership only; ordering inside a board stays local.
    async fn move_card(
        &self,
        session: &Session,
        card_id: CardId,
        board_id: BoardId,
    ) -> Result<Card, KanbanError>;

    async fn fetch_project(
        &self,
        session: &Session,
        project_id: ProjectId,
    ) -> Result<ProjectResponse, KanbanError>;

    async fn create_project(
        &self,
        session: &Session,
        title: &str,
        description: &str,
    ) -> Result<Project, KanbanError>;

    async fn create_board(
        &self,
        session: &Session,
        project_id: ProjectId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError>;

    async fn rename_board(
        &self,
        session: &Session,
        board_id: BoardId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError>;

    async fn delete_board(&self, session: &Session, board_id: BoardId) -> Result<(), KanbanError>;

    async fn create_card(&self, session: &Session, card: &NewCard) -> Result<Card, KanbanError>;

    async fn update_card(
        &self,
        session: &Session,
        card_id: CardId,
        patch: &CardPatch,
    ) -> Result<Card, KanbanError>;

    async fn delete_card(&self, session: &Session, card_id: CardId) -> Result<(), KanbanError>;
}
