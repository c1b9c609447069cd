use crate::api::{BoardApi, CardPatch, NewCard};
use crate::auth::Session;
use crate::domain::validation::{
    validate_board_title, validate_card_description, validate_card_title, validate_project,
};
use crate::domain::{Board, BoardId, BoardState, Card, CardId, KanbanError, Project, ProjectId};

/// Board and card edits other than drag-and-drop. These are pessimistic:
/// local state changes only after the backend accepts the change.
pub struct BoardService;

impl BoardService {
    pub async fn load_project<A: BoardApi>(
        api: &A,
        session: &Session,
        project_id: ProjectId,
    ) -> Result<(Project, BoardState), KanbanError> {
        let response = api.fetch_project(session, project_id).await?;
        let boards = response.boards.into_iter().map(Board::from).collect();
        let state = BoardState::from_parts(response.project.id, boards, response.cards);

        tracing::info!(
            project_id = response.project.id,
            boards = state.boards().len(),
            cards = state.card_count(),
            "Project board loaded"
        );

        Ok((response.project, state))
    }

    /// Replaces `state` with a fresh copy of the same project.
    async fn resync<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
    ) -> Result<(), KanbanError> {
        let (_, fresh) = Self::load_project(api, session, state.project_id()).await?;
        *state = fresh;
        Ok(())
    }

    pub async fn create_project<A: BoardApi>(
        api: &A,
        session: &Session,
        title: &str,
        description: &str,
    ) -> Result<Project, KanbanError> {
        validate_project(title, description)?;
        let project = api.create_project(session, title, description).await?;
        tracing::info!(project_id = project.id, "Project created");
        Ok(project)
    }

    // ── Boards ────────────────────────────────────────────────

    pub async fn add_board<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        title: &str,
    ) -> Result<BoardId, KanbanError> {
        validate_board_title(title)?;
        let record = api.create_board(session, state.project_id(), title).await?;
        let board_id = record.id;
        state.insert_board(record.into())?;
        tracing::debug!(board_id, "Board added");
        Ok(board_id)
    }

    pub async fn rename_board<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        board_id: BoardId,
        title: &str,
    ) -> Result<(), KanbanError> {
        validate_board_title(title)?;
        if state.board(board_id).is_none() {
            return Err(KanbanError::NotFound(format!("Board not found: {}", board_id)));
        }
        let record = api.rename_board(session, board_id, title).await?;
        state.rename_board(board_id, &record.title)?;
        Ok(())
    }

    /// Deletes a board; its cards go with it.
    pub async fn delete_board<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        board_id: BoardId,
    ) -> Result<Vec<Card>, KanbanError> {
        if state.board(board_id).is_none() {
            return Err(KanbanError::NotFound(format!("Board not found: {}", board_id)));
        }
        api.delete_board(session, board_id).await?;
        let removed = state
            .remove_board(board_id)
            .map(|(_, cards)| cards)
            .unwrap_or_default();
        tracing::debug!(board_id, cards = removed.len(), "Board deleted");
        Ok(removed)
    }

    // ── Cards ─────────────────────────────────────────────────

    pub async fn add_card<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        card: NewCard,
    ) -> Result<CardId, KanbanError> {
        validate_card_title(&card.title)?;
        if let Some(description) = &card.description {
            validate_card_description(description)?;
        }
        if state.board(card.board_id).is_none() {
            return Err(KanbanError::NotFound(format!("Board not found: {}", card.board_id)));
        }

        let created = api.create_card(session, &card).await?;
        let card_id = created.id;
        if let Err(e) = state.insert_card(created) {
            // The card exists on the server now; reload instead of losing it.
            tracing::warn!(card_id, board_id = card.board_id, "Created card does not fit local state: {}", e);
            Self::resync(api, session, state).await?;
            return Ok(card_id);
        }
        tracing::debug!(card_id, board_id = card.board_id, "Card added");
        Ok(card_id)
    }

    pub async fn update_card<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        card_id: CardId,
        patch: CardPatch,
    ) -> Result<(), KanbanError> {
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(title) = &patch.title {
            validate_card_title(title)?;
        }
        if let Some(description) = &patch.description {
            validate_card_description(description)?;
        }
        if state.card(card_id).is_none() {
            return Err(KanbanError::NotFound(format!("Card not found: {}", card_id)));
        }

        let updated = api.update_card(session, card_id, &patch).await?;
        if let Err(e) = state.replace_card(updated) {
            tracing::warn!(card_id, "Updated card does not fit local state: {}", e);
            Self::resync(api, session, state).await?;
        }
        Ok(())
    }

    pub async fn delete_card<A: BoardApi>(
        api: &A,
        session: &Session,
        state: &mut BoardState,
        card_id: CardId,
    ) -> Result<Card, KanbanError> {
        if state.card(card_id).is_none() {
            return Err(KanbanError::NotFound(format!("Card not found: {}", card_id)));
        }
        api.delete_card(session, card_id).await?;
        state
            .remove_card(card_id)
            .ok_or_else(|| KanbanError::NotFound(format!("Card not found: {}", card_id)))
    }
}
