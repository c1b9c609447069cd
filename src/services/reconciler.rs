use std::collections::HashSet;

use crate::api::BoardApi;
use crate::auth::Session;
use crate::domain::{BoardId, BoardState, Card, CardId, KanbanError, MoveError};

/// A drag-and-drop gesture as reported by the board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub card_id: CardId,
    pub source_board_id: BoardId,
    pub source_index: usize,
    pub dest_board_id: BoardId,
    pub dest_index: usize,
}

impl MoveRequest {
    pub fn is_noop(&self) -> bool {
        self.source_board_id == self.dest_board_id && self.source_index == self.dest_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    Idle,
    OptimisticallyMoved,
    Confirmed,
    RolledBack,
}

/// Ticket for a move that has been applied locally and awaits the server.
#[derive(Debug)]
#[must_use = "a pending move must be settled with finish_move"]
pub struct PendingMove {
    request: MoveRequest,
    placed_at: usize,
    title: String,
}

impl PendingMove {
    pub fn card_id(&self) -> CardId {
        self.request.card_id
    }

    pub fn source_board_id(&self) -> BoardId {
        self.request.source_board_id
    }

    pub fn dest_board_id(&self) -> BoardId {
        self.request.dest_board_id
    }

    /// Index the card landed on after clamping.
    pub fn placed_at(&self) -> usize {
        self.placed_at
    }

    pub fn phase(&self) -> MovePhase {
        MovePhase::OptimisticallyMoved
    }
}

#[derive(Debug)]
pub enum MoveStart {
    NoOp,
    Pending(PendingMove),
}

#[derive(Debug)]
pub enum MoveOutcome {
    NoOp,
    Confirmed,
    RolledBack(KanbanError),
}

impl MoveOutcome {
    pub fn phase(&self) -> MovePhase {
        match self {
            MoveOutcome::NoOp => MovePhase::Idle,
            MoveOutcome::Confirmed => MovePhase::Confirmed,
            MoveOutcome::RolledBack(_) => MovePhase::RolledBack,
        }
    }
}

/// A message for the user about a failed background operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub card_id: Option<CardId>,
    pub message: String,
}

/// Owns the local board state and keeps it in step with the server while
/// applying card moves optimistically.
#[derive(Debug, Default)]
pub struct BoardReconciler {
    state: BoardState,
    in_flight: HashSet<CardId>,
    notices: Vec<Notice>,
}

impl BoardReconciler {
    pub fn new(state: BoardState) -> Self {
        Self {
            state,
            in_flight: HashSet::new(),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BoardState {
        &mut self.state
    }

    /// Replaces the whole snapshot, e.g. after a reload. Moves still in
    /// flight settle against the new state.
    pub fn replace_state(&mut self, state: BoardState) {
        self.state = state;
    }

    pub fn is_in_flight(&self, card_id: CardId) -> bool {
        self.in_flight.contains(&card_id)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Checks the gesture and applies it to local state. Nothing is sent.
    pub fn begin_move(&mut self, request: MoveRequest) -> Result<MoveStart, MoveError> {
        if request.is_noop() {
            return Ok(MoveStart::NoOp);
        }

        let MoveRequest {
            card_id,
            source_board_id,
            source_index,
            dest_board_id,
            dest_index,
        } = request;

        if self.in_flight.contains(&card_id) {
            return Err(MoveError::CardBusy(card_id));
        }

        let source = self
            .state
            .board(source_board_id)
            .ok_or(MoveError::UnknownBoard(source_board_id))?;
        if self.state.board(dest_board_id).is_none() {
            return Err(MoveError::UnknownBoard(dest_board_id));
        }
        let title = self
            .state
            .card(card_id)
            .map(|c| c.title.clone())
            .ok_or(MoveError::UnknownCard(card_id))?;
        match source.cards.get(source_index) {
            Some(&id) if id == card_id => {}
            Some(_) => {
                return Err(MoveError::CardMismatch {
                    card_id,
                    board_id: source_board_id,
                    index: source_index,
                })
            }
            None => {
                return Err(MoveError::IndexOutOfRange {
                    board_id: source_board_id,
                    index: source_index,
                })
            }
        }

        self.state.take_at(source_board_id, source_index);
        let placed_at = self
            .state
            .put_at(card_id, dest_board_id, dest_index)
            .ok_or(MoveError::UnknownBoard(dest_board_id))?;
        self.in_flight.insert(card_id);

        tracing::debug!(
            card_id,
            from_board = source_board_id,
            to_board = dest_board_id,
            index = placed_at,
            "Card moved optimistically"
        );

        Ok(MoveStart::Pending(PendingMove {
            request,
            placed_at,
            title,
        }))
    }

    /// Settles a pending move with the server's answer.
    pub fn finish_move(
        &mut self,
        pending: PendingMove,
        result: Result<Card, KanbanError>,
    ) -> MoveOutcome {
        let card_id = pending.card_id();
        self.in_flight.remove(&card_id);

        match result {
            Ok(card) => {
                self.confirm(&pending, card);
                MoveOutcome::Confirmed
            }
            Err(error) => {
                self.roll_back(&pending, &error);
                MoveOutcome::RolledBack(error)
            }
        }
    }

    /// Applies, persists and settles one move.
    pub async fn move_card<A: BoardApi>(
        &mut self,
        api: &A,
        session: &Session,
        request: MoveRequest,
    ) -> Result<MoveOutcome, MoveError> {
        let pending = match self.begin_move(request)? {
            MoveStart::NoOp => return Ok(MoveOutcome::NoOp),
            MoveStart::Pending(pending) => pending,
        };

        let result = api
            .move_card(session, pending.card_id(), pending.dest_board_id())
            .await;
        Ok(self.finish_move(pending, result))
    }

    fn confirm(&mut self, pending: &PendingMove, card: Card) {
        let card_id = pending.card_id();
        if self.state.card(card_id).is_none() {
            tracing::debug!(card_id, "Moved card was removed locally before confirmation");
            return;
        }
        if card.id != card_id {
            tracing::warn!(card_id, returned = card.id, "Move confirmed with a different card, ignoring body");
            return;
        }

        // Keep the optimistic position unless the server put the card elsewhere.
        let board_id = card.board_id;
        if let Err(e) = self.state.replace_card(card) {
            tracing::warn!(card_id, board_id, "Could not apply confirmed card: {}", e);
        }
        tracing::debug!(card_id, board_id, "Card move confirmed");
    }

    fn roll_back(&mut self, pending: &PendingMove, error: &KanbanError) {
        let card_id = pending.card_id();
        if self.state.card(card_id).is_some() {
            self.state.detach(card_id);
            let target = if self.state.board(pending.source_board_id()).is_some() {
                Some(pending.source_board_id())
            } else {
                self.state.boards().first().map(|b| b.id)
            };

            match target {
                Some(board_id) => {
                    if board_id != pending.source_board_id() {
                        tracing::warn!(
                            card_id,
                            source_board = pending.source_board_id(),
                            board_id,
                            "Source board is gone, returning card to first board"
                        );
                    }
                    self.state.put_at(card_id, board_id, usize::MAX);
                }
                None => {
                    tracing::warn!(card_id, "No board left to return card to, dropping it locally");
                    self.state.remove_card(card_id);
                }
            }
        } else {
            // Its board was deleted or the state reloaded without it.
            tracing::debug!(card_id, "Moved card is no longer in local state, nothing to restore");
        }

        tracing::warn!(
            card_id,
            from_board = pending.source_board_id(),
            to_board = pending.dest_board_id(),
            "Card move rolled back: {}",
            error
        );
        self.notices.push(Notice {
            card_id: Some(card_id),
            message: format!("Could not move \"{}\": {}", pending.title, error.user_message()),
        });
    }
}
